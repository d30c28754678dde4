//! Configuration types for paged-fetch

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Semaphore;

/// Largest accepted progress event channel capacity
pub const MAX_EVENT_CAPACITY: usize = 1 << 16;

/// Fetch engine configuration (page size, concurrency bound)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Records per page when the caller does not pass a page size (default: 500)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum number of page fetches in flight against the store (default: 8)
    ///
    /// One task is still spawned per page; tasks beyond this limit wait for a
    /// permit before calling the store. `None` lets every page call the store
    /// at once.
    #[serde(default = "default_max_concurrent_pages")]
    pub max_concurrent_pages: Option<usize>,

    /// Capacity of the progress event channel (default: 256, at most [`MAX_EVENT_CAPACITY`])
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_concurrent_pages: default_max_concurrent_pages(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl FetchConfig {
    /// Check that the engine can run with these settings
    pub fn validate(&self) -> Result<()> {
        validate_page_size(self.page_size)?;
        match self.max_concurrent_pages {
            Some(0) => {
                return Err(Error::invalid_config(
                    "max_concurrent_pages",
                    "must be at least 1 when set",
                ));
            }
            Some(limit) if limit > Semaphore::MAX_PERMITS => {
                return Err(Error::invalid_config(
                    "max_concurrent_pages",
                    format!("must be at most {}", Semaphore::MAX_PERMITS),
                ));
            }
            _ => {}
        }
        if self.event_capacity == 0 {
            return Err(Error::invalid_config(
                "event_capacity",
                "must be greater than zero",
            ));
        }
        // broadcast allocates every slot up front
        if self.event_capacity > MAX_EVENT_CAPACITY {
            return Err(Error::invalid_config(
                "event_capacity",
                format!("must be at most {MAX_EVENT_CAPACITY}"),
            ));
        }
        Ok(())
    }
}

/// Data storage configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Database path (default: "./paged-fetch.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Main configuration
///
/// Fetch settings are flattened, so a JSON config reads
/// `{"page_size": 500, "max_concurrent_pages": 8, "persistence": {...}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Fetch engine settings
    #[serde(flatten)]
    pub fetch: FetchConfig,

    /// Data storage settings
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl Config {
    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every sub-config
    pub fn validate(&self) -> Result<()> {
        self.fetch.validate()
    }
}

/// Reject page sizes the planner cannot divide by
pub(crate) fn validate_page_size(page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(Error::invalid_config(
            "page_size",
            "page size must be greater than zero",
        ));
    }
    Ok(())
}

// Default value functions
fn default_page_size() -> usize {
    500
}

fn default_max_concurrent_pages() -> Option<usize> {
    Some(8)
}

fn default_event_capacity() -> usize {
    256
}

fn default_database_path() -> PathBuf {
    PathBuf::from("paged-fetch.db")
}
