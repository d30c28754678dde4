//! Seeded database fixtures

use paged_fetch::{Database, NewRecord};
use tempfile::TempDir;

/// Collections the seeded records are spread over, round-robin by insert order
pub const COLLECTIONS: &[&str] = &["invoices", "orders", "refunds"];

/// Open a file-backed database in a fresh temp directory
///
/// The `TempDir` must be kept alive for as long as the database is used.
pub async fn temp_database() -> Result<(Database, TempDir), String> {
    let temp_dir = tempfile::tempdir().map_err(|e| format!("Failed to create temp dir: {}", e))?;
    let db = Database::new(&temp_dir.path().join("records.db"))
        .await
        .map_err(|e| format!("Failed to open database: {}", e))?;
    Ok((db, temp_dir))
}

/// Build `count` records; record `i` goes to `COLLECTIONS[i % 3]` and is
/// "archived" when `i % 5 == 0`, "open" otherwise
pub fn generate_records(count: usize) -> Vec<NewRecord> {
    (0..count)
        .map(|i| NewRecord {
            collection: COLLECTIONS[i % COLLECTIONS.len()].to_string(),
            name: format!("record-{i:05}"),
            status: Some(if i % 5 == 0 { "archived" } else { "open" }.to_string()),
            payload: serde_json::json!({ "seq": i }),
        })
        .collect()
}

/// Temp database pre-populated with `count` generated records
pub async fn seeded_database(count: usize) -> Result<(Database, TempDir), String> {
    let (db, temp_dir) = temp_database().await?;
    db.insert_records_batch(&generate_records(count))
        .await
        .map_err(|e| format!("Failed to seed database: {}", e))?;
    Ok((db, temp_dir))
}
