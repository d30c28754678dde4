//! Record store abstraction consumed by the fetch engine.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::types::FilterSet;

/// Abstraction over the backing store the engine pages through.
///
/// Implementations must be safe for concurrent independent use: the engine
/// shares one store across every page task of an invocation. A store backed by
/// a single connection should hand out independent handles internally (a
/// connection pool, for example).
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Record type returned verbatim to the caller
    type Record: Send + 'static;

    /// Count the records matching `filters`
    async fn count_matching(&self, filters: &FilterSet) -> StoreResult<u64>;

    /// Fetch at most `limit` records matching `filters`, skipping `offset`
    ///
    /// Returning fewer than `limit` records is expected for the last page.
    async fn fetch_page(
        &self,
        filters: &FilterSet,
        limit: usize,
        offset: u64,
    ) -> StoreResult<Vec<Self::Record>>;
}

#[async_trait::async_trait]
impl<S: RecordStore> RecordStore for Arc<S> {
    type Record = S::Record;

    async fn count_matching(&self, filters: &FilterSet) -> StoreResult<u64> {
        (**self).count_matching(filters).await
    }

    async fn fetch_page(
        &self,
        filters: &FilterSet,
        limit: usize,
        offset: u64,
    ) -> StoreResult<Vec<Self::Record>> {
        (**self).fetch_page(filters, limit, offset).await
    }
}
