//! Record inserts and filtered paging, plus the [`RecordStore`] implementation.

use sqlx::{QueryBuilder, Sqlite};

use crate::error::{DatabaseError, StoreError, StoreResult};
use crate::store::RecordStore;
use crate::types::{FilterSet, FilterValue};
use crate::{Error, Result};

use super::{Database, FILTERABLE_COLUMNS, NewRecord, StoredRecord};

const SELECT_RECORDS: &str =
    "SELECT id, collection, name, status, payload, created_at FROM records";

impl Database {
    /// Insert a single record
    pub async fn insert_record(&self, record: &NewRecord) -> Result<i64> {
        let now = chrono::Utc::now().timestamp();
        let payload = serde_json::to_string(&record.payload)?;

        let result = sqlx::query(
            r#"
            INSERT INTO records (collection, name, status, payload, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.collection)
        .bind(&record.name)
        .bind(&record.status)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert record: {}",
                e
            )))
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Insert multiple records in a batch
    ///
    /// Automatically chunks the input to stay within SQLite's bind variable limit
    /// (5 variables per record).
    pub async fn insert_records_batch(&self, records: &[NewRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        // SQLite default SQLITE_MAX_VARIABLE_NUMBER is 999.
        const MAX_RECORDS_PER_BATCH: usize = 199;

        let now = chrono::Utc::now().timestamp();
        let payloads = records
            .iter()
            .map(|r| serde_json::to_string(&r.payload))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for (chunk, chunk_payloads) in records
            .chunks(MAX_RECORDS_PER_BATCH)
            .zip(payloads.chunks(MAX_RECORDS_PER_BATCH))
        {
            let mut query_builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO records (collection, name, status, payload, created_at) ",
            );

            query_builder.push_values(
                chunk.iter().zip(chunk_payloads),
                |mut b, (record, payload)| {
                    b.push_bind(&record.collection)
                        .push_bind(&record.name)
                        .push_bind(&record.status)
                        .push_bind(payload)
                        .push_bind(now);
                },
            );

            query_builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    Error::Database(DatabaseError::QueryFailed(format!(
                        "Failed to insert records batch: {}",
                        e
                    )))
                })?;
        }

        Ok(())
    }

    /// Count records matching `filters`
    pub async fn count_records(&self, filters: &FilterSet) -> StoreResult<u64> {
        let mut query_builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM records");
        push_filters(&mut query_builder, filters)?;

        let count: i64 = query_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count)
            .map_err(|_| StoreError::Query(format!("negative record count: {count}")))
    }

    /// Fetch up to `limit` records matching `filters` after skipping `offset`
    ///
    /// Rows are ordered by `id` so consecutive offsets never overlap.
    pub async fn fetch_records(
        &self,
        filters: &FilterSet,
        limit: usize,
        offset: u64,
    ) -> StoreResult<Vec<StoredRecord>> {
        let limit = i64::try_from(limit)
            .map_err(|_| StoreError::Query(format!("limit {limit} out of range")))?;
        let offset = i64::try_from(offset)
            .map_err(|_| StoreError::Query(format!("offset {offset} out of range")))?;

        let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_RECORDS);
        push_filters(&mut query_builder, filters)?;
        query_builder.push(" ORDER BY id ASC LIMIT ");
        query_builder.push_bind(limit);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset);

        let rows = query_builder
            .build_query_as::<StoredRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

/// Append `WHERE col = ? AND ...` for every filter, rejecting unknown columns.
fn push_filters(query_builder: &mut QueryBuilder<'_, Sqlite>, filters: &FilterSet) -> StoreResult<()> {
    for (position, (field, value)) in filters.iter().enumerate() {
        let column = FILTERABLE_COLUMNS
            .iter()
            .copied()
            .find(|column| *column == field)
            .ok_or_else(|| StoreError::Query(format!("unknown filter field: {field}")))?;

        query_builder.push(if position == 0 { " WHERE " } else { " AND " });
        query_builder.push(column);

        match value {
            FilterValue::Null => {
                query_builder.push(" IS NULL");
            }
            FilterValue::Bool(v) => {
                query_builder.push(" = ");
                query_builder.push_bind(*v);
            }
            FilterValue::Integer(v) => {
                query_builder.push(" = ");
                query_builder.push_bind(*v);
            }
            FilterValue::Real(v) => {
                query_builder.push(" = ");
                query_builder.push_bind(*v);
            }
            FilterValue::Text(v) => {
                query_builder.push(" = ");
                query_builder.push_bind(v.clone());
            }
        }
    }

    Ok(())
}

#[async_trait::async_trait]
impl RecordStore for Database {
    type Record = StoredRecord;

    async fn count_matching(&self, filters: &FilterSet) -> StoreResult<u64> {
        self.count_records(filters).await
    }

    async fn fetch_page(
        &self,
        filters: &FilterSet,
        limit: usize,
        offset: u64,
    ) -> StoreResult<Vec<StoredRecord>> {
        self.fetch_records(filters, limit, offset).await
    }
}
