
use crate::db::{Database, NewRecord};

/// Helper: a record in `collection` with an optional status.
pub(super) fn new_record(collection: &str, name: &str, status: Option<&str>) -> NewRecord {
    NewRecord {
        collection: collection.to_string(),
        name: name.to_string(),
        status: status.map(str::to_string),
        payload: serde_json::json!({ "name": name }),
    }
}

/// Helper: insert `count` records split evenly between "alpha" and "beta".
pub(super) async fn seed(db: &Database, count: usize) {
    let records: Vec<NewRecord> = (0..count)
        .map(|i| {
            let collection = if i % 2 == 0 { "alpha" } else { "beta" };
            let status = if i % 3 == 0 { None } else { Some("active") };
            new_record(collection, &format!("record-{i}"), status)
        })
        .collect();
    db.insert_records_batch(&records).await.unwrap();
}
