// src/pipeline/show.rs

use crate::error::Result;
use crate::models::JobRecord;
use crate::storage::RecordStorage;
use crate::utils::log::{sub_item, success};

const LINE_TEMPLATE: &str = "{name} | {company} | {city} {state} | {remote} | {salary}";

/// Load a results file and list its records.
pub async fn run_show(storage: &dyn RecordStorage, location: &str) -> Result<Vec<JobRecord>> {
    let records = storage.load_records(location).await?;

    success(&format!("Loaded {} roles from {}", records.len(), location));
    for record in &records {
        sub_item(&record.format(LINE_TEMPLATE));
    }
    Ok(records)
}
