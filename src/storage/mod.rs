//! Record accumulation and persistence.
//!
//! [`ResultStore`] collects records for the lifetime of one crawl run.
//! [`RecordStorage`] backends persist the final set as a JSON array in the
//! interchange format read by the results viewer:
//!
//! ```text
//! searches/
//! ├── security_analyst_20260116_093000.json
//! └── soc_analyst_20260117_101500.json
//! ```

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::JobRecord;

// Re-export for convenience
pub use local::LocalStorage;

/// Records gathered during one run, in extraction order.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Vec<JobRecord>,
    links: HashSet<String>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record unless one with the same link is already held.
    pub fn push(&mut self, record: JobRecord) -> bool {
        if !self.links.insert(record.link.clone()) {
            log::debug!("Already extracted {}", record.link);
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<JobRecord> {
        self.records
    }
}

/// Trait for record storage backends.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Persist the records of one run and return where they went.
    async fn write_records(&self, query: &str, records: &[JobRecord]) -> Result<String>;

    /// Read a previously written results file.
    async fn load_records(&self, location: &str) -> Result<Vec<JobRecord>>;
}
