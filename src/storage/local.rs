//! Local filesystem storage implementation.
//!
//! Each run is written to its own file, named after the query and the time
//! the run finished:
//!
//! ```text
//! {root}/
//! └── {query_with_underscores}_{YYYYmmdd_HHMMSS}.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::JobRecord;
use crate::storage::RecordStorage;
use crate::utils::query_stem;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    pretty: bool,
}

impl LocalStorage {
    /// Create a LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            pretty: true,
        }
    }

    /// Write compact JSON instead of indented JSON.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// File name for a run of `query` finishing now.
    fn file_name(query: &str) -> String {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("{}_{}.json", query_stem(query), stamp)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Resolve a location relative to the root unless it already exists as given.
    fn resolve(&self, location: &str) -> PathBuf {
        let direct = PathBuf::from(location);
        if direct.is_absolute() || direct.exists() {
            direct
        } else {
            self.root_dir.join(location)
        }
    }
}

#[async_trait]
impl RecordStorage for LocalStorage {
    async fn write_records(&self, query: &str, records: &[JobRecord]) -> Result<String> {
        let path = self.root_dir.join(Self::file_name(query));
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(records)?
        } else {
            serde_json::to_vec(records)?
        };

        log::info!("Writing {} records to {}", records.len(), path.display());
        self.write_bytes(&path, &bytes).await?;
        Ok(path.display().to_string())
    }

    async fn load_records(&self, location: &str) -> Result<Vec<JobRecord>> {
        let path = self.resolve(location);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::config(format!(
                "Results file not found: {}",
                path.display()
            ))),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
