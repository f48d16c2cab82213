// src/models/mod.rs

//! Domain models for the job crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod job;
mod page;

// Re-export all public types
pub use config::{Config, CrawlerConfig, FilterConfig, OutputConfig, SearchConfig};
pub use job::{
    EstimatedSalary, JobRecord, RawResultEntry, RemoteWorkModel, RequirementLabel,
    RequirementsModel,
};
pub use page::{DetailData, PageStatus, SearchPageResult};
