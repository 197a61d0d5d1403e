//! Report retrieval and caching

pub mod cache;
pub mod fetch;
pub mod gbb;
pub mod loader;
pub mod memory;
pub mod provider;
pub mod report;

pub use cache::ReportCache;
pub use fetch::Fetcher;
pub use gbb::GbbSource;
pub use loader::{read_report_csv, ReportLoader};
pub use memory::MemorySource;
pub use provider::{DataError, ReportSource};
pub use report::{CachedReport, ReportKey};
