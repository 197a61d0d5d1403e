//! gasbb-core: bulletin-board report cache, cleaners, and the daily
//! supply/demand model for one gas market region.
//!
//! Pipeline, leaves first:
//! - Report cache + fetcher: one CSV per report, re-downloaded when stale
//! - Loader: CSV → polars DataFrame
//! - Cleaners: project reports onto `FacilityName` / `GasDay` / `TJ_*`
//! - Supply profile: outlook capacity, nameplate as fallback
//! - Demand profile: daily demand for the modelled zone
//! - Model: daily supply total vs demand → shortfall
//!
//! Everything is synchronous and single-threaded.

pub mod clean;
pub mod config;
pub mod data;
pub mod model;
pub mod profile;
pub mod scenario;
pub mod schema;

pub use config::ModelConfig;
pub use data::{DataError, ReportKey};
pub use model::{get_model, GasModel, ModelBuilder, ModelFrames, ModelRow, SupplyProfileRow};
