//! Demand profile: daily demand for the modelled zone.

use polars::prelude::*;
use tracing::info;

use crate::clean::aggregate_demand;
use crate::data::loader::ReportLoader;
use crate::data::provider::DataError;
use crate::data::report::ReportKey;

/// Load the flows report and aggregate it to one `TJ_Demand` per gas day for
/// `region`.
pub fn build_demand_profile(
    loader: &ReportLoader,
    region: &str,
    force: bool,
) -> Result<DataFrame, DataError> {
    let flows = loader.load(ReportKey::Flows, force)?;
    let demand = aggregate_demand(&flows, region)?;
    info!(region, days = demand.height(), "built demand profile");
    Ok(demand)
}
