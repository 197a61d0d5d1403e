//! Column names used by the bulletin-board reports and by the model's
//! normalised tables.

use polars::prelude::*;

use crate::data::provider::DataError;
use crate::data::report::ReportKey;

// Raw report columns.
pub const FACILITY_TYPE: &str = "FacilityType";
pub const FACILITY_NAME: &str = "FacilityName";
pub const NAMEPLATE_RATING: &str = "NamePlateRating";
pub const GAS_DAY: &str = "GasDay";
pub const CAPACITY: &str = "Capacity";
pub const ZONE_TYPE: &str = "ZoneType";
pub const ZONE_NAME: &str = "ZoneName";
pub const QUANTITY: &str = "Quantity";

// Normalised quantity columns (terajoules per gas day).
pub const TJ_NAMEPLATE: &str = "TJ_Nameplate";
pub const TJ_AVAILABLE: &str = "TJ_Available";
pub const TJ_DEMAND: &str = "TJ_Demand";
pub const SHORTFALL: &str = "Shortfall";

// Category values.
pub const PRODUCTION: &str = "Production";
pub const DEMAND_ZONE: &str = "Demand";

/// Columns each report must carry for the cleaners to work.
pub fn required_columns(report: ReportKey) -> &'static [&'static str] {
    match report {
        ReportKey::Nameplate => &[FACILITY_TYPE, FACILITY_NAME, NAMEPLATE_RATING],
        ReportKey::MtoFuture => &[FACILITY_TYPE, FACILITY_NAME, GAS_DAY, CAPACITY],
        ReportKey::Flows => &[GAS_DAY, ZONE_TYPE, ZONE_NAME, QUANTITY],
    }
}

/// Fail with the first column `report` needs but `df` lacks.
pub fn require_columns(df: &DataFrame, report: ReportKey) -> Result<(), DataError> {
    for column in required_columns(report) {
        if df.column(column).is_err() {
            return Err(DataError::MissingColumn {
                report: report.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}
