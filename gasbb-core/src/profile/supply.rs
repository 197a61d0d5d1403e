//! Supply profile: forward capacity per production facility per gas day,
//! with nameplate rating standing in where the outlook has no figure.
//!
//! Built in two inspectable steps:
//! 1. [`join_outlook_nameplate`]: structural left join, nullable fields
//! 2. [`coalesce_available`]: outlook value wins, nameplate is the fallback
//!
//! Facility names are not unique in the nameplate report. A name listed twice
//! multiplies every outlook row for that facility; the fan-out is kept (the
//! daily totals then count that facility once per nameplate entry) and
//! reported via [`duplicate_facilities`].

use polars::prelude::*;
use tracing::{info, warn};

use crate::clean::{clean_nameplate, clean_outlook};
use crate::data::loader::ReportLoader;
use crate::data::provider::DataError;
use crate::data::report::ReportKey;
use crate::schema::*;

const ROW_ORDER: &str = "__outlook_row";

/// Left-join cleaned outlook rows to cleaned nameplate rows on `FacilityName`.
///
/// Every outlook row is kept, in outlook order; facilities with no nameplate
/// entry get a null `TJ_Nameplate`.
///
/// Output: `FacilityName`, `GasDay`, `TJ_Available`, `TJ_Nameplate`.
pub fn join_outlook_nameplate(
    outlook: &DataFrame,
    nameplate: &DataFrame,
) -> Result<DataFrame, DataError> {
    let joined = outlook
        .clone()
        .lazy()
        .with_row_index(ROW_ORDER, None)
        .left_join(
            nameplate.clone().lazy(),
            col(FACILITY_NAME),
            col(FACILITY_NAME),
        )
        .sort(
            [ROW_ORDER],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .select([
            col(FACILITY_NAME),
            col(GAS_DAY),
            col(TJ_AVAILABLE),
            col(TJ_NAMEPLATE),
        ])
        .collect()?;
    Ok(joined)
}

/// Fill null `TJ_Available` from `TJ_Nameplate`. Present outlook values are
/// never replaced; rows stay null only when both sources are null.
pub fn coalesce_available(joined: &DataFrame) -> Result<DataFrame, DataError> {
    let df = joined
        .clone()
        .lazy()
        .with_column(
            col(TJ_AVAILABLE)
                .fill_null(col(TJ_NAMEPLATE))
                .alias(TJ_AVAILABLE),
        )
        .collect()?;
    Ok(df)
}

/// Facility names that appear more than once in a cleaned nameplate table,
/// sorted.
pub fn duplicate_facilities(nameplate: &DataFrame) -> Result<Vec<String>, DataError> {
    let dupes = nameplate
        .clone()
        .lazy()
        .group_by([col(FACILITY_NAME)])
        .agg([len().alias("entries")])
        .filter(col("entries").gt(lit(1)))
        .sort([FACILITY_NAME], SortMultipleOptions::default())
        .collect()?;

    let names = dupes.column(FACILITY_NAME)?.str()?;
    Ok(names.into_iter().flatten().map(String::from).collect())
}

/// Supply profile from raw nameplate and outlook reports.
pub fn supply_profile_from_reports(
    nameplate_raw: &DataFrame,
    outlook_raw: &DataFrame,
) -> Result<DataFrame, DataError> {
    let nameplate = clean_nameplate(nameplate_raw)?;
    let outlook = clean_outlook(outlook_raw)?;

    let dupes = duplicate_facilities(&nameplate)?;
    if !dupes.is_empty() {
        warn!(
            facilities = ?dupes,
            "duplicate nameplate entries; their outlook rows will be repeated"
        );
    }

    let joined = join_outlook_nameplate(&outlook, &nameplate)?;
    coalesce_available(&joined)
}

/// Load, clean, join, and coalesce the nameplate and outlook reports.
pub fn build_supply_profile(loader: &ReportLoader, force: bool) -> Result<DataFrame, DataError> {
    let nameplate = loader.load(ReportKey::Nameplate, force)?;
    let outlook = loader.load(ReportKey::MtoFuture, force)?;
    let supply = supply_profile_from_reports(&nameplate, &outlook)?;
    info!(rows = supply.height(), "built supply profile");
    Ok(supply)
}
