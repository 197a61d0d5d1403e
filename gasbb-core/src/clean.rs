//! Report cleaners: project each raw report onto the model's uniform schema
//! (`FacilityName`, `GasDay`, `TJ_*` quantities).
//!
//! Quantities are normalised to f64. Values that are missing or not numeric
//! become null and drop out of sums; they are never zero-filled.

use polars::prelude::*;
use tracing::warn;

use crate::data::provider::DataError;
use crate::data::report::ReportKey;
use crate::schema::*;

/// Gas-day layouts seen in bulletin-board reports, tried in order. Time
/// fields are parsed and then dropped.
const GAS_DAY_FORMATS: [&str; 7] = [
    "%Y/%m/%d",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Expression parsing `GasDay` into a calendar date.
pub fn gas_day_expr() -> Expr {
    let raw = col(GAS_DAY).cast(DataType::String);
    let attempts: Vec<Expr> = GAS_DAY_FORMATS
        .iter()
        .map(|fmt| {
            raw.clone().str().to_date(StrptimeOptions {
                format: Some((*fmt).into()),
                strict: false,
                exact: true,
                cache: true,
            })
        })
        .collect();
    coalesce(&attempts).alias(GAS_DAY)
}

/// Replace `GasDay` with its parsed date, failing if any present value is not
/// a recognisable date. Rows with a blank gas day belong to no day and are
/// dropped.
fn with_gas_day(raw: &DataFrame, report: ReportKey) -> Result<DataFrame, DataError> {
    let parsed = raw.clone().lazy().with_column(gas_day_expr()).collect()?;

    let before = raw.column(GAS_DAY)?.null_count();
    let after = parsed.column(GAS_DAY)?.null_count();
    if after > before {
        return Err(DataError::Parse {
            report: report.to_string(),
            reason: format!("{} {GAS_DAY} value(s) are not calendar dates", after - before),
        });
    }

    if before > 0 {
        warn!(%report, rows = before, "dropping rows without a gas day");
        return Ok(parsed
            .lazy()
            .filter(col(GAS_DAY).is_not_null())
            .collect()?);
    }
    Ok(parsed)
}

fn is_production() -> Expr {
    col(FACILITY_TYPE).cast(DataType::String).eq(lit(PRODUCTION))
}

/// Production facilities and their nameplate rating.
///
/// Output: `FacilityName`, `TJ_Nameplate`.
pub fn clean_nameplate(raw: &DataFrame) -> Result<DataFrame, DataError> {
    require_columns(raw, ReportKey::Nameplate)?;

    let df = raw
        .clone()
        .lazy()
        .filter(is_production())
        .select([
            col(FACILITY_NAME).cast(DataType::String),
            col(NAMEPLATE_RATING)
                .cast(DataType::Float64)
                .alias(TJ_NAMEPLATE),
        ])
        .collect()?;
    Ok(df)
}

/// Production facilities' forward capacity per gas day.
///
/// Output: `FacilityName`, `GasDay`, `TJ_Available` (nullable).
pub fn clean_outlook(raw: &DataFrame) -> Result<DataFrame, DataError> {
    require_columns(raw, ReportKey::MtoFuture)?;

    let df = with_gas_day(raw, ReportKey::MtoFuture)?
        .lazy()
        .filter(is_production())
        .select([
            col(FACILITY_NAME).cast(DataType::String),
            col(GAS_DAY),
            col(CAPACITY).cast(DataType::Float64).alias(TJ_AVAILABLE),
        ])
        .collect()?;
    Ok(df)
}

/// Daily demand for one zone: the sum of `Quantity` over flow records with
/// `ZoneType == "Demand"` and `ZoneName == region` (exact, case-sensitive).
///
/// Output: `GasDay`, `TJ_Demand`, one row per gas day present after
/// filtering, ascending.
pub fn aggregate_demand(raw: &DataFrame, region: &str) -> Result<DataFrame, DataError> {
    require_columns(raw, ReportKey::Flows)?;

    let df = with_gas_day(raw, ReportKey::Flows)?
        .lazy()
        .filter(
            col(ZONE_TYPE)
                .cast(DataType::String)
                .eq(lit(DEMAND_ZONE))
                .and(col(ZONE_NAME).cast(DataType::String).eq(lit(region))),
        )
        .group_by([col(GAS_DAY)])
        .agg([col(QUANTITY).cast(DataType::Float64).sum().alias(TJ_DEMAND)])
        .sort([GAS_DAY], SortMultipleOptions::default())
        .collect()?;
    Ok(df)
}
