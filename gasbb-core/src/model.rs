//! Model builder: daily supply totals against daily demand.
//!
//! `get_model()` is the parameterless entry point. It builds both profiles
//! with the default configuration, sums supply per gas day, left-joins demand
//! to those totals, and computes `Shortfall = TJ_Available - TJ_Demand`.
//! Every demand day is kept; a day with no supply total has a null
//! `TJ_Available` and therefore a null shortfall.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ModelConfig;
use crate::data::cache::ReportCache;
use crate::data::gbb::GbbSource;
use crate::data::loader::ReportLoader;
use crate::data::provider::{DataError, ReportSource};
use crate::profile::{build_demand_profile, build_supply_profile};
use crate::schema::*;

/// Days from 0001-01-01 (day 1 of the common era) to 1970-01-01.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Forward capacity for one facility on one gas day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyProfileRow {
    /// `None` when the outlook row had a blank facility name. Such rows still
    /// count towards the daily total.
    pub facility_name: Option<String>,
    pub gas_day: NaiveDate,
    /// Outlook capacity, or nameplate rating where the outlook had none.
    pub tj_available: Option<f64>,
    pub tj_nameplate: Option<f64>,
}

/// Market balance for one gas day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRow {
    pub gas_day: NaiveDate,
    /// Summed facility capacity; `None` when no facility reported this day.
    pub tj_available: Option<f64>,
    pub tj_demand: f64,
    /// Available minus demand; negative is a deficit.
    pub shortfall: Option<f64>,
}

/// The two result tables as polars frames.
#[derive(Debug, Clone)]
pub struct ModelFrames {
    /// `FacilityName`, `GasDay`, `TJ_Available`, `TJ_Nameplate`
    pub supply: DataFrame,
    /// `GasDay`, `TJ_Available`, `TJ_Demand`, `Shortfall`
    pub model: DataFrame,
}

/// The two result tables as typed rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasModel {
    pub supply: Vec<SupplyProfileRow>,
    pub days: Vec<ModelRow>,
}

impl GasModel {
    pub fn from_frames(frames: &ModelFrames) -> Result<Self, DataError> {
        Ok(Self {
            supply: supply_rows(&frames.supply)?,
            days: model_rows(&frames.model)?,
        })
    }
}

/// Sum `TJ_Available` across facilities for each gas day. Rows without a gas
/// day belong to no day and are skipped.
///
/// Output: `GasDay`, `TJ_Available`, ascending by day.
pub fn daily_supply_totals(supply: &DataFrame) -> Result<DataFrame, DataError> {
    let df = supply
        .clone()
        .lazy()
        .filter(col(GAS_DAY).is_not_null())
        .group_by([col(GAS_DAY)])
        .agg([col(TJ_AVAILABLE).sum()])
        .sort([GAS_DAY], SortMultipleOptions::default())
        .collect()?;
    Ok(df)
}

/// Left-join daily demand to daily supply totals and compute the shortfall.
///
/// Output: `GasDay`, `TJ_Available`, `TJ_Demand`, `Shortfall`, one row per
/// demand day, ascending.
pub fn combine_supply_demand(
    demand: &DataFrame,
    supply_totals: &DataFrame,
) -> Result<DataFrame, DataError> {
    let df = demand
        .clone()
        .lazy()
        .left_join(supply_totals.clone().lazy(), col(GAS_DAY), col(GAS_DAY))
        .select([
            col(GAS_DAY),
            col(TJ_AVAILABLE),
            col(TJ_DEMAND),
            (col(TJ_AVAILABLE) - col(TJ_DEMAND)).alias(SHORTFALL),
        ])
        .sort([GAS_DAY], SortMultipleOptions::default())
        .collect()?;
    Ok(df)
}

/// Day-level model from an already built supply profile and demand profile.
pub fn model_from_profiles(supply: &DataFrame, demand: &DataFrame) -> Result<DataFrame, DataError> {
    let totals = daily_supply_totals(supply)?;
    let model = combine_supply_demand(demand, &totals)?;

    let unsupplied = model.column(TJ_AVAILABLE)?.null_count();
    if unsupplied > 0 {
        warn!(days = unsupplied, "demand days without any supply outlook");
    }
    Ok(model)
}

/// Runs the full pipeline for one configuration.
pub struct ModelBuilder {
    loader: ReportLoader,
    region: String,
    force: bool,
}

impl ModelBuilder {
    pub fn new(config: &ModelConfig, source: Box<dyn ReportSource>) -> Self {
        Self {
            loader: ReportLoader::new(ReportCache::from_config(config, source)),
            region: config.region.clone(),
            force: false,
        }
    }

    /// Builder fetching from the configured bulletin-board URL.
    pub fn from_config(config: &ModelConfig) -> Result<Self, DataError> {
        let source = GbbSource::from_config(config)?;
        Ok(Self::new(config, Box::new(source)))
    }

    /// Re-download every report regardless of cache age.
    pub fn force_refresh(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn loader(&self) -> &ReportLoader {
        &self.loader
    }

    pub fn build_frames(&self) -> Result<ModelFrames, DataError> {
        let supply = build_supply_profile(&self.loader, self.force)?;
        let demand = build_demand_profile(&self.loader, &self.region, self.force)?;
        let model = model_from_profiles(&supply, &demand)?;
        info!(
            region = %self.region,
            supply_rows = supply.height(),
            days = model.height(),
            "built supply/demand model"
        );
        Ok(ModelFrames { supply, model })
    }

    pub fn build(&self) -> Result<GasModel, DataError> {
        GasModel::from_frames(&self.build_frames()?)
    }
}

/// Build the supply profile and the daily balance with the default
/// configuration (public bulletin board, `data_cache/`, "Whole WA").
pub fn get_model() -> Result<GasModel, DataError> {
    ModelBuilder::from_config(&ModelConfig::default())?.build()
}

// ── DataFrame → row conversion ──────────────────────────────────────

pub(crate) fn date_at(days: &DateChunked, i: usize) -> Option<NaiveDate> {
    days.get(i)
        .and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_FROM_CE))
}

fn null_at(table: &str, column: &str, row: usize) -> DataError {
    DataError::Parse {
        report: table.to_string(),
        reason: format!("null {column} at row {row}"),
    }
}

/// Convert a supply profile frame into rows.
pub fn supply_rows(df: &DataFrame) -> Result<Vec<SupplyProfileRow>, DataError> {
    let names = df.column(FACILITY_NAME)?.str()?;
    let days = df.column(GAS_DAY)?.date()?;
    let available = df.column(TJ_AVAILABLE)?.f64()?;
    let nameplate = df.column(TJ_NAMEPLATE)?.f64()?;

    (0..df.height())
        .map(|i| {
            Ok(SupplyProfileRow {
                facility_name: names.get(i).map(String::from),
                gas_day: date_at(days, i).ok_or_else(|| null_at("supply", GAS_DAY, i))?,
                tj_available: available.get(i),
                tj_nameplate: nameplate.get(i),
            })
        })
        .collect()
}

/// Convert a day-level model frame into rows.
pub fn model_rows(df: &DataFrame) -> Result<Vec<ModelRow>, DataError> {
    let days = df.column(GAS_DAY)?.date()?;
    let available = df.column(TJ_AVAILABLE)?.f64()?;
    let demand = df.column(TJ_DEMAND)?.f64()?;
    let shortfall = df.column(SHORTFALL)?.f64()?;

    (0..df.height())
        .map(|i| {
            Ok(ModelRow {
                gas_day: date_at(days, i).ok_or_else(|| null_at("model", GAS_DAY, i))?,
                tj_available: available.get(i),
                tj_demand: demand.get(i).unwrap_or(0.0),
                shortfall: shortfall.get(i),
            })
        })
        .collect()
}
