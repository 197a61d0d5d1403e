//! What-if and presentation views over a built model.
//!
//! - demand adjustment (a large consumer drawing more or less than usual)
//! - the list of deficit days
//! - the per-facility supply stack from a given day onwards

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ModelRow, SupplyProfileRow};

/// Usual draw of the single large consumer the demand scenario varies
/// (Yara Pilbara Fertilisers), TJ/day. Flow data already contains this.
pub const CONSUMER_BASELINE_TJ: f64 = 80.0;

/// Largest consumer draw the scenario accepts, TJ/day.
pub const CONSUMER_MAX_TJ: f64 = 100.0;

/// Stack column for supply rows with a blank facility name.
pub const UNNAMED_FACILITY: &str = "(unnamed)";

/// Demand offset implied by the large consumer drawing `consumption_tj`
/// instead of its baseline.
pub fn consumer_offset(consumption_tj: f64) -> f64 {
    consumption_tj - CONSUMER_BASELINE_TJ
}

/// Shift every day's demand by `offset_tj` and recompute the shortfall.
pub fn adjust_demand(days: &[ModelRow], offset_tj: f64) -> Vec<ModelRow> {
    days.iter()
        .map(|row| {
            let tj_demand = row.tj_demand + offset_tj;
            ModelRow {
                tj_demand,
                shortfall: row.tj_available.map(|a| a - tj_demand),
                ..row.clone()
            }
        })
        .collect()
}

/// Days where supply falls short of demand (`Shortfall < 0`). Days with an
/// unknown shortfall are not included.
pub fn shortfall_days(days: &[ModelRow]) -> Vec<&ModelRow> {
    days.iter()
        .filter(|row| row.shortfall.is_some_and(|s| s < 0.0))
        .collect()
}

/// Available capacity by facility for each gas day, the data behind a stacked
/// supply chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyStack {
    /// Column order for `StackDay::by_facility`, sorted by name.
    pub facilities: Vec<String>,
    pub days: Vec<StackDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackDay {
    pub gas_day: NaiveDate,
    /// One entry per `SupplyStack::facilities`; `None` where the facility had
    /// no row or no figure that day.
    pub by_facility: Vec<Option<f64>>,
    pub total: f64,
}

/// Pivot supply rows on or after `from` into a day × facility grid.
///
/// A facility appearing more than once on the same day (duplicate nameplate
/// entries) has its values summed. Rows without a facility name share the
/// [`UNNAMED_FACILITY`] column.
pub fn supply_stack(rows: &[SupplyProfileRow], from: NaiveDate) -> SupplyStack {
    let visible: Vec<&SupplyProfileRow> = rows.iter().filter(|r| r.gas_day >= from).collect();

    let facilities: Vec<String> = visible
        .iter()
        .map(|r| stack_label(r).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column: BTreeMap<&str, usize> = facilities
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut grid: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    for row in &visible {
        let cells = grid
            .entry(row.gas_day)
            .or_insert_with(|| vec![None; facilities.len()]);
        let cell = &mut cells[column[stack_label(row)]];
        if let Some(tj) = row.tj_available {
            *cell = Some(cell.unwrap_or(0.0) + tj);
        }
    }

    let days = grid
        .into_iter()
        .map(|(gas_day, by_facility)| StackDay {
            gas_day,
            total: by_facility.iter().flatten().sum(),
            by_facility,
        })
        .collect();

    SupplyStack { facilities, days }
}

fn stack_label(row: &SupplyProfileRow) -> &str {
    row.facility_name.as_deref().unwrap_or(UNNAMED_FACILITY)
}
