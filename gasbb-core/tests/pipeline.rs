//! End-to-end pipeline tests over an in-memory bulletin board.
//!
//! Tests:
//! 1. Worked example: supply 50 + 30 = 80, demand 70, shortfall 10
//! 2. Supply profile keeps one row per production outlook row
//! 3. A fresh cache is reused without touching the source
//! 4. Stale files are re-downloaded, forced refresh always downloads
//! 5. Schema drift surfaces as MissingColumn
//! 6. Source failures propagate instead of yielding an empty model
//! 7. Rows with a blank gas day or facility name

use chrono::NaiveDate;
use gasbb_core::data::{DataError, MemorySource, ReportCache, ReportKey};
use gasbb_core::{ModelBuilder, ModelConfig, ModelRow};
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

// ──────────────────────────────────────────────
// Fixtures
// ──────────────────────────────────────────────

const NAMEPLATE: &str = "\
FacilityName,FacilityType,NamePlateRating
FacilityA,Production,40
FacilityB,Production,30
Mondarra,Storage,150
";

const OUTLOOK: &str = "\
FacilityName,FacilityType,GasDay,Capacity
FacilityA,Production,2024/01/01,50
FacilityB,Production,2024/01/01,
DBNGP,Pipeline,2024/01/01,900
FacilityA,Production,2024/01/02,45
FacilityC,Production,2024/01/02,
";

const FLOWS: &str = "\
GasDay,ZoneType,ZoneName,Quantity
2024/01/01,Demand,Whole WA,60
2024/01/01,Demand,Whole WA,10
2024/01/01,Demand,Other Zone,999
2024/01/01,Production,Whole WA,500
2024/01/02,Demand,Whole WA,55
2024/01/03,Demand,Whole WA,20
";

fn bulletin_board(config: &ModelConfig) -> MemorySource {
    MemorySource::new()
        .with_report(config.files.nameplate.clone(), NAMEPLATE)
        .with_report(config.files.mto_future.clone(), OUTLOOK)
        .with_report(config.files.flows.clone(), FLOWS)
}

fn config_in(dir: &Path) -> ModelConfig {
    ModelConfig {
        cache_dir: dir.join("data_cache"),
        ..ModelConfig::default()
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn age_file(path: &Path, age: Duration) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

// ──────────────────────────────────────────────
// Model
// ──────────────────────────────────────────────

#[test]
fn worked_example_balances() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let model = ModelBuilder::new(&config, Box::new(bulletin_board(&config)))
        .build()
        .unwrap();

    assert_eq!(
        model.days,
        vec![
            ModelRow {
                gas_day: day(1),
                tj_available: Some(80.0),
                tj_demand: 70.0,
                shortfall: Some(10.0),
            },
            // FacilityC has neither outlook nor nameplate, so it adds nothing.
            ModelRow {
                gas_day: day(2),
                tj_available: Some(45.0),
                tj_demand: 55.0,
                shortfall: Some(-10.0),
            },
            ModelRow {
                gas_day: day(3),
                tj_available: None,
                tj_demand: 20.0,
                shortfall: None,
            },
        ]
    );
}

#[test]
fn supply_profile_matches_outlook_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let frames = ModelBuilder::new(&config, Box::new(bulletin_board(&config)))
        .build_frames()
        .unwrap();

    // Four production rows in the outlook; the pipeline row is dropped.
    assert_eq!(frames.supply.height(), 4);
    assert_eq!(frames.model.height(), 3);

    let model = gasbb_core::GasModel::from_frames(&frames).unwrap();
    let b = model
        .supply
        .iter()
        .find(|r| r.facility_name.as_deref() == Some("FacilityB"))
        .unwrap();
    assert_eq!(b.tj_available, Some(30.0));
    assert_eq!(b.tj_nameplate, Some(30.0));

    let c = model
        .supply
        .iter()
        .find(|r| r.facility_name.as_deref() == Some("FacilityC"))
        .unwrap();
    assert_eq!(c.tj_available, None);
    assert_eq!(c.tj_nameplate, None);
}

#[test]
fn region_selects_demand_zone() {
    let dir = tempfile::tempdir().unwrap();
    let config = ModelConfig {
        region: "Other Zone".into(),
        ..config_in(dir.path())
    };
    let model = ModelBuilder::new(&config, Box::new(bulletin_board(&config)))
        .build()
        .unwrap();

    assert_eq!(model.days.len(), 1);
    assert_eq!(model.days[0].tj_demand, 999.0);
    assert_eq!(model.days[0].shortfall, Some(80.0 - 999.0));
}

// ──────────────────────────────────────────────
// Rows with missing keys
// ──────────────────────────────────────────────

#[test]
fn blank_gas_days_are_left_out_of_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let outlook = format!("{OUTLOOK}FacilityA,Production,,20\n");
    let flows = format!("{FLOWS},Demand,Whole WA,5\n");
    let source = bulletin_board(&config)
        .with_report(config.files.mto_future.clone(), outlook)
        .with_report(config.files.flows.clone(), flows);

    let model = ModelBuilder::new(&config, Box::new(source))
        .build()
        .unwrap();

    assert_eq!(model.supply.len(), 4);
    assert_eq!(
        model.days.iter().map(|d| d.gas_day).collect::<Vec<_>>(),
        vec![day(1), day(2), day(3)]
    );
    assert_eq!(model.days[0].tj_available, Some(80.0));
    assert_eq!(model.days[0].tj_demand, 70.0);
    assert_eq!(model.days[0].shortfall, Some(10.0));
}

#[test]
fn unnamed_facility_still_counts_towards_supply() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let outlook = format!("{OUTLOOK},Production,2024/01/01,7\n");
    let source = bulletin_board(&config).with_report(config.files.mto_future.clone(), outlook);

    let model = ModelBuilder::new(&config, Box::new(source))
        .build()
        .unwrap();

    assert_eq!(model.supply.len(), 5);
    let unnamed = model
        .supply
        .iter()
        .find(|r| r.facility_name.is_none())
        .unwrap();
    assert_eq!(unnamed.gas_day, day(1));
    assert_eq!(unnamed.tj_available, Some(7.0));
    assert_eq!(unnamed.tj_nameplate, None);

    assert_eq!(model.days[0].tj_available, Some(87.0));
    assert_eq!(model.days[0].shortfall, Some(17.0));
}

// ──────────────────────────────────────────────
// Cache behaviour through the builder
// ──────────────────────────────────────────────

#[test]
fn fresh_cache_is_reused() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let source = bulletin_board(&config);

    ModelBuilder::new(&config, Box::new(source.clone()))
        .build()
        .unwrap();
    assert_eq!(source.requests(), 3);

    ModelBuilder::new(&config, Box::new(source.clone()))
        .build()
        .unwrap();
    assert_eq!(source.requests(), 3);
}

#[test]
fn cached_files_serve_without_a_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    ModelBuilder::new(&config, Box::new(bulletin_board(&config)))
        .build()
        .unwrap();

    // An empty source would 404 on any request.
    let model = ModelBuilder::new(&config, Box::new(MemorySource::new()))
        .build()
        .unwrap();
    assert_eq!(model.days[0].tj_available, Some(80.0));
}

#[test]
fn stale_report_is_downloaded_again() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let source = bulletin_board(&config);
    ModelBuilder::new(&config, Box::new(source.clone()))
        .build()
        .unwrap();

    let flows = config.cache_dir.join(&config.files.flows);
    age_file(&flows, Duration::from_secs(25 * 60 * 60));

    ModelBuilder::new(&config, Box::new(source.clone()))
        .build()
        .unwrap();
    assert_eq!(source.requests(), 4);
}

#[test]
fn forced_refresh_downloads_everything() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let source = bulletin_board(&config);
    ModelBuilder::new(&config, Box::new(source.clone()))
        .build()
        .unwrap();

    ModelBuilder::new(&config, Box::new(source.clone()))
        .force_refresh(true)
        .build()
        .unwrap();
    assert_eq!(source.requests(), 6);
}

#[test]
fn cache_status_after_build() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let builder = ModelBuilder::new(&config, Box::new(bulletin_board(&config)));
    builder.build().unwrap();

    let status = builder.loader().cache().status().unwrap();
    assert_eq!(status.len(), 3);
    assert!(status.iter().all(|r| r.cached && !r.stale));
    let flows = status.iter().find(|r| r.key == ReportKey::Flows).unwrap();
    assert_eq!(flows.size_bytes, Some(FLOWS.len() as u64));
}

// ──────────────────────────────────────────────
// Failures
// ──────────────────────────────────────────────

#[test]
fn missing_capacity_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let drifted = "FacilityName,FacilityType,GasDay,Cap\nFacilityA,Production,2024/01/01,50\n";
    let source = bulletin_board(&config).with_report(config.files.mto_future.clone(), drifted);

    let err = ModelBuilder::new(&config, Box::new(source))
        .build()
        .unwrap_err();
    match err {
        DataError::MissingColumn { report, column } => {
            assert_eq!(report, "mto_future");
            assert_eq!(column, "Capacity");
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn unreachable_report_fails_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let source = MemorySource::new()
        .with_report(config.files.nameplate.clone(), NAMEPLATE)
        .with_report(config.files.mto_future.clone(), OUTLOOK);

    let err = ModelBuilder::new(&config, Box::new(source))
        .build()
        .unwrap_err();
    assert!(matches!(err, DataError::HttpStatus { status: 404, .. }));
}

#[test]
fn refresh_replaces_cached_content() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let old = MemorySource::new().with_report(config.files.flows.clone(), "GasDay\n");
    let cache = ReportCache::from_config(&config, Box::new(old));
    let path = cache.resolve(ReportKey::Flows, false).unwrap();

    let cache = ReportCache::from_config(&config, Box::new(bulletin_board(&config)));
    let refreshed = cache.resolve(ReportKey::Flows, true).unwrap();

    assert_eq!(path, refreshed);
    assert_eq!(fs::read_to_string(&refreshed).unwrap(), FLOWS);
}
