//! gasbb CLI: model, refresh, supply stack, and cache commands.
//!
//! Commands:
//! - `model`: build the daily supply/demand balance and list shortfall days
//! - `refresh`: force re-download of the outlook and flow reports
//! - `supply`: print available capacity per facility per gas day
//! - `cache status`: report what the cache holds and whether it is stale

mod export;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use gasbb_core::data::{GbbSource, ReportCache};
use gasbb_core::scenario::{
    adjust_demand, consumer_offset, shortfall_days, supply_stack, CONSUMER_MAX_TJ,
};
use gasbb_core::{GasModel, ModelBuilder, ModelConfig, ModelRow, ReportKey};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gasbb",
    about = "gasbb: WA gas bulletin-board supply/demand model",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that touches the cache.
#[derive(Args, Clone)]
struct CommonArgs {
    /// Path to a TOML config file. Defaults apply for anything it omits.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cache directory. Overrides the config file.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Demand zone name (exact match). Overrides the config file.
    #[arg(long)]
    region: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the daily balance table and list shortfall days.
    Model {
        #[command(flatten)]
        common: CommonArgs,

        /// Re-download every report even if cached copies are fresh.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Add this many TJ/day to every day's demand.
        #[arg(long, allow_hyphen_values = true)]
        demand_adjust: Option<f64>,

        /// Large-consumer draw in TJ/day (0-100, baseline 80). Shifts demand by
        /// the difference from baseline.
        #[arg(long, conflicts_with = "demand_adjust")]
        consumer_tj: Option<f64>,

        /// Write the balance table to this CSV file.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Print the full model as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Force re-download of the outlook and flow reports.
    Refresh {
        #[command(flatten)]
        common: CommonArgs,

        /// Also re-download the nameplate report.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Print available capacity per facility for each gas day.
    Supply {
        #[command(flatten)]
        common: CommonArgs,

        /// First gas day to show (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        from: Option<String>,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report each cached file's size, age, and staleness.
    Status {
        #[command(flatten)]
        common: CommonArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Model {
            common,
            force,
            demand_adjust,
            consumer_tj,
            export,
            json,
        } => run_model(&common, force, demand_adjust, consumer_tj, export.as_deref(), json),
        Commands::Refresh { common, all } => run_refresh(&common, all),
        Commands::Supply { common, from } => run_supply(&common, from.as_deref()),
        Commands::Cache { action } => match action {
            CacheAction::Status { common } => run_cache_status(&common),
        },
    }
}

/// Logs go to stderr so table and JSON output stay clean on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(common: &CommonArgs) -> Result<ModelConfig> {
    let mut config = match &common.config {
        Some(path) => ModelConfig::from_file(path)?,
        None => ModelConfig::default(),
    };
    if let Some(dir) = &common.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let Some(region) = &common.region {
        config.region = region.clone();
    }
    Ok(config)
}

fn run_model(
    common: &CommonArgs,
    force: bool,
    demand_adjust: Option<f64>,
    consumer_tj: Option<f64>,
    export_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let offset = demand_offset(demand_adjust, consumer_tj)?;

    let config = load_config(common)?;
    let builder = ModelBuilder::from_config(&config)?.force_refresh(force);
    let mut model = builder.build().context("failed to build model")?;

    if offset != 0.0 {
        info!(offset_tj = offset, "adjusting demand");
        model.days = adjust_demand(&model.days, offset);
    }

    if let Some(path) = export_path {
        export::write_balance_csv(&model.days, path)?;
        info!(path = %path.display(), "exported balance table");
    }

    if json {
        println!("{}", export::model_json(&model)?);
    } else {
        print_balance(&config.region, &model);
    }
    Ok(())
}

/// TJ/day to add to demand: an explicit adjustment, or the large consumer's
/// draw relative to its baseline.
fn demand_offset(demand_adjust: Option<f64>, consumer_tj: Option<f64>) -> Result<f64> {
    match (demand_adjust, consumer_tj) {
        (Some(tj), _) => Ok(tj),
        (None, Some(tj)) => {
            if !(0.0..=CONSUMER_MAX_TJ).contains(&tj) {
                bail!("--consumer-tj must be between 0 and {CONSUMER_MAX_TJ}, got {tj}");
            }
            Ok(consumer_offset(tj))
        }
        (None, None) => Ok(0.0),
    }
}

fn print_balance(region: &str, model: &GasModel) {
    println!("Region: {region}");
    println!("Facilities: {}", distinct_facilities(model));
    println!();
    println!(
        "{:<12} {:>14} {:>12} {:>14}",
        "Gas Day", "Available TJ", "Demand TJ", "Shortfall TJ"
    );
    println!("{}", "-".repeat(55));
    for row in &model.days {
        println!(
            "{:<12} {:>14} {:>12.1} {:>14}",
            row.gas_day.to_string(),
            format_tj(row.tj_available),
            row.tj_demand,
            format_tj(row.shortfall),
        );
    }

    let deficits = shortfall_days(&model.days);
    println!();
    if deficits.is_empty() {
        println!("No shortfall days.");
        return;
    }
    println!("Shortfall days: {}", deficits.len());
    for row in deficits {
        print_deficit(row);
    }
}

fn print_deficit(row: &ModelRow) {
    if let Some(shortfall) = row.shortfall {
        println!("  {}  {:.1} TJ short", row.gas_day, -shortfall);
    }
}

fn distinct_facilities(model: &GasModel) -> usize {
    let mut names: Vec<&str> = model
        .supply
        .iter()
        .filter_map(|r| r.facility_name.as_deref())
        .collect();
    names.sort_unstable();
    names.dedup();
    names.len()
}

fn format_tj(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into())
}

fn run_refresh(common: &CommonArgs, all: bool) -> Result<()> {
    let config = load_config(common)?;
    let cache = open_cache(&config)?;

    let mut keys = vec![ReportKey::MtoFuture, ReportKey::Flows];
    if all {
        keys.push(ReportKey::Nameplate);
    }

    for key in keys {
        let path = cache.resolve(key, true)?;
        println!("{:<12} {}", key, path.display());
    }
    Ok(())
}

fn run_supply(common: &CommonArgs, from: Option<&str>) -> Result<()> {
    let from = from
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--from must be YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let config = load_config(common)?;
    let model = ModelBuilder::from_config(&config)?.build()?;
    let stack = supply_stack(&model.supply, from);

    if stack.days.is_empty() {
        println!("No supply outlook on or after {from}.");
        return Ok(());
    }

    println!("Available capacity (TJ) from {from}");
    println!();
    print!("{:<12}", "Gas Day");
    for name in &stack.facilities {
        print!(" {:>12}", truncate(name, 12));
    }
    println!(" {:>10}", "Total");
    println!("{}", "-".repeat(12 + 13 * stack.facilities.len() + 11));

    for day in &stack.days {
        print!("{:<12}", day.gas_day.to_string());
        for cell in &day.by_facility {
            print!(" {:>12}", format_tj(*cell));
        }
        println!(" {:>10.1}", day.total);
    }
    Ok(())
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        name.chars().take(width).collect()
    }
}

fn open_cache(config: &ModelConfig) -> Result<ReportCache> {
    let source = GbbSource::from_config(config)?;
    Ok(ReportCache::from_config(config, Box::new(source)))
}

fn run_cache_status(common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    let cache = open_cache(&config)?;

    if !cache.cache_dir().exists() {
        println!(
            "Cache directory does not exist: {}",
            cache.cache_dir().display()
        );
        return Ok(());
    }

    let reports = cache.status()?;
    let total_size: u64 = reports.iter().filter_map(|r| r.size_bytes).sum();

    println!("Cache: {}", cache.cache_dir().display());
    println!("Max age: {} h", config.max_age_hours);
    println!("Total size: {}", format_size(total_size));
    println!();
    println!(
        "{:<12} {:<42} {:>10} {:<20} {:<6}",
        "Report", "File", "Size", "Modified (UTC)", "State"
    );
    println!("{}", "-".repeat(94));
    for r in &reports {
        let size = r.size_bytes.map(format_size).unwrap_or_else(|| "-".into());
        let modified = r
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        let state = match (r.cached, r.stale) {
            (false, _) => "absent",
            (true, true) => "stale",
            (true, false) => "fresh",
        };
        println!(
            "{:<12} {:<42} {:>10} {:<20} {:<6}",
            r.key, r.filename, size, modified, state
        );
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
