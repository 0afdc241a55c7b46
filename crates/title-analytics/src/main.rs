//! CLI entry point for the title catalog analytics.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use std::path::PathBuf;
use title_analytics::{
    AnalyticsConfig, CatalogFilter, CountryMode, DashboardSpec, FrequencyEntry, LoadedCatalog,
    Statistic, TitleKind, ViewOutput, ViewResult, load_catalog, write_csv,
};
use tracing::{debug, info};

/// Environment variable consulted when `--input` is not given.
const INPUT_ENV_VAR: &str = "TITLE_CATALOG_PATH";

/// CLI-compatible title type enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliKind {
    /// Feature films
    Movie,
    /// Series
    TvShow,
}

impl From<CliKind> for TitleKind {
    fn from(cli: CliKind) -> Self {
        match cli {
            CliKind::Movie => TitleKind::Movie,
            CliKind::TvShow => TitleKind::TvShow,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Descriptive analytics over a movie and TV title catalog",
    long_about = "Loads a title catalog CSV, applies optional filters and prints \
                  dashboard views.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  TITLE_CATALOG_PATH    Catalog CSV used when --input is not given\n\n\
                  EXAMPLES:\n  \
                  # Default dashboard\n  \
                  title-analytics -i titles.csv\n\n  \
                  # Indian movies added 2015-2020\n  \
                  title-analytics -i titles.csv --kind movie --country India \
                  --year-from 2015 --year-to 2020\n\n  \
                  # Machine-readable output\n  \
                  title-analytics -i titles.csv --json | jq '.views[0]'"
)]
struct Args {
    /// Path to the catalog CSV file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Keep only titles of this type (repeatable)
    #[arg(long, value_enum)]
    kind: Vec<CliKind>,

    /// Keep only titles from this country (repeatable)
    #[arg(long)]
    country: Vec<String>,

    /// First year added to keep (inclusive)
    #[arg(long)]
    year_from: Option<i32>,

    /// Last year added to keep (inclusive)
    #[arg(long)]
    year_to: Option<i32>,

    /// Treat comma-separated country cells as several countries
    #[arg(long)]
    split_countries: bool,

    /// Default number of entries in ranked views
    #[arg(long, default_value = "10")]
    top: usize,

    /// Default number of histogram bins
    #[arg(long, default_value = "30")]
    bins: usize,

    /// Count missing values under an "Unknown" bucket in frequency views
    #[arg(long)]
    include_unknown: bool,

    /// Dashboard definition as JSON (defaults to the built-in dashboard)
    #[arg(long)]
    views: Option<PathBuf>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the filtered, normalized catalog to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    let input = resolve_input(&args)?;

    let config = AnalyticsConfig::builder()
        .top_n(args.top)
        .histogram_bins(args.bins)
        .country_mode(if args.split_countries {
            CountryMode::Split
        } else {
            CountryMode::Atomic
        })
        .build()?;

    let dashboard = match &args.views {
        Some(path) => DashboardSpec::from_json_file(path)?,
        None => DashboardSpec::default_dashboard(),
    };
    let dashboard = with_unknown_buckets(dashboard, args.include_unknown);

    let loaded = match load_catalog(&input) {
        Ok(loaded) => loaded,
        Err(e) if e.is_data_source_not_found() => {
            return Err(anyhow!(
                "Catalog file not found: {}. Pass --input or set {}.",
                input.display(),
                INPUT_ENV_VAR
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let filter = build_filter(&args)?;
    let aggregator = title_analytics::Aggregator::new(&config);
    let filtered = aggregator.filter(&loaded.catalog, &filter);
    info!(
        "Filter kept {} of {} records",
        filtered.len(),
        loaded.catalog.len()
    );

    let results = dashboard.evaluate(&config, &filtered)?;

    if let Some(path) = &args.export {
        write_csv(&filtered, path).with_context(|| format!("exporting to {}", path.display()))?;
    }

    if args.json {
        let report = serde_json::json!({
            "source": input,
            "records": loaded.catalog.len(),
            "skipped_rows": loaded.skipped_rows,
            "filtered_records": filtered.len(),
            "filter": filter,
            "views": results,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&loaded, filtered.len(), &results);
    }

    Ok(())
}

/// Input path from `--input`, falling back to the environment.
fn resolve_input(args: &Args) -> Result<PathBuf> {
    if let Some(path) = &args.input {
        return Ok(path.clone());
    }
    match std::env::var(INPUT_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => {
            debug!("Using {} from environment", INPUT_ENV_VAR);
            Ok(PathBuf::from(path))
        }
        _ => Err(anyhow!(
            "No catalog given. Pass --input <PATH> or set {}.",
            INPUT_ENV_VAR
        )),
    }
}

fn build_filter(args: &Args) -> Result<CatalogFilter> {
    let mut filter = CatalogFilter::new();
    if !args.kind.is_empty() {
        filter = filter.kinds(args.kind.iter().map(|k| TitleKind::from(*k)));
    }
    if !args.country.is_empty() {
        filter = filter.countries(args.country.iter().cloned());
    }
    match (args.year_from, args.year_to) {
        (None, None) => {}
        (from, to) => {
            let from = from.unwrap_or(i32::MIN);
            let to = to.unwrap_or(i32::MAX);
            if from > to {
                return Err(anyhow!(
                    "--year-from ({}) is after --year-to ({})",
                    from,
                    to
                ));
            }
            filter = filter.year_added(from, to);
        }
    }
    Ok(filter)
}

/// Switch frequency and percentage views to bucket missing values.
fn with_unknown_buckets(mut dashboard: DashboardSpec, include_unknown: bool) -> DashboardSpec {
    if !include_unknown {
        return dashboard;
    }
    for view in &mut dashboard.views {
        match &mut view.query {
            title_analytics::ViewQuery::Frequency {
                include_unknown, ..
            }
            | title_analytics::ViewQuery::Percentage {
                include_unknown, ..
            } => *include_unknown = true,
            _ => {}
        }
    }
    dashboard
}

/// Print a human-readable dashboard.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_summary(loaded: &LoadedCatalog, filtered: usize, results: &[ViewResult]) {
    println!("\n{}", "=".repeat(80));
    println!("TITLE CATALOG ANALYTICS");
    println!("{}", "=".repeat(80));
    if let Some(source) = &loaded.source {
        println!("  Source: {}", source.display());
    }
    println!(
        "  Records: {} ({} rows skipped), {} after filters",
        loaded.catalog.len(),
        loaded.skipped_rows,
        filtered
    );
    println!();

    for result in results {
        println!("{}", result.title.to_uppercase());
        println!("{}", "-".repeat(40));
        match &result.output {
            ViewOutput::Headline(m) => {
                println!("  Total titles: {}", m.total);
                println!("  Movies:       {}", m.movies);
                println!("  TV shows:     {}", m.tv_shows);
            }
            ViewOutput::Frequency(entries) => print_entries(entries),
            ViewOutput::CrossTab(cells) => {
                if cells.is_empty() {
                    println!("  (no data)");
                }
                for cell in cells {
                    println!(
                        "  {:<30} {:>6}",
                        format!("{} / {}", truncate_str(&cell.a, 12), truncate_str(&cell.b, 14)),
                        cell.count
                    );
                }
            }
            ViewOutput::Percentage(table) => {
                if table.is_empty() {
                    println!("  (no data)");
                }
                for entry in &table.entries {
                    println!(
                        "  {:<30} {:>6} {:>6.1}%",
                        truncate_str(&entry.key, 29),
                        entry.count,
                        entry.percentage
                    );
                }
            }
            ViewOutput::TimeSeries(series) => {
                if series.buckets.is_empty() {
                    println!("  (no data)");
                }
                for bucket in &series.buckets {
                    println!("  {:<30} {:>6}", bucket.label, bucket.count);
                }
            }
            ViewOutput::Mean(stat) => match stat {
                Statistic::Value(v) => println!("  {:.2}", v),
                Statistic::Undefined => println!("  undefined (no values)"),
            },
            ViewOutput::Histogram(hist) => {
                if hist.is_empty() {
                    println!("  (no data)");
                }
                for bin in hist.bins.iter().filter(|b| b.count > 0) {
                    println!(
                        "  {:>8.1} - {:<8.1} {:>6}",
                        bin.lower, bin.upper, bin.count
                    );
                }
            }
        }
        println!();
    }

    println!("{}", "=".repeat(80));
}

fn print_entries(entries: &[FrequencyEntry]) {
    if entries.is_empty() {
        println!("  (no data)");
    }
    for entry in entries {
        println!("  {:<30} {:>6}", truncate_str(&entry.key, 29), entry.count);
    }
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
