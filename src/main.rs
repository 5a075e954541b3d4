//! CLI entry point for the tract gentrification scorer.
//!
//! Provides subcommands for scoring a county's tracts over every year
//! transition, inspecting countywide medians, and dumping one tract's
//! time series.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tract_gentrify::{
    config::SourceConfig,
    counties::{BAY_AREA_COUNTIES, canonical_county, county_fips, tract_geoid},
    output::{ScoreReport, print_json, write_json, write_scores_csv},
    scoring::timeline::CountySession,
    scoring::types::{ScoreLookup, ScoreRecord},
    source::load_all,
    store::AttributeStore,
    summary::{StreamPoint, median_table, stream_series},
    tract::{TractRecord, normalize_tract_id},
};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "tract_gentrify")]
#[command(about = "Scores gentrification of census tracts over time", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// County to load (e.g. "San Francisco")
    #[arg(short, long)]
    county: String,

    /// Directory holding the standard attribute CSVs
    #[arg(short = 'd', long, default_value = "data")]
    data_dir: String,

    /// JSON source config; overrides --data-dir
    #[arg(long)]
    config: Option<String>,
}

impl SourceArgs {
    fn source_config(&self) -> Result<SourceConfig> {
        match &self.config {
            Some(path) => SourceConfig::load(path),
            None => Ok(SourceConfig::default_for_dir(&self.data_dir)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score every tract of a county for every year transition
    Score {
        #[command(flatten)]
        sources: SourceArgs,

        /// JSON report to write
        #[arg(short, long, default_value = "scores.json")]
        output: String,

        /// Optional: also write the scores as CSV
        #[arg(long)]
        csv: Option<String>,

        /// Gzip compress the JSON report
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Only keep scores for this year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Show countywide medians for one year
    Medians {
        #[command(flatten)]
        sources: SourceArgs,

        #[arg(short, long)]
        year: i32,
    },
    /// Show one tract's attribute history and scores
    Tract {
        #[command(flatten)]
        sources: SourceArgs,

        /// Tract id in any source format (e.g. "108", "4001.01")
        #[arg(short, long)]
        tract_id: String,
    },
    /// List known counties
    Counties,
}

#[derive(Serialize)]
struct TractReport<'a> {
    tract_id: String,
    geoid: Option<String>,
    records: Vec<&'a TractRecord>,
    stream: Vec<StreamPoint>,
    scores: Vec<&'a ScoreRecord>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/tract_gentrify.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("tract_gentrify.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            sources,
            output,
            csv,
            gzip,
            year,
        } => {
            let session = load_session(&sources).await?;
            let scores: Vec<ScoreRecord> = match year {
                Some(year) => session.scores_for_year(year).into_iter().cloned().collect(),
                None => session.scores().to_vec(),
            };

            let report = ScoreReport::new(
                session.county(),
                county_fips(session.county()),
                session.years(),
                scores,
            );
            info!(
                county = %report.county,
                scored = report.scored,
                incomplete = report.incomplete,
                "Score summary"
            );

            write_json(&output, &report, gzip)?;
            info!(path = %output, gzip, "Report written");

            if let Some(csv_path) = csv {
                write_scores_csv(&csv_path, &report.scores)?;
                info!(path = %csv_path, "Score CSV written");
            }
        }
        Commands::Medians { sources, year } => {
            let session = load_session(&sources).await?;
            let records = session.year_slice(year);
            if records.is_empty() {
                warn!(year, years = ?session.years(), "No records for year");
            }

            for row in median_table(&records) {
                info!(
                    year,
                    attribute = row.label,
                    median = %row.display,
                    "County median"
                );
            }
        }
        Commands::Tract { sources, tract_id } => {
            let session = load_session(&sources).await?;
            let tract_id = normalize_tract_id(&tract_id);
            let records = session.tract_series(&tract_id);
            if records.is_empty() {
                warn!(tract_id = %tract_id, "Tract not found");
            }

            for year in session.years() {
                match session.lookup(&tract_id, year) {
                    ScoreLookup::Absent => {}
                    ScoreLookup::Incomplete(invalid) => {
                        info!(year, invalid = ?invalid, "Incomplete data")
                    }
                    ScoreLookup::Scored(score) => info!(year, score, "Scored"),
                }
            }

            let report = TractReport {
                geoid: county_fips(session.county()).map(|fips| tract_geoid(fips, &tract_id)),
                stream: stream_series(&records),
                scores: session
                    .scores()
                    .iter()
                    .filter(|s| s.tract_id == tract_id)
                    .collect(),
                records,
                tract_id,
            };
            print_json(&report)?;
        }
        Commands::Counties => {
            for (name, fips) in BAY_AREA_COUNTIES {
                info!(county = name, fips, "County");
            }
        }
    }

    Ok(())
}

/// Loads every source, merges the rows of one county, and wraps the
/// result in a session.
#[tracing::instrument(skip(sources), fields(county = %sources.county))]
async fn load_session(sources: &SourceArgs) -> Result<CountySession> {
    let county = canonical_county(&sources.county);
    if county_fips(&county).is_none() {
        warn!("County is not one of the known Bay Area counties");
    }

    let config = sources.source_config()?;
    let missing = config.missing_scoring_attributes();
    if !missing.is_empty() {
        warn!(missing = ?missing, "No source for some scoring attributes; every tract will be incomplete");
    }

    let tables = load_all(&config).await?;

    let mut store = AttributeStore::new(&county);
    for table in &tables {
        store.ingest(table);
    }

    let records = store.into_records();
    if records.is_empty() {
        warn!("No rows matched the county");
    }
    info!(records = records.len(), "County records merged");

    Ok(CountySession::new(county, records))
}
