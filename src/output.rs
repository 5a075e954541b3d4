//! Output formatting and persistence for score reports.
//!
//! Supports pretty JSON logging, JSON files (optionally gzipped) and a flat
//! CSV of score records.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::scoring::types::ScoreRecord;

/// Everything the map needs for one county: every scored transition.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub schema_version: u8,
    pub algorithm_version: u8,
    pub county: String,
    pub county_fips: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub years: Vec<i32>,
    pub scored: usize,
    pub incomplete: usize,
    pub scores: Vec<ScoreRecord>,
}

impl ScoreReport {
    pub fn new(
        county: &str,
        county_fips: Option<&str>,
        years: Vec<i32>,
        scores: Vec<ScoreRecord>,
    ) -> Self {
        let scored = scores.iter().filter(|s| s.score.is_some()).count();
        ScoreReport {
            schema_version: 1,
            algorithm_version: 1,
            county: county.to_string(),
            county_fips: county_fips.map(str::to_string),
            generated_at: Utc::now(),
            years,
            scored,
            incomplete: scores.len() - scored,
            scores,
        }
    }
}

/// Flat CSV shape of a [`ScoreRecord`].
#[derive(Serialize)]
struct ScoreRow<'a> {
    tract_id: &'a str,
    year: i32,
    score: Option<f64>,
    invalid_attributes: String,
}

impl<'a> From<&'a ScoreRecord> for ScoreRow<'a> {
    fn from(record: &'a ScoreRecord) -> Self {
        ScoreRow {
            tract_id: &record.tract_id,
            year: record.year,
            score: record.score,
            invalid_attributes: record
                .invalid_attributes
                .iter()
                .map(|a| a.column_name())
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Creates the directory `path` will be written into, if it has one.
fn create_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
    }
    Ok(())
}

/// Writes `value` as JSON to `path`, gzip-compressed when `gzip` is set.
pub fn write_json(path: &str, value: &impl Serialize, gzip: bool) -> Result<()> {
    create_parent_dir(path)?;

    let body = serde_json::to_vec(value)?;
    let body = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        encoder.finish()?
    } else {
        body
    };

    std::fs::write(path, &body).with_context(|| format!("failed to write '{path}'"))?;
    debug!(path, bytes = body.len(), gzip, "JSON written");
    Ok(())
}

/// Writes score records to a CSV file, replacing any existing file.
pub fn write_scores_csv(path: &str, scores: &[ScoreRecord]) -> Result<()> {
    create_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("failed to create '{path}'"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for record in scores {
        writer.serialize(ScoreRow::from(record))?;
    }
    writer.flush()?;

    debug!(path, rows = scores.len(), "Score CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;
    use std::io::Read;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_scores() -> Vec<ScoreRecord> {
        vec![
            ScoreRecord {
                tract_id: "010800".to_string(),
                year: 2015,
                score: Some(0.25),
                invalid_attributes: vec![],
            },
            ScoreRecord {
                tract_id: "010900".to_string(),
                year: 2015,
                score: None,
                invalid_attributes: vec![Attribute::MedianGrossRent, Attribute::VacantUnits],
            },
        ]
    }

    #[test]
    fn test_report_counts() {
        let report = ScoreReport::new("Marin", Some("06041"), vec![2014, 2015], sample_scores());
        assert_eq!(report.scored, 1);
        assert_eq!(report.incomplete, 1);
        assert_eq!(report.county_fips.as_deref(), Some("06041"));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_scores()).unwrap();
    }

    #[test]
    fn test_write_json_undefined_score_is_null() {
        let path = temp_path("tract_gentrify_test_report.json");
        let _ = fs::remove_file(&path);

        let report = ScoreReport::new("Marin", None, vec![2015], sample_scores());
        write_json(&path, &report, false).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["scores"][0]["score"], 0.25);
        assert!(json["scores"][1]["score"].is_null());
        assert_eq!(
            json["scores"][1]["invalid_attributes"][0],
            "Median_Gross_Rent"
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_gzip() {
        let path = temp_path("tract_gentrify_test_report.json.gz");
        let _ = fs::remove_file(&path);

        write_json(&path, &sample_scores(), true).unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert!(decoded.contains("\"010800\""));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_scores_csv() {
        let path = temp_path("tract_gentrify_test_scores.csv");
        let _ = fs::remove_file(&path);

        write_scores_csv(&path, &sample_scores()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "tract_id,year,score,invalid_attributes");
        assert_eq!(lines[1], "010800,2015,0.25,");
        assert_eq!(lines[2], "010900,2015,,Median_Gross_Rent;Vacant Units");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_writers_create_missing_directories() {
        let dir = temp_path("tract_gentrify_test_nested");
        let _ = fs::remove_dir_all(&dir);
        let json_path = format!("{dir}/json/report.json");
        let csv_path = format!("{dir}/csv/scores.csv");

        write_json(&json_path, &sample_scores(), false).unwrap();
        write_scores_csv(&csv_path, &sample_scores()).unwrap();

        assert!(Path::new(&json_path).is_file());
        let content = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().count(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }
}
