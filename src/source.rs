//! Loading attribute tables from local files or HTTP.
//!
//! Sources are fetched concurrently and joined once; everything after
//! that works on fully materialized tables.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::store::{RawRow, SourceDescriptor, SourceTable};

/// Reads the raw bytes of a source from disk or over HTTP, inflating
/// `.gz` payloads.
#[tracing::instrument(skip_all, fields(location = %location))]
pub async fn fetch_bytes(location: &str) -> Result<Vec<u8>> {
    let bytes = if location.starts_with("http://") || location.starts_with("https://") {
        let response = reqwest::get(location)
            .await
            .with_context(|| format!("request to '{location}' failed"))?
            .error_for_status()?;
        response.bytes().await?.to_vec()
    } else {
        tokio::fs::read(location)
            .await
            .with_context(|| format!("failed to read '{location}'"))?
    };

    debug!(bytes = bytes.len(), "Source bytes received");

    if location.ends_with(".gz") {
        gunzip(&bytes).with_context(|| format!("failed to decompress '{location}'"))
    } else {
        Ok(bytes)
    }
}

fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut decoded)?;
    Ok(decoded)
}

/// Parses CSV bytes into a [`SourceTable`]. The header row names the
/// columns; short rows simply lack the trailing fields.
pub fn parse_table(descriptor: SourceDescriptor, bytes: &[u8]) -> Result<SourceTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("{}: malformed row {}", descriptor.location, line + 2))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(SourceTable { descriptor, rows })
}

pub async fn load_table(descriptor: SourceDescriptor) -> Result<SourceTable> {
    let bytes = fetch_bytes(&descriptor.location).await?;
    parse_table(descriptor, &bytes)
}

/// Loads every configured source concurrently and waits for all of them.
/// Fails if any single source fails.
#[tracing::instrument(skip(config), fields(sources = config.sources.len()))]
pub async fn load_all(config: &SourceConfig) -> Result<Vec<SourceTable>> {
    let tasks: Vec<_> = config
        .sources
        .iter()
        .cloned()
        .map(|descriptor| tokio::spawn(load_table(descriptor)))
        .collect();

    let mut tables = Vec::with_capacity(tasks.len());
    for task in tasks {
        let table = task.await??;
        info!(
            attribute = %table.descriptor.attribute,
            location = %table.descriptor.location,
            rows = table.rows.len(),
            "Source loaded"
        );
        tables.push(table);
    }

    Ok(tables)
}
