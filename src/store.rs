//! Merges independently sourced attribute tables into one record per
//! `(tract, year)` for a single county.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::attribute::Attribute;
use crate::tract::{TractRecord, normalize_tract_id, parse_measurement, parse_year};

/// One CSV row keyed by header name.
pub type RawRow = HashMap<String, String>;

/// Where a source lives and which of its columns carry the merge key and
/// the one attribute it contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub attribute: Attribute,
    pub location: String,
    #[serde(default = "default_county_column")]
    pub county_column: String,
    #[serde(default = "default_tract_column")]
    pub tract_column: String,
    #[serde(default = "default_year_column")]
    pub year_column: String,
    /// Falls back to the attribute's canonical column name.
    #[serde(default)]
    pub value_column: Option<String>,
}

fn default_county_column() -> String {
    "County".to_string()
}

fn default_tract_column() -> String {
    "Tract ID".to_string()
}

fn default_year_column() -> String {
    "Year".to_string()
}

impl SourceDescriptor {
    /// Descriptor using the standard column layout of the preprocessed files.
    pub fn new(attribute: Attribute, location: impl Into<String>) -> Self {
        SourceDescriptor {
            attribute,
            location: location.into(),
            county_column: default_county_column(),
            tract_column: default_tract_column(),
            year_column: default_year_column(),
            value_column: None,
        }
    }

    pub fn value_column(&self) -> &str {
        self.value_column
            .as_deref()
            .unwrap_or_else(|| self.attribute.column_name())
    }
}

/// A loaded source: its descriptor plus every row.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub descriptor: SourceDescriptor,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub rows_read: usize,
    pub rows_matched: usize,
    pub rows_skipped: usize,
}

/// Accumulates tract records for one county across any number of sources.
pub struct AttributeStore {
    county: String,
    records: HashMap<(String, i32), TractRecord>,
}

impl AttributeStore {
    pub fn new(county: &str) -> Self {
        Self {
            county: county.trim().to_string(),
            records: HashMap::new(),
        }
    }

    pub fn county(&self) -> &str {
        &self.county
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Folds one source into the store. Rows for other counties are
    /// ignored; rows without a usable tract id or year are skipped.
    pub fn ingest(&mut self, table: &SourceTable) -> IngestSummary {
        let d = &table.descriptor;
        let value_column = d.value_column();
        let mut summary = IngestSummary::default();

        for row in &table.rows {
            summary.rows_read += 1;

            let county = row.get(&d.county_column).map(|c| c.trim());
            if county != Some(self.county.as_str()) {
                continue;
            }

            let tract_id = row
                .get(&d.tract_column)
                .map(|t| normalize_tract_id(t))
                .unwrap_or_default();
            let year = row.get(&d.year_column).and_then(|y| parse_year(y));

            let Some(year) = year.filter(|_| !tract_id.is_empty()) else {
                summary.rows_skipped += 1;
                continue;
            };

            let value = row.get(value_column).and_then(|v| parse_measurement(v));

            self.records
                .entry((tract_id.clone(), year))
                .or_insert_with(|| TractRecord::new(tract_id, year))
                .set(d.attribute, value);

            summary.rows_matched += 1;
        }

        debug!(
            attribute = %d.attribute,
            location = %d.location,
            county = %self.county,
            rows_read = summary.rows_read,
            rows_matched = summary.rows_matched,
            rows_skipped = summary.rows_skipped,
            "Source ingested"
        );

        summary
    }

    /// Returns the merged records ordered by numeric tract id, then year.
    pub fn into_records(self) -> Vec<TractRecord> {
        let mut records: Vec<TractRecord> = self.records.into_values().collect();
        records.sort_by(|a, b| {
            tract_sort_key(&a.tract_id)
                .cmp(&tract_sort_key(&b.tract_id))
                .then(a.year.cmp(&b.year))
        });
        records
    }
}

fn tract_sort_key(tract_id: &str) -> (u64, &str) {
    (tract_id.parse().unwrap_or(u64::MAX), tract_id)
}

/// Merges every table into the records of `county`.
pub fn merge_sources(county: &str, tables: &[SourceTable]) -> Vec<TractRecord> {
    let mut store = AttributeStore::new(county);
    for table in tables {
        store.ingest(table);
    }
    store.into_records()
}
