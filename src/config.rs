use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::attribute::Attribute;
use crate::store::SourceDescriptor;

/// Default attribute files of a data directory.
const DEFAULT_FILES: [(Attribute, &str); 6] = [
    (Attribute::BachelorsOrHigher, "edu_attain.csv"),
    (Attribute::MedianGrossRent, "gross_rent.csv"),
    (Attribute::MedianHomeValue, "home_value.csv"),
    (Attribute::MedianHouseholdIncome, "house_income.csv"),
    (Attribute::TotalPopulation, "total_pop.csv"),
    (Attribute::VacantUnits, "vac_status.csv"),
];

/// Which sources feed the attribute store.
///
/// Stored as JSON on disk:
/// ```json
/// {
///   "sources": [
///     { "attribute": "Median_Gross_Rent", "location": "data/gross_rent.csv" },
///     { "attribute": "Vacant Units", "location": "https://example.org/vac.csv.gz",
///       "value_column": "Vacant" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub sources: Vec<SourceDescriptor>,
}

impl SourceConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read source config '{path}'"))?;
        let config: SourceConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid source config '{path}'"))?;
        Ok(config)
    }

    /// The six standard attribute files inside `dir`.
    pub fn default_for_dir(dir: &str) -> Self {
        let sources = DEFAULT_FILES
            .iter()
            .map(|(attribute, file)| {
                let location = Path::new(dir).join(file).to_string_lossy().into_owned();
                SourceDescriptor::new(*attribute, location)
            })
            .collect();
        Self { sources }
    }

    /// Scoring attributes that no configured source provides.
    pub fn missing_scoring_attributes(&self) -> Vec<Attribute> {
        Attribute::SCORING
            .into_iter()
            .filter(|a| !self.sources.iter().any(|s| s.attribute == *a))
            .collect()
    }
}
