//! Canonical demographic attributes carried by a tract record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One demographic measurement tracked per tract and year.
///
/// The first five variants are the scoring attributes, in scoring order.
/// `TotalPopulation` is only used for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "Median_Household_Income")]
    MedianHouseholdIncome,
    #[serde(rename = "Median_Home_Value")]
    MedianHomeValue,
    #[serde(rename = "Median_Gross_Rent")]
    MedianGrossRent,
    #[serde(rename = "Vacant Units")]
    VacantUnits,
    #[serde(rename = "25_Plus_Bachelors_Degree_Or_Higher_Count")]
    BachelorsOrHigher,
    #[serde(rename = "Estimate!!Total")]
    TotalPopulation,
}

/// Display unit for an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    Dollars,
    Units,
    People,
}

impl Attribute {
    /// Attributes used by the score engine. Order matters: the last entry
    /// has its log term negated.
    pub const SCORING: [Attribute; 5] = [
        Attribute::MedianHouseholdIncome,
        Attribute::MedianHomeValue,
        Attribute::MedianGrossRent,
        Attribute::VacantUnits,
        Attribute::BachelorsOrHigher,
    ];

    pub const ALL: [Attribute; 6] = [
        Attribute::MedianHouseholdIncome,
        Attribute::MedianHomeValue,
        Attribute::MedianGrossRent,
        Attribute::VacantUnits,
        Attribute::BachelorsOrHigher,
        Attribute::TotalPopulation,
    ];

    /// Column name used in source CSVs and serialized output.
    pub fn column_name(self) -> &'static str {
        match self {
            Attribute::MedianHouseholdIncome => "Median_Household_Income",
            Attribute::MedianHomeValue => "Median_Home_Value",
            Attribute::MedianGrossRent => "Median_Gross_Rent",
            Attribute::VacantUnits => "Vacant Units",
            Attribute::BachelorsOrHigher => "25_Plus_Bachelors_Degree_Or_Higher_Count",
            Attribute::TotalPopulation => "Estimate!!Total",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Attribute::MedianHouseholdIncome => "median_household_income",
            Attribute::MedianHomeValue => "median_home_value",
            Attribute::MedianGrossRent => "median_gross_rent",
            Attribute::VacantUnits => "vacant_units",
            Attribute::BachelorsOrHigher => "bachelors_or_higher",
            Attribute::TotalPopulation => "total_population",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Attribute::MedianHouseholdIncome => "Median Household Income",
            Attribute::MedianHomeValue => "Median Home Value",
            Attribute::MedianGrossRent => "Gross Rent",
            Attribute::VacantUnits => "Vacant Units",
            Attribute::BachelorsOrHigher => "Educational Attainment",
            Attribute::TotalPopulation => "Total Population",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Attribute::MedianHouseholdIncome
            | Attribute::MedianHomeValue
            | Attribute::MedianGrossRent => Unit::Dollars,
            Attribute::VacantUnits => Unit::Units,
            Attribute::BachelorsOrHigher | Attribute::TotalPopulation => Unit::People,
        }
    }

    /// `true` when rising values count against gentrification relative to
    /// the county, so the log term is flipped before summing.
    pub fn inverted(self) -> bool {
        self == Attribute::BachelorsOrHigher
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Attribute {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Attribute::ALL
            .into_iter()
            .find(|a| a.column_name() == s || a.key() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown attribute '{s}'"))
    }
}

/// A measurement only counts when it is present, numeric and strictly
/// positive. Zero is the census suppression sentinel, not a real reading.
pub fn is_valid_measurement(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite() && v > 0.0)
}
