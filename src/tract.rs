use serde::Serialize;
use std::ops::RangeInclusive;

use crate::attribute::Attribute;

/// Survey years the dataset covers.
pub const YEARS: RangeInclusive<i32> = 2010..=2023;

/// One census tract in one year, merged from every attribute source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TractRecord {
    pub tract_id: String,
    pub year: i32,

    // scoring attributes
    pub median_household_income: Option<f64>,
    pub median_home_value: Option<f64>,
    pub median_gross_rent: Option<f64>,
    pub vacant_units: Option<f64>,
    pub bachelors_or_higher: Option<f64>,

    // presentation only
    pub total_population: Option<f64>,
}

impl TractRecord {
    pub fn new(tract_id: impl Into<String>, year: i32) -> Self {
        TractRecord {
            tract_id: tract_id.into(),
            year,
            ..Default::default()
        }
    }

    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::MedianHouseholdIncome => self.median_household_income,
            Attribute::MedianHomeValue => self.median_home_value,
            Attribute::MedianGrossRent => self.median_gross_rent,
            Attribute::VacantUnits => self.vacant_units,
            Attribute::BachelorsOrHigher => self.bachelors_or_higher,
            Attribute::TotalPopulation => self.total_population,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: Option<f64>) {
        let slot = match attribute {
            Attribute::MedianHouseholdIncome => &mut self.median_household_income,
            Attribute::MedianHomeValue => &mut self.median_home_value,
            Attribute::MedianGrossRent => &mut self.median_gross_rent,
            Attribute::VacantUnits => &mut self.vacant_units,
            Attribute::BachelorsOrHigher => &mut self.bachelors_or_higher,
            Attribute::TotalPopulation => &mut self.total_population,
        };
        *slot = value;
    }

    /// Builder-style setter, mostly for assembling records by hand.
    pub fn with(mut self, attribute: Attribute, value: f64) -> Self {
        self.set(attribute, Some(value));
        self
    }
}

/// Canonicalizes a raw tract identifier so ids from different source
/// files compare equal.
///
/// Any `.` is stripped first, then the digit string is padded by length:
///
/// | Length | Result              |
/// |--------|---------------------|
/// | 3      | `"0" + digits + "00"` |
/// | 4      | `digits + "00"`     |
/// | 5      | `"0" + digits`      |
/// | other  | unchanged           |
///
/// The branches are irregular on purpose: boundary files key their
/// polygons on exactly these strings.
pub fn normalize_tract_id(raw: &str) -> String {
    let digits: String = raw.trim().chars().filter(|c| *c != '.').collect();
    match digits.len() {
        3 => format!("0{digits}00"),
        4 => format!("{digits}00"),
        5 => format!("0{digits}"),
        _ => digits,
    }
}

/// Parses a raw cell into a measurement. Blank, non-numeric and
/// non-finite cells are missing; zero and negatives are kept as-is.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parses a survey year, accepting float-formatted cells like `2015.0`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    let year = match raw.parse::<i32>() {
        Ok(y) => y,
        Err(_) => {
            let f = raw.parse::<f64>().ok()?;
            if f.fract() != 0.0 {
                return None;
            }
            f as i32
        }
    };
    YEARS.contains(&year).then_some(year)
}
