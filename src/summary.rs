//! Data behind the county dashboards: the median table and the per-tract
//! stream graph series.

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;

use crate::attribute::{Attribute, Unit, is_valid_measurement};
use crate::scoring::median::county_medians;
use crate::tract::TractRecord;

/// Row order of the median table.
const TABLE_ORDER: [Attribute; 6] = [
    Attribute::TotalPopulation,
    Attribute::MedianHomeValue,
    Attribute::MedianHouseholdIncome,
    Attribute::VacantUnits,
    Attribute::BachelorsOrHigher,
    Attribute::MedianGrossRent,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianRow {
    pub attribute: Attribute,
    pub label: &'static str,
    pub unit: Unit,
    pub median: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamPoint {
    pub year: i32,
    pub values: BTreeMap<Attribute, f64>,
}

/// Countywide median of every attribute for one year's records.
pub fn median_table<R: Borrow<TractRecord>>(year_records: &[R]) -> Vec<MedianRow> {
    let medians = county_medians(year_records, &TABLE_ORDER);

    TABLE_ORDER
        .into_iter()
        .map(|attribute| {
            let median = medians.get(attribute);
            MedianRow {
                attribute,
                label: attribute.label(),
                unit: attribute.unit(),
                median,
                display: display_value(median, attribute.unit()),
            }
        })
        .collect()
}

/// One point per record with every attribute filled in; missing or
/// invalid values become 0 so the layers stack.
pub fn stream_series<R: Borrow<TractRecord>>(tract_records: &[R]) -> Vec<StreamPoint> {
    tract_records
        .iter()
        .map(|r| {
            let r: &TractRecord = r.borrow();
            let values = Attribute::ALL
                .into_iter()
                .map(|a| {
                    let v = r.get(a);
                    (a, if is_valid_measurement(v) { v.unwrap_or(0.0) } else { 0.0 })
                })
                .collect();
            StreamPoint {
                year: r.year,
                values,
            }
        })
        .collect()
}

pub fn display_value(value: Option<f64>, unit: Unit) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };
    let amount = group_thousands(value);
    match unit {
        Unit::Dollars => format!("${amount}"),
        Unit::Units => format!("{amount} Units"),
        Unit::People => format!("{amount} People"),
    }
}

/// Formats with comma thousands separators and at most two decimals.
fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
