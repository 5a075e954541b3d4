use std::borrow::Borrow;

use crate::attribute::{Attribute, is_valid_measurement};
use crate::scoring::types::Medians;
use crate::tract::TractRecord;

/// Median of a slice of values, sorting it in place. Even counts average
/// the two middle values. Returns `None` for empty input.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Computes the countywide median of each attribute over `records`,
/// which are expected to belong to a single year. Only valid
/// measurements take part.
pub fn county_medians<R: Borrow<TractRecord>>(records: &[R], attributes: &[Attribute]) -> Medians {
    let values = attributes
        .iter()
        .map(|&attribute| {
            let mut valid: Vec<f64> = records
                .iter()
                .map(|r| {
                    let r: &TractRecord = r.borrow();
                    r.get(attribute)
                })
                .filter(|v| is_valid_measurement(*v))
                .flatten()
                .collect();
            (attribute, median(&mut valid))
        })
        .collect();

    Medians { values }
}
