use std::borrow::Borrow;
use std::collections::HashMap;
use tracing::debug;

use crate::attribute::{Attribute, is_valid_measurement};
use crate::scoring::median::county_medians;
use crate::scoring::types::ScoreRecord;
use crate::tract::TractRecord;

/// Scores every tract present in both `prev` and `curr`.
///
/// For each scoring attribute the tract's growth ratio `curr / prev` is
/// compared with the county median's growth ratio on a log scale:
///
/// ```text
/// term = ln(G_tract) - ln(G_median)    // income, home value, rent, vacancy
/// term = ln(G_median) - ln(G_tract)    // educational attainment
/// score = sum(term) / 5
/// ```
///
/// A tract with any missing or non-positive input (its own value in either
/// year, or either year's county median) gets no score and lists the
/// offending attributes instead. Tracts missing from `prev` are skipped.
pub fn score_transition<P, C>(prev: &[P], curr: &[C]) -> Vec<ScoreRecord>
where
    P: Borrow<TractRecord>,
    C: Borrow<TractRecord>,
{
    let prev_by_tract: HashMap<&str, &TractRecord> = prev
        .iter()
        .map(|r| {
            let r: &TractRecord = r.borrow();
            (r.tract_id.as_str(), r)
        })
        .collect();

    let prev_medians = county_medians(prev, &Attribute::SCORING);
    let curr_medians = county_medians(curr, &Attribute::SCORING);

    let mut results = Vec::with_capacity(curr.len());

    for tract in curr {
        let tract: &TractRecord = tract.borrow();
        let Some(prev_tract) = prev_by_tract.get(tract.tract_id.as_str()) else {
            continue;
        };

        let mut valid = Vec::with_capacity(Attribute::SCORING.len());
        let mut invalid_attributes = Vec::new();
        for attribute in Attribute::SCORING {
            let inputs = [
                tract.get(attribute),
                prev_tract.get(attribute),
                curr_medians.get(attribute),
                prev_medians.get(attribute),
            ];
            match inputs {
                [Some(x), Some(px), Some(m), Some(pm)]
                    if inputs.into_iter().all(is_valid_measurement) =>
                {
                    valid.push((attribute, x, px, m, pm))
                }
                _ => invalid_attributes.push(attribute),
            }
        }

        if !invalid_attributes.is_empty() {
            debug!(
                tract_id = %tract.tract_id,
                year = tract.year,
                invalid = ?invalid_attributes,
                "Tract disqualified"
            );
            results.push(ScoreRecord {
                tract_id: tract.tract_id.clone(),
                year: tract.year,
                score: None,
                invalid_attributes,
            });
            continue;
        }

        let total: f64 = valid
            .into_iter()
            .map(|(attribute, x, px, m, pm)| log_ratio_term(attribute, x / px, m / pm))
            .sum();

        results.push(ScoreRecord {
            tract_id: tract.tract_id.clone(),
            year: tract.year,
            score: Some(total / Attribute::SCORING.len() as f64),
            invalid_attributes: Vec::new(),
        });
    }

    results
}

/// One attribute's contribution: tract growth against county median growth
/// on a log scale, negated for inverted attributes. Both ratios must be positive.
fn log_ratio_term(attribute: Attribute, growth: f64, median_growth: f64) -> f64 {
    if attribute.inverted() {
        median_growth.ln() - growth.ln()
    } else {
        growth.ln() - median_growth.ln()
    }
}
