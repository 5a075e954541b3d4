//! Data types produced by the scoring pipeline.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::attribute::Attribute;

/// Per-attribute countywide medians for one year. `None` means no tract
/// had a valid value for that attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Medians {
    pub(crate) values: BTreeMap<Attribute, Option<f64>>,
}

impl Medians {
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        self.values.get(&attribute).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, Option<f64>)> + '_ {
        self.values.iter().map(|(a, v)| (*a, *v))
    }
}

/// Score for one tract over one year transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub tract_id: String,
    /// The later year of the transition.
    pub year: i32,
    /// `None` when the tract is disqualified.
    pub score: Option<f64>,
    pub invalid_attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreStatus {
    Scored(f64),
    Incomplete,
}

impl ScoreRecord {
    pub fn status(&self) -> ScoreStatus {
        match self.score {
            Some(score) => ScoreStatus::Scored(score),
            None => ScoreStatus::Incomplete,
        }
    }
}

/// What a map lookup for `(tract, year)` resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreLookup<'a> {
    /// The tract is not part of that year's transition.
    Absent,
    /// Scored but disqualified by the listed attributes.
    Incomplete(&'a [Attribute]),
    Scored(f64),
}
