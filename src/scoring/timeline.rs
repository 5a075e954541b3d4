//! Multi-year scoring and per-year / per-tract slicing of a county's
//! records.

use std::cell::OnceCell;
use std::collections::BTreeSet;
use tracing::info;

use crate::attribute::Attribute;
use crate::scoring::engine::score_transition;
use crate::scoring::median::county_medians;
use crate::scoring::types::{Medians, ScoreLookup, ScoreRecord};
use crate::tract::TractRecord;

/// Sorted distinct years present in `records`.
pub fn distinct_years(records: &[TractRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn records_for_year(records: &[TractRecord], year: i32) -> Vec<&TractRecord> {
    records.iter().filter(|r| r.year == year).collect()
}

/// All records of one tract, oldest year first.
pub fn tract_series<'a>(records: &'a [TractRecord], tract_id: &str) -> Vec<&'a TractRecord> {
    let mut series: Vec<_> = records.iter().filter(|r| r.tract_id == tract_id).collect();
    series.sort_by_key(|r| r.year);
    series
}

/// Scores every consecutive pair of years and concatenates the results.
/// The earliest year never receives scores.
pub fn score_all_years(records: &[TractRecord]) -> Vec<ScoreRecord> {
    let years = distinct_years(records);
    let mut scores = Vec::new();

    for pair in years.windows(2) {
        let prev = records_for_year(records, pair[0]);
        let curr = records_for_year(records, pair[1]);
        scores.extend(score_transition(&prev, &curr));
    }

    scores
}

/// Application state for one loaded county. Records are fixed for the
/// session; the full timeline of scores is computed on first use.
pub struct CountySession {
    county: String,
    records: Vec<TractRecord>,
    scores: OnceCell<Vec<ScoreRecord>>,
}

impl CountySession {
    pub fn new(county: impl Into<String>, records: Vec<TractRecord>) -> Self {
        Self {
            county: county.into(),
            records,
            scores: OnceCell::new(),
        }
    }

    pub fn county(&self) -> &str {
        &self.county
    }

    pub fn records(&self) -> &[TractRecord] {
        &self.records
    }

    pub fn years(&self) -> Vec<i32> {
        distinct_years(&self.records)
    }

    pub fn scores(&self) -> &[ScoreRecord] {
        self.scores.get_or_init(|| {
            let scores = score_all_years(&self.records);
            info!(
                county = %self.county,
                records = self.records.len(),
                scores = scores.len(),
                "Scored county timeline"
            );
            scores
        })
    }

    pub fn scores_for_year(&self, year: i32) -> Vec<&ScoreRecord> {
        self.scores().iter().filter(|s| s.year == year).collect()
    }

    pub fn lookup(&self, tract_id: &str, year: i32) -> ScoreLookup<'_> {
        match self
            .scores()
            .iter()
            .find(|s| s.year == year && s.tract_id == tract_id)
        {
            None => ScoreLookup::Absent,
            Some(s) => match s.score {
                Some(score) => ScoreLookup::Scored(score),
                None => ScoreLookup::Incomplete(&s.invalid_attributes),
            },
        }
    }

    pub fn year_slice(&self, year: i32) -> Vec<&TractRecord> {
        records_for_year(&self.records, year)
    }

    pub fn tract_series(&self, tract_id: &str) -> Vec<&TractRecord> {
        tract_series(&self.records, tract_id)
    }

    /// Countywide medians of every attribute for `year`.
    pub fn medians(&self, year: i32) -> Medians {
        county_medians(&self.year_slice(year), &Attribute::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(tract_id: &str, year: i32, value: f64) -> TractRecord {
        Attribute::SCORING
            .into_iter()
            .fold(TractRecord::new(tract_id, year), |r, a| r.with(a, value))
    }

    fn records() -> Vec<TractRecord> {
        vec![
            uniform("000100", 2012, 120.0),
            uniform("000100", 2010, 100.0),
            uniform("000100", 2011, 110.0),
            uniform("000200", 2010, 200.0),
            uniform("000200", 2011, 220.0).with(Attribute::MedianGrossRent, 0.0),
            uniform("000300", 2012, 50.0),
        ]
    }

    #[test]
    fn test_distinct_years_sorted() {
        assert_eq!(distinct_years(&records()), vec![2010, 2011, 2012]);
        assert!(distinct_years(&[]).is_empty());
    }

    #[test]
    fn test_tract_series_ascending() {
        let records = records();
        let years: Vec<_> = tract_series(&records, "000100")
            .iter()
            .map(|r| r.year)
            .collect();
        assert_eq!(years, vec![2010, 2011, 2012]);
        assert!(tract_series(&records, "999999").is_empty());
    }

    #[test]
    fn test_records_for_year() {
        let records = records();
        let ids: Vec<_> = records_for_year(&records, 2012)
            .iter()
            .map(|r| r.tract_id.as_str())
            .collect();
        assert_eq!(ids, vec!["000100", "000300"]);
    }

    #[test]
    fn test_score_all_years_skips_earliest() {
        let scores = score_all_years(&records());

        assert!(scores.iter().all(|s| s.year != 2010));
        let keys: Vec<_> = scores
            .iter()
            .map(|s| (s.tract_id.as_str(), s.year))
            .collect();
        assert_eq!(
            keys,
            vec![("000100", 2011), ("000200", 2011), ("000100", 2012)]
        );
    }

    #[test]
    fn test_session_lookup_states() {
        let session = CountySession::new("San Francisco", records());

        assert!(matches!(
            session.lookup("000100", 2011),
            ScoreLookup::Scored(_)
        ));
        assert_eq!(
            session.lookup("000200", 2011),
            ScoreLookup::Incomplete(&[Attribute::MedianGrossRent])
        );
        // 000300 has no 2011 record, so it is not part of the 2012 transition.
        assert_eq!(session.lookup("000300", 2012), ScoreLookup::Absent);
        assert_eq!(session.lookup("000100", 2010), ScoreLookup::Absent);
    }

    #[test]
    fn test_session_caches_scores() {
        let session = CountySession::new("San Francisco", records());
        let first = session.scores().as_ptr();
        let second = session.scores().as_ptr();
        assert_eq!(first, second);
        assert_eq!(session.scores_for_year(2012).len(), 1);
    }

    #[test]
    fn test_session_medians() {
        let session = CountySession::new("San Francisco", records());
        let medians = session.medians(2011);
        assert_eq!(medians.get(Attribute::MedianHouseholdIncome), Some(165.0));
        assert_eq!(medians.get(Attribute::MedianGrossRent), Some(110.0));
        assert_eq!(medians.get(Attribute::TotalPopulation), None);
    }
}
