use tract_gentrify::attribute::Attribute;
use tract_gentrify::counties::canonical_county;
use tract_gentrify::scoring::timeline::CountySession;
use tract_gentrify::scoring::types::ScoreLookup;
use tract_gentrify::source::parse_table;
use tract_gentrify::store::{SourceDescriptor, SourceTable, merge_sources};

fn fixture_tables() -> Vec<SourceTable> {
    let sources: [(Attribute, &str, &[u8]); 5] = [
        (
            Attribute::MedianHouseholdIncome,
            "house_income.csv",
            include_bytes!("fixtures/house_income.csv"),
        ),
        (
            Attribute::MedianHomeValue,
            "home_value.csv",
            include_bytes!("fixtures/home_value.csv"),
        ),
        (
            Attribute::MedianGrossRent,
            "gross_rent.csv",
            include_bytes!("fixtures/gross_rent.csv"),
        ),
        (
            Attribute::VacantUnits,
            "vac_status.csv",
            include_bytes!("fixtures/vac_status.csv"),
        ),
        (
            Attribute::BachelorsOrHigher,
            "edu_attain.csv",
            include_bytes!("fixtures/edu_attain.csv"),
        ),
    ];

    sources
        .into_iter()
        .map(|(attribute, name, bytes)| {
            parse_table(SourceDescriptor::new(attribute, name), bytes).expect("fixture parses")
        })
        .collect()
}

#[test]
fn test_full_pipeline() {
    let records = merge_sources("San Francisco", &fixture_tables());

    // 3 tracts x 3 years; the Marin rows are dropped.
    assert_eq!(records.len(), 9);
    let ids: Vec<_> = records.iter().map(|r| r.tract_id.as_str()).collect();
    assert!(ids.contains(&"010800"));
    assert!(ids.contains(&"400101"));
    assert!(ids.contains(&"010900"));
    assert!(
        records
            .iter()
            .filter(|r| !(r.tract_id == "010900" && r.year == 2012))
            .all(|r| Attribute::SCORING.iter().all(|a| r.get(*a).is_some()))
    );

    let session = CountySession::new("San Francisco", records);
    assert_eq!(session.years(), vec![2010, 2011, 2012]);

    let scores = session.scores();
    assert_eq!(scores.len(), 6);
    assert!(scores.iter().all(|s| s.year != 2010));

    // Every tract grows with the county in 2011, up to rounding in the fixtures.
    for s in session.scores_for_year(2011) {
        let score = s.score.expect("2011 is fully populated");
        assert!(score.abs() < 0.01, "{s:?}");
    }

    assert_eq!(
        session.lookup("010900", 2012),
        ScoreLookup::Incomplete(&[Attribute::MedianGrossRent])
    );
    assert!(matches!(
        session.lookup("010800", 2012),
        ScoreLookup::Scored(_)
    ));
    assert_eq!(session.lookup("010800", 2010), ScoreLookup::Absent);
}

#[test]
fn test_other_county_is_isolated() {
    let records = merge_sources("Marin", &fixture_tables());

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tract_id, "010800");
    assert_eq!(records[0].year, 2011);

    // A single year has no transition to score.
    let session = CountySession::new("Marin", records);
    assert!(session.scores().is_empty());
}

#[test]
fn test_county_suffix_matches_source_rows() {
    let county = canonical_county("San Francisco County");
    let records = merge_sources(&county, &fixture_tables());

    assert_eq!(records.len(), 9);
    let session = CountySession::new(county, records);
    assert_eq!(session.county(), "San Francisco");
    assert_eq!(session.scores().len(), 6);
}
