/// Bay Area counties and their state+county FIPS codes.
pub const BAY_AREA_COUNTIES: [(&str, &str); 9] = [
    ("Alameda", "06001"),
    ("Contra Costa", "06013"),
    ("Marin", "06041"),
    ("Napa", "06055"),
    ("San Francisco", "06075"),
    ("San Mateo", "06081"),
    ("Santa Clara", "06085"),
    ("Solano", "06095"),
    ("Sonoma", "06097"),
];

/// Looks up the FIPS code of a county name, ignoring surrounding
/// whitespace and an optional " County" suffix.
pub fn county_fips(name: &str) -> Option<&'static str> {
    find_county(name).map(|(_, fips)| fips)
}

/// The name source tables use for a county: the known Bay Area name when
/// `name` matches one, otherwise `name` trimmed.
pub fn canonical_county(name: &str) -> String {
    match find_county(name) {
        Some((county, _)) => county.to_string(),
        None => name.trim().to_string(),
    }
}

fn find_county(name: &str) -> Option<(&'static str, &'static str)> {
    let name = name.trim();
    let name = name.strip_suffix(" County").unwrap_or(name);
    BAY_AREA_COUNTIES
        .iter()
        .find(|(county, _)| *county == name)
        .copied()
}

/// 11-digit GEOID (`SSCCC` + 6-digit tract) as used by tract boundary files.
pub fn tract_geoid(county_fips: &str, tract_id: &str) -> String {
    format!("{county_fips}{tract_id}")
}
