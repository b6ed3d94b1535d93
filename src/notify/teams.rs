// src/notify/teams.rs
//! Free-text team name → admin team code. Longest key is tried first so
//! overlapping names resolve deterministically.

use once_cell::sync::Lazy;

pub const UNKNOWN_TEAM: &str = "UNKNOWN";

const TEAM_CODES: &[(&str, &str)] = &[
    ("Dodgers", "LAD"),
    ("Marlins", "MIA"),
    ("Padres", "SD"),
    ("Yankees", "NYY"),
    ("Cubs", "CHC"),
    ("Angels", "LAA"),
    ("Red Sox", "BOS"),
    ("Mets", "NYM"),
    ("Braves", "ATL"),
    ("Phillies", "PHI"),
    ("Giants", "SF"),
    ("Rockies", "COL"),
    ("Diamondbacks", "AZ"),
    ("D-backs", "AZ"),
    ("Rays", "TB"),
    ("Blue Jays", "TOR"),
    ("Orioles", "BAL"),
    ("White Sox", "CWS"),
    ("Royals", "KC"),
    ("Tigers", "DET"),
    ("Twins", "MIN"),
    ("Guardians", "CLE"),
    ("Mariners", "SEA"),
    ("Astros", "HOU"),
    ("Rangers", "TEX"),
    ("Athletics", "OAK"),
    ("Nationals", "WSH"),
    ("Pirates", "PIT"),
    ("Cardinals", "STL"),
    ("Brewers", "MIL"),
    ("Reds", "CIN"),
    // Classic / exhibition national sides
    ("Japan", "JPN"),
    ("United States", "USA"),
    ("Dominican Republic", "DOM"),
    ("Korea", "KOR"),
];

static BY_LENGTH: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut v = TEAM_CODES.to_vec();
    v.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
    v
});

pub fn resolve_team_code(name: &str) -> &'static str {
    BY_LENGTH
        .iter()
        .find(|(key, _)| name.contains(key))
        .map(|(_, code)| *code)
        .unwrap_or(UNKNOWN_TEAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_names_resolve() {
        assert_eq!(resolve_team_code("Los Angeles Dodgers"), "LAD");
        assert_eq!(resolve_team_code("Los Angeles Angels"), "LAA");
        assert_eq!(resolve_team_code("Toronto Blue Jays"), "TOR");
        assert_eq!(resolve_team_code("Chicago White Sox"), "CWS");
        assert_eq!(resolve_team_code("Boston Red Sox"), "BOS");
        assert_eq!(resolve_team_code("Arizona Diamondbacks"), "AZ");
    }

    #[test]
    fn unknown_is_sentinel() {
        assert_eq!(resolve_team_code("Hanshin Tigers"), "DET"); // substring match is the contract
        assert_eq!(resolve_team_code("Yomiuri Giants"), "SF");
        assert_eq!(resolve_team_code("Springfield Isotopes"), UNKNOWN_TEAM);
        assert_eq!(resolve_team_code(""), UNKNOWN_TEAM);
    }
}
