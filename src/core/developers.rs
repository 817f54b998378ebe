//! Developer lookup
//!
//! There is no developer column in the transaction data, so the developer is
//! inferred from the master-project and project names. Lookup order:
//! exact master project, exact project, then keyword rules (first match wins).
//! `None` means unresolved; rendering that is up to the caller.

/// Canonical project / master-project name -> developer
const DEVELOPER_LOOKUP: &[(&str, &str)] = &[
    // Emaar
    ("DownTown Dubai", "Emaar"),
    ("Downtown Dubai", "Emaar"),
    ("Dubai Marina", "Emaar"),
    ("Dubai Creek Harbour", "Emaar"),
    ("Dubai Hills Estate", "Emaar"),
    ("Arabian Ranches - 1", "Emaar"),
    ("Arabian Ranches 2", "Emaar"),
    ("Arabian Ranches 3", "Emaar"),
    ("The Greens", "Emaar"),
    ("Emirates Living", "Emaar"),
    ("Emaar South", "Emaar"),
    ("Emaar Beachfront", "Emaar"),
    ("Dubai Harbour", "Emaar"),
    ("The Valley", "Emaar"),
    // Nakheel
    ("Palm Jumeirah", "Nakheel"),
    ("Jumeirah Village Circle", "Nakheel"),
    ("Jumeirah Village Triangle", "Nakheel"),
    ("Jumeirah Islands", "Nakheel"),
    ("Jumeirah Park", "Nakheel"),
    ("Jumeirah Heights", "Nakheel"),
    ("Discovery Gardens", "Nakheel"),
    ("International City Phase 1", "Nakheel"),
    ("The Gardens", "Nakheel"),
    ("Al Furjan", "Nakheel"),
    ("Jumeriah Beach Residence  - JBR", "Nakheel"),
    ("JBR", "Nakheel"),
    // DAMAC
    ("DAMAC HILLS", "DAMAC"),
    ("DAMAC HILLS 2", "DAMAC"),
    ("Damac Hills", "DAMAC"),
    ("Damac Hills 2", "DAMAC"),
    ("DAMAC Lagoons", "DAMAC"),
    ("Akoya Oxygen", "DAMAC"),
    // Sobha
    ("SOBHA HARTLAND", "Sobha"),
    ("Sobha Hartland", "Sobha"),
    ("Sobha Reserve", "Sobha"),
    // Meraas
    ("City Walk", "Meraas"),
    ("Bluewaters Island", "Meraas"),
    ("La Mer", "Meraas"),
    ("Port de La Mer", "Meraas"),
    // Dubai Properties / DMCC
    ("Business Bay", "Dubai Properties"),
    ("Jumeirah Lakes Towers", "DMCC"),
    ("Mudon", "Dubai Properties"),
    ("Azizi Riviera", "Azizi"),
    ("MAG City", "MAG"),
    ("MAG 5", "MAG"),
    // Danube
    ("Lawnz", "Danube"),
    ("Olivz", "Danube"),
    ("Bayz", "Danube"),
    ("Elitz", "Danube"),
    // Dubai South
    ("Dubai South Residential District", "Dubai South"),
    ("Dubai World Central", "Dubai South"),
    // Other master developers
    ("Motor City", "Union Properties"),
    ("Silicon Oasis", "DSOA"),
    ("Dubai Land Residence Complex", "Dubai Land"),
    ("TOWN SQUARE", "Nshama"),
    ("Town Square", "Nshama"),
    ("Meydan One Community", "Meydan"),
    ("International Media Production Zone", "IMPZ"),
    ("Arjan", "Dubai Land"),
    ("Dubai Sports City", "Dubai Sports City"),
    ("Binghatti Avenue", "Binghatti"),
    ("Binghatti Stars", "Binghatti"),
    ("Samana Golf Avenue", "Samana"),
    ("Samana Hills", "Samana"),
    ("Mohammed Bin Rashid AL Maktoum District 11", "MBR City"),
    ("MBR City", "MBR City"),
];

/// Ordered keyword rules, checked against the lowercased name
const KEYWORD_RULES: &[(&[&str], &str)] = &[
    (&["emaar", "downtown", "dubai hills", "creek harbour"], "Emaar"),
    (&["damac"], "DAMAC"),
    (&["sobha"], "Sobha"),
    (&["nakheel", "palm", "jvc", "jvt"], "Nakheel"),
    (&["meraas"], "Meraas"),
    (&["azizi"], "Azizi"),
    (&["danube"], "Danube"),
    (&["binghatti"], "Binghatti"),
    (&["samana"], "Samana"),
    (&["mag "], "MAG"),
    (&["ellington"], "Ellington"),
    (&["select"], "Select Group"),
    (&["omniyat"], "Omniyat"),
];

fn exact(name: &str) -> Option<&'static str> {
    DEVELOPER_LOOKUP
        .iter()
        .find(|(project, _)| *project == name)
        .map(|(_, developer)| *developer)
}

/// Resolve the developer for a master project and/or project name
///
/// Keyword rules run against the master project when it is non-empty,
/// otherwise against the project name.
pub fn get_developer(master_project: Option<&str>, project_name: Option<&str>) -> Option<&'static str> {
    let master = master_project.filter(|s| !s.is_empty());
    let project = project_name.filter(|s| !s.is_empty());

    if let Some(developer) = master.and_then(exact) {
        return Some(developer);
    }
    if let Some(developer) = project.and_then(exact) {
        return Some(developer);
    }

    let haystack = master.or(project)?.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(_, developer)| *developer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_master_project() {
        assert_eq!(get_developer(Some("Palm Jumeirah"), None), Some("Nakheel"));
        assert_eq!(get_developer(Some("Business Bay"), Some("Bayz")), Some("Dubai Properties"));
    }

    #[test]
    fn test_exact_project_when_master_unknown() {
        assert_eq!(get_developer(Some("Somewhere Else"), Some("Bayz")), Some("Danube"));
        assert_eq!(get_developer(None, Some("City Walk")), Some("Meraas"));
    }

    #[test]
    fn test_keyword_rules_first_match_wins() {
        // "damac" would match too, but the Emaar rule is checked first
        assert_eq!(get_developer(Some("Downtown Damac Residences"), None), Some("Emaar"));
        assert_eq!(get_developer(Some("Ellington Beach House"), None), Some("Ellington"));
        assert_eq!(get_developer(Some("Magnolia Heights"), None), None);
        assert_eq!(get_developer(Some("The MAG 318"), None), Some("MAG"));
    }

    #[test]
    fn test_keyword_rules_use_master_before_project() {
        assert_eq!(get_developer(Some("Unnamed Master"), Some("Azizi Venice")), None);
        assert_eq!(get_developer(Some(""), Some("Azizi Venice")), Some("Azizi"));
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(get_developer(Some("Nowhere Plaza"), Some("Tower X")), None);
        assert_eq!(get_developer(None, None), None);
        assert_eq!(get_developer(Some(""), Some("")), None);
    }
}
