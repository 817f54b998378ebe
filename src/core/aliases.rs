//! Area alias resolution
//!
//! Maps common and marketing names to the canonical area names used in the
//! transaction store. Unknown inputs fall back to a title-cased rendering,
//! which is only a guess: exact-match queries against it may find nothing.

/// Normalized alias -> canonical area name (many-to-one)
const AREA_ALIASES: &[(&str, &str)] = &[
    // Emaar Beachfront is registered as Dubai Harbour
    ("emaar beachfront", "Dubai Harbour"),
    ("jvc", "Jumeirah Village Circle"),
    ("jvt", "Jumeirah Village Triangle"),
    ("jlt", "Jumeirah Lakes Towers"),
    ("jbr", "Jumeriah Beach Residence  - JBR"),
    ("downtown", "DownTown Dubai"),
    ("dubai hills", "Dubai Hills Estate"),
    ("damac hills", "DAMAC HILLS"),
    ("damac hills 2", "DAMAC HILLS 2"),
    ("sobha hartland", "SOBHA HARTLAND"),
    ("town square", "TOWN SQUARE"),
    ("mbr city", "Meydan One Community"),
];

/// Lowercase, treat `-` as a space, collapse runs of separators
pub fn normalize_area_key(input: &str) -> String {
    input
        .to_lowercase()
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Look up a known alias, without any fallback
pub fn lookup_area_alias(input: &str) -> Option<&'static str> {
    let key = normalize_area_key(input);
    AREA_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
}

/// Resolve a user-facing area name or slug to a canonical area name
///
/// Never fails: inputs without an alias come back title-cased
/// (`"random-unknown-area"` -> `"Random Unknown Area"`).
pub fn resolve_area_name(input: &str) -> String {
    match lookup_area_alias(input) {
        Some(canonical) => canonical.to_string(),
        None => title_case(input),
    }
}

/// Text for a substring area filter: the aliased name, else the input as typed
///
/// Unlike [`resolve_area_name`] there is no title-case guess, so canonical
/// names with unusual separators (`"Jumeriah Beach Residence  - JBR"`) still
/// match themselves.
pub fn area_filter_text(input: &str) -> String {
    match lookup_area_alias(input) {
        Some(canonical) => canonical.to_string(),
        None => input.trim().to_string(),
    }
}

/// Capitalize the first letter of each space- or dash-delimited token
fn title_case(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
