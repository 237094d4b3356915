// * Immutable gazetteer tables for location resolution.
// * Process-wide static configuration, loaded once, never mutated at runtime.
// * Slices keep a deterministic iteration order; the resolver's
// * last-match-wins scan depends on it.

/// Free-form country mentions mapped to their canonical Spanish name.
pub static COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("Mexico", "México"),
    ("México", "México"),
    ("USA", "Estados Unidos"),
    ("United States", "Estados Unidos"),
    ("EE.UU.", "Estados Unidos"),
    ("France", "Francia"),
    ("España", "España"),
    ("Germany", "Alemania"),
];

/// State/province membership per canonical country name.
pub static STATES_BY_COUNTRY: &[(&str, &[&str])] = &[
    (
        "México",
        &[
            "Morelos",
            "Ciudad de México",
            "Estado de México",
            "Jalisco",
            "Veracruz",
            "Sinaloa",
            "Puebla",
            "Oaxaca",
            "Chiapas",
            "Michoacán",
            "Yucatán",
            "Querétaro",
            "Nuevo León",
            "Tamaulipas",
        ],
    ),
    (
        "Estados Unidos",
        &[
            "California",
            "New York",
            "Texas",
            "Washington",
            "Florida",
            "Illinois",
        ],
    ),
];

/// Common state abbreviations per country code, expanded to full state names.
pub static STATE_ABBREVS: &[(&str, &[(&str, &str)])] = &[
    (
        "MX",
        &[
            ("Mor.", "Morelos"),
            ("CDMX", "Ciudad de México"),
            ("Edo. Méx.", "Estado de México"),
            ("Jal.", "Jalisco"),
            ("Ver.", "Veracruz"),
            ("Sin.", "Sinaloa"),
        ],
    ),
    (
        "US",
        &[
            ("CA", "California"),
            ("NY", "New York"),
            ("TX", "Texas"),
            ("WA", "Washington"),
        ],
    ),
];

/// Canonical country for a free-form mention, if the mention is a known alias.
pub fn canonical_country(mention: &str) -> Option<&'static str> {
    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == mention)
        .map(|(_, canonical)| *canonical)
}

/// Country owning a full state name, if the state appears in a membership
/// table.
pub fn country_of_state(state: &str) -> Option<&'static str> {
    STATES_BY_COUNTRY
        .iter()
        .find(|(_, states)| states.contains(&state))
        .map(|(country, _)| *country)
}

/// Full state name for a known abbreviation.
pub fn expand_state_abbrev(mention: &str) -> Option<&'static str> {
    STATE_ABBREVS.iter().find_map(|(_, abbrevs)| {
        abbrevs
            .iter()
            .find(|(abbrev, _)| *abbrev == mention)
            .map(|(_, full)| *full)
    })
}
