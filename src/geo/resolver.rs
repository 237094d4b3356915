// * Maps recognizer entities to canonical country/state/city fields.
// *
// * The scan is a deterministic linear pass with last-match-wins semantics
// * per field: a later entity overwrites an earlier resolved country or
// * state. Resolution is not confidence-ranked.

use tracing::trace;

use crate::geo::recognizer::{EntityLabel, EntityRecognizer};
use crate::geo::tables::{canonical_country, country_of_state, expand_state_abbrev};

/// Transient result of a location pass over free text. Folded into the
/// article record by the adapters, never persisted independently.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocationResolution {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Runs the recognizer over the composed article text and resolves place
/// entities against the alias, membership, and abbreviation tables.
///
/// Per entity, in recognizer order: a country alias sets the country; a full
/// state name sets state and country; a known abbreviation expands to the
/// full state name and sets country via membership lookup; and while no city
/// is resolved yet, any entity that differs from the resolved state string
/// becomes the city candidate. No country defaulting happens here.
pub fn resolve_locations(recognizer: &dyn EntityRecognizer, text: &str) -> LocationResolution {
    let mut resolved = LocationResolution::default();

    for entity in recognizer.analyze(text) {
        if entity.label != EntityLabel::Place {
            continue;
        }
        let mention = entity.text.trim();

        if let Some(country) = canonical_country(mention) {
            resolved.country = Some(country.to_string());
        }

        if let Some(country) = country_of_state(mention) {
            resolved.state = Some(mention.to_string());
            resolved.country = Some(country.to_string());
        }

        if let Some(full_state) = expand_state_abbrev(mention) {
            resolved.state = Some(full_state.to_string());
            if let Some(country) = country_of_state(full_state) {
                resolved.country = Some(country.to_string());
            }
        }

        if resolved.city.is_none() {
            if let Some(state) = &resolved.state {
                if mention != state {
                    resolved.city = Some(mention.to_string());
                }
            }
        }

        trace!(?resolved, mention, "location scan step");
    }

    resolved
}
