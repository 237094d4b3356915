// * Entity recognition boundary. The pipeline only depends on the trait;
// * the built-in implementation is a gazetteer scan over the static tables.

use std::sync::LazyLock;

use crate::geo::tables::{COUNTRY_ALIASES, STATES_BY_COUNTRY, STATE_ABBREVS};

/// Semantic tag attached to a recognized span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    /// Geo-political or location entity (place name, state, country).
    Place,
    Other,
}

/// A recognized span of text with its semantic tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

/// Capability interface for the external named-entity recognizer: given free
/// text, return tagged entities in document order.
pub trait EntityRecognizer: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<Entity>;
}

// * All place names the gazetteer can recognize: country aliases, full state
// * names, and state abbreviations.
static GAZETTEER: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut terms: Vec<&'static str> = Vec::new();
    terms.extend(COUNTRY_ALIASES.iter().map(|(alias, _)| *alias));
    for (_, states) in STATES_BY_COUNTRY {
        terms.extend(states.iter().copied());
    }
    for (_, abbrevs) in STATE_ABBREVS {
        terms.extend(abbrevs.iter().map(|(abbrev, _)| *abbrev));
    }
    terms.sort_unstable();
    terms.dedup();
    terms
});

/// Dictionary-backed recognizer over the static location tables.
///
/// Emits one `Place` entity per non-overlapping occurrence of a known term,
/// in document order, preferring the longest term at any given offset (so
/// "Ciudad de México" wins over the "México" it contains).
#[derive(Debug, Default, Clone)]
pub struct GazetteerRecognizer;

impl GazetteerRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn analyze(&self, text: &str) -> Vec<Entity> {
        // * (start, end, term) for every bounded occurrence of a known term
        let mut matches: Vec<(usize, usize, &str)> = Vec::new();
        for term in GAZETTEER.iter() {
            for (start, found) in text.match_indices(term) {
                let end = start + found.len();
                if is_word_bounded(text, start, end) {
                    matches.push((start, end, *term));
                }
            }
        }

        // * Document order, longest term first at equal offsets
        matches.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut entities = Vec::new();
        let mut cursor = 0usize;
        for (start, end, term) in matches {
            if start < cursor {
                continue; // contained in or overlapping an accepted span
            }
            cursor = end;
            entities.push(Entity {
                text: term.to_string(),
                label: EntityLabel::Place,
            });
        }
        entities
    }
}

// * A match only counts when it is not glued to surrounding word characters.
fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}
