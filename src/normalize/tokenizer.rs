// * Stop-word-filtered word frequency count over the composed article text.

use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::stopwords::STOPWORD_SET;
use crate::normalize::strip_diacritics;

/// Lower-cases and diacritic-strips the input, splits it on unicode word
/// boundaries, discards Spanish stop words, and returns word -> occurrence
/// count. Insertion order is irrelevant to consumers.
pub fn word_count(text: &str) -> HashMap<String, u32> {
    let normalized = strip_diacritics(&text.to_lowercase());

    let mut counts = HashMap::new();
    for word in normalized.unicode_words() {
        if STOPWORD_SET.contains(word) {
            continue;
        }
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_repeated_words() {
        let counts = word_count("violencia golpea; violencia crece");
        assert_eq!(counts.get("violencia"), Some(&2));
        assert_eq!(counts.get("golpea"), Some(&1));
        assert_eq!(counts.get("crece"), Some(&1));
    }

    #[test]
    fn test_filters_stop_words() {
        let counts = word_count("la violencia de genero en el pais");
        assert!(!counts.contains_key("la"));
        assert!(!counts.contains_key("de"));
        assert!(!counts.contains_key("en"));
        assert!(!counts.contains_key("el"));
        assert_eq!(counts.get("violencia"), Some(&1));
        assert_eq!(counts.get("genero"), Some(&1));
        assert_eq!(counts.get("pais"), Some(&1));
    }

    #[test]
    fn test_lowercases_and_strips_accents() {
        let counts = word_count("Feminicidio FEMINICIDIO feminicidio Michoacán");
        assert_eq!(counts.get("feminicidio"), Some(&3));
        assert_eq!(counts.get("michoacan"), Some(&1));
        assert!(!counts.contains_key("Michoacán"));
    }

    #[test]
    fn test_punctuation_does_not_produce_tokens() {
        let counts = word_count("«¡Basta!», dijo. --- (2024)");
        assert_eq!(counts.get("basta"), Some(&1));
        assert_eq!(counts.get("dijo"), Some(&1));
        assert_eq!(counts.get("2024"), Some(&1));
        assert!(!counts.keys().any(|k| k.contains('!') || k.contains('(')));
    }

    #[test]
    fn test_empty_input() {
        assert!(word_count("").is_empty());
    }
}
