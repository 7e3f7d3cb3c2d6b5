//! Stopword removal and character cleanup for plain-text books.

use std::collections::HashSet;

use stop_words::{LANGUAGE, get};
use tracing::{debug, instrument};

/// Accented letters kept alongside ASCII `a-z` after lowercasing.
const ACCENTED_LETTERS: [char; 7] = ['á', 'é', 'í', 'ó', 'ú', 'ü', 'ñ'];

/// Returns whether `c` survives the character filter unchanged.
///
/// Only lowercase ASCII letters, the Spanish accented set, ASCII digits and
/// whitespace are kept; everything else becomes a space.
#[must_use]
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || ACCENTED_LETTERS.contains(&c)
}

/// Text normalizer owning an immutable stopword set.
///
/// The set is built once at construction and never changes, so a single
/// instance can be shared across download tasks behind an `Arc`.
#[derive(Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("stopwords", &self.stopwords.len())
            .finish()
    }
}

impl Normalizer {
    /// Creates a normalizer removing exactly the given words.
    ///
    /// Words are lowercased so the set matches normalized tokens.
    #[must_use]
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords
            .into_iter()
            .map(|word| word.as_ref().to_lowercase())
            .collect();
        Self { stopwords }
    }

    /// Creates a normalizer with the union of the English and Spanish lists.
    #[must_use]
    #[instrument]
    pub fn english_spanish() -> Self {
        let english = get(LANGUAGE::English);
        let spanish = get(LANGUAGE::Spanish);
        let words: Vec<String> = english
            .iter()
            .chain(spanish.iter())
            .map(ToString::to_string)
            .collect();
        let normalizer = Self::new(words);
        debug!(stopwords = normalizer.len(), "built stopword set");
        normalizer
    }

    /// Number of distinct stopwords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Returns `true` when no word is filtered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }

    /// Returns whether `word` is filtered out.
    #[must_use]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Normalizes `text`.
    ///
    /// Steps:
    /// 1. Lowercase
    /// 2. Replace every character outside [`is_allowed_char`] with a space
    /// 3. Split on whitespace
    /// 4. Drop stopwords
    /// 5. Join the remaining tokens with single spaces
    ///
    /// Empty or all-stopword input yields an empty string.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if is_allowed_char(c) { c } else { ' ' })
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(*token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_removes_stopword_and_punctuation() {
        let normalizer = Normalizer::new(["the"]);
        let result = normalizer.normalize("The FOX jumps! 123");
        assert_eq!(result, "fox jumps 123");
    }

    #[test]
    fn test_normalize_preserves_spanish_letters() {
        let normalizer = Normalizer::new(Vec::<String>::new());
        let result = normalizer.normalize("¿Cómo está el NIÑO? ¡Pingüino!");
        assert_eq!(result, "cómo está el niño pingüino");
    }

    #[test]
    fn test_normalize_replaces_other_accents_with_space() {
        let normalizer = Normalizer::new(Vec::<String>::new());
        // 'à' and 'ç' are not in the kept set and split the word.
        assert_eq!(normalizer.normalize("voilà garçon"), "voil gar on");
    }

    #[test]
    fn test_normalize_empty_and_all_stopwords() {
        let normalizer = Normalizer::new(["a", "the"]);
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   \n\t "), "");
        assert_eq!(normalizer.normalize("The a THE, a."), "");
    }

    #[test]
    fn test_normalize_collapses_whitespace_and_keeps_order() {
        let normalizer = Normalizer::new(["and"]);
        let result = normalizer.normalize("alpha\n\nbeta\tand   gamma");
        assert_eq!(result, "alpha beta gamma");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = Normalizer::english_spanish();
        let inputs = [
            "It was the best of times, it was the worst of times.",
            "En un lugar de la Mancha, de cuyo nombre no quiero acordarme...",
            "Chapter 1 -- 1851 MOBY-DICK; or, THE WHALE",
        ];
        for input in inputs {
            let once = normalizer.normalize(input);
            assert_eq!(normalizer.normalize(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_english_spanish_contains_both_languages() {
        let normalizer = Normalizer::english_spanish();
        assert!(!normalizer.is_empty());
        assert!(normalizer.is_stopword("the"));
        assert!(normalizer.is_stopword("and"));
        assert!(normalizer.is_stopword("de"));
        assert!(normalizer.is_stopword("que"));
        assert!(!normalizer.is_stopword("whale"));
    }

    #[test]
    fn test_english_spanish_filters_mixed_text() {
        let normalizer = Normalizer::english_spanish();
        let result = normalizer.normalize("The whale y el capitán");
        assert!(result.contains("whale"));
        assert!(result.contains("capitán"));
        assert!(!result.split(' ').any(|t| t == "the" || t == "y" || t == "el"));
    }

    #[test]
    fn test_english_spanish_keeps_content_words() {
        let normalizer = Normalizer::english_spanish();
        let result = normalizer.normalize(
            "The world is important information for children, el tiempo y el trabajo nuevo",
        );
        let tokens: Vec<&str> = result.split(' ').collect();
        for word in ["world", "important", "information", "children", "tiempo", "trabajo", "nuevo"] {
            assert!(tokens.contains(&word), "{word} missing from {result:?}");
        }
        for word in ["the", "is", "for", "el", "y", "de"] {
            assert!(!tokens.contains(&word), "{word} kept in {result:?}");
        }
        assert!(normalizer.is_stopword("de"));
        assert!(normalizer.len() < 600, "unexpected list size {}", normalizer.len());
    }

    #[test]
    fn test_new_lowercases_stopwords() {
        let normalizer = Normalizer::new(["The"]);
        assert!(normalizer.is_stopword("the"));
        assert_eq!(normalizer.normalize("THE end"), "end");
    }

    #[test]
    fn test_is_allowed_char() {
        assert!(is_allowed_char('a'));
        assert!(is_allowed_char('7'));
        assert!(is_allowed_char('ñ'));
        assert!(is_allowed_char('\n'));
        assert!(!is_allowed_char('A'));
        assert!(!is_allowed_char('!'));
        assert!(!is_allowed_char('ç'));
    }
}
