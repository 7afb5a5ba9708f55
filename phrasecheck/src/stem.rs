//! Stemming: Snowball stemmers per language and the document stem set.

use crate::interface::Language;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;

/// Stemmer seam. `None` means the word produced no usable stem.
pub trait WordStemmer: Send + Sync {
    fn stem_word(&self, word: &str) -> Option<String>;
}

/// Snowball stemmer for a page language.
///
/// There is no Ukrainian Snowball algorithm; Ukrainian pages use the Russian
/// one, which leaves most Ukrainian-only endings intact and lets the fuzzy
/// tier absorb the difference.
pub struct SnowballStemmer {
    language: Language,
    stemmer: Stemmer,
}

impl SnowballStemmer {
    pub fn new(language: Language) -> Self {
        let algorithm = match language {
            Language::Ru | Language::Ua => Algorithm::Russian,
            Language::En => Algorithm::English,
        };
        Self {
            language,
            stemmer: Stemmer::create(algorithm),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl WordStemmer for SnowballStemmer {
    fn stem_word(&self, word: &str) -> Option<String> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return None;
        }
        let stem = self.stemmer.stem(&word);
        if stem.is_empty() {
            None
        } else {
            Some(stem.into_owned())
        }
    }
}

impl std::fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballStemmer").field("language", &self.language).finish()
    }
}

/// Stem every whitespace token of normalized text. Pure; call once per document.
pub fn build_stem_set(normalized_text: &str, stemmer: &dyn WordStemmer) -> BTreeSet<String> {
    normalized_text
        .split_whitespace()
        .filter_map(|token| stemmer.stem_word(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russian_stems_inflections_together() {
        let s = SnowballStemmer::new(Language::Ru);
        assert_eq!(s.stem_word("ночные"), Some("ночн".to_string()));
        assert_eq!(s.stem_word("ночных"), s.stem_word("ночные"));
        assert_eq!(s.stem_word("Прокладки"), s.stem_word("прокладка"));
    }

    #[test]
    fn test_empty_word_has_no_stem() {
        let s = SnowballStemmer::new(Language::Ru);
        assert_eq!(s.stem_word("  "), None);
    }

    #[test]
    fn test_english_algorithm() {
        let s = SnowballStemmer::new(Language::En);
        assert_eq!(s.stem_word("running"), Some("run".to_string()));
        assert_eq!(s.language(), Language::En);
    }

    #[test]
    fn test_build_stem_set_dedups() {
        let s = SnowballStemmer::new(Language::Ru);
        let stems = build_stem_set("ночные ночных прокладки", &s);
        assert_eq!(stems.len(), 2);
        assert!(stems.contains("ночн"));
    }

    #[test]
    fn test_build_stem_set_deterministic() {
        let s = SnowballStemmer::new(Language::Ua);
        let text = "завжди нічні прокладки гігієнічні";
        assert_eq!(build_stem_set(text, &s), build_stem_set(text, &s));
        assert!(build_stem_set("", &s).is_empty());
    }
}
