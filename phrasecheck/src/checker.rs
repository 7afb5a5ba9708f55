//! PhraseChecker - main API for checking pages against phrase lists
//!
//! Owns the match configuration, the process-wide lemma cache and one
//! stemmer per language. Pages are independent, so a batch is checked in
//! parallel on the rayon pool; phrases within one page run sequentially.
//!
//! Concurrency Model:
//! - `PageDocument` is built once per page and shared by reference
//! - `LemmaCache` is the only shared mutable state (RwLock, insert-if-absent)
//! - Batch order is preserved in the returned reports

use crate::cascade::fuzzy_ratio;
use crate::config::MatchConfig;
use crate::document::{Linguistics, PageDocument};
use crate::interface::{BatchSummary, Language, MetaReport, PageInput, PageReport, PhraseKind};
use crate::lemma::{LemmaCache, Lemmatizer};
use crate::normalize::normalize;
use crate::phrase::evaluate_phrase_list;
use crate::stem::{SnowballStemmer, WordStemmer};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Once};

static RAYON_INIT: Once = Once::new();

/// Initialize the global rayon pool with named threads, once per process.
fn init_rayon() {
    RAYON_INIT.call_once(|| {
        let _ = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("phrasecheck-rayon-{}", i))
            .build_global();
    });
}

/// A page title/description matches the expectation when both normalize to
/// the same text. With no (or a blank) expectation the page value must be
/// blank too.
pub fn meta_matches(expected: Option<&str>, actual: &str) -> bool {
    match expected.map(str::trim).filter(|e| !e.is_empty()) {
        Some(expected) => normalize(actual) == normalize(expected),
        None => actual.trim().is_empty(),
    }
}

/// Similarity of the page value to the expectation on their normalized
/// forms, 0–100 rounded to one decimal. A missing expectation counts as
/// empty, so a blank page value scores 100 against it.
pub fn meta_similarity(expected: Option<&str>, actual: &str) -> f64 {
    let expected = normalize(expected.unwrap_or_default());
    let score = fuzzy_ratio(&normalize(actual), &expected);
    (score * 10.0).round() / 10.0
}

pub struct PhraseChecker {
    config: MatchConfig,
    lemmas: Option<Arc<LemmaCache>>,
    stemmers: HashMap<Language, Arc<dyn WordStemmer>>,
}

impl PhraseChecker {
    /// Checker with Snowball stemmers for every language and no lemmatizer.
    pub fn new(config: MatchConfig) -> Self {
        init_rayon();
        let stemmers = Language::ALL
            .into_iter()
            .map(|lang| (lang, Arc::new(SnowballStemmer::new(lang)) as Arc<dyn WordStemmer>))
            .collect();
        Self {
            config,
            lemmas: None,
            stemmers,
        }
    }

    /// Enable the lemma tier with a fresh cache around `lemmatizer`.
    pub fn with_lemmatizer(self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.with_lemma_cache(Arc::new(LemmaCache::new(lemmatizer)))
    }

    /// Share an existing cache (e.g. between checkers with different configs).
    pub fn with_lemma_cache(mut self, cache: Arc<LemmaCache>) -> Self {
        self.lemmas = Some(cache);
        self
    }

    pub fn with_stemmer(mut self, language: Language, stemmer: Arc<dyn WordStemmer>) -> Self {
        self.stemmers.insert(language, stemmer);
        self
    }

    /// Disable stemming for a language; its stem tiers are skipped.
    pub fn without_stemmer(mut self, language: Language) -> Self {
        self.stemmers.remove(&language);
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn lemma_cache(&self) -> Option<&Arc<LemmaCache>> {
        self.lemmas.as_ref()
    }

    pub fn linguistics(&self, language: Language) -> Linguistics {
        Linguistics::new(self.lemmas.clone(), self.stemmers.get(&language).cloned())
    }

    pub fn build_document(&self, raw_text: Option<&str>, language: Language) -> PageDocument {
        PageDocument::new(raw_text, self.linguistics(language))
    }

    /// Check one page: meta fields, exact phrases, then LSI phrases.
    pub fn check_page(&self, page: &PageInput) -> PageReport {
        let language = page.language_or_default();
        if let Some(err) = &page.fetch_error {
            tracing::debug!(url = %page.url, %language, error = %err, "skipping page with load error");
            return PageReport {
                url: page.url.clone(),
                language,
                load_error: Some(err.clone()),
                meta: None,
                phrases: Vec::new(),
            };
        }

        let meta = (page.expected_title.is_some() || page.expected_description.is_some()).then(|| {
            let title = page.expected_title.as_deref();
            let description = page.expected_description.as_deref();
            MetaReport {
                title_match: meta_matches(title, &page.title),
                description_match: meta_matches(description, &page.description),
                title_similarity: meta_similarity(title, &page.title),
                description_similarity: meta_similarity(description, &page.description),
            }
        });

        let full_text = page.full_text();
        let doc = self.build_document(Some(&full_text), language);
        if doc.normalized_text().is_empty() {
            tracing::debug!(url = %page.url, %language, "page text is empty after normalization");
        }

        let mut phrases = evaluate_phrase_list(page.exact_phrases.as_deref(), PhraseKind::Exact, &doc, &self.config);
        phrases.extend(evaluate_phrase_list(page.lsi_phrases.as_deref(), PhraseKind::Lsi, &doc, &self.config));

        tracing::debug!(
            url = %page.url,
            %language,
            phrases = phrases.len(),
            missing = phrases.iter().filter(|p| !p.found).count(),
            "page checked"
        );

        PageReport {
            url: page.url.clone(),
            language,
            load_error: None,
            meta,
            phrases,
        }
    }

    /// Check pages in parallel. Reports come back in input order.
    pub fn check_pages(&self, pages: &[PageInput]) -> Vec<PageReport> {
        let reports: Vec<PageReport> = pages.par_iter().map(|page| self.check_page(page)).collect();
        tracing::info!(
            pages = reports.len(),
            lemma_cache = self.lemmas.as_ref().map_or(0, |c| c.len()),
            "batch checked"
        );
        reports
    }

    pub fn summarize(&self, reports: &[PageReport]) -> BatchSummary {
        BatchSummary::from_reports(reports)
    }
}

impl Default for PhraseChecker {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
