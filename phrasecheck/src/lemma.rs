//! Lemmatization and the per-word lemma cache.
//!
//! A `Lemmatizer` maps a word form to its candidate dictionary base forms.
//! `LemmaCache` memoizes `lemmas_of` per word for the lifetime of the
//! process; entries are never invalidated since the mapping is stable.

use crate::interface::PhraseCheckResult;
use crate::normalize::is_alphanumeric_token;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Morphological analyzer seam.
pub trait Lemmatizer: Send + Sync {
    /// All plausible base forms for a lowercase word, primary parse first.
    /// Empty when the analyzer does not know the word.
    fn analyze(&self, word: &str) -> Vec<String>;

    /// Lemmatize a whole normalized text, one lemma per whitespace token.
    /// Unknown words stand for themselves.
    fn lemmatize_text(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|token| {
                self.analyze(token)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| token.to_string())
            })
            .collect()
    }
}

/// Table-driven lemmatizer: word form → candidate lemmas in insertion order.
///
/// Also carries brand aliases, e.g. `олвейс → always`, which is how a Cyrillic
/// brand spelling meets its Latin form on a page.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    forms: HashMap<String, Vec<String>>,
}

impl DictionaryLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `lemma` as a base form of `form`. Duplicates are ignored.
    pub fn insert(&mut self, form: &str, lemma: &str) {
        let form = form.trim().to_lowercase();
        let lemma = lemma.trim().to_lowercase();
        if form.is_empty() || lemma.is_empty() {
            return;
        }
        let lemmas = self.forms.entry(form).or_default();
        if !lemmas.contains(&lemma) {
            lemmas.push(lemma);
        }
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut dict = Self::new();
        for (form, lemma) in entries {
            dict.insert(form, lemma);
        }
        dict
    }

    /// Read tab-separated rows `form<TAB>lemma[<TAB>lemma...]`; `#` starts a comment line.
    pub fn read_tsv<R: Read>(&mut self, reader: R) -> PhraseCheckResult<()> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(reader);
        for record in rdr.records() {
            let record = record?;
            let mut fields = record.iter();
            let Some(form) = fields.next() else { continue };
            for lemma in fields {
                self.insert(form, lemma);
            }
        }
        Ok(())
    }

    pub fn load_tsv(&mut self, path: &Path) -> PhraseCheckResult<()> {
        let file = std::fs::File::open(path)?;
        self.read_tsv(file)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn analyze(&self, word: &str) -> Vec<String> {
        self.forms.get(word).cloned().unwrap_or_default()
    }
}

/// Process-wide memo of `word → candidate lemmas`.
///
/// Readers take the shared lock; a miss computes outside any lock and then
/// inserts if absent, so concurrent misses on one key may both compute but
/// always converge on the same stored value.
pub struct LemmaCache {
    lemmatizer: Arc<dyn Lemmatizer>,
    entries: RwLock<HashMap<String, Arc<BTreeSet<String>>>>,
}

impl LemmaCache {
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self {
            lemmatizer,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn lemmatizer(&self) -> &dyn Lemmatizer {
        self.lemmatizer.as_ref()
    }

    /// Candidate lemmas for `word` (trimmed, lowercased). Empty word → empty set.
    ///
    /// Only alphanumeric base forms are kept. A word the analyzer cannot
    /// parse is its own lemma.
    pub fn lemmas_of(&self, word: &str) -> Arc<BTreeSet<String>> {
        let key = word.trim().to_lowercase();
        if key.is_empty() {
            return Arc::new(BTreeSet::new());
        }
        if let Some(hit) = self.entries.read().get(&key) {
            return Arc::clone(hit);
        }
        let computed = Arc::new(self.compute(&key));
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(key).or_insert(computed))
    }

    fn compute(&self, key: &str) -> BTreeSet<String> {
        let mut lemmas: BTreeSet<String> = self
            .lemmatizer
            .analyze(key)
            .into_iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| is_alphanumeric_token(l))
            .collect();
        if lemmas.is_empty() && is_alphanumeric_token(key) {
            lemmas.insert(key.to_string());
        }
        lemmas
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for LemmaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemmaCache").field("entries", &self.len()).finish()
    }
}
