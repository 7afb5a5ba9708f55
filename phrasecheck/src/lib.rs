//! Phrasecheck - lexical phrase-presence engine for SEO content audits
//!
//! Decides whether expected phrases occur in fetched page text. Exact phrases
//! are checked by containment after normalization; LSI phrases are checked
//! word by word through a cascade of lemma, stem, fuzzy stem and truncated
//! prefix matching, so inflected and transliterated forms still count.

pub mod cascade;
mod checker;
pub mod config;
pub mod document;
pub mod interface;
pub mod lemma;
pub mod normalize;
pub mod phrase;
pub mod stem;
pub mod vocabulary;

pub use checker::{meta_matches, meta_similarity, PhraseChecker};
pub use config::{MatchConfig, MatchSettings};
pub use interface::*;
