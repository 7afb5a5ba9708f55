//! Batch checks driven from files on disk: pages JSON, TSV dictionaries and
//! settings JSON, the way the CLI feeds the checker.

use phrasecheck::lemma::DictionaryLemmatizer;
use phrasecheck::{
    BatchSummary, ConfigError, Language, MatchConfig, MatchSettings, MatchTier, PageInput, PhraseCheckError,
    PhraseChecker, PhraseKind,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const PAGES_JSON: &str = r#"[
  {
    "url": "https://apteka.example/ua/always-night",
    "language": "uk",
    "title": "Прокладки Always нічні | Ціна від 45 грн",
    "description": "Гігієнічні прокладки для ночі",
    "body": "Завжди нічні прокладки гігієнічні. Купити з доставкою.",
    "expected_title": "прокладки always нічні",
    "expected_description": "Гігієнічні прокладки для ночі",
    "exact_phrases": "прокладки always, з доставкою",
    "lsi_phrases": "олвейс нічний\nтампони"
  },
  {
    "url": "https://apteka.example/ru/nurofen",
    "language": "ru",
    "fetch_error": "HTTP 404",
    "lsi_phrases": "нурофен"
  },
  {
    "url": "https://apteka.example/ru/no-shpa",
    "title": "Но-шпа таблетки",
    "body": "Но-шпа, 40 мг, таблетки №24. Спазмолитик.",
    "expected_title": "Но-шпа форте",
    "lsi_phrases": "таблетками но-шпы"
  }
]"#;

const DICTIONARY_TSV: &str = "\
# form\tlemma...
завжди\talways
олвейс\talways\tолвейс
нічні\tнічний
прокладки\tпрокладка
";

struct Fixture {
    _dir: TempDir,
    pages: Vec<PageInput>,
    dictionary: DictionaryLemmatizer,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let pages_path = dir.path().join("pages.json");
    let dict_path = dir.path().join("uk.tsv");
    fs::write(&pages_path, PAGES_JSON).unwrap();
    fs::write(&dict_path, DICTIONARY_TSV).unwrap();

    let pages: Vec<PageInput> = serde_json::from_str(&fs::read_to_string(&pages_path).unwrap()).unwrap();
    let mut dictionary = DictionaryLemmatizer::new();
    dictionary.load_tsv(&dict_path).unwrap();
    Fixture { _dir: dir, pages, dictionary }
}

fn checker(dictionary: DictionaryLemmatizer) -> PhraseChecker {
    PhraseChecker::default().with_lemmatizer(Arc::new(dictionary))
}

#[test]
fn test_pages_parse_with_defaults() {
    let f = fixture();
    assert_eq!(f.pages.len(), 3);
    assert_eq!(f.pages[0].language, Some(Language::Ua));
    assert_eq!(f.pages[2].language, None);
    assert_eq!(f.pages[2].language_or_default(), Language::Ru);
    assert_eq!(f.dictionary.len(), 4);
}

#[test]
fn test_batch_reports_in_input_order() {
    let f = fixture();
    let reports = checker(f.dictionary).check_pages(&f.pages);
    let urls: Vec<&str> = reports.iter().map(|r| r.url.as_str()).collect();
    let expected: Vec<&str> = f.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls, expected);
}

#[test]
fn test_ukrainian_page_report() {
    let f = fixture();
    let report = checker(f.dictionary).check_page(&f.pages[0]);
    assert_eq!(report.language, Language::Ua);
    assert!(report.load_error.is_none());

    let meta = report.meta.unwrap();
    assert!(meta.title_match, "price tail is normalized away");
    assert!(meta.description_match);

    let outcome: Vec<(PhraseKind, &str, bool)> = report
        .phrases
        .iter()
        .map(|p| (p.kind, p.phrase.as_str(), p.found))
        .collect();
    assert_eq!(
        outcome,
        vec![
            (PhraseKind::Exact, "прокладки always", true),
            (PhraseKind::Exact, "з доставкою", true),
            (PhraseKind::Lsi, "олвейс нічний", true),
            (PhraseKind::Lsi, "тампони", false),
        ]
    );
}

#[test]
fn test_fetch_error_page_skips_phrases() {
    let f = fixture();
    let report = checker(f.dictionary).check_page(&f.pages[1]);
    assert_eq!(report.load_error.as_deref(), Some("HTTP 404"));
    assert!(report.phrases.is_empty());
    assert!(report.has_issue());
}

#[test]
fn test_short_word_fails_after_inflected_matches() {
    let f = fixture();
    let report = checker(f.dictionary).check_page(&f.pages[2]);
    assert_eq!(report.language, Language::Ru);

    let meta = report.meta.unwrap();
    assert!(!meta.title_match);
    assert!(meta.title_similarity > 0.0 && meta.title_similarity < 100.0);

    // "шпы" is too short to truncate and its stem is far from "шпа"
    let phrase = &report.phrases[0];
    assert!(!phrase.found);
    let tiers: Vec<(&str, MatchTier)> = phrase
        .per_word_details
        .iter()
        .map(|w| (w.word.as_str(), w.matched_tier))
        .collect();
    assert_eq!(
        tiers,
        vec![
            ("таблетками", MatchTier::StemExact),
            ("но", MatchTier::Lemma),
            ("шпы", MatchTier::None),
        ]
    );
}

#[test]
fn test_summary_counts() {
    let f = fixture();
    let checker = checker(f.dictionary);
    let reports = checker.check_pages(&f.pages);
    let summary = checker.summarize(&reports);

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.load_errors, 1);
    assert_eq!(summary.title_mismatches, 1);
    assert_eq!(summary.description_mismatches, 0);
    assert_eq!(summary.pages_with_missing_phrases, 2);
    assert_eq!(summary.phrases_not_found, 2);
    assert_eq!(BatchSummary::from_reports(&[]), BatchSummary::default());
}

#[test]
fn test_reports_serialize_to_json() {
    let f = fixture();
    let reports = checker(f.dictionary).check_pages(&f.pages);
    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["language"], "ua");
    assert_eq!(json[0]["phrases"][2]["kind"], "lsi");
    assert_eq!(json[1]["load_error"], "HTTP 404");
}

// ============================================================
// Settings files
// ============================================================

#[test]
fn test_settings_file_partial_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "fuzzy_ratio_threshold": 75, "truncation_enabled": false }"#).unwrap();

    let settings = MatchSettings::load(&path).unwrap();
    let config = MatchConfig::try_from(settings).unwrap();
    assert_eq!(config.fuzzy_ratio_threshold(), 75);
    assert!(!config.truncation_enabled());
    assert_eq!(config.truncation_max_chars_removed(), 3);
    assert_eq!(config.truncation_min_original_len(), 7);
    assert_eq!(config.truncation_min_final_len(), 4);
}

#[test]
fn test_settings_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    fs::write(&path, r#"{ "fuzzy_ratio_threshold": 150 }"#).unwrap();
    let err = MatchConfig::try_from(MatchSettings::load(&path).unwrap()).unwrap_err();
    assert_eq!(err, ConfigError::FuzzyThresholdOutOfRange(150));

    fs::write(&path, r#"{ "truncation_max_chars_removed": -1 }"#).unwrap();
    assert!(matches!(MatchSettings::load(&path), Err(PhraseCheckError::Json(_))));

    let missing = dir.path().join("missing.json");
    assert!(matches!(MatchSettings::load(&missing), Err(PhraseCheckError::Io(_))));
}
