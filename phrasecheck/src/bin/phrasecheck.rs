//! Command-line front end for phrase-presence checks
//!
//! Run with: cargo run --bin phrasecheck -- check --pages pages.json

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use phrasecheck::lemma::DictionaryLemmatizer;
use phrasecheck::normalize::normalize;
use phrasecheck::vocabulary::{unique_lemmas, DEFAULT_DIFF_LIMIT};
use phrasecheck::{MatchConfig, MatchSettings, PageInput, PhraseChecker};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a batch of fetched pages for their expected phrases
    Check(CheckArgs),
    /// Print the normalized form of a text
    Normalize {
        text: String,
    },
    /// List lemmas used by the candidate text but not by the base text
    Diff {
        #[arg(long)]
        base: PathBuf,

        #[arg(long)]
        candidate: PathBuf,

        /// Lemma dictionary (TSV), may be repeated
        #[arg(short, long)]
        dictionary: Vec<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_DIFF_LIMIT)]
        limit: usize,
    },
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// JSON array of pages
    #[arg(short, long)]
    pages: PathBuf,

    /// Lemma dictionary (TSV), may be repeated. Without one the lemma tier is off.
    #[arg(short, long)]
    dictionary: Vec<PathBuf>,

    /// Match settings (JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    fuzzy_threshold: Option<u8>,

    #[arg(long)]
    no_truncation: bool,

    #[arg(long)]
    trunc_max_remove: Option<usize>,

    #[arg(long)]
    trunc_min_original: Option<usize>,

    #[arg(long)]
    trunc_min_final: Option<usize>,

    /// Print only the batch summary
    #[arg(long)]
    summary: bool,
}

impl CheckArgs {
    fn match_config(&self) -> Result<MatchConfig> {
        let mut settings = match &self.config {
            Some(path) => MatchSettings::load(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?,
            None => MatchSettings::default(),
        };
        if let Some(v) = self.fuzzy_threshold {
            settings.fuzzy_ratio_threshold = v;
        }
        if self.no_truncation {
            settings.truncation_enabled = false;
        }
        if let Some(v) = self.trunc_max_remove {
            settings.truncation_max_chars_removed = v;
        }
        if let Some(v) = self.trunc_min_original {
            settings.truncation_min_original_len = v;
        }
        if let Some(v) = self.trunc_min_final {
            settings.truncation_min_final_len = v;
        }
        MatchConfig::try_from(settings).context("Invalid match settings")
    }
}

fn load_dictionaries(paths: &[PathBuf]) -> Result<Option<DictionaryLemmatizer>> {
    if paths.is_empty() {
        return Ok(None);
    }
    let mut dict = DictionaryLemmatizer::new();
    for path in paths {
        dict.load_tsv(path)
            .with_context(|| format!("Failed to load dictionary {}", path.display()))?;
    }
    tracing::info!(forms = dict.len(), files = paths.len(), "lemma dictionary loaded");
    Ok(Some(dict))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run_check(args: &CheckArgs) -> Result<()> {
    let config = args.match_config()?;
    let mut checker = PhraseChecker::new(config);
    if let Some(dict) = load_dictionaries(&args.dictionary)? {
        checker = checker.with_lemmatizer(Arc::new(dict));
    }

    let pages: Vec<PageInput> = serde_json::from_str(&read_text(&args.pages)?)
        .with_context(|| format!("Failed to parse pages from {}", args.pages.display()))?;
    tracing::info!(pages = pages.len(), "checking pages");

    let reports = checker.check_pages(&pages);
    let summary = checker.summarize(&reports);
    tracing::info!(
        load_errors = summary.load_errors,
        pages_with_missing_phrases = summary.pages_with_missing_phrases,
        phrases_not_found = summary.phrases_not_found,
        "check finished"
    );

    let out = if args.summary {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string_pretty(&reports)?
    };
    println!("{}", out);
    Ok(())
}

fn run_diff(base: &Path, candidate: &Path, dictionary: &[PathBuf], limit: usize) -> Result<()> {
    let dict = load_dictionaries(dictionary)?.unwrap_or_default();
    let diff = unique_lemmas(&read_text(base)?, &read_text(candidate)?, &dict, limit);
    println!("{}", serde_json::to_string_pretty(&diff)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Check(args) => run_check(args),
        Command::Normalize { text } => {
            println!("{}", normalize(text));
            Ok(())
        }
        Command::Diff {
            base,
            candidate,
            dictionary,
            limit,
        } => run_diff(base, candidate, dictionary, *limit),
    }
}
