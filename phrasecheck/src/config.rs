//! Match settings.
//!
//! `MatchSettings` is the user-adjustable, serde-facing form (JSON settings
//! file or CLI overrides). `MatchConfig` is the validated, immutable form the
//! cascade reads; it can only be obtained through `TryFrom<MatchSettings>` or
//! `Default`, so a bad threshold never reaches the matcher.

use crate::interface::{ConfigError, PhraseCheckResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Minimum stem similarity (0–100) for the fuzzy stem tier.
pub const DEFAULT_FUZZY_RATIO_THRESHOLD: u8 = 90;

pub const DEFAULT_TRUNCATION_ENABLED: bool = true;

/// Most trailing characters the truncation tier removes from a query word.
pub const DEFAULT_TRUNCATION_MAX_CHARS_REMOVED: usize = 3;

/// Words shorter than this never reach the truncation tier.
pub const DEFAULT_TRUNCATION_MIN_ORIGINAL_LEN: usize = 7;

/// Truncated prefixes shorter than this are never tried.
pub const DEFAULT_TRUNCATION_MIN_FINAL_LEN: usize = 4;

/// User-adjustable settings, all optional in the JSON form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub fuzzy_ratio_threshold: u8,
    pub truncation_enabled: bool,
    pub truncation_max_chars_removed: usize,
    pub truncation_min_original_len: usize,
    pub truncation_min_final_len: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            fuzzy_ratio_threshold: DEFAULT_FUZZY_RATIO_THRESHOLD,
            truncation_enabled: DEFAULT_TRUNCATION_ENABLED,
            truncation_max_chars_removed: DEFAULT_TRUNCATION_MAX_CHARS_REMOVED,
            truncation_min_original_len: DEFAULT_TRUNCATION_MIN_ORIGINAL_LEN,
            truncation_min_final_len: DEFAULT_TRUNCATION_MIN_FINAL_LEN,
        }
    }
}

impl MatchSettings {
    pub fn from_json_str(json: &str) -> PhraseCheckResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> PhraseCheckResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Validated cascade configuration. Immutable for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchConfig {
    fuzzy_ratio_threshold: u8,
    truncation_enabled: bool,
    truncation_max_chars_removed: usize,
    truncation_min_original_len: usize,
    truncation_min_final_len: usize,
}

impl MatchConfig {
    pub fn fuzzy_ratio_threshold(&self) -> u8 {
        self.fuzzy_ratio_threshold
    }

    pub fn truncation_enabled(&self) -> bool {
        self.truncation_enabled
    }

    pub fn truncation_max_chars_removed(&self) -> usize {
        self.truncation_max_chars_removed
    }

    pub fn truncation_min_original_len(&self) -> usize {
        self.truncation_min_original_len
    }

    pub fn truncation_min_final_len(&self) -> usize {
        self.truncation_min_final_len
    }

    pub fn settings(&self) -> MatchSettings {
        MatchSettings {
            fuzzy_ratio_threshold: self.fuzzy_ratio_threshold,
            truncation_enabled: self.truncation_enabled,
            truncation_max_chars_removed: self.truncation_max_chars_removed,
            truncation_min_original_len: self.truncation_min_original_len,
            truncation_min_final_len: self.truncation_min_final_len,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        let s = MatchSettings::default();
        Self {
            fuzzy_ratio_threshold: s.fuzzy_ratio_threshold,
            truncation_enabled: s.truncation_enabled,
            truncation_max_chars_removed: s.truncation_max_chars_removed,
            truncation_min_original_len: s.truncation_min_original_len,
            truncation_min_final_len: s.truncation_min_final_len,
        }
    }
}

impl TryFrom<MatchSettings> for MatchConfig {
    type Error = ConfigError;

    fn try_from(s: MatchSettings) -> Result<Self, Self::Error> {
        if s.fuzzy_ratio_threshold > 100 {
            return Err(ConfigError::FuzzyThresholdOutOfRange(s.fuzzy_ratio_threshold));
        }
        // An empty prefix would match every page word.
        if s.truncation_min_final_len == 0 {
            return Err(ConfigError::ZeroMinFinalLength);
        }
        Ok(Self {
            fuzzy_ratio_threshold: s.fuzzy_ratio_threshold,
            truncation_enabled: s.truncation_enabled,
            truncation_max_chars_removed: s.truncation_max_chars_removed,
            truncation_min_original_len: s.truncation_min_original_len,
            truncation_min_final_len: s.truncation_min_final_len,
        })
    }
}
