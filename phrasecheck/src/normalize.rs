//! Text normalization for phrase search
//!
//! Page text and phrases go through the same pipeline so that containment and
//! word comparisons happen on a canonical lowercase form with prices,
//! template placeholders and punctuation stripped.

use once_cell::sync::Lazy;
use regex::Regex;

/// "price from <amount><unit>" in RU/UA/EN, up to the next `-`/`|` separator or end of line
static PRICE_FROM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)(цена от|ціна від|price from)\s*[^-|\n\r<]+?(\s*[-|]|\s*$)").unwrap()
});

/// Template placeholders such as `%min_price%`
static PRICE_PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%[a-z_]+price[a-z_]*%").unwrap()
});

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%[a-z_]+%").unwrap()
});

/// Bare amounts with an optional currency unit
static AMOUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(\.\d+)?\s*(грн|uah|usd|eur)?").unwrap()
});

static SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[/\\|\-–—]").unwrap()
});

/// Whitespace including NBSP and zero-width space
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\x{00a0}\x{200b}]+").unwrap()
});

static PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s]").unwrap()
});

static PHRASE_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[,\n]+").unwrap()
});

/// Stripping punctuation can join words into a new price phrase
/// ("цена, от 5" → "цена от"), so the pipeline is re-applied until stable.
/// Each pass only removes text; this bound is never reached in practice.
const MAX_PASSES: usize = 4;

fn normalize_pass(text: &str) -> String {
    let lower = text.to_lowercase();
    let s = PRICE_FROM_REGEX.replace_all(&lower, " ");
    let s = PRICE_PLACEHOLDER_REGEX.replace_all(&s, " ");
    let s = PLACEHOLDER_REGEX.replace_all(&s, " ");
    let s = AMOUNT_REGEX.replace_all(&s, " ");
    let s = SEPARATOR_REGEX.replace_all(&s, " ");
    let s = WHITESPACE_REGEX.replace_all(&s, " ");
    let s = PUNCTUATION_REGEX.replace_all(&s, "");
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize text for search. Empty input yields an empty string.
///
/// Lowercases, removes "price from" phrases, `%...%` placeholders and
/// currency amounts, turns separators into spaces, strips punctuation
/// (Unicode letters and digits are kept) and collapses whitespace.
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut current = normalize_pass(text);
    for _ in 1..MAX_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// `normalize` for optional input (absent cells, missing fields)
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Split a free-text phrase list on commas and newlines, trimming entries
/// and dropping empty ones. Input order is preserved.
pub fn split_phrases(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    PHRASE_SEPARATOR_REGEX
        .split(raw)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// True if every char is alphanumeric and there is at least one.
/// Used to drop punctuation-only analyzer artifacts.
pub(crate) fn is_alphanumeric_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}
