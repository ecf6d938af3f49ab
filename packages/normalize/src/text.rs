//! The name normalization pipeline.
//!
//! Every producer and consumer of district keys goes through
//! [`normalize_name`], so the output must stay bit-for-bit stable.

use regex::Regex;
use std::sync::LazyLock;

/// `&` with any surrounding whitespace.
static AMPERSAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*&\s*").expect("valid regex"));

/// Hyphen, en-dash, and em-dash.
static DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[-\u{2013}\u{2014}]").expect("valid regex"));

/// A parenthesized aside such as `(7-12)` or `(Regional)`.
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// Anything that is not an ASCII word character or whitespace.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_\s]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// District-type suffixes. At most one is stripped, first match wins.
pub const DISTRICT_SUFFIXES: &[&str] = &[
    " regional school district",
    " school district",
    " public schools",
];

/// Grade-level suffixes, stripped after [`DISTRICT_SUFFIXES`].
pub const LEVEL_SUFFIXES: &[&str] = &[" elementary", " secondary"];

/// Normalizes a free-text district or school name.
///
/// The pipeline:
/// 1. Trim and lowercase
/// 2. `&` becomes `and`
/// 3. Dashes become spaces
/// 4. Parenthesized asides are dropped (unless `strip_parentheticals` is off)
/// 5. Remaining punctuation is stripped
/// 6. Whitespace is collapsed and trimmed
/// 7. One district suffix is stripped, then one grade-level suffix
#[must_use]
pub fn normalize_name(name: &str, strip_parentheticals: bool) -> String {
    let mut s = name.trim().to_lowercase();
    if s.is_empty() {
        return s;
    }

    s = AMPERSAND_RE.replace_all(&s, " and ").into_owned();
    s = DASH_RE.replace_all(&s, " ").into_owned();
    if strip_parentheticals {
        s = PARENTHETICAL_RE.replace_all(&s, " ").into_owned();
    }
    s = PUNCTUATION_RE.replace_all(&s, "").into_owned();
    s = WHITESPACE_RE.replace_all(&s, " ").trim().to_string();

    let s = strip_first_suffix(s, DISTRICT_SUFFIXES);
    strip_first_suffix(s, LEVEL_SUFFIXES)
}

fn strip_first_suffix(s: String, suffixes: &[&str]) -> String {
    suffixes
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .map_or_else(|| s.clone(), str::to_string)
}
