//! Body text tokenization for the content index.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Token characters are letters, digits and apostrophes; everything else splits.
static TOKEN_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}']+").expect("valid token split regex"));

/// Splits `body` into lowercase index tokens.
///
/// Empty tokens are discarded and each token appears once, in order of first
/// occurrence.
pub fn tokenize(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TOKEN_SPLIT_RE
        .split(body)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
