//! Cleanup helpers for game text.
//!
//! Descriptions arrive with inline markup (`<AbilityPowerText>`, `<img ...>`)
//! and `{placeholder}` tokens that must be removed before pattern matching.

use regex::Regex;
use std::sync::LazyLock;

// RATIONALE: compile-time constant patterns; `.expect()` cannot fire.
static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img[^>]*>").expect("IMG_TAG: compile-time constant"));
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("ANY_TAG: compile-time constant"));
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("PLACEHOLDER: compile-time constant"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE: compile-time constant"));
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("LEADING_FLOAT: compile-time constant")
});
static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("FIRST_INTEGER: compile-time constant"));

/// Strips markup and collapses whitespace.
pub fn clean_game_text(text: &str) -> String {
    let without_img = IMG_TAG.replace_all(text, "");
    let without_tags = ANY_TAG.replace_all(&without_img, "");
    WHITESPACE.replace_all(&without_tags, " ").trim().to_string()
}

/// Like [`clean_game_text`], but also drops `{placeholder}` tokens.
pub fn clean_description(text: &str) -> String {
    let without_tags = ANY_TAG.replace_all(text, "");
    let without_placeholders = PLACEHOLDER.replace_all(&without_tags, "");
    WHITESPACE
        .replace_all(&without_placeholders, " ")
        .trim()
        .to_string()
}

/// Parses the numeric prefix of `text` (`"55.2%"` -> `55.2`).
pub fn leading_float(text: &str) -> Option<f64> {
    LEADING_FLOAT
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Returns the first run of digits in `text` (`"about 120 matches"` -> `120`).
pub fn first_integer(text: &str) -> Option<u32> {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_game_text_strips_markup() {
        let raw = "Deals <AbilityPowerText>40</> bonus <img src=\"x.png\"/>damage\n to   nearby enemies.";
        assert_eq!(clean_game_text(raw), "Deals 40 bonus damage to nearby enemies.");
    }

    #[test]
    fn test_clean_description_drops_placeholders() {
        let raw = "Slows by {SlowAmount}% for <b>2s</b>.";
        assert_eq!(clean_description(raw), "Slows by % for 2s.");
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("55.2%"), Some(55.2));
        assert_eq!(leading_float("  48"), Some(48.0));
        assert_eq!(leading_float("2."), Some(2.0));
        assert_eq!(leading_float("WR 50"), None);
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(first_integer("1204 matches"), Some(1204));
        assert_eq!(first_integer("about 12 games"), Some(12));
        assert_eq!(first_integer("none"), None);
    }
}
