//! Ingredient text normalisation applied before tokenisation.
//!
//! The transform is a fixed sequence of regex passes over the lower-cased
//! input. Parenthesised content is removed with a non-nested pattern that
//! stops at the first closing bracket, so `"a (b (c) d) e"` normalises to
//! `"a  d e"`: the tail ` d` of the outer remark survives and its stray `)` is
//! dropped by the character filter. Nested brackets are not supported.

use regex::Regex;
use std::sync::LazyLock;

/// Percentages such as `12%`, `0.5 %`.
static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "static pattern cannot fail")]
    Regex::new(r"\d+(\.\d+)?\s?%").expect("valid regex")
});

/// First closing bracket ends the match.
static PARENTHESISED: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "static pattern cannot fail")]
    Regex::new(r"\([^)]*\)").expect("valid regex")
});

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "static pattern cannot fail")]
    Regex::new(r"[^a-z0-9, ]").expect("valid regex")
});

/// Clean an ingredient list for the classifier.
///
/// Lower-cases the text, drops percentages and parenthesised remarks, strips
/// every character outside `[a-z0-9, ]` and trims the result. Empty input
/// yields an empty string.
///
/// # Examples
///
/// ```
/// use ingredient_nova::text::normalize;
///
/// assert_eq!(normalize("WHEAT Flour (12%), Salt (organic)"), "wheat flour , salt");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let lower = text.to_lowercase();
    let without_percentages = PERCENTAGE.replace_all(&lower, "");
    let without_remarks = PARENTHESISED.replace_all(&without_percentages, "");
    let cleaned = DISALLOWED.replace_all(&without_remarks, "");
    cleaned.trim().to_owned()
}
