//! Pattern Canonicalization Module
//!
//! Rewrites bracketed character classes into a normal form so that
//! textually different but equivalent patterns share one cache entry.
//! Everything outside `[...]` is left untouched.
//!
//! Only the literal sub-ranges `0-9`, `a-z` (and shorter `a-` ranges),
//! `A-Z` (and shorter `A-` ranges), and `_` are recognized; other ranges
//! are passed through in place. Negated classes (`[^...]`) receive no
//! special handling: the same substitutions apply positionally.

use std::sync::LazyLock;

use regex::Regex;

// Each substitution moves one recognized sub-range to the front of a
// bracket expression. Applying them from lowest to highest priority
// leaves every class ordered digits, lowercase, uppercase, underscore,
// with unrecognized characters trailing in their original order.
static UNDERSCORE_FRONT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[)([^\]]*)(_)([^\]]*)(\])").unwrap());
static UPPER_FRONT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[)([^\]]*)(A-[B-Z])([^\]]*)(\])").unwrap());
static LOWER_FRONT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[)([^\]]*)(a-[b-z])([^\]]*)(\])").unwrap());
static DIGIT_FRONT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[)([^\]]*)(0-9)([^\]]*)(\])").unwrap());
static WORD_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[)([^\]]*)(0-9a-zA-Z_)([^\]]*)(\])").unwrap());

// == Canonicalize ==
/// Rewrites a pattern into its canonical form.
///
/// Purely textual, deterministic, and idempotent:
/// `canonicalize(canonicalize(p)) == canonicalize(p)` for all `p`.
/// A class containing the full digits + lowercase + uppercase +
/// underscore combination collapses to `\w`; classes that only partially
/// match the recognized sub-ranges are reordered but never collapsed.
pub fn canonicalize(pattern: &str) -> String {
    let mut expr = pattern.to_string();

    // Underscores don't need escaping inside a class, but a double-escaped
    // sequence means the backslash itself is the escaped character; leave
    // those patterns alone rather than corrupt them.
    if !expr.contains(r"\\_") {
        expr = expr.replace(r"\_", "_");
        expr = UNDERSCORE_FRONT
            .replace_all(&expr, "$1$3$2$4$5")
            .into_owned();
    }
    expr = UPPER_FRONT.replace_all(&expr, "$1$3$2$4$5").into_owned();
    expr = LOWER_FRONT.replace_all(&expr, "$1$3$2$4$5").into_owned();
    expr = DIGIT_FRONT.replace_all(&expr, "$1$3$2$4$5").into_owned();
    expr = WORD_CLASS.replace_all(&expr, r"$1\w$2$4$5").into_owned();
    expr
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_classless_patterns_untouched() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize(r".*\S.*"), r".*\S.*");
        assert_eq!(canonicalize("(/)|(/(([^~])|(~[01]))+)"), "(/)|(/(([^~])|(~[01]))+)");
    }

    #[test]
    fn test_reorders_digits_before_lowercase() {
        assert_eq!(canonicalize("^[a-z0-9-]+$"), "^[0-9a-z-]+$");
    }

    #[test]
    fn test_reorders_with_underscore_last() {
        assert_eq!(canonicalize("^[a-z0-9-_]+$"), "^[0-9a-z_-]+$");
    }

    #[test]
    fn test_equivalent_spellings_share_one_form() {
        assert_eq!(canonicalize("[a-z0-9-_]"), canonicalize("[0-9a-z_-]"));
        assert_eq!(canonicalize("[0-9a-z_-]"), "[0-9a-z_-]");
    }

    #[test]
    fn test_reorders_every_class_in_the_pattern() {
        assert_eq!(
            canonicalize("^[a-z0-9-_]+[a-z0-9-_]+$"),
            "^[0-9a-z_-]+[0-9a-z_-]+$"
        );
    }

    #[test]
    fn test_full_word_combination_collapses() {
        assert_eq!(canonicalize("[A-Za-z0-9_]"), r"[\w]");
        assert_eq!(canonicalize(r"^[A-Za-z0-9-*&_]+$"), r"^[\w-*&]+$");
        assert_eq!(canonicalize("^[-a-zA-Z0-9._]*$"), r"^[\w-.]*$");
        assert_eq!(canonicalize("^[a-zA-Z0-9._-]*$"), r"^[\w.-]*$");
        assert_eq!(canonicalize("^[0-9a-zA-Z._-]+"), r"^[\w.-]+");
    }

    #[test]
    fn test_partial_combination_reorders_but_never_collapses() {
        // No underscore: three of the four components
        assert_eq!(canonicalize("^[a-zA-Z0-9]+$"), "^[0-9a-zA-Z]+$");
        // Shorter letter ranges are recognized but don't complete the combination
        assert_eq!(canonicalize("^[A-Fa-f0-9-*&_]+$"), "^[0-9a-fA-F_-*&]+$");
        assert_eq!(canonicalize("^#[A-F0-9]{6}$"), "^#[0-9A-F]{6}$");
    }

    #[test]
    fn test_escaped_underscore_is_unescaped() {
        assert_eq!(canonicalize(r"[0-9a-zA-Z.\_\-]+$"), r"[\w.\-]+$");
    }

    #[test]
    fn test_double_escaped_underscore_left_alone() {
        // The backslash before the underscore is itself escaped; no
        // un-escaping and no underscore repositioning for such patterns.
        assert_eq!(
            canonicalize(r"[0-9a-zA-Z.\\_\-]+$"),
            r"[0-9a-zA-Z.\\_\-]+$"
        );
    }

    #[test]
    fn test_idempotent_on_representative_patterns() {
        for pattern in [
            "",
            r".*\S.*",
            "^[a-z0-9-_]+$",
            "[A-Za-z0-9_]",
            "^[A-Fa-f0-9-*&_]+$",
            "^[-a-zA-Z0-9._]*$",
            r"[0-9a-zA-Z.\\_\-]+$",
            "[^0-9]",
        ] {
            let once = canonicalize(pattern);
            assert_eq!(canonicalize(&once), once, "not idempotent for {pattern:?}");
        }
    }
}
