//! Text normalization shared by stored values and user input.

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// A string in canonical comparison form.
///
/// Lower-cased, accent-stripped, with `-`, `'` and `.` folded to spaces and
/// whitespace collapsed. Only [`normalize`] constructs one, so two values
/// can be compared directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedString(String);

impl NormalizedString {
    /// Borrow the normalized text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when normalization left nothing behind.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring test on normalized forms.
    #[inline]
    pub fn contains(&self, needle: &NormalizedString) -> bool {
        self.0.contains(needle.as_str())
    }

    /// Whitespace tokens of the normalized text.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }

    pub(crate) fn from_static_normalized(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for NormalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NormalizedString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NormalizedString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Normalize text for comparison.
///
/// Pipeline:
/// 1. Lowercase
/// 2. Canonical decomposition (NFD) and removal of combining marks
/// 3. `-`, `'` and `.` become spaces
/// 4. Whitespace runs collapse to one space, ends trimmed
///
/// Never fails; the result is idempotent under a second call.
pub fn normalize(text: &str) -> NormalizedString {
    let lower = text.to_lowercase();

    let folded: String = lower
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            '-' | '\'' | '.' => ' ',
            other => other,
        })
        .collect();

    NormalizedString(folded.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Normalize an optional value; absence becomes the empty string.
pub fn normalize_opt(text: Option<&str>) -> NormalizedString {
    text.map(normalize).unwrap_or_default()
}

/// Split free text into normalized tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text).tokens().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accents_fold() {
        assert_eq!(normalize("Montréal"), normalize("Montreal"));
        assert_eq!(normalize("Québec"), "quebec");
    }

    #[test]
    fn test_punctuation_folds_to_spaces() {
        assert_eq!(normalize("St.-Jean's"), "st jean s");
        assert_eq!(normalize("Saint-Jean-sur-Richelieu"), "saint jean sur richelieu");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize("  Art \t  Gallery\n"), "art gallery");
    }

    #[test]
    fn test_absent_is_empty() {
        assert!(normalize_opt(None).is_empty());
        assert!(normalize("   ").is_empty());
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Musée d'Art"), vec!["musee", "d", "art"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_contains() {
        assert!(normalize("Vancouver Art Gallery").contains(&normalize("ART")));
        assert!(!normalize("Vancouver").contains(&normalize("Victoria")));
    }

    proptest! {
        #[test]
        fn prop_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(once.as_str()), once);
        }

        #[test]
        fn prop_no_edge_or_double_spaces(s in "\\PC*") {
            let n = normalize(&s);
            prop_assert!(!n.as_str().starts_with(' '));
            prop_assert!(!n.as_str().ends_with(' '));
            prop_assert!(!n.as_str().contains("  "));
        }

        #[test]
        fn prop_case_insensitive(s in "[a-zA-Z ]*") {
            prop_assert_eq!(normalize(&s.to_uppercase()), normalize(&s.to_lowercase()));
        }
    }
}
