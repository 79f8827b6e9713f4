//! Keyword lists and the fuzzy matching used by attachment gates

use serde::{Deserialize, Serialize};

/// An ordered list of unit keywords ("Infantry", "Character", ...).
///
/// Keyword comparisons in rule text are sloppy: "Terminator Squad"
/// must satisfy a gate written as "Terminator" and vice versa, and
/// casing is never reliable. All matching here is case-insensitive
/// substring containment in either direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    pub fn new(keywords: Vec<String>) -> Self {
        Self(keywords)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact keyword presence, ignoring case.
    pub fn has(&self, keyword: &str) -> bool {
        self.0.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    /// Fuzzy single-keyword test: either side may be a substring of
    /// the other, case-insensitively.
    pub fn matches(&self, pattern: &str) -> bool {
        let pattern = pattern.to_ascii_lowercase();
        self.0.iter().any(|k| {
            let k = k.to_ascii_lowercase();
            k.contains(&pattern) || pattern.contains(&k)
        })
    }

    /// True if any of `patterns` fuzzily matches any keyword here.
    pub fn matches_any<'a>(&self, patterns: impl IntoIterator<Item = &'a str>) -> bool {
        patterns.into_iter().any(|p| self.matches(p))
    }
}

impl From<Vec<String>> for KeywordList {
    fn from(keywords: Vec<String>) -> Self {
        Self(keywords)
    }
}

impl From<Vec<&str>> for KeywordList {
    fn from(keywords: Vec<&str>) -> Self {
        Self(keywords.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_is_exact_but_case_insensitive() {
        let kw = KeywordList::from(vec!["Infantry", "Character"]);
        assert!(kw.has("character"));
        assert!(!kw.has("Char"));
    }

    #[test]
    fn test_matches_substring_either_direction() {
        let kw = KeywordList::from(vec!["Terminator Squad"]);
        assert!(kw.matches("terminator"));

        let kw = KeywordList::from(vec!["Terminator"]);
        assert!(kw.matches("Terminator Squad"));
    }

    #[test]
    fn test_matches_any() {
        let kw = KeywordList::from(vec!["Gravis", "Infantry"]);
        assert!(kw.matches_any(["Jump Pack", "Gravis"]));
        assert!(!kw.matches_any(["Mounted", "Vehicle"]));
    }
}
