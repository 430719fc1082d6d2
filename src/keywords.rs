use std::collections::HashSet;

use compact_str::CompactString;
use phf::phf_set;

/// Default ANSI-ish keyword list, lowercase.
static ANSI_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "all", "alter", "and", "any", "as", "asc", "between", "by", "case", "cast",
    "create", "cross", "default", "delete", "desc", "distinct", "drop", "else",
    "end", "except", "exists", "false", "fetch", "for", "from", "full", "group",
    "having", "ilike", "in", "index", "inner", "insert", "intersect", "interval",
    "into", "is", "join", "lateral", "left", "like", "limit", "natural", "not",
    "null", "nulls", "offset", "on", "or", "order", "outer", "over", "partition",
    "primary", "references", "returning", "right", "rows", "select", "set",
    "table", "then", "top", "true", "union", "unique", "update", "using",
    "values", "when", "where", "window", "with",
};

/// Case-insensitive keyword lookup, either the built-in list or a
/// user-supplied replacement.
#[derive(Debug, Clone, Default)]
pub enum KeywordSet {
    #[default]
    Ansi,
    Custom(HashSet<CompactString>),
}

impl KeywordSet {
    pub fn custom<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Custom(
            words
                .into_iter()
                .map(|w| CompactString::from(w.as_ref().to_ascii_lowercase()))
                .collect(),
        )
    }

    pub fn contains(&self, word: &str) -> bool {
        // Keywords are ASCII.
        if word.is_empty() || !word.is_ascii() {
            return false;
        }
        let lower = word.to_ascii_lowercase();
        match self {
            Self::Ansi => ANSI_KEYWORDS.contains(lower.as_str()),
            Self::Custom(words) => words.contains(lower.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_case_insensitive() {
        let set = KeywordSet::Ansi;
        assert!(set.contains("select"));
        assert!(set.contains("SELECT"));
        assert!(set.contains("SeLeCt"));
        assert!(!set.contains("users"));
        assert!(!set.contains("id"));
    }

    #[test]
    fn test_custom_replaces_default() {
        let set = KeywordSet::custom(["MATCH", "return"]);
        assert!(set.contains("match"));
        assert!(set.contains("RETURN"));
        assert!(!set.contains("select"));
    }

    #[test]
    fn test_non_ascii_never_keyword() {
        assert!(!KeywordSet::Ansi.contains("sélect"));
        assert!(!KeywordSet::Ansi.contains(""));
    }
}
