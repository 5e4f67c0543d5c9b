//! Lexical feature extraction for the classifier.

use crate::catalog;
use crate::language::Language;
use regex::Regex;
use std::collections::BTreeMap;

/// Control-flow keywords counted as a crude cyclomatic-complexity proxy.
/// Language-agnostic by design.
const COMPLEXITY_KEYWORDS: &[&str] = &[
    "if ", "for ", "while ", "switch", "case ", "try", "catch", "elif ", "else:",
];

/// A named numeric feature vector.
///
/// Keys follow the training-time naming scheme (`length_chars`,
/// `{lang}_danger_{pattern}`, `lang_{language}`, ...). The vector is later
/// projected onto the fixed feature schema recorded at training time; any
/// name unknown to the schema is dropped there, any schema column absent
/// here is zero-filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Value for a feature name, zero when absent.
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Extracts numeric features from raw source text.
pub struct FeatureExtractor {
    /// Word-boundary token pattern for `num_tokens`.
    token_pattern: Regex,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            // \w+ runs; cannot fail to compile.
            token_pattern: Regex::new(r"\w+").unwrap(),
        }
    }

    /// Build the numeric feature vector for a file. Never fails; unmatched
    /// patterns contribute an explicit zero count.
    pub fn extract(&self, content: &str, language: Language) -> FeatureVector {
        let mut features = FeatureVector::default();

        features.insert("length_chars", content.chars().count() as f64);
        features.insert("num_lines", (count_occurrences(content, "\n") + 1) as f64);
        features.insert(
            "num_tokens",
            self.token_pattern.find_iter(content).count() as f64,
        );
        features.insert("complexity_score", complexity_score(content) as f64);

        let lang = language.wire_name();
        for pattern in catalog::danger_patterns(language) {
            features.insert(
                format!("{lang}_danger_{pattern}"),
                count_occurrences(content, pattern) as f64,
            );
        }
        for pattern in catalog::sanitizer_patterns(language) {
            features.insert(
                format!("{lang}_sanitize_{pattern}"),
                count_occurrences(content, pattern) as f64,
            );
        }

        features.insert(format!("lang_{lang}"), 1.0);

        features
    }
}

/// Total occurrences of the language's dangerous signatures.
pub fn danger_count(content: &str, language: Language) -> usize {
    catalog::danger_patterns(language)
        .iter()
        .map(|p| count_occurrences(content, p))
        .sum()
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-overlapping literal substring count.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Sum of control-flow keyword occurrences.
fn complexity_score(content: &str) -> usize {
    COMPLEXITY_KEYWORDS
        .iter()
        .map(|kw| count_occurrences(content, kw))
        .sum()
}
