//! TF-IDF lexical representation against a fixed training-time vocabulary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tokenizer matching the training pipeline: lowercased word runs of
/// length >= 2.
fn token_pattern() -> Regex {
    Regex::new(r"\b\w\w+\b").unwrap()
}

/// Sparse TF-IDF transformer over a vocabulary fixed at training time.
///
/// Tokens outside the vocabulary are ignored. The output vector is
/// L2-normalized, matching the weighting the classifier was trained against.
#[derive(Debug, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Artifact format version.
    pub(crate) version: u32,

    /// Term -> column index.
    vocabulary: HashMap<String, u32>,

    /// Inverse document frequency per column.
    idf: Vec<f64>,

    #[serde(skip, default = "token_pattern")]
    tokenizer: Regex,
}

impl TfidfVectorizer {
    pub const FORMAT_VERSION: u32 = 1;

    pub fn new(vocabulary: HashMap<String, u32>, idf: Vec<f64>) -> Self {
        Self {
            version: Self::FORMAT_VERSION,
            vocabulary,
            idf,
            tokenizer: token_pattern(),
        }
    }

    /// Width of the lexical block (number of vocabulary columns).
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// Check internal consistency after deserialization.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        if let Some(col) = self
            .vocabulary
            .values()
            .find(|&&c| c as usize >= self.idf.len())
        {
            return Err(format!("vocabulary column {} out of range", col));
        }
        Ok(())
    }

    /// Transform content into a sparse `(column, weight)` representation,
    /// sorted by column.
    pub fn transform(&self, content: &str) -> Vec<(usize, f64)> {
        let lowered = content.to_lowercase();

        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in self.tokenizer.find_iter(&lowered) {
            if let Some(&col) = self.vocabulary.get(token.as_str()) {
                *counts.entry(col as usize).or_insert(0) += 1;
            }
        }

        let mut weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, tf)| (col, tf as f64 * self.idf[col]))
            .collect();
        weighted.sort_unstable_by_key(|&(col, _)| col);

        let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weighted {
                *w /= norm;
            }
        }

        weighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer() -> TfidfVectorizer {
        let vocabulary = HashMap::from([
            ("eval".to_string(), 0),
            ("system".to_string(), 1),
            ("print".to_string(), 2),
        ]);
        TfidfVectorizer::new(vocabulary, vec![2.0, 1.5, 1.0])
    }

    #[test]
    fn test_out_of_vocabulary_tokens_ignored() {
        let v = vectorizer();
        let out = v.transform("foo bar baz");
        assert!(out.is_empty());
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let v = vectorizer();
        let out = v.transform("eval system eval");
        let norm: f64 = out.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_lowercases_and_orders_columns() {
        let v = vectorizer();
        let out = v.transform("PRINT Eval");
        let cols: Vec<usize> = out.iter().map(|(c, _)| *c).collect();
        assert_eq!(cols, vec![0, 2]);
    }

    #[test]
    fn test_single_char_tokens_not_counted() {
        let vocabulary = HashMap::from([("a".to_string(), 0)]);
        let v = TfidfVectorizer::new(vocabulary, vec![1.0]);
        // The token pattern requires at least two word characters.
        assert!(v.transform("a a a").is_empty());
    }

    #[test]
    fn test_check_rejects_mismatched_idf() {
        let vocabulary = HashMap::from([("eval".to_string(), 0)]);
        let v = TfidfVectorizer::new(vocabulary, vec![1.0, 2.0]);
        assert!(v.check().is_err());
    }
}
