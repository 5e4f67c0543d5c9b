//! Linear classifier scoring and schema-driven feature projection.

use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// The ordered feature-column names recorded at training time.
///
/// Inference-time feature vectors are projected onto these columns:
/// missing features are zero-filled, features unknown to the schema are
/// dropped, and column order is exactly the training order.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Artifact format version.
    pub(crate) version: u32,

    columns: Vec<String>,
}

impl FeatureSchema {
    pub const FORMAT_VERSION: u32 = 1;

    pub fn new(columns: Vec<String>) -> Self {
        Self {
            version: Self::FORMAT_VERSION,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Deterministic, order-preserving projection onto the schema.
    pub fn project(&self, features: &FeatureVector) -> Vec<f64> {
        self.columns.iter().map(|c| features.get(c)).collect()
    }
}

/// Pretrained logistic-regression model over the concatenation of the
/// lexical block and the schema-projected numeric block.
///
/// Only [`LinearClassifier::score`] is exposed; coefficients stay opaque.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// Artifact format version.
    pub(crate) version: u32,

    /// One weight per lexical column followed by one per schema column.
    weights: Vec<f64>,

    intercept: f64,
}

impl LinearClassifier {
    pub const FORMAT_VERSION: u32 = 1;

    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self {
            version: Self::FORMAT_VERSION,
            weights,
            intercept,
        }
    }

    /// Total input width the model expects.
    pub fn input_width(&self) -> usize {
        self.weights.len()
    }

    /// Probability of the vulnerable class for a sparse lexical block and a
    /// dense numeric block occupying the columns after `lexical_width`.
    pub fn score(&self, lexical: &[(usize, f64)], dense: &[f64], lexical_width: usize) -> f64 {
        let mut z = self.intercept;
        for &(col, w) in lexical {
            z += self.weights[col] * w;
        }
        for (i, v) in dense.iter().enumerate() {
            z += self.weights[lexical_width + i] * v;
        }
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
