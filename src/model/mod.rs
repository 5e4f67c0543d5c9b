//! Load-once model artifacts: classifier, vectorizer and feature schema.
//!
//! The three artifacts are versioned bincode blobs written at training time.
//! A missing or incompatible artifact is a fatal startup error, never a
//! per-scan error; after loading, the artifacts are immutable process-wide.

mod classifier;
mod vectorizer;

pub use classifier::{FeatureSchema, LinearClassifier};
pub use vectorizer::TfidfVectorizer;

use crate::error::{Result, ScanError};
use crate::features::FeatureVector;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Artifact file names inside the model directory.
pub const MODEL_FILE: &str = "model.bin";
pub const VECTORIZER_FILE: &str = "vectorizer.bin";
pub const SCHEMA_FILE: &str = "feature_schema.bin";

/// The immutable trio of trained artifacts backing classifier-mode scans.
pub struct ModelArtifacts {
    classifier: LinearClassifier,
    vectorizer: TfidfVectorizer,
    schema: FeatureSchema,
}

impl ModelArtifacts {
    /// Load all three artifacts from a directory, verifying format versions
    /// and cross-checking dimensions.
    pub fn load(dir: &Path) -> Result<Self> {
        let classifier: LinearClassifier =
            load_artifact(&dir.join(MODEL_FILE), LinearClassifier::FORMAT_VERSION)?;
        let vectorizer: TfidfVectorizer =
            load_artifact(&dir.join(VECTORIZER_FILE), TfidfVectorizer::FORMAT_VERSION)?;
        let schema: FeatureSchema =
            load_artifact(&dir.join(SCHEMA_FILE), FeatureSchema::FORMAT_VERSION)?;

        Self::from_parts(classifier, vectorizer, schema)
    }

    /// Assemble artifacts already in memory, with the same consistency
    /// checks as [`ModelArtifacts::load`].
    pub fn from_parts(
        classifier: LinearClassifier,
        vectorizer: TfidfVectorizer,
        schema: FeatureSchema,
    ) -> Result<Self> {
        vectorizer.check().map_err(ScanError::ModelShape)?;

        let expected = vectorizer.len() + schema.len();
        if classifier.input_width() != expected {
            return Err(ScanError::ModelShape(format!(
                "classifier expects {} inputs but vectorizer ({}) + schema ({}) provide {}",
                classifier.input_width(),
                vectorizer.len(),
                schema.len(),
                expected
            )));
        }

        info!(
            vocabulary = vectorizer.len(),
            schema_columns = schema.len(),
            "model artifacts loaded"
        );

        Ok(Self {
            classifier,
            vectorizer,
            schema,
        })
    }

    /// Score a file: TF-IDF transform, schema projection, then the linear
    /// model over the concatenated blocks.
    pub fn score(&self, content: &str, features: &FeatureVector) -> f64 {
        let lexical = self.vectorizer.transform(content);
        let dense = self.schema.project(features);
        self.classifier.score(&lexical, &dense, self.vectorizer.len())
    }

    /// Write all three artifacts into a directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        save_artifact(&dir.join(MODEL_FILE), &self.classifier)?;
        save_artifact(&dir.join(VECTORIZER_FILE), &self.vectorizer)?;
        save_artifact(&dir.join(SCHEMA_FILE), &self.schema)?;
        Ok(())
    }
}

fn load_artifact<T: DeserializeOwned + ArtifactVersion>(path: &Path, expected: u32) -> Result<T> {
    let data = std::fs::read(path).map_err(|e| {
        ScanError::ModelLoad(format!("failed to read {}: {}", path.display(), e))
    })?;
    let artifact: T = bincode::deserialize(&data)?;

    let found = artifact.format_version();
    if found != expected {
        return Err(ScanError::ModelVersion { expected, found });
    }
    Ok(artifact)
}

fn save_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<()> {
    let data = bincode::serialize(artifact)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Access to the version stamp embedded in each artifact blob.
pub trait ArtifactVersion {
    fn format_version(&self) -> u32;
}

impl ArtifactVersion for LinearClassifier {
    fn format_version(&self) -> u32 {
        self.version
    }
}

impl ArtifactVersion for TfidfVectorizer {
    fn format_version(&self) -> u32 {
        self.version
    }
}

impl ArtifactVersion for FeatureSchema {
    fn format_version(&self) -> u32 {
        self.version
    }
}
