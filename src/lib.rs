//! vulnscan - Lexical Vulnerability Classifier for Source Files
//!
//! Classifies a source-code file as vulnerable or safe and assigns an OWASP
//! category, combining a per-language catalogue of dangerous/sanitizing API
//! signatures with a pretrained statistical classifier over lexical features.
//!
//! # Features
//!
//! - **Language identification**: extension-first with content-signature
//!   fallback over a fixed priority order
//! - **Feature extraction**: size metrics, a complexity proxy, per-pattern
//!   occurrence counts and a TF-IDF lexical representation
//! - **Dual decision policies**: classifier-primary with a heuristic
//!   override, or pattern-primary for running without model artifacts
//! - **OWASP categorization**: fixed-priority Top-10 labeling of vulnerable
//!   verdicts
//! - **Telegram alerts**: optional notifier collaborator
//!
//! Scanning is shallow and lexical by design; there is no AST or data-flow
//! analysis.
//!
//! # Example Usage
//!
//! ```no_run
//! use vulnscan::{Config, DecisionMode, Scanner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::builder().mode(DecisionMode::Patterns).build();
//!     let scanner = Scanner::new(config)?;
//!
//!     let result = scanner.scan_file(std::path::Path::new("app.py"))?;
//!     println!("{}: {}", result.language, result.status);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod decision;
pub mod error;
pub mod features;
pub mod language;
pub mod model;
pub mod notifier;
pub mod report;

// Re-export commonly used types
pub use config::{Config, DecisionMode};
pub use decision::{Finding, ScanResult, ScanStatus, Severity};
pub use error::{Result, ScanError};
pub use language::Language;

use decision::{ClassifierDecider, Decider, PatternDecider};
use language::LanguageDetector;
use model::ModelArtifacts;
use std::path::Path;
use tracing::{debug, info};

/// Main scanner tying language detection, feature extraction and the active
/// decision policy together.
///
/// All model/catalogue state is loaded exactly once in [`Scanner::new`] and
/// treated as immutable afterwards, so a `Scanner` can be shared across
/// threads; every per-scan value is local.
pub struct Scanner {
    /// Language detector
    detector: LanguageDetector,

    /// Active decision policy
    decider: Box<dyn Decider>,
}

impl Scanner {
    /// Create a new scanner with the given configuration.
    ///
    /// In classifier mode this loads the model artifacts; a missing or
    /// incompatible artifact is a fatal error here, never during a scan.
    pub fn new(config: Config) -> Result<Self> {
        let detector = LanguageDetector::new(&config.detection);

        let decider: Box<dyn Decider> = match config.decision.mode {
            DecisionMode::Classifier => {
                let artifacts = ModelArtifacts::load(&config.model.dir)?;
                Box::new(ClassifierDecider::new(artifacts))
            }
            DecisionMode::Patterns => Box::new(PatternDecider::new()),
        };

        info!(mode = ?config.decision.mode, "scanner initialized");

        Ok(Self { detector, decider })
    }

    /// Scan a file on disk.
    ///
    /// Undecodable bytes are tolerated via lossy decoding; a missing or
    /// unreadable file is fatal and no partial result is produced.
    pub fn scan_file(&self, path: &Path) -> Result<ScanResult> {
        if !path.exists() {
            return Err(ScanError::InputNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        Ok(self.scan_content(&content, filename))
    }

    /// Scan in-memory content with its original filename. Never fails.
    pub fn scan_content(&self, content: &str, filename: &str) -> ScanResult {
        let language = self.detector.detect(content, filename);
        debug!(%language, filename, "language detected");

        let result = self.decider.decide(language, content);
        info!(
            %language,
            status = %result.status,
            probability = result.probability,
            danger_count = result.danger_count,
            "scan complete"
        );
        result
    }
}
