//! Scoring and verdict assignment.
//!
//! Two deciders implement the same [`Decider`] capability so callers are
//! agnostic to which policy is active: [`ClassifierDecider`] merges the
//! pretrained model's probability with a heuristic override, while
//! [`PatternDecider`] works from the audit catalogue alone. Both produce the
//! identical [`ScanResult`] shape.

use crate::catalog;
use crate::features::{self, FeatureExtractor};
use crate::language::Language;
use crate::model::ModelArtifacts;
use serde::{Deserialize, Serialize};

/// OWASP assignment table for classifier-mode verdicts. Checked in order,
/// first group with any literal present in the content wins. `exec(` sits in
/// the first group as well, so the code-injection label always claims it.
const OWASP_PRIORITY: &[(&[&str], &str)] = &[
    (
        &[
            "eval(",
            "exec(",
            "innerHTML",
            "document.write",
            "dangerouslySetInnerHTML",
        ],
        "A03:2021 - Injection (XSS/Code Injection)",
    ),
    (
        &["executeQuery", "SqlCommand", "createStatement"],
        "A03:2021 - Injection (SQL Injection)",
    ),
    (
        &["pickle.loads", "readObject", "Deserialize", "XMLDecoder"],
        "A08:2021 - Software and Data Integrity Failures",
    ),
    (
        &["system(", "exec(", "Runtime.getRuntime", "Process.Start"],
        "A03:2021 - Injection (Command Injection)",
    ),
];

const OWASP_GENERIC: &str = "A03:2021 - Injection";

/// Dangerous-call density at which the heuristic overrides the classifier.
/// A file this saturated with dangerous APIs is treated as ground truth,
/// accepting false positives over false negatives.
const DANGER_OVERRIDE_THRESHOLD: usize = 5;
const DANGER_OVERRIDE_FLOOR: f64 = 0.75;

/// Finding severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Final verdict label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanStatus {
    Safe,
    Warning,
    Vulnerable,
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Safe => write!(f, "SAFE"),
            ScanStatus::Warning => write!(f, "WARNING"),
            ScanStatus::Vulnerable => write!(f, "VULNERABLE"),
        }
    }
}

/// A single matched audit pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Vulnerability category.
    #[serde(rename = "type")]
    pub category: String,

    /// The literal substring that matched.
    pub pattern: String,

    pub severity: Severity,
}

/// Immutable result of one scan. Shared by both deciders.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Detected language.
    pub language: Language,

    /// Classifier probability before any override (equal to `probability`
    /// in pattern mode).
    pub raw_probability: f64,

    /// Final vulnerability probability.
    pub probability: f64,

    /// Binary vulnerable verdict.
    pub prediction: bool,

    pub status: ScanStatus,

    /// Total occurrences of the language's dangerous signatures.
    pub danger_count: usize,

    /// OWASP Top-10 label, present only for vulnerable verdicts.
    pub owasp_category: Option<&'static str>,

    /// Matched audit findings, in catalogue order (empty in classifier mode).
    pub findings: Vec<Finding>,

    /// Whether a sanitizer signature was present.
    pub has_sanitizer: bool,

    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

/// Verdict policy over a detected language and file content.
pub trait Decider: Send + Sync {
    fn decide(&self, language: Language, content: &str) -> ScanResult;
}

/// Classifier-primary policy with a heuristic override.
pub struct ClassifierDecider {
    artifacts: ModelArtifacts,
    extractor: FeatureExtractor,
}

impl ClassifierDecider {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self {
            artifacts,
            extractor: FeatureExtractor::new(),
        }
    }
}

impl Decider for ClassifierDecider {
    fn decide(&self, language: Language, content: &str) -> ScanResult {
        let feature_vector = self.extractor.extract(content, language);
        let raw_probability = self.artifacts.score(content, &feature_vector);
        let danger_count = features::danger_count(content, language);

        let mut prediction = raw_probability >= 0.5;
        let mut probability = raw_probability;

        if danger_count >= DANGER_OVERRIDE_THRESHOLD {
            prediction = true;
            probability = probability.max(DANGER_OVERRIDE_FLOOR);
        }

        let owasp_category = prediction.then(|| assign_owasp_category(content));

        ScanResult {
            language,
            raw_probability,
            probability,
            prediction,
            status: if prediction {
                ScanStatus::Vulnerable
            } else {
                ScanStatus::Safe
            },
            danger_count,
            owasp_category,
            findings: Vec::new(),
            has_sanitizer: false,
            scanned_at: chrono::Utc::now(),
        }
    }
}

/// Pattern-primary policy for running without model artifacts.
#[derive(Debug, Default)]
pub struct PatternDecider;

impl PatternDecider {
    pub fn new() -> Self {
        Self
    }
}

impl Decider for PatternDecider {
    fn decide(&self, language: Language, content: &str) -> ScanResult {
        let mut findings = Vec::new();
        for rule in catalog::rules(language) {
            for pattern in rule.patterns {
                if content.contains(pattern) {
                    findings.push(Finding {
                        category: rule.category.to_string(),
                        pattern: pattern.to_string(),
                        severity: Severity::High,
                    });
                }
            }
        }

        let has_sanitizer = catalog::mitigations(language)
            .iter()
            .any(|m| content.contains(m));

        // Sanitizer presence suppresses the vulnerable verdict even though
        // findings exist.
        let (probability, status, prediction) = if findings.is_empty() {
            (0.0, ScanStatus::Safe, false)
        } else if has_sanitizer {
            (0.4, ScanStatus::Warning, false)
        } else {
            (0.9, ScanStatus::Vulnerable, true)
        };

        ScanResult {
            language,
            raw_probability: probability,
            probability,
            prediction,
            status,
            danger_count: features::danger_count(content, language),
            owasp_category: prediction.then(|| assign_owasp_category(content)),
            findings,
            has_sanitizer,
            scanned_at: chrono::Utc::now(),
        }
    }
}

/// Pick the OWASP label for a vulnerable file, fixed priority order.
fn assign_owasp_category(content: &str) -> &'static str {
    for (patterns, category) in OWASP_PRIORITY {
        if patterns.iter().any(|p| content.contains(p)) {
            return category;
        }
    }
    OWASP_GENERIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureSchema, LinearClassifier, TfidfVectorizer};
    use std::collections::HashMap;

    /// A model that scores every input close to zero, so verdicts are
    /// driven entirely by the heuristic override.
    fn inert_decider() -> ClassifierDecider {
        let vocabulary = HashMap::from([("eval".to_string(), 0)]);
        let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0]);
        let schema = FeatureSchema::new(vec!["complexity_score".to_string()]);
        let classifier = LinearClassifier::new(vec![0.0, 0.0], -10.0);
        let artifacts =
            ModelArtifacts::from_parts(classifier, vectorizer, schema).unwrap();
        ClassifierDecider::new(artifacts)
    }

    /// A model biased hard toward the vulnerable class.
    fn alarmist_decider() -> ClassifierDecider {
        let vocabulary = HashMap::from([("eval".to_string(), 0)]);
        let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0]);
        let schema = FeatureSchema::new(vec!["complexity_score".to_string()]);
        let classifier = LinearClassifier::new(vec![0.0, 0.0], 10.0);
        let artifacts =
            ModelArtifacts::from_parts(classifier, vectorizer, schema).unwrap();
        ClassifierDecider::new(artifacts)
    }

    #[test]
    fn test_danger_override_forces_vulnerable() {
        let decider = inert_decider();
        // Five dangerous python calls; the low-scoring model is overridden.
        let code = "eval(a)\neval(b)\neval(c)\nexec(d)\nos.system(e)\n";
        let result = decider.decide(Language::Python, code);

        assert!(result.danger_count >= 5);
        assert!(result.prediction);
        assert!(result.probability >= 0.75);
        assert!(result.raw_probability < 0.5);
        assert_eq!(result.status, ScanStatus::Vulnerable);
    }

    #[test]
    fn test_no_override_below_threshold() {
        let decider = inert_decider();
        let code = "eval(a)\n";
        let result = decider.decide(Language::Python, code);

        assert_eq!(result.danger_count, 1);
        assert!(!result.prediction);
        assert_eq!(result.status, ScanStatus::Safe);
        assert!(result.owasp_category.is_none());
    }

    #[test]
    fn test_override_keeps_higher_model_probability() {
        let decider = alarmist_decider();
        let code = "eval(a)\neval(b)\neval(c)\nexec(d)\nos.system(e)\n";
        let result = decider.decide(Language::Python, code);

        // max(proba, 0.75) must not pull a confident model down.
        assert!(result.probability > 0.99);
    }

    #[test]
    fn test_owasp_priority_order() {
        assert_eq!(
            assign_owasp_category("eval(user_input)"),
            "A03:2021 - Injection (XSS/Code Injection)"
        );
        assert_eq!(
            assign_owasp_category("stmt.executeQuery(sql)"),
            "A03:2021 - Injection (SQL Injection)"
        );
        assert_eq!(
            assign_owasp_category("pickle.loads(data)"),
            "A08:2021 - Software and Data Integrity Failures"
        );
        assert_eq!(
            assign_owasp_category("system(cmd)"),
            "A03:2021 - Injection (Command Injection)"
        );
        assert_eq!(assign_owasp_category("plain code"), "A03:2021 - Injection");
    }

    #[test]
    fn test_exec_claimed_by_first_owasp_group() {
        // exec( appears in both the code-injection and command-injection
        // groups; the first group wins by order.
        assert_eq!(
            assign_owasp_category("Runtime.exec(cmd)"),
            "A03:2021 - Injection (XSS/Code Injection)"
        );
    }

    #[test]
    fn test_pattern_mode_clean_file_is_safe() {
        let result = PatternDecider::new().decide(Language::Python, "x = 1\n");
        assert_eq!(result.status, ScanStatus::Safe);
        assert_eq!(result.probability, 0.0);
        assert!(!result.prediction);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_pattern_mode_eval_is_vulnerable() {
        let result = PatternDecider::new().decide(Language::Python, "eval(expression)");
        assert_eq!(result.status, ScanStatus::Vulnerable);
        assert_eq!(result.probability, 0.9);
        assert!(result.prediction);
        assert_eq!(result.findings[0].category, "Code Injection");
        assert_eq!(result.findings[0].pattern, "eval(");
        assert_eq!(result.findings[0].severity, Severity::High);
    }

    #[test]
    fn test_pattern_mode_sanitizer_downgrades_to_warning() {
        let code = "query = \"SELECT * FROM t WHERE id = {}\".format(uid)\n\
                    cursor.execute(\"SELECT * FROM t WHERE id = %s\", (uid,))\n";
        let result = PatternDecider::new().decide(Language::Python, code);

        assert!(result
            .findings
            .iter()
            .any(|f| f.category == "SQL Injection" && f.pattern == ".format("));
        assert!(result.has_sanitizer);
        assert_eq!(result.status, ScanStatus::Warning);
        assert_eq!(result.probability, 0.4);
        assert!(!result.prediction);
    }

    #[test]
    fn test_pattern_mode_unknown_language_is_safe() {
        let result = PatternDecider::new().decide(Language::Unknown, "eval(x) system(y)");
        assert_eq!(result.status, ScanStatus::Safe);
        assert_eq!(result.probability, 0.0);
    }

    #[test]
    fn test_pattern_mode_findings_in_catalogue_order() {
        let code = "os.system('ls'); eval(x)";
        let result = PatternDecider::new().decide(Language::Python, code);
        // Code Injection rules precede Command Injection rules in the table.
        assert_eq!(result.findings[0].category, "Code Injection");
        assert!(result
            .findings
            .iter()
            .any(|f| f.category == "Command Injection"));
    }

    #[test]
    fn test_empty_file_safe_in_both_modes() {
        let pattern = PatternDecider::new().decide(Language::Python, "");
        assert_eq!(pattern.status, ScanStatus::Safe);
        assert_eq!(pattern.danger_count, 0);

        let classifier = inert_decider().decide(Language::Python, "");
        assert_eq!(classifier.status, ScanStatus::Safe);
        assert_eq!(classifier.danger_count, 0);
    }
}
