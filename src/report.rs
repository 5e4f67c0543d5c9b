//! Reporting module for outputting scan results.

use crate::config::DecisionMode;
use crate::decision::{Finding, ScanResult, ScanStatus};
use serde::Serialize;

/// Maximum findings included in the audit wire record; the total count is
/// still reported in full.
const MAX_REPORTED_FINDINGS: usize = 5;

/// Report generator trait.
pub trait Reporter {
    /// Render a scan result.
    fn generate(&self, result: &ScanResult) -> String;
}

/// Output format enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Create a reporter based on output format and active decision mode.
pub fn create_reporter(format: OutputFormat, mode: DecisionMode) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Json => Box::new(JsonReporter::new(mode)),
        OutputFormat::Text => Box::new(TextReporter::new()),
    }
}

/// Classifier-mode wire record.
#[derive(Debug, Serialize)]
struct ClassifierRecord<'a> {
    language: &'a str,
    prediction: u8,
    probability: f64,
    status: ScanStatus,
    dangerous_functions: usize,
    owasp_category: &'a str,
}

/// Pattern-mode wire record.
#[derive(Debug, Serialize)]
struct AuditRecord<'a> {
    language_detected: &'a str,
    prediction: u8,
    probability_vulnerable: f64,
    status: ScanStatus,
    vulnerabilities_found: usize,
    vulnerabilities: &'a [Finding],
    has_sanitization: bool,
}

/// JSON reporter emitting the wire shape of the active mode.
pub struct JsonReporter {
    mode: DecisionMode,
}

impl JsonReporter {
    pub fn new(mode: DecisionMode) -> Self {
        Self { mode }
    }
}

impl Reporter for JsonReporter {
    fn generate(&self, result: &ScanResult) -> String {
        let value = match self.mode {
            DecisionMode::Classifier => serde_json::to_string(&ClassifierRecord {
                language: result.language.wire_name(),
                prediction: result.prediction as u8,
                probability: result.probability,
                status: result.status,
                dangerous_functions: result.danger_count,
                owasp_category: result.owasp_category.unwrap_or("Unknown"),
            }),
            DecisionMode::Patterns => {
                let shown = result.findings.len().min(MAX_REPORTED_FINDINGS);
                serde_json::to_string(&AuditRecord {
                    language_detected: result.language.wire_name(),
                    prediction: result.prediction as u8,
                    probability_vulnerable: result.probability,
                    status: result.status,
                    vulnerabilities_found: result.findings.len(),
                    vulnerabilities: &result.findings[..shown],
                    has_sanitization: result.has_sanitizer,
                })
            }
        };
        value.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

/// Human-readable terminal reporter.
pub struct TextReporter {
    use_colors: bool,
}

impl TextReporter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Disable colors.
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn status_color(&self, status: ScanStatus) -> &'static str {
        if !self.use_colors {
            return "";
        }
        match status {
            ScanStatus::Vulnerable => "\x1b[31m", // Red
            ScanStatus::Warning => "\x1b[33m",    // Yellow
            ScanStatus::Safe => "\x1b[32m",       // Green
        }
    }

    fn reset(&self) -> &'static str {
        if self.use_colors {
            "\x1b[0m"
        } else {
            ""
        }
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TextReporter {
    fn generate(&self, result: &ScanResult) -> String {
        let mut out = String::new();

        out.push_str(&format!("Language:    {}\n", result.language));
        out.push_str(&format!(
            "Status:      {}{}{}\n",
            self.status_color(result.status),
            result.status,
            self.reset()
        ));
        out.push_str(&format!("Probability: {:.2}%\n", result.probability * 100.0));
        out.push_str(&format!("Dangerous:   {}\n", result.danger_count));

        if let Some(category) = result.owasp_category {
            out.push_str(&format!("OWASP:       {}\n", category));
        }

        if !result.findings.is_empty() {
            out.push_str(&format!("Findings:    {}\n", result.findings.len()));
            for finding in result.findings.iter().take(MAX_REPORTED_FINDINGS) {
                out.push_str(&format!(
                    "  [{}] {}: pattern `{}`\n",
                    finding.severity, finding.category, finding.pattern
                ));
            }
        }
        if result.has_sanitizer {
            out.push_str("Sanitization patterns present\n");
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Severity;
    use crate::language::Language;

    fn audit_result(findings: usize) -> ScanResult {
        ScanResult {
            language: Language::Python,
            raw_probability: 0.9,
            probability: 0.9,
            prediction: true,
            status: ScanStatus::Vulnerable,
            danger_count: findings,
            owasp_category: Some("A03:2021 - Injection"),
            findings: (0..findings)
                .map(|i| Finding {
                    category: "Code Injection".to_string(),
                    pattern: format!("pattern{}", i),
                    severity: Severity::High,
                })
                .collect(),
            has_sanitizer: false,
            scanned_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_classifier_record_fields() {
        let reporter = JsonReporter::new(DecisionMode::Classifier);
        let json: serde_json::Value =
            serde_json::from_str(&reporter.generate(&audit_result(2))).unwrap();

        assert_eq!(json["language"], "python");
        assert_eq!(json["prediction"], 1);
        assert_eq!(json["status"], "VULNERABLE");
        assert_eq!(json["dangerous_functions"], 2);
        assert_eq!(json["owasp_category"], "A03:2021 - Injection");
        assert!(json.get("vulnerabilities").is_none());
    }

    #[test]
    fn test_classifier_record_unknown_category_for_safe() {
        let mut result = audit_result(0);
        result.prediction = false;
        result.status = ScanStatus::Safe;
        result.owasp_category = None;

        let reporter = JsonReporter::new(DecisionMode::Classifier);
        let json: serde_json::Value =
            serde_json::from_str(&reporter.generate(&result)).unwrap();
        assert_eq!(json["owasp_category"], "Unknown");
        assert_eq!(json["status"], "SAFE");
    }

    #[test]
    fn test_audit_record_truncates_to_five_but_counts_all() {
        let reporter = JsonReporter::new(DecisionMode::Patterns);
        let json: serde_json::Value =
            serde_json::from_str(&reporter.generate(&audit_result(8))).unwrap();

        assert_eq!(json["vulnerabilities_found"], 8);
        assert_eq!(json["vulnerabilities"].as_array().unwrap().len(), 5);
        assert_eq!(json["vulnerabilities"][0]["type"], "Code Injection");
        assert_eq!(json["vulnerabilities"][0]["severity"], "HIGH");
        assert_eq!(json["language_detected"], "python");
    }

    #[test]
    fn test_text_reporter_mentions_status() {
        let reporter = TextReporter::new().without_colors();
        let text = reporter.generate(&audit_result(1));
        assert!(text.contains("VULNERABLE"));
        assert!(text.contains("python"));
    }
}
