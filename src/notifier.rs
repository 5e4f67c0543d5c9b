//! Telegram notifier collaborator.
//!
//! Takes the scanned file name and the raw JSON result and posts a formatted
//! alert. The notifier tolerates both wire shapes (classifier and pattern
//! mode field names) and degrades to an error report when the JSON cannot be
//! parsed; missing credentials are a configuration error, never a silent
//! no-op.

use crate::config::NotifierConfig;
use crate::error::{Result, ScanError};
use serde_json::Value;
use tracing::{debug, warn};

/// Telegram bot client for scan alerts.
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    api_url: String,
    client: reqwest::blocking::Client,
}

impl TelegramNotifier {
    /// Build a notifier from configuration; errors when credentials are
    /// absent from both the config and the environment.
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .ok_or_else(|| ScanError::Config("TELEGRAM_BOT_TOKEN is not set".to_string()))?;
        let chat_id = config
            .chat_id
            .clone()
            .ok_or_else(|| ScanError::Config("TELEGRAM_CHAT_ID is not set".to_string()))?;

        Ok(Self {
            token,
            chat_id,
            api_url: config.api_url.clone(),
            client: reqwest::blocking::Client::new(),
        })
    }

    /// Send a report for a raw JSON scan result.
    pub fn notify(&self, file_name: &str, result_json: &str) -> Result<()> {
        let message = match serde_json::from_str::<Value>(result_json) {
            Ok(data) => format_report(file_name, &data),
            Err(e) => {
                warn!("could not parse scan result JSON: {}", e);
                format_error_report(file_name, &e.to_string())
            }
        };
        self.send(&message)
    }

    fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        debug!("posting alert to Telegram");
        let response = self.client.post(&url).json(&payload).send()?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ScanError::Notify(format!(
                "Telegram API returned {}",
                response.status()
            )))
        }
    }
}

/// Format an alert, accepting either mode's field names.
fn format_report(file_name: &str, data: &Value) -> String {
    let language = data["language_detected"]
        .as_str()
        .or_else(|| data["language"].as_str())
        .unwrap_or("unknown");
    let status = data["status"].as_str().unwrap_or("ERROR");
    let probability = data["probability_vulnerable"]
        .as_f64()
        .or_else(|| data["probability"].as_f64())
        .unwrap_or(0.0);
    let danger_count = data["dangerous_functions"]
        .as_u64()
        .or_else(|| data["vulnerabilities_found"].as_u64())
        .unwrap_or(0);

    let emoji = match status {
        "VULNERABLE" => "🚨",
        "SAFE" => "✅",
        _ => "⚠️",
    };

    let mut message = format!(
        "{emoji} *Security Report*\n\n\
         📄 *File:* `{file_name}`\n\
         🔤 *Language:* `{language}`\n\
         *Status:* *{status}*\n\
         📊 *Probability:* `{:.2}%`\n\
         ⚠️ *Dangerous patterns:* `{danger_count}`\n",
        probability * 100.0
    );

    if let Some(category) = data["owasp_category"].as_str() {
        if category != "Unknown" {
            message.push_str(&format!("🏷 *OWASP:* `{category}`\n"));
        }
    }

    message
}

fn format_error_report(file_name: &str, detail: &str) -> String {
    format!(
        "🚨 *Security Report*\n\n\
         📄 *File:* `{file_name}`\n\
         ❌ *Status:* analysis ERROR\n\
         ⚠️ *Detail:* {detail}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_is_config_error() {
        let config = NotifierConfig {
            token: None,
            chat_id: None,
            api_url: "https://api.telegram.org".to_string(),
        };
        assert!(matches!(
            TelegramNotifier::new(&config),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_format_report_classifier_shape() {
        let data = serde_json::json!({
            "language": "python",
            "prediction": 1,
            "probability": 0.91,
            "status": "VULNERABLE",
            "dangerous_functions": 6,
            "owasp_category": "A03:2021 - Injection"
        });
        let message = format_report("app.py", &data);
        assert!(message.contains("app.py"));
        assert!(message.contains("python"));
        assert!(message.contains("VULNERABLE"));
        assert!(message.contains("91.00%"));
        assert!(message.contains("`6`"));
        assert!(message.contains("A03:2021"));
    }

    #[test]
    fn test_format_report_pattern_shape() {
        let data = serde_json::json!({
            "language_detected": "javascript",
            "prediction": 0,
            "probability_vulnerable": 0.4,
            "status": "WARNING",
            "vulnerabilities_found": 2,
            "has_sanitization": true
        });
        let message = format_report("index.js", &data);
        assert!(message.contains("javascript"));
        assert!(message.contains("WARNING"));
        assert!(message.contains("40.00%"));
        assert!(message.contains("`2`"));
    }

    #[test]
    fn test_format_report_tolerates_missing_fields() {
        let message = format_report("mystery.txt", &serde_json::json!({}));
        assert!(message.contains("unknown"));
        assert!(message.contains("ERROR"));
    }

    #[test]
    fn test_error_report_on_malformed_json() {
        let message = format_error_report("broken.py", "expected value at line 1");
        assert!(message.contains("broken.py"));
        assert!(message.contains("ERROR"));
    }
}
