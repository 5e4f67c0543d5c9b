//! Language identification from file extensions and content signatures.

use crate::config::DetectionConfig;
use serde::{Deserialize, Serialize};

/// Languages the scanner has catalogue entries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    CSharp,
    C,
    Python,
    JavaScript,
    Unknown,
}

impl Language {
    /// Detect language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "java" => Language::Java,
            "cs" => Language::CSharp,
            "py" => Language::Python,
            "js" => Language::JavaScript,
            "c" | "h" => Language::C,
            _ => Language::Unknown,
        }
    }

    /// The name used for wire records and feature keys (`lang_{name}`).
    pub fn wire_name(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::C => "c",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Detects the language of a source file.
///
/// A recognized file extension always wins. Otherwise content signatures are
/// checked in a fixed priority order; C# is checked before Java because both
/// may contain `public class`. The two legacy detectors disagreed on whether
/// signatures are matched against the whole file or only a prefix, and on the
/// fallback language for unclassifiable input, so both knobs are exposed via
/// [`DetectionConfig`].
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    /// Restrict content-signature checks to the first N characters.
    window: Option<usize>,

    /// Fall back to `Unknown` rather than `default_language`.
    default_to_unknown: bool,

    /// Fallback when `default_to_unknown` is false.
    default_language: Language,
}

impl LanguageDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            window: config.content_window,
            default_to_unknown: config.default_to_unknown,
            default_language: config.default_language,
        }
    }

    /// Detect the language from content and the original filename.
    ///
    /// Never fails; unclassifiable input degrades to the configured fallback.
    pub fn detect(&self, content: &str, filename: &str) -> Language {
        if let Some(ext) = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
        {
            let lang = Language::from_extension(ext);
            if lang != Language::Unknown {
                return lang;
            }
        }

        let window = match self.window {
            Some(n) => truncate_chars(content, n),
            None => content,
        };
        let lower = window.to_lowercase();

        if window.contains("using System")
            || window.contains("Console.WriteLine")
            || window.contains("namespace ")
        {
            return Language::CSharp;
        }
        if window.contains("public class")
            || window.contains("System.out.println")
            || window.contains("package ")
            || window.contains("import java")
        {
            return Language::Java;
        }
        if lower.contains("#include") || lower.contains("malloc(") {
            return Language::C;
        }
        if window.contains("def ") || window.contains("import ") {
            return Language::Python;
        }
        if lower.contains("function ")
            || lower.contains("console.log")
            || window.contains("const ")
            || window.contains("let ")
            || window.contains("var ")
        {
            return Language::JavaScript;
        }

        if self.default_to_unknown {
            Language::Unknown
        } else {
            self.default_language
        }
    }
}

/// Slice a string to at most `n` characters on a char boundary.
fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
