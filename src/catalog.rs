//! Static pattern catalogue: dangerous API signatures and sanitizers.
//!
//! Two table families are kept deliberately. The *scoring* tables are flat
//! per-language lists whose entries double as feature names at training time
//! (`{lang}_danger_{pattern}`), so they feed the feature extractor and the
//! classifier-mode danger count. The *audit* rules group patterns by
//! vulnerability category and drive pattern-primary scanning. All matching is
//! raw case-sensitive substring containment; no regex, no tokenization.

use crate::language::Language;

/// Bumped whenever the tables change; recorded for trained models to pin.
pub const CATALOG_VERSION: u32 = 2;

/// A categorized audit rule: every listed substring is a match for `category`.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Vulnerability category name (e.g. "SQL Injection").
    pub category: &'static str,

    /// Literal substrings matched against the full file text.
    pub patterns: &'static [&'static str],
}

/// Dangerous API signatures used for scoring features and the danger count.
pub fn danger_patterns(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Java => &[
            "Runtime.getRuntime",
            "exec(",
            "Statement",
            "createStatement",
            "executeQuery",
            "executeUpdate",
            "Class.forName",
            "newInstance()",
            "ProcessBuilder",
            "URLClassLoader",
            "ScriptEngineManager",
            "readLine(",
            "readObject(",
            "XMLDecoder",
            "XStream",
        ],
        Language::CSharp => &[
            "Process.Start",
            "SqlCommand",
            "ExecuteReader",
            "ExecuteNonQuery",
            "Eval(",
            "File.ReadAllText",
            "BinaryFormatter",
            "Deserialize",
            "XmlDocument",
            "XmlReader",
            "DESCryptoServiceProvider",
            "MD5",
            "Random(",
            "LoadXml",
            "InnerXml",
        ],
        Language::C => &[
            "strcpy",
            "strncpy(",
            "gets(",
            "scanf(",
            "sprintf(",
            "malloc(",
            "free(",
            "strcat(",
            "strlen(",
            "memcpy(",
            "system(",
            "popen(",
            "vsprintf(",
            "fscanf(",
            "sscanf(",
        ],
        Language::Python => &[
            "eval(",
            "exec(",
            "os.system",
            "subprocess.Popen",
            "subprocess.call",
            "pickle.loads",
            "yaml.load(",
            "__import__",
            "compile(",
            "input(",
            "execfile(",
            "globals(",
            "locals(",
            "open(",
        ],
        Language::JavaScript => &[
            "eval(",
            "innerHTML",
            "document.write",
            "Function(",
            "setTimeout(",
            "var ",
            "setInterval(",
            "outerHTML",
            "insertAdjacentHTML",
            "execScript(",
            "dangerouslySetInnerHTML",
            "createContextualFragment",
        ],
        Language::Unknown => &[],
    }
}

/// Sanitizer signatures used for scoring features.
pub fn sanitizer_patterns(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Java => &["PreparedStatement", "setString(", "setInt("],
        Language::CSharp => &["SqlParameter", "AddWithValue"],
        Language::C => &["snprintf", "strncpy_s"],
        Language::Python => &["shlex.quote", "escape", "html.escape"],
        Language::JavaScript => &["encodeURI", "encodeURIComponent", "DOMPurify.sanitize"],
        Language::Unknown => &[],
    }
}

/// Categorized audit rules for pattern-primary scanning.
pub fn rules(lang: Language) -> &'static [Rule] {
    match lang {
        Language::Java => &[
            Rule {
                category: "SQL Injection",
                patterns: &[
                    "Statement",
                    "createStatement",
                    "executeQuery(\"",
                    "executeUpdate(\"",
                    "Statement.execute",
                ],
            },
            Rule {
                category: "Command Injection",
                patterns: &["Runtime.getRuntime", ".exec("],
            },
            Rule {
                category: "XXE",
                patterns: &["DocumentBuilder", "SAXParser", "XMLReader"],
            },
        ],
        Language::CSharp => &[
            Rule {
                category: "SQL Injection",
                patterns: &["SqlCommand", "ExecuteReader", "ExecuteNonQuery"],
            },
            Rule {
                category: "Command Injection",
                patterns: &["Process.Start", "Eval("],
            },
            Rule {
                category: "Path Traversal",
                patterns: &["File.ReadAllText", "File.WriteAllText"],
            },
        ],
        Language::C => &[
            Rule {
                category: "Buffer Overflow",
                patterns: &["strcpy(", "gets(", "scanf(", "sprintf("],
            },
            Rule {
                category: "Memory Issues",
                patterns: &["malloc(", "free("],
            },
        ],
        Language::Python => &[
            Rule {
                category: "Code Injection",
                patterns: &["eval(", "exec("],
            },
            Rule {
                category: "Command Injection",
                patterns: &["os.system(", "subprocess.Popen", "subprocess.call("],
            },
            Rule {
                category: "Deserialization",
                patterns: &["pickle.loads(", "pickle.load(", "yaml.load("],
            },
            Rule {
                category: "SQL Injection",
                patterns: &["execute(\"", "execute('", ".format("],
            },
        ],
        Language::JavaScript => &[
            Rule {
                category: "Code Injection",
                patterns: &["eval("],
            },
            Rule {
                category: "XSS",
                patterns: &["innerHTML", "document.write("],
            },
            Rule {
                category: "Prototype Pollution",
                patterns: &["__proto__", "constructor.prototype"],
            },
        ],
        Language::Unknown => &[],
    }
}

/// Sanitization signatures that suppress an audit verdict.
pub fn mitigations(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Java => &["PreparedStatement", "setString(", "setInt("],
        Language::CSharp => &["SqlParameter", "AddWithValue", "Parameterized"],
        Language::C => &["snprintf(", "strncpy_s(", "fgets("],
        Language::Python => &["cursor.execute(", "?", "%s", "escape(", "html.escape"],
        Language::JavaScript => &["textContent", "encodeURI", "DOMPurify.sanitize"],
        Language::Unknown => &[],
    }
}
