//! Supported source languages.

use serde::{Deserialize, Serialize};

use crate::assemble::SplitPolicy;
use crate::error::ExplainError;

/// A language the explainer knows how to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Java,
    Cpp,
}

impl Language {
    /// All supported languages, in registry order.
    pub const ALL: [Language; 4] = [
        Language::Python,
        Language::JavaScript,
        Language::Java,
        Language::Cpp,
    ];

    /// Stable identifier used in result envelopes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    /// Human-facing name used inside generated sentences.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Java => "Java",
            Language::Cpp => "C++",
        }
    }

    /// Accepted spellings besides the identifier itself.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::JavaScript => &["js", "jsx", "mjs", "ts", "typescript"],
            Language::Java => &[],
            Language::Cpp => &["c++", "cc", "cxx"],
        }
    }

    /// Resolve a language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" | "pyw" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => Some(Language::JavaScript),
            "java" => Some(Language::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// How the full explanation is divided into summary and details.
    pub fn split_policy(&self, cutoff: usize) -> SplitPolicy {
        match self {
            Language::Python => SplitPolicy::SentenceCount { sentences: 2, cutoff },
            Language::JavaScript | Language::Java => {
                SplitPolicy::SentenceCount { sentences: 1, cutoff }
            }
            Language::Cpp => SplitPolicy::CharacterCutoff(cutoff),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == wanted || lang.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| ExplainError::UnsupportedLanguage(s.to_string()))
    }
}
