//! Language-specific construct detectors.

mod cpp;
mod java;
mod javascript;
mod python;

pub use cpp::CppAnalyzer;
pub use java::JavaAnalyzer;
pub use javascript::JavaScriptAnalyzer;
pub use python::PythonAnalyzer;

use super::ConstructDetector;
use crate::language::Language;
use once_cell::sync::OnceCell;

/// Static storage for C++ analyzer.
static CPP_ANALYZER: OnceCell<CppAnalyzer> = OnceCell::new();

/// Static storage for Java analyzer.
static JAVA_ANALYZER: OnceCell<JavaAnalyzer> = OnceCell::new();

/// Static storage for JavaScript analyzer.
static JAVASCRIPT_ANALYZER: OnceCell<JavaScriptAnalyzer> = OnceCell::new();

/// Static storage for Python analyzer.
static PYTHON_ANALYZER: OnceCell<PythonAnalyzer> = OnceCell::new();

/// The detector for a language. Every language has exactly one, created
/// on first use.
pub fn detector_for(language: Language) -> &'static dyn ConstructDetector {
    match language {
        Language::Cpp => CPP_ANALYZER.get_or_init(CppAnalyzer::new),
        Language::Java => JAVA_ANALYZER.get_or_init(JavaAnalyzer::new),
        Language::JavaScript => JAVASCRIPT_ANALYZER.get_or_init(JavaScriptAnalyzer::new),
        Language::Python => PYTHON_ANALYZER.get_or_init(PythonAnalyzer::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_a_detector() {
        for language in Language::ALL {
            assert_eq!(detector_for(language).language(), language);
        }
    }

    #[test]
    fn test_detector_is_created_once() {
        let first: *const dyn ConstructDetector = detector_for(Language::Python);
        let second: *const dyn ConstructDetector = detector_for(Language::Python);
        assert!(std::ptr::addr_eq(first, second));
    }
}
