//! Explaincode - deterministic plain-language explanations of source code.
//!
//! Explaincode takes a snippet of Python, JavaScript, Java or C++ and
//! produces a structured explanation: a short summary, a user-friendly
//! capability sentence, the full explanation, and the functions, classes,
//! variables and imports it found. Nothing is executed or type-checked.
//!
//! # Architecture
//!
//! - `analysis`: construct detectors (tree-sitter for Python, regex rule
//!   tables for the others)
//! - `describe`: sentences for extracted constructs
//! - `features`: capability phrases for the user-friendly summary
//! - `assemble`: joining fragments and splitting summary from details
//! - `envelope`: the fixed-shape result record
//! - `explain`: the pipeline tying these together
//! - `config`, `cli`, `report`, `logging`: the command-line tool
//!
//! # Example
//!
//! ```
//! use explaincode::{analyze, Language};
//!
//! let result = analyze("def add(a, b):\n    return a + b\n", Language::Python);
//! assert_eq!(result.functions[0].name, "add");
//! assert!(result.full_explanation.contains("returns a calculated result"));
//! ```

pub mod analysis;
pub mod assemble;
pub mod cli;
pub mod config;
pub mod describe;
pub mod envelope;
pub mod error;
pub mod explain;
pub mod features;
pub mod language;
pub mod logging;
pub mod report;

pub use analysis::{detector_for, ConstructDetector, Detection, FiredRule, RuleId};
pub use config::ExplainConfig;
pub use envelope::{AnalysisType, GeneratedExplanation, Metadata, ResultEnvelope};
pub use error::ExplainError;
pub use explain::{analyze, analyze_with, Explainer};
pub use language::Language;
