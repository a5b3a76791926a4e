//! Construct detection.
//!
//! Each supported language has one [`ConstructDetector`]. Python is parsed
//! with tree-sitter; the other languages run an ordered regex rule table
//! over the raw text. Both strategies produce the same [`Detection`]: the
//! construct records plus the rules that fired, in canonical order.
//!
//! ```text
//! ┌─────────────┐     ┌────────────────┐     ┌─────────────┐
//! │ Source text │────▶│ Detector       │────▶│ Detection   │
//! └─────────────┘     │ (tree / regex) │     │ (records,   │
//!                     └────────────────┘     │  fired)     │
//!                                            └─────────────┘
//!                                                   │
//!                                                   ▼
//!                     ┌────────────────┐     ┌─────────────┐
//!                     │ Assembler      │◀────│ describe()  │
//!                     └────────────────┘     │ (fragments) │
//!                                            └─────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Add a variant to [`crate::Language`]
//! 2. Create a module in `src/analysis/languages/` implementing
//!    `ConstructDetector`
//! 3. Register the detector in `languages/mod.rs`
//! 4. Add its feature phrases in `features.rs`

mod facts;
mod languages;
pub mod patterns;
mod traits;

pub use facts::{
    BehaviorTag, ClassRecord, ConstructKind, Constructs, Detection, FiredRule, FunctionRecord,
    ImportRecord, ModuleStatement, RuleId, Scope, VariableRecord,
};
pub use languages::{
    detector_for, CppAnalyzer, JavaAnalyzer, JavaScriptAnalyzer, PythonAnalyzer,
};
pub use traits::{ConstructDetector, ParsedSource};
