//! Core traits for language analysis.

use crate::config::ExplainConfig;
use crate::error::ExplainError;
use crate::language::Language;

use super::Detection;

/// Holds a parsed tree-sitter tree and the bytes it was parsed from.
pub struct ParsedSource {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// Source bytes, kept for node text extraction.
    pub source: Vec<u8>,
}

impl ParsedSource {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Language-specific construct detector.
///
/// Each supported language implements this trait once. Detection and
/// description are split so the fired rules and extracted records can be
/// inspected before any text is generated.
///
/// # Thread Safety
///
/// tree_sitter::Parser is not Sync, so implementations create parsers per
/// call instead of storing them.
pub trait ConstructDetector: Send + Sync {
    /// The language this detector handles.
    fn language(&self) -> Language;

    /// Scan the source and return the construct inventory and fired rules.
    fn detect(&self, source: &str, config: &ExplainConfig) -> Result<Detection, ExplainError>;

    /// Turn a detection into explanation fragments, in canonical order.
    ///
    /// Fills the `description` of each extracted record. Returns an empty
    /// list when nothing worth describing was found; the assembler
    /// substitutes the fallback sentence.
    fn describe(&self, detection: &mut Detection, config: &ExplainConfig) -> Vec<String>;
}
