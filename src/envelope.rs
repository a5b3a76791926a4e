//! The fixed-shape result record returned for every analysis.
//!
//! Success and failure share one shape: the construct lists are always
//! present (empty on failure) and `metadata.error` is only serialized when
//! it is set.

use serde::{Deserialize, Serialize};

use crate::analysis::{ClassRecord, Constructs, FunctionRecord, ImportRecord, VariableRecord};
use crate::assemble::{Assembled, ELLIPSIS};
use crate::error::ExplainError;
use crate::language::Language;

/// Generator name recorded for detector-based analysis.
pub const RULE_BASED_MODEL: &str = "rule-based";

/// Characters of raw generated text used when a generator gives no summary.
const GENERATED_SUMMARY_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    /// Pattern or syntax-tree detection.
    Rule,
    /// Output of an external text generator.
    Nlp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub model_used: String,
    pub analysis_type: AnalysisType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub error: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Metadata {
    pub fn rule_based() -> Self {
        Self {
            model_used: RULE_BASED_MODEL.to_string(),
            analysis_type: AnalysisType::Rule,
            error: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub summary: String,
    pub user_friendly_summary: String,
    pub details: String,
    pub full_explanation: String,
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub variables: Vec<VariableRecord>,
    pub imports: Vec<ImportRecord>,
    pub language: String,
    pub metadata: Metadata,
}

impl ResultEnvelope {
    /// Package a successful rule-based analysis.
    pub fn success(language: Language, text: Assembled, constructs: Constructs) -> Self {
        Self {
            summary: text.summary,
            user_friendly_summary: text.user_friendly_summary,
            details: text.details,
            full_explanation: text.full_explanation,
            functions: constructs.functions,
            classes: constructs.classes,
            variables: constructs.variables,
            imports: constructs.imports,
            language: language.as_str().to_string(),
            metadata: Metadata::rule_based(),
        }
    }

    /// Replace a failed analysis with a minimal error record.
    pub fn failure(language: Language, err: &ExplainError) -> Self {
        let name = language.display_name();
        let (summary, details, full_explanation) = match err {
            ExplainError::Syntax { line, message, .. } => (
                format!("{} syntax error: {} (line {})", name, message, line),
                "The code contains syntax errors and cannot be parsed.".to_string(),
                format!("{} syntax error at line {}: {}", name, line, message),
            ),
            other => (
                format!("Analysis error: {}", other),
                format!("An error occurred while analyzing the {} code.", name),
                format!("Error during analysis: {}", other),
            ),
        };

        Self {
            summary,
            user_friendly_summary: format!("There was an error analyzing this {} code.", name),
            details,
            full_explanation,
            functions: Vec::new(),
            classes: Vec::new(),
            variables: Vec::new(),
            imports: Vec::new(),
            language: language.as_str().to_string(),
            metadata: Metadata {
                error: true,
                ..Metadata::rule_based()
            },
        }
    }

    /// Format the output of an external generator into the envelope shape.
    pub fn from_generated(language: &str, model: &str, generated: GeneratedExplanation) -> Self {
        let raw = generated.raw_explanation;
        let summary = generated.summary.unwrap_or_else(|| {
            let mut head: String = raw.chars().take(GENERATED_SUMMARY_CHARS).collect();
            if raw.chars().count() > GENERATED_SUMMARY_CHARS {
                head.push_str(ELLIPSIS);
            }
            head
        });

        Self {
            summary,
            user_friendly_summary: generated
                .user_friendly_summary
                .unwrap_or_else(|| "This code performs programming operations.".to_string()),
            details: generated.details.unwrap_or_default(),
            full_explanation: generated.full_explanation.unwrap_or(raw),
            functions: generated.functions,
            classes: generated.classes,
            variables: generated.variables,
            imports: Vec::new(),
            language: language.to_string(),
            metadata: Metadata {
                model_used: model.to_string(),
                analysis_type: AnalysisType::Nlp,
                error: false,
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.metadata.error
    }
}

/// What an external text generator hands back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedExplanation {
    pub raw_explanation: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub user_friendly_summary: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub full_explanation: Option<String>,
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
    #[serde(default)]
    pub variables: Vec<VariableRecord>,
}
