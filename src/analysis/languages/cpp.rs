//! C++ construct detector.

use lazy_static::lazy_static;

use crate::analysis::patterns::{PatternRule, RuleTable};
use crate::analysis::{
    ClassRecord, ConstructDetector, ConstructKind, Constructs, Detection, FunctionRecord,
    ImportRecord, RuleId,
};
use crate::config::ExplainConfig;
use crate::describe::name_listing;
use crate::error::ExplainError;
use crate::language::Language;

// The function rule is deliberately loose: `else if (x) {` and
// `int main() {` both count as function definitions.
const RULES: &[PatternRule] = &[
    PatternRule::naming(RuleId::Includes, &[r#"#include\s*[<"]([^>"]*)"#]),
    PatternRule::presence(RuleId::Namespace, &[r"using\s+namespace\s+std;"]),
    PatternRule::naming(RuleId::Classes, &[r"(?:class|struct)\s+(\w+)"]),
    PatternRule::presence(RuleId::MainEntry, &[r"int\s+main\s*\("]),
    PatternRule::naming(RuleId::Functions, &[r"\w+\s+(\w+)\s*\([^)]*\)\s*\{"]),
    PatternRule::presence(RuleId::Output, &[r"cout\s*<<|printf\s*\("]),
    PatternRule::presence(RuleId::Input, &[r"cin\s*>>|scanf\s*\("]),
    PatternRule::presence(RuleId::Conditionals, &[r"if\s*\(|else|switch"]),
    PatternRule::presence(RuleId::Loops, &[r"for\s*\(|while\s*\(|do\s*\{"]),
];

lazy_static! {
    static ref RULE_TABLE: RuleTable = RuleTable::compile(RULES).expect("c++ rule table is valid");
}

pub struct CppAnalyzer;

impl CppAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CppAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructDetector for CppAnalyzer {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn detect(&self, source: &str, _config: &ExplainConfig) -> Result<Detection, ExplainError> {
        let mut detection = Detection::default();
        for rule in RULE_TABLE.scan(source) {
            detection.fire(rule);
        }

        detection.constructs = Constructs {
            imports: detection
                .names(RuleId::Includes)
                .iter()
                .map(ImportRecord::plain)
                .collect(),
            variables: Vec::new(),
            functions: detection
                .names(RuleId::Functions)
                .iter()
                .map(|n| FunctionRecord::named(n, ConstructKind::Function))
                .collect(),
            classes: detection
                .names(RuleId::Classes)
                .iter()
                .map(ClassRecord::named)
                .collect(),
        };

        Ok(detection)
    }

    fn describe(&self, detection: &mut Detection, config: &ExplainConfig) -> Vec<String> {
        let max = config.max_named_matches;

        detection
            .fired
            .iter()
            .map(|rule| match rule.id {
                RuleId::Includes => "This C++ code includes header files.".to_string(),
                RuleId::Namespace => "This code uses the standard namespace.".to_string(),
                RuleId::Classes => match rule.names.as_slice() {
                    _ if !config.name_matches => {
                        "This code defines classes or structures.".to_string()
                    }
                    [only] => format!(
                        "This defines a C++ class called '{}' that groups related data and behavior.",
                        only
                    ),
                    names => format!(
                        "This defines {} C++ classes: {} that group related data and behavior.",
                        names.len(),
                        name_listing(names, max)
                    ),
                },
                RuleId::MainEntry => {
                    "This code contains a main function - the program entry point.".to_string()
                }
                RuleId::Functions => match rule.names.as_slice() {
                    _ if !config.name_matches => "This code defines functions.".to_string(),
                    [only] => format!("This code defines a function called '{}'.", only),
                    names => format!(
                        "This code defines {} functions: {}.",
                        names.len(),
                        name_listing(names, max)
                    ),
                },
                RuleId::Output => "This code outputs text to the console.".to_string(),
                RuleId::Input => "This code reads input from users.".to_string(),
                RuleId::Conditionals => "This code contains conditional logic.".to_string(),
                RuleId::Loops => "This code uses loops for repetition.".to_string(),
                other => format!("This code uses {}.", other),
            })
            .collect()
    }
}
