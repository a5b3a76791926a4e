//! Java construct detector.

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

const RULES: &[PatternRule] = &[
    PatternRule::naming(RuleId::Classes, &[r"class\s+(\w+)"]),
    PatternRule::naming(
        RuleId::Methods,
        &[concat!(
            r"(?:public|private|protected|static)?\s*",
            r"(?:public|private|protected|static)?\s*",
            r"\w+\s+(\w+)\s*\([^)]*\)\s*\{"
        )],
    )
    .excluding(&["main", "if", "for", "while"]),
    PatternRule::presence(RuleId::MainEntry, &[r"public\s+static\s+void\s+main"]),
    PatternRule::presence(RuleId::Output, &[r"System\.out\.print"]),
    PatternRule::naming(RuleId::Imports, &[r"import\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;"]),
    PatternRule::presence(RuleId::Package, &[r"package\s+[\w.]+;"]),
    PatternRule::presence(RuleId::Conditionals, &[r"if\s*\(|else|switch"]),
    PatternRule::presence(RuleId::Loops, &[r"for\s*\(|while\s*\(|do\s*\{"]),
];

lazy_static! {
    static ref RULE_TABLE: RuleTable = RuleTable::compile(RULES).expect("java rule table is valid");
}

pub struct JavaAnalyzer;

impl JavaAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructDetector for JavaAnalyzer {
    fn language(&self) -> Language {
        Language::Java
    }

    fn detect(&self, source: &str, _config: &ExplainConfig) -> Result<Detection, ExplainError> {
        let mut detection = Detection::default();
        for rule in RULE_TABLE.scan(source) {
            detection.fire(rule);
        }

        detection.constructs = Constructs {
            imports: detection
                .names(RuleId::Imports)
                .iter()
                .map(ImportRecord::plain)
                .collect(),
            variables: Vec::new(),
            functions: detection
                .names(RuleId::Methods)
                .iter()
                .map(|n| FunctionRecord::named(n, ConstructKind::Method))
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
                RuleId::Classes => match rule.names.as_slice() {
                    _ if !config.name_matches => "This code defines Java classes.".to_string(),
                    [only] => format!(
                        "This defines a Java class called '{}' that serves as a blueprint for creating objects.",
                        only
                    ),
                    names => format!(
                        "This defines {} Java classes: {} that create different types of objects.",
                        names.len(),
                        name_listing(names, max)
                    ),
                },
                RuleId::Methods => match rule.names.as_slice() {
                    _ if !config.name_matches => "This code defines methods.".to_string(),
                    [only] => format!(
                        "This defines a method called '{}' that performs specific operations.",
                        only
                    ),
                    names => format!(
                        "This defines {} methods: {} that perform specific operations.",
                        names.len(),
                        name_listing(names, max)
                    ),
                },
                RuleId::MainEntry => {
                    "This contains a main method that serves as the program's entry point."
                        .to_string()
                }
                RuleId::Output => "This displays output to the console.".to_string(),
                RuleId::Imports => "This imports external Java libraries or classes.".to_string(),
                RuleId::Package => "This Java code belongs to a package.".to_string(),
                RuleId::Conditionals => {
                    "This contains conditional logic for decision making.".to_string()
                }
                RuleId::Loops => "This uses loops to repeat operations.".to_string(),
                other => format!("This code uses {}.", other),
            })
            .collect()
    }
}
