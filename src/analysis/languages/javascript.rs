//! JavaScript construct detector.
//!
//! JavaScript (and TypeScript, via the language aliases) is analyzed with
//! regex rules over the whole source. Nothing is parsed, so syntactically
//! broken input still produces an explanation.

use lazy_static::lazy_static;

use crate::analysis::patterns::{PatternRule, RuleTable};
use crate::analysis::{
    ClassRecord, ConstructDetector, ConstructKind, Constructs, Detection, FunctionRecord,
    ImportRecord, RuleId, Scope, VariableRecord,
};
use crate::config::ExplainConfig;
use crate::describe::name_listing;
use crate::error::ExplainError;
use crate::language::Language;

const RULES: &[PatternRule] = &[
    PatternRule::naming(
        RuleId::Functions,
        &[
            r"function\s+(\w+)",
            r"const\s+(\w+)\s*=.*=>",
            r"(\w+)\s*:\s*function",
            r"async\s+function\s+(\w+)",
        ],
    ),
    PatternRule::naming(RuleId::Classes, &[r"class\s+(\w+)"]),
    PatternRule::naming(
        RuleId::Imports,
        &[
            r#"import\s+.*?\s*from\s*['"]([^'"]+)['"]"#,
            r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
        ],
    ),
    PatternRule::naming(
        RuleId::Variables,
        &[r"let\s+(\w+)", r"const\s+(\w+)", r"var\s+(\w+)"],
    ),
    PatternRule::presence(RuleId::Output, &[r"console\.log|alert|document\.write"]),
    PatternRule::presence(RuleId::Events, &[r"addEventListener|onclick|onload"]),
    PatternRule::presence(RuleId::Dom, &[r"document\.|getElementById|querySelector"]),
    PatternRule::presence(RuleId::Network, &[r"fetch\(|axios|XMLHttpRequest"]),
    PatternRule::presence(RuleId::Conditionals, &[r"if\s*\(|else|switch"]),
    PatternRule::presence(RuleId::Loops, &[r"for\s*\(|while\s*\(|forEach"]),
    PatternRule::presence(RuleId::Async, &[r"async|await|\.then\(|Promise"]),
];

lazy_static! {
    static ref RULE_TABLE: RuleTable =
        RuleTable::compile(RULES).expect("javascript rule table is valid");
}

pub struct JavaScriptAnalyzer;

impl JavaScriptAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaScriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructDetector for JavaScriptAnalyzer {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn detect(&self, source: &str, _config: &ExplainConfig) -> Result<Detection, ExplainError> {
        let mut fired = RULE_TABLE.scan(source);

        // `const f = () => ...` is a function, not also a variable.
        let function_names: Vec<String> = fired
            .iter()
            .find(|r| r.id == RuleId::Functions)
            .map(|r| r.names.clone())
            .unwrap_or_default();
        for rule in fired.iter_mut().filter(|r| r.id == RuleId::Variables) {
            rule.names.retain(|n| !function_names.contains(n));
        }
        fired.retain(|r| !(r.id == RuleId::Variables && r.names.is_empty()));

        let mut detection = Detection::default();
        for rule in fired {
            detection.fire(rule);
        }

        detection.constructs = Constructs {
            imports: detection
                .names(RuleId::Imports)
                .iter()
                .map(ImportRecord::plain)
                .collect(),
            variables: detection
                .names(RuleId::Variables)
                .iter()
                .map(|n| VariableRecord::new(n, Scope::Unknown))
                .collect(),
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
                RuleId::Functions => functions_sentence(&rule.names, config),
                RuleId::Classes => match rule.names.as_slice() {
                    _ if !config.name_matches => "This code defines classes.".to_string(),
                    [only] => format!(
                        "This defines a class called '{}' that serves as a blueprint for creating objects.",
                        only
                    ),
                    names => format!(
                        "This defines {} classes: {} that create different types of objects.",
                        names.len(),
                        name_listing(names, max)
                    ),
                },
                RuleId::Imports => "This code imports modules or dependencies.".to_string(),
                RuleId::Variables => match rule.names.as_slice() {
                    _ if !config.name_matches => "This code declares variables.".to_string(),
                    [only] => format!("This creates a variable called '{}' to store data.", only),
                    names => format!(
                        "This creates {} variables to store different pieces of data.",
                        names.len()
                    ),
                },
                RuleId::Output => "This displays output or information to the user.".to_string(),
                RuleId::Events => "This handles user interactions and events.".to_string(),
                RuleId::Dom => "This manipulates HTML elements on the page.".to_string(),
                RuleId::Network => "This makes network requests to external services.".to_string(),
                RuleId::Conditionals => {
                    "This contains conditional logic for decision making.".to_string()
                }
                RuleId::Loops => "This uses loops to repeat operations.".to_string(),
                RuleId::Async => "This handles asynchronous operations.".to_string(),
                other => format!("This code uses {}.", other),
            })
            .collect()
    }
}

fn functions_sentence(names: &[String], config: &ExplainConfig) -> String {
    match names {
        _ if !config.name_matches => "This JavaScript code contains function definitions.".to_string(),
        [only] => format!(
            "This defines a function called '{}' that {}.",
            only,
            purpose_from_name(only)
        ),
        names => format!(
            "This defines {} functions: {} that work together to accomplish tasks.",
            names.len(),
            name_listing(names, config.max_named_matches)
        ),
    }
}

/// Guess what a function does from its name.
fn purpose_from_name(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.contains("calculate") {
        "performs mathematical calculations"
    } else if lower.contains("get") || lower.contains("fetch") {
        "retrieves or gets data"
    } else if lower.contains("set") || lower.contains("update") {
        "updates or modifies data"
    } else if lower.contains("show") || lower.contains("display") {
        "displays information"
    } else {
        "performs specific operations"
    }
}
