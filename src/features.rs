//! Feature tagging: capability phrases for the user-friendly summary.
//!
//! The phrases are independent of the fragment text. Rules without an
//! entry (docstrings, package declarations, namespaces) only show up in
//! fragments.

use crate::analysis::{FiredRule, RuleId};
use crate::language::Language;

/// Capability phrase for a rule, if it has one in this language.
pub fn phrase(language: Language, rule: RuleId) -> Option<&'static str> {
    use Language::*;
    use RuleId::*;

    let phrase = match (language, rule) {
        (Python | JavaScript | Cpp, Functions) => "defines reusable functions",
        (Java, Methods) => "defines reusable methods",
        (_, Classes) => "creates object-oriented classes",
        (Python | JavaScript, Variables) => "stores data in variables",
        (Python, Imports) => "uses external libraries",
        (Java, Imports) => "uses external Java libraries",
        (Cpp, Includes) => "uses external C++ libraries",
        (Python, MainCode) => "executes main program logic",
        (Java | Cpp, MainEntry) => "serves as a program starting point",
        (JavaScript, Output) => "displays output or information to the user",
        (Java | Cpp, Output) => "displays output to users",
        (Cpp, Input) => "gets information from users",
        (JavaScript, Events) => "responds to user interactions",
        (JavaScript, Dom) => "modifies web page content",
        (JavaScript, Network) => "communicates with external services",
        (JavaScript | Java | Cpp, Conditionals) => "makes decisions based on conditions",
        (JavaScript | Java | Cpp, Loops) => "repeats operations multiple times",
        (JavaScript, Async) => "performs operations that take time to complete",
        _ => return None,
    };
    Some(phrase)
}

/// Phrases for the fired rules, in firing order, each at most once.
pub fn tag(language: Language, fired: &[FiredRule]) -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = Vec::new();
    for rule in fired {
        if let Some(p) = phrase(language, rule.id) {
            if !tags.contains(&p) {
                tags.push(p);
            }
        }
    }
    tags
}
