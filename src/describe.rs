//! Fragment describer: one natural-language sentence per construct.
//!
//! The construct phrasing here is shared by the tree-strategy analyzer;
//! pattern-strategy analyzers phrase their fixed rule sentences themselves
//! and use [`name_listing`] for multi-match sentences.

use crate::analysis::{ClassRecord, FunctionRecord, ImportRecord, ModuleStatement};
use crate::assemble::ELLIPSIS;

/// Describe a function by name, parameter count and body behavior.
pub fn function_sentence(func: &FunctionRecord) -> String {
    let mut sentence = if func.name == "main" {
        "This defines the main function that serves as the program's entry point".to_string()
    } else if func.name.starts_with("__") {
        format!(
            "This defines a special method '{}' that handles specific object behavior",
            func.name
        )
    } else {
        format!("This defines a function called '{}'", func.name)
    };

    match func.args.as_slice() {
        [] => sentence.push_str(" that requires no input parameters"),
        [only] => sentence.push_str(&format!(" that takes one input parameter called '{}'", only)),
        args => sentence.push_str(&format!(
            " that takes {} input parameters: {}",
            args.len(),
            args.join(", ")
        )),
    }

    if func.returns_value() {
        sentence.push_str(" and returns a calculated result");
    } else if func.calls_functions() {
        sentence.push_str(" and calls other functions to perform its work");
    } else if !func.body_summary.is_empty() {
        sentence.push_str(" and performs various operations");
    }

    sentence.push('.');
    sentence
}

pub fn class_sentence(class: &ClassRecord) -> String {
    let mut sentence = format!("Class '{}'", class.name);
    if !class.bases.is_empty() {
        sentence.push_str(&format!(" inherits from {}", class.bases.join(", ")));
    }
    let methods = if class.methods.is_empty() {
        "none".to_string()
    } else {
        class.methods.join(", ")
    };
    sentence.push_str(&format!(" with {} method(s): {}.", class.methods.len(), methods));
    if let Some(doc) = &class.docstring {
        sentence.push_str(&format!(" Docstring: '{}'", doc));
    }
    sentence
}

/// All imports collapse into one sentence.
pub fn imports_sentence(imports: &[ImportRecord]) -> Option<String> {
    if imports.is_empty() {
        return None;
    }
    let names: Vec<&str> = imports.iter().map(|i| i.name.as_str()).collect();
    Some(format!(
        "The code imports the following modules: {}.",
        names.join(", ")
    ))
}

pub fn module_docstring_sentence(doc: &str) -> String {
    format!("This Python module includes documentation: '{}'", doc)
}

/// Clause for one top-level statement.
pub fn statement_clause(statement: &ModuleStatement) -> String {
    match statement {
        ModuleStatement::Assignment => "variable assignment at module level".to_string(),
        ModuleStatement::Print => "displays output to the user".to_string(),
        ModuleStatement::Input => "gets input from the user".to_string(),
        ModuleStatement::FileAccess => "works with files".to_string(),
        ModuleStatement::Call(name) => format!("calls the '{}' function", name),
        ModuleStatement::MethodCall => "calls a method or function".to_string(),
        ModuleStatement::Conditional => "makes decisions using conditional logic".to_string(),
        ModuleStatement::ForLoop => "repeats actions using a for loop".to_string(),
        ModuleStatement::WhileLoop => "repeats actions using a while loop".to_string(),
        ModuleStatement::ErrorHandling => "handles potential errors safely".to_string(),
        ModuleStatement::ContextManager => "uses a context manager (with statement)".to_string(),
        ModuleStatement::Executable => "contains executable code".to_string(),
    }
}

/// Join all top-level statement clauses into one "The main code" sentence.
pub fn main_code_sentence(statements: &[ModuleStatement]) -> Option<String> {
    if statements.is_empty() {
        return None;
    }
    let clauses: Vec<String> = statements.iter().map(statement_clause).collect();
    Some(format!("The main code {}.", clauses.join(" and ").to_lowercase()))
}

/// List at most `max` names, marking omitted ones with an ellipsis.
pub fn name_listing(names: &[String], max: usize) -> String {
    let shown = names.iter().take(max).cloned().collect::<Vec<_>>().join(", ");
    if names.len() > max {
        format!("{}{}", shown, ELLIPSIS)
    } else {
        shown
    }
}
