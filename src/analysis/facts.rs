//! Construct records extracted from source code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind tag carried by every construct record (serialized as `type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    Function,
    Method,
    Class,
    Variable,
    Import,
    FromImport,
}

impl ConstructKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructKind::Function => "function",
            ConstructKind::Method => "method",
            ConstructKind::Class => "class",
            ConstructKind::Variable => "variable",
            ConstructKind::Import => "import",
            ConstructKind::FromImport => "from_import",
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a variable was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Module,
    Unknown,
}

/// A statement-level behavior found directly inside a function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorTag {
    Return,
    Assignment,
    AugmentedAssignment,
    Conditional,
    ForLoop,
    WhileLoop,
    ErrorHandling,
    Raise,
    Assertion,
    Call(String),
}

/// An imported module or name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub name: String,
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub kind: ConstructKind,
    pub module: Option<String>,
}

impl ImportRecord {
    /// A plain `import x` style record.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            kind: ConstructKind::Import,
            module: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ConstructKind,
    pub scope: Scope,
}

impl VariableRecord {
    pub fn new(name: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            kind: ConstructKind::Variable,
            scope,
        }
    }
}

/// A function or method definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ConstructKind,
    /// Positional parameter names, in declaration order.
    pub args: Vec<String>,
    pub docstring: Option<String>,
    /// Behaviors of the direct body statements (tree strategy only).
    #[serde(default)]
    pub body_summary: Vec<BehaviorTag>,
    pub description: String,
}

impl FunctionRecord {
    /// A record for a name found by a pattern rule.
    pub fn named(name: impl Into<String>, kind: ConstructKind) -> Self {
        let name = name.into();
        let label = if kind == ConstructKind::Method { "Method" } else { "Function" };
        Self {
            description: format!("{} '{}'", label, name),
            name,
            kind,
            args: Vec::new(),
            docstring: None,
            body_summary: Vec::new(),
        }
    }

    /// Whether any body statement returns a value.
    pub fn returns_value(&self) -> bool {
        self.body_summary.contains(&BehaviorTag::Return)
    }

    /// Whether any body statement calls a function by name.
    pub fn calls_functions(&self) -> bool {
        self.body_summary
            .iter()
            .any(|tag| matches!(tag, BehaviorTag::Call(_)))
    }
}

/// A class (or struct) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ConstructKind,
    pub bases: Vec<String>,
    pub methods: Vec<String>,
    pub docstring: Option<String>,
    pub description: String,
}

impl ClassRecord {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("Class '{}'", name),
            name,
            kind: ConstructKind::Class,
            bases: Vec::new(),
            methods: Vec::new(),
            docstring: None,
        }
    }
}

/// Everything a single analysis run extracted, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructs {
    pub imports: Vec<ImportRecord>,
    pub variables: Vec<VariableRecord>,
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
}

impl Constructs {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.variables.is_empty()
            && self.functions.is_empty()
            && self.classes.is_empty()
    }
}

/// Identifier of a detection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Docstring,
    Imports,
    Includes,
    Package,
    Namespace,
    Functions,
    Methods,
    Classes,
    Variables,
    MainCode,
    MainEntry,
    Output,
    Input,
    Events,
    Dom,
    Network,
    Conditionals,
    Loops,
    Async,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Docstring => "docstring",
            RuleId::Imports => "imports",
            RuleId::Includes => "includes",
            RuleId::Package => "package",
            RuleId::Namespace => "namespace",
            RuleId::Functions => "functions",
            RuleId::Methods => "methods",
            RuleId::Classes => "classes",
            RuleId::Variables => "variables",
            RuleId::MainCode => "main_code",
            RuleId::MainEntry => "main_entry",
            RuleId::Output => "output",
            RuleId::Input => "input",
            RuleId::Events => "events",
            RuleId::Dom => "dom",
            RuleId::Network => "network",
            RuleId::Conditionals => "conditionals",
            RuleId::Loops => "loops",
            RuleId::Async => "async",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule that fired, with the names it matched (empty for presence rules).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredRule {
    pub id: RuleId,
    pub names: Vec<String>,
}

impl FiredRule {
    pub fn presence(id: RuleId) -> Self {
        Self {
            id,
            names: Vec::new(),
        }
    }
}

/// Classification of a top-level Python statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleStatement {
    Assignment,
    Print,
    Input,
    FileAccess,
    Call(String),
    MethodCall,
    Conditional,
    ForLoop,
    WhileLoop,
    ErrorHandling,
    ContextManager,
    Executable,
}

/// Output of a construct detector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub constructs: Constructs,
    /// Fired rules in firing order; no rule appears twice.
    pub fired: Vec<FiredRule>,
    pub module_docstring: Option<String>,
    pub module_statements: Vec<ModuleStatement>,
}

impl Detection {
    /// Record a fired rule, ignoring repeats.
    pub fn fire(&mut self, rule: FiredRule) {
        if !self.has_fired(rule.id) {
            self.fired.push(rule);
        }
    }

    pub fn has_fired(&self, id: RuleId) -> bool {
        self.fired.iter().any(|r| r.id == id)
    }

    /// Names matched by a fired rule; empty when the rule did not fire.
    pub fn names(&self, id: RuleId) -> &[String] {
        self.fired
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.names.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_suppresses_repeats() {
        let mut detection = Detection::default();
        detection.fire(FiredRule::presence(RuleId::Loops));
        detection.fire(FiredRule::presence(RuleId::Output));
        detection.fire(FiredRule::presence(RuleId::Loops));
        let ids: Vec<_> = detection.fired.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RuleId::Loops, RuleId::Output]);
    }

    #[test]
    fn test_behavior_queries() {
        let mut func = FunctionRecord::named("f", ConstructKind::Function);
        assert!(!func.returns_value());
        func.body_summary.push(BehaviorTag::Call("print".to_string()));
        assert!(func.calls_functions());
        func.body_summary.push(BehaviorTag::Return);
        assert!(func.returns_value());
    }

    #[test]
    fn test_record_serialization_uses_type_key() {
        let json = serde_json::to_value(ImportRecord::plain("os")).unwrap();
        assert_eq!(json["type"], "import");
        assert!(json["alias"].is_null());

        let json = serde_json::to_value(VariableRecord::new("x", Scope::Module)).unwrap();
        assert_eq!(json["type"], "variable");
        assert_eq!(json["scope"], "module");
    }
}
