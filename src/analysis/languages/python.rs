//! Python construct detector using tree-sitter.
//!
//! Python is the only language analyzed from a real syntax tree. A parse
//! error fails the whole analysis; there is no pattern fallback.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language as TsLanguage, Node, Parser, Query, QueryCursor};

use crate::analysis::{
    BehaviorTag, ClassRecord, ConstructDetector, ConstructKind, Constructs, Detection, FiredRule,
    FunctionRecord, ImportRecord, ModuleStatement, ParsedSource, RuleId, Scope, VariableRecord,
};
use crate::config::ExplainConfig;
use crate::describe;
use crate::error::ExplainError;
use crate::language::Language;

const DEFINITION_QUERY: &str = r#"
; Function definitions at any depth, methods included
(function_definition
  name: (identifier) @func_name
) @function

; Class definitions at any depth
(class_definition
  name: (identifier) @class_name
) @class
"#;

/// Tree-sitter query for extracting imports.
const IMPORT_QUERY: &str = r#"
(import_statement) @import
(import_from_statement) @import_from
(future_import_statement) @future_import
"#;

/// Deepest bracket nesting the Python tokenizer accepts.
const MAX_BRACKET_DEPTH: usize = 200;

/// Top-level node kinds that are described elsewhere, not as main code.
const DEFINITION_KINDS: &[&str] = &[
    "import_statement",
    "import_from_statement",
    "future_import_statement",
    "function_definition",
    "class_definition",
    "decorated_definition",
];

pub struct PythonAnalyzer {
    language: TsLanguage,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn parse(&self, source: &str) -> Result<ParsedSource, ExplainError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ExplainError::Parser("failed to parse Python source".to_string()))?;

        Ok(ParsedSource {
            tree,
            source: source.as_bytes().to_vec(),
        })
    }

    /// Fail on the first ERROR/MISSING node, Python 2 only statement, or
    /// bracket nested deeper than the interpreter accepts.
    fn check_syntax(&self, parsed: &ParsedSource) -> Result<(), ExplainError> {
        let root = parsed.tree.root_node();
        let mut open_brackets = 0usize;
        let problem = find_node(root, |n: Node| {
            if n.is_error()
                || n.is_missing()
                || matches!(n.kind(), "print_statement" | "exec_statement")
            {
                return true;
            }
            match n.kind() {
                "(" | "[" | "{" => {
                    open_brackets += 1;
                    open_brackets > MAX_BRACKET_DEPTH
                }
                ")" | "]" | "}" => {
                    open_brackets = open_brackets.saturating_sub(1);
                    false
                }
                _ => false,
            }
        });

        let Some(node) = problem else {
            return Ok(());
        };

        let message = if node.is_missing() {
            format!("invalid syntax, expected '{}'", node.kind())
        } else if node.kind() == "print_statement" {
            "Missing parentheses in call to 'print'".to_string()
        } else if node.kind() == "exec_statement" {
            "Missing parentheses in call to 'exec'".to_string()
        } else if matches!(node.kind(), "(" | "[" | "{") {
            "too many nested parentheses".to_string()
        } else {
            "invalid syntax".to_string()
        };

        let position = node.start_position();
        Err(ExplainError::Syntax {
            line: position.row + 1,
            column: position.column + 1,
            message,
        })
    }

    fn extract_imports(&self, parsed: &ParsedSource) -> Result<Vec<ImportRecord>, ExplainError> {
        let query = Query::new(&self.language, IMPORT_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut statements = Vec::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                statements.push(capture.node);
            }
        }
        statements.sort_by_key(|n| n.start_byte());

        let mut imports = Vec::new();
        for node in statements {
            match node.kind() {
                "import_statement" => {
                    for name in node.children_by_field_name("name", &mut node.walk()) {
                        let (name, alias) = imported_name(parsed, name);
                        imports.push(ImportRecord {
                            name,
                            alias,
                            kind: ConstructKind::Import,
                            module: None,
                        });
                    }
                }
                "import_from_statement" | "future_import_statement" => {
                    let module = from_module(parsed, node);
                    let mut names: Vec<(String, Option<String>)> = node
                        .children_by_field_name("name", &mut node.walk())
                        .map(|n| imported_name(parsed, n))
                        .collect();
                    if node
                        .named_children(&mut node.walk())
                        .any(|c| c.kind() == "wildcard_import")
                    {
                        names.push(("*".to_string(), None));
                    }
                    for (name, alias) in names {
                        let qualified = match &module {
                            Some(m) => format!("{}.{}", m, name),
                            None => name,
                        };
                        imports.push(ImportRecord {
                            name: qualified,
                            alias,
                            kind: ConstructKind::FromImport,
                            module: module.clone(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(imports)
    }

    fn extract_definitions(
        &self,
        parsed: &ParsedSource,
    ) -> Result<(Vec<FunctionRecord>, Vec<ClassRecord>), ExplainError> {
        let query = Query::new(&self.language, DEFINITION_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut function_nodes = Vec::new();
        let mut class_nodes = Vec::new();

        while let Some(m) = matches.next() {
            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "function" => function_nodes.push(capture.node),
                    "class" => class_nodes.push(capture.node),
                    _ => {}
                }
            }
        }

        function_nodes.sort_by_key(|n| n.start_byte());
        function_nodes.dedup_by_key(|n| n.start_byte());
        class_nodes.sort_by_key(|n| n.start_byte());
        class_nodes.dedup_by_key(|n| n.start_byte());

        let functions = function_nodes
            .into_iter()
            .map(|node| self.function_record(parsed, node))
            .collect();
        let classes = class_nodes
            .into_iter()
            .map(|node| self.class_record(parsed, node))
            .collect();

        Ok((functions, classes))
    }

    fn function_record(&self, parsed: &ParsedSource, node: Node) -> FunctionRecord {
        let name = node
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n).to_string())
            .unwrap_or_default();
        let args = node
            .child_by_field_name("parameters")
            .map(|p| positional_parameters(parsed, p))
            .unwrap_or_default();
        let body = node.child_by_field_name("body");

        FunctionRecord {
            name,
            kind: ConstructKind::Function,
            args,
            docstring: body.and_then(|b| docstring(parsed, b)),
            body_summary: body.map(|b| body_behaviors(parsed, b)).unwrap_or_default(),
            description: String::new(),
        }
    }

    fn class_record(&self, parsed: &ParsedSource, node: Node) -> ClassRecord {
        let name = node
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n).to_string())
            .unwrap_or_default();

        // Only plain names count as bases; `mod.Base`, `Generic[T]` and
        // `metaclass=...` are skipped.
        let bases = node
            .child_by_field_name("superclasses")
            .map(|args| {
                args.named_children(&mut args.walk())
                    .filter(|c| c.kind() == "identifier")
                    .map(|c| parsed.node_text(c).to_string())
                    .collect()
            })
            .unwrap_or_default();

        let body = node.child_by_field_name("body");
        let methods = body
            .map(|b| {
                statements(b)
                    .into_iter()
                    .filter_map(|stmt| {
                        let def = if stmt.kind() == "decorated_definition" {
                            stmt.child_by_field_name("definition")?
                        } else {
                            stmt
                        };
                        (def.kind() == "function_definition")
                            .then(|| def.child_by_field_name("name"))
                            .flatten()
                            .map(|n| parsed.node_text(n).to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();

        ClassRecord {
            name,
            kind: ConstructKind::Class,
            bases,
            methods,
            docstring: body.and_then(|b| docstring(parsed, b)),
            description: String::new(),
        }
    }

    /// Classify every top-level statement that is not an import or definition.
    fn module_statements(
        &self,
        parsed: &ParsedSource,
    ) -> (Vec<VariableRecord>, Vec<ModuleStatement>) {
        let mut variables = Vec::new();
        let mut classified = Vec::new();

        for stmt in statements(parsed.tree.root_node()) {
            if DEFINITION_KINDS.contains(&stmt.kind()) {
                continue;
            }
            let statement = classify_statement(parsed, stmt);
            if statement == ModuleStatement::Assignment {
                if let Some(assignment) = stmt.named_child(0) {
                    assignment_targets(parsed, assignment, &mut variables);
                }
            }
            classified.push(statement);
        }

        (variables, classified)
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructDetector for PythonAnalyzer {
    fn language(&self) -> Language {
        Language::Python
    }

    fn detect(&self, source: &str, _config: &ExplainConfig) -> Result<Detection, ExplainError> {
        let parsed = self.parse(source)?;
        self.check_syntax(&parsed)?;

        let imports = self.extract_imports(&parsed)?;
        let (functions, classes) = self.extract_definitions(&parsed)?;
        let (variables, module_statements) = self.module_statements(&parsed);
        let module_docstring = docstring(&parsed, parsed.tree.root_node());

        let mut detection = Detection {
            module_docstring,
            module_statements,
            ..Detection::default()
        };

        if detection.module_docstring.is_some() {
            detection.fire(FiredRule::presence(RuleId::Docstring));
        }
        if !functions.is_empty() {
            detection.fire(FiredRule {
                id: RuleId::Functions,
                names: functions.iter().map(|f| f.name.clone()).collect(),
            });
        }
        if !classes.is_empty() {
            detection.fire(FiredRule {
                id: RuleId::Classes,
                names: classes.iter().map(|c| c.name.clone()).collect(),
            });
        }
        if !variables.is_empty() {
            detection.fire(FiredRule {
                id: RuleId::Variables,
                names: variables.iter().map(|v| v.name.clone()).collect(),
            });
        }
        if !imports.is_empty() {
            detection.fire(FiredRule {
                id: RuleId::Imports,
                names: imports.iter().map(|i| i.name.clone()).collect(),
            });
        }
        if !detection.module_statements.is_empty() {
            detection.fire(FiredRule::presence(RuleId::MainCode));
        }

        detection.constructs = Constructs {
            imports,
            variables,
            functions,
            classes,
        };
        Ok(detection)
    }

    fn describe(&self, detection: &mut Detection, _config: &ExplainConfig) -> Vec<String> {
        let mut fragments = Vec::new();

        if let Some(doc) = &detection.module_docstring {
            fragments.push(describe::module_docstring_sentence(doc));
        }
        if let Some(sentence) = describe::imports_sentence(&detection.constructs.imports) {
            fragments.push(sentence);
        }
        for func in &mut detection.constructs.functions {
            func.description = describe::function_sentence(func);
            fragments.push(func.description.clone());
        }
        for class in &mut detection.constructs.classes {
            class.description = describe::class_sentence(class);
            fragments.push(class.description.clone());
        }
        if let Some(sentence) = describe::main_code_sentence(&detection.module_statements) {
            fragments.push(sentence);
        }

        fragments
    }
}

/// Pre-order search for the first node satisfying `pred`.
///
/// Walks with a cursor so arbitrarily deep trees do not grow the stack.
fn find_node<'t>(root: Node<'t>, mut pred: impl FnMut(Node<'t>) -> bool) -> Option<Node<'t>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if pred(node) {
            return Some(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Named, non-comment children of a module or block.
fn statements(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect();
    children
}

/// Name and alias of an `import` target (`a.b` or `a.b as c`).
fn imported_name(parsed: &ParsedSource, node: Node) -> (String, Option<String>) {
    if node.kind() == "aliased_import" {
        let name = node
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n).to_string())
            .unwrap_or_default();
        let alias = node
            .child_by_field_name("alias")
            .map(|a| parsed.node_text(a).to_string());
        (name, alias)
    } else {
        (parsed.node_text(node).to_string(), None)
    }
}

/// Module of a `from` import with relative dots removed; `None` for `from . import x`.
fn from_module(parsed: &ParsedSource, node: Node) -> Option<String> {
    if node.kind() == "future_import_statement" {
        return Some("__future__".to_string());
    }
    let module = node.child_by_field_name("module_name")?;
    let text = parsed.node_text(module).trim_start_matches('.').trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Positional parameter names, `self` included.
///
/// Positional-only parameters (before `/`) and everything from `*` or
/// `*args` onward are not positional-or-keyword parameters and are skipped.
fn positional_parameters(parsed: &ParsedSource, params: Node) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params.walk();

    for child in params.named_children(&mut cursor) {
        let name = match child.kind() {
            "identifier" => Some(child),
            "default_parameter" | "typed_default_parameter" => {
                child.child_by_field_name("name")
            }
            "typed_parameter" => match child.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => Some(inner),
                _ => break,
            },
            "positional_separator" => {
                names.clear();
                None
            }
            "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => break,
            _ => None,
        };
        if let Some(n) = name.filter(|n| n.kind() == "identifier") {
            names.push(parsed.node_text(n).to_string());
        }
    }

    names
}

/// Docstring of a module or block: a leading plain string literal, or
/// several adjacent ones.
fn docstring(parsed: &ParsedSource, node: Node) -> Option<String> {
    let first = statements(node).into_iter().next()?;
    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    let literal = first.named_child(0)?;
    match literal.kind() {
        "string" => clean_docstring(parsed.node_text(literal)),
        "concatenated_string" => {
            let mut cursor = literal.walk();
            let mut value = String::new();
            for part in literal
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "string")
            {
                value.push_str(&string_value(parsed.node_text(part))?);
            }
            cleandoc(&value)
        }
        _ => None,
    }
}

/// Decoded value of a string literal, cleaned as a docstring.
///
/// Byte and f-strings are not docstrings; empty ones are dropped.
fn clean_docstring(literal: &str) -> Option<String> {
    cleandoc(&string_value(literal)?)
}

/// Strip prefix and quotes from a string literal and decode its escapes.
fn string_value(literal: &str) -> Option<String> {
    let quote_at = literal.find(&['"', '\''][..])?;
    let prefix = literal[..quote_at].to_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }
    let body = &literal[quote_at..];
    let inner = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|q| body.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)))?;

    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

/// Decode backslash escapes; unknown escapes are kept verbatim.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            // Line continuation.
            '\n' => {}
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '0' => out.push('\0'),
            '\\' | '\'' | '"' => out.push(escape),
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                let decoded = u32::from_str_radix(&digits, 16)
                    .ok()
                    .filter(|_| digits.len() == width)
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => {
                        out.push(ch);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(escape);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

/// Strip common indentation and blank edge lines; `None` when nothing is left.
fn cleandoc(value: &str) -> Option<String> {
    let lines: Vec<&str> = value.lines().collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.trim_start().to_string()
            } else {
                line.get(margin..).unwrap_or("").trim_end().to_string()
            }
        })
        .collect();

    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }
    while cleaned.first().is_some_and(|l| l.trim().is_empty()) {
        cleaned.remove(0);
    }

    let doc = cleaned.join("\n");
    (!doc.is_empty()).then_some(doc)
}

fn is_async(node: Node) -> bool {
    node.child(0).is_some_and(|c| c.kind() == "async")
}

/// Behavior tags of the direct statements of a function body.
fn body_behaviors(parsed: &ParsedSource, body: Node) -> Vec<BehaviorTag> {
    statements(body)
        .into_iter()
        .filter_map(|stmt| match stmt.kind() {
            "return_statement" => Some(BehaviorTag::Return),
            "if_statement" => Some(BehaviorTag::Conditional),
            "for_statement" if !is_async(stmt) => Some(BehaviorTag::ForLoop),
            "while_statement" => Some(BehaviorTag::WhileLoop),
            "try_statement" => Some(BehaviorTag::ErrorHandling),
            "raise_statement" => Some(BehaviorTag::Raise),
            "assert_statement" => Some(BehaviorTag::Assertion),
            "expression_statement" => {
                let inner = stmt.named_child(0)?;
                match inner.kind() {
                    "assignment" if inner.child_by_field_name("type").is_none() => {
                        Some(BehaviorTag::Assignment)
                    }
                    "augmented_assignment" => Some(BehaviorTag::AugmentedAssignment),
                    "call" => called_name(parsed, inner).map(BehaviorTag::Call),
                    _ => None,
                }
            }
            _ => None,
        })
        .collect()
}

/// Name of a call's function when it is a bare identifier.
fn called_name(parsed: &ParsedSource, call: Node) -> Option<String> {
    let function = call.child_by_field_name("function")?;
    (function.kind() == "identifier").then(|| parsed.node_text(function).to_string())
}

/// Dispatch a top-level statement to its kind.
fn classify_statement(parsed: &ParsedSource, stmt: Node) -> ModuleStatement {
    match stmt.kind() {
        "if_statement" => ModuleStatement::Conditional,
        "for_statement" if !is_async(stmt) => ModuleStatement::ForLoop,
        "while_statement" => ModuleStatement::WhileLoop,
        "try_statement" => ModuleStatement::ErrorHandling,
        "with_statement" if !is_async(stmt) => ModuleStatement::ContextManager,
        "expression_statement" => {
            let Some(inner) = stmt.named_child(0) else {
                return ModuleStatement::Executable;
            };
            match inner.kind() {
                // Annotated assignments are not plain assignments.
                "assignment" if inner.child_by_field_name("type").is_none() => {
                    ModuleStatement::Assignment
                }
                "call" => classify_call(parsed, inner),
                _ => ModuleStatement::Executable,
            }
        }
        _ => ModuleStatement::Executable,
    }
}

fn classify_call(parsed: &ParsedSource, call: Node) -> ModuleStatement {
    let Some(function) = call.child_by_field_name("function") else {
        return ModuleStatement::Executable;
    };
    match function.kind() {
        "identifier" => match parsed.node_text(function) {
            "print" => ModuleStatement::Print,
            "input" | "raw_input" => ModuleStatement::Input,
            "open" | "file" => ModuleStatement::FileAccess,
            other => ModuleStatement::Call(other.to_string()),
        },
        "attribute" => ModuleStatement::MethodCall,
        _ => ModuleStatement::Executable,
    }
}

/// Collect plain-name targets of a (possibly chained) assignment.
fn assignment_targets(parsed: &ParsedSource, assignment: Node, out: &mut Vec<VariableRecord>) {
    let mut current = Some(assignment);
    while let Some(node) = current {
        if let Some(left) = node.child_by_field_name("left") {
            if left.kind() == "identifier" {
                out.push(VariableRecord::new(parsed.node_text(left), Scope::Module));
            }
        }
        current = node
            .child_by_field_name("right")
            .filter(|right| right.kind() == "assignment");
    }
}
