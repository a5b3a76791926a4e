//! Integration tests for the full explanation pipeline.
//!
//! These tests run `analyze` end to end on inline snippets and on the
//! fixtures under testdata/.

use std::path::PathBuf;

use explaincode::assemble::ELLIPSIS;
use explaincode::{analyze, analyze_with, AnalysisType, ExplainConfig, Language};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(testdata_path().join(name)).expect("should read fixture")
}

#[test]
fn test_python_add_function() {
    let result = analyze("def add(a, b):\n    return a + b", Language::Python);

    assert!(!result.is_error());
    assert_eq!(result.functions.len(), 1);
    assert_eq!(result.functions[0].name, "add");
    assert_eq!(result.functions[0].args, vec!["a", "b"]);
    assert!(result.full_explanation.contains("takes 2 input parameters"));
    assert!(result.full_explanation.contains("returns a calculated result"));
    assert_eq!(
        result.user_friendly_summary,
        "In simple terms, this Python code defines reusable functions."
    );
    assert_eq!(result.summary, result.full_explanation);
    assert_eq!(result.details, "");
    assert_eq!(result.metadata.analysis_type, AnalysisType::Rule);
    assert_eq!(result.metadata.model_used, "rule-based");
}

#[test]
fn test_java_main_and_println() {
    let source = r#"
public class Hello {
    public static void main(String[] args) {
        System.out.println("Hello, world");
    }
}
"#;
    let result = analyze(source, Language::Java);

    assert!(result
        .full_explanation
        .contains("This contains a main method that serves as the program's entry point."));
    assert!(result
        .full_explanation
        .contains("This displays output to the console."));

    let entry = result
        .user_friendly_summary
        .find("serves as a program starting point")
        .expect("entry point tag");
    let output = result
        .user_friendly_summary
        .find("displays output to users")
        .expect("output tag");
    assert!(entry < output);

    assert_eq!(
        result.summary,
        "This defines a Java class called 'Hello' that serves as a blueprint for creating objects."
    );
    assert_eq!(
        result.details,
        "This contains a main method that serves as the program's entry point. This displays output to the console."
    );
}

#[test]
fn test_python_syntax_error_envelope() {
    let result = analyze("def f(:\n", Language::Python);

    assert!(result.is_error());
    assert!(result.summary.contains("syntax error"));
    assert!(result.summary.contains("(line 1)"));
    assert_eq!(
        result.details,
        "The code contains syntax errors and cannot be parsed."
    );
    assert_eq!(
        result.user_friendly_summary,
        "There was an error analyzing this Python code."
    );
    assert!(result.functions.is_empty());
    assert!(result.classes.is_empty());
    assert!(result.variables.is_empty());
    assert!(result.imports.is_empty());
}

#[test]
fn test_deeply_nested_python_is_a_syntax_error() {
    let depth = 20_000;
    let source = format!("x = {}1{}", "(".repeat(depth), ")".repeat(depth));
    let result = analyze(&source, Language::Python);

    assert!(result.is_error());
    assert_eq!(
        result.summary,
        "Python syntax error: too many nested parentheses (line 1)"
    );
    assert!(result.functions.is_empty());
}

#[test]
fn test_deeply_nested_javascript_is_explained() {
    let depth = 20_000;
    let source = format!("let x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let result = analyze(&source, Language::JavaScript);

    assert!(!result.is_error());
    assert_eq!(result.variables[0].name, "x");
}

#[test]
fn test_cpp_without_constructs_uses_fallback() {
    let result = analyze("x = 1;", Language::Cpp);

    assert!(!result.is_error());
    assert_eq!(
        result.full_explanation,
        "This appears to be a simple C++ code snippet."
    );
    assert_eq!(result.summary, result.full_explanation);
    assert_eq!(
        result.user_friendly_summary,
        "In simple terms, this C++ code performs basic programming operations."
    );
}

#[test]
fn test_empty_and_blank_input_never_fail() {
    for language in Language::ALL {
        for source in ["", "   \n\t\n", "\n"] {
            let result = analyze(source, language);
            assert!(
                !result.full_explanation.is_empty(),
                "{} with {:?}",
                language,
                source
            );
            assert!(!result.summary.is_empty());
            assert_eq!(result.language, language.as_str());
        }
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let inputs = [
        (fixture("sample.py"), Language::Python),
        (fixture("sample.js"), Language::JavaScript),
        (fixture("Sample.java"), Language::Java),
        (fixture("sample.cpp"), Language::Cpp),
        (fixture("broken.py"), Language::Python),
    ];

    for (source, language) in &inputs {
        let first = serde_json::to_string(&analyze(source, *language)).unwrap();
        let second = serde_json::to_string(&analyze(source, *language)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_cutoff_summary_reconstructs_full_text() {
    let result = analyze(&fixture("sample.cpp"), Language::Cpp);

    assert!(result.full_explanation.chars().count() > 200);
    let head = result
        .summary
        .strip_suffix(ELLIPSIS)
        .expect("long text should be truncated");
    assert_eq!(head.chars().count(), 200);
    assert_eq!(format!("{}{}", head, result.details), result.full_explanation);
}

#[test]
fn test_envelope_has_exactly_the_documented_keys() {
    let mut expected = vec![
        "summary",
        "user_friendly_summary",
        "details",
        "full_explanation",
        "functions",
        "classes",
        "variables",
        "imports",
        "language",
        "metadata",
    ];
    expected.sort();

    for result in [
        analyze("print('hi')", Language::Python),
        analyze("def f(:", Language::Python),
        analyze("let x = 1;", Language::JavaScript),
    ] {
        let value = serde_json::to_value(&result).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort();
        assert_eq!(keys, expected);
    }
}

#[test]
fn test_python_fixture() {
    let result = analyze(&fixture("sample.py"), Language::Python);
    assert!(!result.is_error());

    let functions: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(functions, vec!["calculate_total", "__init__", "add"]);
    assert_eq!(result.functions[0].args, vec!["prices", "tax"]);
    assert_eq!(
        result.functions[0].docstring.as_deref(),
        Some("Sum prices and apply tax.")
    );

    let class = &result.classes[0];
    assert_eq!(class.name, "Inventory");
    assert_eq!(class.bases, vec!["OrderedDict"]);
    assert_eq!(class.methods, vec!["__init__", "add"]);
    assert_eq!(
        class.description,
        "Class 'Inventory' inherits from OrderedDict with 2 method(s): __init__, add. Docstring: 'Item counts keyed by name.'"
    );

    let imports: Vec<&str> = result.imports.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(imports, vec!["json", "collections.OrderedDict"]);
    assert_eq!(result.variables[0].name, "stock");

    assert!(result
        .full_explanation
        .starts_with("This Python module includes documentation: 'Inventory helpers for a small shop.'"));
    assert!(result.full_explanation.ends_with(
        "The main code contains executable code and variable assignment at module level and calls a method or function and displays output to the user."
    ));
    assert_eq!(
        result.user_friendly_summary,
        "In simple terms, this Python code defines reusable functions, creates object-oriented classes, stores data in variables, uses external libraries, and executes main program logic."
    );

    // Two sentences; the quoted docstring and dotted import do not end one.
    assert_eq!(
        result.summary,
        "This Python module includes documentation: 'Inventory helpers for a small shop.' \
         The code imports the following modules: json, collections.OrderedDict. \
         This defines a function called 'calculate_total' that takes 2 input parameters: \
         prices, tax and returns a calculated result."
    );
    assert!(result
        .details
        .starts_with("This defines a special method '__init__'"));
    assert_eq!(
        format!("{} {}", result.summary, result.details),
        result.full_explanation
    );
}

#[test]
fn test_javascript_fixture() {
    let result = analyze(&fixture("sample.js"), Language::JavaScript);

    let functions: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(functions, vec!["fetchItems", "total"]);
    assert_eq!(result.classes[0].name, "Cart");
    assert_eq!(result.imports[0].name, "axios");

    let variables: Vec<&str> = result.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(variables, vec!["response", "cart"]);

    assert_eq!(
        result.summary,
        "This defines 2 functions: fetchItems, total that work together to accomplish tasks."
    );
    for tag in [
        "responds to user interactions",
        "modifies web page content",
        "communicates with external services",
        "performs operations that take time to complete",
    ] {
        assert!(result.user_friendly_summary.contains(tag), "missing {}", tag);
    }
}

#[test]
fn test_java_fixture() {
    let result = analyze(&fixture("Sample.java"), Language::Java);

    let methods: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(methods, vec!["addPrice", "total"]);
    let imports: Vec<&str> = result.imports.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(imports, vec!["java.util.ArrayList", "java.util.List"]);
    assert!(result
        .full_explanation
        .contains("This defines 2 methods: addPrice, total that perform specific operations."));
    assert!(result
        .full_explanation
        .contains("This Java code belongs to a package."));
}

#[test]
fn test_javascript_summary_keeps_capped_listing() {
    let source = "function a() {}\nfunction b() {}\nfunction c() {}\nfunction d() {}\nlet x = 1;\n";
    let result = analyze(source, Language::JavaScript);

    assert_eq!(
        result.summary,
        "This defines 4 functions: a, b, c... that work together to accomplish tasks."
    );
    assert_eq!(
        result.details,
        "This creates a variable called 'x' to store data."
    );
}

#[test]
fn test_java_summary_keeps_capped_listing() {
    let source = "class A {}\nclass B {}\nclass C {}\nclass D {}\nSystem.out.println(1);\n";
    let result = analyze(source, Language::Java);

    assert_eq!(
        result.summary,
        "This defines 4 Java classes: A, B, C... that create different types of objects."
    );
    assert_eq!(result.details, "This displays output to the console.");
}

#[test]
fn test_basic_config_uses_fixed_sentences() {
    let config = ExplainConfig {
        name_matches: false,
        ..ExplainConfig::default()
    };
    let result = analyze_with(&fixture("Sample.java"), Language::Java, &config);
    assert_eq!(result.summary, "This code defines Java classes.");
    assert!(result.full_explanation.contains("This code defines methods."));
    // Records are still extracted.
    assert_eq!(result.functions.len(), 2);
}

#[test]
fn test_max_named_matches_is_configurable() {
    let source = "class A {}\nclass B {}\nclass C {}\n";
    let config = ExplainConfig {
        max_named_matches: 1,
        ..ExplainConfig::default()
    };
    let result = analyze_with(source, Language::JavaScript, &config);
    assert_eq!(
        result.summary,
        "This defines 3 classes: A... that create different types of objects."
    );
}
