//! Integration tests for the command-line entry points.
//!
//! These call the command functions directly and check exit codes and
//! written files; report text goes to stdout.

use std::fs;
use std::path::PathBuf;

use explaincode::cli::{
    run_explain, run_init, ExplainArgs, InitArgs, EXIT_ERROR, EXIT_FAILED, EXIT_SUCCESS,
};
use explaincode::ExplainConfig;
use tempfile::TempDir;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn explain_args(path: PathBuf) -> ExplainArgs {
    ExplainArgs {
        path: Some(path),
        language: None,
        format: "json".to_string(),
        config: None,
        verbose: false,
    }
}

#[test]
fn test_explain_single_file() {
    let args = explain_args(testdata_path().join("Sample.java"));
    assert_eq!(run_explain(&args).unwrap(), EXIT_SUCCESS);
}

#[test]
fn test_syntax_error_exits_failed() {
    let args = explain_args(testdata_path().join("broken.py"));
    assert_eq!(run_explain(&args).unwrap(), EXIT_FAILED);
}

#[test]
fn test_directory_mode() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.py"), "def f():\n    return 1\n").unwrap();
    fs::write(temp.path().join("b.cpp"), "int main() { return 0; }").unwrap();
    fs::write(temp.path().join("notes.md"), "# not code").unwrap();

    let mut args = explain_args(temp.path().to_path_buf());
    assert_eq!(run_explain(&args).unwrap(), EXIT_SUCCESS);

    args.format = "pretty".to_string();
    args.verbose = true;
    assert_eq!(run_explain(&args).unwrap(), EXIT_SUCCESS);
}

#[test]
fn test_directory_with_broken_file_exits_failed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("ok.js"), "let x = 1;").unwrap();
    fs::write(temp.path().join("bad.py"), "def f(:\n").unwrap();

    let args = explain_args(temp.path().to_path_buf());
    assert_eq!(run_explain(&args).unwrap(), EXIT_FAILED);
}

#[test]
fn test_usage_errors() {
    let mut args = explain_args(testdata_path().join("sample.py"));
    args.format = "xml".to_string();
    assert_eq!(run_explain(&args).unwrap(), EXIT_ERROR);

    let mut args = explain_args(testdata_path().join("sample.py"));
    args.language = Some("cobol".to_string());
    assert_eq!(run_explain(&args).unwrap(), EXIT_ERROR);

    let args = explain_args(testdata_path().join("missing.py"));
    assert_eq!(run_explain(&args).unwrap(), EXIT_ERROR);

    let temp = TempDir::new().unwrap();
    let unknown = temp.path().join("README");
    fs::write(&unknown, "plain text").unwrap();
    assert_eq!(run_explain(&explain_args(unknown)).unwrap(), EXIT_ERROR);
}

#[test]
fn test_empty_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let empty = temp.path().join("empty.py");
    fs::write(&empty, "  \n").unwrap();
    assert_eq!(run_explain(&explain_args(empty)).unwrap(), EXIT_ERROR);
}

#[test]
fn test_language_flag_overrides_extension() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("snippet.txt");
    fs::write(&file, "print('hi')\n").unwrap();

    let mut args = explain_args(file);
    args.language = Some("py".to_string());
    assert_eq!(run_explain(&args).unwrap(), EXIT_SUCCESS);
}

#[test]
fn test_explicit_config() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.yaml");
    fs::write(&config, "name_matches: false\n").unwrap();

    let mut args = explain_args(testdata_path().join("sample.js"));
    args.config = Some(config);
    assert_eq!(run_explain(&args).unwrap(), EXIT_SUCCESS);

    let bad = temp.path().join("bad.yaml");
    fs::write(&bad, "summary_cutoff: 0\n").unwrap();
    args.config = Some(bad);
    assert_eq!(run_explain(&args).unwrap(), EXIT_ERROR);
}

#[test]
fn test_init_writes_template_once() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("conf").join("explaincode.yaml");
    let args = InitArgs {
        output: output.clone(),
        template: "basic".to_string(),
        list: false,
    };

    assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
    let config = ExplainConfig::parse_file(&output).unwrap();
    assert!(!config.name_matches);

    // Refuses to overwrite.
    assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
}

#[test]
fn test_init_unknown_template() {
    let temp = TempDir::new().unwrap();
    let args = InitArgs {
        output: temp.path().join("x.yaml"),
        template: "fancy".to_string(),
        list: false,
    };
    assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
}
