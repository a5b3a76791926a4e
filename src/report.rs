//! Output formatting for explanations.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the result envelopes themselves, for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::envelope::ResultEnvelope;

/// One analyzed input: a file path (or `-` for stdin) and its envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileExplanation {
    pub path: String,
    pub result: ResultEnvelope,
}

// =============================================================================
// JSON Format
// =============================================================================

/// Report for a directory run.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_analyzed: usize,
    pub errors: usize,
    pub results: Vec<FileExplanation>,
}

/// Render results as JSON.
///
/// A single input renders as its bare envelope so the output has the same
/// shape as the library result; several inputs are wrapped in a report.
pub fn render_json(path: &str, results: &[FileExplanation]) -> anyhow::Result<String> {
    if let [single] = results {
        return Ok(serde_json::to_string_pretty(&single.result)?);
    }

    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_analyzed: results.len(),
        errors: results.iter().filter(|r| r.result.is_error()).count(),
        results: results.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write results in JSON format.
pub fn write_json(path: &str, results: &[FileExplanation]) -> anyhow::Result<()> {
    println!("{}", render_json(path, results)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in colored human-readable format.
pub fn write_pretty(path: &str, results: &[FileExplanation], verbose: bool) {
    // Header
    println!();
    print!("  ");
    print!("{}", "explaincode".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Explaining: ".dimmed());
    println!("{}", path);
    println!();

    for file in results {
        write_file_result(file, verbose);
        println!();
    }

    write_final_status(results);
    println!();
}

fn write_file_result(file: &FileExplanation, verbose: bool) {
    let envelope = &file.result;

    if envelope.is_error() {
        print!("  {}", "✗".red());
    } else {
        print!("  {}", "✓".green());
    }
    print!(" {}", file.path.blue());
    println!("  {}", format!("[{}]", envelope.language).dimmed());
    println!();

    if envelope.is_error() {
        println!("    {}", envelope.summary.red());
        println!("    {}", envelope.details.dimmed());
        return;
    }

    println!("    {}", envelope.summary.bold());
    println!("    {}", envelope.user_friendly_summary);
    if !envelope.details.is_empty() {
        println!();
        println!("    {}", envelope.details);
    }

    write_constructs(envelope, verbose);
}

fn write_constructs(envelope: &ResultEnvelope, verbose: bool) {
    let counts = [
        ("functions", envelope.functions.len()),
        ("classes", envelope.classes.len()),
        ("variables", envelope.variables.len()),
        ("imports", envelope.imports.len()),
    ];
    if counts.iter().all(|(_, n)| *n == 0) {
        return;
    }

    println!();
    let line: Vec<String> = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(label, n)| format!("{} {}", n, label))
        .collect();
    println!("    {}", line.join(", ").dimmed());

    if !verbose {
        return;
    }

    for func in &envelope.functions {
        println!("      {:<10} {}", func.kind.as_str().dimmed(), func.description);
    }
    for class in &envelope.classes {
        println!("      {:<10} {}", class.kind.as_str().dimmed(), class.description);
    }
    for var in &envelope.variables {
        println!("      {:<10} {}", var.kind.as_str().dimmed(), var.name);
    }
    for import in &envelope.imports {
        match &import.alias {
            Some(alias) => println!(
                "      {:<10} {} as {}",
                import.kind.as_str().dimmed(),
                import.name,
                alias
            ),
            None => println!("      {:<10} {}", import.kind.as_str().dimmed(), import.name),
        }
    }
}

fn write_final_status(results: &[FileExplanation]) {
    let errors = results.iter().filter(|r| r.result.is_error()).count();
    let noun = if results.len() == 1 { "file" } else { "files" };

    if errors == 0 {
        println!(
            "  {}",
            format!("Explained {} {}", results.len(), noun).green().bold()
        );
    } else {
        println!(
            "  {}",
            format!(
                "Explained {} {}, {} could not be analyzed",
                results.len(),
                noun,
                errors
            )
            .red()
            .bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze, Language};

    fn explained(path: &str, source: &str, language: Language) -> FileExplanation {
        FileExplanation {
            path: path.to_string(),
            result: analyze(source, language),
        }
    }

    #[test]
    fn test_single_result_renders_bare_envelope() {
        let results = vec![explained("a.py", "x = 1\n", Language::Python)];
        let json = render_json("a.py", &results).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["language"], "python");
        assert!(value.get("results").is_none());
    }

    #[test]
    fn test_many_results_render_report() {
        let results = vec![
            explained("a.py", "def f(:\n", Language::Python),
            explained("b.java", "class B {}", Language::Java),
        ];
        let json = render_json("src", &results).unwrap();
        let report: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report.files_analyzed, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.results[1].path, "b.java");
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    }
}
