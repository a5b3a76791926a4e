//! Command-line interface for explaincode.

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{self, ExplainConfig, DEFAULT_CONFIG_NAMES};
use crate::explain::Explainer;
use crate::language::Language;
use crate::report::{self, FileExplanation};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Path argument meaning "read from stdin".
const STDIN_PATH: &str = "-";

/// Explain source code in plain language.
///
/// Explaincode reads Python, JavaScript, Java or C++ source and describes
/// what it does: the functions and classes it defines, the libraries it
/// uses, and the kinds of work its code performs. Analysis is
/// deterministic and never executes the code.
#[derive(Parser)]
#[command(name = "explaincode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Explain a file, a directory of files, or stdin
    #[command(visible_alias = "analyze")]
    Explain(ExplainArgs),
    /// Create an explaincode config file from a template
    Init(InitArgs),
    /// List supported languages and their aliases
    Languages,
}

/// Arguments for the explain command.
#[derive(Parser)]
pub struct ExplainArgs {
    /// File or directory to explain; omit or use "-" for stdin
    pub path: Option<PathBuf>,

    /// Source language (required for stdin; overrides file extensions)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show extracted constructs and debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "explaincode.yaml")]
    pub output: PathBuf,

    /// Template to use
    #[arg(short, long, default_value = "default")]
    pub template: String,

    /// List available templates
    #[arg(short, long)]
    pub list: bool,
}

/// Available config templates.
struct Template {
    name: &'static str,
    description: &'static str,
    content: &'static str,
}

/// All available templates.
static TEMPLATES: &[Template] = &[
    Template {
        name: "default",
        description: "Detailed explanations naming matched functions and classes",
        content: include_str!("templates/default.yaml"),
    },
    Template {
        name: "basic",
        description: "Fixed one-line sentences per detected construct",
        content: include_str!("templates/basic.yaml"),
    },
];

/// Load the config from `--config`, auto-discovery, or defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(ExplainConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => config::discover(Path::new(".")),
    };

    match path {
        Some(p) => {
            let config = ExplainConfig::parse_file(&p)
                .map_err(|e| anyhow::anyhow!("error parsing config {}: {}", p.display(), e))?;
            Ok((config, Some(p)))
        }
        None => Ok((ExplainConfig::default(), None)),
    }
}

/// Collect supported files under a directory, sorted by path.
pub fn collect_files(root: &Path, config: &ExplainConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip hidden and dependency directories
            if e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            !(e.file_type().is_dir() && (name == "node_modules" || name == "target"))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(relative) {
            continue;
        }
        if extension_language(path).is_some() {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn extension_language(path: &Path) -> Option<Language> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| Language::from_extension(&e.to_lowercase()))
}

/// Explain one input, rejecting empty code before analysis.
fn explain_source(
    explainer: &Explainer,
    display: String,
    source: &str,
    language: Language,
) -> Option<FileExplanation> {
    if source.trim().is_empty() {
        eprintln!("Warning: {} contains no code, skipping", display);
        return None;
    }
    Some(FileExplanation {
        path: display,
        result: explainer.explain(source, language),
    })
}

/// Run the explain command.
pub fn run_explain(args: &ExplainArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let forced_language = match args.language.as_deref().map(str::parse::<Language>) {
        None => None,
        Some(Ok(lang)) => Some(lang),
        Some(Err(e)) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'explaincode languages' to see supported languages");
            return Ok(EXIT_ERROR);
        }
    };

    let (config, config_path) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(p) = &config_path {
        tracing::debug!(config = %p.display(), "loaded config");
    }
    let explainer = Explainer::new(config);

    let path = args
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(STDIN_PATH));
    let display_path = path.to_string_lossy().to_string();

    let results: Vec<FileExplanation> = if display_path == STDIN_PATH {
        let Some(language) = forced_language else {
            eprintln!("Error: --language is required when reading from stdin");
            return Ok(EXIT_ERROR);
        };
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        explain_source(&explainer, display_path.clone(), &source, language)
            .into_iter()
            .collect()
    } else {
        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Error: cannot access path {:?}: {}", path, e);
                return Ok(EXIT_ERROR);
            }
        };

        if metadata.is_dir() {
            let files = collect_files(&path, explainer.config())?;
            if files.is_empty() {
                eprintln!("Warning: no supported files to explain");
                return Ok(EXIT_SUCCESS);
            }

            let loaded: Vec<(PathBuf, Language, String)> = files
                .into_iter()
                .filter_map(|file| {
                    let language = forced_language.or_else(|| extension_language(&file))?;
                    match std::fs::read_to_string(&file) {
                        Ok(source) => Some((file, language, source)),
                        Err(e) => {
                            eprintln!("Warning: cannot read {}: {}", file.display(), e);
                            None
                        }
                    }
                })
                .collect();

            loaded
                .par_iter()
                .filter_map(|(file, language, source)| {
                    let display = file
                        .strip_prefix(&path)
                        .unwrap_or(file)
                        .to_string_lossy()
                        .to_string();
                    explain_source(&explainer, display, source, *language)
                })
                .collect()
        } else {
            let Some(language) = forced_language.or_else(|| extension_language(&path)) else {
                eprintln!(
                    "Error: cannot determine the language of {}; pass --language",
                    path.display()
                );
                return Ok(EXIT_ERROR);
            };
            let source = std::fs::read_to_string(&path)?;
            match explain_source(&explainer, display_path.clone(), &source, language) {
                Some(result) => vec![result],
                None => return Ok(EXIT_ERROR),
            }
        }
    };

    if results.is_empty() {
        return Ok(EXIT_ERROR);
    }

    match args.format.as_str() {
        "json" => report::write_json(&display_path, &results)?,
        _ => report::write_pretty(&display_path, &results, args.verbose),
    }

    if results.iter().any(|r| r.result.is_error()) {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // List mode
    if args.list {
        return list_templates();
    }

    // Find template
    let template = match TEMPLATES.iter().find(|t| t.name == args.template) {
        Some(t) => t,
        None => {
            eprintln!("Error: unknown template {:?}", args.template);
            eprintln!("Run 'explaincode init --list' to see available templates");
            return Ok(EXIT_ERROR);
        }
    };

    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, template.content) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {} from template '{}'", args.output.display(), template.name);
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize explanations", args.output.display());
    if DEFAULT_CONFIG_NAMES.iter().any(|n| args.output == Path::new(n)) {
        println!("  2. Run: explaincode explain <path>");
    } else {
        println!(
            "  2. Run: explaincode explain <path> --config {}",
            args.output.display()
        );
    }

    Ok(EXIT_SUCCESS)
}

/// List available templates.
fn list_templates() -> anyhow::Result<i32> {
    println!("Available templates:");
    println!();

    for template in TEMPLATES {
        let name = if template.name == "default" {
            format!("{} (default)", template.name)
        } else {
            template.name.to_string()
        };
        println!("  {:<20} {}", name, template.description);
    }

    println!();
    println!("Usage:");
    println!("  explaincode init --template <name>");

    Ok(EXIT_SUCCESS)
}

/// Run the languages command.
pub fn run_languages() -> anyhow::Result<i32> {
    println!("Supported languages:");
    println!();

    for language in Language::ALL {
        let aliases = language.aliases();
        if aliases.is_empty() {
            println!("  {:<12} {}", language.as_str(), language.display_name());
        } else {
            println!(
                "  {:<12} {} (aliases: {})",
                language.as_str(),
                language.display_name(),
                aliases.join(", ")
            );
        }
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_templates_parse_as_config() {
        for template in TEMPLATES {
            let config = ExplainConfig::parse_str(template.content).unwrap();
            config.validate().unwrap();
        }
        let basic = TEMPLATES.iter().find(|t| t.name == "basic").unwrap();
        assert!(!ExplainConfig::parse_str(basic.content).unwrap().name_matches);
    }

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("vendor")).unwrap();
        fs::create_dir_all(root.join("node_modules")).unwrap();
        fs::write(root.join("src/b.py"), "x = 1").unwrap();
        fs::write(root.join("src/a.java"), "class A {}").unwrap();
        fs::write(root.join("src/notes.txt"), "text").unwrap();
        fs::write(root.join("vendor/lib.js"), "var x;").unwrap();
        fs::write(root.join("node_modules/dep.js"), "var y;").unwrap();

        let config = ExplainConfig {
            excluded_paths: vec!["vendor/**".to_string()],
            ..ExplainConfig::default()
        };
        let files = collect_files(root, &config).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["src/a.java", "src/b.py"]);
    }

    #[test]
    fn test_extension_language_is_case_insensitive() {
        assert_eq!(extension_language(Path::new("Main.JAVA")), Some(Language::Java));
        assert_eq!(extension_language(Path::new("README")), None);
    }
}
