//! Explainer configuration.
//!
//! The configuration selects which optional behaviors of the canonical rule
//! tables are active. Every field has a default, so an empty file (or no
//! file at all) yields the detailed explainer.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["explaincode.yaml", ".explaincode.yaml"];

/// How many matched names a multi-match sentence lists before `...`.
pub const DEFAULT_MAX_NAMED_MATCHES: usize = 3;

/// Character bound used by the cutoff summary policy.
pub const DEFAULT_SUMMARY_CUTOFF: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExplainConfig {
    /// Name matched functions and classes in pattern-language fragments.
    /// When false, naming rules use their fixed basic sentence.
    #[serde(default = "default_true")]
    pub name_matches: bool,
    /// Emit feature tags for the user-friendly summary.
    #[serde(default = "default_true")]
    pub feature_tags: bool,
    #[serde(default = "default_max_named_matches")]
    pub max_named_matches: usize,
    #[serde(default = "default_summary_cutoff")]
    pub summary_cutoff: usize,
    /// Glob patterns for paths to skip in directory mode (e.g., "**/vendor/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_max_named_matches() -> usize {
    DEFAULT_MAX_NAMED_MATCHES
}

fn default_summary_cutoff() -> usize {
    DEFAULT_SUMMARY_CUTOFF
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            name_matches: true,
            feature_tags: true,
            max_named_matches: DEFAULT_MAX_NAMED_MATCHES,
            summary_cutoff: DEFAULT_SUMMARY_CUTOFF,
            excluded_paths: Vec::new(),
        }
    }
}

impl ExplainConfig {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a configuration from YAML text. Blank text yields the defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ExplainConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the generated text meaningless.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_named_matches == 0 {
            anyhow::bail!("max_named_matches must be at least 1");
        }
        if self.summary_cutoff == 0 {
            anyhow::bail!("summary_cutoff must be at least 1");
        }
        for pattern in &self.excluded_paths {
            globset::Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded path {:?}: {}", pattern, e))?;
        }
        Ok(())
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        self.excluded_paths.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(&*path_str))
                .unwrap_or(false)
        })
    }
}

/// Look for a config file in the given directory.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = ExplainConfig::parse_str("").unwrap();
        assert_eq!(config, ExplainConfig::default());
        assert!(config.name_matches);
        assert_eq!(config.max_named_matches, 3);
        assert_eq!(config.summary_cutoff, 200);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = ExplainConfig::parse_str("feature_tags: false\nmax_named_matches: 5\n").unwrap();
        assert!(!config.feature_tags);
        assert!(config.name_matches);
        assert_eq!(config.max_named_matches, 5);
    }

    #[test]
    fn test_rejects_zero_limits() {
        assert!(ExplainConfig::parse_str("max_named_matches: 0").is_err());
        assert!(ExplainConfig::parse_str("summary_cutoff: 0").is_err());
    }

    #[test]
    fn test_excluded_paths() {
        let config = ExplainConfig {
            excluded_paths: vec!["**/vendor/**".to_string()],
            ..Default::default()
        };
        assert!(config.is_path_excluded(Path::new("src/vendor/lib.js")));
        assert!(!config.is_path_excluded(Path::new("src/app.js")));
    }

    #[test]
    fn test_discover() {
        let temp = TempDir::new().unwrap();
        assert!(discover(temp.path()).is_none());
        std::fs::write(temp.path().join(".explaincode.yaml"), "name_matches: false\n").unwrap();
        let found = discover(temp.path()).unwrap();
        assert!(!ExplainConfig::parse_file(found).unwrap().name_matches);
    }
}
