//! Regex rule tables for the pattern-strategy languages.
//!
//! Every rule is tested against the whole source text, not line by line.
//! A rule contributes at most one fired entry no matter how often it
//! matches; naming rules additionally report one name per distinct match.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::ExplainError;

use super::{FiredRule, RuleId};

/// Declarative rule definition, compiled into a [`RuleTable`].
pub struct PatternRule {
    pub id: RuleId,
    /// Alternative patterns; the rule fires if any of them matches.
    pub patterns: &'static [&'static str],
    /// Collect the first participating capture group of each match.
    pub names: bool,
    /// Names that never count as a match for this rule.
    pub exclude: &'static [&'static str],
}

impl PatternRule {
    /// A rule that only records whether it matched.
    pub const fn presence(id: RuleId, patterns: &'static [&'static str]) -> Self {
        Self {
            id,
            patterns,
            names: false,
            exclude: &[],
        }
    }

    /// A rule that extracts one name per match.
    pub const fn naming(id: RuleId, patterns: &'static [&'static str]) -> Self {
        Self {
            id,
            patterns,
            names: true,
            exclude: &[],
        }
    }

    pub const fn excluding(self, exclude: &'static [&'static str]) -> Self {
        Self { exclude, ..self }
    }
}

/// Pre-compiled rule with metadata.
struct CompiledRule {
    id: RuleId,
    regexes: Vec<Regex>,
    names: bool,
    exclude: &'static [&'static str],
}

/// An ordered, compiled set of rules for one language.
pub struct RuleTable {
    rules: Vec<CompiledRule>,
}

impl RuleTable {
    /// Compile rule definitions, keeping their order.
    pub fn compile(rules: &[PatternRule]) -> Result<Self, ExplainError> {
        let rules = rules
            .iter()
            .map(|rule| {
                let regexes = rule
                    .patterns
                    .iter()
                    .map(|p| {
                        Regex::new(p).map_err(|e| {
                            ExplainError::Internal(format!("compiling pattern {:?}: {}", p, e))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledRule {
                    id: rule.id,
                    regexes,
                    names: rule.names,
                    exclude: rule.exclude,
                })
            })
            .collect::<Result<Vec<_>, ExplainError>>()?;
        Ok(Self { rules })
    }

    /// Test every rule against the source and return the fired ones in table order.
    pub fn scan(&self, source: &str) -> Vec<FiredRule> {
        self.rules
            .iter()
            .filter_map(|rule| {
                if rule.names {
                    let names = collect_names(rule, source);
                    (!names.is_empty()).then(|| FiredRule { id: rule.id, names })
                } else {
                    rule.regexes
                        .iter()
                        .any(|re| re.is_match(source))
                        .then(|| FiredRule::presence(rule.id))
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Collect named matches ordered by source position.
///
/// Two patterns capturing the same offset (`function foo` and
/// `async function foo`) yield a single name.
fn collect_names(rule: &CompiledRule, source: &str) -> Vec<String> {
    let mut by_offset = BTreeMap::new();

    for re in &rule.regexes {
        for caps in re.captures_iter(source) {
            let Some(m) = caps.iter().skip(1).flatten().next() else {
                continue;
            };
            if rule.exclude.contains(&m.as_str()) {
                continue;
            }
            by_offset
                .entry(m.start())
                .or_insert_with(|| m.as_str().to_string());
        }
    }

    by_offset.into_values().collect()
}
