//! The analysis pipeline: detect, describe, tag, assemble.
//!
//! Every call returns exactly one envelope. Detector errors and panics are
//! folded into an error envelope here and never reach the caller.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::analysis::detector_for;
use crate::assemble::assemble;
use crate::config::ExplainConfig;
use crate::envelope::ResultEnvelope;
use crate::error::ExplainError;
use crate::features;
use crate::language::Language;

/// Explains source snippets under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Explainer {
    config: ExplainConfig,
}

impl Explainer {
    pub fn new(config: ExplainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplainConfig {
        &self.config
    }

    /// Explain one snippet. Never fails; errors become error envelopes.
    pub fn explain(&self, source: &str, language: Language) -> ResultEnvelope {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(source, language)))
            .unwrap_or_else(|payload| Err(ExplainError::Internal(panic_message(payload))));

        match outcome {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(language = %language, error = %err, "analysis failed");
                ResultEnvelope::failure(language, &err)
            }
        }
    }

    fn run(&self, source: &str, language: Language) -> Result<ResultEnvelope, ExplainError> {
        let detector = detector_for(language);
        let mut detection = detector.detect(source, &self.config)?;
        let fragments = detector.describe(&mut detection, &self.config);

        let tags = if self.config.feature_tags {
            features::tag(language, &detection.fired)
        } else {
            Vec::new()
        };

        debug!(
            language = %language,
            bytes = source.len(),
            fired = detection.fired.len(),
            fragments = fragments.len(),
            tags = tags.len(),
            "analyzed snippet"
        );

        let text = assemble(
            language,
            &fragments,
            &tags,
            language.split_policy(self.config.summary_cutoff),
        );
        Ok(ResultEnvelope::success(language, text, detection.constructs))
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "analysis panicked".to_string()
    }
}

/// Explain a snippet with the default configuration.
pub fn analyze(source: &str, language: Language) -> ResultEnvelope {
    Explainer::default().explain(source, language)
}

/// Explain a snippet with an explicit configuration.
pub fn analyze_with(source: &str, language: Language, config: &ExplainConfig) -> ResultEnvelope {
    Explainer::new(config.clone()).explain(source, language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("owned".to_string())), "owned");
        assert_eq!(panic_message(Box::new(42_u8)), "analysis panicked");
    }

    #[test]
    fn test_feature_tags_can_be_disabled() {
        let config = ExplainConfig {
            feature_tags: false,
            ..ExplainConfig::default()
        };
        let envelope = analyze_with("def f():\n    return 1\n", Language::Python, &config);
        assert_eq!(
            envelope.user_friendly_summary,
            "In simple terms, this Python code performs basic programming operations."
        );
        assert!(!envelope.is_error());
    }

    #[test]
    fn test_summary_cutoff_is_configurable() {
        let config = ExplainConfig {
            summary_cutoff: 10,
            ..ExplainConfig::default()
        };
        let envelope = analyze_with("#include <iostream>", Language::Cpp, &config);
        assert_eq!(envelope.summary, "This C++ c...");
        assert_eq!(envelope.details, "ode includes header files.");
    }
}
