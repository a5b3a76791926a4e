//! Explanation assembly: joining fragments, splitting summary from
//! details, and phrasing the user-friendly summary.

use crate::language::Language;

/// Marker appended to a summary cut at the character bound.
pub const ELLIPSIS: &str = "...";

/// Separator used both to join fragments and to detect sentence ends.
const SENTENCE_BREAK: &str = ". ";

/// Strategy for deriving `summary` and `details` from the full explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Keep the leading `sentences` sentences. Falls back to the character
    /// cutoff when the text has no sentence break at all.
    SentenceCount { sentences: usize, cutoff: usize },
    /// Cut at exactly this many characters, possibly mid-word.
    CharacterCutoff(usize),
}

/// A summary and the remainder of the text it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub summary: String,
    pub details: String,
}

impl SplitPolicy {
    pub fn split(&self, text: &str) -> Split {
        match *self {
            SplitPolicy::SentenceCount { sentences, cutoff } => {
                let pieces = sentence_pieces(text);
                if pieces.len() < 2 {
                    return cutoff_split(text, cutoff);
                }
                let keep = sentences.clamp(1, pieces.len());
                let mut summary = pieces[..keep].join(SENTENCE_BREAK);
                // Splitting consumed the period of every piece but the last.
                if keep < pieces.len() || !summary.ends_with('.') {
                    summary.push('.');
                }
                Split {
                    summary,
                    details: pieces[keep..].join(SENTENCE_BREAK),
                }
            }
            SplitPolicy::CharacterCutoff(cutoff) => cutoff_split(text, cutoff),
        }
    }
}

/// Split on sentence breaks, skipping the break that follows an ellipsis
/// inside a name listing.
fn sentence_pieces(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (at, _) in text.match_indices(SENTENCE_BREAK) {
        if text[..at + 1].ends_with(ELLIPSIS) {
            continue;
        }
        pieces.push(&text[start..at]);
        start = at + SENTENCE_BREAK.len();
    }
    pieces.push(&text[start..]);
    pieces
}

/// Split at a character (not byte) boundary.
fn cutoff_split(text: &str, cutoff: usize) -> Split {
    match text.char_indices().nth(cutoff) {
        Some((idx, _)) => Split {
            summary: format!("{}{}", &text[..idx], ELLIPSIS),
            details: text[idx..].to_string(),
        },
        None => Split {
            summary: text.to_string(),
            details: String::new(),
        },
    }
}

/// Sentence used when no rule produced a fragment.
pub fn fallback_sentence(language: Language) -> String {
    format!(
        "This appears to be a simple {} code snippet.",
        language.display_name()
    )
}

/// Join fragments with single spaces, substituting the fallback when empty.
pub fn full_explanation(language: Language, fragments: &[String]) -> String {
    if fragments.is_empty() {
        fallback_sentence(language)
    } else {
        fragments.join(" ")
    }
}

/// Phrase feature tags as one sentence, Oxford-comma style.
pub fn user_friendly_summary(language: Language, tags: &[&str]) -> String {
    let listing = match tags {
        [] => "performs basic programming operations".to_string(),
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    };
    format!(
        "In simple terms, this {} code {}.",
        language.display_name(),
        listing
    )
}

/// The text fields of a success envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub summary: String,
    pub user_friendly_summary: String,
    pub details: String,
    pub full_explanation: String,
}

pub fn assemble(
    language: Language,
    fragments: &[String],
    tags: &[&str],
    policy: SplitPolicy,
) -> Assembled {
    let full_explanation = full_explanation(language, fragments);
    let Split { summary, details } = policy.split(&full_explanation);
    Assembled {
        summary,
        user_friendly_summary: user_friendly_summary(language, tags),
        details,
        full_explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_grammar() {
        assert_eq!(
            user_friendly_summary(Language::Python, &[]),
            "In simple terms, this Python code performs basic programming operations."
        );
        assert_eq!(
            user_friendly_summary(Language::Java, &["x"]),
            "In simple terms, this Java code x."
        );
        assert_eq!(
            user_friendly_summary(Language::Cpp, &["x", "y"]),
            "In simple terms, this C++ code x and y."
        );
        assert_eq!(
            user_friendly_summary(Language::JavaScript, &["x", "y", "z"]),
            "In simple terms, this JavaScript code x, y, and z."
        );
        assert_eq!(
            user_friendly_summary(Language::Python, &["a", "b", "c", "d"]),
            "In simple terms, this Python code a, b, c, and d."
        );
    }

    #[test]
    fn test_cutoff_short_text_is_untouched() {
        let split = SplitPolicy::CharacterCutoff(200).split("Short text.");
        assert_eq!(split.summary, "Short text.");
        assert_eq!(split.details, "");
    }

    #[test]
    fn test_cutoff_exactly_at_bound_is_untouched() {
        let text = "a".repeat(200);
        let split = SplitPolicy::CharacterCutoff(200).split(&text);
        assert_eq!(split.summary, text);
        assert!(split.details.is_empty());
    }

    #[test]
    fn test_cutoff_reconstructs_full_text() {
        let text = "word ".repeat(60);
        let split = SplitPolicy::CharacterCutoff(200).split(&text);
        assert!(split.summary.ends_with(ELLIPSIS));
        let head = split.summary.strip_suffix(ELLIPSIS).unwrap();
        assert_eq!(head.chars().count(), 200);
        assert_eq!(format!("{}{}", head, split.details), text);
    }

    #[test]
    fn test_cutoff_counts_characters_not_bytes() {
        let text = "é".repeat(201);
        let split = SplitPolicy::CharacterCutoff(200).split(&text);
        assert_eq!(split.details, "é");
    }

    #[test]
    fn test_sentence_count_one() {
        let policy = SplitPolicy::SentenceCount { sentences: 1, cutoff: 200 };
        let split = policy.split("First one. Second one. Third one.");
        assert_eq!(split.summary, "First one.");
        assert_eq!(split.details, "Second one. Third one.");
    }

    #[test]
    fn test_sentence_count_two_with_exactly_two() {
        let policy = SplitPolicy::SentenceCount { sentences: 2, cutoff: 200 };
        let split = policy.split("First one. Second one.");
        assert_eq!(split.summary, "First one. Second one.");
        assert_eq!(split.details, "");
    }

    #[test]
    fn test_sentence_count_always_terminates_kept_pieces() {
        let policy = SplitPolicy::SentenceCount { sentences: 1, cutoff: 200 };
        let split = policy.split("Version 2.. Then more. End.");
        assert_eq!(split.summary, "Version 2..");
        assert_eq!(split.details, "Then more. End.");
    }

    #[test]
    fn test_sentence_count_keeps_name_listing_whole() {
        let policy = SplitPolicy::SentenceCount { sentences: 1, cutoff: 200 };
        let split = policy.split("Defines 4 items: a, b, c... that work. Second one.");
        assert_eq!(split.summary, "Defines 4 items: a, b, c... that work.");
        assert_eq!(split.details, "Second one.");

        let alone = policy.split("Defines 4 items: a, b, c... that work.");
        assert_eq!(alone.summary, "Defines 4 items: a, b, c... that work.");
        assert_eq!(alone.details, "");
    }

    #[test]
    fn test_sentence_count_falls_back_to_cutoff() {
        let policy = SplitPolicy::SentenceCount { sentences: 2, cutoff: 10 };
        let split = policy.split("A single sentence without breaks.");
        assert_eq!(split.summary, "A single s...");
        assert_eq!(split.details, "entence without breaks.");
    }

    #[test]
    fn test_full_explanation_fallback() {
        assert_eq!(
            full_explanation(Language::Cpp, &[]),
            "This appears to be a simple C++ code snippet."
        );
        let joined = full_explanation(Language::Java, &["A.".to_string(), "B.".to_string()]);
        assert_eq!(joined, "A. B.");
    }
}
