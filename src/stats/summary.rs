//! End-of-session summary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::core::{normalize_word, SessionState};

/// A word and how many accepted sentences it appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

/// Read-only view of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub lesson_id: String,
    pub learner_id: String,
    pub formulas_completed: usize,
    pub formulas_total: usize,
    /// Checks made across all formulas, including the accepted ones.
    pub total_attempts: u32,
    /// Sum of the per-formula times.
    pub elapsed_ms: u64,
    /// Most repeated words, stopwords excluded.
    pub top_words: Vec<WordCount>,
}

impl SessionSummary {
    /// Build the summary from a session's counters.
    pub fn from_state(state: &SessionState, config: &SessionConfig) -> Self {
        let accepted = state.accepted();
        Self {
            session_id: state.id.clone(),
            lesson_id: state.lesson_id.clone(),
            learner_id: state.learner_id.clone(),
            formulas_completed: state.formulas_completed(),
            formulas_total: state.formulas_total(),
            total_attempts: accepted.iter().map(|s| s.attempts).sum(),
            elapsed_ms: accepted.iter().map(|s| s.elapsed_ms).sum(),
            top_words: top_words(
                state.word_write_counts(),
                &config.stopwords,
                config.top_words as usize,
            ),
        }
    }
}

/// The `limit` most repeated words.
///
/// Only words written more than once count as repeated. Ties are broken
/// alphabetically so the listing is stable.
pub fn top_words(
    counts: &HashMap<String, u32>,
    stopwords: &[String],
    limit: usize,
) -> Vec<WordCount> {
    let stopwords: Vec<String> = stopwords.iter().map(|w| normalize_word(w)).collect();

    let mut words: Vec<WordCount> = counts
        .iter()
        .filter(|(word, count)| **count > 1 && !stopwords.contains(*word))
        .map(|(word, count)| WordCount {
            word: word.clone(),
            count: *count,
        })
        .collect();

    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(limit);
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::SentenceEngine;
    use crate::lessons::library_formulas;

    fn counts(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    fn stopwords() -> Vec<String> {
        SessionConfig::default().stopwords
    }

    #[test]
    fn test_top_words_excludes_stopwords_and_singletons() {
        let counts = counts(&[("library", 6), ("the", 4), ("its", 1), ("opens", 6), ("in", 4)]);
        let top = top_words(&counts, &stopwords(), 5);

        let words: Vec<&str> = top.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["library", "opens"]);
    }

    #[test]
    fn test_top_words_ties_alphabetical_and_limited() {
        let counts = counts(&[("quietly", 5), ("opens", 6), ("library", 6), ("morning", 4)]);
        let top = top_words(&counts, &[], 3);

        assert_eq!(
            top,
            vec![
                WordCount { word: "library".to_string(), count: 6 },
                WordCount { word: "opens".to_string(), count: 6 },
                WordCount { word: "quietly".to_string(), count: 5 },
            ]
        );
    }

    #[test]
    fn test_stopwords_compared_normalized() {
        let counts = counts(&[("the", 3), ("dog", 2)]);
        let top = top_words(&counts, &["The ".to_string()], 5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].word, "dog");
    }

    #[test]
    fn test_library_summary() {
        let config = Config::default();
        let mut session = SessionState::new("library", "pupil-1", library_formulas());
        let mut engine = SentenceEngine::new(&mut session, &config);
        while !engine.is_complete() {
            let text = engine.current_formula().unwrap().target_sentence.join(" ");
            engine.type_text(&text);
            engine.check();
            engine.advance();
        }

        let summary = engine.summary().unwrap();

        assert_eq!(summary.formulas_completed, 6);
        assert_eq!(summary.formulas_total, 6);
        assert_eq!(summary.total_attempts, 6);
        assert_eq!(summary.lesson_id, "library");
        assert_eq!(
            summary.top_words.first(),
            Some(&WordCount { word: "library".to_string(), count: 6 })
        );
        assert!(summary.top_words.iter().all(|w| w.word != "the" && w.word != "in"));
        assert!(summary.top_words.len() <= 5);
    }
}
