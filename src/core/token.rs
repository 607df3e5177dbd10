//! Token assembly for the sentence the learner is building.
//!
//! A built sentence mixes two kinds of tokens: words reused from the
//! previously accepted sentence (clicked) and new words typed by the learner.
//! Every operation here is a local mutation that reports whether it was
//! accepted; rejected actions leave the sentence untouched.

use serde::{Deserialize, Serialize};

/// Where a token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrigin {
    /// Clicked from the previously accepted sentence.
    Reused,
    /// Typed by the learner.
    Typed,
}

/// One word in the built sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Where the token came from.
    pub origin: TokenOrigin,
    /// Literal text.
    pub text: String,
}

impl Token {
    /// Create a reused token.
    pub fn reused(text: impl Into<String>) -> Self {
        Self {
            origin: TokenOrigin::Reused,
            text: text.into(),
        }
    }

    /// Create a typed token.
    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            origin: TokenOrigin::Typed,
            text: text.into(),
        }
    }

    /// Whether this token was typed.
    pub fn is_typed(&self) -> bool {
        self.origin == TokenOrigin::Typed
    }
}

/// Which tokens the learner may remove individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalPolicy {
    /// Only typed tokens can be removed; reused words are released by `clear`.
    #[default]
    TypedOnly,
    /// Any token can be removed, which also frees its reused-word slot.
    Any,
}

/// Valid values for the removal policy in config and env vars.
pub const VALID_REMOVAL_POLICIES: &[&str] = &["typed-only", "any"];

impl RemovalPolicy {
    /// Parse a config value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "typed-only" => Some(Self::TypedOnly),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Config representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypedOnly => "typed-only",
            Self::Any => "any",
        }
    }
}

/// The sentence under construction for the current formula.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltSentence {
    tokens: Vec<Token>,
}

impl BuiltSentence {
    /// Create an empty sentence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token texts in order.
    pub fn words(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text.clone()).collect()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sentence has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The sentence as displayed: tokens joined by single spaces.
    pub fn text(&self) -> String {
        self.words().join(" ")
    }

    /// Check whether the word at `source_index` of `previous_words` has
    /// already been used.
    ///
    /// A word can repeat in the source list, so the slot is used once the
    /// built sentence holds at least as many copies of the word as the
    /// source list has up to and including `source_index`.
    pub fn is_slot_used(&self, previous_words: &[String], source_index: usize) -> bool {
        let Some(word) = previous_words.get(source_index) else {
            return true;
        };

        let occurrences = previous_words[..=source_index]
            .iter()
            .filter(|w| *w == word)
            .count();
        let already_built = self.tokens.iter().filter(|t| &t.text == word).count();

        already_built >= occurrences
    }

    /// Append a reused word clicked at `source_index`.
    ///
    /// Rejected when the index is out of range, the word does not match the
    /// source list, or the slot is already used.
    pub fn add_reused(&mut self, previous_words: &[String], word: &str, source_index: usize) -> bool {
        match previous_words.get(source_index) {
            Some(source) if source == word => {}
            _ => return false,
        }

        if self.is_slot_used(previous_words, source_index) {
            return false;
        }

        self.tokens.push(Token::reused(word));
        true
    }

    /// Append typed text, split on whitespace into one token per word.
    ///
    /// Returns the number of tokens added (0 for blank input).
    pub fn add_typed(&mut self, raw_text: &str) -> usize {
        let before = self.tokens.len();
        self.tokens
            .extend(raw_text.split_whitespace().map(Token::typed));
        self.tokens.len() - before
    }

    /// Remove the token at `position` if the policy allows it.
    pub fn remove(&mut self, position: usize, policy: RemovalPolicy) -> bool {
        let Some(token) = self.tokens.get(position) else {
            return false;
        };

        if policy == RemovalPolicy::TypedOnly && !token.is_typed() {
            return false;
        }

        self.tokens.remove(position);
        true
    }

    /// Remove every token, releasing all reused-word slots.
    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_repeated_word_can_be_clicked_once_per_occurrence() {
        let previous = words(&["the", "old", "the"]);
        let mut sentence = BuiltSentence::new();

        assert!(sentence.add_reused(&previous, "the", 0));
        assert!(sentence.add_reused(&previous, "the", 2));
        assert_eq!(sentence.words(), words(&["the", "the"]));
    }

    #[test]
    fn test_same_index_twice_is_rejected() {
        let previous = words(&["the", "old", "the"]);
        let mut sentence = BuiltSentence::new();

        assert!(sentence.add_reused(&previous, "the", 0));
        assert!(!sentence.add_reused(&previous, "the", 0));
        assert_eq!(sentence.len(), 1);
    }

    #[test]
    fn test_later_occurrence_first_blocks_earlier_slot() {
        // Counting is positional: clicking the second "the" first consumes
        // one copy, which covers the first slot's single occurrence.
        let previous = words(&["the", "old", "the"]);
        let mut sentence = BuiltSentence::new();

        assert!(sentence.add_reused(&previous, "the", 2));
        assert!(!sentence.add_reused(&previous, "the", 0));
        assert!(sentence.add_reused(&previous, "the", 2));
    }

    #[test]
    fn test_typed_copy_counts_toward_usage() {
        let previous = words(&["dog", "runs"]);
        let mut sentence = BuiltSentence::new();

        sentence.add_typed("dog");
        assert!(sentence.is_slot_used(&previous, 0));
        assert!(!sentence.add_reused(&previous, "dog", 0));
    }

    #[test]
    fn test_reused_rejects_bad_index_or_mismatched_word() {
        let previous = words(&["dog", "runs"]);
        let mut sentence = BuiltSentence::new();

        assert!(!sentence.add_reused(&previous, "dog", 5));
        assert!(!sentence.add_reused(&previous, "cat", 0));
        assert!(sentence.is_empty());
    }

    #[test]
    fn test_typed_splits_on_whitespace() {
        let mut sentence = BuiltSentence::new();

        assert_eq!(sentence.add_typed("  in   the "), 2);
        assert_eq!(sentence.words(), words(&["in", "the"]));
        assert!(sentence.tokens().iter().all(Token::is_typed));
    }

    #[test]
    fn test_typed_blank_is_noop() {
        let mut sentence = BuiltSentence::new();
        assert_eq!(sentence.add_typed("   "), 0);
        assert_eq!(sentence.add_typed(""), 0);
        assert!(sentence.is_empty());
    }

    #[test]
    fn test_remove_typed_only_policy() {
        let previous = words(&["dog"]);
        let mut sentence = BuiltSentence::new();
        sentence.add_reused(&previous, "dog", 0);
        sentence.add_typed("quickly");

        assert!(!sentence.remove(0, RemovalPolicy::TypedOnly));
        assert!(sentence.remove(1, RemovalPolicy::TypedOnly));
        assert_eq!(sentence.words(), words(&["dog"]));
    }

    #[test]
    fn test_remove_any_frees_reused_slot() {
        let previous = words(&["dog"]);
        let mut sentence = BuiltSentence::new();
        sentence.add_reused(&previous, "dog", 0);
        assert!(sentence.is_slot_used(&previous, 0));

        assert!(sentence.remove(0, RemovalPolicy::Any));
        assert!(!sentence.is_slot_used(&previous, 0));
        assert!(sentence.add_reused(&previous, "dog", 0));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut sentence = BuiltSentence::new();
        assert!(!sentence.remove(0, RemovalPolicy::Any));
    }

    #[test]
    fn test_clear_releases_all_slots() {
        let previous = words(&["a", "dog"]);
        let mut sentence = BuiltSentence::new();
        sentence.add_reused(&previous, "a", 0);
        sentence.add_reused(&previous, "dog", 1);

        sentence.clear();

        assert!(sentence.is_empty());
        assert!(!sentence.is_slot_used(&previous, 0));
        assert!(!sentence.is_slot_used(&previous, 1));
    }

    #[test]
    fn test_removal_policy_parse() {
        assert_eq!(RemovalPolicy::parse("typed-only"), Some(RemovalPolicy::TypedOnly));
        assert_eq!(RemovalPolicy::parse("any"), Some(RemovalPolicy::Any));
        assert_eq!(RemovalPolicy::parse("Any"), None);
        assert_eq!(RemovalPolicy::TypedOnly.as_str(), "typed-only");
    }
}
