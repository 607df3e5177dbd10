//! Formulas: the grammar-pattern steps a sentence grows through.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WrifeError};

/// The grammatical element the learner adds at a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewElement {
    /// Grammatical role, e.g. "Adverb".
    pub label: String,
    /// Example word(s) for the role.
    #[serde(default)]
    pub examples: Vec<String>,
    /// Input placeholder shown in the text box.
    #[serde(default)]
    pub placeholder: String,
}

impl NewElement {
    /// Create a new element descriptor.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            examples: Vec::new(),
            placeholder: String::new(),
        }
    }

    /// Add example words.
    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    /// Set the input placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

/// One step in a sentence's grammatical growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    /// 1-based step number.
    pub formula_number: u32,
    /// Grammatical roles making up the target sentence.
    pub structure_parts: Vec<String>,
    /// Tokens carried over from the previous formula's target.
    #[serde(default)]
    pub previous_words: Vec<String>,
    /// The element to add at this step.
    pub new_element: NewElement,
    /// The canonical correct answer.
    pub target_sentence: Vec<String>,
    /// Statically authored hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Formula {
    /// Create a formula.
    pub fn new<P, W, T>(
        formula_number: u32,
        structure_parts: P,
        previous_words: W,
        new_element: NewElement,
        target_sentence: T,
    ) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            formula_number,
            structure_parts: structure_parts.into_iter().map(Into::into).collect(),
            previous_words: previous_words.into_iter().map(Into::into).collect(),
            new_element,
            target_sentence: target_sentence.into_iter().map(Into::into).collect(),
            hint: None,
        }
    }

    /// Attach a static hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// The structure as displayed, e.g. "Subject + Adverb + Verb".
    pub fn structure_label(&self) -> String {
        self.structure_parts.join(" + ")
    }
}

/// Check whether `extended` keeps every token of `base` in order.
pub fn is_ordered_extension(base: &[String], extended: &[String]) -> bool {
    let mut remaining = extended.iter();
    base.iter().all(|word| remaining.any(|candidate| candidate == word))
}

/// Check a lesson's formulas against the sequencing invariants.
///
/// - at least one formula
/// - numbers start at 1 and increase by 1
/// - the first formula carries no previous words
/// - each later formula's previous words equal the prior target exactly
/// - each target keeps its previous words in order
/// - no target is empty
pub fn check_formula_sequence(formulas: &[Formula]) -> Result<()> {
    if formulas.is_empty() {
        return Err(WrifeError::lesson("lesson has no formulas"));
    }

    let mut prior: Option<&Formula> = None;
    for (index, formula) in formulas.iter().enumerate() {
        let expected = index as u32 + 1;
        if formula.formula_number != expected {
            return Err(WrifeError::lesson(format!(
                "formula at position {} is numbered {} (expected {})",
                index, formula.formula_number, expected
            )));
        }

        if formula.target_sentence.is_empty() {
            return Err(WrifeError::lesson(format!(
                "formula {} has an empty target sentence",
                formula.formula_number
            )));
        }

        match prior {
            None if !formula.previous_words.is_empty() => {
                return Err(WrifeError::lesson(
                    "formula 1 must not carry previous words",
                ));
            }
            Some(prev) if formula.previous_words != prev.target_sentence => {
                return Err(WrifeError::lesson(format!(
                    "formula {} previous words do not match the target of formula {}",
                    formula.formula_number, prev.formula_number
                )));
            }
            _ => {}
        }

        if !is_ordered_extension(&formula.previous_words, &formula.target_sentence) {
            return Err(WrifeError::lesson(format!(
                "formula {} target drops or reorders previous words",
                formula.formula_number
            )));
        }

        prior = Some(formula);
    }

    Ok(())
}
