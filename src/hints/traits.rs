//! Hint provider trait and the context handed to providers.

use serde::{Deserialize, Serialize};

use crate::core::{NewElement, SessionState};
use crate::error::Result;

/// What a provider knows about the question being hinted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintContext {
    pub lesson_id: String,
    pub formula_number: u32,
    /// Structure as displayed, e.g. "Subject + Adverb + Verb".
    pub structure: String,
    pub new_element: NewElement,
    pub previous_words: Vec<String>,
    pub target_sentence: Vec<String>,
    /// The sentence as currently built.
    pub built: Vec<String>,
    /// Failed checks on this formula.
    pub attempts: u32,
    /// Authored hint bundled with the formula.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_hint: Option<String>,
}

impl HintContext {
    /// Context for the formula currently presented in `session`.
    ///
    /// Returns `None` once the session is complete.
    pub fn for_session(session: &SessionState) -> Option<Self> {
        let formula = session.current_formula()?;
        Some(Self {
            lesson_id: session.lesson_id.clone(),
            formula_number: formula.formula_number,
            structure: formula.structure_label(),
            new_element: formula.new_element.clone(),
            previous_words: session.previous_words().to_vec(),
            target_sentence: formula.target_sentence.clone(),
            built: session.built().words(),
            attempts: session.attempts(),
            static_hint: formula.hint.clone(),
        })
    }
}

/// Source of hint text.
pub trait HintProvider: Send + Sync {
    /// Produce a hint for the context.
    fn hint(&self, context: &HintContext) -> Result<String>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Blanket implementation for boxed trait objects.
impl HintProvider for Box<dyn HintProvider> {
    fn hint(&self, context: &HintContext) -> Result<String> {
        (**self).hint(context)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
