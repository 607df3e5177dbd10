//! Hints authored with the lesson data.

use crate::core::NewElement;
use crate::error::Result;
use crate::hints::traits::{HintContext, HintProvider};

/// Returns the formula's authored hint, or one built from its new element.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticHints;

impl StaticHints {
    /// Hint text for the context. Never fails.
    pub fn text(context: &HintContext) -> String {
        match context.static_hint.as_deref().map(str::trim) {
            Some(hint) if !hint.is_empty() => hint.to_string(),
            _ => default_hint(&context.new_element),
        }
    }
}

impl HintProvider for StaticHints {
    fn hint(&self, context: &HintContext) -> Result<String> {
        Ok(Self::text(context))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Hint derived from the element the learner has to add.
pub fn default_hint(element: &NewElement) -> String {
    let label = element.label.trim().to_lowercase();
    let article = match label.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    };
    match element.examples.first() {
        Some(example) => format!("Add {} {}, for example \"{}\".", article, label, example),
        None => format!("Add {} {}.", article, label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionState;
    use crate::lessons::library_formulas;

    fn context() -> HintContext {
        let session = SessionState::new("library", "pupil-1", library_formulas());
        HintContext::for_session(&session).unwrap()
    }

    #[test]
    fn test_authored_hint_wins() {
        let mut ctx = context();
        ctx.static_hint = Some("What does the library do?".to_string());
        assert_eq!(StaticHints.hint(&ctx).unwrap(), "What does the library do?");
    }

    #[test]
    fn test_blank_authored_hint_uses_default() {
        let mut ctx = context();
        ctx.static_hint = Some("  ".to_string());
        ctx.new_element = NewElement::new("Verb").with_examples(["opens"]);
        assert_eq!(
            StaticHints.hint(&ctx).unwrap(),
            "Add a verb, for example \"opens\"."
        );
    }

    #[test]
    fn test_default_hint_article() {
        assert_eq!(
            default_hint(&NewElement::new("Adverb").with_examples(["quietly"])),
            "Add an adverb, for example \"quietly\"."
        );
        assert_eq!(
            default_hint(&NewElement::new("Time phrase")),
            "Add a time phrase."
        );
    }
}
