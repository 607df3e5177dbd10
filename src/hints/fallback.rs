//! Fallback hint provider.
//!
//! Tries a primary provider and falls back to a secondary one when the
//! primary fails or returns nothing useful.

use tracing::warn;

use crate::error::Result;
use crate::hints::traits::{HintContext, HintProvider};

/// A provider wrapper that falls back on primary failure.
pub struct FallbackHints {
    primary: Box<dyn HintProvider>,
    fallback: Box<dyn HintProvider>,
}

impl FallbackHints {
    /// Create a new fallback wrapper.
    pub fn new(primary: Box<dyn HintProvider>, fallback: Box<dyn HintProvider>) -> Self {
        Self { primary, fallback }
    }

    /// Primary provider name.
    pub fn primary_name(&self) -> &'static str {
        self.primary.name()
    }

    /// Fallback provider name.
    pub fn fallback_name(&self) -> &'static str {
        self.fallback.name()
    }
}

impl HintProvider for FallbackHints {
    fn hint(&self, context: &HintContext) -> Result<String> {
        match self.primary.hint(context) {
            Ok(hint) if !hint.trim().is_empty() => return Ok(hint),
            Ok(_) => warn!(
                "Hint provider '{}' returned an empty hint for formula {}, falling back to '{}'",
                self.primary.name(),
                context.formula_number,
                self.fallback.name()
            ),
            Err(e) => warn!(
                "Hint provider '{}' failed for formula {}: {}, falling back to '{}'",
                self.primary.name(),
                context.formula_number,
                e,
                self.fallback.name()
            ),
        }

        self.fallback.hint(context)
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionState;
    use crate::error::WrifeError;
    use crate::hints::StaticHints;
    use crate::lessons::library_formulas;

    struct Fixed(&'static str);

    impl HintProvider for Fixed {
        fn hint(&self, _context: &HintContext) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct Broken;

    impl HintProvider for Broken {
        fn hint(&self, _context: &HintContext) -> Result<String> {
            Err(WrifeError::hint("service unreachable"))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn context() -> HintContext {
        let session = SessionState::new("library", "pupil-1", library_formulas());
        let mut ctx = HintContext::for_session(&session).unwrap();
        ctx.static_hint = Some("What does the library do?".to_string());
        ctx
    }

    #[test]
    fn test_primary_used_when_it_answers() {
        let hints = FallbackHints::new(Box::new(Fixed("Think of an action.")), Box::new(StaticHints));
        assert_eq!(hints.hint(&context()).unwrap(), "Think of an action.");
    }

    #[test]
    fn test_fallback_on_primary_error() {
        let hints = FallbackHints::new(Box::new(Broken), Box::new(StaticHints));
        assert_eq!(hints.hint(&context()).unwrap(), "What does the library do?");
        assert_eq!(hints.primary_name(), "broken");
        assert_eq!(hints.fallback_name(), "static");
    }

    #[test]
    fn test_fallback_on_blank_primary() {
        let hints = FallbackHints::new(Box::new(Fixed("   ")), Box::new(StaticHints));
        assert_eq!(hints.hint(&context()).unwrap(), "What does the library do?");
    }
}
