//! Hint generation for formulas.
//!
//! Hints are offered once the learner has failed enough checks on the
//! current formula. An external command can generate them; authored hints
//! bundled with the lesson are the fallback and the default.

pub mod command;
pub mod fallback;
pub mod static_hints;
pub mod traits;

pub use command::CommandHintProvider;
pub use fallback::FallbackHints;
pub use static_hints::{default_hint, StaticHints};
pub use traits::{HintContext, HintProvider};

use std::time::Duration;

use crate::config::HintsConfig;

/// Build the hint provider described by the config.
///
/// With a command configured the command is tried first and static hints
/// catch its failures; otherwise static hints are used directly.
pub fn provider_from_config(config: &HintsConfig) -> Box<dyn HintProvider> {
    match config.command.as_deref().map(str::trim) {
        Some(command) if !command.is_empty() => Box::new(FallbackHints::new(
            Box::new(
                CommandHintProvider::new(command)
                    .with_timeout(Duration::from_millis(config.timeout_ms)),
            ),
            Box::new(StaticHints),
        )),
        _ => Box::new(StaticHints),
    }
}
