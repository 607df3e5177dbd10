//! Hints from an external command.
//!
//! The command receives the [`HintContext`] as JSON on stdin and prints the
//! hint on stdout. The command line is split on whitespace; there is no
//! shell involved. A command that outlives its timeout is killed.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::DEFAULT_HINT_TIMEOUT_MS;
use crate::error::{Result, WrifeError};
use crate::hints::traits::{HintContext, HintProvider};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs a configured command to generate hints.
#[derive(Debug, Clone)]
pub struct CommandHintProvider {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandHintProvider {
    /// Create a provider from a command line such as `hint-bot --short`.
    pub fn new(command_line: &str) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            args: parts.collect(),
            timeout: Duration::from_millis(DEFAULT_HINT_TIMEOUT_MS),
        }
    }

    /// Set how long the command may run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait for the child until the deadline, killing it on expiry.
    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WrifeError::hint(format!(
                        "hint command '{}' timed out after {}ms",
                        self.program,
                        self.timeout.as_millis()
                    )));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(WrifeError::hint(format!(
                        "hint command '{}' failed: {}",
                        self.program, e
                    )))
                }
            }
        }
    }
}

/// Drain a child pipe on its own thread so a chatty command can't fill it.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl HintProvider for CommandHintProvider {
    fn hint(&self, context: &HintContext) -> Result<String> {
        if self.program.is_empty() {
            return Err(WrifeError::hint("no hint command configured"));
        }

        let payload = serde_json::to_vec(context)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                WrifeError::hint(format!("hint command '{}' not available: {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A command that exits without reading stdin closes the pipe early.
            if let Err(e) = stdin.write_all(&payload) {
                tracing::debug!("hint command closed stdin: {}", e);
            }
        }

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait_with_deadline(&mut child)?;
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(WrifeError::hint(format!(
                "hint command '{}' exited with {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }

        let hint = String::from_utf8_lossy(&stdout).trim().to_string();
        if hint.is_empty() {
            return Err(WrifeError::hint(format!(
                "hint command '{}' printed nothing",
                self.program
            )));
        }

        Ok(hint)
    }

    fn name(&self) -> &'static str {
        "command"
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
    fn test_splits_command_line() {
        let provider = CommandHintProvider::new("  hint-bot --short  --lang en ");
        assert_eq!(provider.program, "hint-bot");
        assert_eq!(provider.args, vec!["--short", "--lang", "en"]);
        assert_eq!(
            provider.timeout,
            Duration::from_millis(DEFAULT_HINT_TIMEOUT_MS)
        );
    }

    #[test]
    fn test_empty_command_is_error() {
        let provider = CommandHintProvider::new("");
        assert!(provider.hint(&context()).is_err());
    }

    #[test]
    fn test_missing_program_is_hint_error() {
        let provider = CommandHintProvider::new("wrife-definitely-not-installed-hint-bot");
        let err = provider.hint(&context()).unwrap_err();
        assert!(err.is_collaborator_failure());
    }

    #[cfg(unix)]
    #[test]
    fn test_context_passed_on_stdin() {
        let provider = CommandHintProvider::new("cat");
        let output = provider.hint(&context()).unwrap();

        let echoed: HintContext = serde_json::from_str(&output).unwrap();
        assert_eq!(echoed, context());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_error() {
        let provider = CommandHintProvider::new("false");
        assert!(provider.hint(&context()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_command_is_error() {
        let provider = CommandHintProvider::new("true");
        let err = provider.hint(&context()).unwrap_err();
        assert!(err.to_string().contains("printed nothing"));
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_command_killed_at_timeout() {
        let provider =
            CommandHintProvider::new("sleep 5").with_timeout(Duration::from_millis(100));

        let started = Instant::now();
        let err = provider.hint(&context()).unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(err.is_collaborator_failure());
        assert!(err.to_string().contains("timed out after 100ms"));
    }
}
