//! Practice command for WriFe.
//!
//! Drives a sentence-evolution session from line commands:
//!
//! ```text
//! click N      reuse the previous word at index N
//! type WORDS   add typed words
//! remove N     remove the token at position N
//! clear        empty the sentence
//! check        check the sentence
//! hint         show a hint (after a failed check)
//! next         move on after a correct sentence
//! show         print the current view
//! quit         stop the session
//! ```

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::core::{AdvanceOutcome, CheckOutcome, Token};
use crate::error::{Result, WrifeError};
use crate::runner::PracticeRunner;
use crate::stats::SessionSummary;

/// Options for the practice command.
#[derive(Debug, Clone, Default)]
pub struct PracticeOptions {
    /// Output one JSON view per line.
    pub json: bool,
    /// Only print the final summary.
    pub quiet: bool,
}

/// One learner command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeInput {
    Click(usize),
    Type(String),
    Remove(usize),
    Clear,
    Check,
    Hint,
    Next,
    Show,
    Quit,
}

impl PracticeInput {
    /// Parse a command line.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let index = |what: &str| -> Result<usize> {
            rest.parse::<usize>().map_err(|_| {
                WrifeError::invalid_input(format!("'{}' needs a {} number", verb, what))
            })
        };

        match verb.to_lowercase().as_str() {
            "click" | "c" => Ok(Self::Click(index("word")?)),
            "type" | "t" => {
                if rest.is_empty() {
                    Err(WrifeError::invalid_input("'type' needs some words"))
                } else {
                    Ok(Self::Type(rest.to_string()))
                }
            }
            "remove" | "rm" => Ok(Self::Remove(index("position")?)),
            "clear" => Ok(Self::Clear),
            "check" => Ok(Self::Check),
            "hint" => Ok(Self::Hint),
            "next" | "n" => Ok(Self::Next),
            "show" => Ok(Self::Show),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "" => Err(WrifeError::invalid_input("empty command")),
            other => Err(WrifeError::invalid_input(format!(
                "unknown command '{}'",
                other
            ))),
        }
    }
}

/// A previous word offered for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSlot {
    pub index: usize,
    pub word: String,
    pub used: bool,
}

/// What the learner sees after each command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeView {
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_number: Option<u32>,
    pub formulas_total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_element: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    /// Prompt for the text box, e.g. "How does it open?".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub placeholder: String,
    pub previous_words: Vec<WordSlot>,
    pub built: Vec<Token>,
    pub attempts: u32,
    pub hint_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

/// Final output of a practice run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeOutput {
    pub success: bool,
    pub completed: bool,
    pub formulas_completed: usize,
    pub formulas_total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PracticeOutput {
    fn finished(runner: &mut PracticeRunner) -> Self {
        let summary = runner.summary();
        Self {
            success: true,
            completed: summary.is_some(),
            formulas_completed: runner.session().formulas_completed(),
            formulas_total: runner.session().formulas_total(),
            summary,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            completed: false,
            formulas_completed: 0,
            formulas_total: 0,
            summary: None,
            error: Some(error.into()),
        }
    }
}

/// The practice command implementation.
pub struct PracticeCommand {
    runner: PracticeRunner,
}

impl PracticeCommand {
    /// Create a practice command around a started runner.
    pub fn new(runner: PracticeRunner) -> Self {
        Self { runner }
    }

    /// Apply one command and return the resulting view.
    pub fn apply(&mut self, input: &PracticeInput) -> PracticeView {
        let mut message = None;
        let mut hint = None;

        match input {
            PracticeInput::Click(index) => {
                if !self.runner.engine().click(*index) {
                    message = Some(format!("Word {} can't be used right now.", index));
                }
            }
            PracticeInput::Type(text) => {
                if self.runner.engine().type_text(text) == 0 {
                    message = Some("Nothing was added.".to_string());
                }
            }
            PracticeInput::Remove(position) => {
                if !self.runner.engine().remove(*position) {
                    message = Some(format!("Token {} can't be removed.", position));
                }
            }
            PracticeInput::Clear => {
                if !self.runner.engine().clear() {
                    message = Some("Nothing to clear right now.".to_string());
                }
            }
            PracticeInput::Check => {
                message = Some(match self.runner.check() {
                    CheckOutcome::Correct { .. } => {
                        "Correct! Type 'next' to continue.".to_string()
                    }
                    CheckOutcome::Incorrect {
                        attempts,
                        hint_available,
                    } => {
                        let mut text = format!("Not quite (attempt {}).", attempts);
                        if hint_available {
                            text.push_str(" Type 'hint' for help.");
                        }
                        text
                    }
                    CheckOutcome::Ignored => "Nothing to check yet.".to_string(),
                });
            }
            PracticeInput::Hint => {
                hint = self.runner.hint();
                if hint.is_none() {
                    message = Some("No hint yet. Try checking your sentence first.".to_string());
                }
            }
            PracticeInput::Next => {
                message = Some(match self.runner.advance() {
                    AdvanceOutcome::NextStep { step_index } => format!(
                        "Formula {} of {}.",
                        step_index + 1,
                        self.runner.session().formulas_total()
                    ),
                    AdvanceOutcome::Complete => "Session complete!".to_string(),
                    AdvanceOutcome::Ignored => "Get this sentence right first.".to_string(),
                });
            }
            PracticeInput::Show | PracticeInput::Quit => {}
        }

        let mut view = self.view();
        view.message = message;
        view.hint = hint;
        view
    }

    /// The current view with no message.
    pub fn view(&mut self) -> PracticeView {
        let summary = self.runner.summary();
        let hint_available = self.runner.engine().hint_available();
        let session = self.runner.session();
        let formula = session.current_formula();

        let previous = session.previous_words();
        let previous_words = previous
            .iter()
            .enumerate()
            .map(|(index, word)| WordSlot {
                index,
                word: word.clone(),
                used: session.built().is_slot_used(previous, index),
            })
            .collect();

        PracticeView {
            phase: session.phase().name().to_string(),
            formula_number: formula.map(|f| f.formula_number),
            formulas_total: session.formulas_total(),
            structure: formula.map(|f| f.structure_label()),
            new_element: formula.map(|f| f.new_element.label.clone()),
            examples: formula
                .map(|f| f.new_element.examples.clone())
                .unwrap_or_default(),
            placeholder: formula
                .map(|f| f.new_element.placeholder.clone())
                .unwrap_or_default(),
            previous_words,
            built: session.built().tokens().to_vec(),
            attempts: session.attempts(),
            hint_available,
            message: None,
            hint: None,
            summary,
        }
    }

    /// Run the session over line commands from `input`.
    ///
    /// Stops at `quit`, end of input, or completion. Malformed commands are
    /// reported and skipped.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
        options: &PracticeOptions,
    ) -> Result<PracticeOutput> {
        let initial = self.view();
        self.emit(out, &initial, options)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match PracticeInput::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    let mut view = self.view();
                    view.message = Some(e.to_string());
                    self.emit(out, &view, options)?;
                    continue;
                }
            };
            if command == PracticeInput::Quit {
                break;
            }

            let view = self.apply(&command);
            self.emit(out, &view, options)?;

            if self.runner.is_complete() {
                break;
            }
        }

        Ok(PracticeOutput::finished(&mut self.runner))
    }

    fn emit<W: Write>(
        &self,
        out: &mut W,
        view: &PracticeView,
        options: &PracticeOptions,
    ) -> Result<()> {
        if options.quiet {
            return Ok(());
        }
        let text = self.format_view(view, options);
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }

    /// Format a view based on options.
    pub fn format_view(&self, view: &PracticeView, options: &PracticeOptions) -> String {
        if options.json {
            return serde_json::to_string(view).unwrap_or_else(|_| "{}".to_string());
        }

        let mut lines = Vec::new();

        if let (Some(number), Some(structure)) = (view.formula_number, &view.structure) {
            lines.push(format!(
                "Formula {} of {}: {}",
                number, view.formulas_total, structure
            ));
        }
        if let Some(element) = &view.new_element {
            let mut line = format!("Add: {}", element);
            if !view.examples.is_empty() {
                line.push_str(&format!(" (e.g. {})", view.examples.join(", ")));
            }
            if !view.placeholder.is_empty() {
                line.push_str(&format!(" - {}", view.placeholder));
            }
            lines.push(line);
        }
        if !view.previous_words.is_empty() {
            let words: Vec<String> = view
                .previous_words
                .iter()
                .map(|slot| {
                    if slot.used {
                        format!("[{}] {}*", slot.index, slot.word)
                    } else {
                        format!("[{}] {}", slot.index, slot.word)
                    }
                })
                .collect();
            lines.push(format!("Words: {}", words.join("  ")));
        }
        if view.summary.is_none() {
            let sentence: Vec<&str> = view.built.iter().map(|t| t.text.as_str()).collect();
            lines.push(format!("Sentence: {}", sentence.join(" ")));
        }

        if let Some(message) = &view.message {
            lines.push(message.clone());
        }
        if let Some(hint) = &view.hint {
            lines.push(format!("Hint: {}", hint));
        }
        if let Some(summary) = &view.summary {
            lines.push(format_summary(summary));
        }

        lines.join("\n")
    }

    /// Format the final output based on options.
    pub fn format_output(&self, output: &PracticeOutput, options: &PracticeOptions) -> String {
        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }
        if !output.success {
            return format!(
                "Practice failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }
        if options.quiet {
            if let Some(summary) = &output.summary {
                return format_summary(summary);
            }
        }
        if output.completed {
            String::new()
        } else {
            format!(
                "Stopped after {} of {} formulas.",
                output.formulas_completed, output.formulas_total
            )
        }
    }
}

fn format_summary(summary: &SessionSummary) -> String {
    let mut lines = vec![
        "=== Session Summary ===".to_string(),
        format!(
            "Formulas completed: {} of {}",
            summary.formulas_completed, summary.formulas_total
        ),
        format!("Checks made: {}", summary.total_attempts),
    ];
    if !summary.top_words.is_empty() {
        let words: Vec<String> = summary
            .top_words
            .iter()
            .map(|w| format!("{} x{}", w.word, w.count))
            .collect();
        lines.push(format!("Words you wrote again and again: {}", words.join(", ")));
    }
    lines.join("\n")
}
