//! Guided example driver.
//!
//! Runs a fixed sequence of demonstration scenarios against an [`AssistantFactory`]
//! and prints excerpts of the replies. Every scenario builds its own assistant, so
//! nothing leaks from one scenario into the next.
//!
//! ```rust,no_run
//! use ollama_assistant::{AiAssistant, ExampleDriver};
//! use tokio::io::BufReader;
//!
//! # async fn demo() -> ollama_assistant::Result<()> {
//! let mut driver = ExampleDriver::new(
//!     |model: Option<&str>| AiAssistant::new(model),
//!     BufReader::new(tokio::io::stdin()),
//!     std::io::stdout(),
//! );
//! let interrupt = async {
//!     let _ = tokio::signal::ctrl_c().await;
//! };
//! driver.run(interrupt).await?;
//! # Ok(())
//! # }
//! ```

pub mod scenarios;
pub mod text;

pub use text::{truncate, ELLIPSIS};

use crate::assistant::AssistantFactory;
use crate::{Error, Result};
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const TITLE_BANNER: &str = "🤖 AI Assistant Examples";
pub const COMPLETION_BANNER: &str = "✅ Examples completed!";
pub const FAREWELL: &str = "Exiting...";

/// How the scenario sequence ended.
#[derive(Debug)]
pub enum RunOutcome {
    Completed,
    Interrupted,
    Failed(Error),
}

pub struct ExampleDriver<F, I, O> {
    factory: F,
    input: I,
    output: O,
}

impl<F, I, O> ExampleDriver<F, I, O>
where
    F: AssistantFactory,
    I: AsyncBufRead + Unpin + Send,
    O: Write + Send,
{
    pub fn new(factory: F, input: I, output: O) -> Self {
        Self {
            factory,
            input,
            output,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Run every scenario behind a single failure boundary.
    ///
    /// `interrupt` resolving ends the run early. Interruptions and faults only pick the
    /// message printed; the completion banner is printed exactly once in every case.
    pub async fn run<S>(&mut self, interrupt: S) -> Result<RunOutcome>
    where
        S: Future<Output = ()>,
    {
        writeln!(self.output, "{TITLE_BANNER}")?;
        writeln!(self.output, "{}", "=".repeat(40))?;

        let outcome = tokio::select! {
            res = self.run_scenarios() => match res {
                Ok(()) => RunOutcome::Completed,
                Err(Error::Interrupted) => RunOutcome::Interrupted,
                Err(e) => RunOutcome::Failed(e),
            },
            _ = interrupt => RunOutcome::Interrupted,
        };

        match &outcome {
            RunOutcome::Completed => {}
            RunOutcome::Interrupted => {
                tracing::info!("example run interrupted");
                writeln!(self.output, "\n\n{FAREWELL}")?;
            }
            RunOutcome::Failed(e) => {
                tracing::error!(error = %e, "example run failed");
                writeln!(self.output, "Error: {e}")?;
            }
        }

        writeln!(self.output, "\n{COMPLETION_BANNER}")?;
        self.output.flush()?;
        Ok(outcome)
    }

    /// The fixed scenario order, then the optional interactive session.
    pub async fn run_scenarios(&mut self) -> Result<()> {
        self.basic_chat().await?;
        self.story_generation().await?;
        self.code_review().await?;
        self.context_management().await?;
        self.different_models().await?;

        let answer = self
            .prompt("\nWould you like to try interactive mode? (y/n): ")
            .await?
            .unwrap_or_default();
        if wants_interactive(&answer) {
            self.interactive_session().await?;
        }
        Ok(())
    }

    /// Print `text` without a newline and read one line. `None` at end of input.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        let n = self.input.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn section(&mut self, title: &str) -> Result<()> {
        writeln!(self.output, "{title}")?;
        writeln!(self.output, "{}", "-".repeat(30))?;
        Ok(())
    }
}

fn wants_interactive(answer: &str) -> bool {
    answer
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}

/// Commands that end the interactive session.
fn is_quit(input: &str) -> bool {
    input.trim().to_lowercase() == "quit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_gate_checks_first_character() {
        assert!(wants_interactive("y"));
        assert!(wants_interactive("Yes please"));
        assert!(!wants_interactive("n"));
        assert!(!wants_interactive(""));
        assert!(!wants_interactive(" y"));
    }

    #[test]
    fn quit_ignores_case_and_whitespace() {
        assert!(is_quit("quit"));
        assert!(is_quit("  QuIt \t"));
        assert!(!is_quit("quit now"));
        assert!(!is_quit(""));
    }
}
