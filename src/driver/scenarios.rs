use super::{is_quit, truncate, ExampleDriver};
use crate::assistant::{Assistant, AssistantFactory};
use crate::{Error, Result};
use std::io::Write;
use tokio::io::AsyncBufRead;

pub const BASIC_CHAT_MODEL: &str = "llama3.2:3b";

pub const STORY_PROMPTS: [&str; 3] = [
    "a detective solving a mystery in space",
    "a dragon who is afraid of flying",
    "a programmer who discovers their code is alive",
];

pub const CODE_SAMPLES: [&str; 3] = [
    r#"
def bubble_sort(arr):
    n = len(arr)
    for i in range(n):
        for j in range(0, n-i-1):
            if arr[j] > arr[j+1]:
                arr[j], arr[j+1] = arr[j+1], arr[j]
    return arr
"#,
    r#"
def is_prime(n):
    if n < 2:
        return False
    for i in range(2, n):
        if n % i == 0:
            return False
    return True
"#,
    r#"
class Calculator:
    def add(self, a, b):
        return a + b

    def divide(self, a, b):
        return a / b
"#,
];

pub const CONTEXT_TOPICS: [&str; 4] = [
    "Let's talk about Python programming",
    "What are some best practices for writing clean code?",
    "How do these apply to the language we were discussing?",
    "Can you give me an example using that language?",
];

pub const AFTER_CLEAR_QUESTION: &str = "What language were we discussing?";

pub const COMPARED_MODELS: [&str; 3] = ["llama3.2:3b", "llama3.2:1b", "codellama:7b"];

pub const FIBONACCI_QUESTION: &str =
    "Write a simple Python function to calculate fibonacci numbers";

impl<F, I, O> ExampleDriver<F, I, O>
where
    F: AssistantFactory,
    I: AsyncBufRead + Unpin + Send,
    O: Write + Send,
{
    pub async fn basic_chat(&mut self) -> Result<()> {
        self.section("🔵 Basic Chat Example")?;

        let mut assistant = self.factory.create(Some(BASIC_CHAT_MODEL))?;
        if !assistant.setup().await {
            writeln!(self.output, "Failed to setup assistant")?;
            return Ok(());
        }

        let response = assistant.chat("What is machine learning?", true).await?;
        writeln!(self.output, "Response: {}", truncate(&response, 100))?;

        // answered in the context of the first question
        let response = assistant
            .chat("Can you give me a simple example?", true)
            .await?;
        writeln!(self.output, "Follow-up: {}", truncate(&response, 100))?;
        Ok(())
    }

    pub async fn story_generation(&mut self) -> Result<()> {
        self.section("\n🟢 Story Generation Example")?;

        let mut assistant = self.factory.create(None)?;
        if !assistant.setup().await {
            writeln!(self.output, "Failed to setup assistant")?;
            return Ok(());
        }

        for prompt in STORY_PROMPTS {
            writeln!(self.output, "\nPrompt: {prompt}")?;
            writeln!(self.output, "Story:")?;
            let story = assistant.generate_story(prompt).await?;
            writeln!(self.output, "Generated story: {}", truncate(&story, 200))?;
        }
        Ok(())
    }

    pub async fn code_review(&mut self) -> Result<()> {
        self.section("\n🟡 Code Review Example")?;

        let mut assistant = self.factory.create(None)?;
        if !assistant.setup().await {
            writeln!(self.output, "Failed to setup assistant")?;
            return Ok(());
        }

        for (i, code) in CODE_SAMPLES.iter().enumerate() {
            writeln!(self.output, "\nCode Sample {}:", i + 1)?;
            writeln!(self.output, "{}", code.trim())?;
            writeln!(self.output, "\nReview:")?;
            let review = assistant.code_review(code).await?;
            writeln!(self.output, "Review: {}", truncate(&review, 300))?;
        }
        Ok(())
    }

    pub async fn context_management(&mut self) -> Result<()> {
        self.section("\n🟣 Context Management Example")?;

        let mut assistant = self.factory.create(None)?;
        if !assistant.setup().await {
            writeln!(self.output, "Failed to setup assistant")?;
            return Ok(());
        }

        for topic in CONTEXT_TOPICS {
            writeln!(self.output, "\nUser: {topic}")?;
            write!(self.output, "Assistant: ")?;
            let response = assistant.chat(topic, true).await?;
            writeln!(self.output, "{}", truncate(&response, 150))?;
        }

        assistant.clear_history();
        writeln!(self.output, "\n[Context cleared]")?;

        // Only the new question goes out; the reply should not remember the topics above.
        writeln!(self.output, "\nUser: {AFTER_CLEAR_QUESTION}")?;
        write!(self.output, "Assistant: ")?;
        let response = assistant.chat(AFTER_CLEAR_QUESTION, true).await?;
        writeln!(self.output, "{}", truncate(&response, 150))?;
        Ok(())
    }

    pub async fn different_models(&mut self) -> Result<()> {
        self.section("\n🔴 Different Models Example")?;

        for model in COMPARED_MODELS {
            writeln!(self.output, "\nTesting model: {model}")?;
            let mut assistant = self.factory.create(Some(model))?;

            if assistant.setup().await {
                let response = assistant.chat(FIBONACCI_QUESTION, false).await?;
                writeln!(self.output, "Response: {}", truncate(&response, 200))?;
            } else {
                writeln!(self.output, "Model {model} not available")?;
            }
        }
        Ok(())
    }

    /// Mini chat session on the console until `quit`.
    ///
    /// End of input is treated like an interruption.
    pub async fn interactive_session(&mut self) -> Result<()> {
        self.section("\n🔶 Interactive Example")?;
        writeln!(self.output, "Type 'quit' to exit this example")?;

        let mut assistant = self.factory.create(None)?;
        if !assistant.setup().await {
            writeln!(self.output, "Failed to setup assistant")?;
            return Ok(());
        }

        loop {
            let Some(line) = self.prompt("\nYou: ").await? else {
                return Err(Error::Interrupted);
            };
            let user_input = line.trim();

            if is_quit(user_input) {
                break;
            }
            if user_input.is_empty() {
                continue;
            }

            write!(self.output, "AI: ")?;
            self.output.flush()?;

            let output = &mut self.output;
            let mut write_err: Option<std::io::Error> = None;
            let mut echo = |token: &str| {
                if write_err.is_none() {
                    if let Err(e) = output.write_all(token.as_bytes()).and_then(|_| output.flush()) {
                        write_err = Some(e);
                    }
                }
            };
            assistant.chat_streaming(user_input, true, &mut echo).await?;
            if let Some(e) = write_err {
                return Err(e.into());
            }
            writeln!(self.output)?;
        }
        Ok(())
    }
}
