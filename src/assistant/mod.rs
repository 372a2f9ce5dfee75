//! Assistant client interface and its Ollama-backed implementation.
//!
//! The [`Assistant`] trait is the seam the example driver is written against: one
//! model session with its own conversation history. [`AiAssistant`] talks to a local
//! Ollama server; tests substitute scripted implementations.

mod history;
mod ollama;
pub mod prompts;
mod wire;

pub use history::ConversationHistory;
pub use ollama::AiAssistant;
pub use wire::{ModelInfo, ModelList};

use crate::Result;

/// Callback receiving response fragments as they are generated.
pub type TokenSink<'a> = &'a mut (dyn FnMut(&str) + Send);

#[async_trait::async_trait]
pub trait Assistant: Send {
    /// Model this assistant is bound to.
    fn model(&self) -> &str;

    /// Prepare the model session. Returns `false` when the assistant cannot be used.
    async fn setup(&mut self) -> bool;

    /// Send a message and return the full reply.
    ///
    /// With `use_history` the exchange is answered in the context of earlier turns
    /// and recorded; without it the message is answered standalone.
    async fn chat(&mut self, message: &str, use_history: bool) -> Result<String>;

    /// Like [`Assistant::chat`], delivering fragments to `on_token` as they arrive.
    async fn chat_streaming(
        &mut self,
        message: &str,
        use_history: bool,
        on_token: TokenSink<'_>,
    ) -> Result<String> {
        let reply = self.chat(message, use_history).await?;
        on_token(&reply);
        Ok(reply)
    }

    async fn generate_story(&mut self, prompt: &str) -> Result<String>;

    async fn code_review(&mut self, code: &str) -> Result<String>;

    fn clear_history(&mut self);
}

/// Builds a fresh assistant per scenario; `None` selects the default model.
///
/// Errors (an unreadable config file, a malformed environment value) end the run
/// through the driver's failure boundary.
pub trait AssistantFactory: Send {
    type Assistant: Assistant;

    fn create(&self, model: Option<&str>) -> Result<Self::Assistant>;
}

impl<F, A> AssistantFactory for F
where
    F: Fn(Option<&str>) -> Result<A> + Send,
    A: Assistant,
{
    type Assistant = A;

    fn create(&self, model: Option<&str>) -> Result<A> {
        self(model)
    }
}
