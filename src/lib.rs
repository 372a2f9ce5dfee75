//! # ollama-assistant
//!
//! 基于本地 Ollama 的对话助手，以及演示其用法的示例驱动程序。
//!
//! A local assistant (chat with history, story generation, code review) backed by an
//! Ollama server, plus a guided example driver that walks through its features.
//!
//! ## Overview
//!
//! - **Assistant**: [`Assistant`] is the client contract: `setup`, `chat`,
//!   `generate_story`, `code_review`, `clear_history`. [`AiAssistant`] implements it
//!   over the Ollama HTTP API with bounded conversation history and NDJSON streaming.
//! - **Driver**: [`ExampleDriver`] runs fixed scenarios against any
//!   [`AssistantFactory`], printing truncated excerpts, behind one top-level failure
//!   boundary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ollama_assistant::{AiAssistant, Assistant};
//!
//! #[tokio::main]
//! async fn main() -> ollama_assistant::Result<()> {
//!     let mut assistant = AiAssistant::new(Some("llama3.2:3b"))?;
//!     if !assistant.setup().await {
//!         eprintln!("Ollama is not reachable or the model is missing");
//!         return Ok(());
//!     }
//!
//!     let reply = assistant.chat("What is machine learning?", true).await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`assistant`] | Assistant trait, Ollama implementation, history and prompts |
//! | [`config`] | Defaults, YAML file and environment configuration |
//! | [`driver`] | Example scenarios and the run boundary |
//! | [`transport`] | HTTP transport and NDJSON decoding |
//! | [`types`] | Chat message types |

pub mod assistant;
pub mod config;
pub mod driver;
pub mod transport;
pub mod types;

pub use assistant::{AiAssistant, Assistant, AssistantFactory, ConversationHistory};
pub use config::AssistantConfig;
pub use driver::{truncate, ExampleDriver, RunOutcome};
pub use types::{ChatMessage, MessageRole};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
