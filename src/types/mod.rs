//! 类型模块：对话消息与角色。
//!
//! # Types Module
//!
//! Core conversation types used by the assistant history and the Ollama wire format.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ChatMessage`] | One conversation turn with role and text content |
//! | [`MessageRole`] | Message role (system, user, assistant) |
//!
//! ## Example
//!
//! ```rust
//! use ollama_assistant::types::{ChatMessage, MessageRole};
//!
//! let system = ChatMessage::system("You are a helpful assistant");
//! let user = ChatMessage::user("What is machine learning?");
//! assert_eq!(user.role, MessageRole::User);
//! # let _ = system;
//! ```

pub mod message;

pub use message::{ChatMessage, MessageRole};
