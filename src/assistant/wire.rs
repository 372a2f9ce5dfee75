// Ollama API request/response structures

use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChatOptions>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub(crate) struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

impl ChatOptions {
    pub fn into_option(self) -> Option<Self> {
        (self.temperature.is_some() || self.num_predict.is_some()).then_some(self)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamChunk {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub done: bool,
    /// Errors that happen mid-stream arrive as `{"error": "..."}` lines.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from GET /api/tags: locally installed models.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    /// Model name (e.g., "llama3.2:latest").
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

impl ModelList {
    /// `llama3.2` matches an installed `llama3.2:latest`.
    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| {
            m.name == model || (!model.contains(':') && m.name == format!("{model}:latest"))
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PullRequest<'a> {
    pub model: &'a str,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullResponse {
    #[serde(default)]
    pub status: String,
}
