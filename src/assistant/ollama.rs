use super::history::ConversationHistory;
use super::prompts;
use super::wire::{ChatOptions, ChatRequest, ChatResponse, ModelList, PullRequest, PullResponse, StreamChunk};
use super::{Assistant, TokenSink};
use crate::config::AssistantConfig;
use crate::transport::{decode_ndjson, HttpTransport};
use crate::types::ChatMessage;
use crate::{Error, ErrorContext, Result};
use futures::StreamExt;
use tracing::{debug, info, warn};

/// Assistant backed by a local Ollama server.
///
/// The HTTP client is created and the model availability is checked in
/// [`Assistant::setup`]. Each instance owns its conversation history.
pub struct AiAssistant {
    config: AssistantConfig,
    transport: Option<HttpTransport>,
    history: ConversationHistory,
    last_setup_error: Option<Error>,
}

impl AiAssistant {
    /// Assistant for `model` (or the configured default) using configuration from
    /// the config file and environment.
    pub fn new(model: Option<&str>) -> Result<Self> {
        let config = AssistantConfig::load()?;
        Ok(match model {
            Some(m) => Self::with_config(config.with_model(m)),
            None => Self::with_config(config),
        })
    }

    pub fn with_config(config: AssistantConfig) -> Self {
        let history = ConversationHistory::new(config.max_history);
        Self {
            config,
            transport: None,
            history,
            last_setup_error: None,
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn is_ready(&self) -> bool {
        self.transport.is_some()
    }

    /// Why the last [`Assistant::setup`] call returned `false`, if it did.
    pub fn last_setup_error(&self) -> Option<&Error> {
        self.last_setup_error.as_ref()
    }

    /// Models installed on the server.
    pub async fn list_models(&self) -> Result<ModelList> {
        self.ready_transport()?.get_json("/api/tags").await
    }

    async fn try_setup(&self) -> Result<HttpTransport> {
        let transport = HttpTransport::new(&self.config)?;
        let model = self.config.model.as_str();

        let models: ModelList = transport.get_json("/api/tags").await?;
        debug!(count = models.models.len(), "ollama reported installed models");
        if models.contains(model) {
            return Ok(transport);
        }

        if !self.config.auto_pull {
            return Err(Error::Setup {
                model: model.to_string(),
                reason: format!(
                    "model is not installed on {} (run `ollama pull {model}`)",
                    transport.base_url()
                ),
            });
        }

        info!(model, "pulling model");
        let pulled: PullResponse = transport
            .post_json(
                "/api/pull",
                &PullRequest {
                    model,
                    stream: false,
                },
            )
            .await?;
        if pulled.status != "success" {
            return Err(Error::Setup {
                model: model.to_string(),
                reason: format!("pull finished with status '{}'", pulled.status),
            });
        }
        Ok(transport)
    }

    fn ready_transport(&self) -> Result<&HttpTransport> {
        self.transport.as_ref().ok_or_else(|| {
            Error::configuration_with_context(
                "assistant is not set up",
                ErrorContext::new()
                    .with_details(format!("call setup() before using model {}", self.config.model))
                    .with_source("assistant"),
            )
        })
    }

    fn build_messages(&self, system_prompt: &str, message: &str, use_history: bool) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        if !system_prompt.is_empty() {
            messages.push(ChatMessage::system(system_prompt));
        }
        if use_history {
            messages.extend(self.history.iter().cloned());
        }
        messages.push(ChatMessage::user(message));
        messages
    }

    fn default_options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.config.temperature,
            num_predict: self.config.max_tokens,
        }
    }

    async fn complete(&self, messages: &[ChatMessage], options: ChatOptions) -> Result<String> {
        let transport = self.ready_transport()?;
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
            options: options.into_option(),
        };
        debug!(model = %self.config.model, messages = messages.len(), "chat request");
        let response: ChatResponse = transport.post_json("/api/chat", &request).await?;
        Ok(response.message.content)
    }

    async fn complete_streaming(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
        on_token: TokenSink<'_>,
    ) -> Result<String> {
        let transport = self.ready_transport()?;
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            stream: true,
            options: options.into_option(),
        };
        debug!(model = %self.config.model, messages = messages.len(), "streaming chat request");
        let mut frames = decode_ndjson(transport.post_stream("/api/chat", &request).await?);

        let mut reply = String::new();
        let mut done = false;
        while let Some(frame) = frames.next().await {
            let chunk: StreamChunk = serde_json::from_value(frame?)?;
            if let Some(error) = chunk.error {
                return Err(Error::runtime_with_context(
                    error,
                    ErrorContext::new().with_source("ollama_stream"),
                ));
            }
            if let Some(msg) = chunk.message {
                if !msg.content.is_empty() {
                    on_token(&msg.content);
                    reply.push_str(&msg.content);
                }
            }
            if chunk.done {
                done = true;
                break;
            }
        }
        if !done {
            return Err(Error::runtime_with_context(
                "stream ended before completion",
                ErrorContext::new()
                    .with_details(format!("{} bytes received without a done frame", reply.len()))
                    .with_source("ollama_stream"),
            ));
        }
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl Assistant for AiAssistant {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn setup(&mut self) -> bool {
        match self.try_setup().await {
            Ok(transport) => {
                info!(model = %self.config.model, host = %self.config.base_url(), "assistant ready");
                self.transport = Some(transport);
                self.last_setup_error = None;
                true
            }
            Err(e) => {
                warn!(model = %self.config.model, error = %e, "assistant setup failed");
                self.transport = None;
                self.last_setup_error = Some(e);
                false
            }
        }
    }

    async fn chat(&mut self, message: &str, use_history: bool) -> Result<String> {
        if self.config.stream {
            let mut ignore = |_: &str| {};
            return self.chat_streaming(message, use_history, &mut ignore).await;
        }
        let messages = self.build_messages(&self.config.system_prompt, message, use_history);
        let reply = self.complete(&messages, self.default_options()).await?;
        if use_history {
            self.history.push_exchange(message, reply.as_str());
        }
        Ok(reply)
    }

    async fn chat_streaming(
        &mut self,
        message: &str,
        use_history: bool,
        on_token: TokenSink<'_>,
    ) -> Result<String> {
        let messages = self.build_messages(&self.config.system_prompt, message, use_history);
        let reply = self
            .complete_streaming(&messages, self.default_options(), on_token)
            .await?;
        if use_history {
            self.history.push_exchange(message, reply.as_str());
        }
        Ok(reply)
    }

    async fn generate_story(&mut self, prompt: &str) -> Result<String> {
        let messages = self.build_messages(
            prompts::STORYTELLER_SYSTEM_PROMPT,
            &prompts::story(prompt),
            false,
        );
        let mut options = self.default_options();
        options.temperature = Some(
            options
                .temperature
                .map_or(prompts::STORY_MIN_TEMPERATURE, |t| t.max(prompts::STORY_MIN_TEMPERATURE)),
        );
        self.complete(&messages, options).await
    }

    async fn code_review(&mut self, code: &str) -> Result<String> {
        let messages = self.build_messages(
            prompts::REVIEWER_SYSTEM_PROMPT,
            &prompts::code_review(code),
            false,
        );
        let mut options = self.default_options();
        options.temperature = Some(
            options
                .temperature
                .map_or(prompts::REVIEW_MAX_TEMPERATURE, |t| t.min(prompts::REVIEW_MAX_TEMPERATURE)),
        );
        self.complete(&messages, options).await
    }

    fn clear_history(&mut self) {
        debug!(turns = self.history.len(), "clearing conversation history");
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_without_history_contain_only_system_and_user() {
        let mut assistant = AiAssistant::with_config(AssistantConfig::default());
        assistant.history.push_exchange("earlier question", "earlier answer");

        let messages = assistant.build_messages("sys", "now", false);
        assert_eq!(messages, vec![ChatMessage::system("sys"), ChatMessage::user("now")]);

        let messages = assistant.build_messages("sys", "now", true);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], ChatMessage::user("earlier question"));
    }

    #[test]
    fn empty_system_prompt_is_omitted() {
        let assistant = AiAssistant::with_config(AssistantConfig::default());
        let messages = assistant.build_messages("", "hello", true);
        assert_eq!(messages, vec![ChatMessage::user("hello")]);
    }

    #[tokio::test]
    async fn chat_before_setup_is_a_configuration_error() {
        let mut assistant = AiAssistant::with_config(AssistantConfig::default());
        let err = assistant.chat("hello", true).await.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(assistant.history().is_empty());
    }
}
