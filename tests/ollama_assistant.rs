//! AiAssistant against a mock Ollama server.

use mockito::{Matcher, Server, ServerGuard};
use ollama_assistant::{AiAssistant, Assistant, AssistantConfig, Error};
use serde_json::json;

const TAGS: &str = r#"{"models":[{"name":"llama3.2:3b","size":2019393189},{"name":"mistral:latest"}]}"#;

fn chat_reply(content: &str) -> String {
    json!({
        "model": "llama3.2:3b",
        "message": {"role": "assistant", "content": content},
        "done": true
    })
    .to_string()
}

async fn mock_tags(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TAGS)
        .create_async()
        .await
}

fn config_for(server: &ServerGuard) -> AssistantConfig {
    AssistantConfig::default()
        .with_host(server.url())
        .with_stream(false)
}

async fn ready_assistant(server: &mut ServerGuard, config: AssistantConfig) -> AiAssistant {
    mock_tags(server).await;
    let mut assistant = AiAssistant::with_config(config);
    assert!(assistant.setup().await, "{:?}", assistant.last_setup_error());
    assistant
}

#[tokio::test]
async fn setup_succeeds_for_installed_model() {
    let mut server = Server::new_async().await;
    let tags = mock_tags(&mut server).await;

    let mut assistant = AiAssistant::with_config(config_for(&server));

    assert!(assistant.setup().await);
    assert!(assistant.is_ready());
    assert!(assistant.last_setup_error().is_none());
    tags.assert_async().await;
}

#[tokio::test]
async fn setup_accepts_untagged_name_for_latest() {
    let mut server = Server::new_async().await;
    mock_tags(&mut server).await;

    let mut assistant = AiAssistant::with_config(config_for(&server).with_model("mistral"));

    assert!(assistant.setup().await);
}

#[tokio::test]
async fn setup_fails_for_missing_model() {
    let mut server = Server::new_async().await;
    mock_tags(&mut server).await;

    let mut assistant = AiAssistant::with_config(config_for(&server).with_model("codellama:7b"));

    assert!(!assistant.setup().await);
    assert!(!assistant.is_ready());
    match assistant.last_setup_error() {
        Some(Error::Setup { model, reason }) => {
            assert_eq!(model, "codellama:7b");
            assert!(reason.contains("ollama pull codellama:7b"));
        }
        other => panic!("unexpected setup error: {other:?}"),
    }
    assert!(assistant.chat("hello", true).await.is_err());
}

#[tokio::test]
async fn setup_fails_when_server_is_unreachable() {
    let config = AssistantConfig::default().with_host("http://127.0.0.1:9");
    let mut assistant = AiAssistant::with_config(config);

    assert!(!assistant.setup().await);
    assert!(matches!(
        assistant.last_setup_error(),
        Some(Error::Transport(_))
    ));
}

#[tokio::test]
async fn setup_pulls_missing_model_when_enabled() {
    let mut server = Server::new_async().await;
    mock_tags(&mut server).await;
    let pull = server
        .mock("POST", "/api/pull")
        .match_body(Matcher::PartialJson(json!({
            "model": "codellama:7b",
            "stream": false
        })))
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .expect(1)
        .create_async()
        .await;

    let config = config_for(&server)
        .with_model("codellama:7b")
        .with_auto_pull(true);
    let mut assistant = AiAssistant::with_config(config);

    assert!(assistant.setup().await);
    pull.assert_async().await;
}

#[tokio::test]
async fn history_is_sent_with_follow_up_questions() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);
    let mut assistant = ready_assistant(&mut server, config).await;
    let chat = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::Regex("What is machine learning".to_string()))
        .with_status(200)
        .with_body(chat_reply("Machine learning is..."))
        .expect(2)
        .create_async()
        .await;

    let first = assistant.chat("What is machine learning?", true).await.unwrap();
    // the follow-up only matches because the first exchange travels with it
    let second = assistant
        .chat("Can you give me a simple example?", true)
        .await
        .unwrap();

    assert_eq!(first, "Machine learning is...");
    assert_eq!(second, "Machine learning is...");
    assert_eq!(assistant.history().len(), 4);
    chat.assert_async().await;
}

#[tokio::test]
async fn chat_without_history_is_not_recorded() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);
    let mut assistant = ready_assistant(&mut server, config).await;
    server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2:3b",
            "stream": false
        })))
        .with_status(200)
        .with_body(chat_reply("def fib(n): ..."))
        .create_async()
        .await;

    let reply = assistant
        .chat("Write a simple Python function to calculate fibonacci numbers", false)
        .await
        .unwrap();

    assert_eq!(reply, "def fib(n): ...");
    assert!(assistant.history().is_empty());
}

#[tokio::test]
async fn cleared_history_is_not_resent() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);
    let mut assistant = ready_assistant(&mut server, config).await;
    let topic = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::Regex("Python programming".to_string()))
        .with_status(200)
        .with_body(chat_reply("Python it is."))
        .expect(1)
        .create_async()
        .await;
    let after_clear = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::Regex("What language were we discussing".to_string()))
        .with_status(200)
        .with_body(chat_reply("We have not discussed a language yet."))
        .expect(1)
        .create_async()
        .await;

    assistant
        .chat("Let's talk about Python programming", true)
        .await
        .unwrap();
    assistant.clear_history();
    assert!(assistant.history().is_empty());
    let reply = assistant
        .chat("What language were we discussing?", true)
        .await
        .unwrap();

    assert_eq!(reply, "We have not discussed a language yet.");
    topic.assert_async().await;
    after_clear.assert_async().await;
}

#[tokio::test]
async fn streaming_chat_delivers_fragments() {
    let mut server = Server::new_async().await;
    let config = config_for(&server).with_stream(true);
    let mut assistant = ready_assistant(&mut server, config).await;
    let body = [
        json!({"message": {"role": "assistant", "content": "Hel"}, "done": false}),
        json!({"message": {"role": "assistant", "content": "lo"}, "done": false}),
        json!({"message": {"role": "assistant", "content": ""}, "done": true, "eval_count": 2}),
    ]
    .iter()
    .map(|v| format!("{v}\n"))
    .collect::<String>();
    server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body(body)
        .create_async()
        .await;

    let mut fragments = Vec::new();
    let mut collect = |t: &str| fragments.push(t.to_string());
    let reply = assistant
        .chat_streaming("hello", true, &mut collect)
        .await
        .unwrap();

    assert_eq!(reply, "Hello");
    assert_eq!(fragments, vec!["Hel", "lo"]);
    assert_eq!(assistant.history().len(), 2);
}

#[tokio::test]
async fn streamed_error_line_fails_the_chat() {
    let mut server = Server::new_async().await;
    let config = config_for(&server).with_stream(true);
    let mut assistant = ready_assistant(&mut server, config).await;
    server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body("{\"message\":{\"role\":\"assistant\",\"content\":\"par\"},\"done\":false}\n{\"error\":\"out of memory\"}\n")
        .create_async()
        .await;

    let err = assistant.chat("hello", true).await.unwrap_err();

    assert!(err.to_string().contains("out of memory"));
    assert!(assistant.history().is_empty());
}

#[tokio::test]
async fn stream_without_done_frame_fails_the_chat() {
    let mut server = Server::new_async().await;
    let config = config_for(&server).with_stream(true);
    let mut assistant = ready_assistant(&mut server, config).await;
    server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body("{\"message\":{\"role\":\"assistant\",\"content\":\"Partial\"},\"done\":false}\n")
        .create_async()
        .await;

    let mut fragments = Vec::new();
    let mut collect = |t: &str| fragments.push(t.to_string());
    let err = assistant
        .chat_streaming("hello", true, &mut collect)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Runtime { .. }));
    assert!(err.to_string().contains("stream ended before completion"));
    assert_eq!(fragments, vec!["Partial"]);
    assert!(assistant.history().is_empty());
}

#[tokio::test]
async fn http_errors_become_remote_errors() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);
    let mut assistant = ready_assistant(&mut server, config).await;
    server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_body(r#"{"error":"model \"llama3.2:3b\" not found, try pulling it first"}"#)
        .create_async()
        .await;

    let err = assistant.chat("hello", true).await.unwrap_err();

    match err {
        Error::Remote {
            status,
            class,
            message,
        } => {
            assert_eq!(status, 404);
            assert_eq!(class, "not_found");
            assert!(message.contains("try pulling it first"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn story_and_review_use_their_templates() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);
    let mut assistant = ready_assistant(&mut server, config).await;
    let story = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("storyteller".to_string()),
            Matcher::Regex("a dragon who is afraid of flying".to_string()),
        ]))
        .with_status(200)
        .with_body(chat_reply("Once upon a time..."))
        .expect(1)
        .create_async()
        .await;
    let review = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("code review".to_string()),
            Matcher::Regex("def is_prime".to_string()),
        ]))
        .with_status(200)
        .with_body(chat_reply("Loop only needs to reach sqrt(n)."))
        .expect(1)
        .create_async()
        .await;

    let text = assistant
        .generate_story("a dragon who is afraid of flying")
        .await
        .unwrap();
    let critique = assistant
        .code_review("def is_prime(n):\n    return n > 1\n")
        .await
        .unwrap();

    assert_eq!(text, "Once upon a time...");
    assert_eq!(critique, "Loop only needs to reach sqrt(n).");
    assert!(assistant.history().is_empty());
    story.assert_async().await;
    review.assert_async().await;
}

#[tokio::test]
async fn list_models_reports_installed_models() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);
    let assistant = ready_assistant(&mut server, config).await;

    let models = assistant.list_models().await.unwrap();

    assert_eq!(models.models.len(), 2);
    assert!(models.contains("llama3.2:3b"));
}
