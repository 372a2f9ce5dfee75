//! Guided tour of the assistant: basic chat, story generation, code review, context
//! management, model comparison and an optional interactive session.
//!
//! Usage:
//!   ai-assistant-examples
//!
//! ENVIRONMENT:
//!   OLLAMA_HOST             Ollama server (default http://localhost:11434)
//!   OLLAMA_MODEL            Default model (default llama3.2:3b)
//!   AI_ASSISTANT_CONFIG     Optional YAML config file
//!   RUST_LOG                Log filter for stderr diagnostics (default warn)

use anyhow::Context;
use ollama_assistant::{AiAssistant, ExampleDriver};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;

    let result = runtime.block_on(async {
        // Configuration is resolved per assistant, so a bad value is reported by the run.
        let mut driver = ExampleDriver::new(
            |model: Option<&str>| AiAssistant::new(model),
            BufReader::new(tokio::io::stdin()),
            std::io::stdout(),
        );
        driver.run(interrupted()).await
    });

    // A pending stdin read cannot be cancelled; do not wait for it on shutdown.
    runtime.shutdown_background();
    result?;
    Ok(())
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
