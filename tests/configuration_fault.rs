//! Invalid configuration is reported by the example run, not before it.
//!
//! Kept in its own test binary: it mutates the process environment.

use ollama_assistant::driver::{COMPLETION_BANNER, TITLE_BANNER};
use ollama_assistant::{AiAssistant, Error, ExampleDriver, RunOutcome};

#[tokio::test]
async fn malformed_environment_value_ends_run_with_error_and_banner() {
    std::env::set_var("AI_ASSISTANT_TEMPERATURE", "warm");
    assert!(AiAssistant::new(None).is_err());

    let mut driver = ExampleDriver::new(
        |model: Option<&str>| AiAssistant::new(model),
        &b"n\n"[..],
        Vec::<u8>::new(),
    );
    let outcome = driver.run(std::future::pending::<()>()).await.unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::Failed(Error::Configuration { .. })
    ));
    let out = String::from_utf8(driver.into_output()).unwrap();
    assert!(out.starts_with(TITLE_BANNER));
    assert!(out.contains("Error: Configuration error: cannot parse AI_ASSISTANT_TEMPERATURE"));
    assert_eq!(out.matches(COMPLETION_BANNER).count(), 1);
}
