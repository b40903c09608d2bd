//! HTTP-level tests for the chat-completions client against a mock server.

use dayboard_core::prompt::{ChatRequest, LlmClient, OpenAiClient, PromptGenerator, PromptRequest};
use dayboard_core::storage::PromptConfig;
use dayboard_core::{PromptError, ValidationError};
use mockito::{Matcher, Server};

fn config_for(server: &Server) -> PromptConfig {
    PromptConfig {
        base_url: server.url(),
        ..PromptConfig::default()
    }
}

#[tokio::test]
async fn success_returns_trimmed_first_choice() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "gpt-4o-mini",
            "max_tokens": 300,
            "messages": [
                { "role": "system" },
                { "role": "user", "content": "Subject: a fox in snow\nStyle: anime" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  fox, snow, anime style \n"}}]}"#)
        .create_async()
        .await;

    let generator = PromptGenerator::from_config(config_for(&server)).unwrap();
    let request = PromptRequest::new("a fox in snow").style("anime");
    let text = generator.generate(&request, "sk-test").await.unwrap();

    assert_eq!(text, "fox, snow, anime style");
    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_maps_to_authentication() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .create_async()
        .await;

    let generator = PromptGenerator::from_config(config_for(&server)).unwrap();
    let err = generator
        .generate(&PromptRequest::new("a fox"), "sk-bad")
        .await
        .unwrap_err();
    assert_eq!(err, PromptError::Authentication);
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limit() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .create_async()
        .await;

    let generator = PromptGenerator::from_config(config_for(&server)).unwrap();
    let err = generator
        .generate(&PromptRequest::new("a fox"), "sk-test")
        .await
        .unwrap_err();
    assert_eq!(err, PromptError::RateLimit);
}

#[tokio::test]
async fn other_status_wraps_api_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body(r#"{"error":{"message":"upstream exploded"}}"#)
        .create_async()
        .await;

    let client = OpenAiClient::from_config(&config_for(&server)).unwrap();
    let request = ChatRequest {
        model: "m".into(),
        messages: PromptRequest::new("x").messages(),
        temperature: 0.7,
        max_tokens: 10,
    };
    match client.complete("sk-test", &request).await {
        Err(PromptError::Generic(message)) => {
            assert!(message.contains("500"), "{message}");
            assert!(message.contains("upstream exploded"), "{message}");
        }
        other => panic!("expected generic failure, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_generic_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let generator = PromptGenerator::from_config(config_for(&server)).unwrap();
    let err = generator
        .generate(&PromptRequest::new("a fox"), "sk-test")
        .await
        .unwrap_err();
    assert!(matches!(err, PromptError::Generic(_)));
}

#[tokio::test]
async fn validation_failure_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let generator = PromptGenerator::from_config(config_for(&server)).unwrap();
    let err = generator
        .generate(&PromptRequest::new("a fox in snow").style("anime"), "")
        .await
        .unwrap_err();
    assert_eq!(err, PromptError::Validation(ValidationError::MissingApiKey));

    let err = generator
        .generate(&PromptRequest::new("  "), "sk-test")
        .await
        .unwrap_err();
    assert_eq!(err, PromptError::Validation(ValidationError::MissingDescription));
    mock.assert_async().await;
}
