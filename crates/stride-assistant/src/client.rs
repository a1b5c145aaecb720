//! Chat completion clients.
//!
//! [`OpenAiChatClient`] talks to any OpenAI-compatible
//! `POST {base_url}/chat/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use stride_core::types::ChatTurn;
use tracing::debug;

use crate::error::AssistantError;

/// A backend that turns a system prompt plus transcript into one reply.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        turns: &[ChatTurn],
    ) -> Result<String, AssistantError>;
}

/// Client for the OpenAI Chat Completions REST API.
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
}

impl OpenAiChatClient {
    /// Build a client. Fails only if the HTTP client cannot be constructed.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            temperature: 0.4,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(
        &'a self,
        system_prompt: &'a str,
        turns: &'a [ChatTurn],
    ) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(RequestMessage {
            role: "system",
            content: system_prompt,
        });
        messages.extend(turns.iter().map(|t| RequestMessage {
            role: t.role.as_str(),
            content: &t.content,
        }));

        ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        turns: &[ChatTurn],
    ) -> Result<String, AssistantError> {
        let body = self.build_request(system_prompt, turns);
        debug!(model = %self.model, turns = turns.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Request(format!("invalid response body: {e}")))?;

        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, AssistantError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(AssistantError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: &str) -> AssistantError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    AssistantError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiChatClient {
        OpenAiChatClient::new(
            "sk-test",
            "gpt-test",
            &format!("{}/v1", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client =
            OpenAiChatClient::new("k", "m", "https://api.example.com/v1/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/v1/chat/completions");
        assert_eq!(client.model(), "m");
    }

    #[test]
    fn test_request_body_puts_system_prompt_first() {
        let client =
            OpenAiChatClient::new("k", "gpt-test", "http://localhost", Duration::from_secs(1))
                .unwrap()
                .with_temperature(0.0);
        let turns = vec![
            ChatTurn::user("running shoes?"),
            ChatTurn::assistant("Pegasus 41."),
            ChatTurn::user("cheaper?"),
        ];
        let body = serde_json::to_value(client.build_request("be helpful", &turns)).unwrap();

        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "be helpful"}));
        assert_eq!(body["messages"][2]["role"], "assistant");
        assert_eq!(body["messages"][3]["content"], "cheaper?");
    }

    #[test]
    fn test_map_http_error_prefers_api_message() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        );
        match err {
            AssistantError::Http { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.to_string(), "chat API returned 502: upstream down");
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "  Try the Vomero 18. "}}]
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .complete("system", &[ChatTurn::user("plush shoes")])
            .await
            .unwrap();
        assert_eq!(reply, "Try the Vomero 18.");
    }

    #[tokio::test]
    async fn test_complete_maps_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete("system", &[ChatTurn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Http { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete("system", &[ChatTurn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_complete_connection_refused() {
        let client =
            OpenAiChatClient::new("k", "m", "http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client
            .complete("system", &[ChatTurn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Request(_)));
    }
}
