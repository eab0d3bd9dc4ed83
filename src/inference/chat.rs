use serde::{Deserialize, Serialize};

use super::InferenceError;
use crate::config::InferenceSettings;

/// Chat-completion collaborator abstraction (allows mocking).
pub trait ChatClient {
    /// Send a system + user message pair and return the assistant content.
    fn complete(&self, system: &str, user: &str) -> Result<String, InferenceError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Pull the first choice's content out of a chat-completion response body.
fn parse_chat_content(body: &str) -> Result<String, InferenceError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::ResponseParsing(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(InferenceError::EmptyResponse)
}

/// Blocking chat-completion client against an OpenAI-style endpoint.
pub struct OpenAiChatClient {
    settings: InferenceSettings,
    client: reqwest::blocking::Client,
}

impl OpenAiChatClient {
    pub fn new(settings: InferenceSettings) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { settings, client }
    }
}

impl ChatClient for OpenAiChatClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, InferenceError> {
        if self.settings.api_key.trim().is_empty() {
            return Err(InferenceError::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        tracing::debug!(model = %self.settings.model, "calling chat completion endpoint");

        let response = self
            .client
            .post(&self.settings.url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| InferenceError::Connection(e.to_string()))?;

        if !status.is_success() {
            let message = match status.as_u16() {
                401 => "인증 실패: API 키를 확인해주세요.".to_string(),
                429 => "요청 한도 초과: 잠시 후 다시 시도해주세요.".to_string(),
                400 => "요청 오류: 요청 데이터를 확인해주세요.".to_string(),
                _ => body.clone(),
            };
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_chat_content(&body)
    }
}

/// Mock chat client for testing — returns a configured content or error.
pub struct MockChatClient {
    outcome: Result<String, String>,
}

impl MockChatClient {
    pub fn new(content: &str) -> Self {
        Self {
            outcome: Ok(content.to_string()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
        }
    }

    /// A mock that behaves like a real client fed the given wire body.
    pub fn from_response_body(body: &str) -> Self {
        match parse_chat_content(body) {
            Ok(content) => Self::new(&content),
            Err(e) => Self {
                outcome: Err(e.to_string()),
            },
        }
    }
}

impl ChatClient for MockChatClient {
    fn complete(&self, _system: &str, _user: &str) -> Result<String, InferenceError> {
        match &self.outcome {
            Ok(content) => Ok(content.clone()),
            Err(reason) => Err(InferenceError::Connection(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_first_choice_content() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "[\"당뇨병\"]"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"total_tokens": 42}
        }"#;
        assert_eq!(parse_chat_content(body).unwrap(), "[\"당뇨병\"]");
    }

    #[test]
    fn parse_missing_choices_is_empty_response() {
        assert!(matches!(
            parse_chat_content(r#"{"usage":{"total_tokens":1}}"#),
            Err(InferenceError::EmptyResponse)
        ));
        assert!(matches!(
            parse_chat_content(r#"{"choices":[]}"#),
            Err(InferenceError::EmptyResponse)
        ));
    }

    #[test]
    fn parse_invalid_json_is_response_parsing_error() {
        assert!(matches!(
            parse_chat_content("not json"),
            Err(InferenceError::ResponseParsing(_))
        ));
    }

    #[test]
    fn blank_api_key_short_circuits() {
        let mut settings = InferenceSettings::for_tests();
        settings.api_key = "  ".into();
        let client = OpenAiChatClient::new(settings);
        assert!(matches!(
            client.complete("system", "user"),
            Err(InferenceError::MissingApiKey)
        ));
    }

    #[test]
    fn mock_client_round_trips_content() {
        let client = MockChatClient::new("[]");
        assert_eq!(client.complete("s", "u").unwrap(), "[]");
    }

    #[test]
    fn failing_mock_errors() {
        let client = MockChatClient::failing("down");
        assert!(client.complete("s", "u").is_err());
    }
}
