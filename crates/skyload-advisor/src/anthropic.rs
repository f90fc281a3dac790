use crate::{AdvisorError, CompletionRequest, LlmClient};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Blocking client for the Anthropic Messages API.
pub struct AnthropicClient {
    config: AnthropicConfig,
    http: reqwest::blocking::Client,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, AdvisorError> {
        if config.api_key.trim().is_empty() {
            return Err(AdvisorError::MissingApiKey);
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }
}

fn body_for<'a>(model: &'a str, request: &'a CompletionRequest) -> MessagesBody<'a> {
    MessagesBody {
        model,
        max_tokens: request.max_tokens,
        system: &request.system,
        messages: vec![Message {
            role: "user",
            content: &request.user,
        }],
    }
}

fn first_text_block(response: MessagesResponse) -> Result<String, AdvisorError> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or(AdvisorError::NoText)
}

impl LlmClient for AnthropicClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AdvisorError> {
        let url = self.endpoint();
        info!(
            "Calling model — model={} max_tokens={} url={}",
            self.config.model, request.max_tokens, url
        );

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body_for(&self.config.model, request))
            .send()?
            .error_for_status()?;

        let parsed: MessagesResponse = response.json()?;
        debug!("Model replied — blocks={}", parsed.content.len());
        first_text_block(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_key() {
        let result = AnthropicClient::new(AnthropicConfig::new("   "));
        assert!(matches!(result, Err(AdvisorError::MissingApiKey)));
    }

    #[test]
    fn test_body_shape() {
        let req = CompletionRequest::new("be terse", "place these", 2048);
        let body = serde_json::to_value(body_for(DEFAULT_MODEL, &req)).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["system"], "be terse");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "place these");
    }

    #[test]
    fn test_first_text_block_skips_other_blocks() {
        let raw = r#"{"content":[{"type":"thinking"},{"type":"text","text":"hello"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_text_block(parsed).unwrap(), "hello");
    }

    #[test]
    fn test_first_text_block_missing() {
        let parsed: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(matches!(first_text_block(parsed), Err(AdvisorError::NoText)));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let mut config = AnthropicConfig::new("key");
        config.base_url = "http://localhost:8080/".to_string();
        let client = AnthropicClient::new(config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/messages");
    }
}
