// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Transport layer for the hosted language model that Skyload consults for
//! cargo placement and load analysis.
//!
//! Nothing in here knows about aircraft or containers. Callers hand over a
//! [`CompletionRequest`], get the model's free text back, and use
//! [`reply::parse_reply`] to turn it into a typed schema of their own.

use serde::Serialize;
use thiserror::Error;

pub mod anthropic;
pub mod reply;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use reply::{extract_json_object, parse_reply};

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("No API key configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Model returned no text content")]
    NoText,
    #[error("No JSON object found in model reply")]
    NoJson,
    #[error("Malformed JSON in model reply: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A single system + user prompt exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
        }
    }
}

/// Anything that can answer a [`CompletionRequest`] with free text.
///
/// Implementations block the calling thread. Async callers are expected to
/// move the call onto a blocking pool.
pub trait LlmClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AdvisorError>;
}

/// Canned client returning a fixed reply, for exercising the reply path
/// without the network.
#[derive(Debug, Clone)]
pub struct StaticClient {
    reply: Result<String, String>,
}

impl StaticClient {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(reason.into()),
        }
    }
}

impl LlmClient for StaticClient {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, AdvisorError> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(reason) => {
                log::debug!("StaticClient failing on purpose — reason={}", reason);
                Err(AdvisorError::NoText)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_client_replies() {
        let client = StaticClient::replying("{\"ok\": true}");
        let req = CompletionRequest::new("sys", "user", 16);
        assert_eq!(client.complete(&req).unwrap(), "{\"ok\": true}");
    }

    #[test]
    fn test_static_client_fails() {
        let client = StaticClient::failing("offline");
        let req = CompletionRequest::new("sys", "user", 16);
        assert!(matches!(client.complete(&req), Err(AdvisorError::NoText)));
    }
}
