//! Completion gateway: the remote language-model capability behind prompt
//! regeneration.
//!
//! The [`CompletionGateway`] trait takes an ordered list of role/text turns
//! and a model identifier and returns generated text. The call is
//! all-or-nothing: no retry, no backoff, no enforced timeout.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::{AssistantContent, CompletionError, CompletionModelDyn, Message};
use rig::providers::openai::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Role of a turn sent to the completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
}

/// A single turn in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build completion client: {0}")]
    Client(String),
    #[error("completion call failed: {0}")]
    Completion(#[from] CompletionError),
    #[error("turn list contains no user turn")]
    NoUserTurn,
    #[error("completion response contained no text")]
    EmptyResponse,
}

/// An opaque remote completion capability: given role/text turns and a model
/// identifier, produce generated text or fail.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, turns: &[Turn], model: &str) -> Result<String, GatewayError>;
}

/// Gateway backed by an OpenAI-compatible completions endpoint.
pub struct OpenAiGateway {
    api_key: String,
    base_url: String,
}

impl OpenAiGateway {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    /// Sends the turns as a single completion request.
    ///
    /// System turns are folded, in order, into the request preamble; the user
    /// turn becomes the request message.
    async fn complete(&self, turns: &[Turn], model: &str) -> Result<String, GatewayError> {
        let client = Client::builder(&self.api_key)
            .base_url(&self.base_url)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        let model = client.completion_model(model).completions_api();

        let user = turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::User)
            .ok_or(GatewayError::NoUserTurn)?;
        let preamble: Vec<&str> = turns
            .iter()
            .filter(|t| t.role == TurnRole::System)
            .map(|t| t.text.as_str())
            .collect();

        let mut request = model.completion_request(Message::from(user.text.as_str()));
        if !preamble.is_empty() {
            request = request.preamble(preamble.join("\n\n"));
        }

        let response = request.send().await?;

        match response.choice.first() {
            AssistantContent::Text(t) => Ok(t.text.clone()),
            _ => Err(GatewayError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let system = Turn::system("You generate KQL.");
        assert_eq!(TurnRole::System, system.role);
        assert_eq!("You generate KQL.", system.text);

        let user = Turn::user("failed logins last week");
        assert_eq!(TurnRole::User, user.role);
    }

    #[test]
    fn test_turn_role_serializes_lowercase() {
        assert_eq!(
            r#"{"role":"system","text":"x"}"#,
            serde_json::to_string(&Turn::system("x")).unwrap()
        );
        assert_eq!(
            r#"{"role":"user","text":"y"}"#,
            serde_json::to_string(&Turn::user("y")).unwrap()
        );
    }
}
