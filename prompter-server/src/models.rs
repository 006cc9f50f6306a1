//! Request and response bodies for the prompt routes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePromptRequest {
    pub text: String,
}

fn default_up() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    #[serde(default = "default_up")]
    pub up: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RegenerateRequest {
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct RegenerateResponse {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemPromptBody {
    pub system_prompt: String,
}
