//! Prompt routes, mapped 1:1 onto the repository.
//!
//! - /prompts - create and list
//! - /prompts/:id - fetch one
//! - /prompts/:id/{rate,comment,regenerate} - mutations
//! - /system-prompt - the global regeneration instruction

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use prompter_core::prompt::Prompt;
use prompter_core::repository::RepositoryError;
use prompter_core::store::StoreError;

use crate::AppState;
use crate::models::{
    CommentRequest, CreatePromptRequest, CreatedResponse, RateRequest, RegenerateRequest,
    RegenerateResponse, SuccessResponse, SystemPromptBody,
};

fn store_error(e: StoreError) -> (StatusCode, String) {
    tracing::error!("store failure: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Prompt not found".to_string())
}

/// List all prompts
pub async fn list_prompts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Prompt>>, (StatusCode, String)> {
    let prompts = state.repo.list().map_err(store_error)?;
    Ok(Json(prompts))
}

/// Create a new prompt from submitted text
pub async fn create_prompt(
    State(state): State<AppState>,
    Json(payload): Json<CreatePromptRequest>,
) -> Result<Json<CreatedResponse>, (StatusCode, String)> {
    let id = state.repo.create(&payload.text).map_err(store_error)?;

    tracing::info!("Created prompt {}", id);

    Ok(Json(CreatedResponse { id }))
}

/// Get a prompt by id
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Prompt>, (StatusCode, String)> {
    let prompt = state
        .repo
        .get(&id)
        .map_err(store_error)?
        .ok_or_else(not_found)?;

    Ok(Json(prompt))
}

/// Thumbs-up or thumbs-down a prompt
pub async fn rate_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, String)> {
    if !state.repo.rate(&id, payload.up).map_err(store_error)? {
        return Err(not_found());
    }

    tracing::info!("Rated prompt {} ({})", id, if payload.up { "up" } else { "down" });

    Ok(Json(SuccessResponse { success: true }))
}

/// Attach a comment to a prompt
pub async fn comment_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, String)> {
    if !state.repo.comment(&id, &payload.text).map_err(store_error)? {
        return Err(not_found());
    }

    tracing::info!("Commented on prompt {}", id);

    Ok(Json(SuccessResponse { success: true }))
}

/// Regenerate a prompt's text through the completion gateway
pub async fn regenerate_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegenerateRequest>,
) -> Result<Json<RegenerateResponse>, (StatusCode, String)> {
    match state
        .repo
        .regenerate(&id, payload.system_prompt.as_deref())
        .await
    {
        Ok(text) => {
            tracing::info!("Regenerated prompt {}", id);
            Ok(Json(RegenerateResponse { text }))
        }
        Err(RepositoryError::NotFound(_)) => Err(not_found()),
        Err(RepositoryError::Gateway(e)) => {
            tracing::error!("completion gateway failure: {e}");
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
        Err(RepositoryError::Store(e)) => Err(store_error(e)),
    }
}

/// Get the global system prompt
pub async fn get_system_prompt(
    State(state): State<AppState>,
) -> Result<Json<SystemPromptBody>, (StatusCode, String)> {
    let system_prompt = state.repo.system_prompt().map_err(store_error)?;
    Ok(Json(SystemPromptBody { system_prompt }))
}

/// Replace the global system prompt
pub async fn put_system_prompt(
    State(state): State<AppState>,
    Json(payload): Json<SystemPromptBody>,
) -> Result<Json<SuccessResponse>, (StatusCode, String)> {
    state
        .repo
        .set_system_prompt(&payload.system_prompt)
        .map_err(store_error)?;

    tracing::info!("Replaced global system prompt");

    Ok(Json(SuccessResponse { success: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prompts", get(list_prompts).post(create_prompt))
        .route("/prompts/:id", get(get_prompt))
        .route("/prompts/:id/rate", post(rate_prompt))
        .route("/prompts/:id/comment", post(comment_prompt))
        .route("/prompts/:id/regenerate", post(regenerate_prompt))
        .route(
            "/system-prompt",
            get(get_system_prompt).put(put_system_prompt),
        )
}
