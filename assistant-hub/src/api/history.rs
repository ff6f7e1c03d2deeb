use super::{
    error::{ApiError, OrFail},
    extract::JsonBody,
    AppState, MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct CreateHistoryRequest {
    assistant_title: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct DeleteHistoryRequest {
    assistant_title: String,
    #[serde(rename = "chatHistoryID")]
    chat_history_id: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct UpdateContextRequest {
    assistant_title: String,
    context: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct FetchHistoryRequest {
    assistant_title: String,
    #[serde(rename = "historyID")]
    history_id: String,
}

#[derive(Serialize)]
pub(super) struct HistoryFilesResponse {
    files: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct CreateHistoryResponse {
    message: &'static str,
    #[serde(rename = "fileID")]
    file_id: String,
}

#[derive(Serialize)]
pub(super) struct ContextResponse {
    context: String,
}

pub(super) async fn list_root_history(
    State(state): State<AppState>,
) -> Result<Json<HistoryFilesResponse>, ApiError> {
    let files = state
        .workspace
        .list_root_history()
        .await
        .or_fail("Failed to read History directory")?;
    Ok(Json(HistoryFilesResponse { files }))
}

pub(super) async fn create_history(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateHistoryRequest>,
) -> Result<(StatusCode, Json<CreateHistoryResponse>), ApiError> {
    if req.assistant_title.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    let file_id = state
        .workspace
        .create_history(&req.assistant_title)
        .await
        .or_fail("Failed to create history file")?;
    info!(assistant = %req.assistant_title, id = %file_id, "history created");
    Ok((
        StatusCode::CREATED,
        Json(CreateHistoryResponse {
            message: "History file created successfully",
            file_id,
        }),
    ))
}

pub(super) async fn delete_history(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteHistoryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.assistant_title.is_empty() || req.chat_history_id.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    state
        .workspace
        .delete_history(&req.assistant_title, &req.chat_history_id)
        .await
        .or_fail("Failed to delete history file")?;
    info!(assistant = %req.assistant_title, id = %req.chat_history_id, "history deleted");
    Ok(Json(MessageResponse::new("History file deleted successfully")))
}

pub(super) async fn update_chat_context(
    State(state): State<AppState>,
    Path(tail): Path<String>,
    JsonBody(req): JsonBody<UpdateContextRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = last_segment(&tail);
    if req.assistant_title.is_empty() || req.context.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    state
        .workspace
        .update_history(&req.assistant_title, id, &req.context)
        .await
        .or_fail("Failed to update chat context")?;
    Ok(Json(MessageResponse::new("Chat context updated successfully")))
}

/// Final non-empty segment of a wildcard path tail.
fn last_segment(tail: &str) -> &str {
    tail.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

pub(super) async fn fetch_history(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<FetchHistoryRequest>,
) -> Result<Json<ContextResponse>, ApiError> {
    if req.assistant_title.is_empty() || req.history_id.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    let context = state
        .workspace
        .read_history(&req.assistant_title, &req.history_id)
        .await
        .or_fail("Failed to read history file")?;
    Ok(Json(ContextResponse { context }))
}
