use super::{
    error::{ApiError, OrFail},
    extract::JsonBody,
    AppState, MessageResponse, TitleParams,
};
use assistant_hub_core::assistants::AssistantSummary;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct AssistantRequest {
    title: String,
    role_setting: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RenameAssistantRequest {
    current_title: String,
    new_title: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RoleSettingResponse {
    title: String,
    role_setting: String,
}

pub(super) async fn create_assistant(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AssistantRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    if req.title.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    state
        .workspace
        .create_assistant(&req.title, &req.role_setting)
        .await
        .or_fail("Failed to create assistant")?;
    info!(title = %req.title, "assistant created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Assistant created successfully")),
    ))
}

pub(super) async fn delete_assistant(
    State(state): State<AppState>,
    Query(params): Query<TitleParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let title = params.required()?;
    state
        .workspace
        .delete_assistant(title)
        .await
        .or_fail("Failed to delete assistant directory")?;
    info!(%title, "assistant deleted");
    Ok(Json(MessageResponse::new("Assistant deleted successfully")))
}

pub(super) async fn update_assistant(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AssistantRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.title.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    state
        .workspace
        .update_role_setting(&req.title, &req.role_setting)
        .await
        .or_fail("Failed to update roleSetting file")?;
    Ok(Json(MessageResponse::new("Role setting updated successfully")))
}

pub(super) async fn rename_assistant(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RenameAssistantRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.current_title.is_empty() || req.new_title.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    state
        .workspace
        .rename_assistant(&req.current_title, &req.new_title)
        .await
        .or_fail("Failed to rename assistant directory")?;
    info!(from = %req.current_title, to = %req.new_title, "assistant renamed");
    Ok(Json(MessageResponse::new("Assistant renamed successfully")))
}

pub(super) async fn list_assistants(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssistantSummary>>, ApiError> {
    let assistants = state
        .workspace
        .list_assistants()
        .await
        .or_fail("Failed to read assistants directory")?;
    Ok(Json(assistants))
}

pub(super) async fn get_role_setting(
    State(state): State<AppState>,
    Query(params): Query<TitleParams>,
) -> Result<Json<RoleSettingResponse>, ApiError> {
    let title = params.required()?;
    let role_setting = state
        .workspace
        .role_setting(title)
        .await
        .or_fail("Failed to read roleSetting file")?;
    Ok(Json(RoleSettingResponse {
        title: title.to_string(),
        role_setting,
    }))
}
