use super::{error::ApiError, extract::JsonBody, AppState};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct ChatRequest {
    context: String,
}

#[derive(Serialize)]
pub(super) struct ChatResponse {
    response: &'static str,
}

pub(super) async fn chat(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    Ok(Json(ChatResponse {
        response: state.responder.respond(&req.context),
    }))
}
