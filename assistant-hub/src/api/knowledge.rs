use super::{
    error::{ApiError, OrFail},
    extract::JsonBody,
    AppState, MessageResponse, TitleParams,
};
use assistant_hub_core::knowledge::{FileEntry, FileKind};
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct DirectoryRequest {
    name: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct KnowledgeBaseRequest {
    knowledge_base_name: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RenameDirectoryRequest {
    current_name: String,
    new_name: String,
}

#[derive(Serialize)]
pub(super) struct DirectoriesResponse {
    directories: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FileInfo {
    name: String,
    #[serde(rename = "type")]
    kind: FileKind,
    creation_time: String,
    updated_time: String,
}

impl From<FileEntry> for FileInfo {
    fn from(entry: FileEntry) -> Self {
        let stamp = entry.modified_rfc3339();
        Self {
            name: entry.name,
            kind: entry.kind,
            creation_time: stamp.clone(),
            updated_time: stamp,
        }
    }
}

#[derive(Serialize)]
pub(super) struct FilesResponse {
    files: Vec<FileInfo>,
}

pub(super) async fn upload(
    State(state): State<AppState>,
    Query(params): Query<TitleParams>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let title = params.required()?;
    state
        .workspace
        .ensure_knowledge_base(title)
        .await
        .or_fail("Failed to create KnowledgeBase directory")?;

    while let Some(mut field) = multipart.next_field().await.map_err(|err| {
        warn!(error = %err, "failed to read multipart body");
        ApiError::BadRequest("Failed to get file from request")
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            return Err(ApiError::BadRequest("Failed to get file from request"));
        };
        let mut writer = state
            .workspace
            .create_upload(title, &file_name)
            .await
            .or_fail("Failed to create file")?;
        while let Some(chunk) = field.chunk().await.map_err(|err| {
            warn!(error = %err, file = %file_name, "upload interrupted");
            ApiError::Internal("Failed to save file")
        })? {
            writer
                .write_chunk(&chunk)
                .await
                .or_fail("Failed to save file")?;
        }
        let path = writer.path().display().to_string();
        let written = writer.finish().await.or_fail("Failed to save file")?;
        info!(%title, %path, bytes = written, "file uploaded");
        return Ok(Json(MessageResponse::new("File uploaded successfully")));
    }
    Err(ApiError::BadRequest("Failed to get file from request"))
}

pub(super) async fn create_knowledge_base(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DirectoryRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    if req.name.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    state
        .workspace
        .create_directory(&req.name)
        .await
        .or_fail("Failed to create directory")?;
    info!(name = %req.name, "knowledge base created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Directory created successfully")),
    ))
}

pub(super) async fn list_knowledge_bases(
    State(state): State<AppState>,
) -> Result<Json<DirectoriesResponse>, ApiError> {
    let directories = state
        .workspace
        .list_directories()
        .await
        .or_fail("Failed to read root directory")?;
    Ok(Json(DirectoriesResponse { directories }))
}

pub(super) async fn delete_knowledge_base(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<KnowledgeBaseRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.knowledge_base_name.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    state
        .workspace
        .delete_directory(&req.knowledge_base_name)
        .await
        .or_fail("Failed to delete directory")?;
    info!(name = %req.knowledge_base_name, "knowledge base deleted");
    Ok(Json(MessageResponse::new("Directory deleted successfully")))
}

pub(super) async fn rename_knowledge_base(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RenameDirectoryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.current_name.is_empty() || req.new_name.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    state
        .workspace
        .rename_directory(&req.current_name, &req.new_name)
        .await
        .or_fail("Failed to rename directory")?;
    Ok(Json(MessageResponse::new("Directory renamed successfully")))
}

pub(super) async fn list_files(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<KnowledgeBaseRequest>,
) -> Result<Json<FilesResponse>, ApiError> {
    if req.knowledge_base_name.is_empty() {
        return Err(ApiError::BadRequest("Bad request"));
    }
    let files = state
        .workspace
        .list_files(&req.knowledge_base_name)
        .await
        .or_fail("Failed to read directory")?;
    Ok(Json(FilesResponse {
        files: files.into_iter().map(FileInfo::from).collect(),
    }))
}
