use assistant_hub_core::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

/// Request failure, always rendered as a plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Invalid request method")]
    MethodNotAllowed,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a workspace failure; `failure` is the message used for 500s.
    pub fn from_store(err: StoreError, failure: &'static str) -> Self {
        match err {
            StoreError::InvalidName(_) | StoreError::Escape(_) | StoreError::Reserved(_) => {
                warn!(error = %err, "rejected name");
                ApiError::BadRequest("Invalid name")
            }
            StoreError::NotFound(_) => {
                warn!(error = %err, "{failure}");
                ApiError::NotFound("Not found")
            }
            StoreError::AlreadyExists(_) => {
                warn!(error = %err, "{failure}");
                ApiError::Conflict("Already exists")
            }
            StoreError::Io { .. } => {
                error!(error = %err, "{failure}");
                ApiError::Internal(failure)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

pub(crate) trait OrFail<T> {
    fn or_fail(self, failure: &'static str) -> Result<T, ApiError>;
}

impl<T> OrFail<T> for assistant_hub_core::Result<T> {
    fn or_fail(self, failure: &'static str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_store(err, failure))
    }
}
