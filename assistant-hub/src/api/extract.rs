use super::error::ApiError;
use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

/// JSON body decoded regardless of the request's `Content-Type`. Any read or
/// decode failure is a plain 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|err| {
            debug!(error = %err, "failed to read request body");
            ApiError::BadRequest("Bad request")
        })?;
        serde_json::from_slice(&body).map(JsonBody).map_err(|err| {
            debug!(error = %err, "malformed JSON body");
            ApiError::BadRequest("Bad request")
        })
    }
}
