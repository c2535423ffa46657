use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use drive_sdk::{DeleteError, StoreFailure, UploadError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Delete(#[from] DeleteError),

    #[error(transparent)]
    Store(#[from] StoreFailure),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Multipart(e) => e.status(),
            Self::Upload(UploadError::FileTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upload(UploadError::Store(_)) | Self::Delete(_) | Self::Store(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let too_large = ServerError::from(UploadError::FileTooLarge {
            size: 11,
            limit: 10,
        });
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let blob = ServerError::from(UploadError::Store(StoreFailure::blob("denied")));
        assert_eq!(blob.status(), StatusCode::BAD_GATEWAY);

        let delete = ServerError::from(DeleteError::Store(StoreFailure::catalog("down")));
        assert_eq!(delete.status(), StatusCode::BAD_GATEWAY);

        assert_eq!(ServerError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_messages_pass_through() {
        let err = ServerError::from(DeleteError::Store(StoreFailure::blob("blob not found: k")));
        assert_eq!(err.to_string(), "blob store error: blob not found: k");
    }
}
