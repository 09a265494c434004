//! Error types for the HTTP server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docxgen_convert::ConvertError;
use docxgen_storage::StorageError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Request body failed validation.
    #[error("{0}")]
    InvalidInput(String),

    /// DOCX serialization failed.
    #[error("Serialization failed: {0}")]
    Convert(#[from] ConvertError),

    /// Upload to blob storage failed.
    #[error("Upload failed: {0}")]
    Storage(#[from] StorageError),
}

impl ServerError {
    /// Attach the environment's error detail policy for rendering.
    pub(crate) fn respond(self, expose_details: bool) -> ErrorResponse {
        ErrorResponse {
            error: self,
            expose_details,
        }
    }
}

/// Error rendered as a JSON response.
#[derive(Debug)]
pub(crate) struct ErrorResponse {
    error: ServerError,
    /// Include the debug representation under `details` (development only).
    expose_details: bool,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let (status, body) = match &self.error {
            ServerError::InvalidInput(message) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid input", "message": message}),
            ),
            ServerError::Convert(_) | ServerError::Storage(_) => {
                tracing::error!(error = %self.error, "Error converting text to DOCX");
                let mut body = json!({
                    "error": "Conversion failed",
                    "message": self.error.to_string(),
                });
                if self.expose_details {
                    body["details"] = json!(format!("{:?}", self.error));
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let response = ServerError::InvalidInput("missing".to_owned())
            .respond(true)
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid input");
        assert_eq!(json["message"], "missing");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_storage_error_hides_details_in_production() {
        let response = ServerError::from(StorageError::S3("denied".to_owned()))
            .respond(false)
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Conversion failed");
        assert_eq!(json["message"], "Upload failed: S3 error: denied");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_storage_error_shows_details_in_development() {
        let response = ServerError::from(StorageError::S3("denied".to_owned()))
            .respond(true)
            .into_response();

        let json = body_json(response).await;
        let details = json["details"].as_str().unwrap();
        assert!(details.contains("S3"));
    }
}
