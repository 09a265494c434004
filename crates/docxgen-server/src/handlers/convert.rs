//! Text-to-DOCX endpoint.
//!
//! Converts the request text, uploads the document and returns its URL as
//! `{ "text": "<url>" }`.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use docxgen_convert::{InputFormat, convert as build_document, to_docx};
use serde::Serialize;
use serde_json::{Value, json};

use crate::document::OutputFile;
use crate::error::{ErrorResponse, ServerError};
use crate::state::AppState;

/// Message returned when `text` is missing or unusable.
const TEXT_REQUIRED: &str = "Text field is required and must be a string";

/// Response for POST /api/text-to-docx.
#[derive(Debug, Serialize)]
struct ConvertResponse {
    /// URL of the uploaded document.
    text: String,
}

/// Validated request body.
#[derive(Debug, PartialEq, Eq)]
struct ConvertRequest<'a> {
    text: &'a str,
    filename: Option<&'a str>,
    format: InputFormat,
}

impl<'a> ConvertRequest<'a> {
    /// Validate a parsed JSON body.
    fn from_json(body: &'a Value) -> Result<Self, ServerError> {
        let text = body
            .get("text")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ServerError::InvalidInput(TEXT_REQUIRED.to_owned()))?;

        let filename = body.get("filename").and_then(Value::as_str);

        let format = match body.get("format") {
            None | Some(Value::Null) => InputFormat::default(),
            Some(Value::String(name)) => name
                .parse()
                .map_err(|e: docxgen_convert::UnknownFormat| ServerError::InvalidInput(e.to_string()))?,
            Some(_) => {
                return Err(ServerError::InvalidInput(
                    "Format must be a string".to_owned(),
                ));
            }
        };

        Ok(Self {
            text,
            filename,
            format,
        })
    }
}

/// Handle POST /api/text-to-docx.
pub(crate) async fn convert(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ErrorResponse> {
    convert_impl(&state, &body)
        .await
        .map(Json)
        .map_err(|e| e.respond(state.expose_error_details))
}

async fn convert_impl(state: &AppState, body: &[u8]) -> Result<ConvertResponse, ServerError> {
    let json: Value = serde_json::from_slice(body)
        .map_err(|_| ServerError::InvalidInput(TEXT_REQUIRED.to_owned()))?;
    let request = ConvertRequest::from_json(&json)?;

    let doc = build_document(request.text, request.format);
    let file = OutputFile::new(request.filename, to_docx(&doc)?);
    let uploaded = file
        .upload(state.store.as_ref(), state.key_prefix.as_deref())
        .await?;

    tracing::info!(
        file_id = %uploaded.id,
        filename = %uploaded.filename,
        format = %request.format,
        size = uploaded.size,
        paragraphs = doc.len(),
        characters = request.text.chars().count(),
        created_at = %uploaded.created_at.to_rfc3339(),
        backend = state.store.backend(),
        "Document created"
    );

    Ok(ConvertResponse { text: uploaded.url })
}

/// Handle OPTIONS /api/text-to-docx (CORS preflight).
pub(crate) async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Reject any other method on the endpoint.
pub(crate) async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "Method not allowed"})),
    )
}
