//! Error types surfaced to API callers.
//!
//! * [`InputError`]: the request itself is unacceptable (wrong file type, text
//!   out of bounds). Returned as a 4xx rejection and never retried.
//! * [`ExtractError`]: the file was accepted but no text could be read from
//!   it. No partial text is returned.
//!
//! Model failures never appear here; the gateway absorbs them into the
//! offline fallback.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::config::{MAX_TEXT_LENGTH, MIN_TEXT_LENGTH};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Unsupported file type: '{filename}'. Upload a PDF or an image (png, jpg, jpeg, webp, tiff, bmp).")]
    UnsupportedFileType { filename: String },

    #[error("No file uploaded")]
    MissingFile,

    #[error("File is too large (maximum {limit} bytes)")]
    FileTooLarge { limit: usize },

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("Text is too short to analyze (minimum {} characters).", MIN_TEXT_LENGTH)]
    TextTooShort,

    #[error("Text is too long (maximum {} characters).", MAX_TEXT_LENGTH)]
    TextTooLong,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Temporary file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF could not be read: {0}")]
    CorruptPdf(String),

    #[error("Image could not be decoded: {0}")]
    CorruptImage(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("No content extracted from the document")]
    NoContent,
}

/// Anything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Text extraction failed: {0}")]
    Extraction(#[from] ExtractError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Input(InputError::FileTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
