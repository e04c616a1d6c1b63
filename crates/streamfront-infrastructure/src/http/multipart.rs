//! Multipart parts for the upload endpoints.

use reqwest::multipart::Part;
use serde::Serialize;
use streamfront_core::api::{ApiError, MediaFile};

use crate::media::content_type;

/// File part carrying the guessed content type.
pub(crate) fn file_part(file: &MediaFile) -> Result<Part, ApiError> {
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&content_type(&file.file_name))
        .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", file.file_name, e)))
}

/// JSON part, sent as `application/json` so the server binds it as an object.
pub(crate) fn json_part<T: Serialize>(value: &T) -> Result<Part, ApiError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    Part::bytes(json)
        .file_name("data.json")
        .mime_str("application/json")
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))
}
