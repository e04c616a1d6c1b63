//! Local media files headed for upload endpoints.

use std::path::Path;

use streamfront_core::api::MediaFile;
use streamfront_core::error::{Result, StreamfrontError};

/// Infers the MIME type from a filename extension using the `mime_guess` library.
pub fn content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

/// Reads a file into a [`MediaFile`] named after its last path component.
pub async fn read_media_file(path: &Path) -> Result<MediaFile> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            StreamfrontError::validation(format!("{} is not a file", path.display()))
        })?;
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(
        "[media] Read {} ({} bytes, {})",
        file_name,
        bytes.len(),
        content_type(&file_name)
    );
    Ok(MediaFile::new(file_name, bytes))
}
