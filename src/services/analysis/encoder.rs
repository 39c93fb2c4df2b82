//! Payload Encoder
//!
//! Converts staged media files into base64 inline-data parts. Files are
//! encoded concurrently; results keep the working-set order and the first
//! failure aborts the whole batch.

use std::path::Path;

use appfeature_core::{guess_video_media_type, MediaFile, MediaSource};
use appfeature_llm::ContentPart;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use futures_util::future::try_join_all;
use tracing::debug;

use crate::utils::error::{AppError, AppResult};

/// A media file's payload as base64 text plus its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPart {
    pub media_type: String,
    /// Standard base64, no data-URL prefix
    pub data: String,
}

impl EncodedPart {
    /// Decode back to the raw payload.
    pub fn decode(&self) -> AppResult<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| AppError::internal(format!("Invalid base64 payload: {}", e)))
    }

    pub fn into_content_part(self) -> ContentPart {
        ContentPart::inline_data(self.media_type, self.data)
    }
}

/// Read the raw payload of a media file.
pub async fn read_payload(file: &MediaFile) -> AppResult<Bytes> {
    match file.source() {
        MediaSource::Memory(data) => Ok(data.clone()),
        MediaSource::Path(path) => tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| AppError::encode(file.name(), e.to_string())),
    }
}

/// Encode one media file.
pub async fn encode(file: &MediaFile) -> AppResult<EncodedPart> {
    let payload = read_payload(file).await?;
    let payload_len = payload.len();

    let data = tokio::task::spawn_blocking(move || STANDARD.encode(&payload))
        .await
        .map_err(|e| AppError::encode(file.name(), format!("encoding task failed: {}", e)))?;

    debug!(
        file = file.name(),
        payload_bytes = payload_len,
        encoded_bytes = data.len(),
        "encoded media part"
    );

    Ok(EncodedPart {
        media_type: file.media_type().to_string(),
        data,
    })
}

/// Encode all files concurrently, preserving input order.
pub async fn encode_all(files: &[MediaFile]) -> AppResult<Vec<EncodedPart>> {
    try_join_all(files.iter().map(encode)).await
}

/// Build a path-backed media file from disk metadata.
///
/// The display name is the file name; the media type is guessed from the
/// extension.
pub async fn media_from_path(path: impl AsRef<Path>) -> AppResult<MediaFile> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(MediaFile::from_path(
        name,
        guess_video_media_type(path),
        path,
        metadata.len(),
    ))
}
