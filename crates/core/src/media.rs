//! Media Files
//!
//! Opaque handles to user-selected video content. A `MediaFile` carries the
//! metadata the validator needs (name, size, declared media type) and a
//! `MediaSource` the encoder reads lazily when an attempt starts.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Prefix every accepted media type must start with.
pub const VIDEO_MEDIA_PREFIX: &str = "video/";

/// Where the binary payload of a media file lives.
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// Payload already held in memory
    Memory(Bytes),
    /// Payload read from disk when the file is encoded
    Path(PathBuf),
}

/// A user-selected media file.
///
/// Never mutated after construction; the working set owns it until the user
/// removes it or the session is reset.
#[derive(Debug, Clone)]
pub struct MediaFile {
    name: String,
    size: u64,
    media_type: String,
    source: MediaSource,
}

impl MediaFile {
    /// Create a media file backed by in-memory bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            media_type: media_type.into(),
            source: MediaSource::Memory(data),
        }
    }

    /// Create a media file backed by a path on disk.
    ///
    /// `size` is the size reported at selection time; the payload itself is
    /// only read when the file is encoded.
    pub fn from_path(
        name: impl Into<String>,
        media_type: impl Into<String>,
        path: impl Into<PathBuf>,
        size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            media_type: media_type.into(),
            source: MediaSource::Path(path.into()),
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Declared media type, e.g. `video/mp4`
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    /// Whether the declared media type is a video type.
    pub fn is_video(&self) -> bool {
        self.media_type.starts_with(VIDEO_MEDIA_PREFIX)
    }

    /// Serializable metadata for presentation layers.
    pub fn summary(&self) -> MediaSummary {
        MediaSummary {
            name: self.name.clone(),
            size: self.size,
            media_type: self.media_type.clone(),
        }
    }
}

/// Metadata of a media file without its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub name: String,
    pub size: u64,
    pub media_type: String,
}

/// Guess a video media type from a file extension.
///
/// Mirrors what a browser reports as `File.type` for common containers.
/// Unknown extensions map to `application/octet-stream`, which the validator
/// rejects.
pub fn guess_video_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "mov" | "qt" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        _ => "application/octet-stream",
    }
}
