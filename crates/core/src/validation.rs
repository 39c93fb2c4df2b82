//! Size/Type Validator
//!
//! Checks a candidate batch of media files against per-file and aggregate
//! ceilings before the batch may join the working set. Rules are evaluated in
//! a fixed order and the first failure wins:
//!
//! 1. aggregate size of existing + new files against the total ceiling
//! 2. declared media type of every new file (must start with `video/`)
//! 3. size of every new file against the per-file ceiling

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::MediaFile;

/// Bytes per megabyte as used by the size ceilings.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Default per-file ceiling in MB.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 150;

/// Default aggregate ceiling in MB.
pub const DEFAULT_MAX_TOTAL_SIZE_MB: u64 = 300;

/// Reason a candidate batch was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Existing + new files together exceed the total ceiling
    #[error("Total size exceeds {limit_mb}MB. Please split videos or compress them.")]
    TotalSizeExceeded { total_bytes: u64, limit_mb: u64 },

    /// A new file does not declare a video media type
    #[error("Only video files are supported.")]
    UnsupportedType { name: String, media_type: String },

    /// A new file exceeds the per-file ceiling
    #[error("File \"{name}\" is too large ({size}). Max single file size is {limit_mb}MB.")]
    FileTooLarge {
        name: String,
        size: String,
        size_bytes: u64,
        limit_mb: u64,
    },
}

/// Per-file and aggregate size ceilings, in MB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub max_file_size_mb: u64,
    pub max_total_size_mb: u64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            max_total_size_mb: DEFAULT_MAX_TOTAL_SIZE_MB,
        }
    }
}

impl SizeLimits {
    pub fn new(max_file_size_mb: u64, max_total_size_mb: u64) -> Self {
        Self {
            max_file_size_mb,
            max_total_size_mb,
        }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn max_total_bytes(&self) -> u64 {
        self.max_total_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

/// Validates candidate batches against a set of size ceilings.
#[derive(Debug, Clone, Default)]
pub struct MediaValidator {
    limits: SizeLimits,
}

impl MediaValidator {
    pub fn new(limits: SizeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    /// Validate `new_files` for addition to `existing`.
    ///
    /// Pure check; callers apply the batch only on `Ok`.
    pub fn validate(
        &self,
        new_files: &[MediaFile],
        existing: &[MediaFile],
    ) -> Result<(), ValidationError> {
        let total_bytes = existing
            .iter()
            .chain(new_files.iter())
            .fold(0u64, |acc, f| acc.saturating_add(f.size()));

        if total_bytes > self.limits.max_total_bytes() {
            return Err(ValidationError::TotalSizeExceeded {
                total_bytes,
                limit_mb: self.limits.max_total_size_mb,
            });
        }

        if let Some(file) = new_files.iter().find(|f| !f.is_video()) {
            return Err(ValidationError::UnsupportedType {
                name: file.name().to_string(),
                media_type: file.media_type().to_string(),
            });
        }

        let max_file_bytes = self.limits.max_file_bytes();
        if let Some(file) = new_files.iter().find(|f| f.size() > max_file_bytes) {
            return Err(ValidationError::FileTooLarge {
                name: file.name().to_string(),
                size: format_bytes(file.size()),
                size_bytes: file.size(),
                limit_mb: self.limits.max_file_size_mb,
            });
        }

        Ok(())
    }
}

/// Format a byte count for display, e.g. `0 Bytes`, `1.5 KB`, `200 MB`.
///
/// Base 1024, at most two decimals, trailing zeros dropped.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
