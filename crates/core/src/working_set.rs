//! Working Set
//!
//! The ordered collection of video parts staged for one analysis attempt.
//! Order is significant: position N is "Part N+1" of a single demonstration.

use crate::error::{CoreError, CoreResult};
use crate::media::{MediaFile, MediaSummary};
use crate::validation::{MediaValidator, ValidationError};

#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    files: Vec<MediaFile>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }

    pub fn get(&self, index: usize) -> Option<&MediaFile> {
        self.files.get(index)
    }

    /// Aggregate size of all parts in bytes.
    pub fn total_size(&self) -> u64 {
        self.files
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.size()))
    }

    /// Validate and append a batch.
    ///
    /// All-or-nothing: on rejection the working set is left untouched. Returns
    /// the number of parts after the append.
    pub fn add(
        &mut self,
        batch: Vec<MediaFile>,
        validator: &MediaValidator,
    ) -> Result<usize, ValidationError> {
        validator.validate(&batch, &self.files)?;
        self.files.extend(batch);
        Ok(self.files.len())
    }

    /// Remove the part at `index`; later parts shift down one position.
    pub fn remove(&mut self, index: usize) -> CoreResult<MediaFile> {
        if index >= self.files.len() {
            return Err(CoreError::IndexOutOfRange {
                index,
                len: self.files.len(),
            });
        }
        Ok(self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Display labels, "Part 1", "Part 2", ...
    pub fn part_labels(&self) -> Vec<String> {
        (1..=self.files.len()).map(|n| format!("Part {}", n)).collect()
    }

    pub fn summaries(&self) -> Vec<MediaSummary> {
        self.files.iter().map(MediaFile::summary).collect()
    }
}
