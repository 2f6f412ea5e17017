use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::constants::MAX_PHOTOS_PER_INSPECTION;

/// Stable handle for a photo; survives removals of other photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoId(Uuid);

impl PhotoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A locally selected image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub name: String,
    pub content_type: String,
    /// Shared so snapshots and upload tasks don't copy the image
    pub data: Arc<[u8]>,
}

impl PhotoFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: Arc::from(data.into()),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub id: PhotoId,
    pub file: PhotoFile,
    /// Empty until the upload completes
    pub remote_url: String,
    pub uploading: bool,
}

impl PhotoEntry {
    fn new(file: PhotoFile) -> Self {
        Self {
            id: PhotoId::new(),
            file,
            remote_url: String::new(),
            uploading: false,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        !self.remote_url.is_empty()
    }
}

/// Turn a selection into new entries, keeping only as many as fit under the photo limit.
///
/// Overflow is dropped silently, first files win.
pub fn accept_photos(files: Vec<PhotoFile>, current_count: usize) -> Vec<PhotoEntry> {
    let room = MAX_PHOTOS_PER_INSPECTION.saturating_sub(current_count);

    files.into_iter().take(room).map(PhotoEntry::new).collect()
}
