use async_trait::async_trait;

use super::service_account::TokenError;

/// A photo ready to be handed to storage
#[derive(Debug, Clone)]
pub struct NewPhoto {
    /// Stored file name, e.g. `image-1718000000000`
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Destination for uploaded issue photos
///
/// Implementations must return a URL that anyone can open.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn store(&self, photo: NewPhoto) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Storage API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to get file link")]
    MissingLink,
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Request(e.to_string())
    }
}
