use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::core::error::Result;
use crate::features::uploads::dtos::UploadResponseDto;
use crate::modules::storage::{NewPhoto, PhotoStorage};

/// Service that hands uploaded photos to storage
pub struct UploadService {
    storage: Arc<dyn PhotoStorage>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn PhotoStorage>) -> Self {
        Self { storage }
    }

    /// Stored name for a photo received now: `image-<epoch millis>`
    fn generate_name() -> String {
        format!("image-{}", Utc::now().timestamp_millis())
    }

    /// Store a photo and return its public URL
    ///
    /// # Arguments
    /// * `data` - The image content as bytes
    /// * `content_type` - The MIME type reported by the client
    pub async fn upload_photo(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadResponseDto> {
        let name = Self::generate_name();
        let size = data.len();

        let url = self
            .storage
            .store(NewPhoto {
                name: name.clone(),
                content_type: content_type.to_string(),
                data,
            })
            .await?;

        info!(
            "Photo stored: name={}, content_type={}, size={}",
            name, content_type, size
        );

        Ok(UploadResponseDto { url })
    }
}
