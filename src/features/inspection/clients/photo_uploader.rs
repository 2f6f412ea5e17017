use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::features::inspection::error::InspectionError;
use crate::features::inspection::models::PhotoFile;
use crate::features::uploads::dtos::UploadResponseDto;
use crate::shared::types::ErrorResponse;

/// Turns a local photo into a public URL
#[async_trait]
pub trait PhotoUploader: Send + Sync {
    async fn upload(&self, photo: &PhotoFile) -> Result<String, InspectionError>;
}

/// Uploads photos to the `POST /api/upload` route as multipart `file`
pub struct HttpPhotoUploader {
    http_client: Client,
    upload_url: String,
}

impl HttpPhotoUploader {
    pub fn new(http_client: Client, upload_url: impl Into<String>) -> Self {
        Self {
            http_client,
            upload_url: upload_url.into(),
        }
    }
}

#[async_trait]
impl PhotoUploader for HttpPhotoUploader {
    async fn upload(&self, photo: &PhotoFile) -> Result<String, InspectionError> {
        let part = Part::bytes(photo.data.to_vec())
            .file_name(photo.name.clone())
            .mime_str(&photo.content_type)
            .map_err(|e| InspectionError::Upload(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        debug!(
            "Uploading photo '{}' ({} bytes) to {}",
            photo.name,
            photo.size(),
            self.upload_url
        );

        let response = self
            .http_client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| InspectionError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(InspectionError::Upload(reason));
        }

        let body = response
            .json::<UploadResponseDto>()
            .await
            .map_err(|e| InspectionError::Upload(format!("Invalid upload response: {}", e)))?;

        Ok(body.url)
    }
}
