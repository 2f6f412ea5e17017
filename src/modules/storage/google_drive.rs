//! Google Drive v3 storage client
//!
//! Photos are created inside one configured parent folder and then shared
//! with "anyone with the link" so the workflow backend can open them.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use super::photo_storage::{NewPhoto, PhotoStorage, StorageError};
use super::service_account::{ServiceAccountTokenManager, DRIVE_SCOPE};
use crate::core::config::GoogleDriveConfig;

/// Subset of the Drive `File` resource requested via `fields=id,webViewLink`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    web_view_link: Option<String>,
}

pub struct GoogleDriveClient {
    http_client: Client,
    token_manager: ServiceAccountTokenManager,
    folder_id: String,
    api_base_url: String,
    upload_base_url: String,
}

impl GoogleDriveClient {
    pub fn new(config: GoogleDriveConfig) -> Result<Self, StorageError> {
        let http_client = Client::builder()
            .build()
            .map_err(|e| StorageError::Request(format!("Failed to create HTTP client: {}", e)))?;

        let token_manager = ServiceAccountTokenManager::new(
            config.service_account,
            DRIVE_SCOPE,
            http_client.clone(),
        )?;

        info!(
            "Google Drive client initialized for folder: {}",
            config.folder_id
        );

        Ok(Self {
            http_client,
            token_manager,
            folder_id: config.folder_id,
            api_base_url: config.api_base_url,
            upload_base_url: config.upload_base_url,
        })
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    fn create_file_url(&self) -> String {
        format!(
            "{}/drive/v3/files?uploadType=multipart&fields=id,webViewLink&supportsAllDrives=true",
            self.upload_base_url
        )
    }

    fn permissions_url(&self, file_id: &str) -> String {
        format!(
            "{}/drive/v3/files/{}/permissions?supportsAllDrives=true",
            self.api_base_url,
            urlencoding::encode(file_id)
        )
    }

    /// Create the file (metadata + media in one `multipart/related` request)
    async fn create_file(&self, token: &str, photo: NewPhoto) -> Result<DriveFile, StorageError> {
        let metadata = json!({
            "name": photo.name,
            "parents": [self.folder_id],
        });
        let boundary = format!("preshift-{}", Uuid::new_v4().simple());
        let body = multipart_related_body(&boundary, &metadata, &photo.content_type, &photo.data);

        let response = self
            .http_client
            .post(self.create_file_url())
            .bearer_auth(token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Api { status, body });
        }

        Ok(response.json::<DriveFile>().await?)
    }

    /// Grant public read access on a file
    async fn make_public(&self, token: &str, file_id: &str) -> Result<(), StorageError> {
        let response = self
            .http_client
            .post(self.permissions_url(file_id))
            .bearer_auth(token)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Api { status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl PhotoStorage for GoogleDriveClient {
    async fn store(&self, photo: NewPhoto) -> Result<String, StorageError> {
        let token = self.token_manager.get_access_token().await?;
        let name = photo.name.clone();
        let size = photo.data.len();

        let file = self.create_file(&token, photo).await?;
        let link = file.web_view_link.ok_or(StorageError::MissingLink)?;
        debug!("Created Drive file '{}' ({} bytes) as {}", name, size, file.id);

        self.make_public(&token, &file.id).await?;
        debug!("Granted public read access on Drive file {}", file.id);

        Ok(link)
    }
}

/// Build a `multipart/related` body: JSON metadata part followed by the media part
fn multipart_related_body(
    boundary: &str,
    metadata: &serde_json::Value,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 512);
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{}\r\n",
            boundary, metadata
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{}\r\nContent-Type: {}\r\n\r\n", boundary, content_type).as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
