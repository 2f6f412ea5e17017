use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::uploads::dtos::{
    is_image_mime_type, UploadPhotoDto, UploadResponseDto, MAX_PHOTO_SIZE,
};
use crate::features::uploads::services::UploadService;
use crate::shared::types::ErrorResponse;

/// Upload an issue photo
///
/// Accepts multipart/form-data with a single `file` field holding an image.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "uploads",
    request_body(
        content = UploadPhotoDto,
        content_type = "multipart/form-data",
        description = "Issue photo (any image type, up to 100 MB)",
    ),
    responses(
        (status = 200, description = "Photo stored and shared publicly", body = UploadResponseDto),
        (status = 400, description = "Missing file, non-image file or file too large", body = ErrorResponse),
        (status = 500, description = "Storage failed", body = ErrorResponse)
    )
)]
pub async fn upload_photo(
    State(service): State<Arc<UploadService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponseDto>, AppError> {
    let mut file: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name != "file" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        // Parts without a type are treated as opaque bytes and refused below
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        file = Some((data.to_vec(), content_type));
    }

    let (data, content_type) =
        file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    if data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_PHOTO_SIZE,
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }

    if !is_image_mime_type(&content_type) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Only images can be uploaded",
            content_type
        )));
    }

    let response = service.upload_photo(data, &content_type).await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::uploads::routes;
    use crate::modules::storage::{NewPhoto, PhotoStorage, StorageError};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use std::sync::Mutex;

    /// Records stored photos and answers with a fixed outcome
    struct RecordingStorage {
        stored: Mutex<Vec<NewPhoto>>,
        fail: bool,
    }

    impl RecordingStorage {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                stored: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl PhotoStorage for RecordingStorage {
        async fn store(&self, photo: NewPhoto) -> Result<String, StorageError> {
            if self.fail {
                return Err(StorageError::Api {
                    status: 403,
                    body: "insufficient permissions".to_string(),
                });
            }
            let url = format!("https://drive.example/{}", photo.name);
            self.stored.lock().unwrap().push(photo);
            Ok(url)
        }
    }

    fn server_with(storage: Arc<RecordingStorage>) -> TestServer {
        let service = Arc::new(UploadService::new(storage));
        TestServer::new(routes(service)).unwrap()
    }

    fn image_form(bytes: Vec<u8>, mime: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(bytes).file_name("wheel.jpg").mime_type(mime),
        )
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let storage = RecordingStorage::new(false);
        let server = server_with(Arc::clone(&storage));

        let response = server
            .post("/api/upload")
            .multipart(image_form(vec![1, 2, 3, 4], "image/jpeg"))
            .await;

        response.assert_status_ok();
        let body: UploadResponseDto = response.json();
        assert!(body.url.starts_with("https://drive.example/image-"));

        let stored = storage.stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content_type, "image/jpeg");
        assert_eq!(stored[0].data, vec![1, 2, 3, 4]);
        assert!(stored[0].name.starts_with("image-"));
    }

    #[tokio::test]
    async fn test_upload_without_file_is_bad_request() {
        let storage = RecordingStorage::new(false);
        let server = server_with(Arc::clone(&storage));

        let response = server
            .post("/api/upload")
            .multipart(MultipartForm::new().add_text("note", "no photo here"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "No file provided");
        assert!(storage.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let storage = RecordingStorage::new(false);
        let server = server_with(Arc::clone(&storage));

        let response = server
            .post("/api/upload")
            .multipart(image_form(b"%PDF-1.7".to_vec(), "application/pdf"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(storage.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_content_type_is_rejected() {
        let storage = RecordingStorage::new(false);
        let server = server_with(Arc::clone(&storage));

        let form =
            MultipartForm::new().add_part("file", Part::bytes(vec![1, 2, 3]).file_name("blob"));

        let response = server.post("/api/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(storage.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error_with_generic_message() {
        let server = server_with(RecordingStorage::new(true));

        let response = server
            .post("/api/upload")
            .multipart(image_form(vec![9, 9, 9], "image/png"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Failed to upload file");
    }
}
