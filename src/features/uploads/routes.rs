use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::uploads::dtos::MAX_PHOTO_SIZE;
use crate::features::uploads::handlers::upload_photo;
use crate::features::uploads::services::UploadService;

/// Create routes for the uploads feature
pub fn routes(upload_service: Arc<UploadService>) -> Router {
    Router::new()
        .route(
            "/api/upload",
            // Allow body size up to MAX_PHOTO_SIZE + buffer for multipart overhead
            post(upload_photo).layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + 1024 * 1024)),
        )
        .with_state(upload_service)
}
