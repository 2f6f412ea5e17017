use utoipa::{Modify, OpenApi};

use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Uploads
        uploads_handlers::upload_photo,
    ),
    components(
        schemas(
            uploads_dtos::UploadPhotoDto,
            uploads_dtos::UploadResponseDto,
            ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Issue photo uploads to Google Drive"),
    ),
    info(
        title = "Pre-Shift Inspection API",
        version = "0.1.0",
        description = "Photo upload API for pre-shift inspections",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
