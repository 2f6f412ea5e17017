use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::shared::constants::MAX_PHOTO_SIZE;

/// Upload photo request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoDto {
    /// The image to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for a stored photo
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponseDto {
    /// Public view URL of the stored photo
    #[schema(example = "https://drive.google.com/file/d/1AbC/view?usp=drivesdk")]
    pub url: String,
}

/// Any `image/*` MIME type is accepted
pub fn is_image_mime_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().to_ascii_lowercase())
        .and_then(|essence| {
            essence
                .strip_prefix("image/")
                .map(|subtype| !subtype.is_empty())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_mime_type() {
        assert!(is_image_mime_type("image/jpeg"));
        assert!(is_image_mime_type("image/heic"));
        assert!(is_image_mime_type("IMAGE/PNG"));
        assert!(is_image_mime_type("image/webp; charset=binary"));
        assert!(!is_image_mime_type("image/"));
        assert!(!is_image_mime_type("application/pdf"));
        assert!(!is_image_mime_type("application/octet-stream"));
        assert!(!is_image_mime_type(""));
    }
}
