use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every route: `{ "error": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "No file provided")]
    pub error: String,
}
