use thiserror::Error;

use crate::shared::constants::{MSG_PENDING_UPLOADS, MSG_REQUIRED_FIELDS};

#[derive(Debug, Error)]
pub enum InspectionError {
    /// One or more required fields are empty; `missing` holds their names in form order
    #[error("{}", MSG_REQUIRED_FIELDS)]
    Validation { missing: Vec<&'static str> },

    #[error("{}", MSG_PENDING_UPLOADS)]
    PendingUpload,

    #[error("Photo upload failed: {0}")]
    Upload(String),

    /// Remote rejection or network failure, carrying the text shown to the operator
    #[error("{0}")]
    Submission(String),

    #[error("Failed to fetch options: {0}")]
    OptionFetch(String),

    #[error("Unknown checklist item id: {0}")]
    UnknownChecklistItem(String),

    #[error("Invalid {field} value: '{value}'")]
    InvalidChoice { field: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl InspectionError {
    /// Status line shown to the operator when a submission attempt fails
    pub fn status_message(&self) -> String {
        match self {
            InspectionError::Validation { .. } | InspectionError::PendingUpload => self.to_string(),
            other => format!("Error: {}", other),
        }
    }
}
