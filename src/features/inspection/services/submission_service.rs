use chrono::{DateTime, Utc};
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::{debug, info, warn};

use super::photo_upload_pipeline::PhotoUploadPipeline;
use crate::features::inspection::error::InspectionError;
use crate::features::inspection::models::{FormState, SubmissionEnvelope, SubmissionPayload};
use crate::shared::constants::{MSG_SUBMISSION_FAILED, MSG_SUBMITTED};

/// Confirmation of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAck {
    pub submitted_at: DateTime<Utc>,
    pub photo_count: usize,
}

impl SubmissionAck {
    pub fn message(&self) -> &'static str {
        MSG_SUBMITTED
    }
}

/// Posts completed inspections to the workflow endpoint
pub struct SubmissionService {
    http_client: Client,
    submission_url: String,
}

impl SubmissionService {
    /// The client is expected to follow redirects (reqwest's default policy)
    pub fn new(http_client: Client, submission_url: impl Into<String>) -> Self {
        Self {
            http_client,
            submission_url: submission_url.into(),
        }
    }

    /// Validate the form, wait-check the photos, then send the payload once
    ///
    /// Nothing goes over the wire unless every required field is filled and no
    /// photo is still uploading.
    pub async fn submit(
        &self,
        form: &FormState,
        photos: &PhotoUploadPipeline,
    ) -> Result<SubmissionAck, InspectionError> {
        let missing = form.missing_required_fields();
        if !missing.is_empty() {
            debug!("Submission blocked, missing fields: {:?}", missing);
            return Err(InspectionError::Validation { missing });
        }

        let photo_urls = photos.ready_photo_urls().await?;

        let submitted_at = Utc::now();
        let payload = SubmissionPayload::build(form, submitted_at, &photo_urls);
        self.send(&payload).await?;

        info!(
            "Inspection submitted for equipment '{}' with {} photo(s)",
            form.equipment(),
            photo_urls.len()
        );

        Ok(SubmissionAck {
            submitted_at,
            photo_count: photo_urls.len(),
        })
    }

    async fn send(&self, payload: &SubmissionPayload) -> Result<(), InspectionError> {
        let body = serde_json::to_string(&SubmissionEnvelope::new(payload))
            .map_err(|e| InspectionError::Submission(e.to_string()))?;

        let response = self
            .http_client
            .post(&self.submission_url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Submission request failed: {}", e);
                InspectionError::Submission(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        warn!("Submission rejected with HTTP {}: {}", status, text);

        if text.trim().is_empty() {
            Err(InspectionError::Submission(MSG_SUBMISSION_FAILED.to_string()))
        } else {
            Err(InspectionError::Submission(text))
        }
    }
}
