use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

use super::option_provider::{DropdownOptions, OptionProvider};
use super::photo_upload_pipeline::PhotoUploadPipeline;
use super::submission_service::{SubmissionAck, SubmissionService};
use crate::core::config::InspectionClientConfig;
use crate::features::inspection::clients::{HttpPhotoUploader, PhotoUploader};
use crate::features::inspection::error::InspectionError;
use crate::features::inspection::models::{
    ChecklistValue, FormState, PhotoEntry, PhotoFile, PhotoId,
};
use crate::shared::constants::MSG_SUBMITTING;

/// One operator filling in one inspection form
///
/// Failures never escape as panics: each operation either returns a typed
/// error or leaves a message in `status_message`.
pub struct InspectionSession {
    form: FormState,
    photos: PhotoUploadPipeline,
    options: DropdownOptions,
    option_provider: OptionProvider,
    submission: SubmissionService,
    status: Option<String>,
}

impl InspectionSession {
    /// Build a session talking to the configured endpoints
    pub fn new(config: &InspectionClientConfig) -> Result<Self, InspectionError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| InspectionError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let uploader = Arc::new(HttpPhotoUploader::new(
            http_client.clone(),
            config.upload_url.clone(),
        ));

        Ok(Self::with_parts(
            OptionProvider::new(http_client.clone(), config.options_url.clone()),
            SubmissionService::new(http_client, config.submission_url.clone()),
            uploader,
        ))
    }

    pub fn with_parts(
        option_provider: OptionProvider,
        submission: SubmissionService,
        uploader: Arc<dyn PhotoUploader>,
    ) -> Self {
        Self {
            form: FormState::new(),
            photos: PhotoUploadPipeline::new(uploader),
            options: DropdownOptions::default(),
            option_provider,
            submission,
            status: None,
        }
    }

    /// Fill the equipment and location dropdowns
    pub async fn load_options(&mut self) -> &DropdownOptions {
        self.options = self.option_provider.load().await;
        &self.options
    }

    pub fn options(&self) -> &DropdownOptions {
        &self.options
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn set_checklist_value(
        &mut self,
        id: &str,
        value: ChecklistValue,
    ) -> Result<(), InspectionError> {
        self.form.set_checklist_value(id, value)
    }

    pub fn photo_pipeline(&self) -> &PhotoUploadPipeline {
        &self.photos
    }

    pub async fn add_photos(&self, files: Vec<PhotoFile>) -> Vec<PhotoId> {
        self.photos.add_photos(files).await
    }

    pub async fn remove_photo(&self, id: PhotoId) -> bool {
        self.photos.remove_photo(id).await
    }

    pub async fn photos(&self) -> Vec<PhotoEntry> {
        self.photos.photos().await
    }

    pub async fn upload_error(&self) -> Option<String> {
        self.photos.upload_error().await
    }

    /// Outcome of the last submission attempt
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Validate and send the form, recording the outcome as the status message
    ///
    /// The form is left as is afterwards; call `reset` to start over.
    pub async fn submit(&mut self) -> Result<SubmissionAck, InspectionError> {
        info!("{}", MSG_SUBMITTING);
        self.status = Some(MSG_SUBMITTING.to_string());

        match self.submission.submit(&self.form, &self.photos).await {
            Ok(ack) => {
                self.status = Some(ack.message().to_string());
                Ok(ack)
            }
            Err(e) => {
                warn!("Inspection submission not sent: {}", e);
                self.status = Some(e.status_message());
                Err(e)
            }
        }
    }

    /// Blank form, no photos, no status
    pub async fn reset(&mut self) {
        self.form.reset();
        self.photos.clear().await;
        self.status = None;
    }
}
