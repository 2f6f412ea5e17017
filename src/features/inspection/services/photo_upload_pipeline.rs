use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::features::inspection::clients::PhotoUploader;
use crate::features::inspection::error::InspectionError;
use crate::features::inspection::models::{accept_photos, PhotoEntry, PhotoFile, PhotoId};
use crate::shared::constants::MSG_UPLOAD_FAILED;

#[derive(Default)]
struct PipelineState {
    entries: Vec<PhotoEntry>,
    in_flight: HashMap<PhotoId, AbortHandle>,
    upload_error: Option<String>,
    /// Bumped on every failed upload
    failures: u64,
}

/// Owns the photos of one inspection and runs their uploads
///
/// Every upload is its own task. Completions find their entry by id, so
/// removals made while uploads are running never shift another photo's result.
pub struct PhotoUploadPipeline {
    uploader: Arc<dyn PhotoUploader>,
    state: Arc<RwLock<PipelineState>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl PhotoUploadPipeline {
    pub fn new(uploader: Arc<dyn PhotoUploader>) -> Self {
        Self {
            uploader,
            state: Arc::new(RwLock::new(PipelineState::default())),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Accept as many of `files` as fit and start uploading each of them
    ///
    /// Returns the ids of the accepted photos, in selection order.
    pub async fn add_photos(&self, files: Vec<PhotoFile>) -> Vec<PhotoId> {
        let selected = files.len();
        let mut state = self.state.write().await;
        let accepted = accept_photos(files, state.entries.len());

        if accepted.len() < selected {
            debug!(
                "Photo limit reached: accepted {} of {} selected photos",
                accepted.len(),
                selected
            );
        }

        let mut tasks = self.tasks.lock().await;
        tasks.retain(|handle| !handle.is_finished());
        let generation = state.failures;
        let mut ids = Vec::with_capacity(accepted.len());

        for mut entry in accepted {
            // Marked before it becomes visible so it is never idle and url-less
            entry.uploading = true;
            let id = entry.id;
            let file = entry.file.clone();
            state.entries.push(entry);

            let handle = tokio::spawn(upload_one(
                Arc::clone(&self.uploader),
                Arc::clone(&self.state),
                id,
                file,
                generation,
            ));
            state.in_flight.insert(id, handle.abort_handle());
            tasks.push(handle);
            ids.push(id);
        }

        ids
    }

    /// Drop a photo, cancelling its upload if one is running
    pub async fn remove_photo(&self, id: PhotoId) -> bool {
        let mut state = self.state.write().await;

        if let Some(handle) = state.in_flight.remove(&id) {
            handle.abort();
            debug!("Aborted in-flight upload for photo {}", id);
        }

        let before = state.entries.len();
        state.entries.retain(|entry| entry.id != id);
        before != state.entries.len()
    }

    /// Remove every photo and cancel all running uploads
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        for (_, handle) in state.in_flight.drain() {
            handle.abort();
        }
        state.entries.clear();
        state.upload_error = None;
    }

    /// Snapshot of the current photos, in display order
    pub async fn photos(&self) -> Vec<PhotoEntry> {
        self.state.read().await.entries.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// URLs of finished uploads, in display order
    pub async fn photo_urls(&self) -> Vec<String> {
        completed_urls(&self.state.read().await.entries)
    }

    pub async fn has_pending_uploads(&self) -> bool {
        self.state
            .read()
            .await
            .entries
            .iter()
            .any(|entry| entry.uploading)
    }

    /// URLs to submit, checked against pending uploads under a single read lock
    pub async fn ready_photo_urls(&self) -> Result<Vec<String>, InspectionError> {
        let state = self.state.read().await;

        if state.entries.iter().any(|entry| entry.uploading) {
            return Err(InspectionError::PendingUpload);
        }
        Ok(completed_urls(&state.entries))
    }

    /// Message left by the most recent failed upload
    ///
    /// Cleared by a later upload that was started after that failure.
    pub async fn upload_error(&self) -> Option<String> {
        self.state.read().await.upload_error.clone()
    }

    /// Wait for every upload dispatched so far
    pub async fn wait_for_uploads(&self) {
        let handles = std::mem::take(&mut *self.tasks.lock().await);

        for handle in handles {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Photo upload task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for PhotoUploadPipeline {
    fn drop(&mut self) {
        if let Ok(tasks) = self.tasks.try_lock() {
            for handle in tasks.iter() {
                handle.abort();
            }
        }
    }
}

fn completed_urls(entries: &[PhotoEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !entry.uploading && entry.is_uploaded())
        .map(|entry| entry.remote_url.clone())
        .collect()
}

async fn upload_one(
    uploader: Arc<dyn PhotoUploader>,
    state: Arc<RwLock<PipelineState>>,
    id: PhotoId,
    file: PhotoFile,
    generation: u64,
) {
    let result = uploader.upload(&file).await;

    let mut state = state.write().await;
    state.in_flight.remove(&id);

    let Some(position) = state.entries.iter().position(|entry| entry.id == id) else {
        debug!("Photo {} was removed before its upload finished", id);
        return;
    };

    match result {
        Ok(url) => {
            info!("Photo '{}' uploaded: {}", file.name, url);
            let entry = &mut state.entries[position];
            entry.remote_url = url;
            entry.uploading = false;
            // Only an upload started after the last failure may clear its message
            if state.failures == generation {
                state.upload_error = None;
            }
        }
        Err(e) => {
            warn!("Upload failed for photo '{}': {}", file.name, e);
            state.entries.remove(position);
            state.failures += 1;
            state.upload_error = Some(MSG_UPLOAD_FAILED.to_string());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::constants::MAX_PHOTOS_PER_INSPECTION;
    use crate::shared::test_helpers::{sample_photo, sample_photos};
    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    /// Uploads wait for a permit; files named `fail*` are rejected right away
    pub(crate) struct GatedUploader {
        pub(crate) gate: Semaphore,
    }

    impl GatedUploader {
        pub(crate) fn open() -> Arc<Self> {
            Arc::new(Self {
                gate: Semaphore::new(Semaphore::MAX_PERMITS),
            })
        }

        pub(crate) fn closed() -> Arc<Self> {
            Arc::new(Self {
                gate: Semaphore::new(0),
            })
        }
    }

    #[async_trait]
    impl PhotoUploader for GatedUploader {
        async fn upload(&self, photo: &PhotoFile) -> Result<String, InspectionError> {
            if photo.name.starts_with("fail") {
                return Err(InspectionError::Upload("HTTP 500".to_string()));
            }

            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| InspectionError::Upload(e.to_string()))?;

            Ok(format!("https://drive.example/{}", photo.name))
        }
    }

    #[tokio::test]
    async fn test_photo_count_never_exceeds_limit_across_batches() {
        let pipeline = PhotoUploadPipeline::new(GatedUploader::open());

        assert_eq!(pipeline.add_photos(sample_photos(3)).await.len(), 3);
        assert_eq!(pipeline.add_photos(sample_photos(3)).await.len(), 2);
        assert!(pipeline.add_photos(sample_photos(1)).await.is_empty());

        assert_eq!(pipeline.len().await, MAX_PHOTOS_PER_INSPECTION);
        pipeline.wait_for_uploads().await;
    }

    #[tokio::test]
    async fn test_accepted_photos_are_uploading_immediately() {
        let uploader = GatedUploader::closed();
        let pipeline = PhotoUploadPipeline::new(uploader.clone());

        pipeline.add_photos(sample_photos(2)).await;

        let photos = pipeline.photos().await;
        assert!(photos.iter().all(|p| p.uploading && p.remote_url.is_empty()));
        assert!(pipeline.has_pending_uploads().await);
        assert!(pipeline.photo_urls().await.is_empty());
        assert!(matches!(
            pipeline.ready_photo_urls().await,
            Err(InspectionError::PendingUpload)
        ));

        uploader.gate.add_permits(2);
        pipeline.wait_for_uploads().await;
        assert!(!pipeline.has_pending_uploads().await);
    }

    #[tokio::test]
    async fn test_successful_uploads_keep_selection_order() {
        let pipeline = PhotoUploadPipeline::new(GatedUploader::open());

        pipeline.add_photos(sample_photos(3)).await;
        pipeline.wait_for_uploads().await;

        assert_eq!(
            pipeline.ready_photo_urls().await.unwrap(),
            vec![
                "https://drive.example/photo-0.jpg",
                "https://drive.example/photo-1.jpg",
                "https://drive.example/photo-2.jpg",
            ]
        );
        assert_eq!(pipeline.upload_error().await, None);
    }

    #[tokio::test]
    async fn test_failed_upload_drops_entry_and_keeps_others_in_order() {
        let pipeline = PhotoUploadPipeline::new(GatedUploader::open());

        pipeline
            .add_photos(vec![
                sample_photo("a.jpg"),
                sample_photo("fail.jpg"),
                sample_photo("c.jpg"),
            ])
            .await;
        pipeline.wait_for_uploads().await;

        let names: Vec<_> = pipeline
            .photos()
            .await
            .into_iter()
            .map(|p| p.file.name)
            .collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
        assert_eq!(
            pipeline.upload_error().await.as_deref(),
            Some("Failed to upload image. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_next_success_clears_upload_error() {
        let pipeline = PhotoUploadPipeline::new(GatedUploader::open());

        pipeline.add_photos(vec![sample_photo("fail.jpg")]).await;
        pipeline.wait_for_uploads().await;
        assert!(pipeline.upload_error().await.is_some());

        pipeline.add_photos(vec![sample_photo("ok.jpg")]).await;
        pipeline.wait_for_uploads().await;
        assert_eq!(pipeline.upload_error().await, None);
    }

    #[tokio::test]
    async fn test_sibling_success_keeps_upload_error() {
        let uploader = GatedUploader::closed();
        let pipeline = PhotoUploadPipeline::new(uploader.clone());

        pipeline
            .add_photos(vec![sample_photo("fail.jpg"), sample_photo("ok.jpg")])
            .await;
        while pipeline.upload_error().await.is_none() {
            tokio::task::yield_now().await;
        }
        uploader.gate.add_permits(1);
        pipeline.wait_for_uploads().await;

        let names: Vec<_> = pipeline
            .photos()
            .await
            .into_iter()
            .map(|p| p.file.name)
            .collect();
        assert_eq!(names, vec!["ok.jpg"]);
        assert_eq!(
            pipeline.upload_error().await.as_deref(),
            Some("Failed to upload image. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_finished_tasks_are_pruned_on_add() {
        let pipeline = PhotoUploadPipeline::new(GatedUploader::open());

        for _ in 0..10 {
            let ids = pipeline.add_photos(sample_photos(1)).await;
            while pipeline.has_pending_uploads().await {
                tokio::task::yield_now().await;
            }
            pipeline.remove_photo(ids[0]).await;
        }
        pipeline.add_photos(sample_photos(1)).await;

        assert_eq!(pipeline.tasks.lock().await.len(), 1);
        pipeline.wait_for_uploads().await;
    }

    #[tokio::test]
    async fn test_remove_mid_upload_aborts_and_never_resurrects() {
        let uploader = GatedUploader::closed();
        let pipeline = PhotoUploadPipeline::new(uploader.clone());

        let ids = pipeline
            .add_photos(vec![
                sample_photo("a.jpg"),
                sample_photo("b.jpg"),
                sample_photo("c.jpg"),
            ])
            .await;

        assert!(pipeline.remove_photo(ids[1]).await);
        uploader.gate.add_permits(3);
        pipeline.wait_for_uploads().await;

        let photos = pipeline.photos().await;
        let names: Vec<_> = photos.iter().map(|p| p.file.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
        assert_eq!(photos[0].id, ids[0]);
        assert_eq!(photos[1].id, ids[2]);
        assert_eq!(
            pipeline.photo_urls().await,
            vec!["https://drive.example/a.jpg", "https://drive.example/c.jpg"]
        );
    }

    #[tokio::test]
    async fn test_remove_unknown_photo_is_noop() {
        let pipeline = PhotoUploadPipeline::new(GatedUploader::open());
        pipeline.add_photos(sample_photos(1)).await;

        assert!(!pipeline.remove_photo(PhotoId::new()).await);
        assert_eq!(pipeline.len().await, 1);
        pipeline.wait_for_uploads().await;
    }

    #[tokio::test]
    async fn test_removal_frees_a_slot() {
        let pipeline = PhotoUploadPipeline::new(GatedUploader::open());
        let ids = pipeline.add_photos(sample_photos(5)).await;
        pipeline.wait_for_uploads().await;

        pipeline.remove_photo(ids[0]).await;

        assert_eq!(pipeline.add_photos(sample_photos(2)).await.len(), 1);
        pipeline.wait_for_uploads().await;
        assert_eq!(pipeline.len().await, MAX_PHOTOS_PER_INSPECTION);
    }

    #[tokio::test]
    async fn test_clear_cancels_everything() {
        let uploader = GatedUploader::closed();
        let pipeline = PhotoUploadPipeline::new(uploader.clone());
        pipeline.add_photos(sample_photos(2)).await;

        pipeline.clear().await;
        uploader.gate.add_permits(2);
        pipeline.wait_for_uploads().await;

        assert!(pipeline.is_empty().await);
        assert!(!pipeline.has_pending_uploads().await);
    }
}
