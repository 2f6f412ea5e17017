//! Storage module for issue photos
//!
//! Provides the `PhotoStorage` seam and its Google Drive implementation,
//! authenticated with a service account.

mod google_drive;
mod photo_storage;
mod service_account;

pub use google_drive::GoogleDriveClient;
pub use photo_storage::{NewPhoto, PhotoStorage, StorageError};
pub use service_account::{
    ServiceAccountKey, ServiceAccountTokenManager, TokenError, DRIVE_SCOPE,
};
