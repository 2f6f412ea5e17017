mod photo_uploader;

pub use photo_uploader::{HttpPhotoUploader, PhotoUploader};
