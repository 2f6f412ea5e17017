/// Maximum number of issue photos attached to one inspection
pub const MAX_PHOTOS_PER_INSPECTION: usize = 5;

/// Maximum photo size accepted by the upload route (100MB)
pub const MAX_PHOTO_SIZE: usize = 100 * 1024 * 1024;

// =============================================================================
// USER-VISIBLE STATUS MESSAGES
// =============================================================================

pub const MSG_REQUIRED_FIELDS: &str = "Please fill required fields: Operator Name, Equipment, Hour Meter, Location, Site Type, Machine Status, Priority Level.";

pub const MSG_PENDING_UPLOADS: &str = "Please wait for all photos to finish uploading...";

pub const MSG_UPLOAD_FAILED: &str = "Failed to upload image. Please try again.";

pub const MSG_SUBMITTING: &str = "Submitting inspection...";

pub const MSG_SUBMITTED: &str = "Inspection submitted ✓";

/// Fallback when the workflow endpoint rejects a submission with an empty body
pub const MSG_SUBMISSION_FAILED: &str = "Submission failed";
