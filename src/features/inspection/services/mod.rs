mod inspection_session;
mod option_provider;
mod photo_upload_pipeline;
mod submission_service;

pub use inspection_session::InspectionSession;
pub use option_provider::{DropdownOptions, OptionProvider};
pub use photo_upload_pipeline::PhotoUploadPipeline;
pub use submission_service::{SubmissionAck, SubmissionService};
