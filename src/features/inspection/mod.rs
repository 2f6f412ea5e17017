//! Pre-shift inspection form: checklist, photo uploads and submission
//!
//! `InspectionSession` is the entry point a front end drives. Everything else is
//! exposed for composition and testing.

pub mod clients;
pub mod error;
pub mod models;
pub mod services;

pub use error::InspectionError;
pub use services::{
    DropdownOptions, InspectionSession, OptionProvider, PhotoUploadPipeline, SubmissionAck,
    SubmissionService,
};
