//! Pre-shift equipment inspections
//!
//! The `features::inspection` module is the form a front end drives: checklist,
//! photo uploads and submission to the workflow endpoint. The `features::uploads`
//! route and `modules::storage` back the photo uploads with Google Drive.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;

pub use features::inspection::{InspectionError, InspectionSession};
