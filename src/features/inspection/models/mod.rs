mod checklist;
mod form_state;
mod payload;
mod photo;

pub use checklist::{ChecklistDefinition, ChecklistItem, ChecklistValue, CHECKLIST_CATALOG};
pub use form_state::{FormState, MachineStatus, Priority, SiteType};
pub use payload::{FieldLabel, PayloadKey, SubmissionEnvelope, SubmissionPayload};
pub use photo::{accept_photos, PhotoEntry, PhotoFile, PhotoId};
