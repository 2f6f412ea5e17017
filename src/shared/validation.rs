use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for Google Drive file and folder IDs
    /// - Valid: "1AbCdEfGhIjK", "0B_xyz-123"
    /// - Invalid: "", "folders/abc", "https://drive.google.com/...", "abc def"
    pub static ref DRIVE_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Field must contain something other than whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
