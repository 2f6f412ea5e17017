pub mod inspection;
pub mod uploads;
