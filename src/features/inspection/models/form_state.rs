use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::checklist::{ChecklistItem, ChecklistValue, CHECKLIST_CATALOG};
use crate::features::inspection::error::InspectionError;
use crate::shared::validation::not_blank;

/// Regulatory classification of the inspection location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteType {
    #[serde(rename = "Standard Site")]
    Standard,
    #[serde(rename = "MSHA Site")]
    Msha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineStatus {
    Running,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "N/A NONE")]
    NotApplicable,
    Critical,
    Medium,
    Low,
}

impl SiteType {
    pub const ALL: [SiteType; 2] = [SiteType::Standard, SiteType::Msha];

    pub const fn as_str(self) -> &'static str {
        match self {
            SiteType::Standard => "Standard Site",
            SiteType::Msha => "MSHA Site",
        }
    }
}

impl MachineStatus {
    pub const ALL: [MachineStatus; 2] = [MachineStatus::Running, MachineStatus::Down];

    pub const fn as_str(self) -> &'static str {
        match self {
            MachineStatus::Running => "Running",
            MachineStatus::Down => "Down",
        }
    }

    /// Notice shown to the operator for this status, if any
    pub const fn advisory(self) -> Option<&'static str> {
        match self {
            MachineStatus::Running => None,
            MachineStatus::Down => Some(
                "Please inform your Foreman/Supervisor and use our Lock Out / Tag Out system.",
            ),
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::NotApplicable,
        Priority::Critical,
        Priority::Medium,
        Priority::Low,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::NotApplicable => "N/A NONE",
            Priority::Critical => "Critical",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

macro_rules! choice_traits {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = InspectionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|choice| choice.as_str() == s)
                    .ok_or_else(|| InspectionError::InvalidChoice {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

choice_traits!(SiteType, "Site Type");
choice_traits!(MachineStatus, "Machine Status");
choice_traits!(Priority, "Priority Level");

/// Required fields with their user-facing names, in form order
const REQUIRED_FIELDS: [(&str, &str); 7] = [
    ("operator_name", "Operator Name"),
    ("equipment", "Equipment"),
    ("hour_meter", "Hour Meter"),
    ("location", "Location"),
    ("site_type", "Site Type"),
    ("machine_status", "Machine Status"),
    ("priority", "Priority Level"),
];

/// All field values of one inspection form
///
/// Setters never validate; `missing_required_fields` is checked at submit time.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct FormState {
    #[validate(custom(function = "not_blank"))]
    operator_name: String,
    #[validate(custom(function = "not_blank"))]
    equipment: String,
    #[validate(custom(function = "not_blank"))]
    hour_meter: String,
    #[validate(custom(function = "not_blank"))]
    location: String,
    #[validate(required)]
    site_type: Option<SiteType>,
    #[validate(required)]
    machine_status: Option<MachineStatus>,
    issues_detailed: String,
    #[validate(required)]
    priority: Option<Priority>,
    checklist: Vec<ChecklistItem>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Empty form with one unset row per catalog item
    pub fn new() -> Self {
        Self {
            operator_name: String::new(),
            equipment: String::new(),
            hour_meter: String::new(),
            location: String::new(),
            site_type: None,
            machine_status: None,
            issues_detailed: String::new(),
            priority: None,
            checklist: CHECKLIST_CATALOG.iter().map(ChecklistItem::from).collect(),
        }
    }

    pub fn set_operator_name(&mut self, value: impl Into<String>) {
        self.operator_name = value.into();
    }

    pub fn set_equipment(&mut self, value: impl Into<String>) {
        self.equipment = value.into();
    }

    pub fn set_hour_meter(&mut self, value: impl Into<String>) {
        self.hour_meter = value.into();
    }

    pub fn set_location(&mut self, value: impl Into<String>) {
        self.location = value.into();
    }

    pub fn set_site_type(&mut self, value: SiteType) {
        self.site_type = Some(value);
    }

    pub fn set_machine_status(&mut self, value: MachineStatus) {
        self.machine_status = Some(value);
    }

    pub fn set_issues_detailed(&mut self, value: impl Into<String>) {
        self.issues_detailed = value.into();
    }

    pub fn set_priority(&mut self, value: Priority) {
        self.priority = Some(value);
    }

    /// Replace the value of the checklist row with `id`
    ///
    /// The catalog is closed, so an unknown id is a caller bug.
    pub fn set_checklist_value(
        &mut self,
        id: &str,
        value: ChecklistValue,
    ) -> Result<(), InspectionError> {
        match self.checklist.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.value = value;
                Ok(())
            }
            None => {
                tracing::error!("Unknown checklist item id: {}", id);
                Err(InspectionError::UnknownChecklistItem(id.to_string()))
            }
        }
    }

    pub fn operator_name(&self) -> &str {
        &self.operator_name
    }

    pub fn equipment(&self) -> &str {
        &self.equipment
    }

    pub fn hour_meter(&self) -> &str {
        &self.hour_meter
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn site_type(&self) -> Option<SiteType> {
        self.site_type
    }

    pub fn machine_status(&self) -> Option<MachineStatus> {
        self.machine_status
    }

    pub fn issues_detailed(&self) -> &str {
        &self.issues_detailed
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// Issue description as transmitted: only kept while the machine is down
    pub fn reported_issues(&self) -> &str {
        match self.machine_status {
            Some(MachineStatus::Down) => &self.issues_detailed,
            _ => "",
        }
    }

    /// Names of required fields that are empty or whitespace-only, in form order
    ///
    /// The issue description is not required, even when the machine is down.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };
        let failed = errors.field_errors();

        REQUIRED_FIELDS
            .iter()
            .filter(|(field, _)| failed.contains_key(*field))
            .map(|(_, label)| *label)
            .collect()
    }

    /// Clear every field and set all checklist rows back to unset
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
