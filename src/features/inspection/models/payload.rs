use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;
use std::fmt;

use super::form_state::FormState;

/// Fixed payload keys, keyed on byte-for-byte by the workflow backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    OperatorName,
    Equipment,
    HourMeter,
    Location,
    SiteType,
    MachineStatus,
    IssuesDetailed,
    PriorityLevel,
    Timestamp,
}

impl FieldLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldLabel::OperatorName => "Operator Name:",
            FieldLabel::Equipment => "Equipment:",
            FieldLabel::HourMeter => "Hour Meter:",
            FieldLabel::Location => "Location:",
            FieldLabel::SiteType => "Site Type:",
            FieldLabel::MachineStatus => "Machine Status:",
            FieldLabel::IssuesDetailed => "ISSUES DETAILED:",
            FieldLabel::PriorityLevel => "Priority Level:",
            FieldLabel::Timestamp => "Timestamp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadKey {
    Field(FieldLabel),
    /// Checklist item, keyed by its catalog label
    Checklist(&'static str),
    /// 1-based photo position
    Photo(usize),
}

impl PayloadKey {
    pub fn as_str(&self) -> Cow<'static, str> {
        match self {
            PayloadKey::Field(label) => Cow::Borrowed(label.as_str()),
            PayloadKey::Checklist(label) => Cow::Borrowed(label),
            PayloadKey::Photo(n) => Cow::Owned(format!("Upload Issue Photos {}", n)),
        }
    }
}

impl fmt::Display for PayloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Ordered `(label, value)` pairs sent to the workflow endpoint
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    entries: Vec<(PayloadKey, String)>,
}

impl SubmissionPayload {
    /// Assemble the payload: fixed fields, then checklist rows, then photo URLs
    pub fn build(form: &FormState, submitted_at: DateTime<Utc>, photo_urls: &[String]) -> Self {
        let choice = |value: Option<&'static str>| value.unwrap_or_default().to_string();

        let mut entries = vec![
            field(FieldLabel::OperatorName, form.operator_name()),
            field(FieldLabel::Equipment, form.equipment()),
            field(FieldLabel::HourMeter, form.hour_meter()),
            field(FieldLabel::Location, form.location()),
            (
                PayloadKey::Field(FieldLabel::SiteType),
                choice(form.site_type().map(|v| v.as_str())),
            ),
            (
                PayloadKey::Field(FieldLabel::MachineStatus),
                choice(form.machine_status().map(|v| v.as_str())),
            ),
            field(FieldLabel::IssuesDetailed, form.reported_issues()),
            (
                PayloadKey::Field(FieldLabel::PriorityLevel),
                choice(form.priority().map(|v| v.as_str())),
            ),
            (
                PayloadKey::Field(FieldLabel::Timestamp),
                submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ];

        entries.extend(form.checklist().iter().map(|row| {
            (
                PayloadKey::Checklist(row.label),
                row.value.as_str().to_string(),
            )
        }));

        entries.extend(
            photo_urls
                .iter()
                .enumerate()
                .map(|(i, url)| (PayloadKey::Photo(i + 1), url.clone())),
        );

        Self { entries }
    }

    pub fn entries(&self) -> &[(PayloadKey, String)] {
        &self.entries
    }

    /// Value stored under the exact label `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn field(label: FieldLabel, value: &str) -> (PayloadKey, String) {
    (PayloadKey::Field(label), value.to_string())
}

impl Serialize for SubmissionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str().as_ref(), value)?;
        }
        map.end()
    }
}

/// Request body expected by the workflow endpoint
#[derive(Debug, serde::Serialize)]
pub struct SubmissionEnvelope<'a> {
    pub task: &'static str,
    pub data: &'a SubmissionPayload,
}

impl<'a> SubmissionEnvelope<'a> {
    pub fn new(data: &'a SubmissionPayload) -> Self {
        Self { task: "init", data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::inspection::models::{
        ChecklistValue, MachineStatus, Priority, SiteType, CHECKLIST_CATALOG,
    };
    use chrono::TimeZone;

    fn scenario_form() -> FormState {
        let mut form = FormState::new();
        form.set_operator_name("J. Smith");
        form.set_equipment("Loader-12");
        form.set_hour_meter("1234.5");
        form.set_location("Site A");
        form.set_site_type(SiteType::Standard);
        form.set_machine_status(MachineStatus::Running);
        form.set_priority(Priority::Low);
        form
    }

    fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap() + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn test_fixed_fields_come_first_in_order() {
        let payload = SubmissionPayload::build(&scenario_form(), submitted_at(), &[]);

        let keys: Vec<_> = payload.entries()[..9]
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(
            keys,
            vec![
                "Operator Name:",
                "Equipment:",
                "Hour Meter:",
                "Location:",
                "Site Type:",
                "Machine Status:",
                "ISSUES DETAILED:",
                "Priority Level:",
                "Timestamp",
            ]
        );
        assert_eq!(payload.len(), 9 + CHECKLIST_CATALOG.len());
    }

    #[test]
    fn test_scenario_values_under_exact_labels() {
        let mut form = scenario_form();
        form.set_issues_detailed("should not be sent");

        let payload = SubmissionPayload::build(&form, submitted_at(), &[]);

        assert_eq!(payload.get("Operator Name:"), Some("J. Smith"));
        assert_eq!(payload.get("Equipment:"), Some("Loader-12"));
        assert_eq!(payload.get("Hour Meter:"), Some("1234.5"));
        assert_eq!(payload.get("Location:"), Some("Site A"));
        assert_eq!(payload.get("Site Type:"), Some("Standard Site"));
        assert_eq!(payload.get("Machine Status:"), Some("Running"));
        assert_eq!(payload.get("ISSUES DETAILED:"), Some(""));
        assert_eq!(payload.get("Priority Level:"), Some("Low"));
        assert_eq!(payload.get("Timestamp"), Some("2024-05-06T07:08:09.042Z"));
        assert_eq!(payload.get("Upload Issue Photos 1"), None);
    }

    #[test]
    fn test_issues_sent_when_down() {
        let mut form = scenario_form();
        form.set_machine_status(MachineStatus::Down);
        form.set_issues_detailed("Hydraulic leak at boom");

        let payload = SubmissionPayload::build(&form, submitted_at(), &[]);

        assert_eq!(payload.get("ISSUES DETAILED:"), Some("Hydraulic leak at boom"));
    }

    #[test]
    fn test_checklist_values_follow_catalog_labels() {
        let mut form = scenario_form();
        form.set_checklist_value("wipers", ChecklistValue::Bad).unwrap();
        form.set_checklist_value("wheel_lugs", ChecklistValue::NotApplicable).unwrap();

        let payload = SubmissionPayload::build(&form, submitted_at(), &[]);

        assert_eq!(payload.get("Wipers and Washers"), Some("Bad"));
        assert_eq!(payload.get("Wheel Lugs:"), Some("N/A"));
        assert_eq!(payload.get("Engine Oil Level:"), Some(""));

        let checklist_keys: Vec<_> = payload.entries()[9..]
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        let catalog_labels: Vec<_> = CHECKLIST_CATALOG.iter().map(|d| d.label).collect();
        assert_eq!(checklist_keys, catalog_labels);
    }

    #[test]
    fn test_photo_urls_numbered_from_one_after_checklist() {
        let urls = vec![
            "https://drive.example/a".to_string(),
            "https://drive.example/b".to_string(),
        ];

        let payload = SubmissionPayload::build(&scenario_form(), submitted_at(), &urls);

        let tail: Vec<_> = payload.entries()[payload.len() - 2..]
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_str()))
            .collect();
        assert_eq!(
            tail,
            vec![
                ("Upload Issue Photos 1".to_string(), "https://drive.example/a"),
                ("Upload Issue Photos 2".to_string(), "https://drive.example/b"),
            ]
        );
    }

    #[test]
    fn test_envelope_serializes_in_insertion_order() {
        let payload = SubmissionPayload::build(&scenario_form(), submitted_at(), &[]);

        let json = serde_json::to_string(&SubmissionEnvelope::new(&payload)).unwrap();

        assert!(json.starts_with(r#"{"task":"init","data":{"Operator Name:":"J. Smith","#));
        let status = json.find("\"Machine Status:\"").unwrap();
        let issues = json.find("\"ISSUES DETAILED:\"").unwrap();
        let engine = json.find("\"Engine Oil Level:\"").unwrap();
        assert!(status < issues && issues < engine);
    }
}
