use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator judgment for one checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChecklistValue {
    Good,
    Bad,
    #[serde(rename = "N/A")]
    NotApplicable,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl ChecklistValue {
    /// Values an operator can pick; `Unset` is only the initial state
    pub const CHOICES: [ChecklistValue; 3] = [
        ChecklistValue::Good,
        ChecklistValue::Bad,
        ChecklistValue::NotApplicable,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ChecklistValue::Good => "Good",
            ChecklistValue::Bad => "Bad",
            ChecklistValue::NotApplicable => "N/A",
            ChecklistValue::Unset => "",
        }
    }
}

impl fmt::Display for ChecklistValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static definition of an inspectable item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistDefinition {
    pub id: &'static str,
    /// Exact label; also the payload key for this item
    pub label: &'static str,
    /// Regulatory note, e.g. "Critical -- MSHA"
    pub note: Option<&'static str>,
}

/// A checklist row as held by the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub label: &'static str,
    pub note: Option<&'static str>,
    pub value: ChecklistValue,
}

impl From<&ChecklistDefinition> for ChecklistItem {
    fn from(def: &ChecklistDefinition) -> Self {
        Self {
            id: def.id,
            label: def.label,
            note: def.note,
            value: ChecklistValue::Unset,
        }
    }
}

const fn item(id: &'static str, label: &'static str) -> ChecklistDefinition {
    ChecklistDefinition {
        id,
        label,
        note: None,
    }
}

const fn noted(id: &'static str, label: &'static str, note: &'static str) -> ChecklistDefinition {
    ChecklistDefinition {
        id,
        label,
        note: Some(note),
    }
}

/// System checks followed by operational safety checks, in display order.
///
/// Labels are keyed on by the workflow backend and must not change.
pub const CHECKLIST_CATALOG: &[ChecklistDefinition] = &[
    // System checks
    item("engine_oil", "Engine Oil Level:"),
    item("coolant_level", "Coolant Level:"),
    item("coolant_hoses", "Coolant Hoses:"),
    item("belts", "Belts: Condition/Adjustment:"),
    item("air_filter", "Air Filter Restriction:"),
    item("batteries", "Batteries and Cables:"),
    item("trans_oil", "Trans, Oil Level:"),
    item("hydraulic_oil", "Hydraulic Oil Level:"),
    item("hydraulic_leaks", "Hydraulic Leaks:"),
    item("leaks", "Leaks:"),
    item("tires_wheels", "Tires, Wheels, Chains:"),
    noted("wheel_lugs", "Wheel Lugs:", "Critical -- MSHA"),
    item("track_rollers", "Track Rollers:"),
    item("track_adjustment", "Track Adjustment:"),
    item("track_chains", "Track Chains and Sprockets:"),
    item("bucket_blade", "Bucket/Blade:"),
    item("cutting_edges", "Cutting Edges/Teeth:"),
    item("grease", "Grease Complete:"),
    noted("structural_cracks", "Structural Cracks:", "Medium -- MSHA"),
    noted("missing_hardware", "Missing Loose Hardware:", "Medium -- MSHA"),
    // Operational safety checks
    item("operators_manual", "Operators Manual:"),
    noted("seat_belt", "Seat Belt:", "Critical -- MSHA:"),
    noted("fire_extinguisher", "Fire Extinguisher:", "Critical -- MSHA"),
    noted("glass_mirrors", "Glass and Mirrors:", "Medium -- MSHA"),
    item("wipers", "Wipers and Washers"),
    noted("backup_alarm", "Back Up Alarm:", "Critical -- MSHA"),
    noted("horn", "Horn:", "Critical -- MSHA:"),
    noted("backup_camera", "Back Up Camera Working:", "Medium -- MSHA"),
    noted("service_brakes", "Service and Park Brakes:", "Critical -- MSHA"),
    noted("steering", "Steering:", "Critical -- MSHA:"),
    noted(
        "aux_steering",
        "Auxiliary Steering/Brakes working:",
        "Critical -- MSHA",
    ),
    noted("guards", "Guards:", "Critical -- MSHA:"),
    item("controls", "All Controls Work Properly:"),
    item("gauges", "All Gauges Working Properly:"),
    noted("lights", "Lights, Flashers, Beacons:", "Medium -- MSHA"),
    item("housekeeping", "Housekeeping:"),
    item("ladders", "Ladders, Steps, and Platforms:"),
    item("heater", "Heater, Defroster, AC:"),
];
