use serde::{Deserialize, Serialize};

/// A monitoring model assigned to a patient. Read-only in this system;
/// assignments are surfaced on the modules and manager views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub name: String,
    pub patient_id: i64,
}

impl Module {
    /// Module every newly created patient starts with.
    pub const BASELINE: &'static str = "Basic Health Model";
}
