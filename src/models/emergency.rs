use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A doctor-logged acute incident tied to a patient.
///
/// Status is free text and defaults to "in progress"; no operation in
/// this system transitions it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyEvent {
    pub id: i64,
    pub event: String,
    pub status: String,
    pub occurred_at: NaiveDateTime,
    pub patient_id: i64,
}

impl EmergencyEvent {
    /// Status every new event is created with.
    pub const STATUS_IN_PROGRESS: &'static str = "in progress";
}
