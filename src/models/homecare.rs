use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A patient-initiated ask for at-home care.
///
/// Append-only at the interface: a patient may accumulate several
/// requests over time and nothing in this system transitions a status
/// away from `pending`. The "current" request is the most recent by
/// `requested_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomecareRequest {
    pub id: i64,
    pub reason: String,
    pub status: String,
    pub requested_at: NaiveDateTime,
    pub patient_id: i64,
}

impl HomecareRequest {
    /// Status every new request is created with.
    pub const STATUS_PENDING: &'static str = "pending";
}
