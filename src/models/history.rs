use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A free-text clinical note attached to exactly one patient.
///
/// The canonical order of a patient's histories is `created_at`
/// ascending with the row id as tiebreak; positional edit/delete
/// operate on that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub patient_id: i64,
}
