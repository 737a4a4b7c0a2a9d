use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A free-text vital-sign entry attached to exactly one patient.
///
/// Ordering by `recorded_at` ascending (row id as tiebreak) is the
/// canonical sequence; "latest" means last in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub content: String,
    pub recorded_at: NaiveDateTime,
    pub patient_id: i64,
}

impl LogEntry {
    /// Display line in the `"<date>: <body>"` form the metrics parser
    /// understands.
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.recorded_at.format("%Y-%m-%d"), self.content)
    }
}
