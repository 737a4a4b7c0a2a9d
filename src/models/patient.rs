use serde::{Deserialize, Serialize};

/// A patient row. Only the unique name is required; demographics are
/// filled in as they become known. A patient owns its histories, logs,
/// homecare requests, emergency events and modules (cascade on delete).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub blood_type: Option<String>,
    pub age: Option<i64>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
}
