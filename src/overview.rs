//! Dashboard data — latest vital metrics per patient, assembled from
//! the record service and the metrics parser. The role-specific
//! response shapes live in the API layer; this module only builds the
//! shared pieces.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::metrics::{latest_metrics, LatestMetrics};
use crate::records;

/// Metrics plus the raw last log line for one patient.
#[derive(Debug, Clone, Serialize)]
pub struct LatestData {
    pub metrics: LatestMetrics,
    pub last_log: Option<String>,
}

/// `LatestData` labelled with its patient, for roster-wide views.
#[derive(Debug, Clone, Serialize)]
pub struct PatientLatest {
    pub patient: String,
    #[serde(flatten)]
    pub latest: LatestData,
}

/// Latest metrics for one patient, derived only from the tail log entry.
pub fn latest_data_for(conn: &Connection, patient: &str) -> Result<LatestData, DatabaseError> {
    let lines: Vec<String> = records::logs_for(conn, patient)?
        .iter()
        .map(|entry| entry.display_line())
        .collect();

    Ok(LatestData {
        metrics: latest_metrics(&lines),
        last_log: lines.last().cloned(),
    })
}

/// Latest metrics for every roster patient (doctor dashboard).
pub fn roster_latest(conn: &Connection) -> Result<Vec<PatientLatest>, DatabaseError> {
    let mut all = Vec::new();
    for patient in records::roster(conn)? {
        let latest = latest_data_for(conn, &patient)?;
        all.push(PatientLatest { patient, latest });
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn latest_data_reads_only_the_tail_entry() {
        let conn = open_memory_database().unwrap();
        records::append_log(&conn, "Liao", "Heart rate 70").unwrap();
        records::append_log(&conn, "Liao", "Heart rate 72").unwrap();

        let data = latest_data_for(&conn, "Liao").unwrap();
        assert_eq!(data.metrics.heart_rate, Some(72));
        assert!(data.last_log.unwrap().ends_with("Heart rate 72"));
    }

    #[test]
    fn unknown_patient_has_no_data() {
        let conn = open_memory_database().unwrap();
        let data = latest_data_for(&conn, "Nobody").unwrap();
        assert!(data.metrics.is_empty());
        assert!(data.last_log.is_none());
    }

    #[test]
    fn roster_latest_covers_every_patient() {
        let conn = open_memory_database().unwrap();
        records::append_log(&conn, "Liao", "Heart rate 72").unwrap();
        records::append_log(&conn, "Patient B", "BP 140/90").unwrap();
        records::ensure_patient(&conn, "Patient C").unwrap();

        let all = roster_latest(&conn).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].latest.metrics.heart_rate, Some(72));
        assert_eq!(all[1].latest.metrics.bp.as_deref(), Some("140/90"));
        // Patient C has no logs at all
        assert!(all[2].latest.metrics.is_empty());
        assert!(all[2].latest.last_log.is_none());
    }
}
