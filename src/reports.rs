//! Aggregate report assembly — per patient: assigned modules, the
//! vital-sign log, and the clinical history. Doctors get the whole
//! roster, everyone else their own name.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::models::{HistoryEntry, LogEntry};
use crate::records;

/// Everything the report view shows for one patient.
#[derive(Debug, Clone, Serialize)]
pub struct PatientReport {
    pub patient: String,
    pub modules: Vec<String>,
    pub logs: Vec<LogEntry>,
    pub history: Vec<HistoryEntry>,
}

/// Report for a single patient (empty sections for an unknown name).
pub fn report_for(conn: &Connection, patient: &str) -> Result<PatientReport, DatabaseError> {
    Ok(PatientReport {
        patient: patient.to_string(),
        modules: records::modules_for(conn, patient)?,
        logs: records::logs_for(conn, patient)?,
        history: records::histories_for(conn, patient)?,
    })
}

/// Reports for every roster patient (doctor view).
pub fn roster_reports(conn: &Connection) -> Result<Vec<PatientReport>, DatabaseError> {
    let mut reports = Vec::new();
    for patient in records::roster(conn)? {
        reports.push(report_for(conn, &patient)?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::models::Module;

    #[test]
    fn report_bundles_all_three_sections() {
        let conn = open_memory_database().unwrap();
        records::append_history(&conn, "Liao", "Diagnosis - Heart check normal").unwrap();
        records::append_log(&conn, "Liao", "Heart rate 72").unwrap();

        let report = report_for(&conn, "Liao").unwrap();
        assert_eq!(report.patient, "Liao");
        assert_eq!(report.modules, vec![Module::BASELINE.to_string()]);
        assert_eq!(report.logs.len(), 1);
        assert_eq!(report.history.len(), 1);
    }

    #[test]
    fn unknown_patient_report_is_empty() {
        let conn = open_memory_database().unwrap();
        let report = report_for(&conn, "Nobody").unwrap();
        assert!(report.modules.is_empty());
        assert!(report.logs.is_empty());
        assert!(report.history.is_empty());
    }

    #[test]
    fn roster_reports_follow_the_store() {
        let conn = open_memory_database().unwrap();
        records::append_log(&conn, "Liao", "Heart rate 72").unwrap();
        records::append_log(&conn, "Patient B", "BP 140/90").unwrap();

        let reports = roster_reports(&conn).unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.patient.as_str()).collect();
        assert_eq!(names, vec!["Liao", "Patient B"]);
    }
}
