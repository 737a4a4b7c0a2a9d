//! Record service — CRUD over the four patient-owned record types,
//! the patient roster, and the explicit patient-creation path that
//! every implicit-create route goes through.
//!
//! Positional edit/delete resolves the display index to a stable row
//! id inside the same request and keys the mutation by that id. An
//! out-of-range index (or an unknown patient) is a silent no-op, not
//! an error. The index is still recomputed per request, so concurrent
//! mutations of the same patient's rows can race; that matches the
//! system this replaces.

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::{
    EmergencyEvent, HistoryEntry, HomecareRequest, LogEntry, Module, Patient,
};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

// ═══════════════════════════════════════════════════════════
// Patients
// ═══════════════════════════════════════════════════════════

/// Idempotent patient creation. Returns the patient id, inserting the
/// row (with its baseline monitoring module) only when the name is
/// new, and logging a creation event exactly then.
pub fn ensure_patient(conn: &Connection, name: &str) -> Result<i64, DatabaseError> {
    if let Some(id) = repository::find_patient_id(conn, name)? {
        return Ok(id);
    }
    let id = repository::insert_patient(conn, name)?;
    repository::insert_module(conn, id, Module::BASELINE)?;
    tracing::info!(patient = name, "patient record created");
    Ok(id)
}

/// Idempotent doctor registration, mirroring the patient login seed.
pub fn ensure_doctor(conn: &Connection, name: &str) -> Result<i64, DatabaseError> {
    if let Some(id) = repository::find_doctor_id(conn, name)? {
        return Ok(id);
    }
    let id = repository::insert_doctor(conn, name)?;
    tracing::info!(doctor = name, "doctor record created");
    Ok(id)
}

/// Names of every patient currently in the store, in creation order.
/// Doctor aggregates enumerate this, never a fixed roster.
pub fn roster(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    repository::patient_names(conn)
}

// ═══════════════════════════════════════════════════════════
// View types
// ═══════════════════════════════════════════════════════════

/// One roster patient's entries, for doctor-facing aggregate views.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRecords<T> {
    pub patient: String,
    pub entries: Vec<T>,
}

/// A homecare request joined with its patient's name.
#[derive(Debug, Clone, Serialize)]
pub struct HomecareTicket {
    pub patient: String,
    #[serde(flatten)]
    pub request: HomecareRequest,
}

/// An emergency event joined with its patient's name.
#[derive(Debug, Clone, Serialize)]
pub struct EmergencyTicket {
    pub patient: String,
    #[serde(flatten)]
    pub event: EmergencyEvent,
}

/// A patient row plus its assigned module names (manager view).
#[derive(Debug, Clone, Serialize)]
pub struct ModuleAssignment {
    #[serde(flatten)]
    pub patient: Patient,
    pub modules: Vec<String>,
}

// ═══════════════════════════════════════════════════════════
// Histories
// ═══════════════════════════════════════════════════════════

/// A patient's histories in display order; unknown patient → empty.
pub fn histories_for(conn: &Connection, patient: &str) -> Result<Vec<HistoryEntry>, DatabaseError> {
    match repository::find_patient_id(conn, patient)? {
        Some(id) => repository::list_histories(conn, id),
        None => Ok(Vec::new()),
    }
}

/// Histories of every roster patient (doctor view).
pub fn all_histories(
    conn: &Connection,
) -> Result<Vec<PatientRecords<HistoryEntry>>, DatabaseError> {
    let mut all = Vec::new();
    for patient in roster(conn)? {
        let entries = histories_for(conn, &patient)?;
        all.push(PatientRecords { patient, entries });
    }
    Ok(all)
}

/// Append a history note, creating the patient if absent.
pub fn append_history(conn: &Connection, patient: &str, text: &str) -> Result<(), DatabaseError> {
    let patient_id = ensure_patient(conn, patient)?;
    repository::insert_history(conn, patient_id, text, now())?;
    Ok(())
}

/// Edit the history at a display position. Returns whether a row
/// changed; out-of-range or unknown patient changes nothing.
pub fn edit_history_at(
    conn: &Connection,
    patient: &str,
    index: usize,
    text: &str,
) -> Result<bool, DatabaseError> {
    let Some(patient_id) = repository::find_patient_id(conn, patient)? else {
        return Ok(false);
    };
    let ids = repository::history_ids(conn, patient_id)?;
    match ids.get(index) {
        Some(&row_id) => Ok(repository::update_history(conn, row_id, text)? > 0),
        None => Ok(false),
    }
}

/// Delete the history at a display position; same no-op rules.
pub fn delete_history_at(
    conn: &Connection,
    patient: &str,
    index: usize,
) -> Result<bool, DatabaseError> {
    let Some(patient_id) = repository::find_patient_id(conn, patient)? else {
        return Ok(false);
    };
    let ids = repository::history_ids(conn, patient_id)?;
    match ids.get(index) {
        Some(&row_id) => Ok(repository::delete_history(conn, row_id)? > 0),
        None => Ok(false),
    }
}

// ═══════════════════════════════════════════════════════════
// Logs
// ═══════════════════════════════════════════════════════════

/// A patient's vital-sign logs in display order; unknown → empty.
pub fn logs_for(conn: &Connection, patient: &str) -> Result<Vec<LogEntry>, DatabaseError> {
    match repository::find_patient_id(conn, patient)? {
        Some(id) => repository::list_logs(conn, id),
        None => Ok(Vec::new()),
    }
}

/// Logs of every roster patient (doctor view).
pub fn all_logs(conn: &Connection) -> Result<Vec<PatientRecords<LogEntry>>, DatabaseError> {
    let mut all = Vec::new();
    for patient in roster(conn)? {
        let entries = logs_for(conn, &patient)?;
        all.push(PatientRecords { patient, entries });
    }
    Ok(all)
}

/// Append a log entry, creating the patient if absent.
pub fn append_log(conn: &Connection, patient: &str, text: &str) -> Result<(), DatabaseError> {
    let patient_id = ensure_patient(conn, patient)?;
    repository::insert_log(conn, patient_id, text, now())?;
    Ok(())
}

pub fn edit_log_at(
    conn: &Connection,
    patient: &str,
    index: usize,
    text: &str,
) -> Result<bool, DatabaseError> {
    let Some(patient_id) = repository::find_patient_id(conn, patient)? else {
        return Ok(false);
    };
    let ids = repository::log_ids(conn, patient_id)?;
    match ids.get(index) {
        Some(&row_id) => Ok(repository::update_log(conn, row_id, text)? > 0),
        None => Ok(false),
    }
}

pub fn delete_log_at(
    conn: &Connection,
    patient: &str,
    index: usize,
) -> Result<bool, DatabaseError> {
    let Some(patient_id) = repository::find_patient_id(conn, patient)? else {
        return Ok(false);
    };
    let ids = repository::log_ids(conn, patient_id)?;
    match ids.get(index) {
        Some(&row_id) => Ok(repository::delete_log(conn, row_id)? > 0),
        None => Ok(false),
    }
}

// ═══════════════════════════════════════════════════════════
// Homecare requests
// ═══════════════════════════════════════════════════════════

/// Submit a homecare request for a patient. Always inserts a new
/// `pending` row — never dedups, even while another request is still
/// pending.
pub fn submit_homecare(conn: &Connection, patient: &str, reason: &str) -> Result<(), DatabaseError> {
    let patient_id = ensure_patient(conn, patient)?;
    repository::insert_homecare(conn, patient_id, reason, now())?;
    Ok(())
}

/// The patient's most recent request, or None (unknown patient included).
pub fn current_homecare(
    conn: &Connection,
    patient: &str,
) -> Result<Option<HomecareRequest>, DatabaseError> {
    match repository::find_patient_id(conn, patient)? {
        Some(id) => repository::current_homecare(conn, id),
        None => Ok(None),
    }
}

/// Every request in the store, most recent first (doctor view).
pub fn all_homecare(conn: &Connection) -> Result<Vec<HomecareTicket>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.name, r.id, r.reason, r.status, r.requested_at, r.patient_id
         FROM homecare_requests r
         JOIN patients p ON r.patient_id = p.id
         ORDER BY r.requested_at DESC, r.id DESC",
    )?;
    let result = collect_homecare(stmt.query_map([], map_homecare_row)?);
    result
}

/// Requests still pending, most recent first (doctor dashboard).
pub fn pending_homecare(conn: &Connection) -> Result<Vec<HomecareTicket>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.name, r.id, r.reason, r.status, r.requested_at, r.patient_id
         FROM homecare_requests r
         JOIN patients p ON r.patient_id = p.id
         WHERE r.status = ?1
         ORDER BY r.requested_at DESC, r.id DESC",
    )?;
    let result = collect_homecare(stmt.query_map(params![HomecareRequest::STATUS_PENDING], map_homecare_row)?);
    result
}

type HomecareRow = (String, i64, String, String, String, i64);

fn map_homecare_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HomecareRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn collect_homecare<I>(rows: I) -> Result<Vec<HomecareTicket>, DatabaseError>
where
    I: Iterator<Item = rusqlite::Result<HomecareRow>>,
{
    let mut tickets = Vec::new();
    for row in rows {
        let (patient, id, reason, status, requested_at, patient_id) = row?;
        tickets.push(HomecareTicket {
            patient,
            request: HomecareRequest {
                id,
                reason,
                status,
                requested_at: repository::parse_timestamp(&requested_at),
                patient_id,
            },
        });
    }
    Ok(tickets)
}

// ═══════════════════════════════════════════════════════════
// Emergency events
// ═══════════════════════════════════════════════════════════

/// Record an emergency event, creating the patient if absent. The
/// event starts (and stays) in the default status.
pub fn add_emergency(conn: &Connection, patient: &str, event: &str) -> Result<(), DatabaseError> {
    let patient_id = ensure_patient(conn, patient)?;
    repository::insert_emergency(conn, patient_id, event, now())?;
    Ok(())
}

/// Every emergency event, most recent first.
pub fn all_emergencies(conn: &Connection) -> Result<Vec<EmergencyTicket>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.name, e.id, e.event, e.status, e.occurred_at, e.patient_id
         FROM emergency_events e
         JOIN patients p ON e.patient_id = p.id
         ORDER BY e.occurred_at DESC, e.id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, i64>(5)?,
        ))
    })?;

    let mut tickets = Vec::new();
    for row in rows {
        let (patient, id, event, status, occurred_at, patient_id) = row?;
        tickets.push(EmergencyTicket {
            patient,
            event: EmergencyEvent {
                id,
                event,
                status,
                occurred_at: repository::parse_timestamp(&occurred_at),
                patient_id,
            },
        });
    }
    Ok(tickets)
}

// ═══════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════

/// Names of the modules assigned to a patient; unknown → empty.
pub fn modules_for(conn: &Connection, patient: &str) -> Result<Vec<String>, DatabaseError> {
    match repository::find_patient_id(conn, patient)? {
        Some(id) => Ok(repository::list_modules(conn, id)?
            .into_iter()
            .map(|m| m.name)
            .collect()),
        None => Ok(Vec::new()),
    }
}

/// Module names of every roster patient.
pub fn all_modules(conn: &Connection) -> Result<Vec<PatientRecords<String>>, DatabaseError> {
    let mut all = Vec::new();
    for patient in roster(conn)? {
        let entries = modules_for(conn, &patient)?;
        all.push(PatientRecords { patient, entries });
    }
    Ok(all)
}

/// Patient rows with their module names (manager configuration view).
pub fn module_roster(conn: &Connection) -> Result<Vec<ModuleAssignment>, DatabaseError> {
    let mut assignments = Vec::new();
    for patient in repository::list_patients(conn)? {
        let modules = repository::list_modules(conn, patient.id)?
            .into_iter()
            .map(|m| m.name)
            .collect();
        assignments.push(ModuleAssignment { patient, modules });
    }
    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn ensure_patient_is_idempotent() {
        let conn = open_memory_database().unwrap();
        let first = ensure_patient(&conn, "Liao").unwrap();
        let second = ensure_patient(&conn, "Liao").unwrap();
        assert_eq!(first, second);
        assert_eq!(roster(&conn).unwrap(), vec!["Liao".to_string()]);
    }

    #[test]
    fn new_patient_gets_baseline_module() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "Liao").unwrap();
        assert_eq!(
            modules_for(&conn, "Liao").unwrap(),
            vec![Module::BASELINE.to_string()]
        );
        // Repeated ensure must not duplicate the assignment
        ensure_patient(&conn, "Liao").unwrap();
        assert_eq!(modules_for(&conn, "Liao").unwrap().len(), 1);
    }

    #[test]
    fn ensure_doctor_is_idempotent() {
        let conn = open_memory_database().unwrap();
        let first = ensure_doctor(&conn, "Doctor Wu").unwrap();
        let second = ensure_doctor(&conn, "Doctor Wu").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn append_creates_patient_once() {
        let conn = open_memory_database().unwrap();
        append_history(&conn, "Patient B", "Blood pressure high").unwrap();
        append_history(&conn, "Patient B", "Recheck scheduled").unwrap();

        assert_eq!(roster(&conn).unwrap(), vec!["Patient B".to_string()]);
        assert_eq!(histories_for(&conn, "Patient B").unwrap().len(), 2);
    }

    #[test]
    fn history_round_trip_append_list_delete() {
        let conn = open_memory_database().unwrap();
        append_history(&conn, "Liao", "Diagnosis - Heart check normal").unwrap();
        append_history(&conn, "Liao", "ECG - Minor arrhythmia").unwrap();

        let entries = histories_for(&conn, "Liao").unwrap();
        assert_eq!(entries.last().unwrap().content, "ECG - Minor arrhythmia");

        assert!(delete_history_at(&conn, "Liao", 1).unwrap());
        let entries = histories_for(&conn, "Liao").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|e| e.content != "ECG - Minor arrhythmia"));
    }

    #[test]
    fn edit_at_rewrites_only_the_indexed_entry() {
        let conn = open_memory_database().unwrap();
        append_log(&conn, "Liao", "Heart rate 72").unwrap();
        append_log(&conn, "Liao", "Heart rate 75").unwrap();

        assert!(edit_log_at(&conn, "Liao", 0, "Heart rate 70").unwrap());

        let entries = logs_for(&conn, "Liao").unwrap();
        assert_eq!(entries[0].content, "Heart rate 70");
        assert_eq!(entries[1].content, "Heart rate 75");
    }

    #[test]
    fn out_of_range_index_is_a_silent_noop() {
        let conn = open_memory_database().unwrap();
        append_history(&conn, "Liao", "note").unwrap();

        assert!(!edit_history_at(&conn, "Liao", 5, "changed").unwrap());
        assert!(!delete_history_at(&conn, "Liao", 5).unwrap());
        assert!(!edit_log_at(&conn, "Liao", 0, "changed").unwrap());
        assert!(!delete_log_at(&conn, "Liao", 0).unwrap());

        let entries = histories_for(&conn, "Liao").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "note");
    }

    #[test]
    fn unknown_patient_mutation_is_a_silent_noop() {
        let conn = open_memory_database().unwrap();
        assert!(!edit_history_at(&conn, "Nobody", 0, "x").unwrap());
        assert!(!delete_log_at(&conn, "Nobody", 0).unwrap());
        // No-op must not create the patient either
        assert!(roster(&conn).unwrap().is_empty());
    }

    #[test]
    fn double_homecare_submit_keeps_both_pending() {
        let conn = open_memory_database().unwrap();
        submit_homecare(&conn, "Liao", "knee pain").unwrap();
        submit_homecare(&conn, "Liao", "follow-up visit").unwrap();

        let pending = pending_homecare(&conn).unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending
            .iter()
            .all(|t| t.request.status == HomecareRequest::STATUS_PENDING));

        // Same-timestamp submits fall back to the id tiebreak: the
        // later insert is the current request
        let current = current_homecare(&conn, "Liao").unwrap().unwrap();
        assert_eq!(current.reason, "follow-up visit");
    }

    #[test]
    fn emergency_creates_patient_lazily_and_orders_desc() {
        let conn = open_memory_database().unwrap();
        add_emergency(&conn, "Patient C", "sudden BP spike").unwrap();
        add_emergency(&conn, "Patient C", "fainting reported").unwrap();

        assert_eq!(roster(&conn).unwrap(), vec!["Patient C".to_string()]);

        let events = all_emergencies(&conn).unwrap();
        assert_eq!(events.len(), 2);
        // Most recent first (id tiebreak on equal timestamps)
        assert_eq!(events[0].event.event, "fainting reported");
        assert_eq!(events[0].event.status, EmergencyEvent::STATUS_IN_PROGRESS);
    }

    #[test]
    fn aggregates_enumerate_the_live_roster() {
        let conn = open_memory_database().unwrap();
        append_history(&conn, "Liao", "note").unwrap();
        append_log(&conn, "Patient B", "BP 140/90").unwrap();

        let histories = all_histories(&conn).unwrap();
        let names: Vec<&str> = histories.iter().map(|p| p.patient.as_str()).collect();
        assert_eq!(names, vec!["Liao", "Patient B"]);

        // Patient B has no histories but still appears in the view
        assert!(histories[1].entries.is_empty());
        assert_eq!(all_logs(&conn).unwrap()[1].entries.len(), 1);
    }

    #[test]
    fn module_roster_includes_demographics_columns() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "Liao").unwrap();

        let assignments = module_roster(&conn).unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].patient.name, "Liao");
        assert_eq!(assignments[0].patient.blood_type, None);
        assert_eq!(assignments[0].modules, vec![Module::BASELINE.to_string()]);
    }
}
