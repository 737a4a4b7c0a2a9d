use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use super::DatabaseError;
use crate::models::{EmergencyEvent, HistoryEntry, HomecareRequest, LogEntry, Module, Patient};

/// Timestamp column format. Lexicographic order equals chronological
/// order, which the ORDER BY clauses below rely on.
pub(crate) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TS_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .unwrap_or_default()
}

// ═══════════════════════════════════════════
// Patient Repository
// ═══════════════════════════════════════════

pub fn find_patient_id(conn: &Connection, name: &str) -> Result<Option<i64>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id FROM patients WHERE name = ?1",
        params![name],
        |row| row.get::<_, i64>(0),
    );

    match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_patient(conn: &Connection, name: &str) -> Result<i64, DatabaseError> {
    conn.execute("INSERT INTO patients (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, blood_type, age, height, weight FROM patients ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Patient {
            id: row.get(0)?,
            name: row.get(1)?,
            blood_type: row.get(2)?,
            age: row.get(3)?,
            height: row.get(4)?,
            weight: row.get(5)?,
        })
    })?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

pub fn patient_names(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name FROM patients ORDER BY id")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut names = Vec::new();
    for row in rows {
        names.push(row?);
    }
    Ok(names)
}

// ═══════════════════════════════════════════
// Doctor Repository
// ═══════════════════════════════════════════

pub fn find_doctor_id(conn: &Connection, name: &str) -> Result<Option<i64>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id FROM doctors WHERE name = ?1",
        params![name],
        |row| row.get::<_, i64>(0),
    );

    match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_doctor(conn: &Connection, name: &str) -> Result<i64, DatabaseError> {
    conn.execute("INSERT INTO doctors (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

// ═══════════════════════════════════════════
// History Repository
// ═══════════════════════════════════════════

pub fn list_histories(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<HistoryEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, content, created_at, patient_id FROM histories
         WHERE patient_id = ?1 ORDER BY created_at ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i64>(3)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, content, created_at, patient_id) = row?;
        entries.push(HistoryEntry {
            id,
            content,
            created_at: parse_timestamp(&created_at),
            patient_id,
        });
    }
    Ok(entries)
}

/// Row ids of a patient's histories in display order. Positional
/// mutations resolve an index against this list and key the actual
/// UPDATE/DELETE by the stable id.
pub fn history_ids(conn: &Connection, patient_id: i64) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM histories WHERE patient_id = ?1 ORDER BY created_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![patient_id], |row| row.get::<_, i64>(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

pub fn insert_history(
    conn: &Connection,
    patient_id: i64,
    content: &str,
    at: NaiveDateTime,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO histories (content, created_at, patient_id) VALUES (?1, ?2, ?3)",
        params![content, format_timestamp(at), patient_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_history(conn: &Connection, id: i64, content: &str) -> Result<usize, DatabaseError> {
    let changed = conn.execute(
        "UPDATE histories SET content = ?1 WHERE id = ?2",
        params![content, id],
    )?;
    Ok(changed)
}

pub fn delete_history(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let changed = conn.execute("DELETE FROM histories WHERE id = ?1", params![id])?;
    Ok(changed)
}

// ═══════════════════════════════════════════
// Log Repository
// ═══════════════════════════════════════════

pub fn list_logs(conn: &Connection, patient_id: i64) -> Result<Vec<LogEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, content, recorded_at, patient_id FROM logs
         WHERE patient_id = ?1 ORDER BY recorded_at ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i64>(3)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, content, recorded_at, patient_id) = row?;
        entries.push(LogEntry {
            id,
            content,
            recorded_at: parse_timestamp(&recorded_at),
            patient_id,
        });
    }
    Ok(entries)
}

/// Row ids of a patient's logs in display order; see `history_ids`.
pub fn log_ids(conn: &Connection, patient_id: i64) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM logs WHERE patient_id = ?1 ORDER BY recorded_at ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![patient_id], |row| row.get::<_, i64>(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

pub fn insert_log(
    conn: &Connection,
    patient_id: i64,
    content: &str,
    at: NaiveDateTime,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO logs (content, recorded_at, patient_id) VALUES (?1, ?2, ?3)",
        params![content, format_timestamp(at), patient_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_log(conn: &Connection, id: i64, content: &str) -> Result<usize, DatabaseError> {
    let changed = conn.execute(
        "UPDATE logs SET content = ?1 WHERE id = ?2",
        params![content, id],
    )?;
    Ok(changed)
}

pub fn delete_log(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    let changed = conn.execute("DELETE FROM logs WHERE id = ?1", params![id])?;
    Ok(changed)
}

// ═══════════════════════════════════════════
// Homecare Repository
// ═══════════════════════════════════════════

pub fn insert_homecare(
    conn: &Connection,
    patient_id: i64,
    reason: &str,
    at: NaiveDateTime,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO homecare_requests (reason, status, requested_at, patient_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            reason,
            HomecareRequest::STATUS_PENDING,
            format_timestamp(at),
            patient_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The patient's most recent request, or None. Requests are never
/// deduped, so several pending rows can coexist; the latest one wins.
pub fn current_homecare(
    conn: &Connection,
    patient_id: i64,
) -> Result<Option<HomecareRequest>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, reason, status, requested_at, patient_id FROM homecare_requests
         WHERE patient_id = ?1 ORDER BY requested_at DESC, id DESC LIMIT 1",
        params![patient_id],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        },
    );

    match result {
        Ok((id, reason, status, requested_at, patient_id)) => Ok(Some(HomecareRequest {
            id,
            reason,
            status,
            requested_at: parse_timestamp(&requested_at),
            patient_id,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ═══════════════════════════════════════════
// Emergency Repository
// ═══════════════════════════════════════════

pub fn insert_emergency(
    conn: &Connection,
    patient_id: i64,
    event: &str,
    at: NaiveDateTime,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO emergency_events (event, status, occurred_at, patient_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            event,
            EmergencyEvent::STATUS_IN_PROGRESS,
            format_timestamp(at),
            patient_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ═══════════════════════════════════════════
// Module Repository
// ═══════════════════════════════════════════

pub fn list_modules(conn: &Connection, patient_id: i64) -> Result<Vec<Module>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, patient_id FROM modules WHERE patient_id = ?1 ORDER BY id",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(Module {
            id: row.get(0)?,
            name: row.get(1)?,
            patient_id: row.get(2)?,
        })
    })?;

    let mut modules = Vec::new();
    for row in rows {
        modules.push(row?);
    }
    Ok(modules)
}

pub fn insert_module(
    conn: &Connection,
    patient_id: i64,
    name: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO modules (name, patient_id) VALUES (?1, ?2)",
        params![name, patient_id],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn patient_lookup_roundtrip() {
        let conn = open_memory_database().unwrap();
        assert_eq!(find_patient_id(&conn, "Liao").unwrap(), None);

        let id = insert_patient(&conn, "Liao").unwrap();
        assert_eq!(find_patient_id(&conn, "Liao").unwrap(), Some(id));
        assert_eq!(patient_names(&conn).unwrap(), vec!["Liao".to_string()]);
    }

    #[test]
    fn duplicate_patient_name_rejected() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, "Liao").unwrap();
        assert!(insert_patient(&conn, "Liao").is_err());
    }

    #[test]
    fn histories_ordered_by_creation_time() {
        let conn = open_memory_database().unwrap();
        let pid = insert_patient(&conn, "Liao").unwrap();

        insert_history(&conn, pid, "second", ts(2, 9)).unwrap();
        insert_history(&conn, pid, "first", ts(1, 9)).unwrap();
        insert_history(&conn, pid, "third", ts(3, 9)).unwrap();

        let entries = list_histories(&conn, pid).unwrap();
        let contents: Vec<&str> = entries.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);

        let ids = history_ids(&conn, pid).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], entries[0].id);
    }

    #[test]
    fn equal_timestamps_break_ties_by_id() {
        let conn = open_memory_database().unwrap();
        let pid = insert_patient(&conn, "Liao").unwrap();

        insert_log(&conn, pid, "earlier insert", ts(1, 9)).unwrap();
        insert_log(&conn, pid, "later insert", ts(1, 9)).unwrap();

        let entries = list_logs(&conn, pid).unwrap();
        assert_eq!(entries[0].content, "earlier insert");
        assert_eq!(entries[1].content, "later insert");
    }

    #[test]
    fn update_and_delete_report_changed_rows() {
        let conn = open_memory_database().unwrap();
        let pid = insert_patient(&conn, "Liao").unwrap();
        let id = insert_history(&conn, pid, "note", ts(1, 9)).unwrap();

        assert_eq!(update_history(&conn, id, "revised").unwrap(), 1);
        assert_eq!(update_history(&conn, 9999, "revised").unwrap(), 0);

        assert_eq!(delete_history(&conn, id).unwrap(), 1);
        assert_eq!(delete_history(&conn, id).unwrap(), 0);
        assert!(list_histories(&conn, pid).unwrap().is_empty());
    }

    #[test]
    fn current_homecare_is_latest_request() {
        let conn = open_memory_database().unwrap();
        let pid = insert_patient(&conn, "Liao").unwrap();
        assert!(current_homecare(&conn, pid).unwrap().is_none());

        insert_homecare(&conn, pid, "knee pain", ts(1, 12)).unwrap();
        insert_homecare(&conn, pid, "follow-up visit", ts(2, 12)).unwrap();

        let current = current_homecare(&conn, pid).unwrap().unwrap();
        assert_eq!(current.reason, "follow-up visit");
        assert_eq!(current.status, HomecareRequest::STATUS_PENDING);
    }

    #[test]
    fn emergency_insert_uses_default_status() {
        let conn = open_memory_database().unwrap();
        let pid = insert_patient(&conn, "Liao").unwrap();
        insert_emergency(&conn, pid, "sudden BP spike", ts(1, 9)).unwrap();

        let status: String = conn
            .query_row("SELECT status FROM emergency_events", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, EmergencyEvent::STATUS_IN_PROGRESS);
    }

    #[test]
    fn deleting_patient_cascades_to_records() {
        let conn = open_memory_database().unwrap();
        let pid = insert_patient(&conn, "Liao").unwrap();
        insert_history(&conn, pid, "note", ts(1, 9)).unwrap();
        insert_log(&conn, pid, "Heart rate 72", ts(1, 9)).unwrap();
        insert_homecare(&conn, pid, "reason", ts(1, 9)).unwrap();
        insert_emergency(&conn, pid, "event", ts(1, 9)).unwrap();
        insert_module(&conn, pid, Module::BASELINE).unwrap();

        conn.execute("DELETE FROM patients WHERE id = ?1", params![pid])
            .unwrap();

        for table in [
            "histories",
            "logs",
            "homecare_requests",
            "emergency_events",
            "modules",
        ] {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(count, 0, "{table} should cascade");
        }
    }

    #[test]
    fn timestamp_round_trip() {
        let at = ts(5, 14);
        assert_eq!(parse_timestamp(&format_timestamp(at)), at);
        // ISO "T" separator also accepted
        assert_eq!(parse_timestamp("2024-09-05T14:00:00"), at);
    }
}
