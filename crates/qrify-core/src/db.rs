//! SQLite persistence for the action history.

use crate::{QrifyError, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use qrify_types::{HistoryRecord, NewHistoryRecord};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Records returned by a history query.
pub const HISTORY_LIMIT: usize = 10;

/// Append-only, SQLite-backed history store.
pub struct HistoryStore {
    conn: Mutex<Connection>,
}

impl HistoryStore {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create a store over an existing connection.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| QrifyError::StorePoisoned)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                action TEXT NOT NULL,
                input_text TEXT NOT NULL,
                output_text TEXT NOT NULL,
                color TEXT,
                size INTEGER,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_session_created
                ON history(session_id, created_at);
            "#,
        )?;
        Ok(())
    }

    /// Append a record. Every call inserts a new row.
    pub fn insert(&self, record: &NewHistoryRecord) -> Result<HistoryRecord> {
        let conn = self.lock()?;
        // Stamped under the lock so ids and timestamps increase together.
        let created_at = Utc::now().trunc_subsecs(6);
        conn.execute(
            r#"
            INSERT INTO history (
                session_id, action, input_text, output_text, color, size, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.session_id,
                record.action.as_str(),
                record.input_text,
                record.output_text,
                record.color,
                record.size,
                format_timestamp(&created_at),
            ],
        )?;
        let id = conn.last_insert_rowid();

        debug!(
            target: "qrify::store",
            "Recorded {} #{} for session {}",
            record.action, id, record.session_id
        );

        Ok(HistoryRecord {
            id,
            session_id: record.session_id.clone(),
            action: record.action,
            input_text: record.input_text.clone(),
            output_text: record.output_text.clone(),
            color: record.color.clone(),
            size: record.size,
            created_at,
        })
    }

    /// Up to `limit` records for a session, newest first.
    pub fn recent(&self, session_id: &str, limit: usize) -> Result<Vec<HistoryRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, session_id, action, input_text, output_text, color, size, created_at
            FROM history
            WHERE session_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#,
        )?;
        let records = stmt
            .query_map(params![session_id, limit as i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Number of records stored for a session.
    pub fn count(&self, session_id: &str) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM history WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<HistoryRecord> {
        let action: String = row.get("action")?;
        let created_at: String = row.get("created_at")?;

        Ok(HistoryRecord {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            action: action.parse().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
            })?,
            input_text: row.get("input_text")?,
            output_text: row.get("output_text")?,
            color: row.get("color")?,
            size: row.get("size")?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        7,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
        })
    }
}

/// Fixed-width RFC 3339 so that text order matches chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
