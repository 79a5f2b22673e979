//! Database module - SQLite storage for the application state
//!
//! `app_state` holds a single row with profile, program, scoring and timer
//! as JSON columns. `sessions` is the append-only history.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::state::{AppState, HistoryEntry, StateError};

/// Database wrapper
pub struct Database {
    conn: Connection,
}

fn parse_column<T: DeserializeOwned>(name: &str, json: &str) -> Result<T, StateError> {
    serde_json::from_str(json)
        .map_err(|e| StateError::InvalidData(format!("{} column: {}", name, e)))
}

fn parse_enum<T: DeserializeOwned>(value: &str) -> Result<T, StateError> {
    parse_column("sessions", &format!("\"{}\"", value))
}

fn write_snapshot(conn: &Connection, state: &AppState) -> Result<()> {
    let program = state
        .program
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT OR REPLACE INTO app_state (id, profile, program, scoring, timer, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        params![
            serde_json::to_string(&state.profile)?,
            program,
            serde_json::to_string(&state.scoring)?,
            serde_json::to_string(&state.timer)?,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn insert_session(conn: &Connection, entry: &HistoryEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO sessions (date, day_label, focus, goal, mode, completion, intensity, rating, readiness, summary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            entry.date.to_rfc3339(),
            entry.day_label,
            entry.focus.label(),
            entry.goal.as_str(),
            entry.mode.as_str(),
            entry.completion,
            entry.intensity.as_str(),
            entry.rating,
            entry.readiness,
            entry.summary,
        ],
    )?;
    Ok(())
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS app_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                profile TEXT NOT NULL,
                program TEXT,
                scoring TEXT NOT NULL,
                timer TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                day_label TEXT NOT NULL,
                focus TEXT NOT NULL,
                goal TEXT NOT NULL,
                mode TEXT NOT NULL,
                completion REAL NOT NULL,
                intensity TEXT NOT NULL,
                rating INTEGER NOT NULL,
                readiness INTEGER NOT NULL,
                summary TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Write everything except history (see `add_session`)
    pub fn save_state(&self, state: &AppState) -> Result<()> {
        write_snapshot(&self.conn, state)?;
        debug!("state saved");
        Ok(())
    }

    /// Add a history record
    pub fn add_session(&self, entry: &HistoryEntry) -> Result<i64> {
        insert_session(&self.conn, entry)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append a logged session and save the state it produced, atomically
    pub fn record_session(&mut self, state: &AppState, entry: &HistoryEntry) -> Result<()> {
        let tx = self.conn.transaction()?;
        insert_session(&tx, entry)?;
        write_snapshot(&tx, state)?;
        tx.commit()?;
        debug!(day = %entry.day_label, "session recorded");
        Ok(())
    }

    /// History in logging order (oldest first)
    pub fn get_sessions(&self) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, day_label, focus, goal, mode, completion, intensity, rating, readiness, summary
             FROM sessions ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, u8>(7)?,
                    row.get::<_, u8>(8)?,
                    row.get::<_, String>(9)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut sessions = Vec::with_capacity(rows.len());
        for (date, day_label, focus, goal, mode, completion, intensity, rating, readiness, summary) in rows {
            let date = DateTime::parse_from_rfc3339(&date)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| StateError::InvalidData(format!("session date: {}", e)))?;
            sessions.push(HistoryEntry {
                date,
                day_label,
                focus: parse_enum(&focus)?,
                goal: parse_enum(&goal)?,
                mode: parse_enum(&mode)?,
                completion,
                intensity: parse_enum(&intensity)?,
                rating,
                readiness,
                summary,
            });
        }
        Ok(sessions)
    }

    /// Load the full state tree. `None` on a fresh database.
    ///
    /// Corrupt rows are an error; callers keep whatever state they had.
    pub fn load_state(&self) -> Result<Option<AppState>> {
        let row = self
            .conn
            .query_row(
                "SELECT profile, program, scoring, timer FROM app_state WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((profile, program, scoring, timer)) = row else {
            return Ok(None);
        };

        let state = AppState {
            profile: parse_column("profile", &profile)?,
            program: program.map(|p| parse_column("program", &p)).transpose()?,
            scoring: parse_column("scoring", &scoring)?,
            timer: parse_column("timer", &timer)?,
            history: self.get_sessions()?,
        };
        state.validate()?;
        Ok(Some(state))
    }

    /// Wipe everything (full reset)
    pub fn clear(&self) -> Result<()> {
        self.conn.execute_batch("DELETE FROM app_state; DELETE FROM sessions;")?;
        Ok(())
    }

    /// Replace the stored state wholesale (import)
    pub fn replace_state(&mut self, state: &AppState) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch("DELETE FROM app_state; DELETE FROM sessions;")?;
        write_snapshot(&tx, state)?;
        for entry in &state.history {
            insert_session(&tx, entry)?;
        }
        tx.commit()?;
        info!(sessions = state.history.len(), "state replaced");
        Ok(())
    }
}
