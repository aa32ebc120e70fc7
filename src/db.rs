//! Persistence for logged trainings.
//!
//! A single flat `trainings` table holds every recorded session. Rows are
//! appended one at a time and only ever deleted all at once per user.

mod schema;

pub use schema::*;

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// How many rows the recent-trainings listing returns
pub const DEFAULT_RECENT_LIMIT: u32 = 5;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Append one training row. Values are stored as given; the dialogue
    /// layer has already checked that the duration parses.
    pub fn insert_training(&self, training: &Training) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO trainings (user_id, date, type, duration) VALUES (?1, ?2, ?3, ?4)",
            params![
                training.user_id,
                training.date,
                training.kind,
                training.duration
            ],
        )?;
        Ok(())
    }

    /// Up to `limit` trainings for the user, newest date first.
    ///
    /// Dates are compared as text, so non-ISO inputs sort lexicographically
    /// rather than chronologically.
    pub fn recent_trainings(&self, user_id: i64, limit: u32) -> DbResult<Vec<Training>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, date, type, duration FROM trainings
             WHERE user_id = ?1 ORDER BY date DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![user_id, limit], |row| {
            Ok(Training {
                user_id: row.get(0)?,
                date: row.get(1)?,
                kind: row.get(2)?,
                duration: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Session count, total minutes, and per-kind counts for the user.
    ///
    /// A user with no rows gets all zeros and an empty breakdown. The
    /// breakdown order follows the group-by scan and is not part of the
    /// contract.
    pub fn training_stats(&self, user_id: i64) -> DbResult<TrainingStats> {
        let conn = self.conn.lock().unwrap();

        let (sessions, total_minutes) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration), 0) FROM trainings WHERE user_id = ?1",
            params![user_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt =
            conn.prepare("SELECT type, COUNT(*) FROM trainings WHERE user_id = ?1 GROUP BY type")?;
        let by_kind = stmt
            .query_map(params![user_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrainingStats {
            sessions,
            total_minutes,
            by_kind,
        })
    }

    /// Delete every training the user has recorded. Deleting from an empty
    /// history succeeds.
    pub fn clear_trainings(&self, user_id: i64) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM trainings WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
impl Database {
    /// Test hook to run arbitrary SQL, for breaking the schema under the
    /// store and putting it back.
    pub fn execute_raw(&self, sql: &str) {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql).unwrap();
    }
}
