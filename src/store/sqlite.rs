//! SQLite-backed execution store

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{ExecutionStore, NewExecution, StartOutcome};
use crate::error::AppError;
use crate::models::{
    CategoryExecutionState, CategoryId, CompetitionId, ExecutionId, ExecutionPatch,
    ExecutionStatus,
};

const SELECT_COLUMNS: &str = "id, category_id, competition_id, extracted_letter, participants, \
     scores, commission, classification, bracket, status, created_at, updated_at";

/// Execution rows in a single SQLite database.
///
/// The connection sits behind a mutex; every write runs in an immediate
/// transaction so other processes sharing the file serialize with us too.
pub struct SqliteExecutionStore {
    conn: Mutex<Connection>,
}

/// Column values as read, before JSON decoding
struct RawRow {
    id: i64,
    category_id: i64,
    competition_id: i64,
    extracted_letter: String,
    participants: String,
    scores: Option<String>,
    commission: Option<String>,
    classification: String,
    bracket: Option<String>,
    status: String,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawRow {
            id: row.get(0)?,
            category_id: row.get(1)?,
            competition_id: row.get(2)?,
            extracted_letter: row.get(3)?,
            participants: row.get(4)?,
            scores: row.get(5)?,
            commission: row.get(6)?,
            classification: row.get(7)?,
            bracket: row.get(8)?,
            status: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn decode(self) -> Result<CategoryExecutionState, AppError> {
        let status = ExecutionStatus::parse(&self.status).ok_or_else(|| {
            AppError::validation(format!(
                "Execution {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;
        Ok(CategoryExecutionState {
            id: self.id as u64,
            category_id: self.category_id as u64,
            competition_id: self.competition_id as u64,
            extracted_letter: self.extracted_letter,
            participants: serde_json::from_str(&self.participants)?,
            scores: self.scores.as_deref().map(serde_json::from_str).transpose()?,
            commission: self
                .commission
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            classification: serde_json::from_str(&self.classification)?,
            bracket: self.bracket.as_deref().map(serde_json::from_str).transpose()?,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl SqliteExecutionStore {
    /// Opens (or creates) the database file and its schema
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, AppError> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // a panic while holding the lock cannot leave a half-written row:
        // writes are transactional and roll back on drop
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn init_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS competitions (
            id INTEGER PRIMARY KEY,
            extracted_letter TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS category_executions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL,
            competition_id INTEGER NOT NULL,
            extracted_letter TEXT NOT NULL,
            participants TEXT NOT NULL,
            scores TEXT,
            commission TEXT,
            classification TEXT NOT NULL DEFAULT '[]',
            bracket TEXT,
            status TEXT NOT NULL,
            created_at TEXT,
            updated_at TEXT,
            UNIQUE (category_id, competition_id)
        );
        CREATE INDEX IF NOT EXISTS idx_category_executions_competition
            ON category_executions (competition_id);
        "#,
    )?;
    Ok(())
}

fn select_by_id(
    conn: &Connection,
    id: ExecutionId,
) -> Result<Option<CategoryExecutionState>, AppError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM category_executions WHERE id = ?1");
    conn.query_row(&sql, params![id as i64], RawRow::from_row)
        .optional()?
        .map(RawRow::decode)
        .transpose()
}

impl ExecutionStore for SqliteExecutionStore {
    #[instrument(
        skip(self, new),
        fields(category_id = new.category_id, competition_id = new.competition_id)
    )]
    fn start(&self, new: NewExecution) -> Result<StartOutcome, AppError> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = Utc::now().to_rfc3339();

        tx.execute(
            "INSERT INTO competitions (id, extracted_letter) VALUES (?1, ?2)
             ON CONFLICT(id) DO NOTHING",
            params![new.competition_id as i64, new.extracted_letter],
        )?;
        let letter: String = tx.query_row(
            "SELECT extracted_letter FROM competitions WHERE id = ?1",
            params![new.competition_id as i64],
            |row| row.get(0),
        )?;

        let inserted = tx.execute(
            "INSERT INTO category_executions (
                category_id, competition_id, extracted_letter, participants,
                scores, commission, classification, bracket, status, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, NULL, '[]', ?6, ?7, ?8, ?8)
             ON CONFLICT(category_id, competition_id) DO NOTHING",
            params![
                new.category_id as i64,
                new.competition_id as i64,
                letter,
                serde_json::to_string(&new.participants)?,
                new.scores.as_ref().map(serde_json::to_string).transpose()?,
                new.bracket.as_ref().map(serde_json::to_string).transpose()?,
                ExecutionStatus::Draft.as_str(),
                now,
            ],
        )?;
        let id: i64 = tx.query_row(
            "SELECT id FROM category_executions WHERE category_id = ?1 AND competition_id = ?2",
            params![new.category_id as i64, new.competition_id as i64],
            |row| row.get(0),
        )?;
        tx.commit()?;

        let created = inserted > 0;
        if created {
            info!(
                "Created category execution {}: participants={}, letter={}",
                id,
                new.participants.len(),
                letter
            );
        } else {
            debug!("Category execution {} already exists", id);
        }
        Ok(StartOutcome {
            id: id as u64,
            created,
        })
    }

    fn get(&self, id: ExecutionId) -> Result<CategoryExecutionState, AppError> {
        let conn = self.lock();
        select_by_id(&conn, id)?.ok_or_else(|| AppError::execution_not_found(id))
    }

    fn find(
        &self,
        category_id: CategoryId,
        competition_id: CompetitionId,
    ) -> Result<Option<CategoryExecutionState>, AppError> {
        let conn = self.lock();
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM category_executions
             WHERE category_id = ?1 AND competition_id = ?2"
        );
        conn.query_row(
            &sql,
            params![category_id as i64, competition_id as i64],
            RawRow::from_row,
        )
        .optional()?
        .map(RawRow::decode)
        .transpose()
    }

    #[instrument(skip(self, patch))]
    fn patch(
        &self,
        id: ExecutionId,
        patch: ExecutionPatch,
    ) -> Result<CategoryExecutionState, AppError> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut state = select_by_id(&tx, id)?.ok_or_else(|| AppError::execution_not_found(id))?;
        if patch.is_empty() {
            return Ok(state);
        }

        state.apply(patch);
        state.updated_at = Some(Utc::now().to_rfc3339());
        tx.execute(
            "UPDATE category_executions SET
                scores = ?2, commission = ?3, classification = ?4,
                bracket = ?5, status = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                id as i64,
                state.scores.as_ref().map(serde_json::to_string).transpose()?,
                state.commission.as_ref().map(serde_json::to_string).transpose()?,
                serde_json::to_string(&state.classification)?,
                state.bracket.as_ref().map(serde_json::to_string).transpose()?,
                state.status.as_str(),
                state.updated_at,
            ],
        )?;
        tx.commit()?;

        debug!("Patched category execution {}: status={}", id, state.status.as_str());
        Ok(state)
    }

    fn list_by_competition(
        &self,
        competition_id: CompetitionId,
    ) -> Result<Vec<CategoryExecutionState>, AppError> {
        let conn = self.lock();
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM category_executions
             WHERE competition_id = ?1 ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![competition_id as i64], RawRow::from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?.decode()?);
        }
        Ok(out)
    }

    fn competition_letter(
        &self,
        competition_id: CompetitionId,
    ) -> Result<Option<String>, AppError> {
        let conn = self.lock();
        let letter = conn
            .query_row(
                "SELECT extracted_letter FROM competitions WHERE id = ?1",
                params![competition_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(letter)
    }
}
