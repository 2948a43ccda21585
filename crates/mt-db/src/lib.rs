//! Storage layer for the medication tracker.
//!
//! Provides persistence for users, medications and dose logs using `rusqlite`.
//!
//! # Connections
//!
//! [`Database`] holds only the path to the database file. Every operation
//! opens its own `rusqlite::Connection`, runs one statement or query, and
//! drops the connection before returning. No transaction spans two calls.
//! Concurrent writers from separate processes are not coordinated.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! `created_date` and `timestamp` columns hold RFC 3339 local time with
//! offset (e.g., `2025-03-14T08:05:00+01:00`). `dose_logs.date` holds the
//! local calendar date as `YYYY-MM-DD`, so SQLite's `date()` compares it
//! directly.
//!
//! ## Scheduled Times
//!
//! `medications.times` stores the ordered `HH:MM` list as a JSON array.
//!
//! ## References
//!
//! `medications.user_id` and `dose_logs.user_id` declare foreign keys to
//! `users.id` without cascading, and enforcement is left off: orphan rows are
//! accepted. Dose logs reference medications by name only.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use mt_core::{
    DoseLog, DoseLogId, DoseLogRecord, Medication, MedicationId, MedicationRecord, Repository,
    UserId, UserRecord, adherence_percentage,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The directory holding the database file could not be created.
    #[error("failed to create database directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to encode a medication's scheduled times.
    #[error("failed to encode scheduled times: {0}")]
    TimesEncode(#[source] serde_json::Error),
    /// A stored `times` column is not a JSON array of strings.
    #[error("invalid scheduled times for medication {medication_id}: {value}")]
    TimesDecode {
        medication_id: i64,
        value: String,
        #[source]
        source: serde_json::Error,
    },
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp in {table} row {id}: {value}")]
    TimestampParse {
        table: &'static str,
        id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Failed to parse a stored dose log date.
    #[error("invalid date for dose log {id}: {value}")]
    DateParse {
        id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Handle to the on-disk database.
///
/// See the [module documentation](self) for connection handling.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// Missing parent directories are created, and the schema is initialized
    /// on every open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let db = Self {
            path: path.to_path_buf(),
        };
        db.init()?;
        tracing::debug!(path = %db.path.display(), "database ready");
        Ok(db)
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, DbError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        let conn = self.connect()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                age INTEGER,
                created_date TEXT
            );

            -- times: JSON array of HH:MM strings
            CREATE TABLE IF NOT EXISTS medications (
                id INTEGER PRIMARY KEY,
                user_id INTEGER,
                name TEXT NOT NULL,
                dosage TEXT NOT NULL,
                frequency TEXT NOT NULL,
                times TEXT NOT NULL,
                active BOOLEAN DEFAULT 1,
                created_date TEXT,
                FOREIGN KEY (user_id) REFERENCES users (id)
            );

            -- date: local calendar date (YYYY-MM-DD)
            CREATE TABLE IF NOT EXISTS dose_logs (
                id INTEGER PRIMARY KEY,
                user_id INTEGER,
                medication_name TEXT,
                scheduled_time TEXT,
                taken BOOLEAN,
                actual_time TEXT,
                date TEXT,
                timestamp TEXT,
                FOREIGN KEY (user_id) REFERENCES users (id)
            );
            ",
        )?;
        Ok(())
    }

    /// Inserts a user and returns its ID.
    pub fn create_user(&self, name: &str, age: Option<u32>) -> Result<UserId, DbError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO users (name, age, created_date) VALUES (?, ?, ?)",
            params![name, age, format_timestamp(Local::now())],
        )?;
        let id = UserId::new(conn.last_insert_rowid());
        tracing::debug!(%id, name, "user created");
        Ok(id)
    }

    /// Looks up a user by ID.
    pub fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, DbError> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT id, name, age, created_date FROM users WHERE id = ?",
                [id.get()],
                UserRow::from_row,
            )
            .optional()?;
        row.map(UserRow::into_record).transpose()
    }

    /// Lists all users ordered by ID.
    pub fn list_users(&self) -> Result<Vec<UserRecord>, DbError> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT id, name, age, created_date FROM users ORDER BY id ASC")?;
        let rows = stmt.query_map([], UserRow::from_row)?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row?.into_record()?);
        }
        Ok(users)
    }

    /// Inserts an active medication for a user and returns its ID.
    ///
    /// The user ID is not checked.
    pub fn create_medication(
        &self,
        user_id: UserId,
        medication: &Medication,
    ) -> Result<MedicationId, DbError> {
        let times = serde_json::to_string(&medication.times).map_err(DbError::TimesEncode)?;
        let conn = self.connect()?;
        conn.execute(
            "
            INSERT INTO medications
            (user_id, name, dosage, frequency, times, created_date)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
            params![
                user_id.get(),
                medication.name,
                medication.dosage,
                medication.frequency,
                times,
                format_timestamp(medication.created_date),
            ],
        )?;
        let id = MedicationId::new(conn.last_insert_rowid());
        tracing::debug!(%id, %user_id, name = %medication.name, "medication created");
        Ok(id)
    }

    /// Lists a user's active medications ordered by ID.
    pub fn list_active_medications(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MedicationRecord>, DbError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "
            SELECT id, user_id, name, dosage, frequency, times, active, created_date
            FROM medications
            WHERE user_id = ? AND active = 1
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([user_id.get()], |row| {
            Ok(MedicationRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                dosage: row.get(3)?,
                frequency: row.get(4)?,
                times: row.get(5)?,
                active: row.get(6)?,
                created_date: row.get(7)?,
            })
        })?;
        let mut medications = Vec::new();
        for row in rows {
            medications.push(row?.into_record()?);
        }
        Ok(medications)
    }

    /// Marks a medication inactive. Returns `false` if the ID is unknown.
    pub fn deactivate_medication(&self, id: MedicationId) -> Result<bool, DbError> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE medications SET active = 0 WHERE id = ?",
            [id.get()],
        )?;
        tracing::debug!(%id, updated, "medication deactivated");
        Ok(updated > 0)
    }

    /// Inserts a dose log for a user and returns its ID.
    ///
    /// Neither the user ID nor the medication name is checked.
    pub fn create_dose_log(&self, user_id: UserId, log: &DoseLog) -> Result<DoseLogId, DbError> {
        let conn = self.connect()?;
        conn.execute(
            "
            INSERT INTO dose_logs
            (user_id, medication_name, scheduled_time, taken, actual_time, date, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                user_id.get(),
                log.medication_name,
                log.scheduled_time,
                log.taken,
                log.actual_time,
                log.date.format("%Y-%m-%d").to_string(),
                format_timestamp(log.timestamp),
            ],
        )?;
        let id = DoseLogId::new(conn.last_insert_rowid());
        tracing::debug!(%id, %user_id, medication = %log.medication_name, taken = log.taken, "dose logged");
        Ok(id)
    }

    /// Lists a user's dose logs in insertion order.
    pub fn list_dose_logs(&self, user_id: UserId) -> Result<Vec<DoseLogRecord>, DbError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "
            SELECT id, user_id, medication_name, scheduled_time, taken, actual_time, date, timestamp
            FROM dose_logs
            WHERE user_id = ?
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([user_id.get()], |row| {
            Ok(DoseLogRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                medication_name: row.get(2)?,
                scheduled_time: row.get(3)?,
                taken: row.get(4)?,
                actual_time: row.get(5)?,
                date: row.get(6)?,
                timestamp: row.get(7)?,
            })
        })?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?.into_record()?);
        }
        Ok(logs)
    }

    /// Adherence over the trailing `days` days, by SQLite's local clock.
    ///
    /// Counts every dose log dated at most `days` whole days before today in
    /// a single query. Returns `0.0` when no rows match.
    pub fn adherence_rate(&self, user_id: UserId, days: u32) -> Result<f64, DbError> {
        let conn = self.connect()?;
        // Day arithmetic on julian numbers stays valid past SQLite's date range.
        let (total, taken): (i64, i64) = conn.query_row(
            "
            SELECT COUNT(*), COALESCE(SUM(taken), 0)
            FROM dose_logs
            WHERE user_id = ?1
              AND CAST(julianday(date('now', 'localtime')) - julianday(date) AS INTEGER) <= ?2
            ",
            params![user_id.get(), i64::from(days)],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        tracing::debug!(%user_id, days, total, taken, "adherence counted");
        Ok(adherence_percentage(
            usize::try_from(taken).unwrap_or_default(),
            usize::try_from(total).unwrap_or_default(),
        ))
    }
}

impl Repository for Database {
    type Error = DbError;

    fn create_user(&self, name: &str, age: Option<u32>) -> Result<UserId, DbError> {
        Self::create_user(self, name, age)
    }

    fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, DbError> {
        Self::get_user(self, id)
    }

    fn list_users(&self) -> Result<Vec<UserRecord>, DbError> {
        Self::list_users(self)
    }

    fn create_medication(
        &self,
        user_id: UserId,
        medication: &Medication,
    ) -> Result<MedicationId, DbError> {
        Self::create_medication(self, user_id, medication)
    }

    fn list_active_medications(&self, user_id: UserId) -> Result<Vec<MedicationRecord>, DbError> {
        Self::list_active_medications(self, user_id)
    }

    fn deactivate_medication(&self, id: MedicationId) -> Result<bool, DbError> {
        Self::deactivate_medication(self, id)
    }

    fn create_dose_log(&self, user_id: UserId, log: &DoseLog) -> Result<DoseLogId, DbError> {
        Self::create_dose_log(self, user_id, log)
    }

    fn list_dose_logs(&self, user_id: UserId) -> Result<Vec<DoseLogRecord>, DbError> {
        Self::list_dose_logs(self, user_id)
    }

    fn adherence_rate(&self, user_id: UserId, days: u32) -> Result<f64, DbError> {
        Self::adherence_rate(self, user_id, days)
    }
}

#[derive(Debug)]
struct UserRow {
    id: i64,
    name: String,
    age: Option<u32>,
    created_date: String,
}

impl UserRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            created_date: row.get(3)?,
        })
    }

    fn into_record(self) -> Result<UserRecord, DbError> {
        Ok(UserRecord {
            id: UserId::new(self.id),
            created_date: parse_timestamp(&self.created_date, "users", self.id)?,
            name: self.name,
            age: self.age,
        })
    }
}

#[derive(Debug)]
struct MedicationRow {
    id: i64,
    user_id: i64,
    name: String,
    dosage: String,
    frequency: String,
    times: String,
    active: bool,
    created_date: String,
}

impl MedicationRow {
    fn into_record(self) -> Result<MedicationRecord, DbError> {
        let times: Vec<String> =
            serde_json::from_str(&self.times).map_err(|source| DbError::TimesDecode {
                medication_id: self.id,
                value: self.times.clone(),
                source,
            })?;
        Ok(MedicationRecord {
            id: MedicationId::new(self.id),
            user_id: UserId::new(self.user_id),
            medication: Medication {
                created_date: parse_timestamp(&self.created_date, "medications", self.id)?,
                name: self.name,
                dosage: self.dosage,
                frequency: self.frequency,
                times,
                active: self.active,
            },
        })
    }
}

#[derive(Debug)]
struct DoseLogRow {
    id: i64,
    user_id: i64,
    medication_name: String,
    scheduled_time: String,
    taken: bool,
    actual_time: String,
    date: String,
    timestamp: String,
}

impl DoseLogRow {
    fn into_record(self) -> Result<DoseLogRecord, DbError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|source| {
            DbError::DateParse {
                id: self.id,
                value: self.date.clone(),
                source,
            }
        })?;
        Ok(DoseLogRecord {
            id: DoseLogId::new(self.id),
            user_id: UserId::new(self.user_id),
            log: DoseLog {
                timestamp: parse_timestamp(&self.timestamp, "dose_logs", self.id)?,
                medication_name: self.medication_name,
                scheduled_time: self.scheduled_time,
                taken: self.taken,
                actual_time: self.actual_time,
                date,
            },
        })
    }
}

fn parse_timestamp(value: &str, table: &'static str, id: i64) -> Result<DateTime<Local>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Local))
        .map_err(|source| DbError::TimestampParse {
            table,
            id,
            value: value.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Local>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
