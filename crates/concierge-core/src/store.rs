//! Persistent booking record store.
//!
//! The execution phase performs exactly one write here, at the
//! confirmation step; the planning phase creates the draft record the
//! execution phase later updates. [`BookingStore`] is the trait seam the
//! orchestrator depends on; [`SqliteBookingStore`] is the production
//! implementation, opening a connection per operation inside
//! `spawn_blocking` so the async caller never blocks on SQLite.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::{
    error::{Result, StoreResultExt, WorkflowError},
    models::BookingType,
};

/// A persisted booking record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    /// Record key, assigned by the intent-resolution service or generated
    pub id: String,
    /// Kind of booking
    pub booking_type: BookingType,
    /// Lifecycle status: `draft` after planning, `booked` after execution
    pub status: String,
    /// Display summary of the booked option
    pub summary: Option<String>,
    /// Price of the booked option
    pub price: Option<f64>,
    /// Creation timestamp (UTC)
    pub created_at: Timestamp,
    /// Last modification timestamp (UTC)
    pub updated_at: Timestamp,
}

impl std::fmt::Display for BookingRecord {
    /// Formats the record as markdown for terminal display.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# Booking {}", self.id)?;
        writeln!(f)?;
        writeln!(f, "**Kind**: {}", self.booking_type)?;
        writeln!(f, "**Status**: {}", self.status)?;
        if let Some(summary) = &self.summary {
            writeln!(f, "**Summary**: {summary}")?;
        }
        if let Some(price) = self.price {
            writeln!(f, "**Price**: ${price:.2}")?;
        }
        writeln!(f, "**Created**: {}", self.created_at)?;
        writeln!(f, "**Updated**: {}", self.updated_at)
    }
}

/// External collaborator holding booking records.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Creates a draft booking record. An existing record with the same
    /// ID is reset to a fresh draft.
    async fn create_booking(
        &self,
        id: &str,
        booking_type: BookingType,
        summary: Option<&str>,
    ) -> Result<BookingRecord>;

    /// Updates the status (and `updated_at`) of an existing record.
    async fn update_status(&self, booking_id: &str, status: &str) -> Result<()>;

    /// Fetches a record by ID.
    async fn get_booking(&self, booking_id: &str) -> Result<Option<BookingRecord>>;
}

/// SQLite-backed [`BookingStore`].
#[derive(Debug, Clone)]
pub struct SqliteBookingStore {
    db_path: PathBuf,
}

impl SqliteBookingStore {
    /// Creates a store at an explicit database path, creating parent
    /// directories as needed.
    pub fn at_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkflowError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(Self { db_path })
    }

    /// Creates a store at the XDG default path
    /// (`$XDG_DATA_HOME/concierge/bookings.db`).
    pub fn at_default_path() -> Result<Self> {
        let db_path = xdg::BaseDirectories::with_prefix("concierge")
            .place_data_file("bookings.db")
            .map_err(|e| WorkflowError::XdgDirectory(e.to_string()))?;
        Self::at_path(db_path)
    }

    async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    async fn create_booking(
        &self,
        id: &str,
        booking_type: BookingType,
        summary: Option<&str>,
    ) -> Result<BookingRecord> {
        let id = id.to_string();
        let summary = summary.map(str::to_string);
        self.with_database(move |db| db.create_booking(&id, booking_type, summary.as_deref()))
            .await
    }

    async fn update_status(&self, booking_id: &str, status: &str) -> Result<()> {
        let booking_id = booking_id.to_string();
        let status = status.to_string();
        self.with_database(move |db| db.update_status(&booking_id, &status))
            .await
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Option<BookingRecord>> {
        let booking_id = booking_id.to_string();
        self.with_database(move |db| db.get_booking(&booking_id))
            .await
    }
}

/// Database connection and operations handler.
struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection and initializes the schema.
    fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).store_context("Failed to open record store")?;
        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .store_context("Failed to initialize record store schema")
    }

    fn create_booking(
        &mut self,
        id: &str,
        booking_type: BookingType,
        summary: Option<&str>,
    ) -> Result<BookingRecord> {
        let now_str = Timestamp::now().to_string();

        // Re-planning the same booking resets the record to a fresh
        // draft; created_at is preserved from the first run.
        self.connection
            .execute(
                "INSERT INTO bookings (id, booking_type, status, summary, created_at, updated_at)
                 VALUES (?1, ?2, 'draft', ?3, ?4, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     booking_type = excluded.booking_type,
                     status = 'draft',
                     summary = excluded.summary,
                     price = NULL,
                     updated_at = excluded.updated_at",
                params![id, booking_type.as_str(), summary, &now_str],
            )
            .store_context("Failed to insert booking record")?;

        self.get_booking(id)?.ok_or_else(|| WorkflowError::BookingNotFound {
            id: id.to_string(),
        })
    }

    fn update_status(&mut self, booking_id: &str, status: &str) -> Result<()> {
        let now_str = Timestamp::now().to_string();
        let updated = self
            .connection
            .execute(
                "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status, &now_str, booking_id],
            )
            .store_context("Failed to update booking status")?;

        if updated == 0 {
            return Err(WorkflowError::BookingNotFound {
                id: booking_id.to_string(),
            });
        }
        Ok(())
    }

    fn get_booking(&self, booking_id: &str) -> Result<Option<BookingRecord>> {
        self.connection
            .query_row(
                "SELECT id, booking_type, status, summary, price, created_at, updated_at
                 FROM bookings WHERE id = ?1",
                params![booking_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<f64>>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()
            .store_context("Failed to read booking record")?
            .map(
                |(id, booking_type, status, summary, price, created_at, updated_at)| {
                    Ok(BookingRecord {
                        id,
                        booking_type: booking_type.parse().map_err(|e: String| {
                            WorkflowError::configuration(format!("Corrupt record: {e}"))
                        })?,
                        status,
                        summary,
                        price,
                        created_at: parse_timestamp(&created_at)?,
                        updated_at: parse_timestamp(&updated_at)?,
                    })
                },
            )
            .transpose()
    }
}

fn parse_timestamp(raw: &str) -> Result<Timestamp> {
    raw.parse()
        .map_err(|e| WorkflowError::configuration(format!("Corrupt timestamp in record: {e}")))
}
