//! `SQLite`-backed donor store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::donor::{BloodGroup, Donor, NewDonor, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::search::DonorQuery;

use super::{migrations, DonorStore, StoreStats};

const SELECT_COLUMNS: &str = "SELECT id, full_name, blood_group, mobile_number, district, \
     last_donation_date, has_whatsapp, created_at FROM donors";

/// Donor store in a local `SQLite` database.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a donor database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store, used by tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("database connection lock poisoned"))
    }

    /// Count donors in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM donors", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn row_to_donor(row: &rusqlite::Row) -> rusqlite::Result<Donor> {
        let blood_group: String = row.get(2)?;
        let last_donation: Option<String> = row.get(5)?;
        let created_at: String = row.get(7)?;

        let blood_group = blood_group
            .parse::<BloodGroup>()
            .map_err(|e| conversion_error(2, e.to_string()))?;
        let last_donation_date = last_donation
            .map(|text| NaiveDate::parse_from_str(&text, DATE_FORMAT))
            .transpose()
            .map_err(|e| conversion_error(5, e.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_error(7, e.to_string()))?;

        Ok(Donor {
            id: row.get(0)?,
            full_name: row.get(1)?,
            blood_group,
            mobile_number: row.get(3)?,
            district: row.get(4)?,
            last_donation_date,
            has_whatsapp: row.get(6)?,
            created_at,
        })
    }
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

/// Timestamps are stored at fixed precision so text order is time order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl DonorStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, donor: &NewDonor) -> Result<Donor> {
        let created_at = Utc::now();
        let conn = self.conn()?;

        conn.execute(
            r"
            INSERT INTO donors (full_name, blood_group, mobile_number, district,
                                last_donation_date, has_whatsapp, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                donor.full_name,
                donor.blood_group.as_str(),
                donor.mobile_number,
                donor.district,
                donor
                    .last_donation_date
                    .map(|date| date.format(DATE_FORMAT).to_string()),
                donor.has_whatsapp,
                format_timestamp(created_at),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted donor with id {}", id);

        // read back so the caller sees exactly what was stored
        let stored = conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [id],
            Self::row_to_donor,
        )?;
        Ok(stored)
    }

    async fn search(&self, query: &DonorQuery) -> Result<Vec<Donor>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE blood_group = ?1 AND district = ?2 \
             ORDER BY created_at DESC, id DESC"
        ))?;

        let donors = stmt
            .query_map(
                params![query.blood_group.as_str(), query.district],
                Self::row_to_donor,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "Found {} donors for {} in {}",
            donors.len(),
            query.blood_group,
            query.district
        );
        Ok(donors)
    }

    async fn get(&self, id: i64) -> Result<Option<Donor>> {
        let result = self
            .conn()?
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                Self::row_to_donor,
            )
            .optional()?;
        Ok(result)
    }

    async fn stats(&self) -> Result<StoreStats> {
        let total_donors = self.count()?;

        let newest: Option<String> = self
            .conn()?
            .query_row(
                "SELECT created_at FROM donors ORDER BY created_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let newest_registration = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(StoreStats {
            backend: self.name(),
            location: self.path.display().to_string(),
            total_donors,
            newest_registration,
        })
    }
}
