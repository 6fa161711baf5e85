//! Storage layer for lifeflow.
//!
//! Donors live in a single `donors` table. Two stores implement
//! [`DonorStore`]:
//!
//! - [`SqliteStore`]: a local `SQLite` file, the default.
//! - [`RestStore`]: a managed Postgres table reached over its REST interface.
//!
//! A store only ever inserts donors and reads them back; nothing is updated
//! or deleted.

pub mod migrations;
pub mod rest;
pub mod schema;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{Backend, Config};
use crate::donor::{Donor, NewDonor};
use crate::error::Result;
use crate::search::DonorQuery;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

/// Persistence for donor records.
#[async_trait]
pub trait DonorStore: Send + Sync {
    /// Short name of the backend, for status output and logs.
    fn name(&self) -> &'static str;

    /// Insert one donor and return the stored record.
    async fn insert(&self, donor: &NewDonor) -> Result<Donor>;

    /// Donors matching both columns of `query`, newest registration first.
    async fn search(&self, query: &DonorQuery) -> Result<Vec<Donor>>;

    /// Look up a single donor.
    async fn get(&self, id: i64) -> Result<Option<Donor>>;

    /// Summary figures about the stored donors.
    async fn stats(&self) -> Result<StoreStats>;
}

#[async_trait]
impl<S: DonorStore + ?Sized> DonorStore for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn insert(&self, donor: &NewDonor) -> Result<Donor> {
        (**self).insert(donor).await
    }

    async fn search(&self, query: &DonorQuery) -> Result<Vec<Donor>> {
        (**self).search(query).await
    }

    async fn get(&self, id: i64) -> Result<Option<Donor>> {
        (**self).get(id).await
    }

    async fn stats(&self) -> Result<StoreStats> {
        (**self).stats().await
    }
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Backend name.
    pub backend: &'static str,
    /// Database file path or table URL.
    pub location: String,
    /// Total number of registered donors.
    pub total_donors: u64,
    /// When the most recent donor registered.
    pub newest_registration: Option<DateTime<Utc>>,
}

/// Open the store selected by the configuration.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the HTTP client
/// cannot be built.
pub fn open_store(config: &Config) -> Result<Box<dyn DonorStore>> {
    match config.storage.backend {
        Backend::Sqlite => Ok(Box::new(SqliteStore::open(config.database_path())?)),
        Backend::Remote => Ok(Box::new(RestStore::new(
            &config.remote,
            config.remote_timeout(),
        )?)),
    }
}
