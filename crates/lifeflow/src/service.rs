//! Donor registration and search, in front of a [`DonorStore`].
//!
//! Every operation validates its input first; a form that fails validation
//! never reaches the store. Each accepted operation makes exactly one store
//! call.

use tracing::{error, info, instrument};

use crate::donor::Donor;
use crate::error::Result;
use crate::registration::RegistrationForm;
use crate::search::{SearchForm, SearchOutcome};
use crate::storage::{DonorStore, StoreStats};

/// Registration and search over a donor store.
#[derive(Debug)]
pub struct DonorService<S> {
    store: S,
}

impl<S: DonorStore> DonorService<S> {
    /// Create a service over `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new donor.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the form is incomplete or malformed
    /// (the store is not called), or the store's error if the insert fails.
    #[instrument(skip_all, fields(store = self.store.name()))]
    pub async fn register(&self, form: &RegistrationForm) -> Result<Donor> {
        let new_donor = form.validate()?;

        let donor = self.store.insert(&new_donor).await.map_err(|e| {
            error!("Registration failed: {e}");
            e
        })?;

        info!(
            id = donor.id,
            blood_group = %donor.blood_group,
            district = %donor.district,
            "Registered donor"
        );
        Ok(donor)
    }

    /// Find donors by blood group and district.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns a validation error if blood group or district is missing (the
    /// store is not called), or the store's error if the query fails.
    #[instrument(skip_all, fields(store = self.store.name()))]
    pub async fn search(&self, form: &SearchForm) -> Result<SearchOutcome> {
        let (query, urgency) = form.validate()?;

        let donors = self.store.search(&query).await.map_err(|e| {
            error!("Search failed: {e}");
            e
        })?;

        info!(
            blood_group = %query.blood_group,
            district = %query.district,
            %urgency,
            found = donors.len(),
            "Searched donors"
        );
        Ok(SearchOutcome {
            query,
            urgency,
            donors,
        })
    }

    /// Look up one donor, e.g. to contact them.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the lookup fails.
    pub async fn find(&self, id: i64) -> Result<Option<Donor>> {
        self.store.get(id).await
    }

    /// Summary figures about the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the figures cannot be read.
    pub async fn stats(&self) -> Result<StoreStats> {
        self.store.stats().await
    }
}
