//! `lifeflow` - Blood donor registry
//!
//! This library provides donor registration, donor search by blood group and
//! district, donation eligibility, and contact links, over either a local
//! `SQLite` file or a managed database reached through its REST interface.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod contact;
pub mod donor;
pub mod error;
pub mod logging;
pub mod registration;
pub mod search;
pub mod service;
pub mod storage;

pub use config::Config;
pub use donor::{BloodGroup, Donor, NewDonor};
pub use error::{Error, Notice, Result};
pub use logging::init_logging;
pub use registration::RegistrationForm;
pub use search::{SearchForm, SearchOutcome};
pub use service::DonorService;
pub use storage::{open_store, DonorStore, RestStore, SqliteStore, StoreStats};
