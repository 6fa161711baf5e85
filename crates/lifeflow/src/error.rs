//! Error types for lifeflow.
//!
//! This module defines all error types used throughout the lifeflow crate,
//! along with the user-facing notices shown when an operation fails.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;

/// Description shown for any failure that is not an input problem.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// The main error type for lifeflow operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Remote Table Errors ===
    /// The HTTP request to the managed database failed.
    #[error("request to remote database failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The managed database rejected the request.
    #[error("remote database returned {status}: {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Validation Errors ===
    /// One or more required form fields were left blank.
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields {
        /// Which form was being submitted.
        form: Form,
        /// Human-readable names of the blank fields.
        fields: Vec<&'static str>,
    },

    /// A form field was present but could not be understood.
    #[error("invalid {field}: {message}")]
    InvalidField {
        /// Human-readable field name.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    // === Contact Errors ===
    /// The donor did not register a WhatsApp number.
    #[error("donor {donor_id} is not reachable on WhatsApp")]
    WhatsAppUnavailable {
        /// The donor's identifier.
        donor_id: i64,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for lifeflow operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

/// The form a validation error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// Donor registration.
    Registration,
    /// Donor search.
    Search,
}

/// A short user-facing notification: a title plus one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Headline, e.g. "Missing Information".
    pub title: String,
    /// Explanation shown under the title.
    pub description: String,
}

impl Notice {
    /// Create a notice from a title and description.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Check if this error was caused by user input rather than a failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingFields { .. } | Self::InvalidField { .. } | Self::WhatsAppUnavailable { .. }
        )
    }

    /// Level the detailed error is logged at when an action fails.
    #[must_use]
    pub fn log_level(&self) -> Level {
        if self.is_validation() {
            Level::DEBUG
        } else {
            Level::ERROR
        }
    }

    /// Map this error to the notice shown to the user.
    ///
    /// Input problems are explained; every other failure collapses into a
    /// generic message, titled after the action that failed.
    #[must_use]
    pub fn notice(&self, action: &str) -> Notice {
        match self {
            Self::MissingFields {
                form: Form::Registration,
                fields,
            } => Notice::new(
                "Missing Information",
                format!(
                    "Please fill in all required fields ({}).",
                    fields.join(", ")
                ),
            ),
            Self::MissingFields {
                form: Form::Search, ..
            } => Notice::new(
                "Missing Information",
                "Please select both blood group and district.",
            ),
            Self::InvalidField { field, message } => {
                Notice::new("Invalid Information", format!("{field}: {message}"))
            }
            Self::WhatsAppUnavailable { .. } => Notice::new(
                "WhatsApp Unavailable",
                "This donor has not registered a WhatsApp number. Try calling instead.",
            ),
            _ => Notice::new(format!("{action} Failed"), GENERIC_FAILURE),
        }
    }
}
