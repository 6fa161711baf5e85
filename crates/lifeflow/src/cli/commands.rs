//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::registration::RegistrationForm;
use crate::search::SearchForm;

/// Register command arguments.
///
/// Required fields are optional here so that a blank form reaches
/// validation and gets the same notice as any other incomplete form.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Full name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Blood group (A+, A-, B+, B-, AB+, AB-, O+, O-)
    #[arg(short, long)]
    pub blood_group: Option<String>,

    /// Mobile number
    #[arg(short, long)]
    pub mobile: Option<String>,

    /// District
    #[arg(short, long)]
    pub district: Option<String>,

    /// Date of last donation (YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    pub last_donation: Option<String>,

    /// The mobile number is not on WhatsApp
    #[arg(long)]
    pub no_whatsapp: bool,

    /// Output the registered donor as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl RegisterCommand {
    /// Collect the arguments into a registration form.
    #[must_use]
    pub fn to_form(&self) -> RegistrationForm {
        RegistrationForm {
            full_name: self.name.clone().unwrap_or_default(),
            blood_group: self.blood_group.clone().unwrap_or_default(),
            mobile_number: self.mobile.clone().unwrap_or_default(),
            district: self.district.clone().unwrap_or_default(),
            last_donation_date: self.last_donation.clone(),
            has_whatsapp: !self.no_whatsapp,
        }
    }
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Required blood group
    #[arg(short, long)]
    pub blood_group: Option<String>,

    /// District to search in
    #[arg(short, long)]
    pub district: Option<String>,

    /// How urgently blood is needed (normal, urgent, critical)
    #[arg(short, long)]
    pub urgency: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl SearchCommand {
    /// Collect the arguments into a search form.
    #[must_use]
    pub fn to_form(&self) -> SearchForm {
        SearchForm {
            blood_group: self.blood_group.clone().unwrap_or_default(),
            district: self.district.clone().unwrap_or_default(),
            urgency: self.urgency.clone(),
        }
    }
}

/// Contact command arguments.
#[derive(Debug, Args)]
pub struct ContactCommand {
    /// Donor id, as shown in search results
    pub id: i64,

    /// Print only the WhatsApp link
    #[arg(short, long, conflicts_with = "call")]
    pub whatsapp: bool,

    /// Print only the call link
    #[arg(long)]
    pub call: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Donor cards
    #[default]
    Plain,
    /// One row per donor
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_register_to_form() {
        let cmd = RegisterCommand {
            name: Some("Lata".to_string()),
            blood_group: Some("A+".to_string()),
            mobile: Some("9000000001".to_string()),
            district: Some("Kochi".to_string()),
            last_donation: None,
            no_whatsapp: true,
            json: false,
        };
        let form = cmd.to_form();
        assert_eq!(form.full_name, "Lata");
        assert_eq!(form.district, "Kochi");
        assert!(!form.has_whatsapp);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_register_to_form_blank() {
        let cmd = RegisterCommand {
            name: None,
            blood_group: None,
            mobile: None,
            district: None,
            last_donation: None,
            no_whatsapp: false,
            json: false,
        };
        let form = cmd.to_form();
        assert!(form.has_whatsapp);
        assert_eq!(form.missing_fields().len(), 4);
    }

    #[test]
    fn test_search_to_form() {
        let cmd = SearchCommand {
            blood_group: Some("O+".to_string()),
            district: Some("Pune".to_string()),
            urgency: None,
            format: OutputFormat::Table,
        };
        let form = cmd.to_form();
        assert_eq!(form.blood_group, "O+");
        assert_eq!(form.district, "Pune");
        assert!(form.urgency.is_none());
    }
}
