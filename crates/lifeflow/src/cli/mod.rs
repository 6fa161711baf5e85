//! Command-line interface for lifeflow.
//!
//! This module provides the CLI structure, argument types, and text
//! rendering for the `lifeflow` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ContactCommand, OutputFormat, RegisterCommand, SearchCommand, StatusCommand,
};

/// lifeflow - Save lives, donate blood
///
/// Register as a blood donor, or find donors in your district by blood group
/// and reach them by phone or WhatsApp.
#[derive(Debug, Parser)]
#[command(name = "lifeflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register as a blood donor
    Register(RegisterCommand),

    /// Find donors by blood group and district
    Search(SearchCommand),

    /// Show call and WhatsApp links for a donor
    Contact(ContactCommand),

    /// List the districts donors can register in
    Districts,

    /// List blood groups
    BloodGroups,

    /// List urgency levels for searches
    UrgencyLevels,

    /// Show store status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "lifeflow");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["lifeflow", "-q", "status"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["lifeflow", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["lifeflow", "-v", "status"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["lifeflow", "-vv", "status"]).verbosity(), Verbosity::Debug);
        assert_eq!(parse(&["lifeflow", "-vvv", "status"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_register() {
        let cli = parse(&[
            "lifeflow",
            "register",
            "--name",
            "Ravi Kumar",
            "--blood-group",
            "B+",
            "--mobile",
            "9876543210",
            "--district",
            "Pune",
            "--last-donation",
            "2025-01-10",
            "--no-whatsapp",
        ]);
        match cli.command {
            Command::Register(cmd) => {
                assert_eq!(cmd.name.as_deref(), Some("Ravi Kumar"));
                assert_eq!(cmd.last_donation.as_deref(), Some("2025-01-10"));
                assert!(cmd.no_whatsapp);
            }
            other => panic!("expected register, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_register_without_fields() {
        // validation, not clap, reports blank fields
        let cli = parse(&["lifeflow", "register"]);
        assert!(matches!(cli.command, Command::Register(_)));
    }

    #[test]
    fn test_parse_search() {
        let cli = parse(&[
            "lifeflow", "search", "-b", "O+", "-d", "Pune", "-u", "critical", "-f", "json",
        ]);
        match cli.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.blood_group.as_deref(), Some("O+"));
                assert_eq!(cmd.district.as_deref(), Some("Pune"));
                assert_eq!(cmd.urgency.as_deref(), Some("critical"));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_contact() {
        let cli = parse(&["lifeflow", "contact", "42", "--whatsapp"]);
        match cli.command {
            Command::Contact(cmd) => {
                assert_eq!(cmd.id, 42);
                assert!(cmd.whatsapp);
            }
            other => panic!("expected contact, got {other:?}"),
        }
    }

    #[test]
    fn test_contact_flags_conflict() {
        let result = Cli::try_parse_from(["lifeflow", "contact", "1", "--whatsapp", "--call"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_catalog_commands() {
        assert!(matches!(parse(&["lifeflow", "districts"]).command, Command::Districts));
        assert!(matches!(
            parse(&["lifeflow", "blood-groups"]).command,
            Command::BloodGroups
        ));
        assert!(matches!(
            parse(&["lifeflow", "urgency-levels"]).command,
            Command::UrgencyLevels
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["lifeflow", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["lifeflow", "config", "validate", "--file", "/tmp/x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
