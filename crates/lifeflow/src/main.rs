//! `lifeflow` - CLI for the blood donor registry
//!
//! This binary registers donors, searches them by blood group and district,
//! and prints the links used to contact them.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::{debug, error, Level};

use lifeflow::catalog::{self, Urgency};
use lifeflow::cli::output::{self, REGISTERED_MESSAGE, REGISTERED_TITLE};
use lifeflow::cli::{
    Cli, Command, ConfigCommand, ContactCommand, OutputFormat, RegisterCommand, SearchCommand,
};
use lifeflow::contact::{self, ContactLinks};
use lifeflow::{init_logging, open_store, Config, DonorService, DonorStore, Error};

type Service = DonorService<Box<dyn DonorStore>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = match Config::load_from(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::from(2);
        }
    };

    let action = action_name(&cli.command);
    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(err) => {
                    if err.log_level() == Level::ERROR {
                        error!("{action} failed: {e:?}");
                    } else {
                        debug!("{action} rejected: {err}");
                    }
                    eprintln!("{}", err.notice(action));
                }
                None => {
                    error!("{action} failed: {e:?}");
                    eprintln!("{action} Failed: {e:#}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Name of the action a command performs, as used in failure notices.
fn action_name(command: &Command) -> &'static str {
    match command {
        Command::Register(_) => "Registration",
        Command::Search(_) => "Search",
        Command::Contact(_) => "Contact",
        Command::Status(_) => "Status",
        Command::Config(_) => "Configuration",
        Command::Districts | Command::BloodGroups | Command::UrgencyLevels => "Listing",
    }
}

async fn run(command: Command, config: &Config) -> anyhow::Result<ExitCode> {
    match command {
        Command::Register(cmd) => handle_register(&service(config)?, config, &cmd).await,
        Command::Search(cmd) => handle_search(&service(config)?, config, &cmd).await,
        Command::Contact(cmd) => handle_contact(&service(config)?, config, &cmd).await,
        Command::Status(cmd) => handle_status(&service(config)?, cmd.json).await,
        Command::Districts => {
            for district in catalog::DISTRICTS {
                println!("{district}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::BloodGroups => {
            for group in catalog::blood_groups() {
                println!("{group}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::UrgencyLevels => {
            for level in Urgency::ALL {
                println!("{:<10} {}", level.value(), level.label());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(cmd) => handle_config(config, cmd),
    }
}

fn service(config: &Config) -> lifeflow::Result<Service> {
    let store = open_store(config).map_err(|e| {
        error!("Failed to open {:?} store: {e}", config.storage.backend);
        e
    })?;
    Ok(DonorService::new(store))
}

async fn handle_register(
    service: &Service,
    config: &Config,
    cmd: &RegisterCommand,
) -> anyhow::Result<ExitCode> {
    let donor = service.register(&cmd.to_form()).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&donor)?);
    } else {
        println!("{REGISTERED_TITLE}");
        println!("{REGISTERED_MESSAGE}");
        println!();
        print!(
            "{}",
            output::donor_card(&donor, &config.contact, Local::now().date_naive())
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_search(
    service: &Service,
    config: &Config,
    cmd: &SearchCommand,
) -> anyhow::Result<ExitCode> {
    let outcome = service.search(&cmd.to_form()).await?;
    let today = Local::now().date_naive();

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Table => print!("{}", output::search_table(&outcome, today)),
        OutputFormat::Plain => {
            print!(
                "{}",
                output::search_results(&outcome, &config.contact, today)
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_contact(
    service: &Service,
    config: &Config,
    cmd: &ContactCommand,
) -> anyhow::Result<ExitCode> {
    let Some(donor) = service.find(cmd.id).await? else {
        eprintln!("Donor Not Found: no donor with id {}", cmd.id);
        return Ok(ExitCode::FAILURE);
    };

    if cmd.whatsapp {
        println!("{}", contact::whatsapp_link(&donor, &config.contact)?);
    } else if cmd.call {
        println!("{}", contact::call_link(&donor));
    } else if cmd.json {
        let links = ContactLinks::for_donor(&donor, &config.contact)?;
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        let links = ContactLinks::for_donor(&donor, &config.contact)?;
        println!("{} ({}, {})", donor.full_name, donor.blood_group, donor.district);
        println!("Call:     {}", links.call);
        match links.whatsapp {
            Some(link) => println!("WhatsApp: {link}"),
            None => println!("WhatsApp: not available"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_status(service: &Service, json: bool) -> anyhow::Result<ExitCode> {
    let stats = service.stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("lifeflow status");
        println!("---------------");
        println!("Backend:       {}", stats.backend);
        println!("Location:      {}", stats.location);
        println!("Donors:        {}", stats.total_donors);
        match stats.newest_registration {
            Some(at) => println!(
                "Newest:        {}",
                at.with_timezone(&Local).format("%d/%m/%Y %H:%M")
            ),
            None => println!("Newest:        -"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let mut shown = config.clone();
            shown.remote.api_key = output::mask_secret(&shown.remote.api_key);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&shown).context("serializing configuration")?
                );
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {:?}", shown.storage.backend);
                println!("  Database path:      {}", shown.database_path().display());
                println!();
                println!("[Remote]");
                println!("  URL:                {}", shown.remote.url);
                println!("  API key:            {}", shown.remote.api_key);
                println!("  Table:              {}", shown.remote.table);
                println!("  Timeout (secs):     {}", shown.remote.timeout_secs);
                println!();
                println!("[Contact]");
                println!("  Country code:       {}", shown.contact.country_code);
                println!("  App name:           {}", shown.contact.app_name);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::load_from(Some(path)) {
                eprintln!("Configuration error: {e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("Configuration is valid.");
        }
    }
    Ok(ExitCode::SUCCESS)
}
