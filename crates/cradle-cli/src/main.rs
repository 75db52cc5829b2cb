use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cradle_cli::commands::{events, log, profile, reminder, report, routine, sleep, status};
use cradle_cli::{Cli, Commands, Config, ProfileAction, SleepAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(cradle_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    config.validate()?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = cradle_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let now = Local::now();
    let mut out = io::stdout().lock();

    match command {
        Commands::Log { event } => log::run(&mut out, &mut db, event, &now)?,
        Commands::Sleep(action) => match action {
            SleepAction::Start { at } => sleep::start(&mut out, &mut db, at.as_deref(), &now)?,
            SleepAction::Stop { at } => sleep::stop(&mut out, &mut db, at.as_deref(), &now)?,
            SleepAction::Report { json } => {
                sleep::report(&mut out, &db, &config.insights, *json, &now)?;
            }
        },
        Commands::Profile(action) => match action {
            ProfileAction::Set { name, birth_date } => {
                profile::set(&mut out, &mut db, name.clone(), *birth_date, &now)?;
            }
            ProfileAction::Show => profile::show(&mut out, &db, &now)?,
        },
        Commands::Reminder {
            enable,
            disable,
            interval,
        } => reminder::run(&mut out, &mut db, *enable, *disable, *interval, &now)?,
        Commands::Status { json } => status::run(&mut out, &db, &config.insights, *json, &now)?,
        Commands::Routine { json } => routine::run(&mut out, &db, &config.insights, *json, &now)?,
        Commands::Report {
            week: _,
            month,
            from,
            to,
            json,
        } => {
            let period = report::Period::from_flags(
                *month,
                from.as_deref(),
                to.as_deref(),
                now.with_timezone(&Utc),
            )?;
            report::run(&mut out, &db, period, config.diaper_cost, *json, &now)?;
        }
        Commands::Events { category } => events::run(&mut out, &db, *category)?,
    }

    Ok(())
}
