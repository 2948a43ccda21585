use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mt_cli::commands::{adherence, demo, dose, medication, schedule, status, user};
use mt_cli::{Cli, Commands, Config, DoseAction, MedAction, UserAction};

/// Load config and open the database it points at.
fn open_database(config_path: Option<&Path>) -> Result<mt_db::Database> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    mt_db::Database::open(&config.database_path).with_context(|| {
        format!(
            "failed to open database at {}",
            config.database_path.display()
        )
    })
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

    let db = open_database(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Status => status::run(&mut stdout, &db)?,
        Commands::Demo => demo::run(&mut stdout, &db)?,
        Commands::User(action) => match action {
            UserAction::Add(args) => user::add(&mut stdout, &db, args)?,
            UserAction::List => user::list(&mut stdout, &db)?,
        },
        Commands::Med(action) => match action {
            MedAction::Add(args) => medication::add(&mut stdout, &db, args)?,
            MedAction::List { user } => medication::list(&mut stdout, &db, *user)?,
            MedAction::Deactivate { id } => medication::deactivate(&mut stdout, &db, *id)?,
        },
        Commands::Dose(DoseAction::Log(args)) => dose::log(&mut stdout, &db, args)?,
        Commands::Schedule(args) => schedule::run(&mut stdout, &db, args)?,
        Commands::Adherence(args) => adherence::run(&mut stdout, &db, args)?,
    }

    stdout.flush()?;
    Ok(())
}
