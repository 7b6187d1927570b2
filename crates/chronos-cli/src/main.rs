use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chronos_cli::commands::util::{Clock, resolve_sheet};
use chronos_cli::commands::{categories, copy, edit, entries, list, sheets, start, summary};
use chronos_cli::{Cli, Commands, Config, SheetsAction};
use chronos_store::Store;

/// Load config and open the document store.
fn open_store(config_path: Option<&Path>) -> Result<(Store, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let store = Store::open(&config.data_path)
        .with_context(|| format!("failed to open {}", config.data_path.display()))?;
    Ok((store, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut store, _config) = open_store(cli.config.as_deref())?;
    let clock = Clock::new(Utc::now(), Local);
    let sheet_arg = cli.sheet.as_deref();
    let mut out = io::stdout().lock();

    match command {
        Commands::Start(args) => {
            let sheet = resolve_sheet(&mut store, sheet_arg, clock.now())?;
            start::run(&mut out, &mut store, &sheet, args, &clock)?;
        }
        Commands::Stop { id } => {
            let sheet = resolve_sheet(&mut store, sheet_arg, clock.now())?;
            entries::stop(&mut out, &mut store, &sheet, id.as_deref(), &clock)?;
        }
        Commands::Restart { id } => entries::restart(&mut out, &mut store, id, &clock)?,
        Commands::Rm { id } => entries::remove(&mut out, &mut store, id)?,
        Commands::Edit(args) => edit::run(&mut out, &mut store, args, &clock)?,
        Commands::List => {
            let sheet = resolve_sheet(&mut store, sheet_arg, clock.now())?;
            list::run(&mut out, &store, &sheet, &clock)?;
        }
        Commands::Summary { json } => {
            let sheet = resolve_sheet(&mut store, sheet_arg, clock.now())?;
            let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
            summary::run(&mut out, &store, &sheet, *json, &clock, &timezone)?;
        }
        Commands::Copy => {
            let sheet = resolve_sheet(&mut store, sheet_arg, clock.now())?;
            copy::run(&mut out, &store, &sheet, clock.now())?;
        }
        Commands::Categories { json } => categories::run(&mut out, &store, *json)?,
        Commands::Sheets(action) => match action {
            SheetsAction::List => {
                let active = match sheet_arg {
                    Some(_) => Some(resolve_sheet(&mut store, sheet_arg, clock.now())?),
                    None => store.list_timesheets().into_iter().next(),
                };
                sheets::list(&mut out, &store, active.as_ref(), &clock)?;
            }
            SheetsAction::New { name } => {
                sheets::create(&mut out, &mut store, name.as_deref(), &clock)?;
            }
            SheetsAction::Rename { id, name } => sheets::rename(&mut out, &mut store, id, name)?,
            SheetsAction::Delete { id } => sheets::delete(&mut out, &mut store, id)?,
        },
    }

    out.flush()?;
    Ok(())
}
