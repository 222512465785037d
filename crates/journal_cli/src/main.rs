//! `journal` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, load configuration and start logging.
//! - Run one command against a freshly opened session.
//!
//! # Invariants
//! - The session is closed before the process exits, on success and on error.

mod cli;
mod config;
mod error;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use config::JournalConfig;
use error::CliError;
use journal_core::{
    default_log_level, init_logging, EntryOrder, JournalSession, LogLevel, SubjectRef,
};
use log::info;

fn main() {
    let cli = Cli::parse();

    // `run` owns the session, so it is dropped (and closed) before `exit`.
    match run(cli) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = JournalConfig::load(cli.config.as_deref())?;
    start_logging(&config)?;

    let db_path = config.resolve_db_path(cli.db.as_deref());
    let mut session = JournalSession::open(&db_path)?;
    execute(&session, &config, cli.command)?;
    session.close()?;
    Ok(())
}

fn execute(
    session: &JournalSession,
    config: &JournalConfig,
    command: Commands,
) -> Result<(), CliError> {
    match command {
        Commands::AddSubject { name } => {
            let name = name.trim();
            let id = session.insert_subject(name)?;
            println!("Subject '{name}' added successfully (ID {id}).");
        }
        Commands::AddEntry {
            subject,
            detail,
            name,
        } => {
            let subject = subject_ref(&subject, name);
            let id = session.insert_entry(&subject, detail.trim())?;
            println!("Entry added successfully (ID {id}).");
        }
        Commands::Subjects { json } => {
            let subjects = session.list_subject_summaries()?;
            if json {
                println!("{}", to_json(&subjects)?);
            } else {
                print!("{}", output::render_subjects(&subjects));
            }
        }
        Commands::Entries {
            subject,
            oldest_first,
            name,
            json,
        } => {
            let order = if oldest_first {
                EntryOrder::OldestFirst
            } else {
                EntryOrder::NewestFirst
            };
            let listed = session.get_entries_for_subject(&subject_ref(&subject, name), order)?;
            if json {
                println!("{}", to_json(&listed)?);
            } else {
                print!("{}", output::render_entries(&listed));
            }
        }
        Commands::DeleteEntry { id } => {
            session.delete_entry(id)?;
            println!("Entry with ID {id} deleted successfully.");
        }
        Commands::Stats => {
            print!("{}", output::render_stats(&session.stats()?));
        }
        Commands::Export {
            subject,
            out_dir,
            name,
        } => {
            let out_dir = config.resolve_export_dir(out_dir.as_deref());
            let path = session.export_entries(&subject_ref(&subject, name), &out_dir)?;
            println!("Entries exported successfully to: {}", path.display());
        }
    }
    Ok(())
}

fn subject_ref(input: &str, force_name: bool) -> SubjectRef {
    let input = input.trim();
    if force_name {
        SubjectRef::ByName(input.to_string())
    } else {
        SubjectRef::parse(input)
    }
}

fn start_logging(config: &JournalConfig) -> Result<(), CliError> {
    let Some(log_dir) = config.log_dir.as_ref() else {
        return Ok(());
    };

    let level = match config.log_level.as_deref() {
        Some(value) => LogLevel::parse(value)?,
        None => default_log_level(),
    };
    let log_dir = if log_dir.is_absolute() {
        log_dir.clone()
    } else {
        std::env::current_dir()?.join(log_dir)
    };

    init_logging(level, &log_dir)?;
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        journal_core::core_version()
    );
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
