//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "journal")]
#[command(about = "Subject-based command-line journal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Journal database file (overrides JOURNAL_DB and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Configuration file (default: ./journal.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new subject
    AddSubject {
        name: String,
    },

    /// Add an entry; an unknown subject name is created on the fly
    AddEntry {
        /// Subject ID or name (all digits is read as an ID; see --name)
        subject: String,

        /// Entry text
        detail: String,

        /// Treat SUBJECT as a name even if it is all digits
        #[arg(long)]
        name: bool,
    },

    /// List all subjects
    Subjects {
        #[arg(long)]
        json: bool,
    },

    /// Show the entries of one subject
    Entries {
        /// Subject ID or name (all digits is read as an ID; see --name)
        subject: String,

        /// Oldest entries first (default: newest first)
        #[arg(long)]
        oldest_first: bool,

        /// Treat SUBJECT as a name even if it is all digits
        #[arg(long)]
        name: bool,

        #[arg(long)]
        json: bool,
    },

    /// Delete one entry by ID
    DeleteEntry {
        id: i64,
    },

    /// Show subject/entry counts and database size
    Stats,

    /// Export a subject's entries to a text file
    Export {
        /// Subject ID or name (all digits is read as an ID; see --name)
        subject: String,

        /// Output directory (default: export_dir from config, else ".")
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Treat SUBJECT as a name even if it is all digits
        #[arg(long)]
        name: bool,
    },
}
