//! Command-line interface for lazytask
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::session::Session;
use crate::storage::FileStore;

mod reset;
mod settings;
mod task;
mod theme;

/// lazytask - local task list
///
/// Add tasks with optional deadlines, check them off, and keep sorting,
/// filtering and appearance preferences. Everything stays on this machine.
#[derive(Parser, Debug)]
#[command(name = "lazytask")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task and settings documents
    #[arg(long, global = true, env = config::DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task to the top of the list
    Add {
        /// Task title
        title: String,

        /// Deadline: epoch milliseconds, YYYY-MM-DD or RFC 3339
        #[arg(long)]
        deadline: Option<String>,
    },

    /// Show tasks filtered and sorted by current settings
    #[command(alias = "ls")]
    List,

    /// Mark a task done, or not done again
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task ID
        id: String,
    },

    /// Delete all tasks
    Clear,

    /// Show task counters
    Stats,

    /// Behavioral and display settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Theme and accent color
    #[command(subcommand)]
    Theme(ThemeCommands),

    /// Delete all tasks and restore default settings
    Reset,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show all settings
    Show,

    /// Change one setting
    Set {
        /// Setting name (e.g. sortBy, showCompletedTasks)
        key: String,

        /// New value
        value: String,
    },

    /// Restore default settings
    Reset,
}

/// Theme subcommands
#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Show theme and accent color
    Show,

    /// Set the theme: auto, light, dark
    Set {
        /// Theme name
        name: String,
    },

    /// Set the accent color: blue, green, red, orange, purple, pink, yellow, monochromic
    Tint {
        /// Color name
        color: String,
    },
}

/// Shared state for one CLI invocation
pub(crate) struct CliContext {
    pub session: Session<FileStore>,
    pub data_dir: PathBuf,
    pub output: OutputOptions,
}

impl CliContext {
    fn open(data_dir: Option<PathBuf>, output: OutputOptions) -> Result<Self> {
        let data_dir = config::resolve_data_dir(data_dir.as_deref());
        if data_dir.exists() && !data_dir.is_dir() {
            return Err(Error::DataDir(data_dir));
        }
        let config = Config::load_from_dir(&data_dir)?;
        tracing::debug!(data_dir = %data_dir.display(), "opening store");

        let store = Arc::new(FileStore::new(&data_dir));
        Ok(Self {
            session: Session::new(store, &config.store),
            data_dir,
            output,
        })
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run_async())
    }

    async fn run_async(self) -> Result<()> {
        let ctx = CliContext::open(
            self.data_dir,
            OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        )?;

        match self.command {
            Commands::Add { title, deadline } => {
                task::run_add(&ctx, &title, deadline.as_deref()).await
            }
            Commands::List => task::run_list(&ctx).await,
            Commands::Toggle { id } => task::run_toggle(&ctx, &id).await,
            Commands::Rm { id } => task::run_rm(&ctx, &id).await,
            Commands::Clear => task::run_clear(&ctx).await,
            Commands::Stats => task::run_stats(&ctx).await,
            Commands::Settings(cmd) => match cmd {
                SettingsCommands::Show => settings::run_show(&ctx).await,
                SettingsCommands::Set { key, value } => {
                    settings::run_set(&ctx, &key, &value).await
                }
                SettingsCommands::Reset => settings::run_reset(&ctx).await,
            },
            Commands::Theme(cmd) => match cmd {
                ThemeCommands::Show => theme::run_show(&ctx).await,
                ThemeCommands::Set { name } => theme::run_set(&ctx, &name).await,
                ThemeCommands::Tint { color } => theme::run_tint(&ctx, &color).await,
            },
            Commands::Reset => reset::run(&ctx).await,
        }
    }
}
