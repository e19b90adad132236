//! lazytask - local task list engine
//!
//! This library provides the state engine behind the lazytask CLI: a task
//! list and user preferences persisted in a simple key-value store, plus the
//! derived view (filtered, sorted, counted) a front end renders.
//!
//! # Core Concepts
//!
//! - **Tasks**: to-do items with optional deadlines, newest first
//! - **Settings**: always-complete preference record merged over defaults
//! - **Theme**: appearance preferences sharing the settings document
//! - **Derived view**: pure filter + sort + counters over the task list
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `lazytask.toml`
//! - `document`: Shared JSON document under the settings key
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output envelopes
//! - `session`: Repositories wired to one store
//! - `settings`: Settings model and repository
//! - `storage`: Key-value store contract, memory and file stores
//! - `task`: Task model and repository
//! - `theme`: Theme preferences and repository
//! - `view`: Derived view builder

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod session;
pub mod settings;
pub mod storage;
pub mod task;
pub mod theme;
pub mod view;

pub use error::{Error, Result};
pub use session::{Session, Snapshot};
pub use settings::{AppSettings, FontSize, Setting, SettingsPatch, SettingsRepository, SortBy};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use task::{Task, TaskRepository};
pub use theme::{ThemeName, ThemePreferences, ThemeRepository, TintColor};
pub use view::{build_view, TaskCounts, TaskView};
