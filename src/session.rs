//! One consumer's handle on the task engine.
//!
//! A [`Session`] wires the task, settings and theme repositories to a single
//! shared store. The UI issues a command through one of the repositories,
//! then calls [`Session::snapshot`] to reload and rebuild what it renders.

use std::sync::Arc;

use serde::Serialize;

use crate::config::StoreKeys;
use crate::error::Result;
use crate::settings::{AppSettings, SettingsRepository};
use crate::storage::KeyValueStore;
use crate::task::TaskRepository;
use crate::theme::{ThemePreferences, ThemeRepository};
use crate::view::{build_view, TaskView};

/// Everything needed to render the current state
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub settings: AppSettings,
    pub theme: ThemePreferences,
    pub view: TaskView,
}

pub struct Session<S> {
    store: Arc<S>,
    tasks: TaskRepository<S>,
    settings: SettingsRepository<S>,
    theme: ThemeRepository<S>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: Arc<S>, keys: &StoreKeys) -> Self {
        Self {
            tasks: TaskRepository::new(Arc::clone(&store), keys),
            settings: SettingsRepository::new(Arc::clone(&store), keys),
            theme: ThemeRepository::new(Arc::clone(&store), keys),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tasks(&self) -> &TaskRepository<S> {
        &self.tasks
    }

    pub fn settings(&self) -> &SettingsRepository<S> {
        &self.settings
    }

    pub fn theme(&self) -> &ThemeRepository<S> {
        &self.theme
    }

    /// Reload tasks and preferences and rebuild the derived view
    pub async fn snapshot(&self) -> Snapshot {
        let tasks = self.tasks.get_all().await;
        let settings = self.settings.get_all().await;
        let theme = self.theme.get().await;
        let view = build_view(&tasks, &settings);
        Snapshot {
            settings,
            theme,
            view,
        }
    }

    /// Delete every task, wipe the store and persist default settings.
    ///
    /// Theme preferences are wiped with the store and read back as defaults.
    pub async fn reset_app(&self) -> Result<()> {
        self.tasks.clear_all().await?;
        self.store.clear_all().await?;
        self.settings.reset().await?;
        tracing::info!("app state reset");
        Ok(())
    }
}
