//! Task model and repository.
//!
//! Tasks are stored as a single JSON array under the tasks key. The array
//! order is the manual order: new tasks go to the front.
//!
//! Every mutation is a full read-modify-write of the array with no isolation
//! between callers. Two mutations issued without awaiting the first can lose
//! the earlier write; callers are expected to await each operation.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::config::StoreKeys;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    /// Milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
}

impl Task {
    /// Build a new, incomplete task stamped with `created_at`
    pub fn new(title: impl Into<String>, created_at: i64, deadline: Option<i64>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            title: title.into(),
            completed: false,
            created_at,
            deadline,
        }
    }

    /// Deadline has passed and the task is still open
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        !self.completed && self.deadline.map(|due| due < now_ms).unwrap_or(false)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Owns the canonical task collection in a [`KeyValueStore`]
pub struct TaskRepository<S> {
    store: Arc<S>,
    key: String,
}

impl<S> Clone for TaskRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

impl<S: KeyValueStore> TaskRepository<S> {
    pub fn new(store: Arc<S>, keys: &StoreKeys) -> Self {
        Self {
            store,
            key: keys.tasks_key.clone(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load every task in stored order.
    ///
    /// Never fails: a missing key, an unreadable store or a corrupt document
    /// all yield an empty list. Faults are logged.
    pub async fn get_all(&self) -> Vec<Task> {
        match self.store.get(&self.key).await {
            Ok(raw) => self.decode(raw),
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "failed to read tasks, using empty list"
                );
                Vec::new()
            }
        }
    }

    /// Look up a task by id
    pub async fn find(&self, id: &str) -> Option<Task> {
        self.get_all().await.into_iter().find(|task| task.id == id)
    }

    /// Create a task at the front of the collection.
    ///
    /// Returns `Ok(None)` without touching the store when the trimmed title is
    /// empty.
    pub async fn add(&self, title: &str, deadline: Option<i64>) -> Result<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!("ignoring task with empty title");
            return Ok(None);
        }

        let mut tasks = self.load_for_write().await?;
        let task = Task::new(title, now_ms(), deadline);
        tasks.insert(0, task.clone());
        self.save(&tasks).await?;

        tracing::debug!(id = %task.id, "task added");
        Ok(Some(task))
    }

    /// Flip `completed` on the first task with `id`.
    ///
    /// Returns `false` and writes nothing when no task matches.
    pub async fn toggle(&self, id: &str) -> Result<bool> {
        let mut tasks = self.load_for_write().await?;
        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        self.save(&tasks).await?;
        Ok(true)
    }

    /// Remove every task with `id`, returning how many were removed.
    ///
    /// Writes nothing when no task matches.
    pub async fn delete(&self, id: &str) -> Result<usize> {
        let mut tasks = self.load_for_write().await?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        let removed = before - tasks.len();
        if removed == 0 {
            return Ok(0);
        }
        self.save(&tasks).await?;
        Ok(removed)
    }

    /// Remove the tasks key entirely
    pub async fn clear_all(&self) -> Result<()> {
        self.store.remove(&self.key).await
    }

    /// Strict read for mutations: store failures propagate so a transient
    /// read error never turns into an overwrite with an empty list. A corrupt
    /// document still degrades to empty.
    async fn load_for_write(&self) -> Result<Vec<Task>> {
        let raw = self.store.get(&self.key).await?;
        Ok(self.decode(raw))
    }

    fn decode(&self, raw: Option<String>) -> Vec<Task> {
        let Some(raw) = raw else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "corrupt task list, using empty list"
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        self.store.set(&self.key, json).await
    }
}
