//! User preferences and their repository.
//!
//! [`AppSettings`] is always fully populated: whatever subset of fields is
//! stored gets merged over [`AppSettings::default`]. Fields with the wrong
//! type or an unknown enum value fall back to their defaults, and fields that
//! belong to other records in the same document are left untouched on write.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::StoreKeys;
use crate::document::{self, Document};
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

const HAPTIC_FEEDBACK: &str = "hapticFeedback";
const CONFIRM_DELETE: &str = "confirmDelete";
const SHOW_COMPLETED_TASKS: &str = "showCompletedTasks";
const AUTO_DELETE_COMPLETED: &str = "autoDeleteCompleted";
const SORT_BY: &str = "sortBy";
const FONT_SIZE: &str = "fontSize";
const ANIMATIONS: &str = "animations";
const SWIPE_TO_DELETE: &str = "swipeToDelete";

/// Stored field names, in display order
pub const SETTING_KEYS: [&str; 8] = [
    HAPTIC_FEEDBACK,
    CONFIRM_DELETE,
    SHOW_COMPLETED_TASKS,
    AUTO_DELETE_COMPLETED,
    SORT_BY,
    FONT_SIZE,
    ANIMATIONS,
    SWIPE_TO_DELETE,
];

/// Ordering applied to the derived task view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Manual,
    Deadline,
    Alphabetical,
    Newest,
    Oldest,
}

impl SortBy {
    pub const ALL: [SortBy; 5] = [
        SortBy::Manual,
        SortBy::Deadline,
        SortBy::Alphabetical,
        SortBy::Newest,
        SortBy::Oldest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Manual => "manual",
            SortBy::Deadline => "deadline",
            SortBy::Alphabetical => "alphabetical",
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        SortBy::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| invalid_value(SORT_BY, s, &SortBy::ALL.map(|v| v.as_str())))
    }
}

/// Text size preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const ALL: [FontSize; 3] = [FontSize::Small, FontSize::Medium, FontSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        FontSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| invalid_value(FONT_SIZE, s, &FontSize::ALL.map(|v| v.as_str())))
    }
}

/// Behavioral and display preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub haptic_feedback: bool,
    pub confirm_delete: bool,
    pub show_completed_tasks: bool,
    /// Stored only; nothing deletes completed tasks automatically
    pub auto_delete_completed: bool,
    pub sort_by: SortBy,
    pub font_size: FontSize,
    pub animations: bool,
    pub swipe_to_delete: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            haptic_feedback: true,
            confirm_delete: true,
            show_completed_tasks: true,
            auto_delete_completed: false,
            sort_by: SortBy::Manual,
            font_size: FontSize::Medium,
            animations: true,
            swipe_to_delete: true,
        }
    }
}

impl AppSettings {
    /// Merge the settings fields found in `document` over the defaults
    pub fn from_document(document: &Document) -> Self {
        Self::default().merged(&SettingsPatch::from_document(document))
    }

    /// Copy of `self` with every `Some` field of `patch` applied
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            haptic_feedback: patch.haptic_feedback.unwrap_or(self.haptic_feedback),
            confirm_delete: patch.confirm_delete.unwrap_or(self.confirm_delete),
            show_completed_tasks: patch
                .show_completed_tasks
                .unwrap_or(self.show_completed_tasks),
            auto_delete_completed: patch
                .auto_delete_completed
                .unwrap_or(self.auto_delete_completed),
            sort_by: patch.sort_by.unwrap_or(self.sort_by),
            font_size: patch.font_size.unwrap_or(self.font_size),
            animations: patch.animations.unwrap_or(self.animations),
            swipe_to_delete: patch.swipe_to_delete.unwrap_or(self.swipe_to_delete),
        }
    }

    /// Write every settings field into `document`, keeping other fields
    pub fn write_into(&self, document: &mut Document) -> Result<()> {
        if let Value::Object(fields) = serde_json::to_value(self)? {
            document.extend(fields);
        }
        Ok(())
    }

    /// String form of the field stored under `key`
    pub fn value_of(&self, key: &str) -> Option<String> {
        let value = match key {
            HAPTIC_FEEDBACK => self.haptic_feedback.to_string(),
            CONFIRM_DELETE => self.confirm_delete.to_string(),
            SHOW_COMPLETED_TASKS => self.show_completed_tasks.to_string(),
            AUTO_DELETE_COMPLETED => self.auto_delete_completed.to_string(),
            SORT_BY => self.sort_by.to_string(),
            FONT_SIZE => self.font_size.to_string(),
            ANIMATIONS => self.animations.to_string(),
            SWIPE_TO_DELETE => self.swipe_to_delete.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// A single typed settings assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    HapticFeedback(bool),
    ConfirmDelete(bool),
    ShowCompletedTasks(bool),
    AutoDeleteCompleted(bool),
    SortBy(SortBy),
    FontSize(FontSize),
    Animations(bool),
    SwipeToDelete(bool),
}

impl Setting {
    /// Stored field name
    pub fn key(&self) -> &'static str {
        match self {
            Setting::HapticFeedback(_) => HAPTIC_FEEDBACK,
            Setting::ConfirmDelete(_) => CONFIRM_DELETE,
            Setting::ShowCompletedTasks(_) => SHOW_COMPLETED_TASKS,
            Setting::AutoDeleteCompleted(_) => AUTO_DELETE_COMPLETED,
            Setting::SortBy(_) => SORT_BY,
            Setting::FontSize(_) => FONT_SIZE,
            Setting::Animations(_) => ANIMATIONS,
            Setting::SwipeToDelete(_) => SWIPE_TO_DELETE,
        }
    }

    /// Build a setting from a field name and a textual value.
    ///
    /// Field names match case-insensitively and ignore `-`/`_`, so
    /// `sortBy`, `sort-by` and `sort_by` are equivalent.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let canonical = canonical_key(key).ok_or_else(|| Error::UnknownSetting(key.to_string()))?;
        let setting = match canonical {
            HAPTIC_FEEDBACK => Setting::HapticFeedback(parse_bool(canonical, value)?),
            CONFIRM_DELETE => Setting::ConfirmDelete(parse_bool(canonical, value)?),
            SHOW_COMPLETED_TASKS => Setting::ShowCompletedTasks(parse_bool(canonical, value)?),
            AUTO_DELETE_COMPLETED => Setting::AutoDeleteCompleted(parse_bool(canonical, value)?),
            SORT_BY => Setting::SortBy(value.parse()?),
            FONT_SIZE => Setting::FontSize(value.parse()?),
            ANIMATIONS => Setting::Animations(parse_bool(canonical, value)?),
            SWIPE_TO_DELETE => Setting::SwipeToDelete(parse_bool(canonical, value)?),
            _ => return Err(Error::UnknownSetting(key.to_string())),
        };
        Ok(setting)
    }
}

/// Partial settings record; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub haptic_feedback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_delete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_completed_tasks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_delete_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swipe_to_delete: Option<bool>,
}

impl SettingsPatch {
    /// Lenient per-field extraction: malformed fields are skipped
    pub fn from_document(document: &Document) -> Self {
        Self {
            haptic_feedback: document::field(document, HAPTIC_FEEDBACK),
            confirm_delete: document::field(document, CONFIRM_DELETE),
            show_completed_tasks: document::field(document, SHOW_COMPLETED_TASKS),
            auto_delete_completed: document::field(document, AUTO_DELETE_COMPLETED),
            sort_by: document::field(document, SORT_BY),
            font_size: document::field(document, FONT_SIZE),
            animations: document::field(document, ANIMATIONS),
            swipe_to_delete: document::field(document, SWIPE_TO_DELETE),
        }
    }

    /// Add `setting` to the patch, replacing any earlier value for its field
    pub fn with(mut self, setting: Setting) -> Self {
        match setting {
            Setting::HapticFeedback(v) => self.haptic_feedback = Some(v),
            Setting::ConfirmDelete(v) => self.confirm_delete = Some(v),
            Setting::ShowCompletedTasks(v) => self.show_completed_tasks = Some(v),
            Setting::AutoDeleteCompleted(v) => self.auto_delete_completed = Some(v),
            Setting::SortBy(v) => self.sort_by = Some(v),
            Setting::FontSize(v) => self.font_size = Some(v),
            Setting::Animations(v) => self.animations = Some(v),
            Setting::SwipeToDelete(v) => self.swipe_to_delete = Some(v),
        }
        self
    }
}

impl From<Setting> for SettingsPatch {
    fn from(setting: Setting) -> Self {
        SettingsPatch::default().with(setting)
    }
}

/// Owns the [`AppSettings`] record in a [`KeyValueStore`].
///
/// Like the task repository, writes are unisolated read-modify-write cycles.
pub struct SettingsRepository<S> {
    store: Arc<S>,
    key: String,
}

impl<S> Clone for SettingsRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

impl<S: KeyValueStore> SettingsRepository<S> {
    pub fn new(store: Arc<S>, keys: &StoreKeys) -> Self {
        Self {
            store,
            key: keys.settings_key.clone(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load settings, falling back to defaults on any fault
    pub async fn get_all(&self) -> AppSettings {
        match document::load_document(self.store.as_ref(), &self.key).await {
            Ok(doc) => AppSettings::from_document(&doc),
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "failed to read settings, using defaults"
                );
                AppSettings::default()
            }
        }
    }

    /// Persist a single field and return the updated record
    pub async fn update_one(&self, setting: Setting) -> Result<AppSettings> {
        self.update_many(&SettingsPatch::from(setting)).await
    }

    /// Persist several fields in one write and return the updated record
    pub async fn update_many(&self, patch: &SettingsPatch) -> Result<AppSettings> {
        let mut doc = document::load_document(self.store.as_ref(), &self.key).await?;
        let updated = AppSettings::from_document(&doc).merged(patch);
        updated.write_into(&mut doc)?;
        document::save_document(self.store.as_ref(), &self.key, &doc).await?;
        Ok(updated)
    }

    /// Overwrite every settings field with its default.
    ///
    /// Theme preferences and other foreign fields in the document are kept.
    pub async fn reset(&self) -> Result<AppSettings> {
        let mut doc = document::load_document(self.store.as_ref(), &self.key).await?;
        let defaults = AppSettings::default();
        defaults.write_into(&mut doc)?;
        document::save_document(self.store.as_ref(), &self.key, &doc).await?;
        Ok(defaults)
    }
}

fn canonical_key(key: &str) -> Option<&'static str> {
    let wanted = normalize_key(key);
    SETTING_KEYS
        .into_iter()
        .find(|candidate| normalize_key(candidate) == wanted)
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|ch| *ch != '-' && *ch != '_')
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid_value(key, value, &["true", "false"])),
    }
}

fn invalid_value(key: &str, value: &str, expected: &[&str]) -> Error {
    Error::InvalidSettingValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.join("|"),
    }
}
