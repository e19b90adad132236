//! Theme and accent color preferences.
//!
//! These live as `theme` and `tintColor` fields in the settings document but
//! evolve independently of [`crate::settings::AppSettings`]: each record only
//! ever rewrites its own fields.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::StoreKeys;
use crate::document::{self, Document};
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

const THEME: &str = "theme";
const TINT_COLOR: &str = "tintColor";

/// Light/dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// Follow the system appearance
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Auto, ThemeName::Light, ThemeName::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Auto => "auto",
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        ThemeName::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidSettingValue {
                key: THEME.to_string(),
                value: s.to_string(),
                expected: ThemeName::ALL.map(|v| v.as_str()).join("|"),
            })
    }
}

/// Accent color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TintColor {
    #[default]
    Blue,
    Green,
    Red,
    Orange,
    Purple,
    Pink,
    Yellow,
    /// Foreground color of the active theme instead of a hue
    Monochromic,
}

impl TintColor {
    pub const ALL: [TintColor; 8] = [
        TintColor::Blue,
        TintColor::Green,
        TintColor::Red,
        TintColor::Orange,
        TintColor::Purple,
        TintColor::Pink,
        TintColor::Yellow,
        TintColor::Monochromic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TintColor::Blue => "blue",
            TintColor::Green => "green",
            TintColor::Red => "red",
            TintColor::Orange => "orange",
            TintColor::Purple => "purple",
            TintColor::Pink => "pink",
            TintColor::Yellow => "yellow",
            TintColor::Monochromic => "monochromic",
        }
    }
}

impl fmt::Display for TintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TintColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        TintColor::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidSettingValue {
                key: TINT_COLOR.to_string(),
                value: s.to_string(),
                expected: TintColor::ALL.map(|v| v.as_str()).join("|"),
            })
    }
}

/// Appearance preference pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreferences {
    pub theme: ThemeName,
    pub tint_color: TintColor,
}

impl ThemePreferences {
    /// Read both fields, defaulting each one that is missing or unknown
    pub fn from_document(doc: &Document) -> Self {
        Self {
            theme: document::field(doc, THEME).unwrap_or_default(),
            tint_color: document::field(doc, TINT_COLOR).unwrap_or_default(),
        }
    }
}

/// Owns the theme fields of the settings document
pub struct ThemeRepository<S> {
    store: Arc<S>,
    key: String,
}

impl<S> Clone for ThemeRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

impl<S: KeyValueStore> ThemeRepository<S> {
    pub fn new(store: Arc<S>, keys: &StoreKeys) -> Self {
        Self {
            store,
            key: keys.settings_key.clone(),
        }
    }

    /// Load theme preferences, falling back to defaults on any fault
    pub async fn get(&self) -> ThemePreferences {
        match document::load_document(self.store.as_ref(), &self.key).await {
            Ok(doc) => ThemePreferences::from_document(&doc),
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "failed to read theme, using defaults"
                );
                ThemePreferences::default()
            }
        }
    }

    pub async fn set_theme(&self, theme: ThemeName) -> Result<ThemePreferences> {
        self.update(|prefs| prefs.theme = theme).await
    }

    pub async fn set_tint_color(&self, tint_color: TintColor) -> Result<ThemePreferences> {
        self.update(|prefs| prefs.tint_color = tint_color).await
    }

    /// Both theme fields are written on every change, so the stored pair is
    /// always complete. Settings fields in the document are left as they are.
    async fn update(
        &self,
        change: impl FnOnce(&mut ThemePreferences) + Send,
    ) -> Result<ThemePreferences> {
        let mut doc = document::load_document(self.store.as_ref(), &self.key).await?;
        let mut prefs = ThemePreferences::from_document(&doc);
        change(&mut prefs);

        doc.insert(THEME.to_string(), Value::from(prefs.theme.as_str()));
        doc.insert(TINT_COLOR.to_string(), Value::from(prefs.tint_color.as_str()));
        document::save_document(self.store.as_ref(), &self.key, &doc).await?;
        Ok(prefs)
    }
}
