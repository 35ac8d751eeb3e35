//! # Settings
//!
//! User preferences stored as JSON next to the history file. Every field has
//! a default, so a partial or missing file still yields working settings.
//!
//! ```json
//! {
//!   "history_file": "hydrocalc_history.json",
//!   "locale": "pt-BR",
//!   "display_units": { "Perda de Carga (m)": "kPa" },
//!   "save_steps": true
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::format::NumberLocale;

/// Default history file name, relative to the working directory
pub const DEFAULT_HISTORY_FILE: &str = "hydrocalc_history.json";

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "hydrocalc_settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where history and streak are persisted
    pub history_file: PathBuf,

    /// Number locale tag (`pt-BR` or `en-US`)
    pub locale: String,

    /// Preferred display unit per result label
    pub display_units: BTreeMap<String, String>,

    /// Store worked steps with each history entry
    pub save_steps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            locale: "pt-BR".to_string(),
            display_units: BTreeMap::new(),
            save_steps: true,
        }
    }
}

impl Settings {
    /// Resolved number locale; an unknown tag falls back to `pt-BR`.
    pub fn number_locale(&self) -> NumberLocale {
        NumberLocale::from_tag(&self.locale).unwrap_or_else(|| {
            warn!(locale = %self.locale, "unknown locale, using pt-BR");
            NumberLocale::default()
        })
    }

    /// Preferred display unit for a result label, if one is configured.
    pub fn display_unit(&self, label: &str) -> Option<&str> {
        self.display_units.get(label).map(String::as_str)
    }
}
