//! Counting policy and user configuration.
//!
//! Configuration is a TOML file. Every key is optional and falls back to
//! the compiled default, so an empty or missing file is a valid config:
//!
//! ```toml
//! daily_word_goal = 750
//! show_goal = true
//! display_update_delay_ms = 250
//! save_delay_ms = 1000
//!
//! [count]
//! count_comments = false
//! count_full_link = false
//! remove_frontmatter = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, WordToolsError};

/// Environment variable that points at the config file.
pub const CONFIG_ENV_VAR: &str = "WORDTOOLS_CONFIG";

/// Which structural markup counts towards a document's words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CountSettings {
    /// Count text inside `%%comment%%` spans.
    pub count_comments: bool,
    /// Count the whole `[[target|alias]]` link instead of only its alias.
    pub count_full_link: bool,
    /// Exclude a leading front-matter block.
    pub remove_frontmatter: bool,
}

impl Default for CountSettings {
    fn default() -> Self {
        Self {
            count_comments: false,
            count_full_link: false,
            remove_frontmatter: true,
        }
    }
}

/// Complete user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordToolsConfig {
    /// Daily goal stored alongside each new day record. Never enforced.
    pub daily_word_goal: u64,
    /// Show `/goal` after today's count.
    pub show_goal: bool,
    /// Quiet period before the displayed counts refresh.
    pub display_update_delay_ms: u64,
    /// Quiet period before a vault-wide recount.
    pub global_update_delay_ms: u64,
    /// Quiet period before the history is flushed to disk.
    pub save_delay_ms: u64,
    #[serde(rename = "count")]
    pub count_settings: CountSettings,
}

impl Default for WordToolsConfig {
    fn default() -> Self {
        Self {
            daily_word_goal: 500,
            show_goal: true,
            display_update_delay_ms: 250,
            global_update_delay_ms: 1000,
            save_delay_ms: 1000,
            count_settings: CountSettings::default(),
        }
    }
}

impl WordToolsConfig {
    /// Parse a config from TOML text. `origin` names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns [`WordToolsError::Config`] with [`ConfigError::Parse`] for
    /// malformed TOML or mistyped keys (including a negative goal).
    pub fn from_toml_str(text: &str, origin: &str) -> crate::Result<Self> {
        toml::from_str(text).map_err(|e| {
            WordToolsError::from(ConfigError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            })
        })
    }

    /// Load a config file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WordToolsError::Config`] with [`ConfigError::Read`] if the
    /// file exists but cannot be read, or [`ConfigError::Parse`] if it is
    /// not a valid config.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let origin = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text, &origin),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %origin, "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: origin,
                source,
            }
            .into()),
        }
    }

    /// Config path from [`CONFIG_ENV_VAR`], if set.
    #[must_use]
    pub fn env_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)
    }

    /// Serialize back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`WordToolsError::Serialization`] if serialization fails.
    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| WordToolsError::Serialization(e.to_string()))
    }

    #[must_use]
    pub fn display_update_delay(&self) -> Duration {
        Duration::from_millis(self.display_update_delay_ms)
    }

    #[must_use]
    pub fn global_update_delay(&self) -> Duration {
        Duration::from_millis(self.global_update_delay_ms)
    }

    #[must_use]
    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }
}
