//! Agenda configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::clock::SystemClock;
use crate::constants::DEFAULT_ROW_CAPACITY;
use crate::error::{AgendaError, AgendaResult};

static DEFAULT_EVENTS_FILE: &str = "~/.local/share/agenda/events.json";
static DEFAULT_TIMEZONE: &str = "UTC";

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

fn is_default_events_file(p: &PathBuf) -> bool {
    *p == default_events_file()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_row_capacity() -> usize {
    DEFAULT_ROW_CAPACITY
}

/// Configuration at ~/.config/agenda/config.toml
///
/// Every key can also be set through the environment with an `AGENDA_`
/// prefix, e.g. `AGENDA_ROW_CAPACITY=4`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgendaConfig {
    /// JSON file holding the event rows
    #[serde(default = "default_events_file", skip_serializing_if = "is_default_events_file")]
    pub events_file: PathBuf,

    /// IANA timezone that defines "today"
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_row_capacity")]
    pub row_capacity: usize,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            events_file: default_events_file(),
            timezone: default_timezone(),
            row_capacity: default_row_capacity(),
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file
    /// on first use.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> AgendaResult<Self> {
        let config: AgendaConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("AGENDA"))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AgendaResult<()> {
        if self.row_capacity == 0 {
            return Err(AgendaError::Config("row_capacity must be at least 1".into()));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> AgendaResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AgendaError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    pub fn clock(&self) -> AgendaResult<SystemClock> {
        Ok(SystemClock::new(self.tz()?))
    }

    /// Events file with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.events_file.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn save(&self, path: &Path) -> AgendaResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| AgendaError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Where your event rows live (JSON array):
# events_file = \"{}\"

# Timezone used to decide what \"today\" is:
# timezone = \"{}\"

# Event bars per calendar week before the rest collapse into \"+N\":
# row_capacity = {}
",
            DEFAULT_EVENTS_FILE, DEFAULT_TIMEZONE, DEFAULT_ROW_CAPACITY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda/config.toml");

        AgendaConfig::create_default_config(&path).unwrap();
        let config = AgendaConfig::load_from(&path).unwrap();

        assert_eq!(config, AgendaConfig::default());
        assert_eq!(config.tz().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AgendaConfig {
            events_file: PathBuf::from("/tmp/events.json"),
            timezone: "Europe/Berlin".to_string(),
            row_capacity: 4,
        };
        config.save(&path).unwrap();

        let loaded = AgendaConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.events_path(), PathBuf::from("/tmp/events.json"));
        assert_eq!(loaded.tz().unwrap(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "row_capacity = 0\n").unwrap();
        assert!(matches!(AgendaConfig::load_from(&path), Err(AgendaError::Config(_))));

        std::fs::write(&path, "timezone = \"Mars/Olympus_Mons\"\n").unwrap();
        assert!(matches!(AgendaConfig::load_from(&path), Err(AgendaError::Config(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AgendaConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.row_capacity, DEFAULT_ROW_CAPACITY);
    }
}
