use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Entity type whose change channel is tracked
    pub entity_type: String,
    pub debounce: DebounceConfig,
    pub polling: PollingConfig,
    pub list: ListConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            entity_type: "issue".to_string(),
            debounce: DebounceConfig::default(),
            polling: PollingConfig::default(),
            list: ListConfig::default(),
        }
    }
}

/// Quiet-period settings for the debounced processing pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period before a processing pass, in milliseconds
    pub quiet_ms: u64,
    /// Quiet period for large, expensive-to-refresh tables
    pub large_quiet_ms: u64,
    /// Treat the tracked table as large
    pub large_table: bool,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_ms: 2000,
            large_quiet_ms: 15000,
            large_table: false,
        }
    }
}

impl DebounceConfig {
    /// Effective quiet window for the tracked table.
    pub fn window(&self) -> Duration {
        let ms = if self.large_table {
            self.large_quiet_ms
        } else {
            self.quiet_ms
        };
        Duration::from_millis(ms)
    }
}

/// Polling fallback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Fallback poll interval while the transport is down, in milliseconds
    pub interval_ms: u64,
    /// How long to wait for a transport lifecycle event before polling
    /// kicks in, in milliseconds
    pub startup_grace_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30000,
            startup_grace_ms: 2000,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn startup_grace(&self) -> Duration {
        Duration::from_millis(self.startup_grace_ms)
    }
}

/// List query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Rows per page for list queries
    pub page_length: usize,
    /// Default sort for list queries
    pub order_by: String,
    /// Enqueue insert notifications (disable for fixed-window lists that
    /// should not shift when a new row appears)
    pub accept_inserts: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_length: 10,
            order_by: "creation desc".to_string(),
            accept_inserts: true,
        }
    }
}

impl SyncConfig {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("ripple");

        fs::create_dir_all(&config_dir)
            .context("Failed to create config directory")?;

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path, or create it if missing
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = SyncConfig::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .context("Failed to read config file")?;

        let config: SyncConfig = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();

        assert_eq!(config.entity_type, "issue");
        assert_eq!(config.debounce.quiet_ms, 2000);
        assert_eq!(config.debounce.large_quiet_ms, 15000);
        assert!(!config.debounce.large_table);
        assert_eq!(config.polling.interval_ms, 30000);
        assert_eq!(config.polling.startup_grace_ms, 2000);
        assert_eq!(config.list.page_length, 10);
        assert_eq!(config.list.order_by, "creation desc");
        assert!(config.list.accept_inserts);
    }

    #[test]
    fn test_debounce_window_selection() {
        let mut debounce = DebounceConfig::default();
        assert_eq!(debounce.window(), Duration::from_secs(2));

        debounce.large_table = true;
        assert_eq!(debounce.window(), Duration::from_secs(15));
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let config = SyncConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: SyncConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.entity_type, deserialized.entity_type);
        assert_eq!(config.debounce.quiet_ms, deserialized.debounce.quiet_ms);
        assert_eq!(config.polling.interval_ms, deserialized.polling.interval_ms);
        assert_eq!(config.list.order_by, deserialized.list.order_by);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial_toml = r#"
entity_type = "ticket"

[debounce]
large_table = true
"#;

        let config: SyncConfig = toml::from_str(partial_toml).unwrap();

        // Custom values
        assert_eq!(config.entity_type, "ticket");
        assert!(config.debounce.large_table);
        // Default values
        assert_eq!(config.debounce.quiet_ms, 2000);
        assert_eq!(config.polling.interval_ms, 30000);
        assert_eq!(config.list.page_length, 10);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = SyncConfig::default();
        config.entity_type = "ticket".to_string();
        config.polling.interval_ms = 5000;
        config.save_to(&path).unwrap();

        let loaded = SyncConfig::load_from(&path).unwrap();
        assert_eq!(loaded.entity_type, "ticket");
        assert_eq!(loaded.polling.interval_ms, 5000);
    }
}
