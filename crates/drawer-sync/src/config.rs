//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DRAWER_DEVICE_ID, DRAWER_DB_PATH, DRAWER_LOCAL_PATH,               │
//! │     DRAWER_SAVE_DEBOUNCE_MS, DRAWER_USER_ID                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/drawer-checkout/drawer.toml (Linux)                      │
//! │     ~/Library/Application Support/com.drawer.checkout/drawer.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     generated device id, files under the platform data dir             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [device]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "Front counter"
//!
//! [storage]
//! db_path = "/var/lib/drawer/drawer.db"
//! local_path = "/var/lib/drawer/guest.json"
//!
//! [save]
//! debounce_ms = 250
//!
//! [account]
//! user_id = "u_123"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};

/// Upper bound on the save debounce. Longer than this and a crash loses
/// noticeable work.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

// =============================================================================
// Device Configuration
// =============================================================================

/// Identifies which client wrote a stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Generated on first run if not provided.
    pub id: String,

    #[serde(default = "default_device_name")]
    pub name: String,
}

fn default_device_name() -> String {
    "Cash Drawer".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            id: Uuid::new_v4().to_string(),
            name: default_device_name(),
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

/// Where documents live. Unset paths resolve under the platform data dir.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database holding signed-in users' documents and accounts.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// JSON file holding the anonymous (guest) document.
    #[serde(default)]
    pub local_path: Option<PathBuf>,
}

// =============================================================================
// Save Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSettings {
    /// Quiet period before a pending snapshot is written. Snapshots that
    /// arrive inside the window replace the pending one.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    250
}

impl Default for SaveSettings {
    fn default() -> Self {
        SaveSettings {
            debounce_ms: default_debounce_ms(),
        }
    }
}

// =============================================================================
// Account Settings
// =============================================================================

/// The signed-in identity, if any. Absent means guest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountSettings {
    #[serde(default)]
    pub user_id: Option<String>,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub save: SaveSettings,

    #[serde(default)]
    pub account: AccountSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (drawer.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.device.id.trim().is_empty() {
            return Err(SyncError::MissingDeviceId);
        }

        if self.save.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(SyncError::InvalidConfig(format!(
                "debounce_ms must be at most {}, got {}",
                MAX_DEBOUNCE_MS, self.save.debounce_ms
            )));
        }

        for (name, path) in [
            ("db_path", &self.storage.db_path),
            ("local_path", &self.storage.local_path),
        ] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(SyncError::InvalidConfig(format!("{} must not be empty", name)));
            }
        }

        if self
            .account
            .user_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(SyncError::InvalidConfig("user_id must not be blank".into()));
        }

        Ok(())
    }

    /// Applies `DRAWER_*` overrides read through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("DRAWER_DEVICE_ID") {
            debug!(device_id = %id, "Overriding device ID from environment");
            self.device.id = id;
        }

        if let Some(path) = lookup("DRAWER_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.db_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("DRAWER_LOCAL_PATH") {
            debug!(path = %path, "Overriding local store path from environment");
            self.storage.local_path = Some(PathBuf::from(path));
        }

        if let Some(ms) = lookup("DRAWER_SAVE_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.save.debounce_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring non-numeric DRAWER_SAVE_DEBOUNCE_MS"),
            }
        }

        if let Some(user_id) = lookup("DRAWER_USER_ID") {
            debug!(user_id = %user_id, "Overriding user from environment");
            self.account.user_id = if user_id.is_empty() { None } else { Some(user_id) };
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "drawer", "checkout")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("drawer.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn device_id(&self) -> &str {
        &self.device.id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.account.user_id.as_deref()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.save.debounce_ms)
    }

    /// Database path, falling back to `drawer.db` in the data dir.
    pub fn db_path(&self) -> SyncResult<PathBuf> {
        self.resolve(&self.storage.db_path, "drawer.db")
    }

    /// Guest document path, falling back to `guest.json` in the data dir.
    pub fn local_path(&self) -> SyncResult<PathBuf> {
        self.resolve(&self.storage.local_path, "guest.json")
    }

    fn resolve(&self, configured: &Option<PathBuf>, file_name: &str) -> SyncResult<PathBuf> {
        if let Some(path) = configured {
            return Ok(path.clone());
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(file_name))
            .ok_or_else(|| {
                SyncError::InvalidConfig(format!("No data directory available for {}", file_name))
            })
    }
}
