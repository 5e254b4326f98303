//! # CLI State
//!
//! Everything one invocation works against, opened once in `run` and
//! handed to the command handlers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CliState                                        │
//! │                                                                         │
//! │  config / config_path   identity + storage paths (drawer.toml)         │
//! │  db                     accounts + signed-in documents (SQLite)        │
//! │  local                  guest document + mirror (JSON)                 │
//! │  session                the drawers being edited                       │
//! │  json                   output format                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use tracing::{info, warn};

use drawer_core::DrawerSession;
use drawer_db::Database;
use drawer_sync::{AppConfig, LocalFileStore};

pub struct CliState {
    pub config: AppConfig,
    pub config_path: Option<PathBuf>,
    pub db: Database,
    pub local: LocalFileStore,
    pub session: DrawerSession,
    pub json: bool,
}

impl CliState {
    /// Records the signed-in identity in the config file so the next run
    /// opens the same session.
    ///
    /// A config that cannot be written leaves this run unaffected.
    pub fn remember_user(&mut self, user_id: Option<&str>) -> bool {
        self.config.account.user_id = user_id.map(str::to_string);
        match self.config.save(self.config_path.clone()) {
            Ok(()) => {
                info!(user_id = ?user_id, "Identity saved to config");
                true
            }
            Err(e) => {
                warn!(error = %e, "Could not save identity to config");
                false
            }
        }
    }
}
