//! # drawer-sync: Persistence Gateway for Drawer Checkout
//!
//! Gets the drawer session to disk and back without ever making the user
//! wait on storage.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Save Path                                      │
//! │                                                                         │
//! │  DrawerSession (drawer-core)                                           │
//! │       │ take_pending_save()                                             │
//! │       ▼                                                                 │
//! │  ┌────────────────┐   latest only   ┌────────────────────────────────┐ │
//! │  │  SaveHandle    │ ──────────────► │  SaveCoordinator (tokio task)  │ │
//! │  │  (cloneable)   │  watch channel  │  debounce, save in order       │ │
//! │  └────────────────┘                 └───────────────┬────────────────┘ │
//! │                                                     │                  │
//! │                                                     ▼                  │
//! │                     ┌──────────────────────────────────────────────┐   │
//! │                     │ FallbackGateway                              │   │
//! │                     │   SqliteGateway (signed in, drawer-db)       │   │
//! │                     │   LocalFileStore (guest + mirror, JSON)      │   │
//! │                     └──────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Load path: account::open_session resolves the tier from the accounts │
//! │  table and rebuilds the session from the stored document.             │
//! │                                                                         │
//! │  Billing: billing::apply_billing_event writes tiers from verified     │
//! │  payment events.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML + environment configuration
//! - [`gateway`] - `PersistenceGateway` trait and its stores
//! - [`saver`] - Coalescing background saver
//! - [`account`] - Session bootstrap, sign up, sign out, deletion
//! - [`billing`] - Payment events to account tiers
//! - [`error`] - Sync error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use drawer_sync::{AppConfig, FallbackGateway, LocalFileStore, SaveCoordinator, SqliteGateway};
//!
//! let config = AppConfig::load_or_default(None);
//! let db = Database::new(DbConfig::new(config.db_path()?)).await?;
//! let local = LocalFileStore::new(config.local_path()?);
//! let gateway = Arc::new(FallbackGateway::new(
//!     Arc::new(SqliteGateway::new(db.clone(), config.device_id())),
//!     local,
//! ));
//!
//! let mut session = open_session(&db, gateway.as_ref(), Catalog::us_standard(), config.user_id())
//!     .await
//!     .session;
//! let (saver, task) = SaveCoordinator::spawn(gateway, config.debounce());
//!
//! session.set_count("quarter", 12)?;
//! saver.save_session(&mut session).await?;
//!
//! saver.shutdown().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod billing;
pub mod config;
pub mod error;
pub mod gateway;
pub mod saver;

// =============================================================================
// Re-exports
// =============================================================================

pub use account::{delete_account, open_session, resolve_tier, sign_out, sign_up, OpenedSession};
pub use billing::{apply_billing_event, TierChange};
pub use config::AppConfig;
pub use error::{SyncError, SyncResult};
pub use gateway::{FallbackGateway, LocalFileStore, PersistenceGateway, SqliteGateway};
pub use saver::{SaveCoordinator, SaveHandle, SaveRequest, SaveStatus};
