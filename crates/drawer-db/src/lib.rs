//! # drawer-db: Database Layer for Drawer Checkout
//!
//! SQLite storage behind the persistence gateway, using sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaveCoordinator / billing (drawer-sync)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     drawer-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ DocumentRepository │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ AccountRepository  │  │ 001_...sql │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  drawer.db (platform data dir, or DRAWER_DB_PATH)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use drawer_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("drawer.db")).await?;
//! let stored = db.documents().load("user-123").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::account::{AccountRecord, AccountRepository};
pub use repository::document::{DocumentRepository, SaveOutcome, StoredDocument};
