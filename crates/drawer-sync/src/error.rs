//! # Sync Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Persistence   │  │     Billing             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  PersistenceFail│  │  UnknownCustomer        │ │
//! │  │  MissingDeviceId│  │  Database       │  │  CustomerConflict       │ │
//! │  │  ConfigLoad/Save│  │  LocalStore     │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these end the session. A failed save is logged and the next
//! mutation tries again with the newer document.

use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Device ID not configured")]
    MissingDeviceId,

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// Save or load failed. The in-memory session stays authoritative.
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Local fallback file could not be read or written.
    #[error("Local store error: {0}")]
    LocalStore(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    // =========================================================================
    // Billing Errors
    // =========================================================================
    /// A subscription event named a customer no account is linked to.
    #[error("No account linked to customer {0}")]
    UnknownCustomer(String),

    #[error("Customer {customer_id} is already linked to another account")]
    CustomerConflict { customer_id: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Saver is shutting down")]
    ShuttingDown,

    #[error("Channel error: {0}")]
    ChannelError(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<drawer_db::DbError> for SyncError {
    fn from(err: drawer_db::DbError) -> Self {
        SyncError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationFailed(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

impl SyncError {
    /// Whether the error came from reaching storage, as opposed to bad input
    /// or configuration.
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            SyncError::PersistenceFailed(_)
                | SyncError::DatabaseError(_)
                | SyncError::LocalStore(_)
                | SyncError::SerializationFailed(_)
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::MissingDeviceId
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(SyncError::PersistenceFailed("disk full".into()).is_persistence_error());
        assert!(SyncError::LocalStore("read-only".into()).is_persistence_error());
        assert!(!SyncError::MissingDeviceId.is_persistence_error());

        assert!(SyncError::MissingDeviceId.is_config_error());
        assert!(!SyncError::UnknownCustomer("cus_1".into()).is_config_error());
    }

    #[test]
    fn test_db_error_converts() {
        let err: SyncError = drawer_db::DbError::PoolExhausted.into();
        assert!(matches!(err, SyncError::DatabaseError(_)));
        assert!(err.is_persistence_error());
    }

    #[test]
    fn test_display() {
        let err = SyncError::CustomerConflict {
            customer_id: "cus_9".into(),
        };
        assert_eq!(
            err.to_string(),
            "Customer cus_9 is already linked to another account"
        );
    }
}
