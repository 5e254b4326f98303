//! # CLI Error Type
//!
//! Every failure a command can hit, folded into one type with a
//! machine-readable code and a message for the terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  argv ──► command::parse ── bad args ─────────────► Usage (exit 2)     │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  handler ── CoreError::InvalidInput ──────────────► ValidationError    │
//! │         ── CoreError::CapacityExceeded ───────────► UpgradeRequired    │
//! │         ── CoreError::RequiresAccount ────────────► AccountRequired    │
//! │         ── SyncError / DbError ───────────────────► StorageError, ... │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  main prints "error: ..." (+ hint) and exits 1                          │
//! │                                                                         │
//! │  The session is never torn down by an error: pending changes are       │
//! │  still flushed before exit.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use drawer_core::{CoreError, UpgradePrompt};
use drawer_db::DbError;
use drawer_sync::SyncError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
    /// Follow-up the user can act on, such as an upgrade prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Arguments could not be parsed.
    Usage,
    ValidationError,
    /// Drawer beyond the tier's capacity.
    UpgradeRequired,
    AccountRequired,
    NotFound,
    StorageError,
    ConfigError,
    BillingError,
    Internal,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
            hint: None,
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Usage, message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Process exit status: 2 for bad usage, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            ErrorCode::Usage => 2,
            _ => 1,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(e) => CliError::new(ErrorCode::ValidationError, e.to_string()),
            CoreError::CapacityExceeded { tier, .. } => {
                let error = CliError::new(ErrorCode::UpgradeRequired, err.to_string());
                match UpgradePrompt::for_tier(tier) {
                    Some(prompt) => error.with_hint(prompt.message()),
                    None => error,
                }
            }
            CoreError::UnknownDenomination(ref id) => CliError::new(ErrorCode::NotFound, err.to_string())
                .with_hint(format!("Run `drawer kinds` to list denomination ids (got '{}')", id)),
            CoreError::NotARoll(_) => CliError::new(ErrorCode::ValidationError, err.to_string()),
            CoreError::RequiresAccount { .. } => CliError::new(ErrorCode::AccountRequired, err.to_string())
                .with_hint(UpgradePrompt::SignUp.message()),
            CoreError::InvalidCatalog { .. } => CliError::new(ErrorCode::Internal, err.to_string()),
        }
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        let code = if err.is_config_error() {
            ErrorCode::ConfigError
        } else if err.is_persistence_error() {
            ErrorCode::StorageError
        } else {
            match err {
                SyncError::UnknownCustomer(_) | SyncError::CustomerConflict { .. } => {
                    ErrorCode::BillingError
                }
                _ => ErrorCode::Internal,
            }
        };
        CliError::new(code, err.to_string())
    }
}

impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                CliError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            other => {
                tracing::error!(error = %other, "Database error");
                CliError::new(ErrorCode::StorageError, other.to_string())
            }
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {}
