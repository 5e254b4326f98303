//! # drawer-cli: Cash Drawer Balancing from the Terminal
//!
//! Each invocation opens the user's session, runs one command against it,
//! and hands any change to the background saver before exiting.
//!
//! ## Invocation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         drawer <command>                                │
//! │                                                                         │
//! │  1. parse_args          argv ──► Invocation                             │
//! │  2. AppConfig::load     drawer.toml + DRAWER_* env                      │
//! │  3. Database::new       SQLite pool + migrations                        │
//! │  4. open_session        tier from accounts, drawers from storage        │
//! │  5. SaveCoordinator     background saver (tokio task)                   │
//! │  6. commands::execute   mutate session, render output                   │
//! │  7. save_session        queue the latest snapshot                       │
//! │  8. shutdown            flush, then stop the saver                      │
//! │                                                                         │
//! │  help / kinds stop after step 1; billing events stop after step 3.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod command;
pub mod commands;
pub mod error;
pub mod render;
pub mod state;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use drawer_core::{Catalog, DrawerSession};
use drawer_db::{Database, DbConfig};
use drawer_sync::{
    open_session, AppConfig, FallbackGateway, LocalFileStore, PersistenceGateway, SaveCoordinator,
    SaveHandle, SqliteGateway,
};

use crate::command::{parse_args, Command, Invocation, USAGE};
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::CliState;

/// Sets up logging to stderr so command output on stdout stays clean.
///
/// Log level can be controlled via `RUST_LOG` environment variable:
/// - `RUST_LOG=debug` - Show debug logs
/// - `RUST_LOG=drawer_sync=trace` - Trace the save pipeline
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,drawer_cli=info,drawer_sync=info,drawer_db=info,sqlx=warn")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command line and returns what to print.
pub async fn run<I>(args: I) -> CliResult<String>
where
    I: IntoIterator<Item = String>,
{
    let Invocation {
        command,
        config_path,
        drawer,
        json,
    } = parse_args(args)?;

    match command {
        Command::Help => return Ok(USAGE.trim_end().to_string()),
        Command::Kinds => return Ok(render::kinds(&Catalog::us_standard())),
        _ => {}
    }

    let config = AppConfig::load(config_path.clone())?;
    let db = open_database(&config).await?;

    if !command.needs_session() {
        let result = commands::execute_without_session(&db, command, json).await;
        db.close().await;
        return result;
    }

    let local = LocalFileStore::new(config.local_path()?);
    let gateway: Arc<dyn PersistenceGateway> = Arc::new(FallbackGateway::new(
        Arc::new(SqliteGateway::new(db.clone(), config.device_id())),
        local.clone(),
    ));

    let opened = open_session(
        &db,
        gateway.as_ref(),
        Catalog::us_standard(),
        config.user_id(),
    )
    .await;
    if let Some(e) = &opened.load_error {
        warn!(error = %e, "Saved drawers could not be loaded; starting from defaults");
    }

    let (saver, task) = SaveCoordinator::spawn(gateway, config.debounce());
    let mut state = CliState {
        config,
        config_path,
        db,
        local,
        session: opened.session,
        json,
    };

    let result = match drawer {
        Some(index) => match state.session.select_drawer(index) {
            Ok(()) => commands::execute(&mut state, command).await,
            Err(e) => Err(e.into()),
        },
        None => commands::execute(&mut state, command).await,
    };

    let flushed = flush(&saver, task, &mut state.session).await;
    state.db.close().await;

    let output = result?;
    flushed?;
    Ok(output)
}

async fn open_database(config: &AppConfig) -> CliResult<Database> {
    let path = config.db_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::new(
                ErrorCode::StorageError,
                format!("Cannot create {}: {}", parent.display(), e),
            )
        })?;
    }
    Ok(Database::new(DbConfig::new(path)).await?)
}

/// Queues the final snapshot and waits for the saver to write it.
///
/// Write failures were already logged by the saver; they do not fail the
/// command.
async fn flush(
    saver: &SaveHandle,
    task: JoinHandle<()>,
    session: &mut DrawerSession,
) -> CliResult<()> {
    let queued = saver.save_session(session).await?;
    saver.shutdown().await?;
    task.await.map_err(|e| {
        CliError::new(ErrorCode::Internal, format!("Saver task failed: {}", e))
    })?;

    let status = saver.status().await;
    if status.failed > 0 {
        warn!(
            failed = status.failed,
            last_error = ?status.last_error,
            "Changes were not saved; they will be retried on the next change"
        );
    } else {
        info!(
            queued,
            completed = status.completed,
            revision = ?status.last_saved_revision,
            "Session flushed"
        );
    }
    Ok(())
}
