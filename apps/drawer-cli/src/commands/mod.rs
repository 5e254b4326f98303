//! # Command Handlers
//!
//! One function per [`Command`], grouped by what it touches.
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── dispatch + JSON helper
//! ├── drawer.rs   ◄─── counts, targets, rolls, plan, summary, navigation
//! └── account.rs  ◄─── status, preferences, sign up/out, deletion, billing
//! ```
//!
//! Handlers mutate `state.session` and return the text to print. Saving is
//! not their concern: `run` hands the session to the saver afterwards, so a
//! handler that fails part-way still has its earlier changes flushed.

pub mod account;
pub mod drawer;

use serde::Serialize;

use drawer_db::Database;

use crate::command::Command;
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::CliState;

pub async fn execute(state: &mut CliState, command: Command) -> CliResult<String> {
    match command {
        Command::Show { index } => drawer::show(state, index),
        Command::Count { kind, value } => drawer::count(state, &kind, &value),
        Command::RollValue { kind, value } => drawer::roll_value(state, &kind, &value),
        Command::Target { value } => drawer::target(state, &value),
        Command::CheckoutTarget { value } => drawer::checkout_target(state, &value),
        Command::Rolls { enabled } => drawer::rolls(state, enabled),
        Command::Clear { index } => drawer::clear(state, index),
        Command::Plan { index } => drawer::plan(state, index),
        Command::Summary => drawer::summary(state),
        Command::Select { index } => drawer::select(state, index),
        Command::Step { delta } => drawer::step(state, delta),
        Command::Status => account::status(state),
        Command::DarkMode { enabled } => account::dark_mode(state, enabled),
        Command::SignUp { user_id } => account::sign_up(state, &user_id).await,
        Command::SignOut => account::sign_out(state),
        Command::DeleteAccount => account::delete_account(state).await,
        Command::Billing(_) | Command::Help | Command::Kinds => Err(CliError::new(
            ErrorCode::Internal,
            "command does not run against a session",
        )),
    }
}

/// Commands that only touch the database.
pub async fn execute_without_session(
    db: &Database,
    command: Command,
    json: bool,
) -> CliResult<String> {
    match command {
        Command::Billing(event) => account::billing(db, &event, json).await,
        other => Err(CliError::new(
            ErrorCode::Internal,
            format!("{:?} needs a session", other),
        )),
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(ErrorCode::Internal, format!("JSON output failed: {}", e)))
}
