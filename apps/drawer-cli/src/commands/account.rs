//! Account commands: identity, preferences and billing events.

use serde::Serialize;

use drawer_core::{BillingEvent, CoreError, Tier, TierTransition};
use drawer_db::Database;

use super::to_json;
use crate::error::CliResult;
use crate::render;
use crate::state::CliState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView<'a> {
    user_id: Option<&'a str>,
    tier: Tier,
    capacity: usize,
    stored_drawers: usize,
    current_drawer: usize,
    dark_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    upgrade_prompt: Option<&'static str>,
}

pub fn status(state: &CliState) -> CliResult<String> {
    let session = &state.session;
    if state.json {
        return to_json(&StatusView {
            user_id: session.user_id(),
            tier: session.tier(),
            capacity: session.capacity(),
            stored_drawers: session.drawers().len(),
            current_drawer: session.current_index(),
            dark_mode: session.preferences().dark_mode,
            upgrade_prompt: session.upgrade_prompt().map(|p| p.message()),
        });
    }
    Ok(render::status(session))
}

pub fn dark_mode(state: &mut CliState, enabled: bool) -> CliResult<String> {
    state.session.set_dark_mode(enabled)?;
    Ok(format!(
        "Dark mode {}",
        if enabled { "on" } else { "off" }
    ))
}

pub async fn sign_up(state: &mut CliState, user_id: &str) -> CliResult<String> {
    let transition =
        drawer_sync::sign_up(&state.db, &state.local, &mut state.session, user_id).await?;
    let user_id = user_id.trim();
    let remembered = state.remember_user(Some(user_id));

    let mut out = format!("Signed in as {}. {}", user_id, describe(&transition));
    if !remembered {
        out.push_str("\nThe config file could not be updated; pass DRAWER_USER_ID next time.");
    }
    Ok(out)
}

pub fn sign_out(state: &mut CliState) -> CliResult<String> {
    let transition = drawer_sync::sign_out(&state.local, &mut state.session)?;
    state.remember_user(None);
    Ok(format!("Signed out. {}", describe(&transition)))
}

pub async fn delete_account(state: &mut CliState) -> CliResult<String> {
    let user_id = state
        .session
        .user_id()
        .map(str::to_string)
        .ok_or_else(|| CoreError::RequiresAccount {
            feature: "Deleting an account".to_string(),
        })?;

    drawer_sync::delete_account(&state.db, &state.local, &mut state.session, &user_id).await?;
    state.remember_user(None);
    Ok(format!(
        "Account {} and its saved drawers were deleted. Continuing as guest.",
        user_id
    ))
}

/// Applies a payment event to the accounts table. The affected user sees
/// the new tier on their next run.
pub async fn billing(db: &Database, event: &BillingEvent, json: bool) -> CliResult<String> {
    let change = drawer_sync::apply_billing_event(db, event).await?;
    if json {
        return to_json(&change);
    }

    Ok(match change.from {
        Some(from) if !change.is_change() => {
            format!("{}: tier unchanged ({})", change.user_id, from)
        }
        Some(from) => format!("{}: {} -> {}", change.user_id, from, change.to),
        None => format!("{}: new account on tier {}", change.user_id, change.to),
    })
}

fn describe(transition: &TierTransition) -> String {
    let mut out = format!(
        "Tier {} ({} drawer{}).",
        transition.to,
        transition.to.capacity(),
        if transition.to.capacity() == 1 { "" } else { "s" }
    );
    if transition.created > 0 {
        out.push_str(&format!(" {} new drawer(s) ready.", transition.created));
    }
    out
}
