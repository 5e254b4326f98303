//! # Session Bootstrap and Account Lifecycle
//!
//! Resolves who is using the drawer, which tier they are on, and which
//! document their session starts from.
//!
//! ```text
//! open_session(user)
//!     ├── user None ──► tier guest
//!     └── user Some ──► accounts.get ── missing ──► ensure_account (tier user)
//!                              │
//!                              ▼
//!     gateway.load(user) ── Some ──► DrawerSession::from_document
//!                        ── None ──► DrawerSession::new
//!                        ── Err  ──► DrawerSession::new, error reported
//! ```

use tracing::{info, warn};

use drawer_core::{Catalog, DrawerSession, Tier, TierTransition};
use drawer_db::Database;

use crate::error::{SyncError, SyncResult};
use crate::gateway::{LocalFileStore, PersistenceGateway};

/// A session ready to use, plus what happened while opening it.
#[derive(Debug)]
pub struct OpenedSession {
    pub session: DrawerSession,
    /// The account row was created by this open.
    pub account_created: bool,
    /// Set when storage could not be read; the session started from
    /// defaults and keeps working from memory.
    pub load_error: Option<SyncError>,
}

/// Tier for `user_id` as the accounts table has it.
///
/// A user we have never seen gets an account on the `user` tier. If the
/// table cannot be read the user is capped at guest capacity for this
/// session.
pub async fn resolve_tier(db: &Database, user_id: Option<&str>) -> (Tier, bool) {
    let Some(user_id) = user_id else {
        return (Tier::Guest, false);
    };

    let accounts = db.accounts();
    let lookup = match accounts.get(user_id).await {
        Ok(Some(account)) => Ok((account.tier(), false)),
        Ok(None) => accounts
            .ensure_account(user_id)
            .await
            .map(|(account, created)| (account.tier(), created)),
        Err(e) => Err(e),
    };

    lookup.unwrap_or_else(|e| {
        warn!(user_id = %user_id, error = %e, "Could not read account; using guest capacity");
        (Tier::Guest, false)
    })
}

pub async fn open_session(
    db: &Database,
    gateway: &dyn PersistenceGateway,
    catalog: Catalog,
    user_id: Option<&str>,
) -> OpenedSession {
    let (tier, account_created) = resolve_tier(db, user_id).await;
    let owned_user = user_id.map(str::to_string);

    let (session, load_error) = match gateway.load(user_id).await {
        Ok(Some(document)) => (
            DrawerSession::from_document(catalog, tier, owned_user, &document),
            None,
        ),
        Ok(None) => (DrawerSession::new(catalog, tier, owned_user), None),
        Err(e) => {
            warn!(error = %e, "Load failed; starting from default drawers");
            (DrawerSession::new(catalog, tier, owned_user), Some(e))
        }
    };

    info!(
        user_id = ?user_id,
        tier = %tier,
        drawers = session.drawers().len(),
        revision = session.revision(),
        "Session opened"
    );

    OpenedSession {
        session,
        account_created,
        load_error,
    }
}

/// Signs up (or signs in) `user_id` on this device.
///
/// Guest data stays out of the account: the local file is cleared and the
/// session is rebuilt from the account's stored document, or from a full
/// set of default drawers for a new account.
pub async fn sign_up(
    db: &Database,
    local: &LocalFileStore,
    session: &mut DrawerSession,
    user_id: &str,
) -> SyncResult<TierTransition> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(SyncError::InvalidConfig("user_id must not be blank".into()));
    }

    let (account, created) = db.accounts().ensure_account(user_id).await?;
    let tier = account.tier();
    let stored = match db.documents().load(user_id).await {
        Ok(stored) => stored.map(|s| s.document),
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Could not load account drawers; starting from defaults");
            None
        }
    };
    if let Err(e) = local.clear() {
        warn!(error = %e, "Could not clear local guest document");
    }

    let catalog = session.catalog().clone();
    let previous = session.current_index();
    let from = session.tier();
    let (next, stored_drawers) = match &stored {
        Some(document) => (
            DrawerSession::from_document(catalog, tier, Some(user_id.to_string()), document),
            document.drawers.len(),
        ),
        None => (DrawerSession::new(catalog, tier, Some(user_id.to_string())), 0),
    };
    let transition = TierTransition {
        from,
        to: tier,
        created: next.drawers().len().saturating_sub(stored_drawers),
        selection_clamped: previous != next.current_index(),
    };
    *session = next;

    info!(
        user_id = %user_id,
        created,
        restored = stored.is_some(),
        tier = %tier,
        "Signed in"
    );
    Ok(transition)
}

/// Drops the guest mirror and replaces the session with a fresh guest
/// one, so nothing from the account carries over into guest storage.
pub fn sign_out(local: &LocalFileStore, session: &mut DrawerSession) -> SyncResult<TierTransition> {
    local.clear()?;
    let guest = DrawerSession::new(session.catalog().clone(), Tier::Guest, None);
    let transition = TierTransition {
        from: session.tier(),
        to: Tier::Guest,
        created: guest.drawers().len(),
        selection_clamped: session.current_index() != guest.current_index(),
    };
    *session = guest;
    info!(from = %transition.from, "Signed out");
    Ok(transition)
}

/// Removes the account, its stored document and the local mirror, then
/// signs the session out.
pub async fn delete_account(
    db: &Database,
    local: &LocalFileStore,
    session: &mut DrawerSession,
    user_id: &str,
) -> SyncResult<()> {
    let removed_document = db.documents().delete(user_id).await?;
    let removed_account = db.accounts().delete(user_id).await?;
    sign_out(local, session)?;

    info!(
        user_id = %user_id,
        removed_document,
        removed_account,
        "Account deleted"
    );
    Ok(())
}
