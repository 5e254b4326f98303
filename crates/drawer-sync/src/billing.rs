//! # Billing Events
//!
//! Applies verified payment-provider events to the accounts table. The
//! account tier written here is what the next session load reads; open
//! sessions pick it up through `DrawerSession::apply_tier`.
//!
//! ```text
//! CheckoutCompleted { user, customer }
//!     link_customer(user, customer) ──► set_tier(user, supporter)
//!
//! SubscriptionChanged { customer, status }
//!     find_by_customer(customer) ──► set_tier(owner, entitled ? supporter : user)
//! ```

use serde::Serialize;
use tracing::{info, warn};

use drawer_core::{BillingEvent, Tier};
use drawer_db::{Database, DbError};

use crate::error::{SyncError, SyncResult};

/// What an event did to one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierChange {
    pub user_id: String,
    /// `None` when the account did not exist before the event.
    pub from: Option<Tier>,
    pub to: Tier,
}

impl TierChange {
    pub fn is_change(&self) -> bool {
        self.from != Some(self.to)
    }
}

pub async fn apply_billing_event(db: &Database, event: &BillingEvent) -> SyncResult<TierChange> {
    let accounts = db.accounts();
    let to = event.resulting_tier();

    let (user_id, from) = match event {
        BillingEvent::CheckoutCompleted {
            user_id,
            customer_id,
        } => {
            let from = accounts.get(user_id).await?.map(|a| a.tier());
            accounts
                .link_customer(user_id, customer_id)
                .await
                .map_err(|e| match e {
                    DbError::UniqueViolation { .. } => SyncError::CustomerConflict {
                        customer_id: customer_id.clone(),
                    },
                    other => other.into(),
                })?;
            (user_id.clone(), from)
        }
        BillingEvent::SubscriptionChanged {
            customer_id,
            status,
        } => {
            let owner = accounts.find_by_customer(customer_id).await?.ok_or_else(|| {
                warn!(customer_id = %customer_id, status = %status, "Subscription event for unknown customer");
                SyncError::UnknownCustomer(customer_id.clone())
            })?;
            let from = Some(owner.tier());
            (owner.user_id, from)
        }
    };

    accounts.set_tier(&user_id, to).await?;

    let change = TierChange { user_id, from, to };
    info!(
        user_id = %change.user_id,
        customer_id = %event.customer_id(),
        from = ?change.from,
        to = %change.to,
        "Billing event applied"
    );
    Ok(change)
}
