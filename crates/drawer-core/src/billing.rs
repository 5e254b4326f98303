//! # Billing Events
//!
//! Maps subscription lifecycle events from the payment provider onto tiers.
//! Verifying and decoding the provider's webhook happens upstream; this
//! module only sees already-trusted events.
//!
//! ```text
//! checkout completed (with user reference) ──► supporter
//! subscription status active | trialing    ──► supporter
//! subscription status anything else        ──► user   (never guest)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tier::Tier;

/// Subscription status as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Incomplete,
    IncompleteExpired,
    Unpaid,
    Paused,
    /// Any status string we do not model.
    Other(String),
}

impl SubscriptionStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "active" => Self::Active,
            "trialing" => Self::Trialing,
            "past_due" => Self::PastDue,
            "canceled" => Self::Canceled,
            "incomplete" => Self::Incomplete,
            "incomplete_expired" => Self::IncompleteExpired,
            "unpaid" => Self::Unpaid,
            "paused" => Self::Paused,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the subscription currently entitles the user to supporter.
    pub fn is_entitled(&self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Unpaid => "unpaid",
            Self::Paused => "paused",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for SubscriptionStatus {
    fn from(status: String) -> Self {
        Self::parse(&status)
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified event from the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BillingEvent {
    /// Checkout finished; links the provider customer to our user.
    #[serde(rename_all = "camelCase")]
    CheckoutCompleted { user_id: String, customer_id: String },
    /// Subscription created, updated or deleted.
    #[serde(rename_all = "camelCase")]
    SubscriptionChanged {
        customer_id: String,
        status: SubscriptionStatus,
    },
}

impl BillingEvent {
    /// Tier the affected user should end up on.
    pub fn resulting_tier(&self) -> Tier {
        match self {
            BillingEvent::CheckoutCompleted { .. } => Tier::Supporter,
            BillingEvent::SubscriptionChanged { status, .. } => {
                if status.is_entitled() {
                    Tier::Supporter
                } else {
                    Tier::User
                }
            }
        }
    }

    pub fn customer_id(&self) -> &str {
        match self {
            BillingEvent::CheckoutCompleted { customer_id, .. }
            | BillingEvent::SubscriptionChanged { customer_id, .. } => customer_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_upgrades() {
        let event = BillingEvent::CheckoutCompleted {
            user_id: "u1".to_string(),
            customer_id: "cus_1".to_string(),
        };
        assert_eq!(event.resulting_tier(), Tier::Supporter);
        assert_eq!(event.customer_id(), "cus_1");
    }

    #[test]
    fn test_status_mapping() {
        for (status, tier) in [
            ("active", Tier::Supporter),
            ("trialing", Tier::Supporter),
            ("past_due", Tier::User),
            ("canceled", Tier::User),
            ("incomplete", Tier::User),
            ("unpaid", Tier::User),
            ("something_new", Tier::User),
        ] {
            let event = BillingEvent::SubscriptionChanged {
                customer_id: "cus_1".to_string(),
                status: SubscriptionStatus::parse(status),
            };
            assert_eq!(event.resulting_tier(), tier, "status {status}");
        }
    }

    #[test]
    fn test_parse_round_trips() {
        assert_eq!(SubscriptionStatus::parse("past_due").as_str(), "past_due");
        assert_eq!(
            SubscriptionStatus::parse("weird"),
            SubscriptionStatus::Other("weird".to_string())
        );
    }

    #[test]
    fn test_event_json() {
        let json = r#"{"type":"subscriptionChanged","customerId":"cus_9","status":"trialing"}"#;
        let event: BillingEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.resulting_tier(), Tier::Supporter);

        let json = r#"{"type":"subscriptionChanged","customerId":"cus_9","status":"on_hold"}"#;
        let event: BillingEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.resulting_tier(), Tier::User);
    }
}
