//! # Tier Policy
//!
//! Maps an account tier to how many drawers it may see and edit.
//!
//! ```text
//! ┌───────────────┬──────────┬────────────────────────────────────────────┐
//! │ Tier          │ Capacity │ How you get it                             │
//! ├───────────────┼──────────┼────────────────────────────────────────────┤
//! │ guest         │    1     │ not signed in                              │
//! │ user          │    3     │ signup, or subscription no longer active   │
//! │ supporter     │   10     │ completed checkout / active subscription   │
//! │ (anything)    │    1     │ unrecognized tier names fail closed        │
//! └───────────────┴──────────┴────────────────────────────────────────────┘
//! ```
//!
//! The tier is supplied from outside (identity provider or billing events)
//! and only read here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Capacity applied to tier names we do not recognize.
pub const FALLBACK_CAPACITY: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Guest,
    User,
    Supporter,
}

impl Tier {
    /// Maximum number of drawers visible on this tier.
    pub const fn capacity(self) -> usize {
        match self {
            Tier::Guest => 1,
            Tier::User => 3,
            Tier::Supporter => 10,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Guest => "guest",
            Tier::User => "user",
            Tier::Supporter => "supporter",
        }
    }

    /// Whether this tier belongs to a signed-in account.
    pub const fn has_account(self) -> bool {
        !matches!(self, Tier::Guest)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(Tier::Guest),
            "user" => Ok(Tier::User),
            "supporter" => Ok(Tier::Supporter),
            _ => Err(ValidationError::NotAllowed {
                field: "tier".to_string(),
                allowed: vec![
                    "guest".to_string(),
                    "user".to_string(),
                    "supporter".to_string(),
                ],
            }),
        }
    }
}

/// Drawer capacity for a tier.
pub const fn capacity_for(tier: Tier) -> usize {
    tier.capacity()
}

/// Drawer capacity for a stored tier name; unknown names get 1.
pub fn capacity_for_name(name: &str) -> usize {
    name.parse::<Tier>()
        .map(Tier::capacity)
        .unwrap_or(FALLBACK_CAPACITY)
}

// =============================================================================
// Upgrade prompt
// =============================================================================

/// What to offer a user who hits the drawer limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum UpgradePrompt {
    /// Guest: create a free account.
    SignUp,
    /// User: subscribe as a supporter.
    BecomeSupporter,
}

impl UpgradePrompt {
    /// `None` when there is no higher tier.
    pub const fn for_tier(tier: Tier) -> Option<Self> {
        match tier {
            Tier::Guest => Some(UpgradePrompt::SignUp),
            Tier::User => Some(UpgradePrompt::BecomeSupporter),
            Tier::Supporter => None,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            UpgradePrompt::SignUp => {
                "Guests are limited to 1 drawer. Sign up for a free account to get 3 drawers!"
            }
            UpgradePrompt::BecomeSupporter => {
                "You have 3 drawers. Upgrade to Supporter to get up to 10!"
            }
        }
    }

    pub const fn action(self) -> &'static str {
        match self {
            UpgradePrompt::SignUp => "Sign Up Now",
            UpgradePrompt::BecomeSupporter => "Upgrade to Supporter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacities() {
        assert_eq!(capacity_for(Tier::Guest), 1);
        assert_eq!(capacity_for(Tier::User), 3);
        assert_eq!(capacity_for(Tier::Supporter), 10);
    }

    #[test]
    fn test_unknown_name_fails_closed() {
        assert_eq!(capacity_for_name("supporter"), 10);
        assert_eq!(capacity_for_name("user"), 3);
        assert_eq!(capacity_for_name("admin"), 1);
        assert_eq!(capacity_for_name(""), 1);
        assert_eq!(capacity_for_name("Supporter"), 1);
    }

    #[test]
    fn test_round_trips_name() {
        for tier in [Tier::Guest, Tier::User, Tier::Supporter] {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
            assert_eq!(
                serde_json::to_string(&tier).unwrap(),
                format!("\"{}\"", tier.as_str())
            );
        }
    }

    #[test]
    fn test_upgrade_prompt() {
        assert_eq!(UpgradePrompt::for_tier(Tier::Guest), Some(UpgradePrompt::SignUp));
        assert_eq!(
            UpgradePrompt::for_tier(Tier::User),
            Some(UpgradePrompt::BecomeSupporter)
        );
        assert_eq!(UpgradePrompt::for_tier(Tier::Supporter), None);
    }
}
