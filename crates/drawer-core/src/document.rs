//! # User Document
//!
//! The single per-user record the persistence gateway loads and saves: every
//! drawer snapshot, the preferences, and the tier name at save time.
//!
//! ```json
//! {
//!   "drawers": {
//!     "1": { "counts": { "twenty-bill": 4 }, "rollValues": { "quarter-roll": 1000 },
//!            "total": 8000, "target": 10000, "checkoutTarget": 10000, "useRolls": false }
//!   },
//!   "preferences": { "darkMode": true },
//!   "tier": "user",
//!   "revision": 12,
//!   "savedAt": "2026-10-15T12:00:00Z"
//! }
//! ```
//!
//! All amounts are integer cents. Snapshot fields are optional on read so
//! that older or partial documents merge over the default drawer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;
use crate::tier::Tier;

/// Serialized state of one drawer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DrawerSnapshot {
    #[serde(default)]
    pub counts: BTreeMap<String, i64>,
    #[serde(default)]
    pub roll_values: BTreeMap<String, Money>,
    /// Display cache only; recomputed from counts on load.
    #[serde(default)]
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_target: Option<Money>,
    #[serde(default)]
    pub use_rolls: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Everything stored for one user (or the anonymous local slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    /// Keyed by 1-based drawer index. May hold more drawers than the
    /// current tier shows.
    #[serde(default)]
    pub drawers: BTreeMap<usize, DrawerSnapshot>,
    #[serde(default)]
    pub preferences: Preferences,
    /// Tier name as the writer saw it. Informational; the identity
    /// provider stays authoritative.
    #[serde(default = "default_tier_name")]
    pub tier: String,
    /// Session revision that produced this document.
    #[serde(default)]
    pub revision: u64,
    /// Set by the writer; the store keeps the newest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub saved_at: Option<DateTime<Utc>>,
}

fn default_tier_name() -> String {
    Tier::Guest.as_str().to_string()
}

impl UserDocument {
    /// An empty document for `tier`.
    pub fn empty(tier: Tier) -> Self {
        Self {
            drawers: BTreeMap::new(),
            preferences: Preferences::default(),
            tier: tier.as_str().to_string(),
            revision: 0,
            saved_at: None,
        }
    }

    /// Stamps the document before a save.
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.saved_at = Some(at);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
