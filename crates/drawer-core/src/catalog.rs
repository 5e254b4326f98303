//! # Denomination Catalog
//!
//! The ordered list of bills, coins and rolls a drawer can hold.
//!
//! Catalog order is removal precedence: the planner walks it front to back,
//! so bills come first (high to low), then coins (high to low), then rolls.
//! The catalog is a value handed to drawers and the planner, never a global,
//! so a different currency set can be injected without touching either.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  US standard catalog                                                    │
//! │                                                                         │
//! │  bills   100  50  20  10  5  2  1                                       │
//! │  coins   1.00  0.50  0.25  0.10  0.05  0.01                             │
//! │  rolls   quarter 10.00  dime 5.00  nickel 2.00  penny 0.50  (defaults)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Denomination ids
// =============================================================================

pub const HUNDRED_BILL: &str = "hundred-bill";
pub const FIFTY_BILL: &str = "fifty-bill";
pub const TWENTY_BILL: &str = "twenty-bill";
pub const TEN_BILL: &str = "ten-bill";
pub const FIVE_BILL: &str = "five-bill";
pub const TWO_BILL: &str = "two-bill";
pub const ONE_BILL: &str = "one-bill";
pub const DOLLAR_COIN: &str = "dollar-coin";
pub const HALF_DOLLAR: &str = "half-dollar";
pub const QUARTER: &str = "quarter";
pub const DIME: &str = "dime";
pub const NICKEL: &str = "nickel";
pub const PENNY: &str = "penny";
pub const QUARTER_ROLL: &str = "quarter-roll";
pub const DIME_ROLL: &str = "dime-roll";
pub const NICKEL_ROLL: &str = "nickel-roll";
pub const PENNY_ROLL: &str = "penny-roll";

// =============================================================================
// DenominationKind
// =============================================================================

/// One kind of bill, coin or roll.
///
/// For roll kinds `face_value` is only the default; each drawer carries its
/// own roll values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DenominationKind {
    /// Stable symbolic key used in documents (e.g. `quarter-roll`).
    pub id: String,
    /// Display name used in removal lines (e.g. "Quarter roll").
    pub label: String,
    pub face_value: Money,
    pub is_roll: bool,
}

impl DenominationKind {
    pub fn new(id: &str, label: &str, face_value: Money, is_roll: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            face_value,
            is_roll,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Ordered, validated set of denomination kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    kinds: Vec<DenominationKind>,
}

impl Catalog {
    /// Builds a catalog from kinds in removal order.
    ///
    /// Rejects duplicate ids, non-positive face values, and a roll listed
    /// ahead of a loose bill or coin.
    pub fn new(kinds: Vec<DenominationKind>) -> CoreResult<Self> {
        if kinds.is_empty() {
            return Err(CoreError::InvalidCatalog {
                reason: "catalog has no denominations".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut rolls_started = false;
        for kind in &kinds {
            if kind.id.trim().is_empty() {
                return Err(CoreError::InvalidCatalog {
                    reason: "denomination id is empty".to_string(),
                });
            }
            if !seen.insert(kind.id.as_str()) {
                return Err(CoreError::InvalidCatalog {
                    reason: format!("duplicate denomination id '{}'", kind.id),
                });
            }
            if !kind.face_value.is_positive() {
                return Err(CoreError::InvalidCatalog {
                    reason: format!("'{}' must have a positive face value", kind.id),
                });
            }
            if kind.is_roll {
                rolls_started = true;
            } else if rolls_started {
                return Err(CoreError::InvalidCatalog {
                    reason: format!("'{}' is listed after the rolls", kind.id),
                });
            }
        }

        Ok(Self { kinds })
    }

    /// US bills, coins and rolls with the usual roll defaults.
    pub fn us_standard() -> Self {
        let kinds = vec![
            DenominationKind::new(HUNDRED_BILL, "$100 bill", Money::from_dollars(100), false),
            DenominationKind::new(FIFTY_BILL, "$50 bill", Money::from_dollars(50), false),
            DenominationKind::new(TWENTY_BILL, "$20 bill", Money::from_dollars(20), false),
            DenominationKind::new(TEN_BILL, "$10 bill", Money::from_dollars(10), false),
            DenominationKind::new(FIVE_BILL, "$5 bill", Money::from_dollars(5), false),
            DenominationKind::new(TWO_BILL, "$2 bill", Money::from_dollars(2), false),
            DenominationKind::new(ONE_BILL, "$1 bill", Money::from_dollars(1), false),
            DenominationKind::new(DOLLAR_COIN, "Dollar coin", Money::from_cents(100), false),
            DenominationKind::new(HALF_DOLLAR, "Half-dollar", Money::from_cents(50), false),
            DenominationKind::new(QUARTER, "Quarter", Money::from_cents(25), false),
            DenominationKind::new(DIME, "Dime", Money::from_cents(10), false),
            DenominationKind::new(NICKEL, "Nickel", Money::from_cents(5), false),
            DenominationKind::new(PENNY, "Penny", Money::from_cents(1), false),
            DenominationKind::new(QUARTER_ROLL, "Quarter roll", Money::from_cents(1000), true),
            DenominationKind::new(DIME_ROLL, "Dime roll", Money::from_cents(500), true),
            DenominationKind::new(NICKEL_ROLL, "Nickel roll", Money::from_cents(200), true),
            DenominationKind::new(PENNY_ROLL, "Penny roll", Money::from_cents(50), true),
        ];
        Self { kinds }
    }

    pub fn get(&self, id: &str) -> Option<&DenominationKind> {
        self.kinds.iter().find(|k| k.id == id)
    }

    /// Looks up a kind, failing with `UnknownDenomination`.
    pub fn require(&self, id: &str) -> CoreResult<&DenominationKind> {
        self.get(id)
            .ok_or_else(|| CoreError::UnknownDenomination(id.to_string()))
    }

    /// All kinds in removal order.
    pub fn kinds(&self) -> impl Iterator<Item = &DenominationKind> {
        self.kinds.iter()
    }

    /// Kinds that count toward totals and removal under the roll toggle.
    pub fn active(&self, use_rolls: bool) -> impl Iterator<Item = &DenominationKind> {
        self.kinds.iter().filter(move |k| use_rolls || !k.is_roll)
    }

    pub fn rolls(&self) -> impl Iterator<Item = &DenominationKind> {
        self.kinds.iter().filter(|k| k.is_roll)
    }

    /// Default per-drawer roll values, keyed by roll id.
    pub fn default_roll_values(&self) -> BTreeMap<String, Money> {
        self.rolls()
            .map(|k| (k.id.clone(), k.face_value))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::us_standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_standard_order() {
        let catalog = Catalog::us_standard();
        let ids: Vec<&str> = catalog.kinds().map(|k| k.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&HUNDRED_BILL));
        assert_eq!(ids[12], PENNY);
        assert_eq!(&ids[13..], &[QUARTER_ROLL, DIME_ROLL, NICKEL_ROLL, PENNY_ROLL]);

        // Loose denominations are strictly descending.
        let loose: Vec<i64> = catalog
            .active(false)
            .map(|k| k.face_value.cents())
            .collect();
        assert!(loose.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_us_standard_passes_validation() {
        let kinds: Vec<DenominationKind> = Catalog::us_standard().kinds().cloned().collect();
        assert!(Catalog::new(kinds).is_ok());
    }

    #[test]
    fn test_active_respects_roll_toggle() {
        let catalog = Catalog::us_standard();
        assert_eq!(catalog.active(false).count(), 13);
        assert_eq!(catalog.active(true).count(), 17);
    }

    #[test]
    fn test_default_roll_values() {
        let values = Catalog::us_standard().default_roll_values();
        assert_eq!(values[QUARTER_ROLL].cents(), 1000);
        assert_eq!(values[DIME_ROLL].cents(), 500);
        assert_eq!(values[NICKEL_ROLL].cents(), 200);
        assert_eq!(values[PENNY_ROLL].cents(), 50);
    }

    #[test]
    fn test_rejects_bad_catalogs() {
        let dup = vec![
            DenominationKind::new("a", "A", Money::from_cents(100), false),
            DenominationKind::new("a", "A again", Money::from_cents(50), false),
        ];
        assert!(matches!(
            Catalog::new(dup),
            Err(CoreError::InvalidCatalog { .. })
        ));

        let zero = vec![DenominationKind::new("z", "Zero", Money::zero(), false)];
        assert!(Catalog::new(zero).is_err());

        let roll_first = vec![
            DenominationKind::new("r", "Roll", Money::from_cents(1000), true),
            DenominationKind::new("c", "Coin", Money::from_cents(25), false),
        ];
        assert!(Catalog::new(roll_first).is_err());

        assert!(Catalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_require_unknown() {
        let catalog = Catalog::us_standard();
        assert!(matches!(
            catalog.require("three-dollar-bill"),
            Err(CoreError::UnknownDenomination(_))
        ));
    }
}
