//! # Drawer
//!
//! One counted-cash record: per-denomination piece counts, per-drawer roll
//! values, two targets and the roll toggle.
//!
//! ## Total invariant
//! ```text
//! total = Σ count(kind) × effective_value(kind)
//!         over kinds active under use_rolls
//!
//! effective_value(roll)  = drawer.roll_values[roll]   (default: catalog face)
//! effective_value(other) = catalog face value
//! ```
//!
//! The total is recomputed after every count, roll value or toggle change,
//! and again when a drawer is rebuilt from a snapshot. A rejected write
//! leaves every field as it was.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, DenominationKind};
use crate::document::DrawerSnapshot;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_amount, validate_count, validate_positive_amount};
use crate::DEFAULT_TARGET;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawer {
    /// Absent means zero; zero counts are never stored.
    counts: BTreeMap<String, i64>,
    roll_values: BTreeMap<String, Money>,
    total: Money,
    target: Money,
    checkout_target: Money,
    use_rolls: bool,
}

impl Drawer {
    /// Empty drawer with default targets and the catalog's roll values.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            counts: BTreeMap::new(),
            roll_values: catalog.default_roll_values(),
            total: Money::zero(),
            target: DEFAULT_TARGET,
            checkout_target: DEFAULT_TARGET,
            use_rolls: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn count(&self, kind_id: &str) -> i64 {
        self.counts.get(kind_id).copied().unwrap_or(0)
    }

    /// Non-zero counts keyed by kind id.
    pub fn counts(&self) -> &BTreeMap<String, i64> {
        &self.counts
    }

    pub fn roll_value(&self, kind_id: &str) -> Option<Money> {
        self.roll_values.get(kind_id).copied()
    }

    /// Value of one piece of `kind` in this drawer.
    pub fn effective_value(&self, kind: &DenominationKind) -> Money {
        if kind.is_roll {
            self.roll_value(&kind.id).unwrap_or(kind.face_value)
        } else {
            kind.face_value
        }
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn target(&self) -> Money {
        self.target
    }

    pub fn checkout_target(&self) -> Money {
        self.checkout_target
    }

    pub fn use_rolls(&self) -> bool {
        self.use_rolls
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Sets the piece count for one kind.
    pub fn set_count(&mut self, catalog: &Catalog, kind_id: &str, count: i64) -> CoreResult<()> {
        let kind = catalog.require(kind_id)?;
        validate_count(&kind.id, count)?;

        if count == 0 {
            self.counts.remove(&kind.id);
        } else {
            self.counts.insert(kind.id.clone(), count);
        }
        self.recompute(catalog);
        Ok(())
    }

    /// Sets what one roll of `kind_id` is worth in this drawer.
    pub fn set_roll_value(
        &mut self,
        catalog: &Catalog,
        kind_id: &str,
        value: Money,
    ) -> CoreResult<()> {
        let kind = catalog.require(kind_id)?;
        if !kind.is_roll {
            return Err(CoreError::NotARoll(kind.id.clone()));
        }
        validate_positive_amount(&kind.id, value)?;

        self.roll_values.insert(kind.id.clone(), value);
        self.recompute(catalog);
        Ok(())
    }

    /// Sets the goal float shown against the total.
    pub fn set_target(&mut self, value: Money) -> CoreResult<()> {
        validate_amount("target", value)?;
        self.target = value;
        Ok(())
    }

    /// Sets the float the removal planner aims for.
    pub fn set_checkout_target(&mut self, value: Money) -> CoreResult<()> {
        validate_amount("checkout target", value)?;
        self.checkout_target = value;
        Ok(())
    }

    pub fn set_use_rolls(&mut self, catalog: &Catalog, use_rolls: bool) {
        self.use_rolls = use_rolls;
        self.recompute(catalog);
    }

    /// Back to a freshly created drawer.
    pub fn clear(&mut self, catalog: &Catalog) {
        *self = Drawer::new(catalog);
    }

    fn recompute(&mut self, catalog: &Catalog) {
        self.total = catalog
            .active(self.use_rolls)
            .map(|kind| self.effective_value(kind).times(self.count(&kind.id)))
            .sum();
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Immutable copy for serialization.
    pub fn snapshot(&self) -> DrawerSnapshot {
        DrawerSnapshot {
            counts: self.counts.clone(),
            roll_values: self.roll_values.clone(),
            total: self.total,
            target: Some(self.target),
            checkout_target: Some(self.checkout_target),
            use_rolls: self.use_rolls,
        }
    }

    /// Rebuilds a drawer by merging `snapshot` over the defaults.
    ///
    /// Entries that would be rejected by the setters (unknown kinds,
    /// negative counts, non-positive roll values) are dropped. The cached
    /// total is ignored and recomputed.
    pub fn from_snapshot(catalog: &Catalog, snapshot: &DrawerSnapshot) -> Self {
        let mut drawer = Drawer::new(catalog);

        for (id, count) in &snapshot.counts {
            let known = catalog.get(id).is_some();
            if known && *count > 0 && validate_count(id, *count).is_ok() {
                drawer.counts.insert(id.clone(), *count);
            }
        }
        for (id, value) in &snapshot.roll_values {
            let is_roll = catalog.get(id).is_some_and(|k| k.is_roll);
            if is_roll && validate_positive_amount(id, *value).is_ok() {
                drawer.roll_values.insert(id.clone(), *value);
            }
        }
        if let Some(target) = snapshot.target.filter(|t| validate_amount("target", *t).is_ok()) {
            drawer.target = target;
        }
        if let Some(target) = snapshot
            .checkout_target
            .filter(|t| validate_amount("checkout target", *t).is_ok())
        {
            drawer.checkout_target = target;
        }
        drawer.use_rolls = snapshot.use_rolls;

        drawer.recompute(catalog);
        drawer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::*;
    use crate::error::ValidationError;

    fn catalog() -> Catalog {
        Catalog::us_standard()
    }

    #[test]
    fn test_defaults() {
        let drawer = Drawer::new(&catalog());
        assert_eq!(drawer.total(), Money::zero());
        assert_eq!(drawer.target().cents(), 10000);
        assert_eq!(drawer.checkout_target().cents(), 10000);
        assert!(!drawer.use_rolls());
        assert_eq!(drawer.roll_value(QUARTER_ROLL), Some(Money::from_cents(1000)));
        assert_eq!(drawer.roll_value(PENNY_ROLL), Some(Money::from_cents(50)));
    }

    #[test]
    fn test_total_tracks_counts() {
        let cat = catalog();
        let mut drawer = Drawer::new(&cat);
        drawer.set_count(&cat, HUNDRED_BILL, 1).unwrap();
        drawer.set_count(&cat, TWENTY_BILL, 1).unwrap();
        drawer.set_count(&cat, QUARTER, 2).unwrap();
        assert_eq!(drawer.total().cents(), 12050);

        drawer.set_count(&cat, QUARTER, 0).unwrap();
        assert_eq!(drawer.total().cents(), 12000);
        assert!(!drawer.counts().contains_key(QUARTER));
    }

    #[test]
    fn test_three_dimes_are_exact() {
        let cat = catalog();
        let mut drawer = Drawer::new(&cat);
        drawer.set_count(&cat, DIME, 3).unwrap();
        assert_eq!(drawer.total().cents(), 30);
    }

    #[test]
    fn test_invalid_count_keeps_prior_value() {
        let cat = catalog();
        let mut drawer = Drawer::new(&cat);
        drawer.set_count(&cat, NICKEL, 4).unwrap();

        let err = drawer.set_count(&cat, NICKEL, -1).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput(ValidationError::Negative { .. })
        ));
        assert_eq!(drawer.count(NICKEL), 4);
        assert_eq!(drawer.total().cents(), 20);

        assert!(matches!(
            drawer.set_count(&cat, "euro", 1),
            Err(CoreError::UnknownDenomination(_))
        ));
    }

    #[test]
    fn test_rolls_only_count_when_enabled() {
        let cat = catalog();
        let mut drawer = Drawer::new(&cat);
        drawer.set_count(&cat, QUARTER_ROLL, 2).unwrap();
        assert_eq!(drawer.total(), Money::zero());

        drawer.set_use_rolls(&cat, true);
        assert_eq!(drawer.total().cents(), 2000);

        drawer
            .set_roll_value(&cat, QUARTER_ROLL, Money::from_cents(1200))
            .unwrap();
        assert_eq!(drawer.total().cents(), 2400);

        drawer.set_use_rolls(&cat, false);
        assert_eq!(drawer.total(), Money::zero());
        assert_eq!(drawer.count(QUARTER_ROLL), 2);
    }

    #[test]
    fn test_roll_value_rules() {
        let cat = catalog();
        let mut drawer = Drawer::new(&cat);
        assert!(matches!(
            drawer.set_roll_value(&cat, QUARTER, Money::from_cents(1000)),
            Err(CoreError::NotARoll(_))
        ));
        assert!(drawer
            .set_roll_value(&cat, DIME_ROLL, Money::zero())
            .is_err());
        assert_eq!(drawer.roll_value(DIME_ROLL), Some(Money::from_cents(500)));
    }

    #[test]
    fn test_targets() {
        let mut drawer = Drawer::new(&catalog());
        drawer.set_target(Money::from_cents(15000)).unwrap();
        drawer.set_checkout_target(Money::from_cents(7500)).unwrap();
        assert_eq!(drawer.target().cents(), 15000);
        assert_eq!(drawer.checkout_target().cents(), 7500);

        assert!(drawer.set_target(Money::from_cents(-1)).is_err());
        assert_eq!(drawer.target().cents(), 15000);
    }

    #[test]
    fn test_clear_resets_everything() {
        let cat = catalog();
        let mut drawer = Drawer::new(&cat);
        drawer.set_count(&cat, FIFTY_BILL, 3).unwrap();
        drawer.set_use_rolls(&cat, true);
        drawer.set_target(Money::from_cents(20000)).unwrap();
        drawer
            .set_roll_value(&cat, NICKEL_ROLL, Money::from_cents(300))
            .unwrap();

        drawer.clear(&cat);
        assert_eq!(drawer, Drawer::new(&cat));
    }

    #[test]
    fn test_snapshot_restores_same_drawer() {
        let cat = catalog();
        let mut drawer = Drawer::new(&cat);
        drawer.set_count(&cat, TEN_BILL, 5).unwrap();
        drawer.set_count(&cat, PENNY_ROLL, 1).unwrap();
        drawer.set_use_rolls(&cat, true);
        drawer.set_checkout_target(Money::from_cents(5000)).unwrap();

        let restored = Drawer::from_snapshot(&cat, &drawer.snapshot());
        assert_eq!(restored, drawer);
    }

    #[test]
    fn test_from_snapshot_recomputes_and_sanitizes() {
        let cat = catalog();
        let mut snapshot = DrawerSnapshot::default();
        snapshot.counts.insert(FIVE_BILL.to_string(), 2);
        snapshot.counts.insert(DIME.to_string(), -4);
        snapshot.counts.insert("doubloon".to_string(), 9);
        snapshot
            .roll_values
            .insert(QUARTER.to_string(), Money::from_cents(999));
        snapshot.total = Money::from_cents(123456);

        let drawer = Drawer::from_snapshot(&cat, &snapshot);
        assert_eq!(drawer.total().cents(), 1000);
        assert_eq!(drawer.count(DIME), 0);
        assert_eq!(drawer.count("doubloon"), 0);
        assert_eq!(drawer.roll_value(QUARTER), None);
        // Missing targets fall back to defaults.
        assert_eq!(drawer.target(), DEFAULT_TARGET);
        assert_eq!(drawer.checkout_target(), DEFAULT_TARGET);
    }
}
