//! # Removal Planner
//!
//! Proposes which bills, coins and rolls to pull so the drawer lands on its
//! checkout target.
//!
//! ## Algorithm
//! ```text
//! diff = total - checkout_target
//!
//!   diff == 0 ──► AtTarget                (no lines)
//!   diff  < 0 ──► BelowTarget             (shortfall = |diff|)
//!   diff  > 0 ──► walk the catalog in order
//!                 (rolls last, only when use_rolls, at the drawer's values)
//!
//!        for kind with count > 0 and value <= remaining:
//!            take = min(remaining / value, count)
//!            emit (kind, take, take × value); remaining -= take × value
//!
//!   no lines  ──► AboveTargetUnreachable  (remainder = diff)
//!   otherwise ──► AboveTargetWithPlan     (remainder = what is left)
//! ```
//!
//! Greedy, not optimal: with a 0.25 target gap and only dimes and a quarter
//! it will take the quarter first, which is what a cashier would do anyway.
//!
//! The planner is a pure function of the catalog and the drawer; calling it
//! twice with the same inputs returns the same recommendation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::drawer::Drawer;
use crate::money::Money;

// =============================================================================
// Output types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemovalStatus {
    AtTarget,
    AboveTargetWithPlan,
    AboveTargetUnreachable,
    BelowTarget,
}

/// Total against the goal float. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "amount", rename_all = "camelCase")]
pub enum GoalStatus {
    AtGoal,
    AboveGoal(Money),
    BelowGoal(Money),
}

impl GoalStatus {
    pub fn from_difference(diff: Money) -> Self {
        if diff.is_zero() {
            GoalStatus::AtGoal
        } else if diff.is_positive() {
            GoalStatus::AboveGoal(diff)
        } else {
            GoalStatus::BelowGoal(diff.abs())
        }
    }

    /// Short form used in the summary table: "At Target", "$5.00 Above".
    pub fn short_label(&self) -> String {
        match self {
            GoalStatus::AtGoal => "At Target".to_string(),
            GoalStatus::AboveGoal(amount) => format!("{amount} Above"),
            GoalStatus::BelowGoal(amount) => format!("{amount} Below"),
        }
    }

    /// Long form shown on the checkout screen.
    pub fn describe(&self, goal: Money) -> String {
        match self {
            GoalStatus::AtGoal => format!("At goal target ({goal})"),
            GoalStatus::AboveGoal(amount) => format!("{amount} above goal target ({goal})"),
            GoalStatus::BelowGoal(amount) => format!("{amount} below goal target ({goal})"),
        }
    }
}

/// One "remove N of kind" instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RemovalLine {
    pub kind_id: String,
    pub label: String,
    pub count: i64,
    pub value: Money,
}

impl RemovalLine {
    /// "Remove 1 $20 bill ($20.00)"
    pub fn describe(&self) -> String {
        format!("Remove {} {} ({})", self.count, self.label, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RemovalRecommendation {
    pub status: RemovalStatus,
    pub goal: GoalStatus,
    pub lines: Vec<RemovalLine>,
    /// Amount still above the checkout target after the plan.
    pub remainder: Money,
    /// How much cash to add; zero unless `BelowTarget`.
    pub shortfall: Money,
    pub checkout_target: Money,
}

impl RemovalRecommendation {
    /// Total value of every line.
    pub fn removed(&self) -> Money {
        self.lines.iter().map(|line| line.value).sum()
    }

    /// Human-readable rendering, one message per line.
    pub fn messages(&self) -> Vec<String> {
        match self.status {
            RemovalStatus::AtTarget => vec!["At default drawer state!".to_string()],
            RemovalStatus::BelowTarget => vec![
                format!("{} below default state.", self.shortfall),
                format!("Add cash to reach {}.", self.checkout_target),
            ],
            RemovalStatus::AboveTargetUnreachable => vec![
                "Cannot reach default state with available denominations.".to_string(),
            ],
            RemovalStatus::AboveTargetWithPlan => {
                let mut out: Vec<String> = self.lines.iter().map(RemovalLine::describe).collect();
                if self.remainder.is_positive() {
                    out.push(format!("Warning: {} left over", self.remainder));
                }
                out
            }
        }
    }
}

// =============================================================================
// Planner
// =============================================================================

/// Largest leftover a plan may leave without a warning.
pub const LEFTOVER_TOLERANCE: Money = Money::from_cents(1);

/// Computes the removal recommendation for `drawer`.
pub fn plan_removal(catalog: &Catalog, drawer: &Drawer) -> RemovalRecommendation {
    let total = drawer.total();
    let goal = GoalStatus::from_difference(total - drawer.target());
    let checkout_target = drawer.checkout_target();
    let diff = total - checkout_target;

    let mut recommendation = RemovalRecommendation {
        status: RemovalStatus::AtTarget,
        goal,
        lines: Vec::new(),
        remainder: Money::zero(),
        shortfall: Money::zero(),
        checkout_target,
    };

    if diff.is_zero() {
        return recommendation;
    }
    if diff.is_negative() {
        recommendation.status = RemovalStatus::BelowTarget;
        recommendation.shortfall = diff.abs();
        return recommendation;
    }

    let mut remaining = diff;
    for kind in catalog.active(drawer.use_rolls()) {
        let available = drawer.count(&kind.id);
        let value = drawer.effective_value(kind);
        if available <= 0 || value > remaining {
            continue;
        }

        let take = remaining.whole_units_of(value).min(available);
        if take > 0 {
            let removed = value.times(take);
            recommendation.lines.push(RemovalLine {
                kind_id: kind.id.clone(),
                label: kind.label.clone(),
                count: take,
                value: removed,
            });
            remaining -= removed;
        }
    }

    if recommendation.lines.is_empty() {
        recommendation.status = RemovalStatus::AboveTargetUnreachable;
        recommendation.remainder = remaining;
    } else {
        recommendation.status = RemovalStatus::AboveTargetWithPlan;
        // A single cent left after a plan is not reported.
        if remaining > LEFTOVER_TOLERANCE {
            recommendation.remainder = remaining;
        }
    }
    recommendation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::*;

    fn drawer_with(catalog: &Catalog, counts: &[(&str, i64)]) -> Drawer {
        let mut drawer = Drawer::new(catalog);
        for (id, count) in counts {
            drawer.set_count(catalog, id, *count).unwrap();
        }
        drawer
    }

    #[test]
    fn test_plan_for_120_50() {
        let catalog = Catalog::us_standard();
        let drawer = drawer_with(&catalog, &[(HUNDRED_BILL, 1), (TWENTY_BILL, 1), (QUARTER, 2)]);

        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.status, RemovalStatus::AboveTargetWithPlan);
        assert_eq!(plan.remainder, Money::zero());
        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[0].kind_id, TWENTY_BILL);
        assert_eq!(plan.lines[0].count, 1);
        assert_eq!(plan.lines[0].value.cents(), 2000);
        assert_eq!(plan.lines[1].kind_id, QUARTER);
        assert_eq!(plan.lines[1].count, 2);
        assert_eq!(plan.lines[1].value.cents(), 50);
        assert_eq!(plan.removed().cents(), 2050);
        assert_eq!(
            plan.messages(),
            vec![
                "Remove 1 $20 bill ($20.00)".to_string(),
                "Remove 2 Quarter ($0.50)".to_string(),
            ]
        );
    }

    #[test]
    fn test_at_target() {
        let catalog = Catalog::us_standard();
        let drawer = drawer_with(&catalog, &[(FIFTY_BILL, 2)]);
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.status, RemovalStatus::AtTarget);
        assert!(plan.lines.is_empty());
        assert_eq!(plan.remainder, Money::zero());
        assert_eq!(plan.goal, GoalStatus::AtGoal);
    }

    #[test]
    fn test_below_target() {
        let catalog = Catalog::us_standard();
        let drawer = drawer_with(&catalog, &[(TWENTY_BILL, 4)]);
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.status, RemovalStatus::BelowTarget);
        assert_eq!(plan.shortfall.cents(), 2000);
        assert!(plan.lines.is_empty());
        assert_eq!(plan.goal, GoalStatus::BelowGoal(Money::from_cents(2000)));
        assert_eq!(plan.messages()[1], "Add cash to reach $100.00.");
    }

    #[test]
    fn test_unreachable_without_small_coins() {
        let catalog = Catalog::us_standard();
        let mut drawer = drawer_with(&catalog, &[(HUNDRED_BILL, 1), (NICKEL, 1)]);
        drawer.set_checkout_target(Money::from_cents(10002)).unwrap();
        // total 100.05, gap 0.03: only a nickel is available.
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.status, RemovalStatus::AboveTargetUnreachable);
        assert_eq!(plan.remainder.cents(), 3);
        assert!(plan.lines.is_empty());
    }

    #[test]
    fn test_unreachable_when_no_pennies() {
        let catalog = Catalog::us_standard();
        let mut drawer = drawer_with(&catalog, &[(HUNDRED_BILL, 1), (PENNY, 0)]);
        drawer.set_checkout_target(Money::from_cents(9997)).unwrap();
        // A 0.03 gap with no pennies in the drawer.
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.status, RemovalStatus::AboveTargetUnreachable);
        assert_eq!(plan.remainder.cents(), 3);
        assert_eq!(
            plan.messages(),
            vec!["Cannot reach default state with available denominations.".to_string()]
        );
    }

    #[test]
    fn test_one_cent_leftover_is_not_reported() {
        let catalog = Catalog::us_standard();
        let mut drawer = drawer_with(&catalog, &[(HUNDRED_BILL, 1), (NICKEL, 1)]);
        drawer.set_checkout_target(Money::from_cents(9999)).unwrap();
        // gap 0.06: the nickel leaves one cent behind.
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.status, RemovalStatus::AboveTargetWithPlan);
        assert_eq!(plan.remainder, Money::zero());
        assert_eq!(plan.messages(), vec!["Remove 1 Nickel ($0.05)".to_string()]);

        // Two cents is still a warning.
        drawer.set_checkout_target(Money::from_cents(9998)).unwrap();
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.remainder.cents(), 2);
        assert_eq!(plan.messages().last().unwrap(), "Warning: $0.02 left over");
    }

    #[test]
    fn test_partial_plan_reports_leftover() {
        let catalog = Catalog::us_standard();
        let drawer = drawer_with(&catalog, &[(HUNDRED_BILL, 1), (FIVE_BILL, 1), (DIME, 1), (NICKEL, 1)]);
        // 105.15 vs 100.00: the $5, the dime and the nickel close the gap.
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.remainder, Money::zero());

        // 105.25 vs 100.10: gap 5.15, the quarter is too big for the last 0.15.
        let mut drawer = drawer_with(&catalog, &[(HUNDRED_BILL, 1), (FIVE_BILL, 1), (QUARTER, 1)]);
        drawer.set_checkout_target(Money::from_cents(10010)).unwrap();
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.status, RemovalStatus::AboveTargetWithPlan);
        assert_eq!(plan.remainder.cents(), 15);
        assert_eq!(plan.messages().last().unwrap(), "Warning: $0.15 left over");
    }

    #[test]
    fn test_skips_zero_counts_and_caps_at_available() {
        let catalog = Catalog::us_standard();
        let drawer = drawer_with(&catalog, &[(HUNDRED_BILL, 1), (TEN_BILL, 1), (ONE_BILL, 20)]);
        // 130 vs 100: one $10 then twenty $1.
        let plan = plan_removal(&catalog, &drawer);
        let taken: Vec<(&str, i64)> = plan
            .lines
            .iter()
            .map(|l| (l.kind_id.as_str(), l.count))
            .collect();
        assert_eq!(taken, vec![(TEN_BILL, 1), (ONE_BILL, 20)]);
        assert_eq!(plan.remainder, Money::zero());
    }

    #[test]
    fn test_rolls_use_drawer_values_and_come_last() {
        let catalog = Catalog::us_standard();
        let mut drawer = drawer_with(&catalog, &[(FIFTY_BILL, 2), (QUARTER_ROLL, 2), (DIME, 10)]);
        drawer.set_use_rolls(&catalog, true);
        drawer
            .set_roll_value(&catalog, QUARTER_ROLL, Money::from_cents(500))
            .unwrap();
        // 100 + 1.00 (dimes) + 10.00 (rolls) = 111.00; gap 11.00.
        let plan = plan_removal(&catalog, &drawer);
        let taken: Vec<(&str, i64)> = plan
            .lines
            .iter()
            .map(|l| (l.kind_id.as_str(), l.count))
            .collect();
        assert_eq!(taken, vec![(DIME, 10), (QUARTER_ROLL, 2)]);
        assert_eq!(plan.remainder, Money::zero());
    }

    #[test]
    fn test_rolls_ignored_when_disabled() {
        let catalog = Catalog::us_standard();
        let drawer = drawer_with(&catalog, &[(FIFTY_BILL, 2), (QUARTER_ROLL, 5)]);
        let plan = plan_removal(&catalog, &drawer);
        assert_eq!(plan.status, RemovalStatus::AtTarget);
    }

    #[test]
    fn test_idempotent() {
        let catalog = Catalog::us_standard();
        let drawer = drawer_with(&catalog, &[(HUNDRED_BILL, 2), (PENNY, 37)]);
        assert_eq!(plan_removal(&catalog, &drawer), plan_removal(&catalog, &drawer));
    }

    #[test]
    fn test_goal_labels() {
        assert_eq!(GoalStatus::AtGoal.short_label(), "At Target");
        assert_eq!(
            GoalStatus::AboveGoal(Money::from_cents(500)).short_label(),
            "$5.00 Above"
        );
        assert_eq!(
            GoalStatus::BelowGoal(Money::from_cents(1)).describe(Money::from_cents(10000)),
            "$0.01 below goal target ($100.00)"
        );
    }
}
