use drawer_core::catalog::Catalog;
use drawer_core::planner::LEFTOVER_TOLERANCE;
use drawer_core::{
    capacity_for_name, plan_removal, Drawer, DrawerSession, Money, RemovalStatus, Tier,
};
use proptest::prelude::*;

fn kind_ids() -> Vec<String> {
    Catalog::us_standard().kinds().map(|k| k.id.clone()).collect()
}

fn counts_strategy() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(0i64..500, 17)
}

fn mutation_strategy() -> impl Strategy<Value = Vec<(usize, i64)>> {
    proptest::collection::vec((0usize..17, 0i64..1000), 1000)
}

fn expected_total(catalog: &Catalog, drawer: &Drawer) -> i64 {
    catalog
        .active(drawer.use_rolls())
        .map(|kind| drawer.effective_value(kind).cents() * drawer.count(&kind.id))
        .sum()
}

proptest! {
    #[test]
    fn total_is_exact_sum(counts in counts_strategy(), use_rolls in any::<bool>()) {
        let catalog = Catalog::us_standard();
        let ids = kind_ids();
        let mut drawer = Drawer::new(&catalog);
        drawer.set_use_rolls(&catalog, use_rolls);
        for (id, count) in ids.iter().zip(&counts) {
            drawer.set_count(&catalog, id, *count).unwrap();
        }

        prop_assert_eq!(drawer.total().cents(), expected_total(&catalog, &drawer));
    }

    #[test]
    fn thousand_mutations_do_not_drift(mutations in mutation_strategy()) {
        let catalog = Catalog::us_standard();
        let ids = kind_ids();
        let mut session = DrawerSession::new(catalog.clone(), Tier::Guest, None);
        session.set_use_rolls(true).unwrap();

        for (kind, count) in &mutations {
            session.set_count(&ids[*kind], *count).unwrap();
        }

        let drawer = session.current_drawer().unwrap();
        prop_assert_eq!(drawer.total().cents(), expected_total(&catalog, drawer));

        // Rebuilding from the saved snapshot lands on the same total.
        let restored = Drawer::from_snapshot(&catalog, &drawer.snapshot());
        prop_assert_eq!(restored.total(), drawer.total());
    }

    #[test]
    fn plan_accounts_for_every_cent(
        counts in counts_strategy(),
        use_rolls in any::<bool>(),
        checkout_cents in 0i64..200_000,
    ) {
        let catalog = Catalog::us_standard();
        let ids = kind_ids();
        let mut drawer = Drawer::new(&catalog);
        drawer.set_use_rolls(&catalog, use_rolls);
        for (id, count) in ids.iter().zip(&counts) {
            drawer.set_count(&catalog, id, *count).unwrap();
        }
        drawer.set_checkout_target(Money::from_cents(checkout_cents)).unwrap();

        let plan = plan_removal(&catalog, &drawer);
        let diff = drawer.total() - drawer.checkout_target();

        prop_assert_eq!(&plan, &plan_removal(&catalog, &drawer));
        prop_assert!(!plan.remainder.is_negative());

        match plan.status {
            RemovalStatus::AtTarget => {
                prop_assert!(diff.is_zero());
                prop_assert!(plan.lines.is_empty());
            }
            RemovalStatus::BelowTarget => {
                prop_assert!(diff.is_negative());
                prop_assert_eq!(plan.shortfall, diff.abs());
            }
            RemovalStatus::AboveTargetUnreachable => {
                prop_assert!(plan.lines.is_empty());
                prop_assert_eq!(plan.remainder, diff);
            }
            RemovalStatus::AboveTargetWithPlan => {
                let leftover = diff - plan.removed();
                if leftover > LEFTOVER_TOLERANCE {
                    prop_assert_eq!(plan.remainder, leftover);
                } else {
                    prop_assert!(plan.remainder.is_zero());
                }
                for line in &plan.lines {
                    prop_assert!(line.count > 0);
                    prop_assert!(line.count <= drawer.count(&line.kind_id));
                }
            }
        }
    }

    #[test]
    fn unknown_tier_names_get_one_drawer(name in "[a-zA-Z_]{0,12}") {
        let capacity = capacity_for_name(&name);
        match name.as_str() {
            "guest" => prop_assert_eq!(capacity, 1),
            "user" => prop_assert_eq!(capacity, 3),
            "supporter" => prop_assert_eq!(capacity, 10),
            _ => prop_assert_eq!(capacity, 1),
        }
    }
}
