//! # Drawer Set
//!
//! Drawers indexed from 1. The tier decides how many are visible; the set
//! itself never drops a drawer because the tier shrank.
//!
//! ```text
//! supporter (10)   [1][2][3][4][5][6][7][8][9][10]   all visible
//!        │ downgrade
//!        ▼
//! user (3)         [1][2][3] (4)(5)(6)(7)(8)(9)(10)  4..10 kept, hidden
//!        │ re-upgrade
//!        ▼
//! supporter (10)   [1][2][3][4][5][6][7][8][9][10]   same data as before
//! ```

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::drawer::Drawer;
use crate::error::{CoreError, CoreResult};
use crate::tier::Tier;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawerSet {
    drawers: BTreeMap<usize, Drawer>,
}

impl DrawerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&Drawer> {
        self.drawers.get(&index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Drawer> {
        self.drawers.get_mut(&index)
    }

    /// Stores a drawer at a 1-based index, replacing any previous one.
    pub fn insert(&mut self, index: usize, drawer: Drawer) {
        if index >= 1 {
            self.drawers.insert(index, drawer);
        }
    }

    /// Every stored drawer, including ones the tier hides.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Drawer)> {
        self.drawers.iter().map(|(i, d)| (*i, d))
    }

    /// Number of stored drawers.
    pub fn len(&self) -> usize {
        self.drawers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawers.is_empty()
    }

    /// Drawers `1..=capacity(tier)` that exist in the set.
    pub fn visible_drawers(&self, tier: Tier) -> impl Iterator<Item = (usize, &Drawer)> {
        self.drawers
            .range(1..=tier.capacity())
            .map(|(i, d)| (*i, d))
    }

    /// Creates default drawers for missing indices in `1..=capacity(tier)`.
    ///
    /// Returns how many were created. Existing drawers are untouched.
    pub fn ensure_defaults(&mut self, catalog: &Catalog, tier: Tier) -> usize {
        let mut created = 0;
        for index in 1..=tier.capacity() {
            self.drawers.entry(index).or_insert_with(|| {
                created += 1;
                Drawer::new(catalog)
            });
        }
        created
    }

    /// Checks that `index` is addressable on `tier`.
    pub fn check_access(index: usize, tier: Tier) -> CoreResult<()> {
        let capacity = tier.capacity();
        if index == 0 || index > capacity {
            return Err(CoreError::CapacityExceeded {
                requested: index,
                capacity,
                tier,
            });
        }
        Ok(())
    }

    /// Editable drawer at `index`, if the tier allows it.
    pub fn editable(&mut self, index: usize, tier: Tier) -> CoreResult<&mut Drawer> {
        Self::check_access(index, tier)?;
        let capacity = tier.capacity();
        self.drawers
            .get_mut(&index)
            .ok_or(CoreError::CapacityExceeded {
                requested: index,
                capacity,
                tier,
            })
    }
}

/// Pulls a selection pointer back to 1 when the tier no longer covers it.
pub fn clamp_selection(current: usize, tier: Tier) -> usize {
    if current == 0 || current > tier.capacity() {
        1
    } else {
        current
    }
}
