//! # Drawer Session
//!
//! The explicit context object for one user working their drawers. It owns
//! everything a screen needs: the catalog, the drawer set, the injected tier
//! and identity, preferences and the current-drawer pointer.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load document ──► DrawerSession::from_document                         │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  edit counts ──► set_count / set_roll_value / ...   (revision += 1)     │
//! │                         │                                               │
//! │                         ├──► plan()      removal recommendation         │
//! │                         ├──► summary()   every visible drawer           │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  take_pending_save() ──► Some(UserDocument) ──► save coordinator        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session never performs I/O. Every successful mutation bumps the
//! revision; `take_pending_save` hands out a full snapshot when the revision
//! moved since the last hand-out.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::document::{Preferences, UserDocument};
use crate::drawer::Drawer;
use crate::drawer_set::{clamp_selection, DrawerSet};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::planner::{plan_removal, GoalStatus, RemovalRecommendation};
use crate::tier::{Tier, UpgradePrompt};
use crate::validation::{parse_amount, parse_count};

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DrawerSummary {
    pub index: usize,
    pub total: Money,
    pub target: Money,
    pub status: GoalStatus,
}

/// What changed when a new tier was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierTransition {
    pub from: Tier,
    pub to: Tier,
    /// Default drawers created to fill the new capacity.
    pub created: usize,
    /// Whether the current-drawer pointer was pulled back to 1.
    pub selection_clamped: bool,
}

impl TierTransition {
    pub fn is_downgrade(&self) -> bool {
        self.to.capacity() < self.from.capacity()
    }
}

#[derive(Debug, Clone)]
pub struct DrawerSession {
    catalog: Catalog,
    drawers: DrawerSet,
    tier: Tier,
    user_id: Option<String>,
    current: usize,
    preferences: Preferences,
    revision: u64,
    handed_out: u64,
}

impl DrawerSession {
    /// Fresh session with default drawers for `tier`.
    ///
    /// A brand new session counts as unsaved so the defaults get persisted.
    pub fn new(catalog: Catalog, tier: Tier, user_id: Option<String>) -> Self {
        let mut drawers = DrawerSet::new();
        drawers.ensure_defaults(&catalog, tier);
        Self {
            catalog,
            drawers,
            tier,
            user_id,
            current: 1,
            preferences: Preferences::default(),
            revision: 1,
            handed_out: 0,
        }
    }

    /// Rebuilds a session from a stored document.
    ///
    /// Every stored drawer is restored, including ones beyond the current
    /// capacity. Missing drawers within capacity are created; if any were,
    /// the session is left dirty so they get saved.
    pub fn from_document(
        catalog: Catalog,
        tier: Tier,
        user_id: Option<String>,
        document: &UserDocument,
    ) -> Self {
        let mut drawers = DrawerSet::new();
        for (index, snapshot) in &document.drawers {
            drawers.insert(*index, Drawer::from_snapshot(&catalog, snapshot));
        }
        let created = drawers.ensure_defaults(&catalog, tier);

        let mut preferences = document.preferences;
        if !tier.has_account() {
            preferences.dark_mode = false;
        }

        let revision = document.revision;
        Self {
            catalog,
            drawers,
            tier,
            user_id,
            current: 1,
            preferences,
            revision: if created > 0 { revision + 1 } else { revision },
            handed_out: revision,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn capacity(&self) -> usize {
        self.tier.capacity()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether there are mutations not yet handed to a save.
    pub fn is_dirty(&self) -> bool {
        self.revision > self.handed_out
    }

    /// All stored drawers, visible or not.
    pub fn drawers(&self) -> &DrawerSet {
        &self.drawers
    }

    /// A visible drawer by index.
    pub fn drawer(&self, index: usize) -> CoreResult<&Drawer> {
        DrawerSet::check_access(index, self.tier)?;
        self.drawers
            .get(index)
            .ok_or_else(|| self.capacity_error(index))
    }

    pub fn current_drawer(&self) -> CoreResult<&Drawer> {
        self.drawer(self.current)
    }

    pub fn upgrade_prompt(&self) -> Option<UpgradePrompt> {
        UpgradePrompt::for_tier(self.tier)
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Points the session at drawer `index`.
    pub fn select_drawer(&mut self, index: usize) -> CoreResult<()> {
        self.drawer(index)?;
        self.current = index;
        Ok(())
    }

    /// Moves the pointer by `delta`. Below 1 is a no-op; past capacity is
    /// `CapacityExceeded`.
    pub fn step_drawer(&mut self, delta: isize) -> CoreResult<usize> {
        let target = self.current as isize + delta;
        if target < 1 {
            return Ok(self.current);
        }
        self.select_drawer(target as usize)?;
        Ok(self.current)
    }

    // -------------------------------------------------------------------------
    // Mutations on the current drawer
    // -------------------------------------------------------------------------

    pub fn set_count(&mut self, kind_id: &str, count: i64) -> CoreResult<()> {
        let (drawer, catalog) = self.current_parts()?;
        drawer.set_count(catalog, kind_id, count)?;
        self.mark_dirty();
        Ok(())
    }

    /// Same as [`set_count`](Self::set_count) for raw text; blank means 0.
    pub fn set_count_input(&mut self, kind_id: &str, input: &str) -> CoreResult<()> {
        let count = parse_count(kind_id, input)?;
        self.set_count(kind_id, count)
    }

    pub fn set_roll_value(&mut self, kind_id: &str, value: Money) -> CoreResult<()> {
        let (drawer, catalog) = self.current_parts()?;
        drawer.set_roll_value(catalog, kind_id, value)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_roll_value_input(&mut self, kind_id: &str, input: &str) -> CoreResult<()> {
        let value = parse_amount(kind_id, input)?;
        self.set_roll_value(kind_id, value)
    }

    pub fn set_target(&mut self, value: Money) -> CoreResult<()> {
        let (drawer, _) = self.current_parts()?;
        drawer.set_target(value)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_checkout_target(&mut self, value: Money) -> CoreResult<()> {
        let (drawer, _) = self.current_parts()?;
        drawer.set_checkout_target(value)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_use_rolls(&mut self, use_rolls: bool) -> CoreResult<()> {
        let (drawer, catalog) = self.current_parts()?;
        drawer.set_use_rolls(catalog, use_rolls);
        self.mark_dirty();
        Ok(())
    }

    /// Resets drawer `index` to defaults.
    pub fn clear_drawer(&mut self, index: usize) -> CoreResult<()> {
        let tier = self.tier;
        let drawer = self.drawers.editable(index, tier)?;
        drawer.clear(&self.catalog);
        self.mark_dirty();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Preferences
    // -------------------------------------------------------------------------

    /// Dark mode is an account feature.
    pub fn set_dark_mode(&mut self, enabled: bool) -> CoreResult<()> {
        if !self.tier.has_account() {
            return Err(CoreError::RequiresAccount {
                feature: "Dark mode".to_string(),
            });
        }
        if self.preferences.dark_mode != enabled {
            self.preferences.dark_mode = enabled;
            self.mark_dirty();
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------------

    /// Removal recommendation for the current drawer.
    pub fn plan(&self) -> CoreResult<RemovalRecommendation> {
        self.plan_for(self.current)
    }

    pub fn plan_for(&self, index: usize) -> CoreResult<RemovalRecommendation> {
        Ok(plan_removal(&self.catalog, self.drawer(index)?))
    }

    /// Total, target and goal status of every visible drawer.
    pub fn summary(&self) -> Vec<DrawerSummary> {
        self.drawers
            .visible_drawers(self.tier)
            .map(|(index, drawer)| DrawerSummary {
                index,
                total: drawer.total(),
                target: drawer.target(),
                status: GoalStatus::from_difference(drawer.total() - drawer.target()),
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Identity & tier
    // -------------------------------------------------------------------------

    /// Reacts to a tier reported by the identity provider.
    ///
    /// Fills the new capacity with defaults and clamps the pointer. Stored
    /// drawers beyond the new capacity are kept as they are.
    pub fn apply_tier(&mut self, tier: Tier) -> TierTransition {
        let from = self.tier;
        self.tier = tier;
        let created = self.drawers.ensure_defaults(&self.catalog, tier);

        let clamped = clamp_selection(self.current, tier);
        let selection_clamped = clamped != self.current;
        self.current = clamped;

        if !tier.has_account() {
            self.preferences.dark_mode = false;
        }
        if from != tier || created > 0 {
            self.mark_dirty();
        }

        TierTransition {
            from,
            to: tier,
            created,
            selection_clamped,
        }
    }

    // -------------------------------------------------------------------------
    // Persistence hand-off
    // -------------------------------------------------------------------------

    /// Full document for the current state, hidden drawers included.
    pub fn to_document(&self) -> UserDocument {
        UserDocument {
            drawers: self
                .drawers
                .iter()
                .map(|(index, drawer)| (index, drawer.snapshot()))
                .collect(),
            preferences: self.preferences,
            tier: self.tier.as_str().to_string(),
            revision: self.revision,
            saved_at: None,
        }
    }

    /// A document to save if anything changed since the last hand-out.
    pub fn take_pending_save(&mut self) -> Option<UserDocument> {
        if !self.is_dirty() {
            return None;
        }
        self.handed_out = self.revision;
        Some(self.to_document())
    }

    fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    fn current_parts(&mut self) -> CoreResult<(&mut Drawer, &Catalog)> {
        let drawer = self.drawers.editable(self.current, self.tier)?;
        Ok((drawer, &self.catalog))
    }

    fn capacity_error(&self, index: usize) -> CoreError {
        CoreError::CapacityExceeded {
            requested: index,
            capacity: self.tier.capacity(),
            tier: self.tier,
        }
    }
}
