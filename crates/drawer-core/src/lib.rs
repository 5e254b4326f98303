//! # drawer-core: Pure Drawer Logic
//!
//! Counting a cash drawer, deciding what to pull out of it, and gating how
//! many drawers a user may keep. No I/O happens in this crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Drawer Checkout Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (CLI / browser)                          │   │
//! │  │    count input ──► checkout screen ──► summary table           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ drawer-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │ catalog  │  │  drawer  │  │   tier   │  │   planner    │   │   │
//! │  │   │ kinds in │  │ counts,  │  │ 1/3/10   │  │ greedy       │   │   │
//! │  │   │ order    │  │ totals   │  │ capacity │  │ removal      │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                 session (context) ──► document (snapshot)      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ UserDocument                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        drawer-sync (gateway, coalescing saves) + drawer-db     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent `Money`
//! - [`catalog`] - Ordered denomination kinds
//! - [`drawer`] - One counted drawer and its total
//! - [`tier`] - Tier capacities and upgrade prompts
//! - [`drawer_set`] - Drawers by index, tier-gated visibility
//! - [`planner`] - Removal recommendation
//! - [`session`] - Context object tying it all together
//! - [`document`] - Persisted shape
//! - [`billing`] - Subscription events to tiers
//! - [`validation`] - Parsing user input
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use drawer_core::catalog::{Catalog, HUNDRED_BILL, QUARTER, TWENTY_BILL};
//! use drawer_core::planner::RemovalStatus;
//! use drawer_core::{DrawerSession, Tier};
//!
//! let mut session = DrawerSession::new(Catalog::us_standard(), Tier::Guest, None);
//! session.set_count(HUNDRED_BILL, 1).unwrap();
//! session.set_count(TWENTY_BILL, 1).unwrap();
//! session.set_count(QUARTER, 2).unwrap();
//!
//! let plan = session.plan().unwrap();
//! assert_eq!(plan.status, RemovalStatus::AboveTargetWithPlan);
//! assert_eq!(plan.messages()[0], "Remove 1 $20 bill ($20.00)");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod catalog;
pub mod document;
pub mod drawer;
pub mod drawer_set;
pub mod error;
pub mod money;
pub mod planner;
pub mod session;
pub mod tier;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{BillingEvent, SubscriptionStatus};
pub use catalog::{Catalog, DenominationKind};
pub use document::{DrawerSnapshot, Preferences, UserDocument};
pub use drawer::Drawer;
pub use drawer_set::DrawerSet;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use planner::{plan_removal, GoalStatus, RemovalLine, RemovalRecommendation, RemovalStatus};
pub use session::{DrawerSession, DrawerSummary, TierTransition};
pub use tier::{capacity_for, capacity_for_name, Tier, UpgradePrompt};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default goal and checkout float for a new drawer ($100.00).
pub const DEFAULT_TARGET: Money = Money::from_cents(10_000);

/// Largest piece count accepted for a single denomination.
///
/// Keeps `count × value` comfortably inside i64 for any catalog.
pub const MAX_PIECE_COUNT: i64 = 1_000_000;

/// Largest amount accepted for a target or roll value ($1,000,000.00).
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;
