//! # Tycoon Core
//!
//! Progression engine for Button Tycoon, an incremental "idle tycoon" game.
//!
//! This crate contains **only** the progression state machine:
//! - No rendering
//! - No terminal IO
//! - No floating-point money (uses fixed-point)
//! - No hidden state beyond one [`GameState`](state::GameState) snapshot
//!
//! Every transition takes the current snapshot by reference and returns the
//! next one. Rejected operations return an unchanged copy, so the host (UI
//! loop, command console, test harness) always owns the single authoritative
//! state and decides when to replay or discard it.
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Static content definitions (upgrades, research, goals)
//! - [`state`] - The game-state snapshot and its per-run catalog copies
//! - [`economy`] - Money accrual, manual actions, derived income aggregates
//! - [`purchase`] - Upgrade pricing and purchase transitions
//! - [`unlocks`] - Unlock propagation for upgrades and research
//! - [`research`] - Research scheduling and completion
//! - [`goals`] - Guided-tour goal evaluation
//! - [`era`] - View switching, era transitions and resets
//! - [`session`] - Host session: clock, passive ticks, deferred completion, undo
//! - [`replay`] - Action recording and deterministic playback
//! - [`config`] - Engine configuration
//! - [`math`] - Fixed-point money utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod economy;
pub mod era;
pub mod error;
pub mod goals;
pub mod math;
pub mod purchase;
pub mod replay;
pub mod research;
pub mod session;
pub mod state;
pub mod unlocks;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{
        Catalog, Dependency, Era, Feature, GoalDef, GoalId, ResearchDef, ResearchEffect,
        UnlockRule, UpgradeDef, UpgradeEffect, View,
    };
    pub use crate::config::EngineConfig;
    pub use crate::error::{GameError, Rejection, Result};
    pub use crate::math::{Money, Timestamp};
    pub use crate::purchase::PurchaseQuote;
    pub use crate::replay::{Action, Replay, TimedAction};
    pub use crate::research::{ResearchProgress, ResearchStatus, ResearchTicket};
    pub use crate::session::{Clock, ManualClock, Session, SystemClock, TickReport};
    pub use crate::state::{ActiveResearch, GameState, Goal, Research, Upgrade};
}
