//! The game-state snapshot.
//!
//! [`GameState`] is the single piece of mutable data in the engine. It holds
//! per-run copies of every catalog entry (all eras, so a transition can reset
//! from the state alone) plus counters, derived aggregates and flags.
//!
//! Transitions live in the sibling modules ([`crate::economy`],
//! [`crate::purchase`], [`crate::research`], [`crate::goals`],
//! [`crate::era`]); each takes `&self` and returns a new snapshot.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Era, Feature, GoalDef, ResearchDef, UpgradeDef, View};
use crate::error::{GameError, Result};
use crate::math::{dollars, money_serde, Money, Timestamp};
use crate::unlocks::propagate_research_unlocks;

/// Value of a manual action before any upgrades.
pub const BASE_ACTION_VALUE: i64 = 1;

/// Research speed before any upgrades, in percent.
pub const BASE_RESEARCH_SPEED_PERCENT: u32 = 100;

/// Manual assembly command before any macro research.
pub const DEFAULT_ASSEMBLY_COMMAND: &str = "assemble";

/// Views accessible at the start of every era.
pub const DEFAULT_VIEWS: [View; 2] = [View::Goals, View::Upgrades];

/// Per-run copy of an upgrade definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Upgrade {
    /// Static definition.
    pub def: UpgradeDef,
    /// Units owned. Only ever increases.
    pub owned: u32,
    /// Whether the upgrade can be purchased. Never reverts once set.
    pub unlocked: bool,
}

impl Upgrade {
    /// Upgrade id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.def.id
    }
}

/// Per-run copy of a research definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Research {
    /// Static definition.
    pub def: ResearchDef,
    /// Whether the project can be started. Never reverts once set.
    pub unlocked: bool,
    /// Whether the project has finished. Never reverts once set.
    pub completed: bool,
}

impl Research {
    /// Research id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.def.id
    }
}

/// Per-run copy of a goal definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Goal {
    /// Static definition.
    pub def: GoalDef,
    /// Whether the goal is currently shown.
    pub visible: bool,
    /// Whether the goal has been met. Never reverts once set.
    pub completed: bool,
}

/// The research project currently in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveResearch {
    /// Research id.
    pub id: String,
    /// Wall-clock start time.
    pub start_time: Timestamp,
    /// Duration after speed bonuses, in milliseconds.
    pub duration_ms: u64,
    /// Epoch of the snapshot that started it.
    pub epoch: u64,
}

impl ActiveResearch {
    /// Wall-clock time at which the project completes.
    #[must_use]
    pub const fn due_at(&self) -> Timestamp {
        self.start_time.saturating_add(self.duration_ms)
    }

    /// Milliseconds left, recomputed from wall-clock time. Zero when due.
    #[must_use]
    pub const fn remaining_ms(&self, now: Timestamp) -> u64 {
        self.due_at().saturating_sub(now)
    }

    /// Whether the project should complete at `now`.
    #[must_use]
    pub const fn is_due(&self, now: Timestamp) -> bool {
        now >= self.due_at()
    }
}

/// The complete game-state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Money on hand. Negative only through debug adjustments.
    #[serde(with = "money_serde")]
    pub money: Money,
    /// Lifetime earnings. Spends never reduce it.
    #[serde(with = "money_serde")]
    pub total_earned: Money,
    /// Passive income per second from terminal-era upgrades.
    #[serde(with = "money_serde")]
    pub auto_income: Money,
    /// Passive income per second from GUI-era automation.
    #[serde(with = "money_serde")]
    pub gui_auto_income: Money,
    /// Manual assemblies performed.
    pub sessions: u64,
    /// GUI-era button presses performed.
    pub button_presses: u64,
    /// Research projects completed.
    pub research_completed: u32,
    /// Current era.
    pub stage: Era,
    /// Upgrade copies, all eras, catalog order.
    pub upgrades: Vec<Upgrade>,
    /// Research copies, all eras, catalog order.
    pub research: Vec<Research>,
    /// Goal copies, all eras, catalog order.
    pub goals: Vec<Goal>,
    /// View currently shown.
    pub current_tab: View,
    /// Accessible views, in the order they were opened.
    pub unlocked_tabs: Vec<View>,
    /// Research in flight, if any.
    pub current_research: Option<ActiveResearch>,
    /// Value of one terminal-era manual assembly.
    #[serde(with = "money_serde")]
    pub assembly_value: Money,
    /// Value of one GUI-era button press.
    #[serde(with = "money_serde")]
    pub button_value: Money,
    /// Research speed in percent (`150` = 1.5x).
    pub research_speed_percent: u32,
    /// Shortest accepted manual assembly command.
    pub assembly_command: String,
    /// Pasting into the terminal is allowed.
    pub clipboard_enabled: bool,
    /// ASCII diagrams are shown at the assembly station.
    pub ascii_schematics_enabled: bool,
    /// Terminal output is colour-coded.
    pub color_output_enabled: bool,
    /// Multiple windows are available.
    pub window_management_enabled: bool,
    /// The player has asked for help at least once.
    pub has_used_help: bool,
    /// The current era's gate research has completed.
    pub transition_unlocked: bool,
    /// Wall-clock start of this era.
    pub start_time: Timestamp,
    /// Incremented on every reset or era transition.
    pub epoch: u64,
}

impl GameState {
    /// Create the starting state from a catalog.
    #[must_use]
    pub fn new(catalog: &Catalog, now: Timestamp) -> Self {
        Self::for_era(catalog, Era::Terminal, now)
    }

    /// Create a fresh state scoped to an era.
    #[must_use]
    pub fn for_era(catalog: &Catalog, era: Era, now: Timestamp) -> Self {
        Self::build(
            catalog.upgrades.iter().cloned(),
            catalog.research.iter().cloned(),
            catalog.goals.iter().cloned(),
            era,
            now,
            0,
        )
    }

    /// Fresh state for `era` built from this snapshot's own definitions,
    /// with the epoch advanced so stale schedules become inert.
    pub(crate) fn fresh(&self, era: Era, now: Timestamp) -> Self {
        Self::build(
            self.upgrades.iter().map(|u| u.def.clone()),
            self.research.iter().map(|r| r.def.clone()),
            self.goals.iter().map(|g| g.def.clone()),
            era,
            now,
            self.epoch + 1,
        )
    }

    fn build(
        upgrades: impl Iterator<Item = UpgradeDef>,
        research: impl Iterator<Item = ResearchDef>,
        goals: impl Iterator<Item = GoalDef>,
        era: Era,
        now: Timestamp,
        epoch: u64,
    ) -> Self {
        let upgrades = upgrades
            .map(|def| Upgrade {
                unlocked: def.era == era && def.starts_unlocked(),
                owned: 0,
                def,
            })
            .collect();
        let research = research
            .map(|def| Research {
                unlocked: def.era == era && def.starts_unlocked,
                completed: false,
                def,
            })
            .collect();
        let goals = goals
            .map(|def| Goal {
                visible: def.era == era && def.starts_visible,
                completed: false,
                def,
            })
            .collect();

        let mut state = Self {
            money: Money::ZERO,
            total_earned: Money::ZERO,
            auto_income: Money::ZERO,
            gui_auto_income: Money::ZERO,
            sessions: 0,
            button_presses: 0,
            research_completed: 0,
            stage: era,
            upgrades,
            research,
            goals,
            current_tab: View::Goals,
            unlocked_tabs: DEFAULT_VIEWS.to_vec(),
            current_research: None,
            assembly_value: dollars(BASE_ACTION_VALUE),
            button_value: dollars(BASE_ACTION_VALUE),
            research_speed_percent: BASE_RESEARCH_SPEED_PERCENT,
            assembly_command: DEFAULT_ASSEMBLY_COMMAND.to_string(),
            clipboard_enabled: false,
            ascii_schematics_enabled: false,
            color_output_enabled: false,
            window_management_enabled: false,
            has_used_help: false,
            transition_unlocked: false,
            start_time: now,
            epoch,
        };
        state.recompute_aggregates();
        propagate_research_unlocks(&mut state);
        state
    }

    // -- Lookups --

    /// Get an upgrade by id.
    #[must_use]
    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id() == id)
    }

    pub(crate) fn upgrade_mut(&mut self, id: &str) -> Option<&mut Upgrade> {
        self.upgrades.iter_mut().find(|u| u.id() == id)
    }

    /// Units owned of an upgrade; zero if it does not exist.
    #[must_use]
    pub fn owned(&self, id: &str) -> u32 {
        self.upgrade(id).map_or(0, |u| u.owned)
    }

    /// Get a research project by id.
    #[must_use]
    pub fn research(&self, id: &str) -> Option<&Research> {
        self.research.iter().find(|r| r.id() == id)
    }

    pub(crate) fn research_mut(&mut self, id: &str) -> Option<&mut Research> {
        self.research.iter_mut().find(|r| r.id() == id)
    }

    /// Whether a research project exists and has completed.
    #[must_use]
    pub fn is_completed(&self, id: &str) -> bool {
        self.research(id).is_some_and(|r| r.completed)
    }

    /// Upgrades of the current era that can be purchased.
    pub fn available_upgrades(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades
            .iter()
            .filter(move |u| u.def.era == self.stage && u.unlocked)
    }

    /// Research of the current era that is unlocked and not yet completed.
    pub fn available_research(&self) -> impl Iterator<Item = &Research> {
        self.research
            .iter()
            .filter(move |r| r.def.era == self.stage && r.unlocked && !r.completed)
    }

    /// Goals of the current era that are shown.
    pub fn visible_goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals
            .iter()
            .filter(move |g| g.def.era == self.stage && g.visible)
    }

    /// Whether a view is accessible.
    #[must_use]
    pub fn has_view(&self, view: View) -> bool {
        self.unlocked_tabs.contains(&view)
    }

    /// Add a view to the accessible set, keeping insertion order and no duplicates.
    pub(crate) fn open_view(&mut self, view: View) {
        if !self.has_view(view) {
            self.unlocked_tabs.push(view);
        }
    }

    /// Whether a feature flag is set.
    #[must_use]
    pub fn has_feature(&self, feature: Feature) -> bool {
        match feature {
            Feature::Clipboard => self.clipboard_enabled,
            Feature::AsciiSchematics => self.ascii_schematics_enabled,
            Feature::ColorOutput => self.color_output_enabled,
            Feature::WindowManagement => self.window_management_enabled,
        }
    }

    pub(crate) fn enable_feature(&mut self, feature: Feature) {
        match feature {
            Feature::Clipboard => self.clipboard_enabled = true,
            Feature::AsciiSchematics => self.ascii_schematics_enabled = true,
            Feature::ColorOutput => self.color_output_enabled = true,
            Feature::WindowManagement => self.window_management_enabled = true,
        }
    }

    /// Milliseconds since this era started.
    #[must_use]
    pub const fn elapsed_ms(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.start_time)
    }

    // -- Hashing and serialization --

    /// Compute a hash of the full snapshot.
    ///
    /// Equal snapshots always hash equally, which is what replay
    /// verification relies on.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Serialize the snapshot to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize state: {e}")))
    }

    /// Deserialize a snapshot from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize state: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(&Catalog::standard(), 1_000);
        assert_eq!(state.money, Money::ZERO);
        assert_eq!(state.stage, Era::Terminal);
        assert_eq!(state.current_tab, View::Goals);
        assert_eq!(state.unlocked_tabs, vec![View::Goals, View::Upgrades]);
        assert_eq!(state.assembly_value, dollars(1));
        assert_eq!(state.assembly_command, "assemble");
        assert_eq!(state.research_speed_percent, 100);
        assert_eq!(state.start_time, 1_000);
        assert!(state.current_research.is_none());
    }

    #[test]
    fn test_only_current_era_content_is_unlocked() {
        let state = GameState::new(&Catalog::standard(), 0);
        // mouse-upgrade is unlocked by default but belongs to the GUI era
        assert!(!state.upgrade("mouse-upgrade").unwrap().unlocked);
        assert!(state.upgrade("coffee-machine").unwrap().unlocked);
        assert!(!state.upgrade("tooling").unwrap().unlocked);
        // window-manager starts unlocked in its own era only
        assert!(!state.research("window-manager").unwrap().unlocked);
        assert!(state.goals.iter().filter(|g| g.visible).all(|g| g.def.era == Era::Terminal));
    }

    #[test]
    fn test_for_era_gui() {
        let state = GameState::for_era(&Catalog::standard(), Era::Gui, 0);
        assert!(state.upgrade("mouse-upgrade").unwrap().unlocked);
        assert!(!state.upgrade("coffee-machine").unwrap().unlocked);
        assert!(state.research("window-manager").unwrap().unlocked);
        assert_eq!(state.available_upgrades().count(), 1);
    }

    #[test]
    fn test_open_view_is_a_set() {
        let mut state = GameState::new(&Catalog::standard(), 0);
        state.open_view(View::Research);
        state.open_view(View::Research);
        state.open_view(View::Goals);
        assert_eq!(
            state.unlocked_tabs,
            vec![View::Goals, View::Upgrades, View::Research]
        );
    }

    #[test]
    fn test_active_research_timing() {
        let active = ActiveResearch {
            id: "basic-macro".to_string(),
            start_time: 10_000,
            duration_ms: 20_000,
            epoch: 0,
        };
        assert_eq!(active.due_at(), 30_000);
        assert_eq!(active.remaining_ms(25_000), 5_000);
        assert_eq!(active.remaining_ms(40_000), 0);
        assert!(!active.is_due(29_999));
        assert!(active.is_due(30_000));
    }

    #[test]
    fn test_serialize_round_trip_and_hash() {
        let state = GameState::new(&Catalog::standard(), 42);
        let bytes = state.serialize().unwrap();
        let restored = GameState::deserialize(&bytes).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.state_hash(), state.state_hash());
    }

    #[test]
    fn test_fresh_bumps_epoch() {
        let state = GameState::new(&Catalog::standard(), 0);
        let fresh = state.fresh(Era::Gui, 5);
        assert_eq!(fresh.epoch, state.epoch + 1);
        assert_eq!(fresh.stage, Era::Gui);
        assert_eq!(fresh.start_time, 5);
    }
}
