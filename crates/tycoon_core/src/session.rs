//! Host session: clock, passive ticks, deferred research completion, undo.
//!
//! The session owns the single authoritative [`GameState`]. It reads time
//! from a [`Clock`], applies [`Action`]s, re-evaluates goals after each one,
//! keeps a bounded undo history and records everything into a [`Replay`].

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::{Rejection, Result};
use crate::math::{Money, Timestamp};
use crate::replay::{Action, Replay};
use crate::state::GameState;

/// Source of wall-clock time.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            })
    }
}

/// Clock that only moves when told to. Used by scripts and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    /// Create a clock reading `start`.
    #[must_use]
    pub const fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Move time forward.
    pub fn advance(&mut self, ms: u64) {
        self.now = self.now.saturating_add(ms);
    }

    /// Jump to an absolute time. Time never moves backwards.
    pub fn set(&mut self, now: Timestamp) {
        self.now = self.now.max(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

/// What a [`Session::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Passive income accrued, zero if no interval boundary passed.
    pub income: Money,
    /// Research completed by this tick.
    pub completed: Option<String>,
}

impl TickReport {
    /// Whether the tick changed anything.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.income == Money::ZERO && self.completed.is_none()
    }
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    state: GameState,
    replay_len: usize,
}

/// A running game.
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    state: GameState,
    config: EngineConfig,
    clock: C,
    history: VecDeque<HistoryEntry>,
    last_tick: Timestamp,
    replay: Replay,
}

impl<C: Clock> Session<C> {
    /// Start a session on a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot cannot be recorded.
    pub fn new(catalog: &Catalog, config: EngineConfig, clock: C) -> Result<Self> {
        let now = clock.now();
        let state = GameState::new(catalog, now).evaluate_goals();
        let replay = Replay::new(&state)?;
        tracing::info!(
            upgrades = catalog.upgrades.len(),
            research = catalog.research.len(),
            "Session started"
        );
        Ok(Self {
            state,
            config,
            clock,
            history: VecDeque::new(),
            last_tick: now,
            replay,
        })
    }

    /// Start a session on the catalog named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_config(config: EngineConfig, clock: C) -> Result<Self> {
        let catalog = config.load_catalog()?;
        Self::new(&catalog, config, clock)
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current time according to the session clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// The session clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable access to the session clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Recording of everything applied so far.
    #[must_use]
    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Copy of the recording sealed with the current snapshot's hash.
    #[must_use]
    pub fn finished_replay(&self) -> Replay {
        let mut replay = self.replay.clone();
        replay.finalize(&self.state);
        replay
    }

    /// Number of snapshots available to [`Session::undo`].
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Apply an action at the current time.
    ///
    /// On success the previous snapshot is pushed onto the undo history and
    /// goals are re-evaluated.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] of the underlying transition; the state is
    /// left unchanged.
    pub fn try_apply(&mut self, action: Action) -> std::result::Result<&GameState, Rejection> {
        let now = self.clock.now();
        let next = action.try_apply(&self.state, now)?;
        self.push_history();
        self.commit(now, action, next);
        Ok(&self.state)
    }

    /// Apply an action, ignoring rejection.
    pub fn apply(&mut self, action: Action) -> &GameState {
        if let Err(reason) = self.try_apply(action) {
            tracing::debug!(%reason, "Session action rejected");
        }
        &self.state
    }

    /// Advance passive income and fire due research at the clock's time.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Advance passive income and fire due research at `now`.
    ///
    /// At most one accrual happens per call once an interval has elapsed;
    /// missed intervals are dropped, not queued, and the cadence stays on
    /// interval boundaries however late the call is. Research whose due time
    /// has passed completes immediately.
    pub fn tick_at(&mut self, now: Timestamp) -> TickReport {
        let mut report = TickReport::default();

        let interval = self.config.tick_interval_ms.max(1);
        let elapsed = now.saturating_sub(self.last_tick);
        if elapsed >= interval {
            self.last_tick += interval * (elapsed / interval);
            let income = self.state.passive_income();
            if income != Money::ZERO {
                let next = self.state.accrue_resource(income);
                self.commit(now, Action::Accrue { amount: income }, next);
                report.income = income;
            }
        }

        if let Some(ticket) = self.state.current_ticket() {
            if ticket.remaining_ms(now) == 0 {
                match self.state.try_complete_ticket(&ticket) {
                    Ok(next) => {
                        let action = Action::CompleteResearch {
                            research_id: ticket.research_id.clone(),
                        };
                        self.commit(now, action, next);
                        report.completed = Some(ticket.research_id);
                    }
                    Err(reason) => tracing::debug!(%reason, "Due research not completed"),
                }
            }
        }

        report
    }

    /// Milliseconds until the next tick boundary or research completion,
    /// whichever is sooner.
    #[must_use]
    pub fn next_deadline_ms(&self, now: Timestamp) -> u64 {
        let tick_due = self.last_tick.saturating_add(self.config.tick_interval_ms);
        let mut wait = tick_due.saturating_sub(now);
        if let Some(ticket) = self.state.current_ticket() {
            wait = wait.min(ticket.remaining_ms(now));
        }
        wait
    }

    /// Restore the snapshot from before the last accepted action.
    ///
    /// History never reaches back past a reset or era transition. Returns
    /// `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(entry) if entry.state.epoch == self.state.epoch => {
                self.state = entry.state;
                self.replay.truncate(entry.replay_len);
                tracing::debug!(remaining = self.history.len(), "Undo");
                true
            }
            Some(_) => {
                self.history.clear();
                false
            }
            None => false,
        }
    }

    fn push_history(&mut self) {
        if self.config.history_depth == 0 {
            return;
        }
        while self.history.len() >= self.config.history_depth {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            state: self.state.clone(),
            replay_len: self.replay.len(),
        });
    }

    fn commit(&mut self, now: Timestamp, action: Action, next: GameState) {
        self.replay.record(now, action);
        if next.epoch != self.state.epoch {
            self.history.clear();
        }
        let evaluated = next.evaluate_goals();
        if evaluated.goals != next.goals {
            self.replay.record(now, Action::EvaluateGoals);
        }
        self.state = evaluated;
        #[cfg(feature = "debug-validation")]
        tracing::trace!(hash = self.state.state_hash(), "Session state hash");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Era;
    use crate::math::dollars;

    fn session() -> Session<ManualClock> {
        Session::new(
            &Catalog::standard(),
            EngineConfig::default(),
            ManualClock::new(1_000),
        )
        .unwrap()
    }

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new(5);
        clock.advance(10);
        assert_eq!(clock.now(), 15);
        clock.set(3);
        assert_eq!(clock.now(), 15);
    }

    #[test]
    fn test_apply_records_and_evaluates_goals() {
        let mut session = session();
        session.apply(Action::MarkHelpUsed);
        assert!(session.state().has_used_help);
        assert!(session.state().goals[0].completed);
        assert_eq!(session.replay().len(), 2);
    }

    #[test]
    fn test_rejection_leaves_state_and_history() {
        let mut session = session();
        let before = session.state().clone();
        let result = session.try_apply(Action::Purchase {
            upgrade_id: "coffee-machine".to_string(),
            amount: 1,
        });
        assert!(result.is_err());
        assert_eq!(session.state(), &before);
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_tick_drops_missed_intervals() {
        let mut session = session();
        session.apply(Action::AddMoney { amount: dollars(10) });
        session.apply(Action::Purchase {
            upgrade_id: "coffee-machine".to_string(),
            amount: 1,
        });

        let early = session.tick_at(1_500);
        assert!(early.is_idle());

        // Ten seconds late still pays a single tick.
        let late = session.tick_at(11_000);
        assert_eq!(late.income, session.state().auto_income);
        assert_eq!(session.state().money, session.state().auto_income);

        assert!(session.tick_at(11_999).is_idle());
        assert!(!session.tick_at(12_000).is_idle());
    }

    #[test]
    fn test_due_research_fires_once_from_wall_clock() {
        let mut session = session();
        session.apply(Action::AddMoney { amount: dollars(25) });
        session.apply(Action::Purchase {
            upgrade_id: "intern".to_string(),
            amount: 1,
        });
        session.apply(Action::StartResearch {
            research_id: "basic-macro".to_string(),
        });

        assert_eq!(session.tick_at(20_999).completed, None);
        let report = session.tick_at(60_000);
        assert_eq!(report.completed.as_deref(), Some("basic-macro"));
        assert_eq!(session.state().research_completed, 1);
        assert_eq!(session.tick_at(61_000).completed, None);
    }

    #[test]
    fn test_undo_restores_snapshot_and_trims_replay() {
        let mut session = session();
        session.apply(Action::ManualAction);
        let after_first = session.state().clone();
        let replay_len = session.replay().len();
        session.apply(Action::ManualAction);

        assert!(session.undo());
        assert_eq!(session.state(), &after_first);
        assert_eq!(session.replay().len(), replay_len);
    }

    #[test]
    fn test_tick_cadence_stays_on_boundaries() {
        let mut session = session();
        session.apply(Action::AddMoney { amount: dollars(10) });
        session.apply(Action::Purchase {
            upgrade_id: "coffee-machine".to_string(),
            amount: 1,
        });

        assert!(!session.tick_at(2_400).is_idle());
        assert_eq!(session.next_deadline_ms(2_400), 600);
        assert!(!session.tick_at(3_000).is_idle());
        assert!(session.tick_at(3_999).is_idle());
    }

    #[test]
    fn test_undo_stops_at_era_transition() {
        let mut session = session();
        let mut gated = session.state().clone();
        gated.transition_unlocked = true;
        session.state = gated;
        session.apply(Action::ManualAction);
        session.apply(Action::TransitionEra(Era::Gui));
        assert_eq!(session.state().stage, Era::Gui);
        assert_eq!(session.history_len(), 0);
        assert!(!session.undo());
        assert_eq!(session.state().stage, Era::Gui);
    }

    #[test]
    fn test_undo_stops_at_reset() {
        let mut session = session();
        session.apply(Action::ManualAction);
        session.apply(Action::Reset);
        session.apply(Action::ManualAction);
        assert!(session.undo());
        assert_eq!(session.state().sessions, 0);
        assert!(!session.undo());
        assert_eq!(session.state().epoch, 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let config = EngineConfig {
            history_depth: 2,
            ..EngineConfig::default()
        };
        let mut session = Session::new(&Catalog::standard(), config, ManualClock::new(0)).unwrap();
        for _ in 0..5 {
            session.apply(Action::ManualAction);
        }
        assert_eq!(session.history_len(), 2);
        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(session.state().sessions, 3);
    }

    #[test]
    fn test_finished_replay_verifies() {
        let mut session = session();
        session.apply(Action::MarkHelpUsed);
        session.apply(Action::ManualAction);
        session.clock_mut().advance(1_000);
        session.tick();
        let replay = session.finished_replay();
        assert_eq!(replay.verify().unwrap(), *session.state());
    }

    #[test]
    fn test_next_deadline() {
        let mut session = session();
        assert_eq!(session.next_deadline_ms(1_200), 800);
        session.apply(Action::AddMoney { amount: dollars(25) });
        session.apply(Action::Purchase {
            upgrade_id: "intern".to_string(),
            amount: 1,
        });
        session.apply(Action::StartResearch {
            research_id: "basic-macro".to_string(),
        });
        assert_eq!(session.next_deadline_ms(30_000), 0);
    }
}
