//! Research scheduling and completion.
//!
//! Research moves strictly `Locked -> Unlocked -> InProgress -> Completed`,
//! with at most one project in progress at any time. Starting a project
//! records an [`ActiveResearch`] schedule; the host fires completion once the
//! wall clock passes its due time, using a [`ResearchTicket`] so that stale
//! schedules from before a reset or era transition do nothing.

use serde::{Deserialize, Serialize};

use crate::catalog::ResearchEffect;
use crate::error::Rejection;
use crate::math::{Timestamp, MS_PER_SECOND};
use crate::state::{ActiveResearch, GameState};
use crate::unlocks::{missing_dependencies, propagate_research_unlocks, propagate_upgrade_unlocks};

/// Lifecycle position of a research project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResearchStatus {
    /// Dependencies not yet met.
    Locked,
    /// Can be started.
    Unlocked,
    /// Currently running.
    InProgress,
    /// Finished; effect applied.
    Completed,
}

/// Schedule entry for a deferred research completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResearchTicket {
    /// Research id.
    pub research_id: String,
    /// Wall-clock start time of the schedule.
    pub started_at: Timestamp,
    /// Snapshot epoch the schedule belongs to.
    pub epoch: u64,
    /// Wall-clock time at which completion should fire.
    pub due_at: Timestamp,
}

impl ResearchTicket {
    /// Milliseconds until completion should fire. Zero means fire now.
    #[must_use]
    pub const fn remaining_ms(&self, now: Timestamp) -> u64 {
        self.due_at.saturating_sub(now)
    }
}

/// Progress report for the research in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchProgress {
    /// Research id.
    pub research_id: String,
    /// Milliseconds elapsed since start, capped at the duration.
    pub elapsed_ms: u64,
    /// Milliseconds left.
    pub remaining_ms: u64,
    /// Whole percent complete, 0 to 100.
    pub percent: u8,
}

/// Research duration in milliseconds at a given speed.
///
/// `time_required` seconds divided by `speed_percent / 100`, rounded down.
#[must_use]
pub fn research_duration_ms(time_required: u32, speed_percent: u32) -> u64 {
    let base = u64::from(time_required) * MS_PER_SECOND * 100;
    base / u64::from(speed_percent.max(1))
}

impl GameState {
    /// Lifecycle status of a research project, if it exists.
    #[must_use]
    pub fn research_status(&self, research_id: &str) -> Option<ResearchStatus> {
        let research = self.research(research_id)?;
        let status = if research.completed {
            ResearchStatus::Completed
        } else if self
            .current_research
            .as_ref()
            .is_some_and(|active| active.id == research_id)
        {
            ResearchStatus::InProgress
        } else if research.unlocked {
            ResearchStatus::Unlocked
        } else {
            ResearchStatus::Locked
        };
        Some(status)
    }

    /// Start a research project at `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the project is unknown, from another era,
    /// already completed, locked, blocked by another running project, or
    /// has unmet dependencies.
    pub fn try_start_research(&self, research_id: &str, now: Timestamp) -> Result<Self, Rejection> {
        let research = self
            .research(research_id)
            .ok_or_else(|| Rejection::UnknownResearch(research_id.to_string()))?;
        if research.def.era != self.stage {
            return Err(Rejection::WrongEra {
                id: research_id.to_string(),
                era: research.def.era,
            });
        }
        if research.completed {
            return Err(Rejection::AlreadyCompleted(research_id.to_string()));
        }
        if !research.unlocked {
            return Err(Rejection::ResearchLocked(research_id.to_string()));
        }
        if let Some(active) = &self.current_research {
            return Err(Rejection::ResearchInProgress(active.id.clone()));
        }
        let missing = missing_dependencies(self, research_id);
        if !missing.is_empty() {
            return Err(Rejection::MissingDependencies(missing));
        }

        let duration_ms = research_duration_ms(research.def.time_required, self.research_speed_percent);
        let mut next = self.clone();
        next.current_research = Some(ActiveResearch {
            id: research_id.to_string(),
            start_time: now,
            duration_ms,
            epoch: self.epoch,
        });
        tracing::debug!(research = research_id, duration_ms, "Research started");
        Ok(next)
    }

    /// Start a research project, or return the state unchanged.
    #[must_use]
    pub fn start_research(&self, research_id: &str, now: Timestamp) -> Self {
        self.try_start_research(research_id, now)
            .unwrap_or_else(|reason| {
                tracing::debug!(research = research_id, %reason, "Research start rejected");
                self.clone()
            })
    }

    /// Complete the research currently in flight.
    ///
    /// Marks it completed, applies its effect, then re-checks research and
    /// upgrade unlocks against the post-completion snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotInFlight`] unless `research_id` is the
    /// project currently running in this snapshot.
    pub fn try_complete_research(&self, research_id: &str) -> Result<Self, Rejection> {
        let in_flight = self
            .current_research
            .as_ref()
            .is_some_and(|active| active.id == research_id && active.epoch == self.epoch);
        if !in_flight {
            return Err(Rejection::NotInFlight(research_id.to_string()));
        }

        let mut next = self.clone();
        next.current_research = None;
        let effect = match next.research_mut(research_id) {
            Some(research) if !research.completed => {
                research.completed = true;
                research.def.effect.clone()
            }
            Some(_) => return Err(Rejection::AlreadyCompleted(research_id.to_string())),
            None => return Err(Rejection::UnknownResearch(research_id.to_string())),
        };
        next.research_completed = next.research_completed.saturating_add(1);
        next.apply_research_effect(&effect);

        propagate_research_unlocks(&mut next);
        let basis = next.clone();
        propagate_upgrade_unlocks(&mut next, &basis);

        tracing::info!(research = research_id, "Research completed");
        Ok(next)
    }

    /// Complete a research project, or return the state unchanged.
    #[must_use]
    pub fn complete_research(&self, research_id: &str) -> Self {
        self.try_complete_research(research_id)
            .unwrap_or_else(|reason| {
                tracing::debug!(research = research_id, %reason, "Completion ignored");
                self.clone()
            })
    }

    /// Schedule entry for the research in flight, if any.
    #[must_use]
    pub fn current_ticket(&self) -> Option<ResearchTicket> {
        self.current_research.as_ref().map(|active| ResearchTicket {
            research_id: active.id.clone(),
            started_at: active.start_time,
            epoch: active.epoch,
            due_at: active.due_at(),
        })
    }

    /// Fire a scheduled completion.
    ///
    /// The ticket must still describe the research in flight: same id, same
    /// start time, same epoch. Tickets that outlived a reset, an era
    /// transition or an earlier completion are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotInFlight`] for stale tickets, otherwise
    /// whatever [`GameState::try_complete_research`] returns.
    pub fn try_complete_ticket(&self, ticket: &ResearchTicket) -> Result<Self, Rejection> {
        let matches = self.epoch == ticket.epoch
            && self.current_research.as_ref().is_some_and(|active| {
                active.id == ticket.research_id
                    && active.start_time == ticket.started_at
                    && active.epoch == ticket.epoch
            });
        if !matches {
            return Err(Rejection::NotInFlight(ticket.research_id.clone()));
        }
        self.try_complete_research(&ticket.research_id)
    }

    /// Fire a scheduled completion, or return the state unchanged.
    #[must_use]
    pub fn complete_ticket(&self, ticket: &ResearchTicket) -> Self {
        self.try_complete_ticket(ticket).unwrap_or_else(|reason| {
            tracing::debug!(research = %ticket.research_id, %reason, "Stale ticket ignored");
            self.clone()
        })
    }

    /// Progress of the research in flight at `now`.
    #[must_use]
    pub fn research_progress(&self, now: Timestamp) -> Option<ResearchProgress> {
        self.current_research.as_ref().map(|active| {
            let elapsed_ms = now.saturating_sub(active.start_time).min(active.duration_ms);
            let percent = if active.duration_ms == 0 {
                100
            } else {
                elapsed_ms * 100 / active.duration_ms
            };
            ResearchProgress {
                research_id: active.id.clone(),
                elapsed_ms,
                remaining_ms: active.remaining_ms(now),
                percent: u8::try_from(percent).unwrap_or(100),
            }
        })
    }

    fn apply_research_effect(&mut self, effect: &ResearchEffect) {
        match effect {
            ResearchEffect::None => {}
            ResearchEffect::AssemblyAlias(alias) => {
                if alias.len() < self.assembly_command.len() {
                    self.assembly_command.clone_from(alias);
                }
            }
            ResearchEffect::Feature(feature) => self.enable_feature(*feature),
            ResearchEffect::OpenView(view) => self.open_view(*view),
            ResearchEffect::EraGate => self.transition_unlocked = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Feature, View};
    use crate::math::dollars;

    fn with_intern() -> GameState {
        GameState::new(&Catalog::standard(), 0)
            .accrue_resource(dollars(25))
            .purchase_upgrade("intern", 1)
    }

    #[test]
    fn test_duration_formula() {
        assert_eq!(research_duration_ms(30, 100), 30_000);
        assert_eq!(research_duration_ms(30, 150), 20_000);
        assert_eq!(research_duration_ms(45, 200), 22_500);
        assert_eq!(research_duration_ms(10, 0), 1_000_000);
    }

    #[test]
    fn test_basic_macro_needs_intern() {
        let state = GameState::new(&Catalog::standard(), 0);
        let next = state.start_research("basic-macro", 1_000);
        assert_eq!(next, state);
        assert_eq!(
            state.try_start_research("basic-macro", 1_000),
            Err(Rejection::ResearchLocked("basic-macro".to_string()))
        );
    }

    #[test]
    fn test_basic_macro_duration_with_one_intern() {
        let state = with_intern().start_research("basic-macro", 1_000);
        let active = state.current_research.as_ref().unwrap();
        assert_eq!(active.duration_ms, 20_000);
        assert_eq!(active.start_time, 1_000);
        assert_eq!(state.research_status("basic-macro"), Some(ResearchStatus::InProgress));
    }

    #[test]
    fn test_single_research_in_flight() {
        let state = with_intern().start_research("basic-macro", 0);
        assert_eq!(
            state.try_start_research("ascii-schematics", 0),
            Err(Rejection::ResearchInProgress("basic-macro".to_string()))
        );
    }

    #[test]
    fn test_completion_applies_alias_and_unlocks() {
        let state = with_intern()
            .start_research("basic-macro", 0)
            .complete_research("basic-macro");
        assert!(state.current_research.is_none());
        assert_eq!(state.research_completed, 1);
        assert_eq!(state.assembly_command, "asmb");
        assert!(state.accepts_assembly_command("asmb"));
        assert!(state.research("advanced-macro").unwrap().unlocked);
        assert!(state.research("automation-theory").unwrap().unlocked);
        assert_eq!(state.research_status("basic-macro"), Some(ResearchStatus::Completed));
    }

    #[test]
    fn test_completion_is_idempotent() {
        let once = with_intern()
            .start_research("basic-macro", 0)
            .complete_research("basic-macro");
        let twice = once.complete_research("basic-macro");
        assert_eq!(once, twice);
        assert_eq!(twice.research_completed, 1);
    }

    #[test]
    fn test_completion_of_other_id_is_ignored() {
        let state = with_intern().start_research("basic-macro", 0);
        assert_eq!(
            state.try_complete_research("ascii-schematics"),
            Err(Rejection::NotInFlight("ascii-schematics".to_string()))
        );
    }

    #[test]
    fn test_completion_unlocks_research_gated_upgrades() {
        let mut state = with_intern();
        state.research_mut("improved-cli").unwrap().completed = true;
        state.research_mut("efficiency-research").unwrap().unlocked = true;
        let done = state
            .start_research("efficiency-research", 0)
            .complete_research("efficiency-research");
        assert!(done.upgrade("assembly-optimizer").unwrap().unlocked);
    }

    #[test]
    fn test_feature_and_view_effects() {
        let state = with_intern()
            .start_research("stats-dashboard", 0)
            .complete_research("stats-dashboard")
            .start_research("improved-cli", 0)
            .complete_research("improved-cli");
        assert!(state.has_view(View::Stats));
        assert!(state.has_feature(Feature::ColorOutput));
    }

    #[test]
    fn test_stale_ticket_after_reset() {
        let state = with_intern().start_research("basic-macro", 0);
        let ticket = state.current_ticket().unwrap();
        assert_eq!(ticket.due_at, 20_000);

        let reset = state.reset(5_000);
        let after = reset.complete_ticket(&ticket);
        assert_eq!(after, reset);
        assert_eq!(after.research_completed, 0);
    }

    #[test]
    fn test_ticket_fires_once() {
        let state = with_intern().start_research("basic-macro", 0);
        let ticket = state.current_ticket().unwrap();
        let done = state.complete_ticket(&ticket);
        assert_eq!(done.research_completed, 1);
        assert_eq!(done.complete_ticket(&ticket), done);
    }

    #[test]
    fn test_progress_from_wall_clock() {
        let state = with_intern().start_research("basic-macro", 10_000);
        let progress = state.research_progress(20_000).unwrap();
        assert_eq!(progress.elapsed_ms, 10_000);
        assert_eq!(progress.remaining_ms, 10_000);
        assert_eq!(progress.percent, 50);

        let late = state.research_progress(90_000).unwrap();
        assert_eq!(late.remaining_ms, 0);
        assert_eq!(late.percent, 100);
    }
}
