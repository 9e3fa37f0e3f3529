//! Action recording and deterministic playback.
//!
//! A replay stores the initial snapshot and every accepted action with the
//! wall-clock time it was applied at. Because each transition is a pure
//! function of (snapshot, action, time), playing the actions back over the
//! initial snapshot reproduces the final one exactly. Replays live in memory
//! only.

use serde::{Deserialize, Serialize};

use crate::catalog::{Era, View};
use crate::error::{GameError, Rejection, Result};
use crate::math::{money_serde, Money, Timestamp};
use crate::state::GameState;

/// Replay format version.
pub const REPLAY_VERSION: u32 = 1;

/// A state transition request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Add money, as a passive tick does.
    Accrue {
        /// Amount added.
        #[serde(with = "money_serde")]
        amount: Money,
    },
    /// Assemble or press the button once.
    ManualAction,
    /// Buy units of an upgrade.
    Purchase {
        /// Upgrade id.
        upgrade_id: String,
        /// Units to buy.
        amount: u32,
    },
    /// Start a research project.
    StartResearch {
        /// Research id.
        research_id: String,
    },
    /// Complete the research in flight.
    CompleteResearch {
        /// Research id.
        research_id: String,
    },
    /// Make a view accessible.
    UnlockView(View),
    /// Show a view.
    SwitchView(View),
    /// Move on to the next era.
    TransitionEra(Era),
    /// Re-evaluate goals.
    EvaluateGoals,
    /// Record that help was shown.
    MarkHelpUsed,
    /// Debug money adjustment.
    AddMoney {
        /// Amount added.
        #[serde(with = "money_serde")]
        amount: Money,
    },
    /// Debug restart.
    Reset,
}

impl Action {
    /// Apply the action at `now`.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] of the underlying transition.
    pub fn try_apply(&self, state: &GameState, now: Timestamp) -> std::result::Result<GameState, Rejection> {
        match self {
            Action::Accrue { amount } => Ok(state.accrue_resource(*amount)),
            Action::ManualAction => Ok(state.perform_manual_action()),
            Action::Purchase { upgrade_id, amount } => {
                state.try_purchase_upgrade(upgrade_id, *amount)
            }
            Action::StartResearch { research_id } => state.try_start_research(research_id, now),
            Action::CompleteResearch { research_id } => state.try_complete_research(research_id),
            Action::UnlockView(view) => Ok(state.unlock_view(*view)),
            Action::SwitchView(view) => state.try_switch_view(*view),
            Action::TransitionEra(era) => state.try_transition_era(*era, now),
            Action::EvaluateGoals => Ok(state.evaluate_goals()),
            Action::MarkHelpUsed => Ok(state.mark_help_used()),
            Action::AddMoney { amount } => Ok(state.add_money(*amount)),
            Action::Reset => Ok(state.reset(now)),
        }
    }

    /// Apply the action at `now`, returning the state unchanged on rejection.
    #[must_use]
    pub fn apply(&self, state: &GameState, now: Timestamp) -> GameState {
        self.try_apply(state, now).unwrap_or_else(|reason| {
            tracing::debug!(action = ?self, %reason, "Action rejected");
            state.clone()
        })
    }
}

/// An action and the time it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedAction {
    /// Wall-clock time of application.
    pub at: Timestamp,
    /// The action.
    pub action: Action,
}

/// Recorded action stream over an initial snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Format version.
    pub version: u32,
    /// Serialized initial snapshot.
    pub initial_state: Vec<u8>,
    /// Actions in application order.
    pub actions: Vec<TimedAction>,
    /// Hash of the final snapshot, set by [`Replay::finalize`].
    pub final_hash: Option<u64>,
}

impl Replay {
    /// Start a recording from an initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized.
    pub fn new(initial: &GameState) -> Result<Self> {
        Ok(Self {
            version: REPLAY_VERSION,
            initial_state: initial.serialize()?,
            actions: Vec::new(),
            final_hash: None,
        })
    }

    /// Append an action.
    pub fn record(&mut self, at: Timestamp, action: Action) {
        self.actions.push(TimedAction { at, action });
    }

    /// Drop every action after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.actions.truncate(len);
        self.final_hash = None;
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Seal the recording with the final snapshot's hash.
    pub fn finalize(&mut self, final_state: &GameState) {
        self.final_hash = Some(final_state.state_hash());
    }

    /// Decode the initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on a version mismatch or undecodable bytes.
    pub fn restore_initial_state(&self) -> Result<GameState> {
        if self.version != REPLAY_VERSION {
            return Err(GameError::InvalidState(format!(
                "Replay version mismatch: expected {REPLAY_VERSION}, got {}",
                self.version
            )));
        }
        GameState::deserialize(&self.initial_state)
    }

    /// Apply every action to the initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot cannot be restored.
    pub fn play(&self) -> Result<GameState> {
        let initial = self.restore_initial_state()?;
        Ok(self
            .actions
            .iter()
            .fold(initial, |state, timed| timed.action.apply(&state, timed.at)))
    }

    /// Play the replay and check it reproduces the recorded final hash.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ReplayMismatch`] if the hashes differ and
    /// [`GameError::InvalidState`] if the replay was never finalized.
    pub fn verify(&self) -> Result<GameState> {
        let expected = self
            .final_hash
            .ok_or_else(|| GameError::InvalidState("Replay has not been finalized".to_string()))?;
        let state = self.play()?;
        let actual = state.state_hash();
        if actual != expected {
            return Err(GameError::ReplayMismatch { expected, actual });
        }
        Ok(state)
    }
}

/// Step-by-step playback of a replay.
#[derive(Debug)]
pub struct ReplayPlayer<'a> {
    replay: &'a Replay,
    state: GameState,
    position: usize,
}

impl<'a> ReplayPlayer<'a> {
    /// Prepare playback from the replay's initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot cannot be restored.
    pub fn new(replay: &'a Replay) -> Result<Self> {
        Ok(Self {
            state: replay.restore_initial_state()?,
            replay,
            position: 0,
        })
    }

    /// Apply the next action. Returns it, or `None` when finished.
    pub fn step(&mut self) -> Option<&'a TimedAction> {
        let timed = self.replay.actions.get(self.position)?;
        self.state = timed.action.apply(&self.state, timed.at);
        self.position += 1;
        Some(timed)
    }

    /// Snapshot after the actions applied so far.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Number of actions applied so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every action has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.replay.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::math::dollars;

    fn recorded() -> (Replay, GameState) {
        let initial = GameState::new(&Catalog::standard(), 0);
        let mut replay = Replay::new(&initial).unwrap();
        let script = [
            (10, Action::ManualAction),
            (20, Action::Accrue { amount: dollars(30) }),
            (
                30,
                Action::Purchase {
                    upgrade_id: "intern".to_string(),
                    amount: 1,
                },
            ),
            (
                40,
                Action::StartResearch {
                    research_id: "basic-macro".to_string(),
                },
            ),
            (
                20_040,
                Action::CompleteResearch {
                    research_id: "basic-macro".to_string(),
                },
            ),
            (20_050, Action::EvaluateGoals),
        ];
        let mut state = initial;
        for (at, action) in script {
            state = action.apply(&state, at);
            replay.record(at, action);
        }
        replay.finalize(&state);
        (replay, state)
    }

    #[test]
    fn test_play_reproduces_final_state() {
        let (replay, state) = recorded();
        assert_eq!(replay.play().unwrap(), state);
        assert_eq!(replay.verify().unwrap().state_hash(), state.state_hash());
        assert_eq!(state.assembly_command, "asmb");
    }

    #[test]
    fn test_tampered_replay_fails_verification() {
        let (mut replay, _) = recorded();
        replay.actions.remove(0);
        let err = replay.verify().unwrap_err();
        assert!(matches!(err, GameError::ReplayMismatch { .. }));
    }

    #[test]
    fn test_unfinalized_replay_cannot_verify() {
        let initial = GameState::new(&Catalog::standard(), 0);
        let replay = Replay::new(&initial).unwrap();
        assert!(matches!(replay.verify(), Err(GameError::InvalidState(_))));
    }

    #[test]
    fn test_version_mismatch() {
        let (mut replay, _) = recorded();
        replay.version = REPLAY_VERSION + 1;
        assert!(replay.restore_initial_state().is_err());
    }

    #[test]
    fn test_player_steps_through_actions() {
        let (replay, state) = recorded();
        let mut player = ReplayPlayer::new(&replay).unwrap();
        assert_eq!(player.position(), 0);
        while player.step().is_some() {}
        assert!(player.is_finished());
        assert_eq!(player.state(), &state);
    }

    #[test]
    fn test_rejected_action_is_a_no_op() {
        let state = GameState::new(&Catalog::standard(), 0);
        let action = Action::Purchase {
            upgrade_id: "coffee-machine".to_string(),
            amount: 1,
        };
        assert_eq!(action.apply(&state, 0), state);
        assert!(action.try_apply(&state, 0).is_err());
    }
}
