//! Determinism testing utilities.
//!
//! Every transition is a pure function of (snapshot, action, time), so the
//! same action stream over the same initial snapshot must always reach the
//! same final snapshot. These helpers check that, and find the first step at
//! which two runs diverge when it fails.

use tycoon_core::replay::{Action, Replay, TimedAction};
use tycoon_core::state::GameState;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Final hash from each run.
    pub hashes: Vec<u64>,
    /// Number of actions applied per run.
    pub steps: usize,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic engine).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Engine is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Apply a timed action stream to a snapshot.
#[must_use]
pub fn run_actions(initial: &GameState, actions: &[TimedAction]) -> GameState {
    actions
        .iter()
        .fold(initial.clone(), |state, timed| timed.action.apply(&state, timed.at))
}

/// Apply the same action stream `runs` times and compare final hashes.
pub fn verify_determinism<Setup>(runs: usize, setup: Setup, actions: &[TimedAction]) -> DeterminismResult
where
    Setup: Fn() -> GameState,
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| run_actions(&setup(), actions).state_hash())
        .collect();
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
        steps: actions.len(),
    }
}

/// Compare two runs step by step, returning the first diverging step.
///
/// Step 0 is the initial snapshot. `None` means the runs agree throughout.
pub fn find_first_divergence<Setup>(setup: Setup, actions: &[TimedAction]) -> Option<usize>
where
    Setup: Fn() -> GameState,
{
    let mut left = setup();
    let mut right = setup();
    if left.state_hash() != right.state_hash() {
        return Some(0);
    }
    for (index, timed) in actions.iter().enumerate() {
        left = timed.action.apply(&left, timed.at);
        right = timed.action.apply(&right, timed.at);
        if left.state_hash() != right.state_hash() {
            tracing::warn!(step = index + 1, action = ?timed.action, "Runs diverged");
            return Some(index + 1);
        }
    }
    None
}

/// Record an action stream into a finalized replay.
///
/// Returns `None` if the initial snapshot cannot be serialized.
#[must_use]
pub fn record_replay(initial: &GameState, actions: &[TimedAction]) -> Option<Replay> {
    let mut replay = Replay::new(initial).ok()?;
    let mut state = initial.clone();
    for timed in actions {
        state = timed.action.apply(&state, timed.at);
        replay.record(timed.at, timed.action.clone());
    }
    replay.finalize(&state);
    Some(replay)
}

/// Verify that a snapshot survives a serialization round-trip unchanged.
#[must_use]
pub fn verify_serialization_determinism(state: &GameState) -> bool {
    let Ok(bytes) = state.serialize() else {
        return false;
    };
    GameState::deserialize(&bytes).is_ok_and(|restored| restored.state_hash() == state.state_hash())
}

/// Attach increasing timestamps to a list of actions, `gap_ms` apart.
#[must_use]
pub fn timed(actions: Vec<Action>, gap_ms: u64) -> Vec<TimedAction> {
    actions
        .into_iter()
        .zip(1_u64..)
        .map(|(action, step)| TimedAction {
            at: step * gap_ms,
            action,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::new_game;

    #[test]
    fn test_empty_stream_is_deterministic() {
        let result = verify_determinism(3, new_game, &[]);
        result.assert_deterministic();
        assert_eq!(result.unique_hashes().len(), 1);
    }

    #[test]
    fn test_timed_spacing() {
        let actions = timed(vec![Action::ManualAction, Action::MarkHelpUsed], 500);
        assert_eq!(actions[0].at, 500);
        assert_eq!(actions[1].at, 1_000);
    }

    #[test]
    fn test_recorded_replay_verifies() {
        let actions = timed(vec![Action::MarkHelpUsed, Action::ManualAction, Action::EvaluateGoals], 10);
        let replay = record_replay(&new_game(), &actions).unwrap();
        assert!(replay.verify().is_ok());
        assert_eq!(find_first_divergence(new_game, &actions), None);
    }
}
