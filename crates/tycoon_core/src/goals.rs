//! Guided-tour goal evaluation.
//!
//! Each [`GoalId`] maps to one pure predicate over the snapshot. Completion
//! is sticky; visibility follows the predicate so goals appear as the player
//! progresses.

use crate::catalog::{Era, GoalId, INTERN_DEPENDENCY};
use crate::state::GameState;

/// Result of evaluating one goal predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalCheck {
    /// New visibility, or `None` to keep the stored value.
    pub visible: Option<bool>,
    /// Whether the goal's condition currently holds.
    pub completed: bool,
}

/// Evaluate the predicate behind a goal id.
#[must_use]
pub fn check_goal(id: GoalId, state: &GameState) -> GoalCheck {
    let interns = state.owned(INTERN_DEPENDENCY);
    let gui_upgrade_owned = state
        .upgrades
        .iter()
        .any(|u| u.def.era == Era::Gui && u.owned > 0);
    let gui_research_done = state
        .research
        .iter()
        .any(|r| r.def.era == Era::Gui && r.completed);

    let (visible, completed) = match id {
        GoalId::FirstHelp => (None, state.has_used_help),
        GoalId::FirstAssembly => (Some(state.has_used_help), state.sessions > 0),
        GoalId::HireIntern => (Some(state.sessions > 0 && state.has_used_help), interns > 0),
        GoalId::FirstResearch => (Some(interns > 0), state.research_completed > 0),
        GoalId::GuiTransition => (
            Some(state.research_completed > 0),
            state.stage == Era::Terminal && state.transition_unlocked,
        ),
        GoalId::FirstClick => (None, state.button_presses > 0),
        GoalId::GuiUpgrade => (Some(state.button_presses > 0), gui_upgrade_owned),
        GoalId::Automation => (Some(gui_upgrade_owned), gui_research_done),
    };
    GoalCheck { visible, completed }
}

impl GameState {
    /// Recompute visibility and completion of the current era's goals.
    ///
    /// Completed goals stay completed. Other eras' goals are left as stored.
    #[must_use]
    pub fn evaluate_goals(&self) -> Self {
        let mut next = self.clone();
        let checks: Vec<(usize, GoalCheck)> = self
            .goals
            .iter()
            .enumerate()
            .filter(|(_, g)| g.def.era == self.stage)
            .map(|(index, g)| (index, check_goal(g.def.id, self)))
            .collect();

        for (index, check) in checks {
            let goal = &mut next.goals[index];
            if let Some(visible) = check.visible {
                goal.visible = visible;
            }
            if check.completed && !goal.completed {
                goal.completed = true;
                tracing::debug!(goal = %goal.def.id, "Goal completed");
            }
        }
        next
    }

    /// Number of completed goals in the current era.
    #[must_use]
    pub fn completed_goal_count(&self) -> usize {
        self.goals
            .iter()
            .filter(|g| g.def.era == self.stage && g.completed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::math::dollars;

    fn goal(state: &GameState, id: GoalId) -> (bool, bool) {
        let g = state.goals.iter().find(|g| g.def.id == id).unwrap();
        (g.visible, g.completed)
    }

    #[test]
    fn test_guided_tour_progression() {
        let state = GameState::new(&Catalog::standard(), 0).evaluate_goals();
        assert_eq!(goal(&state, GoalId::FirstHelp), (true, false));
        assert_eq!(goal(&state, GoalId::FirstAssembly), (false, false));

        let state = state.mark_help_used().evaluate_goals();
        assert_eq!(goal(&state, GoalId::FirstHelp), (true, true));
        assert_eq!(goal(&state, GoalId::FirstAssembly), (true, false));

        let state = state.perform_manual_action().evaluate_goals();
        assert_eq!(goal(&state, GoalId::FirstAssembly), (true, true));
        assert_eq!(goal(&state, GoalId::HireIntern), (true, false));

        let state = state
            .accrue_resource(dollars(25))
            .purchase_upgrade("intern", 1)
            .evaluate_goals();
        assert_eq!(goal(&state, GoalId::HireIntern), (true, true));
        assert_eq!(goal(&state, GoalId::FirstResearch), (true, false));
        assert_eq!(state.completed_goal_count(), 3);
    }

    #[test]
    fn test_completion_is_sticky() {
        let mut state = GameState::new(&Catalog::standard(), 0)
            .mark_help_used()
            .evaluate_goals();
        state.has_used_help = false;
        let state = state.evaluate_goals();
        assert!(goal(&state, GoalId::FirstHelp).1);
    }

    #[test]
    fn test_other_era_goals_untouched() {
        let mut state = GameState::new(&Catalog::standard(), 0);
        state.button_presses = 5;
        let state = state.evaluate_goals();
        assert_eq!(goal(&state, GoalId::FirstClick), (false, false));
    }

    #[test]
    fn test_gui_goals() {
        let state = GameState::for_era(&Catalog::standard(), Era::Gui, 0)
            .perform_manual_action()
            .evaluate_goals();
        assert_eq!(goal(&state, GoalId::FirstClick), (true, true));
        assert_eq!(goal(&state, GoalId::GuiUpgrade), (true, false));
        assert_eq!(goal(&state, GoalId::Automation), (false, false));
    }
}
