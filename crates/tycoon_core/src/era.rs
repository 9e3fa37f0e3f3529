//! View switching, era transitions and resets.

use crate::catalog::{Era, View};
use crate::error::Rejection;
use crate::math::Timestamp;
use crate::state::GameState;

impl GameState {
    /// Show an accessible view.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::ViewLocked`] if the view is not accessible.
    pub fn try_switch_view(&self, view: View) -> Result<Self, Rejection> {
        if !self.has_view(view) {
            return Err(Rejection::ViewLocked(view));
        }
        let mut next = self.clone();
        next.current_tab = view;
        Ok(next)
    }

    /// Show a view, or return the state unchanged if it is not accessible.
    #[must_use]
    pub fn switch_view(&self, view: View) -> Self {
        self.try_switch_view(view).unwrap_or_else(|reason| {
            tracing::debug!(%view, %reason, "View switch rejected");
            self.clone()
        })
    }

    /// Make a view accessible without switching to it. Opening an
    /// accessible view again changes nothing.
    #[must_use]
    pub fn unlock_view(&self, view: View) -> Self {
        let mut next = self.clone();
        next.open_view(view);
        next
    }

    /// Whether the player may move on to `target` now.
    #[must_use]
    pub fn can_transition_to(&self, target: Era) -> bool {
        self.transition_unlocked && self.stage.next() == Some(target)
    }

    /// Move to the next era.
    ///
    /// The snapshot is replaced by a fresh one scoped to `target`: money,
    /// counters, owned counts and views all restart. Any research in flight
    /// is discarded and its ticket becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::TransitionLocked`] unless `target` directly
    /// follows the current era and the era's gate research has completed.
    pub fn try_transition_era(&self, target: Era, now: Timestamp) -> Result<Self, Rejection> {
        if !self.can_transition_to(target) {
            return Err(Rejection::TransitionLocked {
                from: self.stage,
                to: target,
            });
        }
        let next = self.fresh(target, now);
        tracing::info!(from = %self.stage, to = %target, epoch = next.epoch, "Era transition");
        Ok(next)
    }

    /// Move to the next era, or return the state unchanged.
    #[must_use]
    pub fn transition_era(&self, target: Era, now: Timestamp) -> Self {
        self.try_transition_era(target, now).unwrap_or_else(|reason| {
            tracing::debug!(%target, %reason, "Era transition rejected");
            self.clone()
        })
    }

    /// Restart from the beginning of the first era.
    #[must_use]
    pub fn reset(&self, now: Timestamp) -> Self {
        let next = self.fresh(Era::Terminal, now);
        tracing::info!(epoch = next.epoch, "Game reset");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::math::{dollars, Money};

    #[test]
    fn test_switch_view_requires_access() {
        let state = GameState::new(&Catalog::standard(), 0);
        assert_eq!(
            state.try_switch_view(View::Research),
            Err(Rejection::ViewLocked(View::Research))
        );
        let next = state.switch_view(View::Upgrades);
        assert_eq!(next.current_tab, View::Upgrades);
    }

    #[test]
    fn test_unlock_view_then_switch() {
        let state = GameState::new(&Catalog::standard(), 0);
        let opened = state.unlock_view(View::Stats);
        assert_eq!(
            opened.unlocked_tabs,
            vec![View::Goals, View::Upgrades, View::Stats]
        );
        assert_eq!(opened.current_tab, View::Goals);
        assert_eq!(opened.unlock_view(View::Stats), opened);
        assert_eq!(opened.switch_view(View::Stats).current_tab, View::Stats);
    }

    #[test]
    fn test_transition_needs_gate() {
        let state = GameState::new(&Catalog::standard(), 0);
        assert_eq!(state.transition_era(Era::Gui, 10), state);
    }

    #[test]
    fn test_transition_must_follow_order() {
        let mut state = GameState::new(&Catalog::standard(), 0);
        state.transition_unlocked = true;
        assert_eq!(
            state.try_transition_era(Era::Internet, 10),
            Err(Rejection::TransitionLocked {
                from: Era::Terminal,
                to: Era::Internet,
            })
        );
    }

    #[test]
    fn test_transition_is_full_reset() {
        let mut state = GameState::new(&Catalog::standard(), 0)
            .accrue_resource(dollars(500))
            .purchase_upgrade("intern", 1)
            .switch_view(View::Research);
        state.transition_unlocked = true;

        let gui = state.transition_era(Era::Gui, 99);
        assert_eq!(gui.stage, Era::Gui);
        assert_eq!(gui.money, Money::ZERO);
        assert_eq!(gui.total_earned, Money::ZERO);
        assert_eq!(gui.owned("intern"), 0);
        assert_eq!(gui.current_tab, View::Goals);
        assert_eq!(gui.unlocked_tabs, vec![View::Goals, View::Upgrades]);
        assert_eq!(gui.start_time, 99);
        assert!(!gui.transition_unlocked);
        assert_eq!(gui.epoch, state.epoch + 1);
        assert!(gui.research("window-manager").unwrap().unlocked);
        assert!(!gui.upgrade("coffee-machine").unwrap().unlocked);
    }

    #[test]
    fn test_reset_discards_research_in_flight() {
        let state = GameState::new(&Catalog::standard(), 0)
            .accrue_resource(dollars(25))
            .purchase_upgrade("intern", 1)
            .start_research("basic-macro", 0);
        let reset = state.reset(1);
        assert!(reset.current_research.is_none());
        assert_eq!(reset.stage, Era::Terminal);
        assert_eq!(reset.epoch, 1);
    }
}
