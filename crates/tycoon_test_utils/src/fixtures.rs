//! Test fixtures and helpers.
//!
//! Pre-built game states at common points of progression, built through
//! the public transitions so they stay valid as the rules change.

use fixed::types::I64F64;
use tycoon_core::catalog::{Catalog, Era};
use tycoon_core::math::Money;
use tycoon_core::state::GameState;

/// Money from a whole number of dollars.
#[must_use]
pub fn money(n: i64) -> Money {
    I64F64::from_num(n)
}

/// Fresh terminal-era state at time zero.
#[must_use]
pub fn new_game() -> GameState {
    GameState::new(&Catalog::standard(), 0)
}

/// Terminal-era state holding `amount` dollars of earned money.
#[must_use]
pub fn rich_game(amount: i64) -> GameState {
    new_game().accrue_resource(money(amount))
}

/// Terminal-era state owning `interns` interns, with no money left over.
#[must_use]
pub fn with_interns(interns: u32) -> GameState {
    let mut state = new_game();
    for _ in 0..interns {
        let cost = state
            .quote_purchase("intern", 1)
            .map_or(Money::ZERO, |quote| quote.cost);
        state = state.accrue_resource(cost).purchase_upgrade("intern", 1);
    }
    state
}

/// Start a research project at `now` and complete it straight away.
#[must_use]
pub fn research_now(state: &GameState, research_id: &str, now: u64) -> GameState {
    state
        .start_research(research_id, now)
        .complete_research(research_id)
}

/// Terminal-era state with every project needed for the GUI gate finished,
/// and the gate itself completed.
#[must_use]
pub fn gui_ready() -> GameState {
    let mut state = with_interns(1);
    for id in [
        "basic-macro",
        "advanced-macro",
        "clipboard-api",
        "ascii-schematics",
        "stats-dashboard",
        "project-gui",
    ] {
        state = research_now(&state, id, 0);
    }
    state
}

/// Fresh GUI-era state reached through a real transition.
#[must_use]
pub fn gui_game() -> GameState {
    gui_ready().transition_era(Era::Gui, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_interns() {
        let state = with_interns(3);
        assert_eq!(state.owned("intern"), 3);
        assert_eq!(state.money, Money::ZERO);
    }

    #[test]
    fn test_gui_ready_unlocks_transition() {
        let state = gui_ready();
        assert!(state.transition_unlocked);
        assert!(state.can_transition_to(Era::Gui));
        assert_eq!(gui_game().stage, Era::Gui);
    }
}
