//! Invariant checks for the progression state machine.
//!
//! Each check returns `Err` with a description of the first violation so
//! property tests can report it directly.

use tycoon_core::state::GameState;
use tycoon_core::unlocks::{propagate_research_unlocks, propagate_upgrade_unlocks};

/// Result of an invariant check.
pub type CheckResult = Result<(), String>;

/// Owned counts, unlock flags and completion flags never decrease between
/// two snapshots of the same run (no reset or transition in between).
///
/// # Errors
///
/// Describes the first field that went backwards.
pub fn check_monotonic(before: &GameState, after: &GameState) -> CheckResult {
    if before.epoch != after.epoch {
        return Ok(());
    }
    for (old, new) in before.upgrades.iter().zip(&after.upgrades) {
        if new.owned < old.owned {
            return Err(format!("owned of '{}' decreased", old.id()));
        }
        if old.unlocked && !new.unlocked {
            return Err(format!("upgrade '{}' re-locked", old.id()));
        }
    }
    for (old, new) in before.research.iter().zip(&after.research) {
        if old.unlocked && !new.unlocked {
            return Err(format!("research '{}' re-locked", old.id()));
        }
        if old.completed && !new.completed {
            return Err(format!("research '{}' un-completed", old.id()));
        }
    }
    for (old, new) in before.goals.iter().zip(&after.goals) {
        if old.completed && !new.completed {
            return Err(format!("goal '{}' un-completed", old.def.id));
        }
    }
    if after.research_completed < before.research_completed {
        return Err("research counter decreased".to_string());
    }
    if after.total_earned < before.total_earned {
        return Err("total earned decreased".to_string());
    }
    Ok(())
}

/// Completed research was unlocked, and the project in flight is unlocked
/// and not completed.
///
/// # Errors
///
/// Describes the offending project.
pub fn check_research_consistency(state: &GameState) -> CheckResult {
    for research in &state.research {
        if research.completed && !research.unlocked {
            return Err(format!("research '{}' completed while locked", research.id()));
        }
    }
    if let Some(active) = &state.current_research {
        let research = state
            .research(&active.id)
            .ok_or_else(|| format!("unknown research '{}' in flight", active.id))?;
        if research.completed || !research.unlocked {
            return Err(format!("research '{}' in flight in wrong state", active.id));
        }
    }
    Ok(())
}

/// Re-running research unlock propagation changes nothing.
///
/// # Errors
///
/// Lists the projects a second pass would unlock.
pub fn check_research_fixed_point(state: &GameState) -> CheckResult {
    let mut again = state.clone();
    let flipped = propagate_research_unlocks(&mut again);
    if flipped.is_empty() {
        Ok(())
    } else {
        Err(format!("second pass unlocked research {flipped:?}"))
    }
}

/// Re-running upgrade unlock propagation against `basis` changes nothing.
///
/// # Errors
///
/// Lists the upgrades a second pass would unlock.
pub fn check_upgrade_fixed_point(state: &GameState, basis: &GameState) -> CheckResult {
    let mut again = state.clone();
    let flipped = propagate_upgrade_unlocks(&mut again, basis);
    if flipped.is_empty() {
        Ok(())
    } else {
        Err(format!("second pass unlocked upgrades {flipped:?}"))
    }
}

/// Accessible views contain no duplicates and include the current one.
///
/// # Errors
///
/// Describes the problem.
pub fn check_views(state: &GameState) -> CheckResult {
    for (index, view) in state.unlocked_tabs.iter().enumerate() {
        if state.unlocked_tabs[..index].contains(view) {
            return Err(format!("view '{view}' listed twice"));
        }
    }
    if !state.has_view(state.current_tab) {
        return Err(format!("current view '{}' is not accessible", state.current_tab));
    }
    Ok(())
}

/// Run every single-snapshot check.
///
/// # Errors
///
/// Returns the first violation found.
pub fn check_all(state: &GameState) -> CheckResult {
    check_research_consistency(state)?;
    check_research_fixed_point(state)?;
    check_views(state)
}
