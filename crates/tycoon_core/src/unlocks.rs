//! Unlock propagation for upgrades and research.
//!
//! Unlocking is monotonic: a flag flips from locked to unlocked once its
//! predicate holds and never reverts. Only entities of the current era are
//! considered.

use crate::catalog::{Dependency, UnlockRule};
use crate::state::GameState;

/// Whether an upgrade unlock rule holds against a snapshot.
#[must_use]
pub fn unlock_rule_met(rule: &UnlockRule, basis: &GameState) -> bool {
    match rule {
        UnlockRule::Always => true,
        UnlockRule::MoneyAtLeast(threshold) => basis.money >= *threshold,
        UnlockRule::ResearchCompleted(id) => basis.is_completed(id),
        UnlockRule::OwnedAtLeast { upgrade, count } => basis.owned(upgrade) >= *count,
        UnlockRule::ButtonPressesAtLeast(presses) => basis.button_presses >= *presses,
    }
}

/// Whether a single research dependency holds.
#[must_use]
pub fn dependency_met(dependency: &Dependency, state: &GameState) -> bool {
    match dependency {
        Dependency::Research(id) => state.is_completed(id),
        Dependency::Owns(id) => state.owned(id) > 0,
    }
}

/// Ids of the dependencies of `research_id` that do not hold yet.
///
/// Empty when the project is unknown or fully satisfied.
#[must_use]
pub fn missing_dependencies(state: &GameState, research_id: &str) -> Vec<String> {
    state
        .research(research_id)
        .map(|r| {
            r.def
                .dependencies
                .iter()
                .filter(|d| !dependency_met(d, state))
                .map(|d| d.id().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Unlock every current-era upgrade whose rule holds against `basis`.
///
/// `basis` is the snapshot the rules are judged against, which need not be
/// `target` itself. Returns the ids that flipped.
pub fn propagate_upgrade_unlocks(target: &mut GameState, basis: &GameState) -> Vec<String> {
    let stage = target.stage;
    let mut unlocked = Vec::new();
    for upgrade in &mut target.upgrades {
        if upgrade.unlocked || upgrade.def.era != stage {
            continue;
        }
        if unlock_rule_met(&upgrade.def.unlock, basis) {
            upgrade.unlocked = true;
            unlocked.push(upgrade.def.id.clone());
        }
    }
    unlocked
}

/// Unlock every current-era research whose dependencies all hold, repeating
/// until nothing changes. Returns the ids that flipped.
pub fn propagate_research_unlocks(state: &mut GameState) -> Vec<String> {
    let mut unlocked = Vec::new();
    loop {
        let ready: Vec<usize> = state
            .research
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.unlocked && r.def.era == state.stage)
            .filter(|(_, r)| r.def.dependencies.iter().all(|d| dependency_met(d, state)))
            .map(|(index, _)| index)
            .collect();
        if ready.is_empty() {
            break;
        }
        for index in ready {
            let research = &mut state.research[index];
            research.unlocked = true;
            unlocked.push(research.def.id.clone());
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Era};
    use crate::math::dollars;

    fn terminal() -> GameState {
        GameState::new(&Catalog::standard(), 0)
    }

    #[test]
    fn test_unlock_rules() {
        let mut state = terminal();
        assert!(unlock_rule_met(&UnlockRule::Always, &state));
        assert!(!unlock_rule_met(&UnlockRule::MoneyAtLeast(dollars(50)), &state));
        state.money = dollars(50);
        assert!(unlock_rule_met(&UnlockRule::MoneyAtLeast(dollars(50)), &state));

        let rule = UnlockRule::OwnedAtLeast {
            upgrade: "intern".to_string(),
            count: 3,
        };
        state.upgrade_mut("intern").unwrap().owned = 2;
        assert!(!unlock_rule_met(&rule, &state));
        state.upgrade_mut("intern").unwrap().owned = 3;
        assert!(unlock_rule_met(&rule, &state));

        let presses = UnlockRule::ButtonPressesAtLeast(50);
        state.button_presses = 49;
        assert!(!unlock_rule_met(&presses, &state));
        state.button_presses = 50;
        assert!(unlock_rule_met(&presses, &state));
    }

    #[test]
    fn test_intern_dependency_means_ownership() {
        let mut state = terminal();
        let dep = Dependency::parse("intern");
        assert!(!dependency_met(&dep, &state));
        state.upgrade_mut("intern").unwrap().owned = 1;
        assert!(dependency_met(&dep, &state));
    }

    #[test]
    fn test_missing_dependencies_lists_unmet() {
        let mut state = terminal();
        state.research_mut("basic-macro").unwrap().completed = true;
        assert_eq!(
            missing_dependencies(&state, "clipboard-api"),
            vec!["advanced-macro".to_string()]
        );
        assert!(missing_dependencies(&state, "nonexistent").is_empty());
    }

    #[test]
    fn test_upgrade_unlocks_use_basis() {
        let mut target = terminal();
        let mut basis = target.clone();
        basis.money = dollars(60);
        target.money = dollars(10);

        let flipped = propagate_upgrade_unlocks(&mut target, &basis);
        assert_eq!(flipped, vec!["tooling".to_string()]);
        assert!(target.upgrade("tooling").unwrap().unlocked);
    }

    #[test]
    fn test_upgrade_unlocks_never_revert() {
        let mut state = terminal();
        state.money = dollars(60);
        let basis = state.clone();
        propagate_upgrade_unlocks(&mut state, &basis);
        state.money = dollars(0);
        let basis = state.clone();
        propagate_upgrade_unlocks(&mut state, &basis);
        assert!(state.upgrade("tooling").unwrap().unlocked);
    }

    #[test]
    fn test_research_unlocks_skip_other_eras() {
        let mut state = terminal();
        // window-manager has no dependencies but belongs to the GUI era
        propagate_research_unlocks(&mut state);
        assert!(!state.research("window-manager").unwrap().unlocked);
    }

    #[test]
    fn test_research_unlocks_reach_fixed_point() {
        let mut state = terminal();
        state.upgrade_mut("intern").unwrap().owned = 1;
        let flipped = propagate_research_unlocks(&mut state);
        assert!(flipped.contains(&"basic-macro".to_string()));
        assert!(flipped.contains(&"stats-dashboard".to_string()));
        assert!(!state.research("advanced-macro").unwrap().unlocked);

        let again = propagate_research_unlocks(&mut state);
        assert!(again.is_empty());
    }

    #[test]
    fn test_gui_chain_unlocks_step_by_step() {
        let mut state = GameState::for_era(&Catalog::standard(), Era::Gui, 0);
        state.research_mut("window-manager").unwrap().completed = true;
        propagate_research_unlocks(&mut state);
        assert!(state.research("event-system").unwrap().unlocked);
        assert!(!state.research("graphics-api").unwrap().unlocked);
    }
}
