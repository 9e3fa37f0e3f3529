//! Proptest strategies for the progression engine.
//!
//! Strategies generate plausible play: mostly valid ids with the odd unknown
//! one, small purchase amounts, and time that only moves forward.

use proptest::prelude::*;
use tycoon_core::catalog::{Catalog, Era, View};
use tycoon_core::math::Money;
use tycoon_core::replay::{Action, TimedAction};

/// Any upgrade id from the built-in catalog, or an unknown one.
pub fn arb_upgrade_id() -> impl Strategy<Value = String> {
    let ids: Vec<String> = Catalog::standard()
        .upgrades
        .iter()
        .map(|u| u.id.clone())
        .collect();
    prop_oneof![
        9 => proptest::sample::select(ids),
        1 => Just("warp-drive".to_string()),
    ]
}

/// Any research id from the built-in catalog, or an unknown one.
pub fn arb_research_id() -> impl Strategy<Value = String> {
    let ids: Vec<String> = Catalog::standard()
        .research
        .iter()
        .map(|r| r.id.clone())
        .collect();
    prop_oneof![
        9 => proptest::sample::select(ids),
        1 => Just("time-travel".to_string()),
    ]
}

/// Whole-dollar money in a range that buys early upgrades.
pub fn arb_money() -> impl Strategy<Value = Money> {
    (0_i64..2_000).prop_map(Money::from_num)
}

/// Dyadic fractions of a dollar, as income increments are.
pub fn arb_income() -> impl Strategy<Value = Money> {
    (0_i64..64).prop_map(|halves| Money::from_num(halves) / 2_i128)
}

/// A purchase amount, including the invalid zero.
pub fn arb_amount() -> impl Strategy<Value = u32> {
    prop_oneof![
        1 => Just(0_u32),
        9 => 1_u32..5,
    ]
}

/// Any view.
pub fn arb_view() -> impl Strategy<Value = View> {
    proptest::sample::select(View::ALL.to_vec())
}

/// Any era.
pub fn arb_era() -> impl Strategy<Value = Era> {
    proptest::sample::select(Era::ALL.to_vec())
}

/// A single player-facing action. Debug actions are excluded.
pub fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => Just(Action::ManualAction),
        3 => arb_income().prop_map(|amount| Action::Accrue { amount }),
        4 => (arb_upgrade_id(), arb_amount())
            .prop_map(|(upgrade_id, amount)| Action::Purchase { upgrade_id, amount }),
        3 => arb_research_id().prop_map(|research_id| Action::StartResearch { research_id }),
        3 => arb_research_id().prop_map(|research_id| Action::CompleteResearch { research_id }),
        1 => arb_view().prop_map(Action::UnlockView),
        1 => arb_view().prop_map(Action::SwitchView),
        1 => arb_era().prop_map(Action::TransitionEra),
        1 => Just(Action::EvaluateGoals),
        1 => Just(Action::MarkHelpUsed),
    ]
}

/// A stream of actions with non-decreasing timestamps starting at zero.
pub fn arb_timed_actions(max_len: usize) -> impl Strategy<Value = Vec<TimedAction>> {
    proptest::collection::vec((arb_action(), 0_u64..60_000), 0..max_len).prop_map(|steps| {
        let mut at = 0;
        steps
            .into_iter()
            .map(|(action, gap)| {
                at += gap;
                TimedAction { at, action }
            })
            .collect()
    })
}
