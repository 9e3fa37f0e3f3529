//! Money accrual, manual actions and derived income aggregates.
//!
//! Income rates, per-action values and research speed are never adjusted
//! incrementally. They are recomputed from owned counts by
//! [`GameState::recompute_aggregates`] after every purchase, which is what
//! keeps enhancer upgrades from double-applying.

use crate::catalog::{Era, ResearchEffect, UpgradeEffect};
use crate::math::{dollars, Money};
use crate::state::{GameState, BASE_ACTION_VALUE, BASE_RESEARCH_SPEED_PERCENT, DEFAULT_ASSEMBLY_COMMAND};

impl GameState {
    /// Add money. Only positive amounts count toward lifetime earnings.
    #[must_use]
    pub fn accrue_resource(&self, amount: Money) -> Self {
        let mut next = self.clone();
        next.money = next.money.saturating_add(amount);
        if amount > Money::ZERO {
            next.total_earned = next.total_earned.saturating_add(amount);
        }
        next
    }

    /// Perform the era's manual action: assemble in the terminal era, press
    /// the button afterwards.
    #[must_use]
    pub fn perform_manual_action(&self) -> Self {
        let value = self.manual_action_value();
        let mut next = self.accrue_resource(value);
        match self.stage {
            Era::Terminal => next.sessions += 1,
            Era::Gui | Era::Internet => next.button_presses += 1,
        }
        tracing::debug!(era = %self.stage, value = %value, "Manual action");
        next
    }

    /// Debug adjustment: change money without touching lifetime earnings.
    #[must_use]
    pub fn add_money(&self, amount: Money) -> Self {
        let mut next = self.clone();
        next.money = next.money.saturating_add(amount);
        tracing::debug!(amount = %amount, "Debug money adjustment");
        next
    }

    /// Record that the player has asked for help.
    #[must_use]
    pub fn mark_help_used(&self) -> Self {
        let mut next = self.clone();
        next.has_used_help = true;
        next
    }

    /// Money earned by one manual action in the current era.
    #[must_use]
    pub fn manual_action_value(&self) -> Money {
        match self.stage {
            Era::Terminal => self.assembly_value,
            Era::Gui | Era::Internet => self.button_value,
        }
    }

    /// Money accrued per passive tick.
    #[must_use]
    pub fn passive_income(&self) -> Money {
        self.auto_income.saturating_add(self.gui_auto_income)
    }

    /// Whether a typed word performs a manual assembly.
    ///
    /// The full command always works; shorter aliases work once the research
    /// granting them has completed.
    #[must_use]
    pub fn accepts_assembly_command(&self, command: &str) -> bool {
        command == DEFAULT_ASSEMBLY_COMMAND
            || command == self.assembly_command
            || self.research.iter().any(|r| {
                r.completed
                    && matches!(&r.def.effect, ResearchEffect::AssemblyAlias(alias) if alias == command)
            })
    }

    /// Recompute every owned-count-derived aggregate from scratch.
    pub(crate) fn recompute_aggregates(&mut self) {
        let mut auto_income = Money::ZERO;
        let mut gui_auto_income = Money::ZERO;
        let mut assembly_value = dollars(BASE_ACTION_VALUE);
        let mut button_value = dollars(BASE_ACTION_VALUE);
        let mut speed = BASE_RESEARCH_SPEED_PERCENT;
        let mut features = Vec::new();

        for upgrade in &self.upgrades {
            let owned = upgrade.owned;
            if owned == 0 {
                continue;
            }
            let units = i128::from(owned);
            match &upgrade.def.effect {
                UpgradeEffect::PassiveIncome { per_unit } => {
                    auto_income = auto_income.saturating_add(per_unit.saturating_mul_int(units));
                }
                UpgradeEffect::ClickIncome { per_unit } => {
                    gui_auto_income =
                        gui_auto_income.saturating_add(per_unit.saturating_mul_int(units));
                }
                UpgradeEffect::AssemblyValue { per_unit } => {
                    assembly_value =
                        assembly_value.saturating_add(per_unit.saturating_mul_int(units));
                }
                UpgradeEffect::ClickValue { per_unit } => {
                    button_value = button_value.saturating_add(per_unit.saturating_mul_int(units));
                }
                UpgradeEffect::IncomeBoost { target, per_unit } => {
                    let pairs = units * i128::from(self.owned(target));
                    auto_income = auto_income.saturating_add(per_unit.saturating_mul_int(pairs));
                }
                UpgradeEffect::ResearchSpeed { percent } => {
                    speed = speed.saturating_add(percent.saturating_mul(owned));
                }
                UpgradeEffect::ResearchSpeedBoost { target, percent } => {
                    let pairs = owned.saturating_mul(self.owned(target));
                    speed = speed.saturating_add(percent.saturating_mul(pairs));
                }
                UpgradeEffect::Feature(feature) => features.push(*feature),
            }
        }

        self.auto_income = auto_income;
        self.gui_auto_income = gui_auto_income;
        self.assembly_value = assembly_value;
        self.button_value = button_value;
        self.research_speed_percent = speed;
        for feature in features {
            self.enable_feature(feature);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::math::cents;

    fn terminal() -> GameState {
        GameState::new(&Catalog::standard(), 0)
    }

    #[test]
    fn test_accrue_positive_counts_as_earnings() {
        let state = terminal().accrue_resource(dollars(10));
        assert_eq!(state.money, dollars(10));
        assert_eq!(state.total_earned, dollars(10));
    }

    #[test]
    fn test_accrue_negative_is_not_earnings() {
        let state = terminal().accrue_resource(dollars(10)).accrue_resource(dollars(-4));
        assert_eq!(state.money, dollars(6));
        assert_eq!(state.total_earned, dollars(10));
    }

    #[test]
    fn test_accrue_does_not_mutate_input() {
        let before = terminal();
        let _after = before.accrue_resource(dollars(5));
        assert_eq!(before.money, Money::ZERO);
    }

    #[test]
    fn test_manual_assembly() {
        let state = terminal().perform_manual_action().perform_manual_action();
        assert_eq!(state.money, dollars(2));
        assert_eq!(state.total_earned, dollars(2));
        assert_eq!(state.sessions, 2);
        assert_eq!(state.button_presses, 0);
    }

    #[test]
    fn test_button_press_in_gui_era() {
        let state = GameState::for_era(&Catalog::standard(), Era::Gui, 0).perform_manual_action();
        assert_eq!(state.button_presses, 1);
        assert_eq!(state.sessions, 0);
        assert_eq!(state.money, dollars(1));
    }

    #[test]
    fn test_add_money_skips_earnings() {
        let state = terminal().add_money(dollars(500));
        assert_eq!(state.money, dollars(500));
        assert_eq!(state.total_earned, Money::ZERO);
    }

    #[test]
    fn test_aggregates_from_owned_counts() {
        let mut state = terminal();
        state.upgrade_mut("coffee-machine").unwrap().owned = 3;
        state.upgrade_mut("script").unwrap().owned = 2;
        state.upgrade_mut("script-enhancer").unwrap().owned = 1;
        state.upgrade_mut("tooling").unwrap().owned = 2;
        state.upgrade_mut("intern").unwrap().owned = 4;
        state.upgrade_mut("intern-manager").unwrap().owned = 1;
        state.recompute_aggregates();

        // 3 * 0.5 + 2 * 1 + 1 * 2 * 0.5
        assert_eq!(state.auto_income, cents(450));
        assert_eq!(state.assembly_value, dollars(3));
        // 100 + 4 * 50 + 1 * 4 * 25
        assert_eq!(state.research_speed_percent, 400);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut state = terminal();
        state.upgrade_mut("script").unwrap().owned = 5;
        state.upgrade_mut("script-enhancer").unwrap().owned = 2;
        state.recompute_aggregates();
        let first = state.auto_income;
        state.recompute_aggregates();
        assert_eq!(state.auto_income, first);
    }

    #[test]
    fn test_assembly_aliases_follow_research() {
        let mut state = terminal();
        assert!(state.accepts_assembly_command("assemble"));
        assert!(!state.accepts_assembly_command("asmb"));

        state.research_mut("basic-macro").unwrap().completed = true;
        state.assembly_command = "asmb".to_string();
        assert!(state.accepts_assembly_command("asmb"));
        assert!(!state.accepts_assembly_command("a"));
    }

    #[test]
    fn test_passive_income_sums_channels() {
        let mut state = GameState::for_era(&Catalog::standard(), Era::Gui, 0);
        state.upgrade_mut("auto-clicker").unwrap().owned = 2;
        state.recompute_aggregates();
        assert_eq!(state.passive_income(), dollars(2));
    }
}
