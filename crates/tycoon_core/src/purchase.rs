//! Upgrade pricing and purchase transitions.

use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::math::{money_serde, total_price, Money};
use crate::state::GameState;
use crate::unlocks::{propagate_research_unlocks, propagate_upgrade_unlocks};

/// Cost of buying some units of an upgrade at the current owned count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseQuote {
    /// Upgrade id.
    pub upgrade_id: String,
    /// Units quoted.
    pub amount: u32,
    /// Total cost, each unit's price floored before summing.
    #[serde(with = "money_serde")]
    pub cost: Money,
}

impl PurchaseQuote {
    /// Money still needed to afford the purchase; zero if affordable.
    #[must_use]
    pub fn shortfall(&self, money: Money) -> Money {
        if money >= self.cost {
            Money::ZERO
        } else {
            self.cost.saturating_sub(money)
        }
    }

    /// Whether `money` covers the cost.
    #[must_use]
    pub fn affordable(&self, money: Money) -> bool {
        money >= self.cost
    }
}

impl GameState {
    /// Price `amount` units of an upgrade without buying them.
    ///
    /// Checks existence, era and unlock state, but not funds, so the view
    /// layer can show the cost of something it cannot yet afford.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] a purchase would hit before the funds check.
    pub fn quote_purchase(&self, upgrade_id: &str, amount: u32) -> Result<PurchaseQuote, Rejection> {
        if amount == 0 {
            return Err(Rejection::InvalidAmount);
        }
        let upgrade = self
            .upgrade(upgrade_id)
            .ok_or_else(|| Rejection::UnknownUpgrade(upgrade_id.to_string()))?;
        if upgrade.def.era != self.stage {
            return Err(Rejection::WrongEra {
                id: upgrade_id.to_string(),
                era: upgrade.def.era,
            });
        }
        if !upgrade.unlocked {
            return Err(Rejection::UpgradeLocked(upgrade_id.to_string()));
        }
        Ok(PurchaseQuote {
            upgrade_id: upgrade_id.to_string(),
            amount,
            cost: total_price(
                upgrade.def.base_cost,
                upgrade.def.cost_multiplier,
                upgrade.owned,
                amount,
            ),
        })
    }

    /// Buy `amount` units of an upgrade.
    ///
    /// On success the cost is deducted, owned count raised, aggregates
    /// recomputed, upgrades re-checked against the pre-purchase snapshot,
    /// research re-checked against the new one, and any view the upgrade
    /// gates opened.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] if the upgrade is unknown, from another era,
    /// locked, unaffordable, or `amount` is zero.
    pub fn try_purchase_upgrade(&self, upgrade_id: &str, amount: u32) -> Result<Self, Rejection> {
        let quote = self.quote_purchase(upgrade_id, amount)?;
        if !quote.affordable(self.money) {
            return Err(Rejection::InsufficientFunds {
                cost: quote.cost,
                shortfall: quote.shortfall(self.money),
            });
        }

        let mut next = self.clone();
        next.money -= quote.cost;
        let opens_view = match next.upgrade_mut(upgrade_id) {
            Some(upgrade) => {
                upgrade.owned = upgrade.owned.saturating_add(amount);
                upgrade.def.opens_view
            }
            None => return Err(Rejection::UnknownUpgrade(upgrade_id.to_string())),
        };
        next.recompute_aggregates();
        propagate_upgrade_unlocks(&mut next, self);
        propagate_research_unlocks(&mut next);
        if let Some(view) = opens_view {
            next.open_view(view);
        }

        tracing::debug!(
            upgrade = upgrade_id,
            amount,
            cost = %quote.cost,
            "Purchased upgrade"
        );
        Ok(next)
    }

    /// Buy `amount` units of an upgrade, or return the state unchanged.
    #[must_use]
    pub fn purchase_upgrade(&self, upgrade_id: &str, amount: u32) -> Self {
        self.try_purchase_upgrade(upgrade_id, amount)
            .unwrap_or_else(|reason| {
                tracing::debug!(upgrade = upgrade_id, %reason, "Purchase rejected");
                self.clone()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Era, View};
    use crate::math::{cents, dollars};

    fn terminal() -> GameState {
        GameState::new(&Catalog::standard(), 0)
    }

    #[test]
    fn test_coffee_machine_rejected_without_money() {
        let state = terminal();
        let next = state.purchase_upgrade("coffee-machine", 1);
        assert_eq!(next, state);
        assert_eq!(
            state.try_purchase_upgrade("coffee-machine", 1),
            Err(Rejection::InsufficientFunds {
                cost: dollars(10),
                shortfall: dollars(10),
            })
        );
    }

    #[test]
    fn test_coffee_machine_purchase() {
        let state = terminal().accrue_resource(dollars(10));
        let next = state.purchase_upgrade("coffee-machine", 1);
        assert_eq!(next.money, Money::ZERO);
        assert_eq!(next.owned("coffee-machine"), 1);
        assert_eq!(next.auto_income, cents(50));
        assert_eq!(next.total_earned, dollars(10));
    }

    #[test]
    fn test_multi_unit_cost_floors_each_unit() {
        // 10 + floor(13) + floor(16.9) = 39
        let quote = terminal().quote_purchase("coffee-machine", 3).unwrap();
        assert_eq!(quote.cost, dollars(39));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let state = terminal().accrue_resource(dollars(100));
        assert_eq!(
            state.try_purchase_upgrade("coffee-machine", 0),
            Err(Rejection::InvalidAmount)
        );
    }

    #[test]
    fn test_unknown_and_locked() {
        let state = terminal().accrue_resource(dollars(1000));
        assert_eq!(
            state.try_purchase_upgrade("warp-drive", 1),
            Err(Rejection::UnknownUpgrade("warp-drive".to_string()))
        );
        assert_eq!(
            state.try_purchase_upgrade("script-enhancer", 1),
            Err(Rejection::UpgradeLocked("script-enhancer".to_string()))
        );
        assert_eq!(
            state.try_purchase_upgrade("mouse-upgrade", 1),
            Err(Rejection::WrongEra {
                id: "mouse-upgrade".to_string(),
                era: Era::Gui,
            })
        );
    }

    #[test]
    fn test_intern_opens_research_view_once() {
        let state = terminal().accrue_resource(dollars(200));
        let next = state
            .purchase_upgrade("intern", 1)
            .purchase_upgrade("intern", 1);
        assert_eq!(next.owned("intern"), 2);
        assert_eq!(
            next.unlocked_tabs,
            vec![View::Goals, View::Upgrades, View::Research]
        );
        assert!(next.research("basic-macro").unwrap().unlocked);
        assert_eq!(next.research_speed_percent, 200);
    }

    #[test]
    fn test_unlocks_judged_on_pre_purchase_money() {
        // $60 before buying a coffee machine: tooling unlocks even though
        // only $50 remains afterwards.
        let state = terminal().accrue_resource(dollars(60));
        let next = state.purchase_upgrade("coffee-machine", 1);
        assert!(next.upgrade("tooling").unwrap().unlocked);

        // $55 before, $45 after: still judged on $55.
        let state = terminal().accrue_resource(dollars(55));
        let next = state.purchase_upgrade("coffee-machine", 1);
        assert!(next.upgrade("tooling").unwrap().unlocked);
    }

    #[test]
    fn test_intern_manager_unlocks_after_third_intern_purchase() {
        let state = terminal().accrue_resource(dollars(10_000));
        let three = state
            .purchase_upgrade("intern", 1)
            .purchase_upgrade("intern", 1)
            .purchase_upgrade("intern", 1);
        // The third purchase saw two interns beforehand.
        assert!(!three.upgrade("intern-manager").unwrap().unlocked);
        let four = three.purchase_upgrade("coffee-machine", 1);
        assert!(four.upgrade("intern-manager").unwrap().unlocked);
    }

    #[test]
    fn test_enhancer_does_not_double_apply() {
        let mut state = terminal().accrue_resource(dollars(100_000));
        state.research_mut("automation-theory").unwrap().completed = true;
        state.upgrade_mut("script-enhancer").unwrap().unlocked = true;

        let next = state
            .purchase_upgrade("script", 2)
            .purchase_upgrade("script-enhancer", 1)
            .purchase_upgrade("script-enhancer", 1);
        // 2 scripts * 1 + 2 enhancers * 2 scripts * 0.5
        assert_eq!(next.auto_income, dollars(4));
    }

    #[test]
    fn test_quote_shortfall() {
        let state = terminal().accrue_resource(dollars(4));
        let quote = state.quote_purchase("coffee-machine", 1).unwrap();
        assert_eq!(quote.shortfall(state.money), dollars(6));
        assert!(!quote.affordable(state.money));
    }
}
