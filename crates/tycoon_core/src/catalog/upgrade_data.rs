//! Upgrade definitions.

use serde::{Deserialize, Serialize};

use super::{Era, Feature, View};
use crate::math::{money_serde, Money};

/// What owning an upgrade does to the game state.
///
/// Effects contribute to aggregates that are recomputed from owned counts
/// after every purchase, so repeated purchases never double-apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeEffect {
    /// Adds passive income per second for each unit owned.
    PassiveIncome {
        /// Income per unit per second.
        #[serde(with = "money_serde")]
        per_unit: Money,
    },

    /// Adds automated button-press income per second for each unit owned.
    ClickIncome {
        /// Income per unit per second.
        #[serde(with = "money_serde")]
        per_unit: Money,
    },

    /// Raises the value of each terminal-era manual assembly.
    AssemblyValue {
        /// Value added per unit.
        #[serde(with = "money_serde")]
        per_unit: Money,
    },

    /// Raises the value of each GUI-era button press.
    ClickValue {
        /// Value added per unit.
        #[serde(with = "money_serde")]
        per_unit: Money,
    },

    /// Boosts the passive income of another upgrade's owned units.
    ///
    /// Contributes `per_unit * owned(self) * owned(target)`.
    IncomeBoost {
        /// Upgrade whose units are boosted.
        target: String,
        /// Extra income per unit of self per unit of target.
        #[serde(with = "money_serde")]
        per_unit: Money,
    },

    /// Adds research speed in percentage points per unit owned.
    ResearchSpeed {
        /// Percentage points per unit.
        percent: u32,
    },

    /// Adds research speed scaled by another upgrade's owned count.
    ///
    /// Contributes `percent * owned(self) * owned(target)` percentage points.
    ResearchSpeedBoost {
        /// Upgrade whose units are boosted.
        target: String,
        /// Percentage points per unit of self per unit of target.
        percent: u32,
    },

    /// Grants a permanent feature once at least one unit is owned.
    Feature(Feature),
}

impl UpgradeEffect {
    /// The other upgrade this effect scales with, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::IncomeBoost { target, .. } | Self::ResearchSpeedBoost { target, .. } => {
                Some(target.as_str())
            }
            _ => None,
        }
    }
}

/// Predicate that flips a locked upgrade to unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnlockRule {
    /// Unlocked as soon as its era begins.
    Always,

    /// Money on hand reaches a threshold.
    MoneyAtLeast(#[serde(with = "money_serde")] Money),

    /// A specific research project has completed.
    ResearchCompleted(String),

    /// Another upgrade's owned count reaches a threshold.
    OwnedAtLeast {
        /// Upgrade id to count.
        upgrade: String,
        /// Required owned count.
        count: u32,
    },

    /// GUI-era button presses reach a threshold.
    ButtonPressesAtLeast(u64),
}

/// Data-driven upgrade definition.
///
/// # Example RON
///
/// ```ron
/// UpgradeDef(
///     id: "coffee-machine",
///     name: "Coffee Machine",
///     description: "Generates small passive income from vending.",
///     base_cost: 10,
///     cost_multiplier: 130,
///     era: Terminal,
///     effect: PassiveIncome(per_unit: "0.5"),
///     unlock: Always,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeDef {
    /// Unique string identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Flavor text.
    #[serde(default)]
    pub description: String,

    /// Price of the first unit.
    pub base_cost: u64,

    /// Price growth per unit owned, as a percentage (`150` = x1.5).
    pub cost_multiplier: u32,

    /// Era this upgrade belongs to.
    pub era: Era,

    /// Effect of each owned unit.
    pub effect: UpgradeEffect,

    /// When the upgrade becomes purchasable.
    #[serde(default = "default_unlock")]
    pub unlock: UnlockRule,

    /// View made accessible by the first purchase.
    #[serde(default)]
    pub opens_view: Option<View>,
}

fn default_unlock() -> UnlockRule {
    UnlockRule::Always
}

impl UpgradeDef {
    /// Create an upgrade that is unlocked from the start of its era.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_cost: u64,
        cost_multiplier: u32,
        era: Era,
        effect: UpgradeEffect,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            base_cost,
            cost_multiplier,
            era,
            effect,
            unlock: UnlockRule::Always,
            opens_view: None,
        }
    }

    /// Set the flavor text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Require a predicate before the upgrade unlocks.
    #[must_use]
    pub fn with_unlock(mut self, rule: UnlockRule) -> Self {
        self.unlock = rule;
        self
    }

    /// Make the first purchase open a view.
    #[must_use]
    pub fn with_opens_view(mut self, view: View) -> Self {
        self.opens_view = Some(view);
        self
    }

    /// Whether this upgrade is available without meeting any predicate.
    #[must_use]
    pub fn starts_unlocked(&self) -> bool {
        self.unlock == UnlockRule::Always
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::cents;

    #[test]
    fn test_builder() {
        let def = UpgradeDef::new(
            "coffee-machine",
            "Coffee Machine",
            10,
            130,
            Era::Terminal,
            UpgradeEffect::PassiveIncome { per_unit: cents(50) },
        );
        assert!(def.starts_unlocked());
        assert_eq!(def.opens_view, None);

        let locked = def.with_unlock(UnlockRule::ButtonPressesAtLeast(5));
        assert!(!locked.starts_unlocked());
    }

    #[test]
    fn test_effect_target() {
        let boost = UpgradeEffect::IncomeBoost {
            target: "script".to_string(),
            per_unit: cents(50),
        };
        assert_eq!(boost.target(), Some("script"));
        assert_eq!(UpgradeEffect::ResearchSpeed { percent: 50 }.target(), None);
    }

    #[test]
    fn test_ron_money_is_decimal_text() {
        let effect = UpgradeEffect::PassiveIncome { per_unit: cents(50) };
        let text = ron::to_string(&effect).unwrap();
        assert!(text.contains("\"0.5\""), "got {text}");
        let back: UpgradeEffect = ron::from_str(&text).unwrap();
        assert_eq!(back, effect);
    }
}
