//! Static content definitions.
//!
//! The catalog holds the fixed definitions of upgrades, research projects
//! and goals, each tagged with the era it belongs to. It is read-only at
//! runtime: the engine copies definitions into the game state and only ever
//! mutates those copies.
//!
//! Behavior is expressed as tagged data ([`UpgradeEffect`], [`UnlockRule`],
//! [`Dependency`], [`ResearchEffect`], [`GoalId`]) rather than closures, so a
//! catalog can be authored in RON, validated, and serialized.

mod builtin;
mod goal_data;
mod research_data;
mod upgrade_data;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

pub use goal_data::{GoalDef, GoalId};
pub use research_data::{Dependency, ResearchDef, ResearchEffect, INTERN_DEPENDENCY};
pub use upgrade_data::{UnlockRule, UpgradeDef, UpgradeEffect};

/// A distinct phase of the game with its own content subset.
///
/// Eras are ordered and advance one way only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Era {
    /// Command-line beginnings.
    #[default]
    Terminal,
    /// Windows, icons, menus and pointers.
    Gui,
    /// Networked era. Currently the final era.
    Internet,
}

impl Era {
    /// All eras in progression order.
    pub const ALL: [Era; 3] = [Era::Terminal, Era::Gui, Era::Internet];

    /// The era that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Era> {
        match self {
            Era::Terminal => Some(Era::Gui),
            Era::Gui => Some(Era::Internet),
            Era::Internet => None,
        }
    }

    /// Lowercase identifier used by commands.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Era::Terminal => "terminal",
            Era::Gui => "gui",
            Era::Internet => "internet",
        }
    }

    /// Parse a lowercase era identifier.
    #[must_use]
    pub fn parse(name: &str) -> Option<Era> {
        Self::ALL.into_iter().find(|era| era.as_str() == name)
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A UI section the view layer can show.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum View {
    /// Guided-tour objectives.
    #[default]
    Goals,
    /// Upgrade shop.
    Upgrades,
    /// Research projects.
    Research,
    /// Statistics dashboard.
    Stats,
}

impl View {
    /// All views in display order.
    pub const ALL: [View; 4] = [View::Goals, View::Upgrades, View::Research, View::Stats];

    /// Lowercase identifier used by commands.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            View::Goals => "goals",
            View::Upgrades => "upgrades",
            View::Research => "research",
            View::Stats => "stats",
        }
    }

    /// Parse a lowercase view identifier.
    #[must_use]
    pub fn parse(name: &str) -> Option<View> {
        Self::ALL.into_iter().find(|view| view.as_str() == name)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permanent feature flags granted by research or upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Pasting into the terminal.
    Clipboard,
    /// ASCII diagrams at the assembly station.
    AsciiSchematics,
    /// Colour-coded terminal output.
    ColorOutput,
    /// Multiple windows in the GUI era.
    WindowManagement,
}

/// The complete set of content definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Upgrade definitions in display order.
    pub upgrades: Vec<UpgradeDef>,
    /// Research definitions in display order.
    pub research: Vec<ResearchDef>,
    /// Goal definitions in display order.
    pub goals: Vec<GoalDef>,
}

impl Catalog {
    /// The built-in game content.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            upgrades: builtin::upgrades(),
            research: builtin::research(),
            goals: builtin::goals(),
        }
    }

    /// Upgrades belonging to an era, in catalog order.
    pub fn upgrades_for(&self, era: Era) -> impl Iterator<Item = &UpgradeDef> {
        self.upgrades.iter().filter(move |u| u.era == era)
    }

    /// Research projects belonging to an era, in catalog order.
    pub fn research_for(&self, era: Era) -> impl Iterator<Item = &ResearchDef> {
        self.research.iter().filter(move |r| r.era == era)
    }

    /// Goals belonging to an era, in catalog order.
    pub fn goals_for(&self, era: Era) -> impl Iterator<Item = &GoalDef> {
        self.goals.iter().filter(move |g| g.era == era)
    }

    /// Look up an upgrade definition by id.
    #[must_use]
    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    /// Look up a research definition by id.
    #[must_use]
    pub fn research(&self, id: &str) -> Option<&ResearchDef> {
        self.research.iter().find(|r| r.id == id)
    }

    /// Parse and validate a catalog from RON text.
    ///
    /// `label` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DataParseError`] on malformed RON and
    /// [`GameError::CatalogInvalid`] if validation fails.
    pub fn from_ron_str(text: &str, label: &str) -> Result<Self> {
        let catalog: Self = ron::from_str(text).map_err(|e| GameError::DataParseError {
            path: label.to_string(),
            message: e.to_string(),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a RON catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IoError`] if the file cannot be read, otherwise
    /// whatever [`Catalog::from_ron_str`] returns.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text, &path.display().to_string())
    }

    /// Render the catalog as pretty RON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize catalog: {e}")))
    }

    /// Check that ids are unique and every cross-reference resolves.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CatalogInvalid`] listing every problem found.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let mut upgrade_ids = HashSet::new();
        for upgrade in &self.upgrades {
            if !upgrade_ids.insert(upgrade.id.as_str()) {
                errors.push(format!("duplicate upgrade id '{}'", upgrade.id));
            }
            if upgrade.cost_multiplier < 100 {
                errors.push(format!(
                    "upgrade '{}' has cost multiplier {}% (must be at least 100%)",
                    upgrade.id, upgrade.cost_multiplier
                ));
            }
        }

        let mut research_ids = HashSet::new();
        for research in &self.research {
            if !research_ids.insert(research.id.as_str()) {
                errors.push(format!("duplicate research id '{}'", research.id));
            }
        }

        let mut goal_ids = HashSet::new();
        for goal in &self.goals {
            if !goal_ids.insert(goal.id) {
                errors.push(format!("duplicate goal id '{}'", goal.id));
            }
        }

        for upgrade in &self.upgrades {
            if let Some(target) = upgrade.effect.target() {
                if !upgrade_ids.contains(target) {
                    errors.push(format!(
                        "upgrade '{}' boosts unknown upgrade '{target}'",
                        upgrade.id
                    ));
                }
            }
            match &upgrade.unlock {
                UnlockRule::ResearchCompleted(id) if !research_ids.contains(id.as_str()) => {
                    errors.push(format!(
                        "upgrade '{}' unlocks on unknown research '{id}'",
                        upgrade.id
                    ));
                }
                UnlockRule::OwnedAtLeast { upgrade: id, .. }
                    if !upgrade_ids.contains(id.as_str()) =>
                {
                    errors.push(format!(
                        "upgrade '{}' unlocks on unknown upgrade '{id}'",
                        upgrade.id
                    ));
                }
                _ => {}
            }
        }

        for research in &self.research {
            for dependency in &research.dependencies {
                let known = match dependency {
                    Dependency::Research(id) => research_ids.contains(id.as_str()),
                    Dependency::Owns(id) => upgrade_ids.contains(id.as_str()),
                };
                if !known {
                    errors.push(format!(
                        "research '{}' depends on unknown '{}'",
                        research.id,
                        dependency.id()
                    ));
                }
                if dependency.id() == research.id {
                    errors.push(format!("research '{}' depends on itself", research.id));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GameError::CatalogInvalid { errors })
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
