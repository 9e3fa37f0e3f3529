//! Goal definitions.
//!
//! Goals carry no logic. Each [`GoalId`] maps to a fixed predicate evaluated
//! centrally by [`crate::goals`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Era;

/// Identifies a goal and, through it, the predicate that drives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalId {
    /// Ask the terminal for help.
    FirstHelp,
    /// Perform one manual assembly.
    FirstAssembly,
    /// Own an intern.
    HireIntern,
    /// Complete a research project.
    FirstResearch,
    /// Complete the GUI era gate.
    GuiTransition,
    /// Press the GUI button once.
    FirstClick,
    /// Own any GUI-era upgrade.
    GuiUpgrade,
    /// Complete any GUI-era research.
    Automation,
}

impl GoalId {
    /// Kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GoalId::FirstHelp => "first-help",
            GoalId::FirstAssembly => "first-assembly",
            GoalId::HireIntern => "hire-intern",
            GoalId::FirstResearch => "first-research",
            GoalId::GuiTransition => "gui-transition",
            GoalId::FirstClick => "first-click",
            GoalId::GuiUpgrade => "gui-upgrade",
            GoalId::Automation => "automation",
        }
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Goal definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalDef {
    /// Predicate selector.
    pub id: GoalId,
    /// Short title.
    pub title: String,
    /// Hint shown to the player.
    #[serde(default)]
    pub description: String,
    /// Era this goal belongs to.
    pub era: Era,
    /// Whether the goal is shown before its prerequisites are met.
    #[serde(default)]
    pub starts_visible: bool,
}

impl GoalDef {
    /// Create a goal definition.
    #[must_use]
    pub fn new(
        id: GoalId,
        title: impl Into<String>,
        description: impl Into<String>,
        era: Era,
        starts_visible: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            era,
            starts_visible,
        }
    }
}
