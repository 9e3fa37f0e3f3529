//! Research project definitions.

use serde::{Deserialize, Serialize};

use super::{Era, Feature, View};

/// Catalog spelling of the dependency "at least one intern owned".
pub const INTERN_DEPENDENCY: &str = "intern";

/// A prerequisite for unlocking or starting research.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dependency {
    /// Another research project must be completed.
    Research(String),
    /// At least one unit of an upgrade must be owned.
    Owns(String),
}

impl Dependency {
    /// Interpret a dependency written as a bare id.
    ///
    /// `"intern"` means owning at least one intern; anything else names a
    /// research project.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        if id == INTERN_DEPENDENCY {
            Self::Owns(id.to_string())
        } else {
            Self::Research(id.to_string())
        }
    }

    /// The id this dependency refers to.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Research(id) | Self::Owns(id) => id,
        }
    }
}

/// The single permanent state change applied when research completes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResearchEffect {
    /// No direct effect; the project only gates other content.
    #[default]
    None,
    /// Adds a shorter alias for the manual assembly command.
    AssemblyAlias(String),
    /// Enables a feature flag.
    Feature(Feature),
    /// Makes a view accessible.
    OpenView(View),
    /// Allows transition to the next era.
    EraGate,
}

/// Data-driven research definition.
///
/// # Example RON
///
/// ```ron
/// ResearchDef(
///     id: "basic-macro",
///     name: "Basic Macro",
///     time_required: 30,
///     dependencies: [Owns("intern")],
///     era: Terminal,
///     effect: AssemblyAlias("asmb"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResearchDef {
    /// Unique string identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Flavor text.
    #[serde(default)]
    pub description: String,

    /// Base research time in seconds, before speed bonuses.
    pub time_required: u32,

    /// Prerequisites; all must hold.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Whether the project is available as soon as its era begins.
    #[serde(default)]
    pub starts_unlocked: bool,

    /// Era this project belongs to.
    pub era: Era,

    /// Effect applied on completion.
    #[serde(default)]
    pub effect: ResearchEffect,
}

impl ResearchDef {
    /// Create a research definition. Dependencies use the bare-id spelling
    /// understood by [`Dependency::parse`].
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        time_required: u32,
        dependencies: &[&str],
        era: Era,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            time_required,
            dependencies: dependencies.iter().map(|d| Dependency::parse(d)).collect(),
            starts_unlocked: false,
            era,
            effect: ResearchEffect::None,
        }
    }

    /// Set the flavor text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the completion effect.
    #[must_use]
    pub fn with_effect(mut self, effect: ResearchEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Mark the project as available from the start of its era.
    #[must_use]
    pub fn unlocked_at_start(mut self) -> Self {
        self.starts_unlocked = true;
        self
    }

    /// Check if this project has a specific prerequisite id.
    #[must_use]
    pub fn requires(&self, id: &str) -> bool {
        self.dependencies.iter().any(|d| d.id() == id)
    }

    /// Whether completing this project opens the next era.
    #[must_use]
    pub fn is_era_gate(&self) -> bool {
        self.effect == ResearchEffect::EraGate
    }
}
