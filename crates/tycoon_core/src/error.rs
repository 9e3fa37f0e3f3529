//! Error types for the progression engine.
//!
//! Two families live here. [`GameError`] covers genuine failures at the
//! edges of the engine (malformed catalogs, configuration, snapshot bytes,
//! replay divergence). [`Rejection`] describes why a state transition left the
//! snapshot unchanged; transitions never fail, they only decline.

use thiserror::Error;

use crate::catalog::{Era, View};
use crate::math::{format_money, Money};

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for engine failures outside the state machine.
#[derive(Debug, Error)]
pub enum GameError {
    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or label) of the source that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Catalog definitions are internally inconsistent.
    #[error("Catalog validation failed: {errors:?}")]
    CatalogInvalid {
        /// Every problem found, in catalog order.
        errors: Vec<String>,
    },

    /// Failed to read a file from disk.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        /// Path to the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// A replayed action stream did not reproduce the recorded final state.
    #[error("Replay diverged: expected hash {expected}, got {actual}")]
    ReplayMismatch {
        /// Hash recorded when the replay was finalized.
        expected: u64,
        /// Hash produced by playback.
        actual: u64,
    },
}

/// Why a transition declined to change the snapshot.
///
/// The engine itself is silent about rejections; this type exists so a
/// front-end can explain them. Every variant maps to one user-facing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No upgrade with this id exists.
    #[error("unknown upgrade \"{0}\"")]
    UnknownUpgrade(String),

    /// No research project with this id exists.
    #[error("unknown research \"{0}\"")]
    UnknownResearch(String),

    /// The upgrade exists but has not been unlocked.
    #[error("upgrade \"{0}\" not unlocked yet")]
    UpgradeLocked(String),

    /// The research exists but has not been unlocked.
    #[error("research \"{0}\" not unlocked yet")]
    ResearchLocked(String),

    /// The research has already been completed.
    #[error("research \"{0}\" already completed")]
    AlreadyCompleted(String),

    /// Not enough money for the requested purchase.
    #[error(
        "insufficient funds: need ${} more (cost ${})",
        money_text(.shortfall),
        money_text(.cost)
    )]
    InsufficientFunds {
        /// Total cost of the purchase.
        cost: Money,
        /// How much more money is needed.
        shortfall: Money,
    },

    /// Another research project is already running.
    #[error("already researching \"{0}\"")]
    ResearchInProgress(String),

    /// Some dependencies are not yet satisfied.
    #[error("missing dependencies: {}", .0.join(", "))]
    MissingDependencies(Vec<String>),

    /// The entity belongs to a different era than the current one.
    #[error("\"{id}\" belongs to the {era} era")]
    WrongEra {
        /// Entity id.
        id: String,
        /// Era the entity belongs to.
        era: Era,
    },

    /// Purchase amount must be at least one.
    #[error("amount must be at least 1")]
    InvalidAmount,

    /// The view has not been made accessible.
    #[error("view \"{0}\" is not accessible")]
    ViewLocked(View),

    /// The requested era transition is not available.
    #[error("cannot transition from {from} to {to}")]
    TransitionLocked {
        /// Current era.
        from: Era,
        /// Requested era.
        to: Era,
    },

    /// The research is not the one currently in flight.
    #[error("research \"{0}\" is not in progress")]
    NotInFlight(String),
}

fn money_text(value: &Money) -> String {
    format_money(*value)
}
