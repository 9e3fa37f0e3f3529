//! Line-based command parsing.
//!
//! Parsing is purely syntactic. Whether a word like `asmb` performs an
//! assembly depends on game state, so the [`crate::console::Console`] checks
//! assembly aliases before falling back to [`Command::parse`].

use thiserror::Error;
use tycoon_core::catalog::{Era, View};

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List available commands.
    Help,
    /// Terminal-era manual assembly, with the word typed.
    Assemble(String),
    /// GUI-era button press.
    Press,
    /// Buy units of an upgrade.
    Buy {
        /// Upgrade id.
        upgrade_id: String,
        /// Units to buy.
        amount: u32,
    },
    /// Start a research project.
    Research(String),
    /// Money, income and research summary.
    Status,
    /// Detailed statistics.
    Stats {
        /// Emit JSON instead of text.
        json: bool,
    },
    /// Switch the current view.
    Tab(View),
    /// List visible goals.
    Goals,
    /// List purchasable upgrades.
    Upgrades,
    /// List research projects.
    Projects,
    /// Ask to move on to an era.
    Transition(Era),
    /// Confirm a pending era transition.
    ConfirmTransition,
    /// Restore the state before the last command.
    Undo,
    /// Clear console output.
    Clear,
    /// Debug: restart the game.
    Reset,
    /// Debug: add money.
    AddMoney(i64),
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Nothing was typed.
    #[error("empty command")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command \"{0}\"")]
    Unknown(String),

    /// A required argument was not given.
    #[error("missing argument. Usage: {usage}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// Usage line.
        usage: &'static str,
    },

    /// An amount was not a valid number.
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    /// No view has this name.
    #[error("unknown view \"{0}\"")]
    UnknownView(String),

    /// No era has this name.
    #[error("unknown era \"{0}\"")]
    UnknownEra(String),
}

impl Command {
    /// Parse one line. Words are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing the first problem found.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let lowered = line.trim().to_lowercase();
        let mut words = lowered.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match name {
            "help" => Self::Help,
            "assemble" => Self::Assemble(name.to_string()),
            "press" | "click" => Self::Press,
            "buy" => {
                let upgrade_id = required(&args, 0, "buy", "buy [upgrade-id] [amount]")?;
                let amount = match args.get(1) {
                    Some(text) => text
                        .parse::<u32>()
                        .map_err(|_| CommandError::InvalidAmount((*text).to_string()))?,
                    None => 1,
                };
                Self::Buy {
                    upgrade_id: upgrade_id.to_string(),
                    amount,
                }
            }
            "research" => {
                let id = required(&args, 0, "research", "research [project-id]")?;
                Self::Research(id.to_string())
            }
            "status" => Self::Status,
            "stats" => Self::Stats {
                json: args.contains(&"--json"),
            },
            "tab" => {
                let name = required(&args, 0, "tab", "tab [goals|upgrades|research|stats]")?;
                let view =
                    View::parse(name).ok_or_else(|| CommandError::UnknownView(name.to_string()))?;
                Self::Tab(view)
            }
            "goals" => Self::Goals,
            "upgrades" => Self::Upgrades,
            "projects" => Self::Projects,
            "transition" => {
                let name = required(&args, 0, "transition", "transition [era]")?;
                let era =
                    Era::parse(name).ok_or_else(|| CommandError::UnknownEra(name.to_string()))?;
                Self::Transition(era)
            }
            "confirm-transition" => Self::ConfirmTransition,
            "undo" => Self::Undo,
            "clear" => Self::Clear,
            "reset" => Self::Reset,
            "addmoney" => {
                let text = required(&args, 0, "addmoney", "addmoney [amount]")?;
                let amount = text
                    .parse::<i64>()
                    .map_err(|_| CommandError::InvalidAmount(text.to_string()))?;
                Self::AddMoney(amount)
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }

    /// Whether a command word names a debug command, hidden unless enabled.
    #[must_use]
    pub fn is_debug_word(word: &str) -> bool {
        matches!(word, "reset" | "addmoney" | "undo")
    }
}

fn required<'a>(
    args: &[&'a str],
    index: usize,
    command: &'static str,
    usage: &'static str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or(CommandError::MissingArgument { command, usage })
}
