//! Interactive command console.
//!
//! The console owns a [`Session`], turns typed lines into engine actions and
//! renders every outcome, including each kind of rejection, as output lines.

use std::fmt;

use tycoon_core::catalog::{Era, Feature, View};
use tycoon_core::error::Rejection;
use tycoon_core::math::{dollars, format_money, MS_PER_SECOND};
use tycoon_core::prelude::{Action, Clock, GameState, Session};

use crate::command::{Command, CommandError};
use crate::report::{goal_lines, project_lines, status_lines, upgrade_lines, StatsReport};

/// Banner shown on start and after `clear`.
pub const BANNER: &str = "TERMINAL v1.1 - Awaiting commands...";

/// Output message level for console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug command output.
    Debug,
}

impl OutputLevel {
    /// ANSI colour escape for terminals with colour output enabled.
    #[must_use]
    pub const fn ansi_code(self) -> &'static str {
        match self {
            Self::Info => "\x1b[37m",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
            Self::Debug => "\x1b[36m",
        }
    }
}

/// One line of console output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Severity.
    pub level: OutputLevel,
    /// Text.
    pub text: String,
}

impl ConsoleLine {
    fn new(level: OutputLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Render with ANSI colour codes.
    #[must_use]
    pub fn colored(&self) -> String {
        format!("{}{}\x1b[0m", self.level.ansi_code(), self.text)
    }
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Command console over a game session.
#[derive(Debug)]
pub struct Console<C: Clock> {
    session: Session<C>,
    /// Output since the last clear.
    output: Vec<ConsoleLine>,
    /// Lines entered, oldest first.
    history: Vec<String>,
    pending_transition: Option<Era>,
}

impl<C: Clock> Console<C> {
    /// Wrap a session.
    #[must_use]
    pub fn new(session: Session<C>) -> Self {
        Self {
            session,
            output: vec![ConsoleLine::new(OutputLevel::Info, BANNER)],
            history: Vec::new(),
            pending_transition: None,
        }
    }

    /// The underlying session.
    #[must_use]
    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Mutable access to the underlying session.
    pub fn session_mut(&mut self) -> &mut Session<C> {
        &mut self.session
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        self.session.state()
    }

    /// Output since the last clear.
    #[must_use]
    pub fn output(&self) -> &[ConsoleLine] {
        &self.output
    }

    /// Lines entered so far.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Advance the session clock's tick and report completed research.
    pub fn tick(&mut self) -> Vec<ConsoleLine> {
        let report = self.session.tick();
        let mut lines = Vec::new();
        if let Some(id) = report.completed {
            let name = self
                .state()
                .research(&id)
                .map_or_else(|| id.clone(), |r| r.def.name.clone());
            lines.push(success(format!("{name} research completed")));
        }
        self.output.extend(lines.iter().cloned());
        lines
    }

    /// Execute one typed line and return the lines it produced.
    ///
    /// A line holding several commands separated by `;` counts as a paste
    /// and only runs once clipboard support is researched.
    pub fn execute(&mut self, input: &str) -> Vec<ConsoleLine> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        self.history.push(trimmed.to_string());

        let mut lines = vec![ConsoleLine::new(OutputLevel::Info, format!("> {trimmed}"))];
        if trimmed.contains(';') {
            if self.state().has_feature(Feature::Clipboard) {
                for part in trimmed.split(';').filter(|p| !p.trim().is_empty()) {
                    lines.extend(self.run_line(part.trim()));
                }
            } else {
                lines.push(error("Clipboard disabled - research \"clipboard-api\""));
            }
        } else {
            lines.extend(self.run_line(trimmed));
        }

        if lines.iter().any(|l| l.text == BANNER) {
            self.output.clear();
            lines.retain(|l| l.text == BANNER);
        }
        self.output.extend(lines.iter().cloned());
        lines
    }

    fn run_line(&mut self, line: &str) -> Vec<ConsoleLine> {
        let word = line.to_lowercase();
        if self.state().accepts_assembly_command(&word) {
            return self.run(Command::Assemble(word));
        }
        let name = word.split_whitespace().next().unwrap_or_default();
        let debug = Command::is_debug_word(name);
        if debug && !self.session.config().debug_commands {
            return vec![unknown_command()];
        }
        match Command::parse(line) {
            Ok(command) => self.run(command),
            Err(CommandError::Unknown(_) | CommandError::Empty) => vec![unknown_command()],
            Err(CommandError::MissingArgument { command, usage }) => {
                if debug {
                    return vec![debug_line(format!("Usage: {usage}"))];
                }
                let what = match command {
                    "buy" => "Specify upgrade to buy",
                    "research" => "Specify research project",
                    _ => "Missing argument",
                };
                vec![error(format!("{what}. Usage: {usage}"))]
            }
            Err(CommandError::InvalidAmount(_)) if debug => vec![debug_line("Invalid amount")],
            Err(err) => vec![error(capitalize(&err.to_string()))],
        }
    }

    fn run(&mut self, command: Command) -> Vec<ConsoleLine> {
        if !matches!(command, Command::ConfirmTransition) {
            self.pending_transition = None;
        }
        match command {
            Command::Help => self.help(),
            Command::Assemble(_) => self.assemble(),
            Command::Press => self.press(),
            Command::Buy { upgrade_id, amount } => self.buy(&upgrade_id, amount),
            Command::Research(id) => self.research(&id),
            Command::Status => info_lines(status_lines(self.state(), self.session.now())),
            Command::Stats { json } => self.stats(json),
            Command::Tab(view) => match self.session.try_apply(Action::SwitchView(view)) {
                Ok(_) => vec![success(format!("Switched to {view}"))],
                Err(reason) => vec![self.rejection(&reason)],
            },
            Command::Goals => info_lines(goal_lines(self.state())),
            Command::Upgrades => info_lines(upgrade_lines(self.state())),
            Command::Projects => info_lines(project_lines(self.state(), self.session.now())),
            Command::Transition(era) => self.transition(era),
            Command::ConfirmTransition => self.confirm_transition(),
            Command::Undo => {
                if self.session.undo() {
                    vec![debug_line("Undid last command")]
                } else {
                    vec![debug_line("Nothing to undo")]
                }
            }
            Command::Clear => vec![ConsoleLine::new(OutputLevel::Info, BANNER)],
            Command::Reset => {
                self.session.apply(Action::Reset);
                vec![ConsoleLine::new(OutputLevel::Info, BANNER)]
            }
            Command::AddMoney(amount) => {
                self.session.apply(Action::AddMoney {
                    amount: dollars(amount),
                });
                vec![debug_line(format!("Added ${amount} to your money"))]
            }
        }
    }

    fn help(&mut self) -> Vec<ConsoleLine> {
        self.session.apply(Action::MarkHelpUsed);
        let state = self.state();
        let mut commands = vec![state.assembly_command.clone()];
        if state.stage != Era::Terminal {
            commands = vec!["press".to_string()];
        }
        commands.extend(
            [
                "buy [upgrade] [amount]",
                "research [project]",
                "status",
                "goals",
                "upgrades",
                "projects",
                "tab [view]",
                "help",
                "clear",
            ]
            .map(String::from),
        );
        if !state.has_view(View::Stats) {
            commands.push("stats".to_string());
        }
        if state.transition_unlocked {
            if let Some(next) = state.stage.next() {
                commands.push(format!("transition {next}"));
            }
        }
        vec![ConsoleLine::new(
            OutputLevel::Info,
            format!("Available commands: {}", commands.join(", ")),
        )]
    }

    fn assemble(&mut self) -> Vec<ConsoleLine> {
        if self.state().stage != Era::Terminal {
            return vec![error("Nothing to assemble here. Try: press")];
        }
        self.session.apply(Action::ManualAction);
        let state = self.state();
        let mut lines = vec![success(format!(
            "Assembled component (+${})",
            format_money(state.assembly_value)
        ))];
        if state.has_feature(Feature::AsciiSchematics) {
            lines.extend(info_lines(
                ["  [CPU]--[RAM]", "    |      |", "  [I/O]--[BUS]"].map(String::from),
            ));
        }
        lines
    }

    fn press(&mut self) -> Vec<ConsoleLine> {
        if self.state().stage == Era::Terminal {
            return vec![error(format!(
                "No button yet. Type \"{}\" to assemble",
                self.state().assembly_command
            ))];
        }
        self.session.apply(Action::ManualAction);
        vec![success(format!(
            "Button pressed (+${})",
            format_money(self.state().button_value)
        ))]
    }

    fn buy(&mut self, upgrade_id: &str, amount: u32) -> Vec<ConsoleLine> {
        let quote = match self.state().quote_purchase(upgrade_id, amount) {
            Ok(quote) => quote,
            Err(reason) => return vec![self.rejection(&reason)],
        };
        let action = Action::Purchase {
            upgrade_id: upgrade_id.to_string(),
            amount,
        };
        match self.session.try_apply(action) {
            Ok(state) => {
                let name = state
                    .upgrade(upgrade_id)
                    .map_or(upgrade_id, |u| u.def.name.as_str());
                vec![success(format!(
                    "Purchased {amount}x {name} for ${}",
                    format_money(quote.cost)
                ))]
            }
            Err(reason) => vec![self.rejection(&reason)],
        }
    }

    fn research(&mut self, research_id: &str) -> Vec<ConsoleLine> {
        let action = Action::StartResearch {
            research_id: research_id.to_string(),
        };
        match self.session.try_apply(action) {
            Ok(state) => {
                let name = state
                    .research(research_id)
                    .map_or(research_id, |r| r.def.name.as_str());
                let seconds = state
                    .current_research
                    .as_ref()
                    .map_or(0, |active| (active.duration_ms + MS_PER_SECOND / 2) / MS_PER_SECOND);
                vec![success(format!(
                    "Started {name} research ({seconds} seconds)"
                ))]
            }
            Err(reason) => vec![self.rejection(&reason)],
        }
    }

    fn stats(&mut self, json: bool) -> Vec<ConsoleLine> {
        let report = StatsReport::from_state(self.state(), self.session.now());
        let mut lines = if json {
            match report.to_json() {
                Ok(text) => info_lines(text.lines().map(String::from)),
                Err(e) => vec![error(format!("Failed to render stats: {e}"))],
            }
        } else {
            info_lines(report.to_lines())
        };
        if !self.state().has_view(View::Stats) {
            self.session.apply(Action::UnlockView(View::Stats));
            lines.push(success("Stats tab unlocked"));
        }
        self.session.apply(Action::SwitchView(View::Stats));
        lines
    }

    fn transition(&mut self, era: Era) -> Vec<ConsoleLine> {
        let state = self.state();
        if state.can_transition_to(era) {
            self.pending_transition = Some(era);
            return vec![ConsoleLine::new(
                OutputLevel::Warning,
                "WARNING: Transitioning will reset all progress. Type \"confirm-transition\" to proceed",
            )];
        }
        let reason = Rejection::TransitionLocked {
            from: state.stage,
            to: era,
        };
        vec![self.rejection(&reason)]
    }

    fn confirm_transition(&mut self) -> Vec<ConsoleLine> {
        let Some(era) = self.pending_transition.take() else {
            return vec![error("No transition pending. Try: transition [era]")];
        };
        match self.session.try_apply(Action::TransitionEra(era)) {
            Ok(_) => vec![success(format!("Transitioning to {era} era..."))],
            Err(reason) => vec![self.rejection(&reason)],
        }
    }

    /// Render a rejection as a user-facing error line.
    #[must_use]
    pub fn rejection(&self, reason: &Rejection) -> ConsoleLine {
        let state = self.state();
        let text = match reason {
            Rejection::UnknownUpgrade(id) => {
                let available: Vec<&str> = state.available_upgrades().map(|u| u.id()).collect();
                format!("Unknown upgrade \"{id}\". Available: {}", available.join(", "))
            }
            Rejection::UnknownResearch(id) => {
                let available: Vec<&str> = state.available_research().map(|r| r.id()).collect();
                format!("Unknown research \"{id}\". Available: {}", available.join(", "))
            }
            Rejection::UpgradeLocked(id) => format!("Upgrade \"{id}\" not unlocked yet"),
            Rejection::ResearchLocked(id) => format!("Research \"{id}\" not unlocked yet"),
            Rejection::AlreadyCompleted(id) => format!("Research \"{id}\" already completed"),
            Rejection::InsufficientFunds { shortfall, .. } => {
                format!("Insufficient funds. Need ${} more", format_money(*shortfall))
            }
            Rejection::ResearchInProgress(_) => {
                "Already researching. Wait for current research to complete".to_string()
            }
            Rejection::MissingDependencies(missing) => {
                format!("Missing dependencies: {}", missing.join(", "))
            }
            Rejection::WrongEra { id, era } => format!("\"{id}\" belongs to the {era} era"),
            Rejection::InvalidAmount => "Amount must be at least 1".to_string(),
            Rejection::ViewLocked(view) => format!("View \"{view}\" not unlocked yet"),
            Rejection::TransitionLocked { from, to } if from.next() == Some(*to) => {
                match state.research.iter().find(|r| r.def.era == *from && r.def.is_era_gate()) {
                    Some(gate) => format!("Must complete \"{}\" research first", gate.def.name),
                    None => format!("The {from} era is the last one"),
                }
            }
            Rejection::TransitionLocked { from, .. } => match from.next() {
                Some(next) => format!("Unknown transition. Try: transition {next}"),
                None => format!("The {from} era is the last one"),
            },
            Rejection::NotInFlight(id) => format!("Research \"{id}\" is not in progress"),
        };
        error(text)
    }
}

fn success(text: impl Into<String>) -> ConsoleLine {
    ConsoleLine::new(OutputLevel::Success, format!("SUCCESS: {}", text.into()))
}

fn debug_line(text: impl Into<String>) -> ConsoleLine {
    ConsoleLine::new(OutputLevel::Debug, format!("DEBUG: {}", text.into()))
}

fn error(text: impl Into<String>) -> ConsoleLine {
    ConsoleLine::new(OutputLevel::Error, format!("ERROR: {}", text.into()))
}

fn unknown_command() -> ConsoleLine {
    error("Unknown command. Type \"help\" for available commands")
}

fn info_lines(lines: impl IntoIterator<Item = String>) -> Vec<ConsoleLine> {
    lines
        .into_iter()
        .map(|text| ConsoleLine::new(OutputLevel::Info, text))
        .collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
