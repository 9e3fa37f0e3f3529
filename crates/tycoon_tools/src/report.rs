//! Text and JSON renderings of the game state.

use serde::Serialize;
use tycoon_core::catalog::Era;
use tycoon_core::math::{format_money, Timestamp, MS_PER_SECOND};
use tycoon_core::research::ResearchStatus;
use tycoon_core::state::GameState;

/// Owned count of one upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedUpgrade {
    /// Upgrade id.
    pub id: String,
    /// Units owned.
    pub owned: u32,
}

/// Statistics shown by the `stats` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    /// Current era.
    pub era: Era,
    /// Money on hand.
    pub money: String,
    /// Lifetime earnings this era.
    pub total_earned: String,
    /// Passive income per second.
    pub passive_income: String,
    /// Value of one manual action.
    pub manual_value: String,
    /// Manual assemblies performed.
    pub assemblies: u64,
    /// Button presses performed.
    pub button_presses: u64,
    /// Research projects completed.
    pub research_completed: u32,
    /// Research speed in percent.
    pub research_speed_percent: u32,
    /// Goals completed this era.
    pub goals_completed: usize,
    /// Whole seconds since the era started.
    pub elapsed_seconds: u64,
    /// Owned counts of every upgrade with at least one unit.
    pub upgrades: Vec<OwnedUpgrade>,
}

impl StatsReport {
    /// Collect statistics at `now`.
    #[must_use]
    pub fn from_state(state: &GameState, now: Timestamp) -> Self {
        Self {
            era: state.stage,
            money: format_money(state.money),
            total_earned: format_money(state.total_earned),
            passive_income: format_money(state.passive_income()),
            manual_value: format_money(state.manual_action_value()),
            assemblies: state.sessions,
            button_presses: state.button_presses,
            research_completed: state.research_completed,
            research_speed_percent: state.research_speed_percent,
            goals_completed: state.completed_goal_count(),
            elapsed_seconds: state.elapsed_ms(now) / MS_PER_SECOND,
            upgrades: state
                .upgrades
                .iter()
                .filter(|u| u.owned > 0)
                .map(|u| OwnedUpgrade {
                    id: u.id().to_string(),
                    owned: u.owned,
                })
                .collect(),
        }
    }

    /// Pretty JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering, one line per statistic.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Era: {}", self.era),
            format!("Money: ${}", self.money),
            format!("Total earned: ${}", self.total_earned),
            format!("Passive income: ${}/s", self.passive_income),
            format!("Per action: ${}", self.manual_value),
            format!("Assemblies: {}", self.assemblies),
            format!("Button presses: {}", self.button_presses),
            format!("Research completed: {}", self.research_completed),
            format!("Research speed: {}%", self.research_speed_percent),
            format!("Goals completed: {}", self.goals_completed),
            format!("Time played: {}s", self.elapsed_seconds),
        ];
        for upgrade in &self.upgrades {
            lines.push(format!("  {} x{}", upgrade.id, upgrade.owned));
        }
        lines
    }
}

/// One-line-per-fact summary used by `status`.
#[must_use]
pub fn status_lines(state: &GameState, now: Timestamp) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Money: ${}  (+${}/s)",
            format_money(state.money),
            format_money(state.passive_income())
        ),
        format!(
            "Era: {}  Per action: ${}",
            state.stage,
            format_money(state.manual_action_value())
        ),
    ];
    match state.research_progress(now) {
        Some(progress) => lines.push(format!(
            "Researching {} ({}%, {}s left)",
            progress.research_id,
            progress.percent,
            progress.remaining_ms.div_ceil(MS_PER_SECOND)
        )),
        None => lines.push("No research in progress".to_string()),
    }
    if state.transition_unlocked {
        if let Some(next) = state.stage.next() {
            lines.push(format!("Ready to transition: type 'transition {next}'"));
        }
    }
    lines
}

/// Visible goals of the current era.
#[must_use]
pub fn goal_lines(state: &GameState) -> Vec<String> {
    state
        .visible_goals()
        .map(|g| {
            let mark = if g.completed { "[x]" } else { "[ ]" };
            format!("{mark} {} - {}", g.def.title, g.def.description)
        })
        .collect()
}

/// Purchasable upgrades with the price of the next unit.
#[must_use]
pub fn upgrade_lines(state: &GameState) -> Vec<String> {
    state
        .available_upgrades()
        .map(|u| {
            let price = state
                .quote_purchase(u.id(), 1)
                .map_or_else(|_| "-".to_string(), |q| format!("${}", format_money(q.cost)));
            format!("{:<20} {:>12}  owned {:<4} {}", u.id(), price, u.owned, u.def.description)
        })
        .collect()
}

/// Research projects of the current era that are unlocked or done.
#[must_use]
pub fn project_lines(state: &GameState, now: Timestamp) -> Vec<String> {
    state
        .research
        .iter()
        .filter(|r| r.def.era == state.stage && r.unlocked)
        .map(|r| {
            let status = match state.research_status(r.id()) {
                Some(ResearchStatus::Completed) => "done".to_string(),
                Some(ResearchStatus::InProgress) => state
                    .research_progress(now)
                    .map_or_else(|| "running".to_string(), |p| format!("{}%", p.percent)),
                _ => format!("{}s", r.def.time_required),
            };
            format!("{:<20} {:>6}  {}", r.id(), status, r.def.description)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tycoon_test_utils::fixtures::{new_game, rich_game, with_interns};

    #[test]
    fn test_stats_report() {
        let state = rich_game(40).purchase_upgrade("coffee-machine", 1);
        let report = StatsReport::from_state(&state, 3_500);
        assert_eq!(report.money, "30.00");
        assert_eq!(report.passive_income, "0.50");
        assert_eq!(report.elapsed_seconds, 3);
        assert_eq!(
            report.upgrades,
            vec![OwnedUpgrade {
                id: "coffee-machine".to_string(),
                owned: 1
            }]
        );
        let json = report.to_json().unwrap();
        assert!(json.contains("\"era\": \"Terminal\""));
    }

    #[test]
    fn test_status_shows_research() {
        let state = with_interns(1).start_research("basic-macro", 0);
        let lines = status_lines(&state, 5_000);
        assert_eq!(lines[2], "Researching basic-macro (25%, 15s left)");
    }

    #[test]
    fn test_goal_lines() {
        let lines = goal_lines(&new_game().evaluate_goals());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[ ] Learn the Interface"));
    }

    #[test]
    fn test_upgrade_and_project_lines() {
        let state = with_interns(1);
        assert!(upgrade_lines(&state).iter().any(|l| l.starts_with("intern ")));
        let projects = project_lines(&state, 0);
        assert!(projects.iter().any(|l| l.starts_with("basic-macro")));
        assert!(!projects.iter().any(|l| l.starts_with("project-gui")));
    }
}
