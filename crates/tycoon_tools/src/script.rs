//! Scripted play against a manual clock.
//!
//! A script is a list of console lines. Blank lines and lines starting with
//! `#` are skipped, and `wait <seconds>` advances the clock one tick
//! interval at a time so passive income and research complete exactly as
//! they would in real time.

use tycoon_core::math::MS_PER_SECOND;
use tycoon_core::prelude::ManualClock;

use crate::command::CommandError;
use crate::console::{Console, ConsoleLine};

/// Parse a `wait` directive. `Ok(None)` means the line is not one.
///
/// # Errors
///
/// Returns [`CommandError`] for a `wait` without a valid number of seconds.
pub fn parse_wait(line: &str) -> Result<Option<u64>, CommandError> {
    let mut words = line.split_whitespace();
    if words.next() != Some("wait") {
        return Ok(None);
    }
    let text = words.next().ok_or(CommandError::MissingArgument {
        command: "wait",
        usage: "wait [seconds]",
    })?;
    text.parse::<u64>()
        .map(Some)
        .map_err(|_| CommandError::InvalidAmount(text.to_string()))
}

/// Advance the console's clock by `ms`, ticking at every interval boundary.
pub fn wait(console: &mut Console<ManualClock>, ms: u64) -> Vec<ConsoleLine> {
    let interval = console.session().config().tick_interval_ms.max(1);
    let mut lines = Vec::new();
    let mut left = ms;
    while left > 0 {
        let step = left.min(interval);
        console.session_mut().clock_mut().advance(step);
        lines.extend(console.tick());
        left -= step;
    }
    lines
}

/// Run a whole script, returning every line of output.
pub fn run_script(console: &mut Console<ManualClock>, text: &str) -> Vec<ConsoleLine> {
    let mut output = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_wait(line) {
            Ok(Some(seconds)) => {
                tracing::debug!(seconds, "Script wait");
                output.extend(wait(console, seconds.saturating_mul(MS_PER_SECOND)));
            }
            Ok(None) => {
                output.extend(console.tick());
                output.extend(console.execute(line));
            }
            Err(err) => {
                tracing::warn!(line, error = %err, "Bad wait directive");
                output.extend(console.execute(line));
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wait() {
        assert_eq!(parse_wait("wait 30"), Ok(Some(30)));
        assert_eq!(parse_wait("assemble"), Ok(None));
        assert!(parse_wait("wait").is_err());
        assert!(parse_wait("wait soon").is_err());
    }
}
