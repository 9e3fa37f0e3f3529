//! Interactive loop that keeps the game clock running between inputs.
//!
//! Input arrives on a channel; while none is pending the loop sleeps until
//! the session's next deadline (tick boundary or research completion) and
//! ticks, so passive income and research advance while the player is idle.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tycoon_core::prelude::Clock;

use crate::console::{Console, ConsoleLine};

/// Outcome of one loop step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep going. The lines are new output, empty if nothing happened.
    Continue(Vec<ConsoleLine>),
    /// The player quit or input closed.
    Quit,
}

/// How long to wait for input before the next tick is due.
#[must_use]
pub fn idle_wait<C: Clock>(console: &Console<C>) -> Duration {
    let session = console.session();
    Duration::from_millis(session.next_deadline_ms(session.now()).max(1))
}

/// Handle one receive result: a typed line, an idle timeout or closed input.
pub fn step<C: Clock>(
    console: &mut Console<C>,
    received: Result<String, RecvTimeoutError>,
) -> Step {
    match received {
        Ok(line) => {
            let trimmed = line.trim();
            if trimmed == "exit" || trimmed == "quit" {
                return Step::Quit;
            }
            let mut lines = console.tick();
            lines.extend(console.execute(trimmed));
            Step::Continue(lines)
        }
        Err(RecvTimeoutError::Timeout) => Step::Continue(console.tick()),
        Err(RecvTimeoutError::Disconnected) => Step::Quit,
    }
}

/// Run until the player quits or `input` closes, handing output to `emit`
/// together with the console and whether a typed line produced it.
///
/// `emit` is called after every typed line even when it printed nothing, so
/// the host can redraw its prompt.
pub fn run<C: Clock>(
    console: &mut Console<C>,
    input: &Receiver<String>,
    mut emit: impl FnMut(&Console<C>, &[ConsoleLine], bool),
) {
    loop {
        let received = input.recv_timeout(idle_wait(console));
        let typed = received.is_ok();
        match step(console, received) {
            Step::Continue(lines) => {
                if typed || !lines.is_empty() {
                    emit(console, &lines, typed);
                }
            }
            Step::Quit => break,
        }
    }
}

/// Read stdin on its own thread, one line per message.
#[must_use]
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read input: {e}");
                    break;
                }
            }
        }
    });
    receiver
}
