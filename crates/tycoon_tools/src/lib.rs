//! # Tycoon Tools
//!
//! Command-line front-end for the progression engine:
//! - Command parser for the line-based console
//! - Console that maps commands to engine actions and renders outcomes
//! - Text and JSON reports
//! - Script runner for scripted play against a manual clock
//! - Interactive loop that ticks while waiting for input

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod command;
pub mod console;
pub mod error;
pub mod report;
pub mod repl;
pub mod script;
