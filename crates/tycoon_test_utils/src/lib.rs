//! # Tycoon Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixture states at common points of progression
//! - Invariant checks for the progression state machine
//! - Determinism harness for action streams
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod invariants;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
