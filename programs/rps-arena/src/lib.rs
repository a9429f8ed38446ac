//! RPS Arena - local host for Rock-Paper-Scissors agents
//!
//! Plays matches between rps-engine strategies the way the game harness
//! would, so presets and tuned parameter files can be compared offline.

pub mod commands;
mod players;

pub use players::{parse_seed, random_seed, resolve_strategy, seed_to_hex};
