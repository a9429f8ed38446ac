//! Rock-Paper-Scissors Strategy Engine
//!
//! Adaptive agents for a turn-based Rock-Paper-Scissors harness.
//! This crate is compiled to:
//! - Native (for the local arena host)
//! - WASM (for a JavaScript harness)

mod error;
mod moves;
mod random;
mod history;
mod predictor;
mod strategy;
mod agent;
mod game;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::AgentError;
pub use moves::{beats, complement, loses_to, Move, ResultTag};
pub use random::SeededRng;
pub use history::{ContextKey, HistoryTracker};
pub use predictor::{predict, Prediction, ResponseTable};
pub use strategy::{describe_strategy, preset, ContextMode, Strategy, StrategyBase, StrategyParams, PRESETS};
pub use agent::{Agent, Configuration, GameLog, Observation, StrategyLabel};
pub use game::{run_match, MatchResult, MatchSummary, RoundResult};

/// Per-round rewards for a pair of simultaneous moves
/// Returns (reward_a, reward_b)
pub fn reward(a: Move, b: Move) -> (i8, i8) {
    if a == b {
        (0, 0)
    } else if a == beats(b) {
        (1, -1)
    } else {
        (-1, 1)
    }
}
