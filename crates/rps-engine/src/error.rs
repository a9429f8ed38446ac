//! Agent errors
//!
//! None of these ever reach the harness: the agent turns them into a
//! random move for the current turn.

use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentError {
    /// Own and opponent histories disagree in length before a prediction.
    TrackingDesync { own: usize, opponent: usize },
    /// A move value outside 0..=2.
    InvalidMove { value: u8 },
    /// An observation after turn 0 without the opponent's previous move.
    MissingOpponentMove { step: u32 },
    /// A complementary move requested with a tag other than "win"/"lose".
    InvalidResultTag { tag: String },
    /// A strategy parameter out of range.
    InvalidConfig { field: &'static str, reason: String },
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrackingDesync { own, opponent } => write!(
                f,
                "action tracking error: {own} own moves vs {opponent} opponent moves"
            ),
            Self::InvalidMove { value } => write!(f, "invalid move value {value}, expected 0, 1 or 2"),
            Self::MissingOpponentMove { step } => {
                write!(f, "observation for step {step} has no lastOpponentAction")
            }
            Self::InvalidResultTag { tag } => write!(f, "win/lose expected, got {tag:?}"),
            Self::InvalidConfig { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for AgentError {}
