//! Moves and the cyclic dominance relation

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::AgentError;

/// A move in Rock-Paper-Scissors
///
/// The discriminant is the value exchanged with the harness (0, 1, 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Move {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Move {
    /// All moves in index order
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        Self::ALL[index % 3]
    }
}

impl TryFrom<u8> for Move {
    type Error = AgentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Rock),
            1 => Ok(Move::Paper),
            2 => Ok(Move::Scissors),
            _ => Err(AgentError::InvalidMove { value }),
        }
    }
}

impl From<Move> for u8 {
    fn from(m: Move) -> u8 {
        m as u8
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => write!(f, "rock"),
            Move::Paper => write!(f, "paper"),
            Move::Scissors => write!(f, "scissors"),
        }
    }
}

/// The move that defeats `m`
pub fn beats(m: Move) -> Move {
    Move::from_index(m.index() + 1)
}

/// The move that `m` defeats
pub fn loses_to(m: Move) -> Move {
    Move::from_index(m.index() + 2)
}

/// Desired result of a complementary move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTag {
    Win,
    Lose,
}

impl FromStr for ResultTag {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(ResultTag::Win),
            "lose" => Ok(ResultTag::Lose),
            other => Err(AgentError::InvalidResultTag { tag: other.to_string() }),
        }
    }
}

/// The move that would win or lose against `m`
pub fn complement(m: Move, result: ResultTag) -> Move {
    match result {
        ResultTag::Win => beats(m),
        ResultTag::Lose => loses_to(m),
    }
}
