//! Per-game move history

use serde::{Deserialize, Serialize};
use crate::error::AgentError;
use crate::moves::Move;
use crate::strategy::ContextMode;

/// Context a prediction is conditioned on
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContextKey {
    /// The agent's own move on the previous turn
    Own(Move),
    /// The (own, opponent) moves of the previous turn
    Pair(Move, Move),
}

impl ContextKey {
    fn at(mode: ContextMode, own: Move, opponent: Move) -> Self {
        match mode {
            ContextMode::OwnMove => ContextKey::Own(own),
            ContextMode::OwnAndOpponent => ContextKey::Pair(own, opponent),
        }
    }
}

/// Own and opponent moves of one game, turn by turn
///
/// Owned by exactly one agent. Between the opponent's move being recorded
/// and the agent's own move being recorded both sequences have equal length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryTracker {
    own: Vec<Move>,
    opponent: Vec<Move>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tracker from already-played turns
    pub fn from_moves(own: Vec<Move>, opponent: Vec<Move>) -> Self {
        Self { own, opponent }
    }

    /// Record the opponent's move of the previous turn (every turn after turn 0)
    pub fn record_opponent_move(&mut self, m: Move) {
        self.opponent.push(m);
    }

    /// Record the move this agent just played
    pub fn record_own_move(&mut self, m: Move) {
        self.own.push(m);
    }

    /// Number of completed turns (both moves known)
    pub fn len(&self) -> usize {
        self.own.len().min(self.opponent.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn own(&self) -> &[Move] {
        &self.own
    }

    pub fn opponent(&self) -> &[Move] {
        &self.opponent
    }

    /// Fails unless both sequences have the same length
    pub fn check_sync(&self) -> Result<(), AgentError> {
        if self.own.len() == self.opponent.len() {
            Ok(())
        } else {
            Err(AgentError::TrackingDesync {
                own: self.own.len(),
                opponent: self.opponent.len(),
            })
        }
    }

    /// Drop the unmatched tail of the longer sequence
    pub fn resync(&mut self) {
        let n = self.len();
        self.own.truncate(n);
        self.opponent.truncate(n);
    }

    pub fn clear(&mut self) {
        self.own.clear();
        self.opponent.clear();
    }

    /// Context key of the most recent completed turn
    pub fn current_context(&self, mode: ContextMode) -> Option<ContextKey> {
        let n = self.len();
        if n == 0 {
            return None;
        }
        Some(ContextKey::at(mode, self.own[n - 1], self.opponent[n - 1]))
    }

    /// Reaction window: (context at turn t, opponent move at turn t+1)
    ///
    /// Limited to the most recent `memory` reactions when set.
    pub fn reactions(
        &self,
        mode: ContextMode,
        memory: Option<usize>,
    ) -> impl Iterator<Item = (ContextKey, Move)> + '_ {
        let n = self.len();
        let total = n.saturating_sub(1);
        let skip = memory.map_or(0, |w| total.saturating_sub(w));
        (skip..total).map(move |t| {
            (ContextKey::at(mode, self.own[t], self.opponent[t]), self.opponent[t + 1])
        })
    }
}
