//! Reactive predictor
//!
//! Estimates the opponent's next move from how it responded to the same
//! context earlier in the game, and answers with the move that beats it.

use std::collections::BTreeMap;
use log::trace;
use crate::error::AgentError;
use crate::history::{ContextKey, HistoryTracker};
use crate::moves::{beats, Move};
use crate::strategy::{ContextMode, StrategyParams};

/// Outcome of a prediction
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prediction {
    /// The modal response cleared the threshold
    Confident {
        /// Opponent move we expect
        predicted: Move,
        /// Move that beats `predicted`
        counter: Move,
        /// count(mode) / observations
        share: f64,
    },
    /// No data for this context, or the modal share is below the threshold
    NotConfident,
}

impl Prediction {
    pub fn counter(&self) -> Option<Move> {
        match self {
            Prediction::Confident { counter, .. } => Some(*counter),
            Prediction::NotConfident => None,
        }
    }
}

/// Opponent response counts per context key
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseTable {
    counts: BTreeMap<ContextKey, [u32; 3]>,
}

impl ResponseTable {
    /// Count the reaction window of `history`
    pub fn build(history: &HistoryTracker, mode: ContextMode, memory: Option<usize>) -> Self {
        let mut table = Self::default();
        for (key, response) in history.reactions(mode, memory) {
            table.counts.entry(key).or_insert([0; 3])[response.index()] += 1;
        }
        table
    }

    /// Response counts for one context, indexed by move
    pub fn distribution(&self, key: &ContextKey) -> Option<&[u32; 3]> {
        self.counts.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Counter-move for `key` if its modal response share reaches `threshold`
    ///
    /// Ties go to the lowest move index.
    pub fn predict(&self, key: &ContextKey, threshold: f64) -> Prediction {
        let Some(counts) = self.distribution(key) else {
            return Prediction::NotConfident;
        };
        let total: u32 = counts.iter().sum();
        if total == 0 {
            return Prediction::NotConfident;
        }

        let mut mode = Move::Rock;
        for m in Move::ALL {
            if counts[m.index()] > counts[mode.index()] {
                mode = m;
            }
        }

        let share = counts[mode.index()] as f64 / total as f64;
        trace!("responses to {:?}: {:?}, mode {} at {:.2}", key, counts, mode, share);

        if share >= threshold {
            Prediction::Confident { predicted: mode, counter: beats(mode), share }
        } else {
            Prediction::NotConfident
        }
    }
}

/// Predict from the live history with a freshly built table
///
/// Refuses to read a desynchronized history.
pub fn predict(history: &HistoryTracker, params: &StrategyParams) -> Result<Prediction, AgentError> {
    history.check_sync()?;
    let Some(key) = history.current_context(params.context) else {
        return Ok(Prediction::NotConfident);
    };
    let table = ResponseTable::build(history, params.context, params.memory_size);
    Ok(table.predict(&key, params.confidence_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move::{Paper, Rock, Scissors};

    fn params(threshold: f64, memory: Option<usize>, context: ContextMode) -> StrategyParams {
        StrategyParams {
            confidence_threshold: threshold,
            memory_size: memory,
            context,
            ..Default::default()
        }
    }

    #[test]
    fn test_pure_response_is_countered() {
        // opponent always answered Rock with Paper
        let h = HistoryTracker::from_moves(vec![Rock; 4], vec![Paper; 4]);
        let p = predict(&h, &params(0.75, None, ContextMode::OwnMove)).unwrap();
        assert_eq!(
            p,
            Prediction::Confident { predicted: Paper, counter: Scissors, share: 1.0 }
        );
        let table = ResponseTable::build(&h, ContextMode::OwnMove, None);
        assert_eq!(table.distribution(&ContextKey::Own(Rock)), Some(&[0, 3, 0]));
    }

    #[test]
    fn test_unreachable_threshold_is_never_confident() {
        let h = HistoryTracker::from_moves(vec![Rock; 4], vec![Paper; 4]);
        let p = predict(&h, &params(1.1, None, ContextMode::OwnMove)).unwrap();
        assert_eq!(p, Prediction::NotConfident);
    }

    #[test]
    fn test_unseen_context_is_not_confident() {
        // last own move is Scissors, which never appeared earlier
        let h = HistoryTracker::from_moves(vec![Rock, Rock, Scissors], vec![Paper, Paper, Paper]);
        let p = predict(&h, &params(0.0, None, ContextMode::OwnMove)).unwrap();
        assert_eq!(p, Prediction::NotConfident);
    }

    #[test]
    fn test_empty_history_is_not_confident() {
        let p = predict(&HistoryTracker::new(), &params(0.0, None, ContextMode::OwnMove)).unwrap();
        assert_eq!(p, Prediction::NotConfident);
        assert!(ResponseTable::default().is_empty());
    }

    #[test]
    fn test_share_below_threshold() {
        // responses to Rock: Paper, Paper, Scissors -> share 2/3
        let h = HistoryTracker::from_moves(
            vec![Rock, Rock, Rock, Rock],
            vec![Rock, Paper, Paper, Scissors],
        );
        assert_eq!(
            predict(&h, &params(0.75, None, ContextMode::OwnMove)).unwrap(),
            Prediction::NotConfident
        );
        let p = predict(&h, &params(0.6, None, ContextMode::OwnMove)).unwrap();
        assert_eq!(p.counter(), Some(Scissors));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        // responses to Rock: Scissors, Paper -> tie, Paper wins
        let h = HistoryTracker::from_moves(vec![Rock, Rock, Rock], vec![Rock, Scissors, Paper]);
        let p = predict(&h, &params(0.5, None, ContextMode::OwnMove)).unwrap();
        assert_eq!(
            p,
            Prediction::Confident { predicted: Paper, counter: Scissors, share: 0.5 }
        );
    }

    #[test]
    fn test_memory_window_forgets_old_reactions() {
        // early on the opponent answered Rock with Rock, lately with Scissors
        let own = vec![Rock; 8];
        let opponent = vec![Rock, Rock, Rock, Rock, Rock, Scissors, Scissors, Scissors];
        let h = HistoryTracker::from_moves(own, opponent);

        let whole = predict(&h, &params(0.5, None, ContextMode::OwnMove)).unwrap();
        assert_eq!(whole.counter(), Some(Paper));

        let recent = predict(&h, &params(0.5, Some(3), ContextMode::OwnMove)).unwrap();
        assert_eq!(recent.counter(), Some(Rock));
    }

    #[test]
    fn test_pair_context_separates_opponent_moves() {
        // after (Rock, Rock) the opponent plays Paper, after (Rock, Paper) it plays Rock
        let own = vec![Rock; 7];
        let opponent = vec![Rock, Paper, Rock, Paper, Rock, Paper, Rock];
        let h = HistoryTracker::from_moves(own, opponent);

        // current context is (Rock, Rock)
        let pair = predict(&h, &params(0.9, None, ContextMode::OwnAndOpponent)).unwrap();
        assert_eq!(pair.counter(), Some(Scissors));

        // own-move context blends both and stays under the threshold
        let own_only = predict(&h, &params(0.9, None, ContextMode::OwnMove)).unwrap();
        assert_eq!(own_only, Prediction::NotConfident);
    }

    #[test]
    fn test_confident_counter_always_beats_mode() {
        let own = vec![Paper, Scissors, Paper, Scissors, Paper, Scissors, Paper];
        let opponent = vec![Scissors, Rock, Rock, Rock, Rock, Rock, Rock];
        let h = HistoryTracker::from_moves(own, opponent);
        match predict(&h, &params(0.5, None, ContextMode::OwnMove)).unwrap() {
            Prediction::Confident { predicted, counter, .. } => {
                assert_eq!(predicted, Rock);
                assert_eq!(counter, beats(predicted));
                assert_ne!(counter, predicted);
            }
            Prediction::NotConfident => panic!("expected a confident prediction"),
        }
    }

    #[test]
    fn test_desync_is_refused() {
        let h = HistoryTracker::from_moves(vec![Rock, Rock, Rock], vec![Paper, Paper]);
        let err = predict(&h, &params(0.0, None, ContextMode::OwnMove)).unwrap_err();
        assert_eq!(err, AgentError::TrackingDesync { own: 3, opponent: 2 });
    }
}
