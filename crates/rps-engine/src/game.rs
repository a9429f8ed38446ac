//! Match execution engine

use log::debug;
use serde::{Deserialize, Serialize};
use crate::agent::{Agent, Observation, StrategyLabel};
use crate::moves::Move;
use crate::random::SeededRng;
use crate::reward;
use crate::strategy::Strategy;

/// Result of a single round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub move_a: Move,
    pub move_b: Move,
    pub label_a: StrategyLabel,
    pub label_b: StrategyLabel,
    pub reward_a: i8,
    pub reward_b: i8,
    pub cumulative_a: i32,
    pub cumulative_b: i32,
}

/// Totals of a match without the round-by-round details
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub round_count: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    pub draws: u32,
    pub total_reward_a: i32,
    pub total_reward_b: i32,
}

/// Result of a complete match
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchResult {
    pub rounds: Vec<RoundResult>,
    pub summary: MatchSummary,
}

/// Run a complete match between two strategies
///
/// Each player is a fresh agent with its own RNG stream and only ever sees
/// the turn index and the other player's previous move.
///
/// # Arguments
/// * `strategy_a` - First player's strategy
/// * `strategy_b` - Second player's strategy
/// * `seed` - Match randomness seed
/// * `round_count` - Number of turns to play
pub fn run_match(
    strategy_a: &Strategy,
    strategy_b: &Strategy,
    seed: &[u8; 32],
    round_count: u32,
) -> MatchResult {
    let mut agent_a = Agent::new(*strategy_a, SeededRng::new(seed, 0));
    let mut agent_b = Agent::new(*strategy_b, SeededRng::new(seed, 1));

    let mut rounds: Vec<RoundResult> = Vec::with_capacity(round_count as usize);
    let mut summary = MatchSummary {
        round_count,
        wins_a: 0,
        wins_b: 0,
        draws: 0,
        total_reward_a: 0,
        total_reward_b: 0,
    };
    let mut previous: Option<(Move, Move)> = None;

    for round in 0..round_count {
        let (obs_a, obs_b) = match previous {
            None => (Observation::opening(), Observation::opening()),
            Some((a, b)) => (Observation::after(round, b), Observation::after(round, a)),
        };

        // Simultaneous moves: neither sees the other's choice for this round
        let move_a = agent_a.act(&obs_a);
        let move_b = agent_b.act(&obs_b);

        let (reward_a, reward_b) = reward(move_a, move_b);
        summary.total_reward_a += reward_a as i32;
        summary.total_reward_b += reward_b as i32;
        match reward_a {
            1 => summary.wins_a += 1,
            -1 => summary.wins_b += 1,
            _ => summary.draws += 1,
        }

        rounds.push(RoundResult {
            round,
            move_a,
            move_b,
            label_a: last_label(&agent_a),
            label_b: last_label(&agent_b),
            reward_a,
            reward_b,
            cumulative_a: summary.total_reward_a,
            cumulative_b: summary.total_reward_b,
        });

        previous = Some((move_a, move_b));
    }

    debug!(
        "match over after {} rounds: {}-{} ({} draws)",
        round_count, summary.wins_a, summary.wins_b, summary.draws
    );

    MatchResult { rounds, summary }
}

fn last_label(agent: &Agent) -> StrategyLabel {
    agent.labels().last().copied().unwrap_or(StrategyLabel::ErrorFallbackRandom)
}
