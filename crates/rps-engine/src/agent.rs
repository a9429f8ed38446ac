//! Per-game agent: the harness turn protocol and strategy selection

use std::panic::{self, AssertUnwindSafe};
use core::fmt;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use crate::error::AgentError;
use crate::history::HistoryTracker;
use crate::moves::{complement, Move, ResultTag};
use crate::predictor::{self, Prediction, ResponseTable};
use crate::random::SeededRng;
use crate::strategy::{Strategy, StrategyBase};

/// What the harness sends every turn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Turn index, 0-based
    pub step: u32,
    /// Opponent's move of the previous turn (absent on turn 0)
    #[serde(default)]
    pub last_opponent_action: Option<u8>,
}

impl Observation {
    pub fn opening() -> Self {
        Self { step: 0, last_opponent_action: None }
    }

    pub fn after(step: u32, opponent: Move) -> Self {
        Self { step, last_opponent_action: Some(opponent.into()) }
    }
}

/// Game constants from the harness, passed through untouched
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    pub episode_steps: u32,
    /// Seconds per turn, enforced by the harness
    pub act_timeout: f64,
    pub signs: u8,
}

impl Default for Configuration {
    fn default() -> Self {
        Self { episode_steps: 1000, act_timeout: 1.0, signs: 3 }
    }
}

/// Which branch produced a turn's move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyLabel {
    Random,
    Reactive,
    ReactiveFallbackRandom,
    #[serde(rename = "winning_with_my_last")]
    WinningWithMyLast,
    #[serde(rename = "losing_to_my_last")]
    LosingToMyLast,
    ErrorFallbackRandom,
}

impl StrategyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyLabel::Random => "random",
            StrategyLabel::Reactive => "reactive",
            StrategyLabel::ReactiveFallbackRandom => "reactive-fallback-random",
            StrategyLabel::WinningWithMyLast => "winning_with_my_last",
            StrategyLabel::LosingToMyLast => "losing_to_my_last",
            StrategyLabel::ErrorFallbackRandom => "error-fallback-random",
        }
    }
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one game for offline inspection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    pub own: Vec<Move>,
    pub opponent: Vec<Move>,
    pub labels: Vec<StrategyLabel>,
}

type Decision = (Move, StrategyLabel);

/// One agent playing one game
///
/// Each game needs its own agent; nothing is shared between instances.
#[derive(Clone, Debug)]
pub struct Agent {
    strategy: Strategy,
    history: HistoryTracker,
    rng: SeededRng,
    labels: Vec<StrategyLabel>,
    /// Response table fixed at the end of training (Trained only)
    frozen: Option<ResponseTable>,
}

impl Agent {
    pub fn new(strategy: Strategy, rng: SeededRng) -> Self {
        Self {
            strategy,
            history: HistoryTracker::new(),
            rng,
            labels: Vec::new(),
            frozen: None,
        }
    }

    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    /// Labels of every turn played so far, in order
    pub fn labels(&self) -> &[StrategyLabel] {
        &self.labels
    }

    pub fn game_log(&self) -> GameLog {
        GameLog {
            own: self.history.own().to_vec(),
            opponent: self.history.opponent().to_vec(),
            labels: self.labels.clone(),
        }
    }

    /// Harness entry point: always answers with 0, 1 or 2
    pub fn respond(&mut self, observation: &Observation, _configuration: &Configuration) -> u8 {
        self.act(observation).into()
    }

    /// Choose and record this turn's move
    ///
    /// Never fails: any error or panic while deciding becomes a random move.
    pub fn act(&mut self, observation: &Observation) -> Move {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.decide(observation)));
        let (choice, label) = match outcome {
            Ok(Ok(decision)) => decision,
            Ok(Err(err)) => {
                warn!("step {}: {}, playing random", observation.step, err);
                self.recover()
            }
            Err(_) => {
                warn!("step {}: strategy panicked, playing random", observation.step);
                self.recover()
            }
        };

        self.history.record_own_move(choice);
        self.labels.push(label);
        debug!("step {}: {} ({})", observation.step, choice, label);
        choice
    }

    fn recover(&mut self) -> Decision {
        self.history.resync();
        (self.rng.next_move(), StrategyLabel::ErrorFallbackRandom)
    }

    fn random(&mut self) -> Decision {
        (self.rng.next_move(), StrategyLabel::Random)
    }

    fn decide(&mut self, observation: &Observation) -> Result<Decision, AgentError> {
        if observation.step == 0 {
            if !self.history.own().is_empty() {
                warn!("step 0 after {} turns, starting a new game", self.history.own().len());
                self.reset();
            }
            return Ok(self.random());
        }

        let value = observation
            .last_opponent_action
            .ok_or(AgentError::MissingOpponentMove { step: observation.step })?;
        self.history.record_opponent_move(Move::try_from(value)?);
        self.history.check_sync()?;

        match self.strategy.base {
            StrategyBase::Random => Ok(self.random()),
            StrategyBase::Rotation => Ok(self.rotation()),
            StrategyBase::Reactive => self.reactive(),
            StrategyBase::Trained => Ok(self.trained()),
        }
    }

    fn reset(&mut self) {
        self.history.clear();
        self.labels.clear();
        self.frozen = None;
    }

    fn rotation(&mut self) -> Decision {
        let Some(&last) = self.history.own().last() else {
            return self.random();
        };
        let draw = self.rng.next_f64();
        if draw < 1.0 / 3.0 {
            (complement(last, ResultTag::Win), StrategyLabel::WinningWithMyLast)
        } else if draw < 2.0 / 3.0 {
            (complement(last, ResultTag::Lose), StrategyLabel::LosingToMyLast)
        } else {
            self.random()
        }
    }

    fn reactive(&mut self) -> Result<Decision, AgentError> {
        let params = self.strategy.params;
        let draw = self.rng.next_f64();
        if draw < params.explore_probability || self.history.len() < params.min_samples {
            return Ok(self.random());
        }

        Ok(match predictor::predict(&self.history, &params)? {
            Prediction::Confident { counter, .. } => (counter, StrategyLabel::Reactive),
            Prediction::NotConfident => (self.rng.next_move(), StrategyLabel::ReactiveFallbackRandom),
        })
    }

    fn trained(&mut self) -> Decision {
        let params = self.strategy.params;
        let turns = self.history.len();
        if turns < params.train_rounds {
            return self.random();
        }
        // the last training turn freezes the table and still plays random
        if turns == params.train_rounds || self.frozen.is_none() {
            self.frozen = Some(ResponseTable::build(&self.history, params.context, None));
            return self.random();
        }

        let history = &self.history;
        let Some(table) = self.frozen.as_ref() else {
            return self.random();
        };

        let prediction = match history.current_context(params.context) {
            Some(key) => table.predict(&key, params.confidence_threshold),
            None => Prediction::NotConfident,
        };
        match prediction {
            Prediction::Confident { counter, .. } => (counter, StrategyLabel::Reactive),
            Prediction::NotConfident => (self.rng.next_move(), StrategyLabel::ReactiveFallbackRandom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::beats;
    use crate::strategy::{preset, ContextMode, StrategyParams};
    use crate::moves::Move::{Paper, Rock, Scissors};

    fn make_rng() -> SeededRng {
        SeededRng::new(&[42u8; 32], 0)
    }

    fn reactive(params: StrategyParams) -> Agent {
        Agent::new(Strategy::with_params(StrategyBase::Reactive, params), make_rng())
    }

    /// Play `turns` turns against an opponent that always plays `opponent`
    fn play_against_constant(agent: &mut Agent, opponent: Move, turns: u32) -> Vec<Move> {
        (0..turns)
            .map(|step| {
                let obs = if step == 0 { Observation::opening() } else { Observation::after(step, opponent) };
                agent.act(&obs)
            })
            .collect()
    }

    #[test]
    fn test_opening_is_random_without_history() {
        let mut agent = Agent::new(Strategy::default(), make_rng());
        let m = agent.respond(&Observation::opening(), &Configuration::default());
        assert!(m < 3);
        assert!(agent.history().opponent().is_empty());
        assert_eq!(agent.labels(), &[StrategyLabel::Random]);
    }

    #[test]
    fn test_histories_stay_aligned() {
        let mut agent = Agent::new(preset("reactive").unwrap(), make_rng());
        let mut opponent_rng = SeededRng::new(&[7u8; 32], 1);
        for step in 0..300u32 {
            let obs = if step == 0 {
                Observation::opening()
            } else {
                Observation::after(step, opponent_rng.next_move())
            };
            agent.act(&obs);
            let h = agent.history();
            assert_eq!(h.own().len(), step as usize + 1);
            assert_eq!(h.opponent().len(), step as usize);
        }
        assert!(!agent.labels().contains(&StrategyLabel::ErrorFallbackRandom));
    }

    #[test]
    fn test_exploits_constant_opponent() {
        let params = StrategyParams {
            explore_probability: 0.0,
            confidence_threshold: 0.75,
            memory_size: None,
            ..Default::default()
        };
        let mut agent = reactive(params);
        let moves = play_against_constant(&mut agent, Rock, 60);

        // once every own move has been seen, the answer is always Paper
        assert!(moves[20..].iter().all(|m| *m == beats(Rock)), "{:?}", moves);
        assert_eq!(agent.labels()[59], StrategyLabel::Reactive);
    }

    #[test]
    fn test_unreachable_threshold_falls_back() {
        let params = StrategyParams {
            explore_probability: 0.0,
            confidence_threshold: 1.1,
            ..Default::default()
        };
        let mut agent = reactive(params);
        play_against_constant(&mut agent, Paper, 50);
        assert!(agent.labels()[1..]
            .iter()
            .all(|l| *l == StrategyLabel::ReactiveFallbackRandom));
    }

    #[test]
    fn test_min_samples_floor_forces_random() {
        let params = StrategyParams {
            explore_probability: 0.0,
            confidence_threshold: 0.0,
            min_samples: 1000,
            ..Default::default()
        };
        let mut agent = reactive(params);
        play_against_constant(&mut agent, Scissors, 100);
        assert!(agent.labels().iter().all(|l| *l == StrategyLabel::Random));
    }

    #[test]
    fn test_full_exploration_never_predicts() {
        let params = StrategyParams { explore_probability: 1.0, ..Default::default() };
        let mut agent = reactive(params);
        play_against_constant(&mut agent, Rock, 100);
        assert!(agent.labels().iter().all(|l| *l == StrategyLabel::Random));
    }

    #[test]
    fn test_invalid_opponent_move_degrades_to_random() {
        let mut agent = Agent::new(preset("reactive").unwrap(), make_rng());
        agent.act(&Observation::opening());
        agent.act(&Observation::after(1, Rock));

        let bad = Observation { step: 2, last_opponent_action: Some(9) };
        let m = agent.respond(&bad, &Configuration::default());
        assert!(m < 3);
        assert_eq!(agent.labels()[2], StrategyLabel::ErrorFallbackRandom);

        // the next turn is back in sync
        agent.act(&Observation::after(3, Rock));
        assert!(agent.history().own().len() == agent.history().opponent().len() + 1);
        assert_ne!(agent.labels()[3], StrategyLabel::ErrorFallbackRandom);
    }

    #[test]
    fn test_missing_opponent_move_degrades_to_random() {
        let mut agent = Agent::new(preset("reactive").unwrap(), make_rng());
        agent.act(&Observation::opening());
        agent.act(&Observation { step: 1, last_opponent_action: None });
        assert_eq!(agent.labels()[1], StrategyLabel::ErrorFallbackRandom);
    }

    #[test]
    fn test_step_zero_starts_new_game() {
        let mut agent = Agent::new(preset("reactive").unwrap(), make_rng());
        play_against_constant(&mut agent, Rock, 10);
        agent.act(&Observation::opening());
        assert_eq!(agent.history().own().len(), 1);
        assert!(agent.history().opponent().is_empty());
        assert_eq!(agent.labels().len(), 1);
    }

    #[test]
    fn test_rotation_relates_to_own_last_move() {
        let mut agent = Agent::new(preset("rotation").unwrap(), make_rng());
        play_against_constant(&mut agent, Rock, 200);
        let own = agent.history().own();
        for (t, label) in agent.labels().iter().enumerate().skip(1) {
            match label {
                StrategyLabel::WinningWithMyLast => assert_eq!(own[t], beats(own[t - 1])),
                StrategyLabel::LosingToMyLast => assert_eq!(beats(own[t]), own[t - 1]),
                StrategyLabel::Random => {}
                other => panic!("unexpected label {}", other),
            }
        }
        assert!(agent.labels().contains(&StrategyLabel::WinningWithMyLast));
        assert!(agent.labels().contains(&StrategyLabel::LosingToMyLast));
    }

    #[test]
    fn test_trained_is_random_until_training_ends() {
        let strategy = Strategy::with_params(
            StrategyBase::Trained,
            StrategyParams {
                train_rounds: 30,
                confidence_threshold: 0.0,
                context: ContextMode::OwnAndOpponent,
                ..Default::default()
            },
        );
        let mut agent = Agent::new(strategy, make_rng());
        let moves = play_against_constant(&mut agent, Scissors, 80);

        assert!(agent.labels()[..31].iter().all(|l| *l == StrategyLabel::Random));
        // every (own, Scissors) pair is followed by Scissors; after training we play Rock
        // unless our last own move never appeared during training
        let reactive: Vec<_> = agent
            .labels()
            .iter()
            .zip(&moves)
            .skip(31)
            .filter(|(l, _)| **l == StrategyLabel::Reactive)
            .map(|(_, m)| *m)
            .collect();
        assert!(!reactive.is_empty());
        assert!(reactive.iter().all(|m| *m == Rock));
    }

    #[test]
    fn test_trained_predicts_only_after_training_turn() {
        let strategy = Strategy::with_params(
            StrategyBase::Trained,
            StrategyParams { train_rounds: 5, confidence_threshold: 0.0, ..Default::default() },
        );
        let mut agent = Agent::new(strategy, make_rng());
        play_against_constant(&mut agent, Rock, 40);
        // turns 0..=5 are training, the table is consulted from turn 6 on
        assert!(agent.labels()[..6].iter().all(|l| *l == StrategyLabel::Random));
        assert!(agent.labels()[6..].iter().all(|l| *l != StrategyLabel::Random));
    }

    #[test]
    fn test_trained_table_is_frozen() {
        let strategy = Strategy::with_params(
            StrategyBase::Trained,
            StrategyParams { train_rounds: 20, confidence_threshold: 0.0, ..Default::default() },
        );
        let mut agent = Agent::new(strategy, make_rng());
        // learn against Rock, then the opponent switches to Paper
        play_against_constant(&mut agent, Rock, 25);
        for step in 25..60 {
            agent.act(&Observation::after(step, Paper));
        }
        let own = agent.history().own();
        for (t, label) in agent.labels().iter().enumerate().skip(21) {
            if *label == StrategyLabel::Reactive {
                assert_eq!(own[t], Paper, "turn {} ignored the frozen table", t);
            }
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let play = || {
            let mut agent = Agent::new(preset("reactive").unwrap(), make_rng());
            play_against_constant(&mut agent, Paper, 100)
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_rotation_labels_keep_underscore_names() {
        assert_eq!(StrategyLabel::WinningWithMyLast.as_str(), "winning_with_my_last");
        assert_eq!(StrategyLabel::LosingToMyLast.to_string(), "losing_to_my_last");
        assert_eq!(
            serde_json::to_value(StrategyLabel::WinningWithMyLast).unwrap(),
            "winning_with_my_last"
        );
        assert_eq!(
            serde_json::to_value(StrategyLabel::ReactiveFallbackRandom).unwrap(),
            "reactive-fallback-random"
        );
        let label: StrategyLabel = serde_json::from_str("\"losing_to_my_last\"").unwrap();
        assert_eq!(label, StrategyLabel::LosingToMyLast);
    }

    #[test]
    fn test_game_log_serializes() {
        let mut agent = Agent::new(Strategy::new(StrategyBase::Random), make_rng());
        play_against_constant(&mut agent, Rock, 3);
        let log = agent.game_log();
        assert_eq!(log.own.len(), 3);
        assert_eq!(log.opponent, vec![Rock, Rock]);

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["opponent"], serde_json::json!([0, 0]));
        assert_eq!(json["labels"][0], "random");
    }

    #[test]
    fn test_observation_json_uses_harness_names() {
        let obs: Observation = serde_json::from_str(r#"{"step": 4, "lastOpponentAction": 2}"#).unwrap();
        assert_eq!(obs, Observation::after(4, Scissors));

        let obs: Observation = serde_json::from_str(r#"{"step": 0}"#).unwrap();
        assert_eq!(obs, Observation::opening());

        let config: Configuration = serde_json::from_str(r#"{"episodeSteps": 50}"#).unwrap();
        assert_eq!(config.episode_steps, 50);
        assert_eq!(config.signs, 3);
    }
}
