//! Strategy definitions and presets

use serde::{Deserialize, Serialize};
use crate::error::AgentError;

/// What a prediction is conditioned on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextMode {
    /// The agent's own previous move
    #[default]
    OwnMove,
    /// The (own, opponent) pair of the previous turn
    OwnAndOpponent,
}

/// Base strategy type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyBase {
    /// Uniform random choice each turn.
    Random,
    /// Beat or lose to our own last move, or play random, one third each.
    Rotation,
    /// Counter the opponent's usual response to our last move.
    Reactive,
    /// Play random while learning, then counter from a frozen response table.
    Trained,
}

/// Strategy parameters for fine-tuning behavior
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Most recent reactions considered (None = whole game)
    pub memory_size: Option<usize>,
    /// Minimum modal share to trust a prediction
    pub confidence_threshold: f64,
    /// Context a prediction is conditioned on
    pub context: ContextMode,
    /// Chance of a random move even when a prediction is available (0-1)
    pub explore_probability: f64,
    /// Completed turns required before any prediction is trusted
    pub min_samples: usize,
    /// Random turns before the Trained response table is frozen
    pub train_rounds: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            memory_size: Some(200),
            confidence_threshold: 0.75,
            context: ContextMode::OwnMove,
            explore_probability: 0.05,
            min_samples: 0,
            train_rounds: 200,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.memory_size == Some(0) {
            return Err(AgentError::InvalidConfig {
                field: "memory_size",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        // values above 1 are allowed and simply disable exploitation
        if !self.confidence_threshold.is_finite() || self.confidence_threshold < 0.0 {
            return Err(AgentError::InvalidConfig {
                field: "confidence_threshold",
                reason: format!("must be a finite value >= 0, got {}", self.confidence_threshold),
            });
        }
        if !(0.0..=1.0).contains(&self.explore_probability) {
            return Err(AgentError::InvalidConfig {
                field: "explore_probability",
                reason: format!("must be within [0, 1], got {}", self.explore_probability),
            });
        }
        Ok(())
    }
}

/// Complete strategy with base type and parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub base: StrategyBase,
    #[serde(default)]
    pub params: StrategyParams,
}

impl Strategy {
    /// Create a new strategy with default parameters
    pub fn new(base: StrategyBase) -> Self {
        Self {
            base,
            params: StrategyParams::default(),
        }
    }

    /// Create with custom parameters
    pub fn with_params(base: StrategyBase, params: StrategyParams) -> Self {
        Self { base, params }
    }

    /// Parse and validate a JSON strategy
    pub fn from_json(json: &str) -> Result<Self, AgentError> {
        let strategy: Strategy = serde_json::from_str(json).map_err(|e| AgentError::InvalidConfig {
            field: "strategy",
            reason: e.to_string(),
        })?;
        strategy.params.validate()?;
        Ok(strategy)
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new(StrategyBase::Reactive)
    }
}

/// Named presets with a one-line description each
pub const PRESETS: [(&str, &str); 6] = [
    ("random", "Uniform random play."),
    ("rotation", "Beats or loses to its own last move, or plays random."),
    ("reactive", "Counters the usual response to its last move over 200 turns."),
    ("reactive-loose", "Counters any observed response over the whole game, random half the time."),
    ("reactive-pairs", "Counters the usual response to the last (own, opponent) pair."),
    ("trained", "Random for 200 turns, then counters a frozen (own, opponent) response table."),
];

/// Look up a preset by name
pub fn preset(name: &str) -> Option<Strategy> {
    let defaults = StrategyParams::default();
    let strategy = match name {
        "random" => Strategy::new(StrategyBase::Random),
        "rotation" => Strategy::new(StrategyBase::Rotation),
        "reactive" => Strategy::new(StrategyBase::Reactive),
        "reactive-loose" => Strategy::with_params(
            StrategyBase::Reactive,
            StrategyParams {
                memory_size: None,
                confidence_threshold: 0.0,
                explore_probability: 0.5,
                ..defaults
            },
        ),
        "reactive-pairs" => Strategy::with_params(
            StrategyBase::Reactive,
            StrategyParams { context: ContextMode::OwnAndOpponent, ..defaults },
        ),
        "trained" => Strategy::with_params(
            StrategyBase::Trained,
            StrategyParams {
                memory_size: None,
                confidence_threshold: 0.0,
                context: ContextMode::OwnAndOpponent,
                explore_probability: 0.0,
                ..defaults
            },
        ),
        _ => return None,
    };
    Some(strategy)
}

/// Get a human-readable description of a strategy
pub fn describe_strategy(strategy: &Strategy) -> String {
    let params = &strategy.params;
    let context = match params.context {
        ContextMode::OwnMove => "its own last move",
        ContextMode::OwnAndOpponent => "the last (own, opponent) pair",
    };
    let memory = match params.memory_size {
        Some(w) => format!("the last {} turns", w),
        None => "the whole game".to_string(),
    };

    match strategy.base {
        StrategyBase::Random => "Plays uniformly at random.".to_string(),
        StrategyBase::Rotation => {
            "Beats its own last move, loses to it, or plays random, one third each.".to_string()
        }
        StrategyBase::Reactive => {
            let mut desc = format!(
                "Counters the opponent's usual response to {} over {} when at least {:.0}% consistent.",
                context,
                memory,
                params.confidence_threshold * 100.0
            );
            if params.explore_probability > 0.0 {
                desc.push_str(&format!(" Plays random {:.0}% of the time.", params.explore_probability * 100.0));
            }
            if params.min_samples > 0 {
                desc.push_str(&format!(" Waits {} turns before predicting.", params.min_samples));
            }
            desc
        }
        StrategyBase::Trained => format!(
            "Plays random for {} turns, then counters a frozen table of responses to {}.",
            params.train_rounds, context
        ),
    }
}
