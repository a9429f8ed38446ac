//! WASM bindings for a JavaScript game harness

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;
use crate::{describe_strategy, preset, run_match, Agent, Observation, SeededRng, Strategy, PRESETS};

/// Parse a strategy given either as a preset name or as strategy JSON
fn parse_strategy(spec: &str) -> Result<Strategy, String> {
    if let Some(strategy) = preset(spec) {
        return Ok(strategy);
    }
    Strategy::from_json(spec).map_err(|e| e.to_string())
}

fn parse_seed(seed: &[u8]) -> Result<[u8; 32], JsError> {
    seed.try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))
}

/// One agent for one game
#[wasm_bindgen]
pub struct WasmAgent {
    inner: Agent,
}

#[wasm_bindgen]
impl WasmAgent {
    /// Create an agent from a preset name or strategy JSON and a 32-byte seed
    #[wasm_bindgen(constructor)]
    pub fn new(strategy: &str, seed: &[u8]) -> Result<WasmAgent, JsError> {
        let strategy = parse_strategy(strategy)
            .map_err(|e| JsError::new(&format!("Invalid strategy: {}", e)))?;
        let seed_arr = parse_seed(seed)?;
        Ok(WasmAgent { inner: Agent::new(strategy, SeededRng::new(&seed_arr, 0)) })
    }

    /// Play one turn. Always returns 0, 1 or 2.
    pub fn act(&mut self, step: u32, last_opponent_action: Option<u8>) -> u8 {
        self.inner.act(&Observation { step, last_opponent_action }).into()
    }

    /// Moves and labels of the game so far
    pub fn game_log(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.inner.game_log())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }
}

/// Replay a local match with full round-by-round details
///
/// # Arguments
/// * `strategy_a` - Preset name or strategy JSON for player A
/// * `strategy_b` - Preset name or strategy JSON for player B
/// * `seed` - 32-byte match randomness seed
/// * `round_count` - Number of turns
///
/// # Returns
/// JSON serialized MatchResult
#[wasm_bindgen]
pub fn replay_match(
    strategy_a: &str,
    strategy_b: &str,
    seed: &[u8],
    round_count: u32,
) -> Result<JsValue, JsError> {
    let strategy_a = parse_strategy(strategy_a)
        .map_err(|e| JsError::new(&format!("Invalid strategy A: {}", e)))?;
    let strategy_b = parse_strategy(strategy_b)
        .map_err(|e| JsError::new(&format!("Invalid strategy B: {}", e)))?;
    let seed_arr = parse_seed(seed)?;

    let result = run_match(&strategy_a, &strategy_b, &seed_arr, round_count);

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get human-readable description of a strategy
#[wasm_bindgen]
pub fn get_strategy_description(strategy: &str) -> Result<String, JsError> {
    let strategy = parse_strategy(strategy)
        .map_err(|e| JsError::new(&format!("Invalid strategy: {}", e)))?;

    Ok(describe_strategy(&strategy))
}

#[derive(serde::Serialize)]
struct PresetInfo {
    id: &'static str,
    description: &'static str,
    strategy: Strategy,
}

/// Get all named presets with their full parameters
#[wasm_bindgen]
pub fn get_presets() -> Result<JsValue, JsError> {
    let presets: Vec<PresetInfo> = PRESETS
        .iter()
        .filter_map(|&(id, description)| {
            preset(id).map(|strategy| PresetInfo { id, description, strategy })
        })
        .collect();

    serde_wasm_bindgen::to_value(&presets)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
