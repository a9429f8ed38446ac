//! Play a local match

use anyhow::{ensure, Result};
use log::info;
use serde::Serialize;
use serde_json::Value;
use rps_engine::{run_match, Configuration, MatchSummary};
use crate::players::{resolve_strategy, seed_to_hex};

/// Arguments of a local match
#[derive(Clone, Debug)]
pub struct PlayParams {
    /// Preset name or strategy file for player A
    pub a: String,
    /// Preset name or strategy file for player B
    pub b: String,
    /// Turns to play (harness default when absent)
    pub rounds: Option<u32>,
    pub seed: [u8; 32],
    /// Include every round in the output
    pub full_log: bool,
}

#[derive(Serialize)]
struct PlayReport<'a> {
    a: &'a str,
    b: &'a str,
    seed: String,
    summary: MatchSummary,
}

/// Run a match and build its JSON report
pub fn play(params: &PlayParams) -> Result<Value> {
    let strategy_a = resolve_strategy(&params.a)?;
    let strategy_b = resolve_strategy(&params.b)?;
    let rounds = params.rounds.unwrap_or(Configuration::default().episode_steps);
    ensure!(rounds > 0, "a match needs at least one round");

    info!("{} vs {} for {} rounds", params.a, params.b, rounds);
    let result = run_match(&strategy_a, &strategy_b, &params.seed, rounds);
    info!(
        "{} won {}, {} won {}, {} draws",
        params.a, result.summary.wins_a, params.b, result.summary.wins_b, result.summary.draws
    );

    if params.full_log {
        return Ok(serde_json::to_value(&result)?);
    }
    let report = PlayReport {
        a: &params.a,
        b: &params.b,
        seed: seed_to_hex(&params.seed),
        summary: result.summary,
    };
    Ok(serde_json::to_value(&report)?)
}
