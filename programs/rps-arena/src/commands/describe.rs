//! Describe one strategy

use anyhow::Result;
use rps_engine::describe_strategy;
use crate::players::resolve_strategy;

pub fn describe(spec: &str) -> Result<String> {
    let strategy = resolve_strategy(spec)?;
    Ok(describe_strategy(&strategy))
}
