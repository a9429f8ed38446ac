//! Strategy and seed resolution for command-line arguments

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use anyhow::{anyhow, bail, ensure, Context, Result};
use rps_engine::{preset, SeededRng, Strategy};

/// Resolve a preset name, or else read a JSON strategy file
pub fn resolve_strategy(spec: &str) -> Result<Strategy> {
    if let Some(strategy) = preset(spec) {
        return Ok(strategy);
    }
    let path = Path::new(spec);
    if !path.exists() {
        bail!("'{}' is neither a preset nor a strategy file", spec);
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read strategy file {}", path.display()))?;
    Strategy::from_json(&json)
        .with_context(|| format!("invalid strategy in {}", path.display()))
}

/// Parse a hex seed of up to 64 digits, zero-padded on the right
pub fn parse_seed(hex: &str) -> Result<[u8; 32]> {
    let digits = hex.trim().trim_start_matches("0x");
    if digits.is_empty() || digits.len() > 64 {
        bail!("seed must have 1 to 64 hex digits, got {}", digits.len());
    }
    ensure!(
        digits.chars().all(|c| c.is_ascii_hexdigit()),
        "seed '{}' contains non-hex characters",
        digits
    );
    let padded = format!("{:0<64}", digits);
    let mut seed = [0u8; 32];
    for (i, byte) in seed.iter_mut().enumerate() {
        let pair = &padded[i * 2..i * 2 + 2];
        *byte = u8::from_str_radix(pair, 16)
            .map_err(|_| anyhow!("invalid hex digits '{}' in seed", pair))?;
    }
    Ok(seed)
}

pub fn seed_to_hex(seed: &[u8; 32]) -> String {
    seed.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Seed derived from the wall clock, for runs without --seed
pub fn random_seed() -> [u8; 32] {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let mut rng = SeededRng::from_u64(nanos);
    let mut seed = [0u8; 32];
    for chunk in seed.chunks_mut(8) {
        chunk.copy_from_slice(&rng.next_u64().to_le_bytes());
    }
    seed
}
