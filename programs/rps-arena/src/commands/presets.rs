//! List the named presets

use anyhow::Result;
use serde_json::{json, Value};
use rps_engine::{preset, PRESETS};

pub fn presets() -> Result<Value> {
    let list = PRESETS
        .iter()
        .map(|(name, description)| -> Result<Value> {
            Ok(json!({
                "name": name,
                "description": description,
                "strategy": serde_json::to_value(preset(name))?,
            }))
        })
        .collect::<Result<Vec<Value>>>()?;
    Ok(Value::Array(list))
}
