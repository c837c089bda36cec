use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    /// Upper bound on `step` calls per run, unbounded when absent
    pub max_steps: Option<u64>,

    /// Largest item count the enumeration machine accepts (tree size is 2^n)
    pub max_enumeration_items: usize,

    /// Largest DP tape, in cells, the DP machine allocates
    pub max_tape_cells: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_steps: None,
            max_enumeration_items: 20,
            max_tape_cells: 50_000_000,
        }
    }
}

impl Params {
    /// Overrides defaults key by key. Unknown keys are ignored with a warning;
    /// a known key whose value is not a non-negative integer is an error.
    pub fn initialize(h: &Option<Map<String, Value>>) -> Result<Self> {
        let mut p = Self::default();
        if let Some(m) = h {
            for (key, v) in m {
                match key.as_str() {
                    "max_steps" => p.max_steps = Some(as_count(key, v)?),
                    "max_enumeration_items" => p.max_enumeration_items = as_count(key, v)? as usize,
                    "max_tape_cells" => p.max_tape_cells = as_count(key, v)? as usize,
                    _ => warn!("Ignoring unknown hyperparameter '{}'", key),
                }
            }
        }
        Ok(p)
    }
}

// Accepts integral floats such as `5.0`.
fn as_count(key: &str, v: &Value) -> Result<u64> {
    if let Some(n) = v.as_u64() {
        return Ok(n);
    }
    match v.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(anyhow!(
            "Hyperparameter '{}' must be a non-negative integer, got {}",
            key,
            v
        )),
    }
}
