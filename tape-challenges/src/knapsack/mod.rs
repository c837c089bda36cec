mod baselines;
use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use std::collections::HashSet;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Difficulty {
    pub num_items: usize,
    pub capacity_percent: u32,
}

/// Chosen item indices, 0-based.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    pub items: Vec<usize>,
}

impl Solution {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl TryFrom<Map<String, Value>> for Solution {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

/// Instance as it arrives from outside: signed integers, lengths unchecked.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawChallenge {
    #[serde(alias = "capacity")]
    pub max_weight: i64,
    pub num_items: i64,
    pub values: Vec<i64>,
    pub weights: Vec<i64>,
}

/// A validated 0/1 knapsack instance. Item `i` has `values[i]` and `weights[i]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawChallenge")]
pub struct Challenge {
    pub max_weight: u32,
    pub num_items: usize,
    pub values: Vec<u32>,
    pub weights: Vec<u32>,
}

impl TryFrom<RawChallenge> for Challenge {
    type Error = anyhow::Error;

    fn try_from(raw: RawChallenge) -> Result<Self> {
        let max_weight = u32::try_from(raw.max_weight)
            .map_err(|_| anyhow!("Capacity ({}) must be in [0, {}]", raw.max_weight, u32::MAX))?;
        if raw.num_items < 0 {
            return Err(anyhow!(
                "Number of items ({}) must be non-negative",
                raw.num_items
            ));
        }
        let num_items = raw.num_items as usize;
        if raw.values.len() != num_items {
            return Err(anyhow!(
                "Expected {} values, got {}",
                num_items,
                raw.values.len()
            ));
        }
        if raw.weights.len() != num_items {
            return Err(anyhow!(
                "Expected {} weights, got {}",
                num_items,
                raw.weights.len()
            ));
        }
        let values = to_u32s("Value", &raw.values)?;
        let weights = to_u32s("Weight", &raw.weights)?;
        Challenge::new(max_weight, values, weights)
    }
}

fn to_u32s(what: &str, raw: &[i64]) -> Result<Vec<u32>> {
    raw.iter()
        .enumerate()
        .map(|(i, &v)| {
            u32::try_from(v)
                .map_err(|_| anyhow!("{} of item {} ({}) must be in [0, {}]", what, i, v, u32::MAX))
        })
        .collect()
}

impl Challenge {
    pub fn new(max_weight: u32, values: Vec<u32>, weights: Vec<u32>) -> Result<Challenge> {
        if values.len() != weights.len() {
            return Err(anyhow!(
                "Number of values ({}) does not match number of weights ({})",
                values.len(),
                weights.len()
            ));
        }
        Ok(Challenge {
            max_weight,
            num_items: values.len(),
            values,
            weights,
        })
    }

    /// Parses whitespace separated integers in the order: capacity, number of
    /// items, that many values, then that many weights.
    pub fn from_tokens(input: &str) -> Result<Challenge> {
        let mut tokens = input.split_whitespace().enumerate().map(|(pos, token)| {
            token
                .parse::<i64>()
                .map_err(|_| anyhow!("Token {} ('{}') is not an integer", pos, token))
        });
        let mut next = |what: &str| -> Result<i64> {
            tokens
                .next()
                .unwrap_or_else(|| Err(anyhow!("Unexpected end of input, expected {}", what)))
        };

        let max_weight = next("capacity")?;
        let num_items = next("number of items")?;
        if num_items < 0 {
            return Err(anyhow!(
                "Number of items ({}) must be non-negative",
                num_items
            ));
        }
        let values = (0..num_items)
            .map(|i| next(&format!("value of item {}", i)))
            .collect::<Result<Vec<_>>>()?;
        let weights = (0..num_items)
            .map(|i| next(&format!("weight of item {}", i)))
            .collect::<Result<Vec<_>>>()?;
        if let Some(extra) = tokens.next() {
            return Err(match extra {
                Ok(v) => anyhow!("Unexpected trailing input ({})", v),
                Err(e) => e,
            });
        }

        Challenge::try_from(RawChallenge {
            max_weight,
            num_items,
            values,
            weights,
        })
    }

    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Result<Challenge> {
        let mut rng = SmallRng::from_seed(seed.clone());

        // Generate weights w_i in the range [1, 50]
        let weights: Vec<u32> = (0..difficulty.num_items)
            .map(|_| rng.gen_range(1..=50))
            .collect();

        // Generate values v_i in the range [1, 100]
        let values: Vec<u32> = (0..difficulty.num_items)
            .map(|_| rng.gen_range(1..=100))
            .collect();

        let total_weight: u64 = weights.iter().map(|&w| w as u64).sum();
        let max_weight = total_weight * difficulty.capacity_percent as u64 / 100;
        let max_weight = u32::try_from(max_weight)
            .map_err(|_| anyhow!("Generated capacity ({}) does not fit in u32", max_weight))?;

        Challenge::new(max_weight, values, weights)
    }

    /// Total value of a feasible selection. Errors on duplicates, unknown
    /// items or a selection heavier than the capacity.
    pub fn evaluate_total_value(&self, solution: &Solution) -> Result<u64> {
        let selected_items: HashSet<usize> = solution.items.iter().cloned().collect();
        if selected_items.len() != solution.items.len() {
            return Err(anyhow!("Duplicate items selected."));
        }

        if let Some(&item) = solution.items.iter().find(|&&item| item >= self.num_items) {
            return Err(anyhow!("Item ({}) is out of bounds", item));
        }

        let total_weight = calculate_total_weight(&solution.items, &self.weights);
        if total_weight > self.max_weight as u64 {
            return Err(anyhow!(
                "Total weight ({}) exceeded max weight ({})",
                total_weight,
                self.max_weight
            ));
        }

        Ok(calculate_total_value(&solution.items, &self.values))
    }

    /// Optimal total value from the rolling-row reference solver. Errors when
    /// the capacity row cannot be allocated.
    pub fn compute_reference_value(&self) -> Result<u64> {
        baselines::rolling::solve_challenge(self)
    }

    pub fn verify_solution(&self, solution: &Solution) -> Result<()> {
        let total_value = self.evaluate_total_value(solution)?;
        let optimal_value = self.compute_reference_value()?;
        if total_value != optimal_value {
            return Err(anyhow!(
                "Total value ({}) does not match optimal value ({})",
                total_value,
                optimal_value
            ));
        }
        Ok(())
    }
}

pub fn calculate_total_value(indices: &[usize], values: &[u32]) -> u64 {
    indices.iter().map(|&i| values[i] as u64).sum()
}

pub fn calculate_total_weight(indices: &[usize], weights: &[u32]) -> u64 {
    indices.iter().map(|&i| weights[i] as u64).sum()
}
