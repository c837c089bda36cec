use crate::knapsack::Challenge;
use anyhow::{anyhow, Result};

/// Optimal total value from a single capacity-indexed row, updated item by
/// item from the heaviest capacity down. Iterative, so the item count never
/// touches the call stack; memory is one `u64` per unit of capacity and time
/// is items × capacity.
pub fn solve_challenge(challenge: &Challenge) -> Result<u64> {
    let width = challenge.max_weight as usize + 1;
    let mut best: Vec<u64> = Vec::new();
    best.try_reserve_exact(width).map_err(|e| {
        anyhow!(
            "Cannot allocate reference row for capacity {}: {}",
            challenge.max_weight,
            e
        )
    })?;
    best.resize(width, 0);

    for (&weight, &value) in challenge.weights.iter().zip(challenge.values.iter()) {
        let weight = weight as usize;
        if weight >= width {
            continue;
        }
        for w in (weight..width).rev() {
            let take = best[w - weight] + value as u64;
            if take > best[w] {
                best[w] = take;
            }
        }
    }
    Ok(best[width - 1])
}
