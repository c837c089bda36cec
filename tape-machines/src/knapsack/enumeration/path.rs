use super::{EnumerationMachine, NodeId};
use crate::machine::Machine;
use anyhow::{anyhow, Result};
use tape_challenges::knapsack::Solution;

impl<'a> EnumerationMachine<'a> {
    /// Items taken on the path from the root to `leaf`, ascending.
    pub fn reconstruct_path(&self, leaf: NodeId) -> Solution {
        let mut items = Vec::new();
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.parent.is_some() && node.included_this_level {
                items.push(node.level - 1);
            }
            cursor = node.parent;
        }
        items.reverse();
        Solution { items }
    }

    /// Best value and its selection, available once halted.
    pub fn best_solution(&self) -> Result<(u64, Solution)> {
        if !self.is_halted() {
            return Err(anyhow!(
                "Cannot reconstruct a path before the enumeration machine halts"
            ));
        }
        let best = self
            .best()
            .ok_or_else(|| anyhow!("Enumeration machine halted without a completed selection"))?;
        Ok((self.node(best).value_so_far, self.reconstruct_path(best)))
    }
}
