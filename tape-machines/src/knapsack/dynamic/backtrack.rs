use super::{DpMachine, Tape};
use crate::machine::Machine;
use anyhow::{anyhow, Result};
use tape_challenges::knapsack::{Challenge, Solution};

/// Recovers one optimal selection from a filled tape.
///
/// Walks the rows bottom-up at a shrinking capacity; a row whose cell differs
/// from the row above must have taken its item. Items come back ascending.
pub fn traceback(challenge: &Challenge, tape: &Tape) -> Solution {
    let mut remaining = challenge.max_weight as usize;
    let mut items = Vec::new();
    for item_prefix in (1..=challenge.num_items).rev() {
        if tape.get(item_prefix, remaining) != tape.get(item_prefix - 1, remaining) {
            let item = item_prefix - 1;
            items.push(item);
            remaining -= challenge.weights[item] as usize;
        }
    }
    items.reverse();
    Solution { items }
}

impl<'a> DpMachine<'a> {
    pub fn traceback(&self) -> Result<Solution> {
        if !self.is_halted() {
            return Err(anyhow!("Cannot trace back before the DP machine halts"));
        }
        Ok(traceback(self.challenge(), self.tape()))
    }
}
