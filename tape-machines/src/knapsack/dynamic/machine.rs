use super::Tape;
use crate::knapsack::Params;
use crate::machine::{halted_error, Machine, State};
use anyhow::{anyhow, Result};
use log::{debug, trace};
use tape_challenges::knapsack::Challenge;

/// Fills the DP tape one cell per step, row by row.
///
/// Row 0 is written during `Start`. Every later step writes cell
/// `(item_prefix, head)` from row `item_prefix - 1`, then moves the head right,
/// wrapping to the next row after column `max_weight`.
pub struct DpMachine<'a> {
    challenge: &'a Challenge,
    tape: Tape,
    head: usize,
    item_prefix: usize,
    state: State,
    steps: u64,
}

impl<'a> DpMachine<'a> {
    pub fn new(challenge: &'a Challenge, params: &Params) -> Result<Self> {
        let num_cells = (challenge.num_items + 1)
            .checked_mul(challenge.max_weight as usize + 1)
            .filter(|&cells| cells <= params.max_tape_cells)
            .ok_or_else(|| {
                anyhow!(
                    "Tape for {} items and capacity {} exceeds max_tape_cells ({})",
                    challenge.num_items,
                    challenge.max_weight,
                    params.max_tape_cells
                )
            })?;
        debug!("Allocating DP tape with {} cells", num_cells);

        Ok(Self {
            challenge,
            tape: Tape::new(challenge.num_items, challenge.max_weight as usize),
            head: 0,
            item_prefix: 0,
            state: State::Start,
            steps: 0,
        })
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn into_tape(self) -> Tape {
        self.tape
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn item_prefix(&self) -> usize {
        self.item_prefix
    }

    pub fn challenge(&self) -> &'a Challenge {
        self.challenge
    }

    /// Optimal value, available once halted.
    pub fn value(&self) -> Option<u64> {
        self.is_halted().then(|| self.tape.final_value())
    }

    fn write_base_row(&mut self) {
        for weight in 0..self.tape.width() {
            self.tape.write(0, weight, 0);
        }
        if self.challenge.num_items == 0 {
            self.state = State::Halt;
            debug!("DP machine halted at start: no items");
        } else {
            self.item_prefix = 1;
            self.head = 0;
            self.state = State::Continue;
        }
    }

    fn write_cell(&mut self) {
        let item = self.item_prefix - 1;
        let weight = self.challenge.weights[item] as usize;
        let value = self.challenge.values[item] as u64;

        let exclude = self.tape.get(self.item_prefix - 1, self.head);
        let cell = if self.head >= weight {
            let include = self.tape.get(self.item_prefix - 1, self.head - weight) + value;
            exclude.max(include)
        } else {
            exclude
        };
        trace!("tape[{}][{}] = {}", self.item_prefix, self.head, cell);
        self.tape.write(self.item_prefix, self.head, cell);

        self.head += 1;
        if self.head > self.challenge.max_weight as usize {
            self.head = 0;
            self.item_prefix += 1;
            if self.item_prefix > self.challenge.num_items {
                self.state = State::Halt;
                debug!(
                    "DP machine halted after {} steps with value {}",
                    self.steps + 1,
                    self.tape.final_value()
                );
            }
        }
    }
}

impl<'a> Machine for DpMachine<'a> {
    fn state(&self) -> State {
        self.state
    }

    fn steps(&self) -> u64 {
        self.steps
    }

    fn step(&mut self) -> Result<()> {
        match self.state {
            State::Start => self.write_base_row(),
            State::Continue => self.write_cell(),
            State::Halt => return Err(halted_error()),
        }
        self.steps += 1;
        Ok(())
    }
}
