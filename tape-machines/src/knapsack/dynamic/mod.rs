mod machine;
pub use machine::DpMachine;
mod tape;
pub use tape::Tape;
mod backtrack;
pub use backtrack::traceback;

use super::Params;
use crate::machine::Machine;
use anyhow::Result;
use serde_json::{Map, Value};
use tape_challenges::knapsack::{Challenge, Solution};

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let params = Params::initialize(hyperparameters)?;
    let mut machine = DpMachine::new(challenge, &params)?;
    machine.run(params.max_steps)?;
    save_solution(&machine.traceback()?)
}
