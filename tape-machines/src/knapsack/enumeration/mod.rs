mod machine;
pub use machine::{EnumerationMachine, NodeId, SearchNode};
mod path;

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
    let mut machine = EnumerationMachine::new(challenge, &params)?;
    machine.run(params.max_steps)?;
    let (_, solution) = machine.best_solution()?;
    save_solution(&solution)
}
