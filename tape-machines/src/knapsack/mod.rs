pub mod dynamic;
pub mod enumeration;
mod params;
pub use params::Params;

use crate::machine::{Machine, State};
use anyhow::{anyhow, Result};
use dynamic::{DpMachine, Tape};
use enumeration::EnumerationMachine;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use tape_challenges::knapsack::{Challenge, Solution};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MachineKind {
    Dynamic,
    Enumeration,
}

impl FromStr for MachineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dp" | "dynamic" => Ok(MachineKind::Dynamic),
            "enumeration" | "bnb" | "branch_and_bound" => Ok(MachineKind::Enumeration),
            _ => Err(anyhow!(
                "Unknown algorithm '{}', expected 'dp' or 'enumeration'",
                s
            )),
        }
    }
}

impl fmt::Display for MachineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineKind::Dynamic => write!(f, "dynamic"),
            MachineKind::Enumeration => write!(f, "enumeration"),
        }
    }
}

/// Either machine, chosen at construction.
pub enum KnapsackMachine<'a> {
    Dynamic(DpMachine<'a>),
    Enumeration(EnumerationMachine<'a>),
}

impl<'a> KnapsackMachine<'a> {
    pub fn new(kind: MachineKind, challenge: &'a Challenge, params: &Params) -> Result<Self> {
        Ok(match kind {
            MachineKind::Dynamic => KnapsackMachine::Dynamic(DpMachine::new(challenge, params)?),
            MachineKind::Enumeration => {
                KnapsackMachine::Enumeration(EnumerationMachine::new(challenge, params)?)
            }
        })
    }

    pub fn kind(&self) -> MachineKind {
        match self {
            KnapsackMachine::Dynamic(_) => MachineKind::Dynamic,
            KnapsackMachine::Enumeration(_) => MachineKind::Enumeration,
        }
    }

    /// Reconstructs the chosen items of a halted machine and drops its storage.
    pub fn into_report(self) -> Result<Report> {
        let kind = self.kind();
        let steps = self.steps();
        match self {
            KnapsackMachine::Dynamic(machine) => {
                let solution = machine.traceback()?;
                let tape = machine.into_tape();
                Ok(Report {
                    kind,
                    total_value: tape.final_value(),
                    items: solution.items,
                    steps,
                    tape: Some(tape),
                })
            }
            KnapsackMachine::Enumeration(machine) => {
                let (total_value, solution) = machine.best_solution()?;
                Ok(Report {
                    kind,
                    total_value,
                    items: solution.items,
                    steps,
                    tape: None,
                })
            }
        }
    }
}

impl<'a> Machine for KnapsackMachine<'a> {
    fn state(&self) -> State {
        match self {
            KnapsackMachine::Dynamic(m) => m.state(),
            KnapsackMachine::Enumeration(m) => m.state(),
        }
    }

    fn steps(&self) -> u64 {
        match self {
            KnapsackMachine::Dynamic(m) => m.steps(),
            KnapsackMachine::Enumeration(m) => m.steps(),
        }
    }

    fn step(&mut self) -> Result<()> {
        match self {
            KnapsackMachine::Dynamic(m) => m.step(),
            KnapsackMachine::Enumeration(m) => m.step(),
        }
    }
}

/// Outcome of one solve.
#[derive(Serialize, Debug, Clone)]
pub struct Report {
    pub kind: MachineKind,
    pub total_value: u64,
    /// Chosen item indices, 0-based and ascending
    pub items: Vec<usize>,
    pub steps: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tape: Option<Tape>,
}

impl Report {
    pub fn solution(&self) -> Solution {
        Solution {
            items: self.items.clone(),
        }
    }
}

pub fn solve(
    challenge: &Challenge,
    kind: MachineKind,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Report> {
    let params = Params::initialize(hyperparameters)?;
    let mut machine = KnapsackMachine::new(kind, challenge, &params)?;
    machine.run(params.max_steps)?;
    let report = machine.into_report()?;
    info!(
        "{} machine: value {} with {} items in {} steps",
        report.kind,
        report.total_value,
        report.items.len(),
        report.steps
    );
    Ok(report)
}
