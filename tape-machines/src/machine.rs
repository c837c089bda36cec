use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Control state of a machine. Transitions only ever move forward:
/// `Start -> Continue -> Halt`, with `Start -> Halt` allowed for empty input.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Start,
    Continue,
    Halt,
}

pub trait Machine {
    fn state(&self) -> State;

    /// Number of `step` calls that have completed.
    fn steps(&self) -> u64;

    /// Performs exactly one transition. Errors if the machine has already halted.
    fn step(&mut self) -> Result<()>;

    fn is_halted(&self) -> bool {
        self.state() == State::Halt
    }

    /// Steps until `Halt`. A halted machine is left untouched.
    ///
    /// With a budget, gives up once `steps()` reaches it; the machine keeps its
    /// progress and can be resumed with a larger budget.
    fn run(&mut self, max_steps: Option<u64>) -> Result<()> {
        while !self.is_halted() {
            if let Some(max_steps) = max_steps {
                if self.steps() >= max_steps {
                    return Err(anyhow!(
                        "Step budget ({}) exhausted before the machine halted",
                        max_steps
                    ));
                }
            }
            self.step()?;
        }
        Ok(())
    }
}

pub(crate) fn halted_error() -> anyhow::Error {
    anyhow!("machine has already halted")
}
