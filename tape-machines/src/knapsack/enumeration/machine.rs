use crate::knapsack::Params;
use crate::machine::{halted_error, Machine, State};
use anyhow::{anyhow, Result};
use log::{debug, trace};
use std::collections::VecDeque;
use tape_challenges::knapsack::Challenge;

/// Handle into the machine's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A partial selection: the first `level` items have been decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    pub value_so_far: u64,
    pub weight_so_far: u64,
    pub level: usize,
    pub parent: Option<NodeId>,
    /// Whether item `level - 1` was taken on the way to this node
    pub included_this_level: bool,
}

/// Breadth-first enumeration of every include/exclude decision sequence.
///
/// Nodes live in an arena and refer to their parent by `NodeId`. Completed
/// leaves that are not the best so far are released back to a free list and
/// their slots reused; interior nodes stay alive until the machine is dropped
/// because a completed leaf may still walk through them.
pub struct EnumerationMachine<'a> {
    challenge: &'a Challenge,
    nodes: Vec<SearchNode>,
    free: Vec<NodeId>,
    frontier: VecDeque<NodeId>,
    best: Option<NodeId>,
    state: State,
    steps: u64,
}

impl<'a> EnumerationMachine<'a> {
    pub fn new(challenge: &'a Challenge, params: &Params) -> Result<Self> {
        if challenge.num_items > params.max_enumeration_items {
            return Err(anyhow!(
                "Enumeration of {} items exceeds max_enumeration_items ({}): the search tree has 2^{} leaves",
                challenge.num_items,
                params.max_enumeration_items,
                challenge.num_items
            ));
        }
        Ok(Self {
            challenge,
            nodes: Vec::new(),
            free: Vec::new(),
            frontier: VecDeque::new(),
            best: None,
            state: State::Start,
            steps: 0,
        })
    }

    pub fn challenge(&self) -> &'a Challenge {
        self.challenge
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn best(&self) -> Option<NodeId> {
        self.best
    }

    /// Value of the best completed selection, available once halted.
    pub fn best_value(&self) -> Option<u64> {
        if !self.is_halted() {
            return None;
        }
        self.best.map(|id| self.node(id).value_so_far)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Nodes currently held by the arena, free slots excluded.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn alloc(&mut self, node: SearchNode) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.free.push(id);
    }

    fn seed_root(&mut self) {
        let root = self.alloc(SearchNode {
            value_so_far: 0,
            weight_so_far: 0,
            level: 0,
            parent: None,
            included_this_level: false,
        });
        if self.challenge.num_items == 0 {
            self.best = Some(root);
            self.state = State::Halt;
            debug!("Enumeration machine halted at start: no items");
        } else {
            self.frontier.push_back(root);
            self.state = State::Continue;
        }
    }

    fn expand_front(&mut self) {
        let Some(id) = self.frontier.pop_front() else {
            self.state = State::Halt;
            debug!(
                "Enumeration machine halted after {} steps with value {:?}",
                self.steps + 1,
                self.best.map(|best| self.node(best).value_so_far)
            );
            return;
        };
        let node = self.node(id).clone();

        if node.level == self.challenge.num_items {
            let improves = match self.best {
                Some(best) => node.value_so_far > self.node(best).value_so_far,
                None => true,
            };
            if improves {
                trace!("New best leaf with value {}", node.value_so_far);
                if let Some(previous) = self.best.replace(id) {
                    self.release(previous);
                }
            } else {
                self.release(id);
            }
            return;
        }

        let item = node.level;
        let weight = self.challenge.weights[item] as u64;
        let value = self.challenge.values[item] as u64;
        if node.weight_so_far + weight <= self.challenge.max_weight as u64 {
            let include = self.alloc(SearchNode {
                value_so_far: node.value_so_far + value,
                weight_so_far: node.weight_so_far + weight,
                level: node.level + 1,
                parent: Some(id),
                included_this_level: true,
            });
            self.frontier.push_back(include);
        }
        let exclude = self.alloc(SearchNode {
            value_so_far: node.value_so_far,
            weight_so_far: node.weight_so_far,
            level: node.level + 1,
            parent: Some(id),
            included_this_level: false,
        });
        self.frontier.push_back(exclude);
    }
}

impl<'a> Machine for EnumerationMachine<'a> {
    fn state(&self) -> State {
        self.state
    }

    fn steps(&self) -> u64 {
        self.steps
    }

    fn step(&mut self) -> Result<()> {
        match self.state {
            State::Start => self.seed_root(),
            State::Continue => self.expand_front(),
            State::Halt => return Err(halted_error()),
        }
        self.steps += 1;
        Ok(())
    }
}
