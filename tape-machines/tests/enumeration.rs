use serde_json::json;
use std::cell::RefCell;
use tape_challenges::knapsack::{calculate_total_weight, Challenge, Solution};
use tape_machines::knapsack::enumeration::{self, EnumerationMachine};
use tape_machines::knapsack::Params;
use tape_machines::{Machine, State};

fn classic() -> Challenge {
    Challenge::new(50, vec![60, 100, 120], vec![10, 20, 30]).unwrap()
}

#[test]
fn test_classic_instance() {
    let challenge = classic();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();

    assert_eq!(machine.state(), State::Halt);
    assert_eq!(machine.best_value(), Some(220));
    let (value, solution) = machine.best_solution().unwrap();
    assert_eq!(value, 220);
    assert_eq!(solution.items, vec![1, 2]);
}

#[test]
fn test_explores_full_tree_without_capacity_limit() {
    // every subset fits, so the tree is complete: 2^(n+1) - 1 nodes
    let challenge = Challenge::new(100, vec![1, 2, 3], vec![1, 1, 1]).unwrap();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();

    // start + one pop per node + the final empty-frontier step
    assert_eq!(machine.steps(), 1 + 15 + 1);
    assert_eq!(machine.frontier_len(), 0);
    assert_eq!(machine.best_solution().unwrap().1.items, vec![0, 1, 2]);
}

#[test]
fn test_infeasible_inclusions_are_not_enqueued() {
    let challenge = Challenge::new(1, vec![5, 7], vec![2, 2]).unwrap();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();

    // only the all-exclude path exists: root, level 1, level 2
    assert_eq!(machine.steps(), 1 + 3 + 1);
    let (value, solution) = machine.best_solution().unwrap();
    assert_eq!(value, 0);
    assert!(solution.items.is_empty());
}

#[test]
fn test_first_step_seeds_root() {
    let challenge = classic();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    assert_eq!(machine.state(), State::Start);
    machine.step().unwrap();
    assert_eq!(machine.state(), State::Continue);
    assert_eq!(machine.frontier_len(), 1);

    machine.step().unwrap();
    assert_eq!(machine.frontier_len(), 2);
}

#[test]
fn test_no_items_halts_at_start() {
    let challenge = Challenge::new(3, vec![], vec![]).unwrap();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.step().unwrap();
    assert!(machine.is_halted());
    assert_eq!(machine.steps(), 1);
    let (value, solution) = machine.best_solution().unwrap();
    assert_eq!(value, 0);
    assert!(solution.items.is_empty());
}

#[test]
fn test_zero_capacity() {
    let challenge = Challenge::new(0, vec![3, 9], vec![2, 1]).unwrap();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();
    assert_eq!(machine.best_value(), Some(0));
}

#[test]
fn test_tie_only_value_is_checked() {
    let challenge = Challenge::new(4, vec![1, 4, 5], vec![1, 3, 4]).unwrap();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();
    let (value, solution) = machine.best_solution().unwrap();

    assert_eq!(value, challenge.compute_reference_value().unwrap());
    assert_eq!(challenge.evaluate_total_value(&solution).unwrap(), value);
    assert!(calculate_total_weight(&solution.items, &challenge.weights) <= 4);
}

#[test]
fn test_released_leaves_are_reused() {
    let challenge = Challenge::new(100, vec![1, 2, 3, 4], vec![1, 1, 1, 1]).unwrap();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();

    // 15 interior nodes plus the best leaf survive; the other leaves were released
    assert_eq!(machine.live_nodes(), 16);
    let best = machine.best().unwrap();
    assert_eq!(machine.node(best).level, 4);
    assert_eq!(machine.best_solution().unwrap().1.items, vec![0, 1, 2, 3]);
}

#[test]
fn test_path_reconstruction_follows_parents() {
    let challenge = classic();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();

    let best = machine.best().unwrap();
    let mut levels = Vec::new();
    let mut cursor = Some(best);
    while let Some(id) = cursor {
        levels.push(machine.node(id).level);
        cursor = machine.node(id).parent;
    }
    assert_eq!(levels, vec![3, 2, 1, 0]);
    assert_eq!(machine.reconstruct_path(best).items, vec![1, 2]);
}

#[test]
fn test_run_after_halt_is_noop() {
    let challenge = classic();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();
    let steps = machine.steps();

    machine.run(None).unwrap();
    assert_eq!(machine.state(), State::Halt);
    assert_eq!(machine.steps(), steps);
    assert_eq!(machine.best_value(), Some(220));
}

#[test]
fn test_step_after_halt_errors() {
    let challenge = classic();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.run(None).unwrap();
    assert!(machine
        .step()
        .unwrap_err()
        .to_string()
        .contains("already halted"));
}

#[test]
fn test_best_solution_before_halt_errors() {
    let challenge = classic();
    let mut machine = EnumerationMachine::new(&challenge, &Params::default()).unwrap();
    machine.step().unwrap();
    assert!(machine.best_solution().is_err());
    assert_eq!(machine.best_value(), None);
}

#[test]
fn test_item_count_guard() {
    let challenge = Challenge::new(10, vec![1; 6], vec![1; 6]).unwrap();
    let params = Params {
        max_enumeration_items: 5,
        ..Params::default()
    };
    let err = EnumerationMachine::new(&challenge, &params).err().unwrap();
    assert!(err.to_string().contains("max_enumeration_items"));

    let params = Params {
        max_enumeration_items: 6,
        ..Params::default()
    };
    assert!(EnumerationMachine::new(&challenge, &params).is_ok());
}

#[test]
fn test_independent_machines() {
    let a = classic();
    let b = Challenge::new(4, vec![1, 4, 5], vec![1, 3, 4]).unwrap();
    let mut first = EnumerationMachine::new(&a, &Params::default()).unwrap();
    let mut second = EnumerationMachine::new(&b, &Params::default()).unwrap();
    while !first.is_halted() || !second.is_halted() {
        if !first.is_halted() {
            first.step().unwrap();
        }
        if !second.is_halted() {
            second.step().unwrap();
        }
    }
    assert_eq!(first.best_value(), Some(220));
    assert_eq!(second.best_value(), Some(5));
}

#[test]
fn test_solve_challenge() {
    let challenge = classic();
    let saved = RefCell::new(None);
    let save_solution_fn = |s: &Solution| -> anyhow::Result<()> {
        *saved.borrow_mut() = Some(s.clone());
        Ok(())
    };
    let guard = json!({"max_enumeration_items": 2}).as_object().cloned();
    assert!(enumeration::solve_challenge(&challenge, &save_solution_fn, &guard).is_err());

    enumeration::solve_challenge(&challenge, &save_solution_fn, &None).unwrap();
    assert_eq!(saved.into_inner().unwrap().items, vec![1, 2]);
}
