use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, Command};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::{fs, io::Read, path::Path, path::PathBuf};
use tape_challenges::knapsack::{Challenge, Difficulty, Solution};
use tape_machines::knapsack::{solve, MachineKind, Report};
use tape_utils::{dejsonify, jsonify, jsonify_pretty, load_json, u8s_from_str};

fn cli() -> Command {
    Command::new("tape-runtime")
        .about("Solves 0/1 knapsack instances with tape machines")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Runs a machine on an instance and prints the optimum")
                .arg(
                    arg!(<INSTANCE> "Instance json string, path to a json or text file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--algorithm [ALGORITHM] "Machine to run: 'dp' or 'enumeration'")
                        .default_value("dp")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"print-tape" "Print the filled DP tape before the result")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the report will be saved to this file path as json")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generates a random instance")
                .arg(
                    arg!(<SEED> "A string used in seed generation")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<NUM_ITEMS> "Number of items")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"capacity-percent" [CAPACITY_PERCENT] "Capacity as a percentage of the total weight")
                        .default_value("50")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Checks that a solution is feasible and optimal")
                .arg(
                    arg!(<INSTANCE> "Instance json string, path to a json or text file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve_instance(
            sub_m.get_one::<String>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("algorithm").unwrap().clone(),
            sub_m.get_one::<String>("hyperparameters").cloned(),
            sub_m.get_flag("print-tape"),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("generate", sub_m)) => generate_instance(
            sub_m.get_one::<String>("SEED").unwrap().clone(),
            *sub_m.get_one::<usize>("NUM_ITEMS").unwrap(),
            *sub_m.get_one::<u32>("capacity-percent").unwrap(),
        ),
        Some(("verify", sub_m)) => verify_solution(
            sub_m.get_one::<String>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub fn solve_instance(
    instance: String,
    algorithm: String,
    hyperparameters: Option<String>,
    print_tape: bool,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let challenge = load_instance(&instance)?;
    let kind: MachineKind = algorithm.parse()?;
    let hyperparameters = match hyperparameters {
        Some(h) => Some(load_json::<Map<String, Value>>(&h)?),
        None => None,
    };
    debug!(
        "Solving {} items with capacity {} using the {} machine",
        challenge.num_items, challenge.max_weight, kind
    );

    let report = solve(&challenge, kind, &hyperparameters)?;

    if print_tape {
        match &report.tape {
            Some(tape) => print!("{}", tape),
            None => warn!("The {} machine has no tape to print", kind),
        }
    }
    print!("{}", format_result(&report));

    if let Some(path) = output_file {
        fs::write(&path, jsonify(&report))
            .map_err(|e| anyhow!("Failed to write report to {}: {}", path.display(), e))?;
    }
    Ok(())
}

/// The two result lines printed by `solve`: total value, then the chosen
/// 0-based item indices separated by spaces.
fn format_result(report: &Report) -> String {
    format!(
        "Total value: {}\nChosen items: {}\n",
        report.total_value,
        report
            .items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    )
}

pub fn generate_instance(seed: String, num_items: usize, capacity_percent: u32) -> Result<()> {
    let difficulty = Difficulty {
        num_items,
        capacity_percent,
    };
    let challenge = Challenge::generate_instance(&u8s_from_str(&seed), &difficulty)?;
    println!("{}", jsonify_pretty(&challenge));
    Ok(())
}

pub fn verify_solution(instance: String, solution: String) -> Result<()> {
    let challenge = load_instance(&instance)?;
    let solution = load_json::<Solution>(&solution)?;
    challenge
        .verify_solution(&solution)
        .map_err(|e| anyhow!("Invalid solution: {}", e))?;
    println!("Solution is valid");
    Ok(())
}

/// Reads an instance from stdin (`-`), a file, or the argument itself. Content
/// starting with `{` is json, anything else is the plain integer stream.
fn load_instance(instance: &str) -> Result<Challenge> {
    let content = if instance == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read instance from stdin: {}", e))?;
        buffer
    } else if Path::new(instance).is_file() {
        fs::read_to_string(instance)
            .map_err(|e| anyhow!("Failed to read instance file {}: {}", instance, e))?
    } else {
        instance.to_string()
    };

    if content.trim_start().starts_with('{') {
        dejsonify::<Challenge>(&content).map_err(|e| anyhow!("Failed to parse instance: {}", e))
    } else {
        Challenge::from_tokens(&content)
    }
}
