pub mod machine;
pub use machine::{Machine, State};
pub mod knapsack;
