use ndarray::Array2;
use serde::{Serialize, Serializer};
use std::fmt;

/// The DP table. Cell `(i, w)` is the best value reachable with the first `i`
/// items and total weight at most `w`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Array2<u64>,
}

impl Tape {
    pub fn new(num_items: usize, max_weight: usize) -> Self {
        Self {
            cells: Array2::zeros((num_items + 1, max_weight + 1)),
        }
    }

    /// Number of rows, i.e. item prefixes `0..=num_items`.
    pub fn num_rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns, i.e. capacities `0..=max_weight`.
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn get(&self, item_prefix: usize, weight: usize) -> u64 {
        self.cells[[item_prefix, weight]]
    }

    pub(crate) fn write(&mut self, item_prefix: usize, weight: usize, value: u64) {
        self.cells[[item_prefix, weight]] = value;
    }

    pub fn row(&self, item_prefix: usize) -> Vec<u64> {
        self.cells.row(item_prefix).to_vec()
    }

    /// Bottom-right cell: the optimum over all items at full capacity.
    pub fn final_value(&self) -> u64 {
        self.get(self.num_rows() - 1, self.width() - 1)
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            let line = row
                .iter()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl Serialize for Tape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.cells.rows().into_iter().map(|row| row.to_vec()))
    }
}
