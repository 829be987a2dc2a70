use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::BoardError;
use crate::pools::Pools;

pub const GRID_SIZE: usize = 5;
/// The fixed, non-sampled center cell marker.
pub const FREE_CELL: &str = "FREE";
pub const FREE_ROW: usize = 2;
pub const FREE_COL: usize = 2;

/// One page's realized content: a 5x5 grid of labels plus the title and
/// instructions to print above it. Immutable once built; consumed exactly
/// once when its page is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    title: String,
    instructions: String,
    cells: [[String; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    /// Builds a board by independently shuffling each column pool and
    /// taking its first five entries, then forcing the center cell to
    /// [`FREE_CELL`]. Fails if any pool is too small to sample without
    /// replacement.
    pub fn sample<R: Rng>(
        pools: &Pools,
        title: &str,
        instructions: &str,
        rng: &mut R,
    ) -> Result<Board, BoardError> {
        let mut columns: Vec<Vec<String>> = Vec::with_capacity(GRID_SIZE);
        for (index, pool) in pools.columns().iter().enumerate() {
            if pool.len() < GRID_SIZE {
                return Err(BoardError::PoolTooSmall {
                    column: index + 1,
                    count: pool.len(),
                });
            }
            let mut shuffled = pool.clone();
            shuffled.shuffle(rng);
            shuffled.truncate(GRID_SIZE);
            columns.push(shuffled);
        }

        let mut cells: [[String; GRID_SIZE]; GRID_SIZE] =
            std::array::from_fn(|row| std::array::from_fn(|col| columns[col][row].clone()));
        cells[FREE_ROW][FREE_COL] = FREE_CELL.to_string();

        Ok(Board {
            title: title.to_string(),
            instructions: instructions.to_string(),
            cells,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Row 0 is the top row as printed.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.cells[row][col]
    }
}
