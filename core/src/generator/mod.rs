use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Chooses where the mines of a new game go.
pub trait MinePlacer {
    /// Reject a configuration this placer cannot honour. Called once when a board is built.
    fn check(&self, _config: &GameConfig) -> Result<()> {
        Ok(())
    }

    /// Produce a layout with exactly `config.mines` mines on a `config.size` grid.
    fn place(&mut self, config: &GameConfig) -> MineLayout;
}

/// What happens when the first reveal of a game lands on a mine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstReveal {
    /// The mine detonates, like any other reveal.
    #[default]
    Unprotected,
    /// The mine moves to the first safe cell in row-major order and the reveal proceeds.
    Relocate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size()).filter(|&coords| self[coords])
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}
