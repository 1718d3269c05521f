use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling: draw a cell, retry if it already holds a mine.
///
/// Termination relies on `GameConfig` keeping at least one cell free, so the expected number of
/// draws stays below `mines * cells / (cells - mines + 1)`.
#[derive(Clone, Debug)]
pub struct RandomPlacer {
    rng: SmallRng,
}

impl RandomPlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl MinePlacer for RandomPlacer {
    fn place(&mut self, config: &GameConfig) -> MineLayout {
        let (rows, cols) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut mines_placed: CellCount = 0;
        let mut draws: u64 = 0;

        while mines_placed < config.mines {
            let coords = (
                self.rng.random_range(0..rows),
                self.rng.random_range(0..cols),
            );
            draws += 1;
            if mine_mask[coords.to_nd_index()] {
                continue;
            }
            mine_mask[coords.to_nd_index()] = true;
            mines_placed += 1;
        }

        log::trace!("placed {} mines in {} draws", mines_placed, draws);
        MineLayout::from_mine_mask(mine_mask)
    }
}
