use super::*;

/// Places mines at a predetermined set of cells, every game.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPlacer {
    mines: Vec<Coord2>,
}

impl FixedPlacer {
    pub fn new(mine_coords: &[Coord2]) -> Self {
        let mut mines = mine_coords.to_vec();
        mines.sort_unstable();
        mines.dedup();
        Self { mines }
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    /// A validated configuration for these mines on a `size` grid.
    pub fn config(&self, size: Coord2) -> Result<GameConfig> {
        let config = GameConfig::new(size, self.mine_count())?;
        self.check(&config)?;
        Ok(config)
    }
}

impl MinePlacer for FixedPlacer {
    fn check(&self, config: &GameConfig) -> Result<()> {
        if let Some(&(row, col)) = self.mines.iter().find(|&&coords| !config.contains(coords)) {
            return Err(GameError::CoordinateOutOfRange { row, col });
        }
        if self.mine_count() != config.mines {
            return Err(GameError::InvalidMineCount {
                mines: self.mine_count(),
                max: config.max_mines(),
            });
        }
        Ok(())
    }

    fn place(&mut self, config: &GameConfig) -> MineLayout {
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        for &coords in &self.mines {
            mine_mask[coords.to_nd_index()] = true;
        }
        MineLayout::from_mine_mask(mine_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_matches_mine_count() {
        let placer = FixedPlacer::new(&[(0, 0), (0, 4), (4, 0)]);
        let config = placer.config((5, 5)).unwrap();

        assert_eq!(config, GameConfig::new_unchecked((5, 5), 3));
    }

    #[test]
    fn rejects_mines_outside_grid() {
        let placer = FixedPlacer::new(&[(0, 0), (5, 1)]);

        assert_eq!(
            placer.config((5, 5)),
            Err(GameError::CoordinateOutOfRange { row: 5, col: 1 })
        );
    }

    #[test]
    fn rejects_mismatched_config() {
        let placer = FixedPlacer::new(&[(1, 1)]);
        let config = GameConfig::new((3, 3), 2).unwrap();

        assert_eq!(
            placer.check(&config),
            Err(GameError::InvalidMineCount { mines: 1, max: 8 })
        );
    }

    #[test]
    fn duplicate_coords_count_once() {
        let mut placer = FixedPlacer::new(&[(1, 1), (1, 1)]);
        let config = placer.config((3, 3)).unwrap();

        assert_eq!(config.mines, 1);
        assert_eq!(placer.place(&config).mine_count(), 1);
    }
}
