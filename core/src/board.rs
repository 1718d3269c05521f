use core::fmt;
use core::ops::Index;
use std::collections::VecDeque;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// A cell whose visual changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub coords: Coord2,
    pub visual: Visual,
}

impl CellChange {
    pub const fn new(coords: Coord2, visual: Visual) -> Self {
        Self { coords, visual }
    }
}

/// The grid of cells and every rule of the game.
///
/// Mutating operations append the visual changes they cause to a caller-supplied list, in the
/// order the cells transitioned. Once the phase leaves [`Phase::Playing`] only [`Board::reset`]
/// changes anything.
#[derive(Clone, Debug)]
pub struct Board<P = RandomPlacer> {
    config: GameConfig,
    first_reveal: FirstReveal,
    placer: P,
    cells: Array2<Cell>,
    revealed_count: CellCount,
    flags_remaining: isize,
    phase: Phase,
    started: bool,
    detonated: Option<Coord2>,
}

impl Board<RandomPlacer> {
    pub fn random(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, RandomPlacer::new(seed))
    }
}

impl Board<FixedPlacer> {
    /// A board whose mines always sit at `mine_coords`.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let placer = FixedPlacer::new(mine_coords);
        let config = placer.config(size)?;
        Self::new(config, placer)
    }
}

impl<P: MinePlacer> Board<P> {
    pub fn new(config: GameConfig, placer: P) -> Result<Self> {
        config.validate()?;
        placer.check(&config)?;

        let cells = Array2::from_shape_fn(config.size.to_nd_index(), |(row, col)| {
            Cell::new((row as Coord, col as Coord))
        });
        let mut board = Self {
            config,
            first_reveal: FirstReveal::default(),
            placer,
            cells,
            revealed_count: 0,
            flags_remaining: config.mines as isize,
            phase: Phase::Playing,
            started: false,
            detonated: None,
        };
        board.reset();
        Ok(board)
    }

    pub fn with_first_reveal(mut self, first_reveal: FirstReveal) -> Self {
        self.first_reveal = first_reveal;
        self
    }

    /// Start a fresh game on the same dimensions with a newly drawn layout.
    pub fn reset(&mut self) {
        self.phase = Phase::Playing;
        self.revealed_count = 0;
        self.flags_remaining = self.config.mines as isize;
        self.started = false;
        self.detonated = None;

        self.cells.iter_mut().for_each(Cell::clear);

        let layout = self.placer.place(&self.config);
        debug_assert_eq!(layout.size(), self.config.size);
        debug_assert_eq!(layout.mine_count(), self.config.mines);
        for coords in layout.mine_coords() {
            self.cells[coords.to_nd_index()].is_mine = true;
        }
        self.compute_adjacency();

        log::debug!(
            "new game {}x{} with {} mines",
            self.config.rows(),
            self.config.cols(),
            self.config.mines
        );
    }

    /// Reveal a cell, flood-filling outward from it when it has no adjacent mines.
    pub fn reveal(
        &mut self,
        coords: Coord2,
        changes: &mut Vec<CellChange>,
    ) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if !self.phase.is_playing() {
            return Ok(RevealOutcome::NoChange);
        }

        let cell = self.cells[coords.to_nd_index()];
        if cell.state != CellState::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        if cell.is_mine {
            if !self.started && self.first_reveal == FirstReveal::Relocate {
                self.relocate_mine(coords);
            } else {
                self.detonate(coords, changes);
                return Ok(RevealOutcome::Detonated);
            }
        }

        self.started = true;
        self.cascade(coords, changes);

        if self.revealed_count == self.config.revealable() {
            self.phase = Phase::Won;
            log::debug!("game won");
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;

        if !self.phase.is_playing() {
            return Ok(FlagOutcome::NoChange);
        }

        let cell = &mut self.cells[coords.to_nd_index()];
        Ok(match cell.state {
            CellState::Hidden => {
                cell.state = CellState::Flagged;
                self.flags_remaining -= 1;
                FlagOutcome::Flagged
            }
            CellState::Flagged => {
                cell.state = CellState::Hidden;
                self.flags_remaining += 1;
                FlagOutcome::Unflagged
            }
            CellState::Revealed | CellState::Detonated => FlagOutcome::NoChange,
        })
    }

    fn cascade(&mut self, root: Coord2, changes: &mut Vec<CellChange>) {
        let mut to_visit = VecDeque::from([root]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = &mut self.cells[visit_coords.to_nd_index()];

            // skip flagged or already revealed cells, and never step on a mine
            if cell.state != CellState::Hidden || cell.is_mine {
                continue;
            }

            cell.state = CellState::Revealed;
            let adjacent = cell.adjacent;
            self.revealed_count += 1;
            changes.push(CellChange::new(visit_coords, Visual::Revealed(adjacent)));
            log::trace!("revealed {:?}, adjacent mines: {}", visit_coords, adjacent);

            if adjacent == 0 {
                let cells = &self.cells;
                to_visit.extend(
                    cells
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| cells[pos.to_nd_index()].state == CellState::Hidden),
                );
            }
        }
    }

    fn detonate(&mut self, coords: Coord2, changes: &mut Vec<CellChange>) {
        self.cells[coords.to_nd_index()].state = CellState::Detonated;
        self.detonated = Some(coords);
        changes.push(CellChange::new(coords, Visual::Detonated));
        self.lose(changes);
    }

    /// Ends the game and discloses every hidden mine and wrong flag.
    fn lose(&mut self, changes: &mut Vec<CellChange>) {
        self.phase = Phase::Lost;
        log::debug!("game lost at {:?}", self.detonated);

        changes.extend(
            self.cells
                .iter()
                .filter(|cell| cell.disclosed_visual() != cell.visual())
                .map(|cell| CellChange::new(cell.coords(), cell.disclosed_visual())),
        );
    }

    /// Moves the mine at `coords` to the first safe cell in row-major order.
    fn relocate_mine(&mut self, coords: Coord2) {
        let target = iter_coords(self.config.size)
            .find(|&pos| !self.cells[pos.to_nd_index()].is_mine);
        // `GameConfig` guarantees at least one safe cell
        let Some(target) = target else {
            return;
        };

        self.cells[coords.to_nd_index()].is_mine = false;
        self.cells[target.to_nd_index()].is_mine = true;
        self.compute_adjacency();
        log::debug!("first reveal hit a mine, moved it from {:?} to {:?}", coords, target);
    }

    fn compute_adjacency(&mut self) {
        for coords in iter_coords(self.config.size) {
            let adjacent = if self.cells[coords.to_nd_index()].is_mine {
                0
            } else {
                self.count_adjacent_mines(coords)
            };
            self.cells[coords.to_nd_index()].adjacent = adjacent;
        }
    }

    fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_mine)
            .count() as u8
    }
}

impl<P> Board<P> {
    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.config.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::CoordinateOutOfRange {
                row: coords.0,
                col: coords.1,
            })
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn revealable(&self) -> CellCount {
        self.config.revealable()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Mines minus flags; negative when the player over-flags.
    pub fn flags_remaining(&self) -> isize {
        self.flags_remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn first_reveal(&self) -> FirstReveal {
        self.first_reveal
    }

    /// Whether the player has revealed anything in this game.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether anything distinguishes this game from a fresh one.
    pub fn has_progress(&self) -> bool {
        self.started || self.flags_remaining != self.config.mines as isize
    }

    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// What the player should see at `coords`, disclosing mines once the game is lost.
    pub fn visual_at(&self, coords: Coord2) -> Visual {
        let cell = &self[coords];
        match self.phase {
            Phase::Lost => cell.disclosed_visual(),
            _ => cell.visual(),
        }
    }

    /// Every cell's visual in row-major order.
    pub fn visuals(&self) -> impl Iterator<Item = CellChange> + '_ {
        iter_coords(self.config.size).map(|coords| CellChange::new(coords, self.visual_at(coords)))
    }

    /// The full mine and adjacency map, regardless of what has been revealed.
    pub fn dump_layout(&self) -> String {
        let mut out = String::new();
        for row in self.cells.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| {
                    if cell.is_mine {
                        "*".to_string()
                    } else {
                        cell.adjacent.to_string()
                    }
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

impl<P> Index<Coord2> for Board<P> {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// One row per line, using [`Visual::symbol`].
impl<P> fmt::Display for Board<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.config.size;
        for row in 0..rows {
            for col in 0..cols {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", self.visual_at((row, col)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
