//! Board engine for single-player Minesweeper.
//!
//! A [`Board`] owns the cell grid and every rule of the game, a [`Clock`]
//! counts elapsed seconds, and a [`Session`] routes player [`Intent`]s into
//! both while publishing changes through a [`Presenter`]. Nothing here does
//! I/O; hosts supply the event loop, the timer source and the rendering.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use clock::*;
pub use error::*;
pub use generator::*;
pub use presenter::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod clock;
mod error;
mod generator;
mod presenter;
mod session;
mod types;

/// Smallest allowed row or column count.
pub const MIN_SIDE: Coord = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.size;
        if rows < MIN_SIDE || cols < MIN_SIDE {
            return Err(GameError::InvalidDimensions { rows, cols });
        }
        let max = self.max_mines();
        if self.mines < 1 || self.mines > max {
            return Err(GameError::InvalidMineCount {
                mines: self.mines,
                max,
            });
        }
        Ok(())
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// At least one cell must stay safe.
    pub const fn max_mines(&self) -> CellCount {
        self.total_cells().saturating_sub(1)
    }

    /// Number of cells that must be revealed to win.
    pub const fn revealable(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub const fn contains(&self, (row, col): Coord2) -> bool {
        row < self.size.0 && col < self.size.1
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

/// The classic fixed presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Easy => GameConfig::new_unchecked((9, 9), 10),
            Medium => GameConfig::new_unchecked((16, 16), 40),
            Hard => GameConfig::new_unchecked((16, 30), 99),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Detonated,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Detonated => true,
            Won => true,
        }
    }
}
