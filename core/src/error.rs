use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board dimensions {rows}x{cols}, both must be at least 3")]
    InvalidDimensions { rows: Coord, cols: Coord },
    #[error("Invalid mine count {mines}, must be between 1 and {max}")]
    InvalidMineCount { mines: CellCount, max: CellCount },
    #[error("Coordinates ({row}, {col}) are outside the board")]
    CoordinateOutOfRange { row: Coord, col: Coord },
}

pub type Result<T> = core::result::Result<T, GameError>;
