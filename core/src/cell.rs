use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

/// Rules-engine state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
    /// The mine that ended the game.
    Detonated,
}

/// What a presentation layer should draw for a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "adjacent")]
pub enum Visual {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// A mine disclosed after the game was lost.
    Mine,
    /// A flag placed on a safe cell, disclosed after the game was lost.
    IncorrectFlag,
    Detonated,
}

impl Visual {
    /// Single-character rendering: `.` hidden, `F` flagged, digit for revealed (blank for zero),
    /// `*` for mines, `X` for incorrect flags.
    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => '.',
            Self::Flagged => 'F',
            Self::Revealed(0) => ' ',
            Self::Revealed(count) => (b'0' + count) as char,
            Self::Mine | Self::Detonated => '*',
            Self::IncorrectFlag => 'X',
        }
    }
}


#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: Coord,
    col: Coord,
    pub(crate) is_mine: bool,
    pub(crate) adjacent: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub(crate) const fn new((row, col): Coord2) -> Self {
        Self {
            row,
            col,
            is_mine: false,
            adjacent: 0,
            state: CellState::Hidden,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn col(&self) -> Coord {
        self.col
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    /// Mines among the neighbours; meaningless on a mine.
    pub const fn adjacent(&self) -> u8 {
        self.adjacent
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    /// Visual during play, which never discloses hidden mines.
    pub const fn visual(&self) -> Visual {
        match self.state {
            CellState::Hidden => Visual::Hidden,
            CellState::Flagged => Visual::Flagged,
            CellState::Revealed => Visual::Revealed(self.adjacent),
            CellState::Detonated => Visual::Detonated,
        }
    }

    /// Visual after a loss: hidden mines are shown and wrong flags are marked.
    pub const fn disclosed_visual(&self) -> Visual {
        match (self.state, self.is_mine) {
            (CellState::Hidden, true) => Visual::Mine,
            (CellState::Flagged, false) => Visual::IncorrectFlag,
            _ => self.visual(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.is_mine = false;
        self.adjacent = 0;
        self.state = CellState::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_is_hidden_and_safe() {
        let cell = Cell::new((2, 5));

        assert_eq!(cell.coords(), (2, 5));
        assert!(!cell.is_mine());
        assert_eq!(cell.adjacent(), 0);
        assert_eq!(cell.visual(), Visual::Hidden);
    }

    #[test]
    fn disclosure_marks_hidden_mines_and_wrong_flags() {
        let mut mine = Cell::new((0, 0));
        mine.is_mine = true;
        assert_eq!(mine.visual(), Visual::Hidden);
        assert_eq!(mine.disclosed_visual(), Visual::Mine);

        mine.state = CellState::Flagged;
        assert_eq!(mine.disclosed_visual(), Visual::Flagged);

        let mut safe = Cell::new((0, 1));
        safe.state = CellState::Flagged;
        assert_eq!(safe.disclosed_visual(), Visual::IncorrectFlag);

        safe.state = CellState::Revealed;
        safe.adjacent = 3;
        assert_eq!(safe.disclosed_visual(), Visual::Revealed(3));
    }

    #[test]
    fn symbols() {
        assert_eq!(Visual::Revealed(0).symbol(), ' ');
        assert_eq!(Visual::Revealed(7).symbol(), '7');
        assert_eq!(Visual::Detonated.symbol(), '*');
        assert_eq!(Visual::IncorrectFlag.symbol(), 'X');
        assert_eq!(Visual::default(), Visual::Hidden);
        assert_eq!(Visual::default().symbol(), '.');
    }

    #[test]
    fn visual_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Visual::Revealed(2)).unwrap();
        assert_eq!(json, r#"{"kind":"Revealed","adjacent":2}"#);

        let json = serde_json::to_string(&Visual::Mine).unwrap();
        assert_eq!(json, r#"{"kind":"Mine"}"#);
    }
}
