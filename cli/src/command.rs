use std::str::FromStr;

use sapper_core::{Coord, Coord2, Intent};
use thiserror::Error;

/// A line typed by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Play(Intent),
    Show,
    Help,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("unknown command `{0}`, type `help` for the list of commands")]
    Unknown(String),
    #[error("`{0}` needs a row and a column")]
    MissingCoords(&'static str),
    #[error("`{0}` is not a valid coordinate")]
    BadCoord(String),
    #[error("unexpected `{0}` after the command")]
    Trailing(String),
}

pub(crate) const CONTROLS: &str = "\
Commands (rows and columns count from 0):
  r ROW COL    reveal a cell
  f ROW COL    flag or unflag a cell
  n            start a new game
  p            print the board
  q            quit
  h            show this help";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Show);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Play(Intent::RevealAt(coords("reveal", &mut words)?)),
            "f" | "flag" => Self::Play(Intent::ToggleFlagAt(coords("flag", &mut words)?)),
            "n" | "new" | "reset" => Self::Play(Intent::Reset),
            "q" | "quit" | "exit" => Self::Play(Intent::Quit),
            "p" | "print" | "show" => Self::Show,
            "h" | "help" | "?" => Self::Help,
            _ => return Err(CommandError::Unknown(verb.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::Trailing(extra.to_owned())),
            None => Ok(command),
        }
    }
}

fn coords<'a>(
    verb: &'static str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<Coord2, CommandError> {
    let mut next = || -> Result<Coord, CommandError> {
        let word = words.next().ok_or(CommandError::MissingCoords(verb))?;
        word.parse()
            .map_err(|_| CommandError::BadCoord(word.to_owned()))
    };
    let row = next()?;
    let col = next()?;
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_intents() {
        assert_eq!(
            "r 3 4".parse(),
            Ok(Command::Play(Intent::RevealAt((3, 4))))
        );
        assert_eq!(
            "  FLAG 0 12 ".parse(),
            Ok(Command::Play(Intent::ToggleFlagAt((0, 12))))
        );
        assert_eq!("reset".parse(), Ok(Command::Play(Intent::Reset)));
        assert_eq!("q".parse(), Ok(Command::Play(Intent::Quit)));
        assert_eq!("?".parse(), Ok(Command::Help));
        assert_eq!("".parse(), Ok(Command::Show));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            "dig 1 1".parse::<Command>(),
            Err(CommandError::Unknown("dig".into()))
        );
        assert_eq!(
            "r 1".parse::<Command>(),
            Err(CommandError::MissingCoords("reveal"))
        );
        assert_eq!(
            "f -1 2".parse::<Command>(),
            Err(CommandError::BadCoord("-1".into()))
        );
        assert_eq!(
            "r 1 70000".parse::<Command>(),
            Err(CommandError::BadCoord("70000".into()))
        );
        assert_eq!(
            "q now".parse::<Command>(),
            Err(CommandError::Trailing("now".into()))
        );
    }
}
