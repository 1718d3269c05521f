use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Questions a session asks before discarding state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    /// Start over while a game is in progress.
    Reset,
    Quit,
}

/// The outside world as seen by a [`Session`].
///
/// The session calls these; a presenter never calls back into the engine. Calls for one intent
/// arrive in order: cell changes in the order cells transitioned, then counters, then at most
/// one [`Presenter::game_outcome`] per game.
pub trait Presenter {
    fn cell_changed(&mut self, coords: Coord2, visual: Visual);

    fn flags_remaining_changed(&mut self, remaining: isize);

    fn time_changed(&mut self, seconds: u32);

    fn game_outcome(&mut self, outcome: Outcome, seconds: u32);

    /// A new game replaced the grid; every cell is hidden again.
    fn board_reset(&mut self, _size: Coord2, _mines: CellCount) {}

    /// Blocks until the player answers. The session holds the board for the whole prompt.
    fn confirm(&mut self, _prompt: Prompt) -> bool {
        true
    }
}

impl<T: Presenter + ?Sized> Presenter for &mut T {
    fn cell_changed(&mut self, coords: Coord2, visual: Visual) {
        (**self).cell_changed(coords, visual)
    }

    fn flags_remaining_changed(&mut self, remaining: isize) {
        (**self).flags_remaining_changed(remaining)
    }

    fn time_changed(&mut self, seconds: u32) {
        (**self).time_changed(seconds)
    }

    fn game_outcome(&mut self, outcome: Outcome, seconds: u32) {
        (**self).game_outcome(outcome, seconds)
    }

    fn board_reset(&mut self, size: Coord2, mines: CellCount) {
        (**self).board_reset(size, mines)
    }

    fn confirm(&mut self, prompt: Prompt) -> bool {
        (**self).confirm(prompt)
    }
}

/// One presenter call, as data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    CellChanged { row: Coord, col: Coord, visual: Visual },
    FlagsRemainingChanged { remaining: isize },
    TimeChanged { seconds: u32 },
    GameOutcome { outcome: Outcome, seconds: u32 },
    BoardReset { rows: Coord, cols: Coord, mines: CellCount },
}

/// Keeps every notification, answering prompts with a fixed reply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recorder {
    pub notifications: Vec<Notification>,
    pub prompts: Vec<Prompt>,
    pub decline: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declining() -> Self {
        Self {
            decline: true,
            ..Self::default()
        }
    }

    pub fn take(&mut self) -> Vec<Notification> {
        core::mem::take(&mut self.notifications)
    }

    pub fn cell_changes(&self) -> impl Iterator<Item = CellChange> + '_ {
        self.notifications.iter().filter_map(|notification| match *notification {
            Notification::CellChanged { row, col, visual } => {
                Some(CellChange::new((row, col), visual))
            }
            _ => None,
        })
    }

    pub fn times(&self) -> Vec<u32> {
        self.notifications
            .iter()
            .filter_map(|notification| match *notification {
                Notification::TimeChanged { seconds } => Some(seconds),
                _ => None,
            })
            .collect()
    }

    pub fn outcomes(&self) -> Vec<(Outcome, u32)> {
        self.notifications
            .iter()
            .filter_map(|notification| match *notification {
                Notification::GameOutcome { outcome, seconds } => Some((outcome, seconds)),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for Recorder {
    fn cell_changed(&mut self, (row, col): Coord2, visual: Visual) {
        self.notifications
            .push(Notification::CellChanged { row, col, visual });
    }

    fn flags_remaining_changed(&mut self, remaining: isize) {
        self.notifications
            .push(Notification::FlagsRemainingChanged { remaining });
    }

    fn time_changed(&mut self, seconds: u32) {
        self.notifications.push(Notification::TimeChanged { seconds });
    }

    fn game_outcome(&mut self, outcome: Outcome, seconds: u32) {
        self.notifications
            .push(Notification::GameOutcome { outcome, seconds });
    }

    fn board_reset(&mut self, (rows, cols): Coord2, mines: CellCount) {
        self.notifications
            .push(Notification::BoardReset { rows, cols, mines });
    }

    fn confirm(&mut self, prompt: Prompt) -> bool {
        self.prompts.push(prompt);
        !self.decline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_json_is_flat_and_tagged() {
        let notification = Notification::CellChanged {
            row: 1,
            col: 2,
            visual: Visual::Revealed(3),
        };

        let json = serde_json::to_string(&notification).unwrap();

        assert_eq!(
            json,
            r#"{"event":"cell_changed","row":1,"col":2,"visual":{"kind":"Revealed","adjacent":3}}"#
        );
    }

    #[test]
    fn recorder_answers_prompts_as_configured() {
        let mut yes = Recorder::new();
        let mut no = Recorder::declining();

        assert!(yes.confirm(Prompt::Reset));
        assert!(!no.confirm(Prompt::Quit));
        assert_eq!(no.prompts, vec![Prompt::Quit]);
    }
}
