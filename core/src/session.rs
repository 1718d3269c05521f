use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Something the player asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    RevealAt(Coord2),
    ToggleFlagAt(Coord2),
    Reset,
    Quit,
}

/// What the host should do after an intent was handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// A single game from the player's point of view: one board, one clock, one presenter.
///
/// All mutation goes through `&mut self`, so intents and ticks are serialised by whoever owns
/// the session, whether that is a single event loop or a mutex.
#[derive(Debug)]
pub struct Session<Pr, P = RandomPlacer> {
    board: Board<P>,
    clock: Clock,
    presenter: Pr,
}

impl<Pr: Presenter, P: MinePlacer> Session<Pr, P> {
    pub fn new(board: Board<P>, presenter: Pr) -> Self {
        let mut session = Self {
            board,
            clock: Clock::new(),
            presenter,
        };
        session.publish_fresh_board();
        session
    }

    pub fn handle(&mut self, intent: Intent) -> Result<Control> {
        self.handle_at(intent, Instant::now())
    }

    /// Handle `intent` as if it happened at `now`, which only matters for starting the clock.
    pub fn handle_at(&mut self, intent: Intent, now: Instant) -> Result<Control> {
        log::trace!("intent: {:?}", intent);
        let result = match intent {
            Intent::RevealAt(coords) => self.reveal(coords, now),
            Intent::ToggleFlagAt(coords) => self.toggle_flag(coords),
            Intent::Reset => Ok(self.reset()),
            Intent::Quit => Ok(self.quit()),
        };
        if let Err(err) = &result {
            log::warn!("ignoring {:?}: {}", intent, err);
        }
        result
    }

    /// One second passed on the host's timer.
    pub fn tick(&mut self) -> Option<u32> {
        let seconds = self.clock.tick()?;
        self.presenter.time_changed(seconds);
        Some(seconds)
    }

    /// Publish every whole second elapsed up to `now` that has not been published yet.
    pub fn poll_clock(&mut self, now: Instant) -> Option<u32> {
        let ticks = self.clock.catch_up(now);
        for &seconds in &ticks {
            self.presenter.time_changed(seconds);
        }
        ticks.last().copied()
    }

    fn reveal(&mut self, coords: Coord2, now: Instant) -> Result<Control> {
        let mut changes = Vec::new();
        let outcome = self.board.reveal(coords, &mut changes)?;

        // a finished game reports the time up to `now`, not up to the last poll
        let mut owed = Vec::new();
        match outcome {
            RevealOutcome::NoChange => return Ok(Control::Continue),
            RevealOutcome::Revealed => {
                self.clock.start(now);
            }
            RevealOutcome::Won => {
                self.clock.start(now);
                owed = self.clock.catch_up(now);
                self.clock.stop();
            }
            RevealOutcome::Detonated => {
                owed = self.clock.catch_up(now);
                self.clock.stop();
            }
        }

        self.publish_changes(&changes);
        for seconds in owed {
            self.presenter.time_changed(seconds);
        }

        match outcome {
            RevealOutcome::Won => self.publish_outcome(Outcome::Won),
            RevealOutcome::Detonated => self.publish_outcome(Outcome::Lost),
            RevealOutcome::NoChange | RevealOutcome::Revealed => {}
        }
        Ok(Control::Continue)
    }

    fn toggle_flag(&mut self, coords: Coord2) -> Result<Control> {
        if self.board.toggle_flag(coords)?.has_update() {
            self.presenter
                .cell_changed(coords, self.board.visual_at(coords));
            self.presenter
                .flags_remaining_changed(self.board.flags_remaining());
        }
        Ok(Control::Continue)
    }

    fn reset(&mut self) -> Control {
        let in_progress = self.board.phase().is_playing() && self.board.has_progress();
        if in_progress && !self.presenter.confirm(Prompt::Reset) {
            log::debug!("reset declined");
            return Control::Continue;
        }

        self.clock.stop();
        self.clock.reset();
        self.board.reset();
        self.publish_fresh_board();
        Control::Continue
    }

    fn quit(&mut self) -> Control {
        if self.presenter.confirm(Prompt::Quit) {
            Control::Quit
        } else {
            Control::Continue
        }
    }

    fn publish_changes(&mut self, changes: &[CellChange]) {
        for change in changes {
            self.presenter.cell_changed(change.coords, change.visual);
        }
    }

    fn publish_outcome(&mut self, outcome: Outcome) {
        let seconds = self.clock.seconds();
        log::debug!("{:?} after {}s", outcome, seconds);
        self.presenter.game_outcome(outcome, seconds);
    }

    fn publish_fresh_board(&mut self) {
        self.presenter
            .board_reset(self.board.size(), self.board.mine_count());
        self.presenter
            .flags_remaining_changed(self.board.flags_remaining());
    }
}

impl<Pr, P> Session<Pr, P> {
    pub fn board(&self) -> &Board<P> {
        &self.board
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn presenter(&self) -> &Pr {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut Pr {
        &mut self.presenter
    }
}
