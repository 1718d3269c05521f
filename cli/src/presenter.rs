use std::fmt::Write as _;
use std::io::Write;

use sapper_core::{CellCount, Coord2, Notification, Outcome, Presenter, Prompt, Visual};
use serde::Serialize;

/// Asks the player a yes/no question; blocks until answered.
pub(crate) type Confirm = Box<dyn FnMut(Prompt) -> bool + Send>;

fn question(prompt: Prompt) -> &'static str {
    match prompt {
        Prompt::Reset => "Abandon the current game and start a new one?",
        Prompt::Quit => "Quit?",
    }
}

/// Draws the board for a human, keeping its own copy of what every cell looks like.
pub(crate) struct TextPresenter<W> {
    out: W,
    size: Coord2,
    visuals: Vec<Visual>,
    flags_remaining: isize,
    seconds: u32,
    confirm: Confirm,
}

impl<W: Write> TextPresenter<W> {
    pub(crate) fn new(out: W, confirm: Confirm) -> Self {
        Self {
            out,
            size: (0, 0),
            visuals: Vec::new(),
            flags_remaining: 0,
            seconds: 0,
            confirm,
        }
    }

    fn index(&self, (row, col): Coord2) -> Option<usize> {
        let (rows, cols) = self.size;
        (row < rows && col < cols).then(|| row as usize * cols as usize + col as usize)
    }

    fn print(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            log::error!("could not write to terminal: {}", err);
        }
    }

    pub(crate) fn render(&mut self) {
        let (rows, cols) = self.size;
        let mut text = String::from("    ");
        for col in 0..cols {
            let _ = write!(text, "{col:>3}");
        }
        text.push('\n');
        for row in 0..rows {
            let _ = write!(text, "{row:>3} ");
            for col in 0..cols {
                let symbol = self
                    .index((row, col))
                    .map_or(' ', |index| self.visuals[index].symbol());
                let _ = write!(text, "{symbol:>3}");
            }
            text.push('\n');
        }
        let _ = writeln!(
            text,
            "Mines left: {}   Time: {}s",
            self.flags_remaining, self.seconds
        );
        self.print(&text);
    }

    pub(crate) fn notice(&mut self, message: &str) {
        self.print(&format!("{message}\n"));
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn cell_changed(&mut self, coords: Coord2, visual: Visual) {
        match self.index(coords) {
            Some(index) => self.visuals[index] = visual,
            None => log::warn!("cell {:?} outside of the drawn board", coords),
        }
    }

    fn flags_remaining_changed(&mut self, remaining: isize) {
        self.flags_remaining = remaining;
    }

    fn time_changed(&mut self, seconds: u32) {
        log::trace!("time: {}s", seconds);
        self.seconds = seconds;
    }

    fn game_outcome(&mut self, outcome: Outcome, seconds: u32) {
        self.seconds = seconds;
        let message = match outcome {
            Outcome::Won => format!("Cleared! You won in {seconds}s."),
            Outcome::Lost => format!("Boom! You lost after {seconds}s. Type `n` for a new game."),
        };
        self.notice(&message);
    }

    fn board_reset(&mut self, size: Coord2, mines: CellCount) {
        self.size = size;
        self.visuals = vec![Visual::Hidden; size.0 as usize * size.1 as usize];
        self.seconds = 0;
        self.notice(&format!("New game: {}x{}, {} mines.", size.0, size.1, mines));
    }

    fn confirm(&mut self, prompt: Prompt) -> bool {
        self.print(&format!("{} [y/N] ", question(prompt)));
        (self.confirm)(prompt)
    }
}

/// Events only the host emits, next to the session's [`Notification`]s.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum HostEvent<'a> {
    Confirm { prompt: Prompt, question: &'a str },
    Info { message: &'a str },
    Error { message: &'a str },
}

/// One JSON object per line for every presenter call, for scripts and other frontends.
pub(crate) struct JsonPresenter<W> {
    out: W,
    confirm: Confirm,
}

impl<W: Write> JsonPresenter<W> {
    pub(crate) fn new(out: W, confirm: Confirm) -> Self {
        Self { out, confirm }
    }

    fn emit(&mut self, event: &impl Serialize) {
        let result = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(err) = result {
            log::error!("could not write event: {}", err);
        }
    }

    pub(crate) fn info(&mut self, message: &str) {
        self.emit(&HostEvent::Info { message });
    }

    pub(crate) fn error(&mut self, message: &str) {
        self.emit(&HostEvent::Error { message });
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn cell_changed(&mut self, (row, col): Coord2, visual: Visual) {
        self.emit(&Notification::CellChanged { row, col, visual });
    }

    fn flags_remaining_changed(&mut self, remaining: isize) {
        self.emit(&Notification::FlagsRemainingChanged { remaining });
    }

    fn time_changed(&mut self, seconds: u32) {
        self.emit(&Notification::TimeChanged { seconds });
    }

    fn game_outcome(&mut self, outcome: Outcome, seconds: u32) {
        self.emit(&Notification::GameOutcome { outcome, seconds });
    }

    fn board_reset(&mut self, (rows, cols): Coord2, mines: CellCount) {
        self.emit(&Notification::BoardReset { rows, cols, mines });
    }

    fn confirm(&mut self, prompt: Prompt) -> bool {
        self.emit(&HostEvent::Confirm {
            prompt,
            question: question(prompt),
        });
        (self.confirm)(prompt)
    }
}

/// The presenter picked on the command line.
pub(crate) enum HostPresenter<W> {
    Text(TextPresenter<W>),
    Json(JsonPresenter<W>),
}

impl<W: Write> HostPresenter<W> {
    /// Redraw after a command; only the text view draws anything.
    pub(crate) fn render(&mut self) {
        if let Self::Text(text) = self {
            text.render();
        }
    }

    /// Help and other messages for the player.
    pub(crate) fn info(&mut self, message: &str) {
        match self {
            Self::Text(text) => text.notice(message),
            Self::Json(json) => json.info(message),
        }
    }

    /// A command that could not be carried out.
    pub(crate) fn error(&mut self, message: &str) {
        match self {
            Self::Text(text) => text.notice(message),
            Self::Json(json) => json.error(message),
        }
    }
}

impl<W: Write> Presenter for HostPresenter<W> {
    fn cell_changed(&mut self, coords: Coord2, visual: Visual) {
        match self {
            Self::Text(text) => text.cell_changed(coords, visual),
            Self::Json(json) => json.cell_changed(coords, visual),
        }
    }

    fn flags_remaining_changed(&mut self, remaining: isize) {
        match self {
            Self::Text(text) => text.flags_remaining_changed(remaining),
            Self::Json(json) => json.flags_remaining_changed(remaining),
        }
    }

    fn time_changed(&mut self, seconds: u32) {
        match self {
            Self::Text(text) => text.time_changed(seconds),
            Self::Json(json) => json.time_changed(seconds),
        }
    }

    fn game_outcome(&mut self, outcome: Outcome, seconds: u32) {
        match self {
            Self::Text(text) => text.game_outcome(outcome, seconds),
            Self::Json(json) => json.game_outcome(outcome, seconds),
        }
    }

    fn board_reset(&mut self, size: Coord2, mines: CellCount) {
        match self {
            Self::Text(text) => text.board_reset(size, mines),
            Self::Json(json) => json.board_reset(size, mines),
        }
    }

    fn confirm(&mut self, prompt: Prompt) -> bool {
        match self {
            Self::Text(text) => text.confirm(prompt),
            Self::Json(json) => json.confirm(prompt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::{Board, Intent, Session};

    fn always(answer: bool) -> Confirm {
        Box::new(move |_| answer)
    }

    fn output(bytes: &[u8]) -> &str {
        std::str::from_utf8(bytes).unwrap()
    }

    #[test]
    fn text_view_follows_the_session() {
        let board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        let mut session = Session::new(board, TextPresenter::new(Vec::new(), always(true)));

        session.handle(Intent::ToggleFlagAt((0, 0))).unwrap();
        session.handle(Intent::RevealAt((1, 1))).unwrap();
        let presenter = session.presenter_mut();
        presenter.out.clear();
        presenter.render();

        assert_eq!(
            output(&presenter.out),
            "      0  1  2\n  0   F  .  .\n  1   .  1  .\n  2   .  .  .\nMines left: 0   Time: 0s\n"
        );
    }

    #[test]
    fn text_view_announces_outcome() {
        let board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        let mut session = Session::new(board, TextPresenter::new(Vec::new(), always(true)));

        session.handle(Intent::RevealAt((0, 0))).unwrap();

        let text = output(&session.presenter().out);
        assert!(text.starts_with("New game: 3x3, 1 mines.\n"));
        assert!(text.ends_with("Boom! You lost after 0s. Type `n` for a new game.\n"));
    }

    #[test]
    fn text_view_asks_before_reset() {
        let board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        let mut session = Session::new(board, TextPresenter::new(Vec::new(), always(false)));
        session.handle(Intent::RevealAt((1, 1))).unwrap();

        session.handle(Intent::Reset).unwrap();

        assert!(output(&session.presenter().out).ends_with("start a new one? [y/N] "));
        assert!(session.board().has_progress());
    }

    #[test]
    fn json_view_writes_one_event_per_line() {
        let board = Board::with_mines((3, 3), &[(0, 0)]).unwrap();
        let mut session = Session::new(board, JsonPresenter::new(Vec::new(), always(true)));

        session.handle(Intent::ToggleFlagAt((2, 2))).unwrap();
        session.handle(Intent::Quit).unwrap();

        let lines: Vec<_> = output(&session.presenter().out).lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"event":"board_reset","rows":3,"cols":3,"mines":1}"#,
                r#"{"event":"flags_remaining_changed","remaining":1}"#,
                r#"{"event":"cell_changed","row":2,"col":2,"visual":{"kind":"Flagged"}}"#,
                r#"{"event":"flags_remaining_changed","remaining":0}"#,
                r#"{"event":"confirm","prompt":"Quit","question":"Quit?"}"#,
            ]
        );
    }

    #[test]
    fn json_tells_help_apart_from_errors() {
        let mut presenter = HostPresenter::Json(JsonPresenter::new(Vec::new(), always(true)));
        presenter.info("r ROW COL");
        presenter.error("bad input");
        presenter.render();

        let HostPresenter::Json(json) = presenter else {
            unreachable!()
        };
        assert_eq!(
            output(&json.out),
            "{\"event\":\"info\",\"message\":\"r ROW COL\"}\n\
             {\"event\":\"error\",\"message\":\"bad input\"}\n"
        );
    }

    #[test]
    fn text_prints_help_and_errors_alike() {
        let mut presenter = HostPresenter::Text(TextPresenter::new(Vec::new(), always(true)));
        presenter.info("help");
        presenter.error("oops");

        let HostPresenter::Text(text) = presenter else {
            unreachable!()
        };
        assert_eq!(output(&text.out), "help\noops\n");
    }
}
