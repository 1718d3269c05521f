use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use anyhow::{Context, anyhow};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sapper_core::{
    Board, CellCount, Control, Coord, Difficulty, FirstReveal, GameConfig, Prompt, RandomPlacer,
    Session,
};
use tracing_subscriber::filter::LevelFilter;
use web_time::{Duration, Instant};

mod command;
mod presenter;

use command::{CONTROLS, Command};
use presenter::{Confirm, HostPresenter, JsonPresenter, TextPresenter};

type SharedSession = Arc<Mutex<Session<HostPresenter<Stdout>, RandomPlacer>>>;

/// Longest the clock thread sleeps between polls, so it notices shutdown.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum Preset {
    Easy,
    Medium,
    Hard,
}

impl From<Preset> for Difficulty {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Easy => Self::Easy,
            Preset::Medium => Self::Medium,
            Preset::Hard => Self::Hard,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum Format {
    /// Draw the board after every command
    Text,
    /// One JSON event per line
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Board preset
    #[arg(short, long, value_enum, default_value_t = Preset::Easy)]
    difficulty: Preset,

    /// Custom number of rows
    #[arg(long, requires_all = ["cols", "mines"], conflicts_with = "difficulty")]
    rows: Option<Coord>,

    /// Custom number of columns
    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<Coord>,

    /// Custom number of mines
    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Move a mine out of the way if the first reveal hits one
    #[arg(long)]
    safe_start: bool,

    /// How to show the game
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        match (self.rows, self.cols, self.mines) {
            (Some(rows), Some(cols), Some(mines)) => Ok(GameConfig::new((rows, cols), mines)?),
            _ => Ok(Difficulty::from(self.difficulty).config()),
        }
    }

    fn first_reveal(&self) -> FirstReveal {
        if self.safe_start {
            FirstReveal::Relocate
        } else {
            FirstReveal::Unprotected
        }
    }

    fn presenter(&self) -> HostPresenter<Stdout> {
        let confirm: Confirm = if self.yes {
            Box::new(|_| true)
        } else {
            Box::new(ask_stdin)
        };
        match self.format {
            Format::Text => HostPresenter::Text(TextPresenter::new(io::stdout(), confirm)),
            Format::Json => HostPresenter::Json(JsonPresenter::new(io::stdout(), confirm)),
        }
    }
}

fn init_logging(verbose: &Verbosity<WarnLevel>) {
    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn ask_stdin(prompt: Prompt) -> bool {
    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(_) => {
            let answer = answer.trim().to_ascii_lowercase();
            log::debug!("{:?} answered {:?}", prompt, answer);
            matches!(answer.as_str(), "y" | "yes")
        }
        Err(err) => {
            log::error!("could not read answer: {}", err);
            false
        }
    }
}

fn lock(session: &SharedSession) -> anyhow::Result<MutexGuard<'_, Session<HostPresenter<Stdout>>>> {
    session
        .lock()
        .map_err(|_| anyhow!("game state poisoned by a panicked thread"))
}

/// Feeds the session's clock from wall time until `done` is set.
fn spawn_clock(session: SharedSession, done: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !done.load(Ordering::Acquire) {
            let wait = {
                let Ok(mut session) = lock(&session) else {
                    log::error!("clock stopped: game state poisoned");
                    return;
                };
                let now = Instant::now();
                session.poll_clock(now);
                session
                    .clock()
                    .next_deadline()
                    .map_or(IDLE_POLL, |deadline| {
                        deadline.saturating_duration_since(now).min(IDLE_POLL)
                    })
            };
            thread::sleep(wait);
        }
    })
}

fn run(session: &SharedSession, format: Format) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        if format == Format::Text {
            let mut stdout = io::stdout();
            stdout.write_all(b"> ")?;
            stdout.flush()?;
        }

        line.clear();
        if stdin.read_line(&mut line).context("reading command")? == 0 {
            log::debug!("end of input");
            return Ok(());
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                lock(session)?.presenter_mut().error(&err.to_string());
                continue;
            }
        };

        let mut session = lock(session)?;
        match command {
            Command::Help => session.presenter_mut().info(CONTROLS),
            Command::Show => session.presenter_mut().render(),
            Command::Play(intent) => match session.handle(intent) {
                Ok(Control::Quit) => return Ok(()),
                Ok(Control::Continue) => session.presenter_mut().render(),
                Err(err) => session.presenter_mut().error(&err.to_string()),
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);
    log::debug!("{:?}", args);

    let config = args.game_config()?;
    let placer = match args.seed {
        Some(seed) => RandomPlacer::new(seed),
        None => RandomPlacer::from_entropy(),
    };
    let board = Board::new(config, placer)?.with_first_reveal(args.first_reveal());
    let session: SharedSession = Arc::new(Mutex::new(Session::new(board, args.presenter())));

    {
        let mut session = lock(&session)?;
        if args.format == Format::Text {
            session.presenter_mut().info(CONTROLS);
        }
        session.presenter_mut().render();
    }

    let done = Arc::new(AtomicBool::new(false));
    let clock = spawn_clock(Arc::clone(&session), Arc::clone(&done));

    let result = run(&session, args.format);

    done.store(true, Ordering::Release);
    if clock.join().is_err() {
        log::error!("clock thread panicked");
    }
    result
}
