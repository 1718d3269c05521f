use web_time::{Duration, Instant};

pub const TICK: Duration = Duration::from_secs(1);

/// Elapsed-seconds counter for one game.
///
/// The clock does not own a timer. Hosts either call [`Clock::tick`] from a 1 Hz source, or
/// poll [`Clock::catch_up`] at any rate and get one tick per whole second since [`Clock::start`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Clock {
    seconds: u32,
    running: bool,
    started_at: Option<Instant>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start counting from zero. Returns `false` if already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.running {
            return false;
        }
        self.seconds = 0;
        self.running = true;
        self.started_at = Some(now);
        log::debug!("clock started");
        true
    }

    /// Returns `false` if the clock was not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        log::debug!("clock stopped at {}s", self.seconds);
        true
    }

    /// Back to zero and stopped.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one second, returning the new value if the clock is running.
    pub fn tick(&mut self) -> Option<u32> {
        if !self.running {
            return None;
        }
        self.seconds = self.seconds.saturating_add(1);
        log::trace!("tick {}", self.seconds);
        Some(self.seconds)
    }

    /// Emit the ticks owed for the time elapsed up to `now`, oldest first.
    pub fn catch_up(&mut self, now: Instant) -> Vec<u32> {
        let Some(started_at) = self.started_at.filter(|_| self.running) else {
            return Vec::new();
        };
        let elapsed = now.saturating_duration_since(started_at).as_secs();
        let target = u32::try_from(elapsed).unwrap_or(u32::MAX);

        let mut ticks = Vec::new();
        while self.seconds < target {
            match self.tick() {
                Some(seconds) => ticks.push(seconds),
                None => break,
            }
        }
        ticks
    }

    /// When the next whole second since start falls, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        let started_at = self.started_at.filter(|_| self.running)?;
        Some(started_at + TICK * self.seconds.saturating_add(1))
    }
}
