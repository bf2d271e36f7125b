use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Returns the current Unix time in seconds.
pub type NowFn = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Wall-clock time between two Unix timestamps.
///
/// The duration is negative if the timestamp lies in the future. In that case
/// only `hours` is negative, while `minutes` and `seconds` stay in `0..60`,
/// so that `hours * 3600 + minutes * 60 + seconds` still adds up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedDuration {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl ElapsedDuration {
    pub fn between(now: i64, timestamp: i64) -> Self {
        let elapsed = now - timestamp;
        let rem = elapsed.rem_euclid(3600);
        ElapsedDuration {
            hours: elapsed.div_euclid(3600),
            minutes: rem / 60,
            seconds: rem % 60,
        }
    }

    pub fn since(timestamp: i64) -> Self {
        Self::between(Utc::now().timestamp(), timestamp)
    }
}

/// Formats as `HH:MM:SS`, f.e. `01:01:01`. Hours are not wrapped,
/// f.e. `123:00:00`.
impl Display for ElapsedDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// A `HH:MM:SS` display of the time since some timestamp,
/// refreshed on a fixed interval.
///
/// The timer runs until the clock is dropped.
pub struct ElapsedClock {
    timestamp: i64,
    tick: Duration,
    now: NowFn,
    display_tx: Arc<watch::Sender<String>>,
    display_rx: watch::Receiver<String>,
    timer: JoinHandle<()>,
}

impl ElapsedClock {
    /// Start a clock based on the system time. Must be called
    /// within a tokio runtime.
    pub fn start(timestamp: i64, tick: Duration) -> Self {
        Self::start_with(timestamp, tick, Arc::new(|| Utc::now().timestamp()))
    }

    pub fn start_with(timestamp: i64, tick: Duration, now: NowFn) -> Self {
        let initial = ElapsedDuration::between(now(), timestamp).to_string();
        let (display_tx, display_rx) = watch::channel(initial);
        let display_tx = Arc::new(display_tx);
        let timer = spawn_timer(timestamp, tick, now.clone(), display_tx.clone());
        ElapsedClock {
            timestamp,
            tick,
            now,
            display_tx,
            display_rx,
            timer,
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The most recently computed display.
    pub fn display(&self) -> String {
        self.display_rx.borrow().clone()
    }

    /// Receive every future display. Subscriptions survive `set_timestamp`.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display_rx.clone()
    }

    /// Restart the timer for another timestamp, and update the display immediately.
    pub fn set_timestamp(&mut self, timestamp: i64) {
        if timestamp == self.timestamp {
            return;
        }
        self.timer.abort();
        self.timestamp = timestamp;

        let display = ElapsedDuration::between((self.now)(), timestamp).to_string();
        let _ = self.display_tx.send(display);

        self.timer = spawn_timer(timestamp, self.tick, self.now.clone(), self.display_tx.clone());
    }
}

impl Drop for ElapsedClock {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

fn spawn_timer(
    timestamp: i64,
    tick: Duration,
    now: NowFn,
    display_tx: Arc<watch::Sender<String>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.tick().await; // completes immediately

        loop {
            interval.tick().await;
            let display = ElapsedDuration::between(now(), timestamp).to_string();
            if display_tx.send(display).is_err() {
                break;
            }
        }
    })
}
