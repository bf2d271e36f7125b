use std::cmp::min;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, RwLockReadGuard};

use crate::config::Config;
use crate::network::{DirectorySnapshot, PlayerId};

/// The result of requesting the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Another page is still pending, or there is nothing left to reveal.
    Skipped,

    /// This many players were added to the visible list.
    Revealed(usize),

    /// The next page was empty.
    Exhausted,

    /// The controller was re-initialized while the page was pending,
    /// and the page was discarded.
    Superseded,
}

/// Which part of a directory is currently visible.
#[derive(Debug, Clone)]
pub struct RevealState {
    full_set: DirectorySnapshot,
    page_size: usize,

    /// Always within `0..=full_set.len()`. The visible players
    /// are the first `revealed_count` players of the full set.
    revealed_count: usize,

    /// Set once there is nothing left to reveal.
    exhausted: bool,

    /// Set while a page is pending. No other page is accepted in the meantime.
    is_loading_page: bool,

    /// Incremented on every `initialize`, so that a pending page
    /// can tell whether its full set was replaced.
    generation: u64,
}

impl RevealState {
    fn new(full_set: DirectorySnapshot, page_size: usize, generation: u64) -> Self {
        RevealState {
            revealed_count: min(page_size, full_set.len()),
            exhausted: full_set.len() <= page_size,
            is_loading_page: false,
            full_set,
            page_size,
            generation,
        }
    }

    pub fn visible(&self) -> &[PlayerId] {
        &self.full_set[..self.revealed_count]
    }

    pub fn full_set(&self) -> &[PlayerId] {
        &self.full_set
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn total(&self) -> usize {
        self.full_set.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_loading_page(&self) -> bool {
        self.is_loading_page
    }

    /// `true` if a call to `request_next_page` would be accepted right now.
    pub fn accepts_request(&self) -> bool {
        !self.exhausted && !self.is_loading_page
    }
}

/// Reveals a known list page by page.
///
/// Pages are requested by whoever watches the end of the list, and
/// at most one page is pending at any time: requests that arrive while
/// a page is pending are dropped, not queued.
#[derive(Clone)]
pub struct RevealController {
    state: Arc<RwLock<RevealState>>,
    delay: Duration,
}

impl RevealController {
    /// Create a controller without any players. Page sizes below one are
    /// treated as one.
    pub fn new(page_size: usize, delay: Duration) -> Self {
        let page_size = page_size.max(1);
        RevealController {
            state: Arc::new(RwLock::new(RevealState::new(vec![], page_size, 0))),
            delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.page_size, config.reveal_delay())
    }

    /// While holding this guard, the state is read-only, and can be referenced.
    pub async fn lock(&self) -> RwLockReadGuard<'_, RevealState> {
        self.state.read().await
    }

    /// An owned copy of the current state.
    pub async fn snapshot(&self) -> RevealState {
        self.state.read().await.clone()
    }

    /// Replace the full set, and reveal its first page.
    ///
    /// A page that is still pending for the previous set will be discarded.
    pub async fn initialize(&self, full_set: DirectorySnapshot) {
        let mut state = self.state.write().await;
        let page_size = state.page_size;
        let generation = state.generation + 1;
        *state = RevealState::new(full_set, page_size, generation);
        log::debug!(
            "revealing {} of {} players",
            state.revealed_count,
            state.total()
        );
    }

    /// Reveal the next page after the configured delay.
    ///
    /// Does nothing if another page is pending, or if the list is exhausted.
    /// The delay and the reveal run in their own task, so the page is still
    /// revealed if the caller stops waiting for it.
    pub async fn request_next_page(&self) -> RevealOutcome {
        let (start, end, generation) = {
            let mut state = self.state.write().await;
            if !state.accepts_request() {
                return RevealOutcome::Skipped;
            }
            state.is_loading_page = true;

            let start = state.revealed_count;
            let end = min(start + state.page_size, state.total());
            (start, end, state.generation)
        };

        let state = self.state.clone();
        let delay = self.delay;
        let page = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            commit_page(&state, start, end, generation).await
        });

        match page.await {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("failed to reveal players {} to {}: {}", start, end, err);
                RevealOutcome::Superseded
            }
        }
    }
}

/// Reveal `start..end` of the full set, unless it was replaced in the meantime.
async fn commit_page(
    state: &RwLock<RevealState>,
    start: usize,
    end: usize,
    generation: u64,
) -> RevealOutcome {
    let mut state = state.write().await;
    if state.generation != generation {
        return RevealOutcome::Superseded;
    }
    state.is_loading_page = false;

    let found = end - start;
    log::debug!(
        "revealing players {} to {}, found: {}",
        start,
        end,
        found
    );

    if found == 0 {
        state.exhausted = true;
        return RevealOutcome::Exhausted;
    }

    state.revealed_count = end;
    if end == state.total() {
        state.exhausted = true;
    }
    RevealOutcome::Revealed(found)
}
