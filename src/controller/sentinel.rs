use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::Config;
use crate::controller::{RevealController, RevealState};

/// How a sentinel is observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Extends the viewport by this many pixels, so that the sentinel
    /// counts as visible before it is actually scrolled into view.
    pub margin_px: u32,

    /// The fraction of the sentinel in `[0, 1]` that has to be visible.
    pub threshold: f32,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        ObserveOptions {
            margin_px: crate::config::DEFAULT_SENTINEL_MARGIN_PX,
            threshold: crate::config::DEFAULT_SENTINEL_THRESHOLD,
        }
    }
}

impl From<&Config> for ObserveOptions {
    fn from(config: &Config) -> Self {
        ObserveOptions {
            margin_px: config.sentinel_margin_px,
            threshold: config.sentinel_threshold,
        }
    }
}

/// A change in the sentinel's visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub is_intersecting: bool,

    /// The visible fraction of the sentinel.
    pub ratio: f32,
}

impl Intersection {
    pub fn triggers(&self, options: &ObserveOptions) -> bool {
        self.is_intersecting && self.ratio >= options.threshold
    }
}

/// Anything that can watch a marker at the end of the list,
/// f.e. an intersection observer in a browser, or a terminal pager.
pub trait ViewportObserver: Send + Sync {
    /// Start observing the sentinel. Observation stops when the
    /// returned receiver is dropped, or when the sender side closes.
    fn observe(&self, options: ObserveOptions) -> UnboundedReceiver<Intersection>;
}

/// The sentinel is only rendered while more pages can be requested,
/// and after the first page is visible.
pub fn show_sentinel(state: &RevealState) -> bool {
    state.accepts_request() && state.revealed_count() > 0
}

/// Request the next page whenever the sentinel becomes visible.
///
/// Requests run in their own task, so that intersections reported while
/// a page is pending hit the controller's guard and are dropped.
/// Returns once the list is exhausted, or the observer disconnects.
pub async fn drive_reveal(
    observer: &dyn ViewportObserver,
    controller: &RevealController,
    options: ObserveOptions,
) {
    let mut intersections = observer.observe(options);

    while let Some(intersection) = intersections.recv().await {
        let state = controller.snapshot().await;
        if state.exhausted() {
            break;
        }
        if !intersection.triggers(&options) || state.is_loading_page() {
            continue;
        }

        let controller = controller.clone();
        let _ = tokio::spawn(async move {
            controller.request_next_page().await;
        });
    }

    log::debug!("stopped observing the sentinel");
}
