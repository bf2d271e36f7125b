use std::sync::Arc;

use tokio::sync::RwLock;

use crate::controller::{show_sentinel, RevealController, RevealOutcome};
use crate::network::{DirectoryLoader, PlayerId};

pub const LOADING_PLAYERS: &str = "Loading players...";
pub const LOADING_MORE_PLAYERS: &str = "Loading more players...";
pub const END_OF_LIST: &str = "You've reached the end of the list";
pub const FAILED_TO_LOAD_PLAYERS: &str = "Failed to load players. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum ListPhase {
    /// The directory is being fetched.
    Loading,

    /// The directory could not be fetched. Stays this way until the next `load`.
    Failed(String),

    Ready,
}

/// The grandmaster listing: fetches the directory once,
/// and reveals it page by page.
#[derive(Clone)]
pub struct PlayerListView {
    loader: DirectoryLoader,
    reveal: RevealController,
    phase: Arc<RwLock<ListPhase>>,
}

impl PlayerListView {
    pub fn new(loader: DirectoryLoader, reveal: RevealController) -> Self {
        PlayerListView {
            loader,
            reveal,
            phase: Arc::new(RwLock::new(ListPhase::Loading)),
        }
    }

    /// The controller to hand to the sentinel observation.
    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    /// Fetch the directory, and reveal its first page.
    ///
    /// Errors are logged, and turned into a message.
    pub async fn load(&self) {
        *self.phase.write().await = ListPhase::Loading;

        let phase = match self.loader.fetch_all().await {
            Ok(players) => {
                self.reveal.initialize(players).await;
                ListPhase::Ready
            }
            Err(err) => {
                log::error!("failed to load players: {}", err);
                ListPhase::Failed(FAILED_TO_LOAD_PLAYERS.to_string())
            }
        };
        *self.phase.write().await = phase;
    }

    /// Fetch the directory again, f.e. after navigating back to the listing.
    ///
    /// Replaces the previous directory, and starts over at its first page.
    pub async fn refresh(&self) {
        log::debug!("refreshing player directory");
        self.load().await;
    }

    /// Same entry point as the sentinel, f.e. for a "load more" button.
    pub async fn load_more(&self) -> RevealOutcome {
        if *self.phase.read().await != ListPhase::Ready {
            return RevealOutcome::Skipped;
        }
        self.reveal.request_next_page().await
    }

    pub async fn render(&self) -> ListRender {
        let phase = self.phase.read().await.clone();
        let state = self.reveal.snapshot().await;
        let ready = phase == ListPhase::Ready;

        let footer = if !ready {
            None
        } else if state.is_loading_page() {
            Some(LOADING_MORE_PLAYERS)
        } else if state.exhausted() && state.revealed_count() > 0 {
            Some(END_OF_LIST)
        } else {
            None
        };

        ListRender {
            show_sentinel: ready && show_sentinel(&state),
            items: if ready { state.visible().to_vec() } else { vec![] },
            total: if ready { state.total() } else { 0 },
            footer,
            phase,
        }
    }
}

/// Everything needed to draw the listing at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRender {
    pub phase: ListPhase,

    /// Revealed players, in directory order. The username doubles as item key.
    pub items: Vec<PlayerId>,

    /// Size of the whole directory.
    pub total: usize,

    /// Whether to place the sentinel after the last item.
    pub show_sentinel: bool,

    pub footer: Option<&'static str>,
}

impl ListRender {
    /// A full-page message that replaces the list, if any.
    pub fn message(&self) -> Option<&str> {
        match &self.phase {
            ListPhase::Loading => Some(LOADING_PLAYERS),
            ListPhase::Failed(msg) => Some(msg.as_str()),
            ListPhase::Ready => None,
        }
    }

    /// f.e. "Showing 20 of 1548 Players"
    pub fn summary(&self) -> String {
        format!("Showing {} of {} Players", self.items.len(), self.total)
    }

    /// Render each item, paired with its key.
    pub fn rendered<T, F>(&self, mut render_item: F) -> Vec<(&str, T)>
    where
        F: FnMut(usize, &PlayerId) -> T,
    {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.as_str(), render_item(idx, id)))
            .collect()
    }
}
