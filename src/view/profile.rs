use std::sync::Arc;

use tokio::sync::RwLock;

use crate::controller::ElapsedClock;
use crate::network::{FetchError, PlayerRecord, ProfileLoader};
use crate::view::formatters::{display_name, format_date};

pub const LOADING_PROFILE: &str = "Loading player profile...";
pub const FAILED_TO_LOAD_PROFILE: &str = "Failed to load player profile. Please try again later.";
pub const STREAMER_BADGE: &str = "Streamer";
pub const SINCE_LAST_ONLINE: &str = "since last online";

#[derive(Debug, Clone, PartialEq)]
pub enum ProfilePhase {
    Loading,

    /// The API does not know the requested username.
    NotFound(String),

    /// The profile could not be fetched. Stays this way until the next `load`.
    Failed(String),

    Ready(Box<PlayerRecord>),
}

impl ProfilePhase {
    /// A full-page message that replaces the profile, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ProfilePhase::Loading => Some(LOADING_PROFILE),
            ProfilePhase::NotFound(msg) | ProfilePhase::Failed(msg) => Some(msg.as_str()),
            ProfilePhase::Ready(_) => None,
        }
    }
}

struct ProfileState {
    phase: ProfilePhase,

    /// Incremented on every `load`, so that a slow response for a previously
    /// selected player does not overwrite the current one.
    generation: u64,
}

/// The detail view of a single player.
#[derive(Clone)]
pub struct PlayerProfileView {
    loader: ProfileLoader,
    state: Arc<RwLock<ProfileState>>,
}

impl PlayerProfileView {
    pub fn new(loader: ProfileLoader) -> Self {
        PlayerProfileView {
            loader,
            state: Arc::new(RwLock::new(ProfileState {
                phase: ProfilePhase::Loading,
                generation: 0,
            })),
        }
    }

    /// Fetch the profile of the selected player.
    ///
    /// Errors are logged, and turned into a message. If another `load`
    /// started in the meantime, the result is discarded.
    pub async fn load(&self, id: &str) {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.phase = ProfilePhase::Loading;
            state.generation
        };

        let phase = match self.loader.fetch_one(id).await {
            Ok(player) => ProfilePhase::Ready(Box::new(player)),
            Err(err @ FetchError::NotFound) | Err(err @ FetchError::InvalidId(_)) => {
                log::error!("failed to load player profile for {}: {}", id, err);
                ProfilePhase::NotFound(format!("Player \"{}\" not found", id))
            }
            Err(err) => {
                log::error!("failed to load player profile for {}: {}", id, err);
                ProfilePhase::Failed(FAILED_TO_LOAD_PROFILE.to_string())
            }
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            log::debug!("discarding stale player profile for {}", id);
            return;
        }
        state.phase = phase;
    }

    pub async fn phase(&self) -> ProfilePhase {
        self.state.read().await.phase.clone()
    }
}

/// The fields displayed for a loaded player.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCard {
    pub title: String,
    pub username: String,
    pub avatar: Option<String>,
    pub avatar_alt: String,
    pub followers: u64,
    pub status: String,
    pub joined: String,
    pub badge: Option<&'static str>,
    pub last_online: i64,
}

impl ProfileCard {
    pub fn new(player: &PlayerRecord) -> Self {
        ProfileCard {
            title: display_name(player).to_string(),
            username: player.username.clone(),
            avatar: player.avatar.clone().filter(|url| !url.is_empty()),
            avatar_alt: format!("{}'s avatar", player.username),
            followers: player.followers,
            status: player.status.clone(),
            joined: format_date(player.joined),
            badge: if player.is_streamer {
                Some(STREAMER_BADGE)
            } else {
                None
            },
            last_online: player.last_online,
        }
    }

    /// Start the "since last online" clock. It stops when dropped.
    pub fn last_online_clock(&self, tick: std::time::Duration) -> ElapsedClock {
        ElapsedClock::start(self.last_online, tick)
    }
}
