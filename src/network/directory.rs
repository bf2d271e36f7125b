use std::sync::Arc;

use serde::Deserialize;

use crate::network::{FetchError, HttpFetch};

/// A player's username. Unique within a directory, and used
/// both to look up a profile and as the list key.
pub type PlayerId = String;

/// Usernames of all grandmasters, in server order.
pub type DirectorySnapshot = Vec<PlayerId>;

/// Response of the `/titled/GM` endpoint.
#[derive(Deserialize, Debug, PartialEq)]
struct PlayersList {
    players: Vec<PlayerId>,
}

const DIRECTORY_PATH: &str = "/titled/GM";

/// Fetches the full grandmaster directory.
#[derive(Clone)]
pub struct DirectoryLoader {
    api: Arc<dyn HttpFetch>,
}

impl DirectoryLoader {
    pub fn new(api: Arc<dyn HttpFetch>) -> Self {
        DirectoryLoader { api }
    }

    /// Fetch every username in a single request.
    ///
    /// The server order is kept as-is; there is no sorting or de-duplication,
    /// and failed requests are not retried.
    pub async fn fetch_all(&self) -> Result<DirectorySnapshot, FetchError> {
        let response = self.api.get(DIRECTORY_PATH).await?;
        if !response.is_success() {
            return Err(FetchError::from_status(response.status));
        }
        let list: PlayersList = serde_json::from_str(&response.body)?;
        log::debug!("fetched directory of {} players", list.players.len());
        Ok(list.players)
    }
}
