use std::sync::Arc;

use serde::Deserialize;

use crate::network::{FetchError, HttpFetch, PlayerId};

/// Player profile from the `/player/{username}` endpoint.
///
/// Only `username` is guaranteed; every other field
/// falls back to its default if the API omits it.
///
/// Reference: https://www.chess.com/news/view/published-data-api#pubapi-endpoint-player
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PlayerRecord {
    /// The player's numeric ID, which survives username changes.
    pub player_id: i64,

    pub username: PlayerId,

    /// The player's personal name, which is often empty.
    pub name: String,

    /// URL of a 200x200 image.
    pub avatar: Option<String>,

    /// The player's profile page, f.e. `https://www.chess.com/member/hikaru`.
    pub url: String,

    pub followers: u64,

    /// f.e. "premium", "staff", "basic"
    pub status: String,

    pub is_streamer: bool,

    pub verified: bool,

    /// f.e. "Legend"
    pub league: String,

    pub streaming_platforms: Vec<String>,

    /// API URL of the player's country profile, f.e. `https://api.chess.com/pub/country/US`.
    pub country: String,

    /// Unix timestamp in seconds.
    pub last_online: i64,

    /// Unix timestamp in seconds.
    pub joined: i64,

    /// API URL of this record.
    #[serde(rename = "@id")]
    pub self_link: String,
}

impl PlayerRecord {
    /// The country code at the end of the country URL, f.e. "US".
    pub fn country_code(&self) -> Option<&str> {
        self.country
            .rsplit('/')
            .next()
            .filter(|code| !code.is_empty())
    }
}

/// Usernames only consist of letters, digits, `_` and `-`, so they
/// can be used as a path segment as-is.
fn is_valid_username(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Fetches single player profiles.
#[derive(Clone)]
pub struct ProfileLoader {
    api: Arc<dyn HttpFetch>,
}

impl ProfileLoader {
    pub fn new(api: Arc<dyn HttpFetch>) -> Self {
        ProfileLoader { api }
    }

    /// Fetch the profile of the player with the given username.
    ///
    /// A missing player is reported as [`FetchError::NotFound`], every other
    /// non-success status as [`FetchError::HttpStatus`]. Nothing is cached.
    pub async fn fetch_one(&self, id: &str) -> Result<PlayerRecord, FetchError> {
        if id.trim().is_empty() {
            return Err(FetchError::MissingId);
        }
        if !is_valid_username(id) {
            return Err(FetchError::InvalidId(id.to_string()));
        }

        let path = format!("/player/{}", id);
        let response = self.api.get(&path).await?;
        match response.status {
            404 => return Err(FetchError::NotFound),
            _ if !response.is_success() => return Err(FetchError::from_status(response.status)),
            _ => {}
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}
