use async_trait::async_trait;
use thiserror::Error;

pub use directory::*;
pub use profile::*;

use crate::config::{Config, USER_AGENT};

mod directory;
#[cfg(test)]
pub(crate) mod mock;
mod profile;

/// Possible errors when querying the player directory API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete, f.e. DNS or connection errors.
    #[error("API request failed: {source}")]
    Network {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The API answered with a non-success status.
    #[error("API request failed with status {status}")]
    HttpStatus { status: u16 },

    /// The requested player does not exist.
    #[error("cannot find a player with the requested username")]
    NotFound,

    /// Likely a change in the API.
    #[error("failed to parse API response")]
    Parse(#[from] serde_json::Error),

    /// Tried to look up a player without a username.
    #[error("username is required")]
    MissingId,

    /// The username contains characters that no username can have.
    #[error("invalid username: {0:?}")]
    InvalidId(String),
}

impl FetchError {
    /// Wrap a transport failure.
    pub fn network<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FetchError::Network {
            source: Box::new(err),
        }
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_status(status: u16) -> Self {
        FetchError::HttpStatus { status }
    }

    /// `true` if no such player can exist, either because the API
    /// does not know it, or because the username is malformed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound | FetchError::InvalidId(_))
    }

    /// The HTTP status, if the request got a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status } => Some(*status),
            FetchError::NotFound => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::network(err)
    }
}

/// A response with any status. Only transport failures are errors
/// at this level; loaders decide what a status means.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Read-only access to the API.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Issue a `GET` request for a path relative to the API root,
    /// f.e. `/titled/GM`.
    async fn get(&self, path: &str) -> Result<HttpResponse, FetchError>;
}

/// The HTTP client used for all API requests.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(&config.api_base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpFetch for ApiClient {
    async fn get(&self, path: &str) -> Result<HttpResponse, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", &url);

        let response = self.http.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}
