use std::time::Duration;

use serde::Deserialize;

/// User-Agent header for outgoing requests.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The public Chess.com API.
///
/// Reference: https://www.chess.com/news/view/published-data-api
pub const DEFAULT_API_BASE: &str = "https://api.chess.com/pub";

/// Number of players revealed at once in the directory listing.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// The pause before a page is revealed. This only smoothes the perceived
/// loading, since the full directory is already in memory.
pub const DEFAULT_REVEAL_DELAY_MILLIS: u64 = 300;

/// Trigger the next page this many pixels before the sentinel
/// actually scrolls into view.
pub const DEFAULT_SENTINEL_MARGIN_PX: u32 = 200;

/// The visible fraction of the sentinel that counts as "visible".
pub const DEFAULT_SENTINEL_THRESHOLD: f32 = 0.1;

/// Refresh rate of the "since last online" clock.
pub const DEFAULT_CLOCK_TICK_MILLIS: u64 = 1000;

/// Overrides `api_base` when set.
const API_BASE_ENV_VAR: &str = "GM_DIRECTORY_API_BASE";

/// Directory config.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The API root without trailing slash, f.e. `https://api.chess.com/pub`.
    pub api_base: String,

    /// Number of players revealed per page. Must be positive.
    pub page_size: usize,

    /// Artificial delay before a page is revealed. Zero disables it.
    pub reveal_delay_millis: u64,

    /// Advance margin of the sentinel observation.
    pub sentinel_margin_px: u32,

    /// Intersection ratio in `[0, 1]` at which the sentinel counts as visible.
    pub sentinel_threshold: f32,

    /// Interval of the elapsed clock. Must be positive.
    pub clock_tick_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            reveal_delay_millis: DEFAULT_REVEAL_DELAY_MILLIS,
            sentinel_margin_px: DEFAULT_SENTINEL_MARGIN_PX,
            sentinel_threshold: DEFAULT_SENTINEL_THRESHOLD,
            clock_tick_millis: DEFAULT_CLOCK_TICK_MILLIS,
        }
    }
}

impl Config {
    /// Default config, with the API base taken from the
    /// `GM_DIRECTORY_API_BASE` environment variable if it is set.
    /// Variables in an `.env` file in the working directory are picked up as well.
    pub fn from_env() -> anyhow::Result<Config> {
        if dotenv::dotenv().is_ok() {
            log::info!("using .env file");
        }

        Config::with_api_base(std::env::var(API_BASE_ENV_VAR).ok())
    }

    /// The default config, with `api_base` replaced if given.
    pub fn with_api_base(api_base: Option<String>) -> anyhow::Result<Config> {
        let mut config = Config::default();
        if let Some(base) = api_base {
            config.api_base = base;
        }
        check_config(&config)?;
        Ok(config)
    }

    /// Parse a TOML document. Missing keys fall back to their defaults.
    pub fn from_toml(s: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(s)?;
        check_config(&config)?;
        Ok(config)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_millis)
    }

    pub fn clock_tick(&self) -> Duration {
        Duration::from_millis(self.clock_tick_millis)
    }
}

/// Try to catch configuration errors early.
fn check_config(config: &Config) -> anyhow::Result<()> {
    anyhow::ensure!(config.page_size > 0, "config: 'page_size' must be positive");
    anyhow::ensure!(
        config.clock_tick_millis > 0,
        "config: 'clock_tick_millis' must be positive"
    );
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.sentinel_threshold),
        "config: 'sentinel_threshold' must be within [0, 1]"
    );
    anyhow::ensure!(
        !config.api_base.trim().is_empty(),
        "config: 'api_base' must not be empty"
    );
    Ok(())
}
