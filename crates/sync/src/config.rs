use std::env;

/// Sync layer configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote API (default: "http://localhost:8080/api")
    pub api_url: String,
    /// Path to the SQLite cache file (default: "fitsync.db")
    pub store_path: String,
    /// Path to the token file (default: "fitsync-tokens.json")
    pub token_path: String,
    /// Id of the signed-in user, used to tell own messages from foreign ones.
    pub user_id: Option<String>,
    /// Activities per feed page (default: 20)
    pub feed_page_size: u32,
    /// Messages per conversation window (default: 50)
    pub message_window_size: u32,
    /// Recently seen realtime deliveries remembered for replay detection (default: 512)
    pub realtime_dedup_capacity: usize,
    /// Buffered realtime events per subscriber (default: 100)
    pub realtime_channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FITSYNC_API_URL` - Remote API base URL (default: "http://localhost:8080/api")
    /// - `FITSYNC_STORE_PATH` - SQLite cache path (default: "fitsync.db")
    /// - `FITSYNC_TOKEN_PATH` - Token file path (default: "fitsync-tokens.json")
    /// - `FITSYNC_USER_ID` - Signed-in user id (default: unset)
    /// - `FEED_PAGE_SIZE` - Feed page size (default: 20)
    /// - `MESSAGE_WINDOW_SIZE` - Message window size (default: 50)
    /// - `REALTIME_DEDUP_CAPACITY` - Dedup set size (default: 512)
    /// - `REALTIME_CHANNEL_CAPACITY` - Event buffer per subscriber (default: 100)
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("FITSYNC_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
            store_path: env::var("FITSYNC_STORE_PATH").unwrap_or_else(|_| "fitsync.db".to_string()),
            token_path: env::var("FITSYNC_TOKEN_PATH")
                .unwrap_or_else(|_| "fitsync-tokens.json".to_string()),
            user_id: env::var("FITSYNC_USER_ID").ok().filter(|v| !v.is_empty()),
            feed_page_size: parse_env("FEED_PAGE_SIZE", 20),
            message_window_size: parse_env("MESSAGE_WINDOW_SIZE", 50),
            realtime_dedup_capacity: parse_env("REALTIME_DEDUP_CAPACITY", 512),
            realtime_channel_capacity: parse_env("REALTIME_CHANNEL_CAPACITY", 100),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parses a positive number from the environment, falling back on absence,
/// parse failure or zero.
fn parse_env<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + PartialEq + Default,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v: &T| *v != T::default())
        .unwrap_or(default)
}
