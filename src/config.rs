//! Configuration management for statboard.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data dir>/statboard/.env`)
//! 4. Built-in defaults for provider URLs and tuning knobs
//!
//! Spotify client credentials are required; WakaTime and GitHub credentials
//! are only checked when their endpoints are hit.

use std::{env, path::PathBuf, time::Duration};

use crate::error::{Error, Result};

pub const DEFAULT_ACCOUNT_ID: &str = "default_user";
pub const DEFAULT_SCOPE: &str = "user-read-currently-playing user-read-playback-state";
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 240;

/// Loads `.env` files into the process environment. Missing files are fine,
/// an unreadable or malformed file is not.
pub async fn load_env() -> Result<()> {
    match dotenv::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(Error::Config(e.to_string())),
    }

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::Config(format!("{}: {}", path.display(), e))),
    }
}

/// `<local data dir>/statboard`, falling back to `./statboard`.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("statboard");
    path
}

/// When the token manager goes back to the provider for a new access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Exchange the refresh token on every request.
    #[default]
    Always,
    /// Exchange only once `expires_at - margin` has passed.
    WhenStale { margin: chrono::Duration },
}

impl RefreshPolicy {
    pub fn parse(value: &str, margin_secs: i64) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "always" => Ok(RefreshPolicy::Always),
            "when-stale" | "when_stale" | "lazy" => Ok(RefreshPolicy::WhenStale {
                margin: chrono::Duration::seconds(margin_secs.max(0)),
            }),
            other => Err(Error::Config(format!(
                "SPOTIFY_REFRESH_POLICY must be `always` or `when-stale`, got `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub spotify: SpotifyConfig,
    pub wakatime: WakaTimeConfig,
    pub github: GithubConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub frontend_url: Option<String>,
    pub http_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            frontend_url: None,
            http_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub account_id: String,
    pub refresh_policy: RefreshPolicy,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: "https://accounts.spotify.com/authorize".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            api_url: "https://api.spotify.com/v1".to_string(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            refresh_policy: RefreshPolicy::Always,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WakaTimeConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub editor: Option<String>,
}

impl Default for WakaTimeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://wakatime.com/api/v1".to_string(),
            editor: Some("Cursor".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub graphql_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            graphql_url: "https://api.github.com/graphql".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: StoreKind,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::File,
            data_dir: data_dir(),
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let server_defaults = ServerConfig::default();
        let spotify_defaults = SpotifyConfig::default();
        let wakatime_defaults = WakaTimeConfig::default();
        let github_defaults = GithubConfig::default();

        let margin_secs = match optional("SPOTIFY_REFRESH_MARGIN_SECS") {
            Some(raw) => parse_number("SPOTIFY_REFRESH_MARGIN_SECS", &raw)?,
            None => DEFAULT_REFRESH_MARGIN_SECS,
        };
        let refresh_policy = RefreshPolicy::parse(
            &optional("SPOTIFY_REFRESH_POLICY").unwrap_or_default(),
            margin_secs,
        )?;

        let http_timeout = match optional("HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("HTTP_TIMEOUT_SECS", &raw)?),
            None => server_defaults.http_timeout,
        };

        let kind = match optional("STATBOARD_STORE").as_deref() {
            None | Some("file") => StoreKind::File,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(Error::Config(format!(
                    "STATBOARD_STORE must be `file` or `memory`, got `{other}`"
                )));
            }
        };
        let storage_dir = optional("STATBOARD_DATA_DIR")
            .map(|dir| PathBuf::from(dir).join("statboard"))
            .unwrap_or_else(data_dir);

        // An explicitly empty WAKATIME_EDITOR disables the editor filter.
        let editor = match env::var("WAKATIME_EDITOR") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value),
            Err(_) => wakatime_defaults.editor,
        };

        Ok(Config {
            server: ServerConfig {
                addr: optional("SERVER_ADDRESS").unwrap_or(server_defaults.addr),
                frontend_url: optional("FRONTEND_URL"),
                http_timeout,
            },
            spotify: SpotifyConfig {
                client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
                client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
                redirect_uri: required("SPOTIFY_API_REDIRECT_URI")?,
                scope: optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or(spotify_defaults.scope),
                auth_url: optional("SPOTIFY_API_AUTH_URL").unwrap_or(spotify_defaults.auth_url),
                token_url: optional("SPOTIFY_API_TOKEN_URL").unwrap_or(spotify_defaults.token_url),
                api_url: optional("SPOTIFY_API_URL").unwrap_or(spotify_defaults.api_url),
                account_id: optional("SPOTIFY_ACCOUNT_ID").unwrap_or(spotify_defaults.account_id),
                refresh_policy,
            },
            wakatime: WakaTimeConfig {
                api_key: optional("WAKATIME_API_KEY"),
                api_url: optional("WAKATIME_API_URL").unwrap_or(wakatime_defaults.api_url),
                editor,
            },
            github: GithubConfig {
                token: optional("GITHUB_TOKEN"),
                graphql_url: optional("GITHUB_GRAPHQL_URL").unwrap_or(github_defaults.graphql_url),
            },
            storage: StorageConfig {
                kind,
                data_dir: storage_dir,
            },
        })
    }
}

fn required(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| Error::Config(format!("{name} must be set")))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{name} must be a number, got `{raw}`")))
}
