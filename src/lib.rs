//! statboard library
//!
//! Backend for a portfolio site: shows the Spotify track currently playing,
//! WakaTime coding time and the GitHub contribution calendar. The only
//! stateful part is the Spotify OAuth credential record, which is created
//! by the authorization code grant and refreshed on demand.
//!
//! # Modules
//!
//! - `api` - HTTP handlers
//! - `cli` - Command implementations of the `statboard` binary
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - Error type and its HTTP rendering
//! - `github` - GitHub GraphQL contribution calendar
//! - `management` - Token lifecycle and credential storage
//! - `server` - Router, shared state and server startup
//! - `spotify` - Spotify accounts service and player clients
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `wakatime` - WakaTime summaries and reports
//!
//! # Example
//!
//! ```
//! use statboard::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> statboard::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(&config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod wakatime;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use statboard::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line, prefixed with a UTC timestamp and a blue
/// `o` marker.
///
/// Takes the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Listening on http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "{} [{}] {}",
      chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().dimmed(),
      "o".blue().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a success line with a green checkmark. Used when an operation
/// with a visible outcome completed, such as connecting an account.
///
/// # Example
///
/// ```
/// success!("Spotify connected for `{}`", account_id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "{} [{}] {}",
      chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().dimmed(),
      "✓".green().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints an error to stderr and exits the process with code 1.
///
/// Only for failures the binary cannot recover from (bad configuration,
/// address already in use). Library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "{} [{}] {}",
      chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().dimmed(),
      "!".red().bold(),
      std::format_args!($($arg)*)
    );
    std::process::exit(1);
  })
}

/// Prints a warning to stderr with a yellow `!` marker. Used for upstream
/// failures and other conditions that fail a request but not the server.
///
/// # Example
///
/// ```
/// warning!("Token refresh rejected with {}", status);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "{} [{}] {}",
      chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string().dimmed(),
      "!".yellow().bold(),
      std::format_args!($($arg)*)
    );
  })
}
