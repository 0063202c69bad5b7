//! # Spotify Integration Module
//!
//! Spotify access for statboard: the OAuth token grants and the single player
//! endpoint the portfolio needs.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api::auth)
//!          ↓
//! Token lifecycle (management::TokenManager)
//!          ↓
//! Spotify Integration Layer
//!     ├── Accounts service (authorize URL, code grant, refresh grant)
//!     └── Player (currently playing)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - [`auth::AuthClient`] talks to the accounts service. The
//!   application authenticates with HTTP Basic client credentials; codes and
//!   refresh tokens travel as form-encoded bodies.
//! - [`player`] - [`player::Player`] reads the "currently playing" state and
//!   [`player::now_playing`] combines it with the token lifecycle, falling back
//!   to the last remembered track when nothing is playing.
//!
//! ## Error Handling
//!
//! Provider failures are mapped onto the crate [`Error`](crate::error::Error):
//!
//! - code grant rejected → `AuthExchangeFailed`
//! - refresh grant rejected → `RefreshFailed` (provider status and body kept)
//! - player request rejected → `ResourceFetchFailed`
//!
//! Nothing is retried; a failed call fails the inbound request.

pub mod auth;
pub mod player;
