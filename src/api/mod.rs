//! # API Module
//!
//! HTTP handlers served by statboard. Everything except the health check is
//! mounted under `/api/v1`:
//!
//! ### Spotify (`/auth`)
//!
//! - [`auth::login`] - redirects to the Spotify consent page
//! - [`auth::callback`] - completes the authorization code grant and stores
//!   the credential record
//! - [`auth::now_playing`] - current track id, or the last one seen
//!
//! ### WakaTime (`/wakatime`)
//!
//! - [`wakatime::today`], [`wakatime::yesterday`], [`wakatime::weekly`] -
//!   coding time with the top languages
//! - [`wakatime::summary`] - all three periods, fetched in parallel
//!
//! ### GitHub (`/git`)
//!
//! - [`git::contributions`] - contribution calendar for `?user=&year=`
//!
//! ### Monitoring
//!
//! - [`health`] - status and version
//!
//! Handlers return [`crate::error::Result`]; failures are rendered as
//! `{ "success": false, "message": ... }` with the status of the error.

pub mod auth;
pub mod git;
mod health;
pub mod wakatime;

pub use health::health;
