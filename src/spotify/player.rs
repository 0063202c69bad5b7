use reqwest::{Client, StatusCode};

use crate::{
    error::{Error, Result},
    management::TokenManager,
    types::{CurrentlyPlaying, NowPlaying, Playback},
    warning,
};

/// Thin client for the Spotify player API.
#[derive(Debug, Clone)]
pub struct Player {
    http: Client,
    api_url: String,
}

impl Player {
    pub fn new(http: Client, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    /// Asks Spotify what the account is playing right now.
    ///
    /// `204 No Content` and `200` with `is_playing: false` both mean
    /// [`Playback::Idle`]. A playing item without an id (local files) is
    /// treated the same way since there is nothing to remember.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceFetchFailed`] with the upstream status for
    /// any other non-2xx response.
    pub async fn currently_playing(&self, access_token: &str) -> Result<Playback> {
        let res = self
            .http
            .get(format!(
                "{uri}/me/player/currently-playing",
                uri = self.api_url.trim_end_matches('/')
            ))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            warning!("Currently playing request failed with {}", status);
            return Err(Error::ResourceFetchFailed {
                status: status.as_u16(),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Playback::Idle);
        }

        let body = res.bytes().await?;
        if body.is_empty() {
            return Ok(Playback::Idle);
        }

        let current: CurrentlyPlaying = serde_json::from_slice(&body)?;
        match current.item.and_then(|item| item.id) {
            Some(id) if current.is_playing => Ok(Playback::Playing(id)),
            _ => Ok(Playback::Idle),
        }
    }
}

/// Resolves the track to show for an account.
///
/// Gets a valid access token, asks the player what is playing, and records
/// the track when something is. Otherwise the last known track is returned
/// and the credential record is left alone.
pub async fn now_playing(
    tokens: &TokenManager,
    player: &Player,
    account_id: &str,
) -> Result<NowPlaying> {
    let access_token = tokens.get_valid_access_token(account_id).await?;

    match player.currently_playing(&access_token).await? {
        Playback::Playing(track_id) => {
            let record = tokens
                .record_observed_resource(account_id, &track_id, &access_token)
                .await?;
            Ok(NowPlaying {
                track_id: record.last_known_resource_id,
            })
        }
        Playback::Idle => {
            let record = tokens
                .current(account_id)
                .await?
                .ok_or(Error::NotAuthorized)?;
            Ok(NowPlaying {
                track_id: record.last_known_resource_id,
            })
        }
    }
}
