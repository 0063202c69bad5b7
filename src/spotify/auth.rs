use reqwest::{Client, Response, Url, header};

use crate::{
    config::SpotifyConfig,
    error::{Error, Result},
    types::TokenResponse,
    utils, warning,
};

/// Client for the Spotify accounts service.
///
/// Covers the two token grants used by the server: the authorization code
/// grant run once from the OAuth callback, and the refresh token grant run
/// whenever a fresh access token is needed. Both authenticate the application
/// with HTTP Basic credentials built from the client id and client secret.
///
/// # Example
///
/// ```
/// let auth = AuthClient::new(Client::new(), config.spotify.clone());
/// let consent_url = auth.authorize_url()?;
/// // ...user consents, Spotify redirects back with `code`...
/// let token = auth.exchange_code(&code).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    config: SpotifyConfig,
}

impl AuthClient {
    pub fn new(http: Client, config: SpotifyConfig) -> Self {
        Self { http, config }
    }

    /// Builds the consent URL the login endpoint redirects to.
    ///
    /// The URL carries `client_id`, `response_type=code`, `redirect_uri` and
    /// the configured `scope`, all form-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `SPOTIFY_API_AUTH_URL` is not a valid URL.
    pub fn authorize_url(&self) -> Result<String> {
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scope.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid Spotify authorize URL: {e}")))?;

        Ok(url.into())
    }

    /// Exchanges a one-time authorization code for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthExchangeFailed`] with the provider status on any non-2xx answer
    /// - [`Error::Http`] on transport or decoding failures
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let res = self
            .post_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .await?;

        let status = res.status();
        if !status.is_success() {
            warning!("Authorization code exchange rejected with {}", status);
            return Err(Error::AuthExchangeFailed {
                status: status.as_u16(),
            });
        }

        Ok(res.json().await?)
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The response may or may not contain a rotated refresh token; callers
    /// keep their stored one when it is absent.
    ///
    /// # Errors
    ///
    /// - [`Error::RefreshFailed`] carrying the provider status and response body
    ///   on any non-2xx answer
    /// - [`Error::Http`] on transport or decoding failures
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let res = self
            .post_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warning!("Token refresh rejected with {}: {}", status, body);
            return Err(Error::RefreshFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(res.json().await?)
    }

    async fn post_token(&self, form: &[(&str, &str)]) -> Result<Response> {
        let res = self
            .http
            .post(&self.config.token_url)
            .header(
                header::AUTHORIZATION,
                utils::basic_auth(&self.config.client_id, &self.config.client_secret),
            )
            .form(form)
            .send()
            .await?;
        Ok(res)
    }
}
