use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config::RefreshPolicy,
    error::{Error, Result},
    info,
    management::store::{CredentialStore, Store},
    spotify::auth::AuthClient,
    types::CredentialRecord,
};

/// Owns the Spotify token lifecycle for every configured account.
///
/// All reads-then-writes of a credential record go through a per-account
/// lock, so two requests refreshing the same account at once are served one
/// after the other instead of overwriting each other's token.
pub struct TokenManager {
    store: Store,
    auth: AuthClient,
    policy: RefreshPolicy,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TokenManager {
    pub fn new(store: Store, auth: AuthClient, policy: RefreshPolicy) -> Self {
        TokenManager {
            store,
            auth,
            policy,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn current(&self, account_id: &str) -> Result<Option<CredentialRecord>> {
        self.store.load(account_id).await
    }

    /// Runs the authorization code grant and creates or replaces the record.
    ///
    /// A track remembered from an earlier authorization survives.
    pub async fn exchange_authorization_code(
        &self,
        account_id: &str,
        code: Option<&str>,
    ) -> Result<CredentialRecord> {
        let code = code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or(Error::MissingAuthorizationCode)?;

        let lock = self.account_lock(account_id).await;
        let _guard = lock.lock().await;

        let token = self.auth.exchange_code(code).await?;
        let now = Utc::now();
        let previous = self.store.load(account_id).await?;

        let refresh_token = token
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| previous.as_ref().map(|p| p.refresh_token.clone()))
            .ok_or_else(|| Error::Upstream {
                service: "Spotify",
                status: 502,
                message: "token response carried no refresh token".to_string(),
            })?;

        let record = CredentialRecord {
            account_id: account_id.to_string(),
            access_token: token.access_token.clone(),
            refresh_token,
            expires_at: token.expires_at(now)?,
            last_known_resource_id: previous.and_then(|p| p.last_known_resource_id),
        };
        self.store.upsert(&record).await?;

        info!("Spotify account `{}` authorized", account_id);
        Ok(record)
    }

    /// Returns an access token that is valid right now.
    ///
    /// With [`RefreshPolicy::Always`] the refresh token is exchanged on every
    /// call. With [`RefreshPolicy::WhenStale`] the stored token is reused until
    /// it is within `margin` of expiring. A failed refresh leaves the stored
    /// record untouched.
    pub async fn get_valid_access_token(&self, account_id: &str) -> Result<String> {
        let lock = self.account_lock(account_id).await;
        let _guard = lock.lock().await;

        let mut record = self
            .store
            .load(account_id)
            .await?
            .ok_or(Error::NotAuthorized)?;

        if let RefreshPolicy::WhenStale { margin } = self.policy
            && !record.is_stale(Utc::now(), margin)
        {
            return Ok(record.access_token);
        }

        let token = self.auth.refresh(&record.refresh_token).await?;
        record.apply_token(&token, Utc::now())?;
        self.store.upsert(&record).await?;

        Ok(record.access_token)
    }

    /// Remembers `resource_id` as the last active track, together with the
    /// access token that observed it.
    pub async fn record_observed_resource(
        &self,
        account_id: &str,
        resource_id: &str,
        access_token: &str,
    ) -> Result<CredentialRecord> {
        let lock = self.account_lock(account_id).await;
        let _guard = lock.lock().await;

        let mut record = self
            .store
            .load(account_id)
            .await?
            .ok_or(Error::NotAuthorized)?;

        record.last_known_resource_id = Some(resource_id.to_string());
        record.access_token = access_token.to_string();
        self.store.upsert(&record).await?;

        Ok(record)
    }

    async fn account_lock(&self, account_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(account_id.to_string()).or_default())
    }
}
