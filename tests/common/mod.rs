#![allow(dead_code)]

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::json;
use statboard::{
    config::{
        Config, GithubConfig, RefreshPolicy, ServerConfig, SpotifyConfig, StorageConfig,
        StoreKind, WakaTimeConfig,
    },
    management::{MemoryStore, Store, TokenManager},
    spotify::auth::AuthClient,
    types::CredentialRecord,
    utils,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

pub const ACCOUNT: &str = "default_user";
pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8080/api/v1/auth/callback";

pub fn spotify_config(server: &MockServer, policy: RefreshPolicy) -> SpotifyConfig {
    SpotifyConfig {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        auth_url: format!("{}/authorize", server.uri()),
        token_url: format!("{}/api/token", server.uri()),
        api_url: format!("{}/v1", server.uri()),
        refresh_policy: policy,
        ..Default::default()
    }
}

pub fn config(server: &MockServer) -> Config {
    Config {
        server: ServerConfig::default(),
        spotify: spotify_config(server, RefreshPolicy::Always),
        wakatime: WakaTimeConfig {
            api_key: Some("waka-key".to_string()),
            api_url: format!("{}/wakatime", server.uri()),
            editor: Some("Cursor".to_string()),
        },
        github: GithubConfig {
            token: Some("gh-token".to_string()),
            graphql_url: format!("{}/graphql", server.uri()),
        },
        storage: StorageConfig {
            kind: StoreKind::Memory,
            ..Default::default()
        },
    }
}

pub fn token_manager(server: &MockServer, store: Store, policy: RefreshPolicy) -> TokenManager {
    TokenManager::new(
        store,
        AuthClient::new(Client::new(), spotify_config(server, policy)),
        policy,
    )
}

pub fn record(last_known: Option<&str>) -> CredentialRecord {
    CredentialRecord {
        account_id: ACCOUNT.to_string(),
        access_token: "stored-access".to_string(),
        refresh_token: "stored-refresh".to_string(),
        expires_at: Utc::now() + Duration::minutes(30),
        last_known_resource_id: last_known.map(str::to_string),
    }
}

pub fn seeded_store(record: CredentialRecord) -> Store {
    Store::Memory(MemoryStore::with_record(record))
}

pub fn empty_store() -> Store {
    Store::Memory(MemoryStore::default())
}

fn token_request() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header(
            "authorization",
            utils::basic_auth(CLIENT_ID, CLIENT_SECRET).as_str(),
        ))
        .and(header("content-type", "application/x-www-form-urlencoded"))
}

/// Answers the refresh grant for `stored-refresh` with `access_token`.
pub async fn mock_refresh(server: &MockServer, access_token: &str, rotated: Option<&str>) {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "user-read-currently-playing user-read-playback-state",
    });
    if let Some(rotated) = rotated {
        body["refresh_token"] = json!(rotated);
    }

    token_request()
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stored-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mock_refresh_failure(server: &MockServer, status: u16, body: &str) {
    token_request()
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Answers the authorization code grant for `code`.
pub async fn mock_code_exchange(server: &MockServer, code: &str) {
    token_request()
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains(format!("code={code}").as_str()))
        .and(body_string_contains("redirect_uri="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-access",
            "refresh_token": "fresh-refresh",
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}
