use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::{
    api,
    config::Config,
    error::{Error, Result},
    github::GithubClient,
    info,
    management::{Store, TokenManager},
    spotify::{auth::AuthClient, player::Player},
    wakatime::WakaTimeClient,
    warning,
};

/// Everything the handlers share.
pub struct AppState {
    pub account_id: String,
    pub tokens: TokenManager,
    pub player: Player,
    pub wakatime: WakaTimeClient,
    pub github: GithubClient,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_store(config, Store::from_config(&config.storage))
    }

    pub fn with_store(config: &Config, store: Store) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.server.http_timeout)
            .build()?;

        Ok(Self {
            account_id: config.spotify.account_id.clone(),
            tokens: TokenManager::new(
                store,
                AuthClient::new(http.clone(), config.spotify.clone()),
                config.spotify.refresh_policy,
            ),
            player: Player::new(http.clone(), config.spotify.api_url.clone()),
            wakatime: WakaTimeClient::new(http.clone(), config.wakatime.clone()),
            github: GithubClient::new(http, config.github.clone()),
        })
    }
}

pub fn create_app(state: Arc<AppState>, frontend_url: Option<&str>) -> Router {
    let api = Router::new()
        .route("/auth/login", get(api::auth::login))
        .route("/auth/callback", get(api::auth::callback))
        .route("/auth/now-playing", get(api::auth::now_playing))
        .route("/wakatime/today", get(api::wakatime::today))
        .route("/wakatime/yesterday", get(api::wakatime::yesterday))
        .route("/wakatime/weekly", get(api::wakatime::weekly))
        .route("/wakatime/summary", get(api::wakatime::summary))
        .route("/git/contributions", get(api::git::contributions));

    let app = Router::new()
        .route("/health", get(api::health))
        .nest("/api/v1", api)
        .with_state(state);

    match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => app.layer(cors(origin)),
        Some(Err(e)) => {
            warning!("Ignoring FRONTEND_URL, not a valid origin: {}", e);
            app
        }
        None => app,
    }
}

fn cors(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
        .expose_headers([
            header::CONTENT_RANGE,
            HeaderName::from_static("x-total-count"),
        ])
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn start_api_server(config: &Config) -> Result<()> {
    let addr = SocketAddr::from_str(&config.server.addr).map_err(|e| {
        Error::Config(format!(
            "Failed to parse server address `{}`: {}",
            config.server.addr, e
        ))
    })?;

    let state = Arc::new(AppState::new(config)?);
    let app = create_app(state, config.server.frontend_url.as_deref());

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    serve(listener, app).await
}
