mod common;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use statboard::{
    config::RefreshPolicy,
    error::Error,
    management::CredentialStore,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

use common::*;

#[tokio::test]
async fn exchange_then_refresh_yields_future_expiry() {
    let server = MockServer::start().await;
    mock_code_exchange(&server, "one-time-code").await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("refresh_token=fresh-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "refreshed-access",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = token_manager(&server, empty_store(), RefreshPolicy::Always);

    let created = tokens
        .exchange_authorization_code(ACCOUNT, Some("one-time-code"))
        .await
        .unwrap();
    assert_eq!(created.access_token, "fresh-access");
    assert_eq!(created.refresh_token, "fresh-refresh");
    assert_eq!(created.last_known_resource_id, None);

    let before = Utc::now();
    let access = tokens.get_valid_access_token(ACCOUNT).await.unwrap();
    assert_eq!(access, "refreshed-access");

    let stored = tokens.store().load(ACCOUNT).await.unwrap().unwrap();
    assert_eq!(stored.access_token, "refreshed-access");
    // provider did not rotate, the first refresh token stays
    assert_eq!(stored.refresh_token, "fresh-refresh");
    assert!(stored.expires_at > before);
}

#[tokio::test]
async fn exchange_without_code_never_calls_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tokens = token_manager(&server, empty_store(), RefreshPolicy::Always);

    for code in [None, Some(""), Some("   ")] {
        let err = tokens
            .exchange_authorization_code(ACCOUNT, code)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingAuthorizationCode));
        assert_eq!(err.status().as_u16(), 400);
    }
    assert!(tokens.store().load(ACCOUNT).await.unwrap().is_none());
}

#[tokio::test]
async fn rejected_exchange_surfaces_provider_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
        .mount(&server)
        .await;

    let tokens = token_manager(&server, empty_store(), RefreshPolicy::Always);
    let err = tokens
        .exchange_authorization_code(ACCOUNT, Some("expired"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthExchangeFailed { status: 400 }));
    assert!(tokens.store().load(ACCOUNT).await.unwrap().is_none());
}

#[tokio::test]
async fn reauthorization_keeps_last_known_track() {
    let server = MockServer::start().await;
    mock_code_exchange(&server, "again").await;

    let tokens = token_manager(
        &server,
        seeded_store(record(Some("trackA"))),
        RefreshPolicy::Always,
    );
    let updated = tokens
        .exchange_authorization_code(ACCOUNT, Some("again"))
        .await
        .unwrap();

    assert_eq!(updated.access_token, "fresh-access");
    assert_eq!(updated.refresh_token, "fresh-refresh");
    assert_eq!(updated.last_known_resource_id.as_deref(), Some("trackA"));
}

#[tokio::test]
async fn missing_record_is_not_authorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tokens = token_manager(&server, empty_store(), RefreshPolicy::Always);
    let err = tokens.get_valid_access_token(ACCOUNT).await.unwrap_err();

    assert!(matches!(err, Error::NotAuthorized));
    assert_eq!(err.status().as_u16(), 401);
    assert!(tokens.store().load(ACCOUNT).await.unwrap().is_none());
}

#[tokio::test]
async fn always_policy_refreshes_on_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "refreshed-access",
            "expires_in": 3600,
        })))
        .expect(3)
        .mount(&server)
        .await;

    let tokens = token_manager(&server, seeded_store(record(None)), RefreshPolicy::Always);
    for _ in 0..3 {
        assert_eq!(
            tokens.get_valid_access_token(ACCOUNT).await.unwrap(),
            "refreshed-access"
        );
    }
}

#[tokio::test]
async fn rotated_refresh_token_replaces_stored_one() {
    let server = MockServer::start().await;
    mock_refresh(&server, "refreshed-access", Some("rotated-refresh")).await;

    let tokens = token_manager(&server, seeded_store(record(None)), RefreshPolicy::Always);
    tokens.get_valid_access_token(ACCOUNT).await.unwrap();

    let stored = tokens.store().load(ACCOUNT).await.unwrap().unwrap();
    assert_eq!(stored.refresh_token, "rotated-refresh");
    assert_eq!(stored.access_token, "refreshed-access");
}

#[tokio::test]
async fn failed_refresh_leaves_record_untouched() {
    let server = MockServer::start().await;
    mock_refresh_failure(&server, 400, r#"{"error":"invalid_grant"}"#).await;

    let seeded = record(Some("trackA"));
    let tokens = token_manager(&server, seeded_store(seeded.clone()), RefreshPolicy::Always);

    let err = tokens.get_valid_access_token(ACCOUNT).await.unwrap_err();
    match &err {
        Error::RefreshFailed { status, body } => {
            assert_eq!(*status, 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("expected RefreshFailed, got {other:?}"),
    }
    assert_eq!(err.status().as_u16(), 400);

    let stored = tokens.store().load(ACCOUNT).await.unwrap().unwrap();
    assert_eq!(stored, seeded);
}

#[tokio::test]
async fn unrepresentable_expiry_on_refresh_leaves_record_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "a",
            "expires_in": 9_000_000_000_000_000_i64,
        })))
        .mount(&server)
        .await;

    let seeded = record(Some("trackA"));
    let tokens = token_manager(&server, seeded_store(seeded.clone()), RefreshPolicy::Always);

    let err = tokens.get_valid_access_token(ACCOUNT).await.unwrap_err();
    assert!(matches!(err, Error::Upstream { status: 502, .. }));
    assert_eq!(err.status().as_u16(), 502);

    let stored = tokens.store().load(ACCOUNT).await.unwrap().unwrap();
    assert_eq!(stored, seeded);
}

#[tokio::test]
async fn unrepresentable_expiry_on_exchange_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": i64::MAX,
        })))
        .mount(&server)
        .await;

    let tokens = token_manager(&server, empty_store(), RefreshPolicy::Always);
    let err = tokens
        .exchange_authorization_code(ACCOUNT, Some("code"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream { status: 502, .. }));
    assert!(tokens.store().load(ACCOUNT).await.unwrap().is_none());
}

#[tokio::test]
async fn when_stale_reuses_fresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let policy = RefreshPolicy::WhenStale {
        margin: Duration::seconds(240),
    };
    let tokens = token_manager(&server, seeded_store(record(None)), policy);

    assert_eq!(
        tokens.get_valid_access_token(ACCOUNT).await.unwrap(),
        "stored-access"
    );
}

#[tokio::test]
async fn when_stale_refreshes_inside_margin() {
    let server = MockServer::start().await;
    mock_refresh(&server, "refreshed-access", None).await;

    let mut almost_expired = record(None);
    almost_expired.expires_at = Utc::now() + Duration::seconds(60);

    let policy = RefreshPolicy::WhenStale {
        margin: Duration::seconds(240),
    };
    let tokens = token_manager(&server, seeded_store(almost_expired), policy);

    assert_eq!(
        tokens.get_valid_access_token(ACCOUNT).await.unwrap(),
        "refreshed-access"
    );
    let stored = tokens.store().load(ACCOUNT).await.unwrap().unwrap();
    assert!(stored.expires_at > Utc::now() + Duration::minutes(50));
}

#[tokio::test]
async fn concurrent_stale_callers_share_one_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "refreshed-access",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut expired = record(None);
    expired.expires_at = Utc::now() - Duration::seconds(1);

    let policy = RefreshPolicy::WhenStale {
        margin: Duration::seconds(240),
    };
    let tokens = token_manager(&server, seeded_store(expired), policy);

    let (a, b, c) = tokio::join!(
        tokens.get_valid_access_token(ACCOUNT),
        tokens.get_valid_access_token(ACCOUNT),
        tokens.get_valid_access_token(ACCOUNT),
    );
    assert_eq!(a.unwrap(), "refreshed-access");
    assert_eq!(b.unwrap(), "refreshed-access");
    assert_eq!(c.unwrap(), "refreshed-access");
}

#[tokio::test]
async fn record_observed_resource_is_idempotent() {
    let server = MockServer::start().await;
    let tokens = token_manager(&server, seeded_store(record(None)), RefreshPolicy::Always);

    let first = tokens
        .record_observed_resource(ACCOUNT, "trackB", "observer-access")
        .await
        .unwrap();
    let second = tokens
        .record_observed_resource(ACCOUNT, "trackB", "observer-access")
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.last_known_resource_id.as_deref(), Some("trackB"));
    assert_eq!(second.access_token, "observer-access");
    assert_eq!(second.refresh_token, "stored-refresh");
}

#[tokio::test]
async fn record_observed_resource_requires_authorization() {
    let server = MockServer::start().await;
    let tokens = token_manager(&server, empty_store(), RefreshPolicy::Always);

    let err = tokens
        .record_observed_resource(ACCOUNT, "trackB", "observer-access")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthorized));
}
