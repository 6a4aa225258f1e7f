//! REST integration tests against a stub Capital.com server.

use capital_broker::{CapitalClient, ClientConfig, ScannerConfig, SpreadFilter, SymbolScanner};
use capital_core::error::ApiError;
use capital_core::traits::MarketApi;
use capital_core::types::{Credentials, Resolution, Session, SymbolCandidate};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CapitalClient {
    CapitalClient::new(ClientConfig::new(server.uri(), "test-key")).unwrap()
}

fn credentials() -> Credentials {
    Credentials::new("test-key", "trader@example.com", "secret")
}

fn session() -> Session {
    Session::new(None, "T1", "T2").unwrap()
}

async fn mount_session(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .and(header("X-CAP-API-KEY", "test-key"))
        .and(body_json(json!({
            "identifier": "trader@example.com",
            "password": "secret"
        })))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_session_returns_tokens_and_balance() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200)
            .insert_header("CST", "T1")
            .insert_header("X-SECURITY-TOKEN", "T2")
            .set_body_json(json!({ "accountInfo": { "balance": 1000 } })),
    )
    .await;

    let session = client(&server).create_session(&credentials()).await.unwrap();

    assert_eq!(session.cst(), "T1");
    assert_eq!(session.security_token(), "T2");
    assert_eq!(session.balance(), Some(dec!(1000)));
}

#[tokio::test]
async fn test_session_without_balance_is_none() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200)
            .insert_header("CST", "T1")
            .insert_header("X-SECURITY-TOKEN", "T2")
            .set_body_json(json!({ "clientId": "123" })),
    )
    .await;

    let session = client(&server).create_session(&credentials()).await.unwrap();
    assert_eq!(session.balance(), None);
}

#[tokio::test]
async fn test_session_missing_token_is_auth_failure() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200)
            .insert_header("CST", "T1")
            .set_body_json(json!({ "accountInfo": { "balance": 1000 } })),
    )
    .await;

    let result = client(&server).create_session(&credentials()).await;
    assert!(matches!(result, Err(ApiError::AuthFailure(_))));
}

#[tokio::test]
async fn test_session_rejected_is_auth_failure() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(401).set_body_string("error.invalid.details"),
    )
    .await;

    match client(&server).create_session(&credentials()).await {
        Err(ApiError::AuthFailure(msg)) => assert!(msg.contains("error.invalid.details")),
        other => panic!("expected auth failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_navigation_sends_session_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/marketnavigation/hierarchy_v1.shares.us.most_traded"))
        .and(header("CST", "T1"))
        .and(header("X-SECURITY-TOKEN", "T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "markets": [
                { "epic": "AAPL", "instrumentName": "Apple", "bid": 190.1, "offer": 190.2 },
                { "epic": "HALTED" }
            ]
        })))
        .mount(&server)
        .await;

    let markets = client(&server)
        .market_navigation(&session(), "hierarchy_v1.shares.us.most_traded")
        .await
        .unwrap();

    assert_eq!(markets.len(), 2);
    assert_eq!(markets[0].epic, "AAPL");
    assert_eq!(markets[0].bid, Some(dec!(190.1)));
    assert_eq!(markets[1].bid, None);
}

#[tokio::test]
async fn test_navigation_without_markets_is_data_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/marketnavigation/hierarchy_v1.shares"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nodes": [] })))
        .mount(&server)
        .await;

    let result = client(&server)
        .market_navigation(&session(), "hierarchy_v1.shares")
        .await;
    assert!(matches!(result, Err(ApiError::DataShape { .. })));
}

#[tokio::test]
async fn test_prices_query_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/prices/XYZ"))
        .and(query_param("resolution", "DAY"))
        .and(query_param("max", "14"))
        .and(header("X-CAP-API-KEY", "test-key"))
        .and(header("CST", "T1"))
        .and(header("X-SECURITY-TOKEN", "T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prices": [
                {
                    "snapshotTime": "2024-05-01T00:00:00",
                    "openPrice": { "bid": 9.5, "ask": 9.6 },
                    "highPrice": { "bid": 10.0, "ask": 10.1 },
                    "lowPrice": { "bid": 8.0, "ask": 8.1 },
                    "closePrice": { "bid": 9.0, "ask": 9.1 },
                    "lastTradedVolume": 1200
                },
                {
                    "snapshotTime": "2024-05-02T00:00:00",
                    "openPrice": { "bid": 9.0, "ask": 9.1 },
                    "highPrice": { "bid": 12.0, "ask": 12.1 },
                    "lowPrice": { "bid": 9.0, "ask": 9.1 },
                    "closePrice": { "bid": 11.0, "ask": 11.1 },
                    "lastTradedVolume": 900
                }
            ]
        })))
        .mount(&server)
        .await;

    let bars = client(&server)
        .historical_prices(&session(), "XYZ", Resolution::Day, 14)
        .await
        .unwrap();

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].snapshot_time.as_deref(), Some("2024-05-01T00:00:00"));
    assert_eq!(bars[1].high_bid, 12.0);
    assert_eq!(bars[1].close_bid, 11.0);
}

#[tokio::test]
async fn test_prices_failure_is_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/prices/GONE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("error.not-found.epic"))
        .mount(&server)
        .await;

    let err = client(&server)
        .historical_prices(&session(), "GONE", Resolution::Day, 14)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::PartialFetch { status: 404, .. }));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_scan_end_to_end() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        ResponseTemplate::new(200)
            .insert_header("CST", "T1")
            .insert_header("X-SECURITY-TOKEN", "T2")
            .set_body_json(json!({ "accountInfo": { "balance": 1000 } })),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/marketnavigation/hierarchy_v1.shares.us.most_traded"))
        .and(header("CST", "T1"))
        .and(header("X-SECURITY-TOKEN", "T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "markets": [
                { "epic": "XYZ", "bid": 85, "offer": 85.1 },
                { "epic": "CHEAP", "bid": 50, "offer": 50.05 }
            ]
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let session = api.create_session(&credentials()).await.unwrap();
    assert_eq!(session.balance(), Some(dec!(1000)));

    let scanner = SymbolScanner::new(ScannerConfig {
        categories: vec!["hierarchy_v1.shares.us.most_traded".to_string()],
        filter: SpreadFilter::default(),
    });
    let candidates = scanner.scan(&api, &session).await.unwrap();

    assert_eq!(
        candidates,
        vec![SymbolCandidate {
            epic: "XYZ".to_string(),
            spread: dec!(0.1),
        }]
    );
}

#[tokio::test]
async fn test_scan_survives_failing_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/marketnavigation/hierarchy_v1.shares.us.top_gainers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/marketnavigation/hierarchy_v1.shares.us.top_losers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "markets": [{ "epic": "XYZ", "bid": 85, "offer": 85.1 }]
        })))
        .mount(&server)
        .await;

    // most_traded and most_volatile are unmocked and answer 404
    let scanner = SymbolScanner::new(ScannerConfig::us_shares());
    let candidates = scanner.scan(&client(&server), &session()).await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].epic, "XYZ");
}

#[tokio::test]
async fn test_navigation_skips_malformed_markets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/marketnavigation/hierarchy_v1.shares.us.most_traded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "markets": [
                { "epic": "XYZ", "bid": 85, "offer": 85.1 },
                { "instrumentName": "no epic", "bid": 10, "offer": 11 },
                { "epic": "BAD", "bid": [1], "offer": 90.1 }
            ]
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let markets = api
        .market_navigation(&session(), "hierarchy_v1.shares.us.most_traded")
        .await
        .unwrap();
    assert_eq!(markets.len(), 1);
    assert_eq!(markets[0].epic, "XYZ");

    let scanner = SymbolScanner::new(ScannerConfig {
        categories: vec!["hierarchy_v1.shares.us.most_traded".to_string()],
        filter: SpreadFilter::default(),
    });
    let candidates = scanner.scan(&api, &session()).await.unwrap();
    assert_eq!(candidates, vec![SymbolCandidate::new("XYZ", dec!(0.1))]);
}

#[tokio::test]
async fn test_scan_excludes_spread_at_bound() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/marketnavigation/hierarchy_v1.shares.us.top_gainers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "markets": [
                { "epic": "EQ", "bid": 80.12, "offer": 80.32 },
                { "epic": "TIGHT", "bid": 80.12, "offer": 80.31 }
            ]
        })))
        .mount(&server)
        .await;

    let scanner = SymbolScanner::new(ScannerConfig {
        categories: vec!["hierarchy_v1.shares.us.top_gainers".to_string()],
        filter: SpreadFilter::default(),
    });
    let candidates = scanner.scan(&client(&server), &session()).await.unwrap();

    assert_eq!(candidates, vec![SymbolCandidate::new("TIGHT", dec!(0.19))]);
}
