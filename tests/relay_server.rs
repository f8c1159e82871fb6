//! Integration tests for the relay server and command interface.
//!
//! Each test binds a fake upstream and the relay to `127.0.0.1:0` and talks to
//! them over real HTTP.

#![cfg(feature = "server")]

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use tokio::net::TcpListener;

use paper_desk::domain::price::PriceSeries;
use paper_desk::domain::transaction::wire::TransactionErrorResponse;
use paper_desk::prelude::*;
use paper_desk::relay;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn_router(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn fake_upstream(body: serde_json::Value) -> String {
    spawn_router(Router::new().route(
        "/simple/price",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    ))
    .await
}

async fn failing_upstream() -> String {
    spawn_router(Router::new().route(
        "/simple/price",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "rate limited") }),
    ))
    .await
}

fn test_desk() -> SharedDesk {
    PaperDesk::builder()
        .assets([Asset::Bitcoin, Asset::Ethereum])
        .clock(Arc::new(FixedClock::new(HourOfDay::new(12).unwrap())))
        .build()
        .into_shared()
}

/// Spawn the relay in front of `upstream_url`, returning its base URL.
async fn spawn_relay(upstream_url: &str, desk: SharedDesk) -> String {
    let config = DeskConfig {
        upstream_url: upstream_url.to_string(),
        assets: vec![Asset::Bitcoin, Asset::Ethereum],
        fetch_timeout: TIMEOUT,
        ..DeskConfig::default()
    };
    let state = RelayState::new(UpstreamClient::new(&config).unwrap(), desk);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(relay::serve(listener, state, std::future::pending()));
    format!("http://{addr}")
}

fn prices() -> serde_json::Value {
    serde_json::json!({
        "bitcoin": { "usd": 50000 },
        "ethereum": { "usd": 2500.5 }
    })
}

async fn post_transaction(
    relay_url: &str,
    action: &str,
    asset: &str,
    amount: &str,
) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{relay_url}/transactions"))
        .json(&serde_json::json!({ "action": action, "asset": asset, "amount": amount }))
        .send()
        .await
        .unwrap()
}

// ── /crypto-data ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_crypto_data_passes_upstream_body_through() {
    let upstream = fake_upstream(prices()).await;
    let relay_url = spawn_relay(&upstream, test_desk()).await;

    let resp = reqwest::get(format!("{relay_url}/crypto-data")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, prices());
}

#[tokio::test]
async fn test_crypto_data_upstream_failure_is_500() {
    let upstream = failing_upstream().await;
    let relay_url = spawn_relay(&upstream, test_desk()).await;

    let resp = reqwest::get(format!("{relay_url}/crypto-data")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.text().await.unwrap(), "Error fetching data");
}

#[tokio::test]
async fn test_relay_client_reads_snapshot() {
    let upstream = fake_upstream(prices()).await;
    let relay_url = spawn_relay(&upstream, test_desk()).await;

    let client = RelayClient::new(&relay_url, TIMEOUT).unwrap();
    let snapshot = client.snapshot().await.unwrap();

    assert_eq!(snapshot.get(Asset::Bitcoin), Some(Decimal::from(50000)));
    assert_eq!(snapshot.get(Asset::Ethereum), Some(Decimal::new(25005, 1)));
    assert!(!snapshot.contains(Asset::Uniswap));
}

#[tokio::test]
async fn test_relay_client_reports_relay_failure() {
    let upstream = failing_upstream().await;
    let relay_url = spawn_relay(&upstream, test_desk()).await;

    let client = RelayClient::new(&relay_url, TIMEOUT).unwrap();
    let err = client.fetch_snapshot().await.unwrap_err();
    assert!(matches!(err, RefreshError::RelayUnavailable(_)));
}

// ── Command interface ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_buy_after_refresh_through_relay() {
    let upstream = fake_upstream(prices()).await;
    let desk = test_desk();
    let relay_url = spawn_relay(&upstream, desk.clone()).await;

    let client = RelayClient::new(&relay_url, TIMEOUT).unwrap();
    let snapshot = client.fetch_snapshot().await.unwrap();
    desk.write().await.refresh(&snapshot).unwrap();

    let resp = post_transaction(&relay_url, "buy", "bitcoin", "10").await;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let receipt: TransactionReceipt = resp.json().await.unwrap();
    assert_eq!(receipt.transaction.id, 1);
    assert_eq!(receipt.transaction.total_cost, Decimal::from(500_000));
    assert_eq!(
        receipt.message,
        "You bought 10 bitcoin for a total of $500000.00."
    );

    let wallet: WalletSummary = reqwest::get(format!("{relay_url}/wallet"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(wallet.cash, Decimal::from(9_500_000));
    assert_eq!(wallet.holdings[&Asset::Bitcoin], Decimal::from(10));
    assert_eq!(wallet.portfolio_value, Decimal::from(10_000_000));

    let log: Vec<Transaction> = reqwest::get(format!("{relay_url}/transactions"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, Action::Buy);
}

#[tokio::test]
async fn test_buy_without_price_is_422() {
    let upstream = fake_upstream(prices()).await;
    let relay_url = spawn_relay(&upstream, test_desk()).await;

    let resp = post_transaction(&relay_url, "buy", "bitcoin", "1").await;
    assert_eq!(resp.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let body: TransactionErrorResponse = resp.json().await.unwrap();
    assert_eq!(body.error, "price_unavailable");
    assert_eq!(body.message, "No price available for bitcoin this hour");
}

#[tokio::test]
async fn test_invalid_amount_is_422() {
    let upstream = fake_upstream(prices()).await;
    let relay_url = spawn_relay(&upstream, test_desk()).await;

    for amount in ["", "abc", "0", "-3"] {
        let resp = post_transaction(&relay_url, "sell", "ethereum", amount).await;
        assert_eq!(resp.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
        let body: TransactionErrorResponse = resp.json().await.unwrap();
        assert_eq!(body.error, "invalid_amount", "amount {amount:?}");
    }
}

#[tokio::test]
async fn test_sell_without_holdings_is_422() {
    let upstream = fake_upstream(prices()).await;
    let desk = test_desk();
    let relay_url = spawn_relay(&upstream, desk.clone()).await;
    desk.write()
        .await
        .refresh(
            &PriceSnapshot::new()
                .with(Asset::Bitcoin, Decimal::from(50000))
                .with(Asset::Ethereum, Decimal::from(2500)),
        )
        .unwrap();

    let resp = post_transaction(&relay_url, "sell", "bitcoin", "5").await;
    assert_eq!(resp.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let body: TransactionErrorResponse = resp.json().await.unwrap();
    assert_eq!(body.error, "insufficient_holdings");
    assert!(desk.read().await.transactions().is_empty());
}

#[tokio::test]
async fn test_prices_series_has_24_slots() {
    let upstream = fake_upstream(prices()).await;
    let desk = test_desk();
    let relay_url = spawn_relay(&upstream, desk.clone()).await;
    desk.write()
        .await
        .refresh(
            &PriceSnapshot::new()
                .with(Asset::Bitcoin, Decimal::from(50000))
                .with(Asset::Ethereum, Decimal::from(2500)),
        )
        .unwrap();

    let body: serde_json::Value = reqwest::get(format!("{relay_url}/prices"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let labels = body["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 24);
    assert_eq!(labels[12], "12:00");
    let btc = body["series"]["bitcoin"].as_array().unwrap();
    assert_eq!(btc.len(), 24);
    assert_eq!(btc[12].as_f64(), Some(50000.0));
    assert!(btc[11].is_null());

    let series: PriceSeries = desk.read().await.price_series();
    assert_eq!(body, serde_json::to_value(&series).unwrap());
}

#[tokio::test]
async fn test_health() {
    let upstream = fake_upstream(prices()).await;
    let relay_url = spawn_relay(&upstream, test_desk()).await;

    let resp = reqwest::get(format!("{relay_url}/health")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
