use anyhow::Result;
use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use std::time::Duration;
use upbit_rest::utils::error::ErrorCategory;
use upbit_rest::{CandleQuery, ClientConfig, DayCandleQuery, MinuteUnit, UpbitClient, UpbitError};

fn public_client(server: &MockServer) -> Result<UpbitClient> {
    let config = ClientConfig {
        base_url: server.base_url(),
        ..Default::default()
    };
    Ok(UpbitClient::from_config(&config)?)
}

#[tokio::test]
async fn test_market_codes_returns_raw_body() -> Result<()> {
    let server = MockServer::start();
    let body = r#"[{"market":"KRW-BTC","korean_name":"비트코인","english_name":"Bitcoin","market_warning":"NONE"}]"#;

    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/market/all")
            .query_param("isDetails", "true");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(body);
    });

    let client = public_client(&server)?;
    assert!(!client.has_credentials());

    let bytes = client.get_market_codes().await?;

    api_mock.assert();
    assert_eq!(bytes, body.as_bytes());
    Ok(())
}

#[tokio::test]
async fn test_minute_candles_query_and_unit() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/candles/minutes/15")
            .query_param("market", "KRW-BTC")
            .query_param("count", "3")
            .query_param("to", "2024-03-01T09:00:00Z");
        then.status(200).body("[]");
    });

    let query = CandleQuery::new("KRW-BTC")
        .with_count(3)
        .with_to(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());

    let bytes = public_client(&server)?
        .get_minute_candles(&query, MinuteUnit::Fifteen)
        .await?;

    api_mock.assert();
    assert_eq!(bytes, b"[]");
    Ok(())
}

#[tokio::test]
async fn test_day_candles_with_converting_price_unit() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/candles/days")
            .query_param("market", "BTC-ETH")
            .query_param("convertingPriceUnit", "KRW");
        then.status(200).body(r#"[{"market":"BTC-ETH"}]"#);
    });

    let query = DayCandleQuery {
        candle: CandleQuery::new("BTC-ETH"),
        converting_price_unit: Some("KRW".to_string()),
    };
    public_client(&server)?.get_day_candles(&query).await?;

    api_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_week_and_month_candles() -> Result<()> {
    let server = MockServer::start();
    let weeks = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/candles/weeks")
            .query_param("market", "KRW-XRP");
        then.status(200).body("[1]");
    });
    let months = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/candles/months")
            .query_param("market", "KRW-XRP")
            .query_param("count", "12");
        then.status(200).body("[2]");
    });

    let client = public_client(&server)?;
    let week_bytes = client.get_week_candles(&CandleQuery::new("KRW-XRP")).await?;
    let month_bytes = client
        .get_month_candles(&CandleQuery::new("KRW-XRP").with_count(12))
        .await?;

    weeks.assert();
    months.assert();
    assert_eq!(week_bytes, b"[1]");
    assert_eq!(month_bytes, b"[2]");
    Ok(())
}

#[tokio::test]
async fn test_error_status_body_is_passed_through() -> Result<()> {
    let server = MockServer::start();
    let body = r#"{"error":{"name":404,"message":"Code not found"}}"#;
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/candles/days");
        then.status(404).body(body);
    });

    let bytes = public_client(&server)?
        .get_day_candles(&DayCandleQuery::new("KRW-NOPE"))
        .await?;

    api_mock.assert();
    assert_eq!(bytes, body.as_bytes());
    Ok(())
}

#[tokio::test]
async fn test_invalid_count_never_reaches_server() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/candles/weeks");
        then.status(200).body("[]");
    });

    let err = public_client(&server)?
        .get_week_candles(&CandleQuery::new("KRW-BTC").with_count(201))
        .await
        .unwrap_err();

    assert!(matches!(err, UpbitError::ValidationError { .. }));
    api_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_reported_as_network_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/market/all");
        then.status(200).delay(Duration::from_secs(3)).body("[]");
    });

    let config = ClientConfig {
        base_url: server.base_url(),
        timeout_seconds: Some(1),
        ..Default::default()
    };
    let err = UpbitClient::from_config(&config)?
        .get_market_codes()
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Network);
    Ok(())
}
