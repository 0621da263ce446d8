//! ProtocolProber tests against local listeners
//!
//! Run with: cargo test -p iotgw-gateway --test prober_test

use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};
use iotgw_core::ProbeOutcome;
use iotgw_gateway::{ProbeConfig, ProtocolProber, ProtocolTag};
use tokio::net::TcpListener;

/// Port that was free a moment ago and now has no listener
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// HTTP server exposing only an OpenAPI description
async fn spawn_api_server() -> u16 {
    let app = Router::new().route(
        "/openapi.json",
        get(|| async { Json(serde_json::json!({"openapi": "3.0.0"})) }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

/// HTTP server whose description sits behind a trailing-slash redirect
async fn spawn_redirecting_server() -> u16 {
    let app = Router::new()
        .route("/api", get(|| async { Redirect::permanent("/api/") }))
        .route(
            "/api/",
            get(|| async { Json(serde_json::json!({"openapi": "3.1.0"})) }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

fn fast_config() -> ProbeConfig {
    ProbeConfig {
        http_timeout_ms: 1000,
        tcp_timeout_ms: 500,
        deadline_ms: 2000,
        ..ProbeConfig::default()
    }
}

#[tokio::test]
async fn test_discovers_rest_openapi_and_mqtt() {
    let http_port = spawn_api_server().await;

    // A bound listener accepts TCP connects even without calling accept()
    let mqtt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = ProbeConfig {
        mqtt_port: mqtt_listener.local_addr().unwrap().port(),
        mqtts_port: closed_port().await,
        coap_port: closed_port().await,
        ..fast_config()
    };

    let prober = ProtocolProber::new(config).unwrap();
    let result = prober
        .discover(&format!("http://127.0.0.1:{}", http_port))
        .await;

    assert!(result.supports(ProtocolTag::HttpRest));
    assert!(result.supports(ProtocolTag::OpenApiRest));
    assert!(result.supports(ProtocolTag::Mqtt));
    assert!(!result.supports(ProtocolTag::Mqtts));
    assert!(!result.supports(ProtocolTag::Coap));

    let mqtts = result
        .probes
        .iter()
        .find(|p| p.protocol == ProtocolTag::Mqtts)
        .unwrap();
    assert_eq!(mqtts.outcome, ProbeOutcome::ConnectionRefused);

    drop(mqtt_listener);
}

#[tokio::test]
async fn test_missing_description_is_absent_with_status() {
    let http_port = spawn_api_server().await;
    let config = ProbeConfig {
        description_paths: vec!["/swagger.json".to_string()],
        mqtt_port: closed_port().await,
        mqtts_port: closed_port().await,
        coap_port: closed_port().await,
        ..fast_config()
    };

    let prober = ProtocolProber::new(config).unwrap();
    let result = prober
        .discover(&format!("127.0.0.1:{}", http_port))
        .await;

    assert!(result.supports(ProtocolTag::HttpRest));
    assert!(!result.supports(ProtocolTag::OpenApiRest));
    let description = result
        .probes
        .iter()
        .find(|p| p.protocol == ProtocolTag::OpenApiRest)
        .unwrap();
    assert_eq!(description.outcome, ProbeOutcome::Absent { status: Some(404) });
}

#[tokio::test]
async fn test_redirected_description_is_present() {
    let http_port = spawn_redirecting_server().await;
    let config = ProbeConfig {
        description_paths: vec!["/api".to_string()],
        mqtt_port: closed_port().await,
        mqtts_port: closed_port().await,
        coap_port: closed_port().await,
        ..fast_config()
    };

    let prober = ProtocolProber::new(config).unwrap();
    let result = prober
        .discover(&format!("http://127.0.0.1:{}", http_port))
        .await;

    assert!(result.supports(ProtocolTag::OpenApiRest));
    let description = result
        .probes
        .iter()
        .find(|p| p.protocol == ProtocolTag::OpenApiRest)
        .unwrap();
    assert_eq!(description.outcome, ProbeOutcome::Confirmed);
}

#[tokio::test]
async fn test_unreachable_endpoint_yields_empty_set() {
    let prober = ProtocolProber::new(ProbeConfig {
        http_timeout_ms: 300,
        tcp_timeout_ms: 300,
        deadline_ms: 1000,
        ..ProbeConfig::default()
    })
    .unwrap();

    let first = prober.discover("http://nonexistent.invalid").await;
    let second = prober.discover("http://nonexistent.invalid").await;

    assert!(first.protocols.is_empty());
    assert_eq!(first.protocols, second.protocols);
    assert!(first.probes.iter().all(|p| !p.outcome.is_confirmed()));
}

#[tokio::test]
async fn test_malformed_endpoint_never_fails() {
    let prober = ProtocolProber::new(fast_config()).unwrap();
    let result = prober.discover("http://").await;

    assert!(result.protocols.is_empty());
    assert_eq!(result.probes.len(), 5);
}
