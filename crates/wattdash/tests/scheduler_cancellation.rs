//! Scheduler loop behavior against a stub readings provider.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;
use wattdash::cancel::Cancel;
use wattdash::scheduler;
use wattdash_api::ApiClient;

/// Serve fixed historical and latest bodies on an ephemeral port.
async fn serve_stub() -> SocketAddr {
    let app = Router::new()
        .route(
            "/readings",
            get(|| async { r#"{ "pagination": { "total": 1 }, "data": [{ "value": 10 }] }"# }),
        )
        .route(
            "/readings/latest",
            get(|| async {
                // A fresh observation end keeps the countdown positive,
                // so ticks after the first are partial redraws.
                let end_time = chrono::Utc::now().to_rfc3339();
                format!(r#"{{ "endTime": "{end_time}", "value": 5 }}"#)
            }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

#[tokio::test]
async fn cancellation_mid_wait_stops_the_loop_within_one_tick() {
    let addr = serve_stub().await;
    let client = ApiClient::new(format!("http://{addr}"), None);
    let cancel = Cancel::new();

    let fire_side = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        fire_side.fire();
    });

    let mut out: Vec<u8> = Vec::new();
    let started = Instant::now();
    let result = tokio::time::timeout(
        Duration::from_secs(2),
        scheduler::run(&client, &cancel, &mut out),
    )
    .await
    .expect("loop did not stop within a tick of cancellation");

    assert!(result.is_ok(), "cancellation must not surface as an error");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!out.is_empty(), "the first full redraw should have run");
}

#[tokio::test]
async fn already_fired_signal_stops_the_loop_before_any_tick() {
    let addr = serve_stub().await;
    let client = ApiClient::new(format!("http://{addr}"), None);
    let cancel = Cancel::new();
    cancel.fire();

    let mut out: Vec<u8> = Vec::new();
    let result = tokio::time::timeout(
        Duration::from_secs(2),
        scheduler::run(&client, &cancel, &mut out),
    )
    .await
    .expect("loop did not stop promptly");

    assert!(result.is_ok());
    assert!(out.is_empty(), "no redraw should run after cancellation");
}
