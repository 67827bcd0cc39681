//! Fetcher behavior against a live in-process HTTP server.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use wattdash_api::{ApiClient, ApiError};

/// Bind to an ephemeral port and serve `app` in the background.
async fn serve(app: Router) -> SocketAddr {
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
async fn rate_limited_twice_then_success_returns_final_body() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/data",
        get({
            let hits = hits.clone();
            move || {
                let hits = hits.clone();
                async move {
                    if hits.fetch_add(1, Ordering::SeqCst) < 2 {
                        (
                            StatusCode::TOO_MANY_REQUESTS,
                            [("retry-after", "0")],
                            "slow down",
                        )
                            .into_response()
                    } else {
                        (StatusCode::OK, "payload").into_response()
                    }
                }
            }
        }),
    );
    let addr = serve(app).await;

    let client = ApiClient::new(format!("http://{addr}"), None);
    let body = client.fetch(&format!("http://{addr}/data")).await.unwrap();

    assert_eq!(body, "payload");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn rate_limit_past_the_cap_is_terminal() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/data",
        get({
            let hits = hits.clone();
            move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        [("retry-after", "0")],
                        "slow down",
                    )
                }
            }
        }),
    );
    let addr = serve(app).await;

    let client = ApiClient::new(format!("http://{addr}"), None);
    let err = client
        .fetch(&format!("http://{addr}/data"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    // Initial attempt plus exactly two retries.
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn rate_limit_without_a_hint_is_not_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/data",
        get({
            let hits = hits.clone();
            move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::TOO_MANY_REQUESTS, "slow down")
                }
            }
        }),
    );
    let addr = serve(app).await;

    let client = ApiClient::new(format!("http://{addr}"), None);
    let err = client
        .fetch(&format!("http://{addr}/data"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_error_is_terminal_on_first_attempt() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/data",
        get({
            let hits = hits.clone();
            move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
                }
            }
        }),
    );
    let addr = serve(app).await;

    let client = ApiClient::new(format!("http://{addr}"), None);
    let err = client
        .fetch(&format!("http://{addr}/data"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blank_success_body_is_empty_response() {
    let app = Router::new().route("/data", get(|| async { "  \n " }));
    let addr = serve(app).await;

    let client = ApiClient::new(format!("http://{addr}"), None);
    let err = client
        .fetch(&format!("http://{addr}/data"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::EmptyResponse { .. }), "got {err:?}");
}

#[tokio::test]
async fn api_key_header_sent_only_when_configured() {
    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route(
        "/data",
        get({
            let seen = seen.clone();
            move |headers: HeaderMap| {
                let seen = seen.clone();
                async move {
                    let key = headers
                        .get("x-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    seen.lock().unwrap().push(key);
                    "ok"
                }
            }
        }),
    );
    let addr = serve(app).await;
    let url = format!("http://{addr}/data");

    let keyed = ApiClient::new(format!("http://{addr}"), Some("sekrit".into()));
    keyed.fetch(&url).await.unwrap();
    let anonymous = ApiClient::new(format!("http://{addr}"), None);
    anonymous.fetch(&url).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), [Some("sekrit".to_string()), None]);
}
