//! A local stand-in for the Gemini endpoint that counts requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode, routing::post};

#[derive(Clone)]
struct FakeGemini {
    hits: Arc<AtomicUsize>,
    status: u16,
    reply: serde_json::Value,
}

async fn fake_generate(
    State(fake): State<FakeGemini>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(headers.get("x-goog-api-key").unwrap(), "test-key");
    assert!(body["contents"].is_array());
    (
        StatusCode::from_u16(fake.status).unwrap(),
        Json(fake.reply.clone()),
    )
}

/// Serve `reply` with `status` on an ephemeral port. Returns the base URL
/// and the request counter.
pub(crate) async fn spawn_fake(status: u16, reply: serde_json::Value) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let fake = FakeGemini {
        hits: hits.clone(),
        status,
        reply,
    };
    let app = Router::new()
        .route("/v1beta/models/{model}", post(fake_generate))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), hits)
}
