use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use ashram_core::{AshramClient, AshramConfig, AshramError, ChatRequest, ClientInfo, GuidanceTransport};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

type Captured = Arc<Mutex<Vec<Value>>>;

async fn start_server(router: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    (addr, handle)
}

fn client_for(addr: SocketAddr) -> AshramClient {
    let config = AshramConfig {
        endpoint: Some(format!("http://{addr}/api/chat-gita")),
        ..Default::default()
    };
    AshramClient::new(&config).expect("client")
}

#[tokio::test]
async fn posts_envelope_and_parses_response() {
    let captured: Captured = Arc::default();
    let router = Router::new()
        .route(
            "/api/chat-gita",
            post(|State(captured): State<Captured>, Json(body): Json<Value>| async move {
                captured.lock().unwrap().push(body);
                Json(json!({ "success": true, "content": { "answer": "Do your duty." } }))
            }),
        )
        .with_state(captured.clone());
    let (addr, server) = start_server(router).await;

    let request = ChatRequest::qna("How do I act without fear?", ClientInfo::default());
    let response = client_for(addr).send(&request).await.expect("response");

    assert!(response.success);
    assert_eq!(response.content.unwrap()["answer"], "Do your duty.");

    let bodies = captured.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["feature"], "qna");
    assert_eq!(bodies[0]["payload"]["question"], "How do I act without fear?");
    assert_eq!(bodies[0]["client"]["app"], "gita-ashram");

    server.abort();
}

#[tokio::test]
async fn non_success_status_is_an_http_error() {
    let router = Router::new().route(
        "/api/chat-gita",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down").into_response() }),
    );
    let (addr, server) = start_server(router).await;

    let request = ChatRequest::qna("Anything", ClientInfo::default());
    let result = client_for(addr).send(&request).await;

    match result {
        Err(AshramError::HttpError {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 502);
            assert!(message.contains("upstream down"));
        }
        other => panic!("expected HttpError, got {other:?}"),
    }

    server.abort();
}

#[tokio::test]
async fn undecodable_body_is_a_parsing_error() {
    let router = Router::new().route("/api/chat-gita", post(|| async { "<html>oops</html>" }));
    let (addr, server) = start_server(router).await;

    let request = ChatRequest::qna("Anything", ClientInfo::default());
    let result = client_for(addr).send(&request).await;
    assert!(matches!(result, Err(AshramError::ParsingError(_))));

    server.abort();
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let request = ChatRequest::qna("Anything", ClientInfo::default());
    let result = client_for(addr).send(&request).await;
    assert!(matches!(result, Err(AshramError::RequestError(_))));
}
