//! End-to-end tests for the relay HTTP surface
//!
//! The upstream Ollama server is mocked; the router is driven in-process.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mockito::{Matcher, Server};
use ollama_idea_relay::{config::UpstreamConfig, web::create_app, AppState, Config};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::oneshot;
use tower::ServiceExt;

fn app_for(base_url: String) -> Router {
    let config = Config {
        upstream: UpstreamConfig {
            base_url,
            model: "test-model".to_string(),
            timeout: None,
        },
        ..Config::default()
    };
    create_app(AppState::new(config).expect("app state"))
}

fn get(uri: &str) -> Request {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[derive(Debug, PartialEq)]
struct Frame {
    event: Option<String>,
    data: String,
}

/// Parses an SSE body, skipping keep-alive comments.
fn sse_frames(body: &str) -> Vec<Frame> {
    body.split("\n\n")
        .filter_map(|raw| {
            let mut event = None;
            let mut data: Vec<&str> = Vec::new();
            for line in raw.lines() {
                if let Some(name) = line.strip_prefix("event: ") {
                    event = Some(name.to_string());
                } else if let Some(value) = line.strip_prefix("data: ") {
                    data.push(value);
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push(value);
                }
            }
            if event.is_none() && data.is_empty() {
                None
            } else {
                Some(Frame { event, data: data.join("\n") })
            }
        })
        .collect()
}

fn messages(frames: &[Frame]) -> Vec<&str> {
    frames
        .iter()
        .filter(|f| f.event.is_none())
        .map(|f| f.data.as_str())
        .collect()
}

#[tokio::test]
async fn streams_fragments_in_arrival_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "test-model",
            "stream": true,
        })))
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body("{\"response\":\"Hel\"}\n{\"response\":\"lo\"}\nnot json\n{\"response\":\"!\"}\n")
        .expect(1)
        .create_async()
        .await;

    let response = app_for(server.url())
        .oneshot(get("/process_query?query=weather%20app"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");

    let frames = sse_frames(&body_text(response.into_body()).await);
    assert_eq!(messages(&frames), vec!["Hel", "lo", "!"]);
    assert_eq!(
        frames.last(),
        Some(&Frame { event: Some("done".to_string()), data: "[DONE]".to_string() })
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn missing_or_empty_query_is_rejected_without_upstream_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .expect(0)
        .create_async()
        .await;
    let app = app_for(server.url());

    for uri in ["/process_query", "/process_query?query="] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body: serde_json::Value =
            serde_json::from_str(&body_text(response.into_body()).await).unwrap();
        assert_eq!(body, serde_json::json!({"error": "No query provided"}));
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn whitespace_query_is_still_relayed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("{\"response\":\"ok\"}\n")
        .expect(1)
        .create_async()
        .await;

    let response = app_for(server.url())
        .oneshot(get("/process_query?query=%20%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let frames = sse_frames(&body_text(response.into_body()).await);
    assert_eq!(messages(&frames), vec!["ok"]);

    mock.assert_async().await;
}

#[tokio::test]
async fn repeated_query_parameter_uses_the_first_value() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Regex("User Input: alpha".to_string()))
        .with_status(200)
        .with_body("{\"response\":\"ok\"}\n")
        .expect(1)
        .create_async()
        .await;

    let response = app_for(server.url())
        .oneshot(get("/process_query?query=alpha&query=omega"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let frames = sse_frames(&body_text(response.into_body()).await);
    assert_eq!(messages(&frames), vec!["ok"]);

    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_upstream_yields_one_diagnostic() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let response = app_for(format!("http://{addr}"))
        .oneshot(get("/process_query?query=hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let frames = sse_frames(&body_text(response.into_body()).await);
    let diagnostics = messages(&frames);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].starts_with("Error: Cannot connect to Ollama server"));
    assert!(diagnostics[0].contains(&format!("http://{addr}/api/generate")));
    assert_eq!(frames.last().and_then(|f| f.event.as_deref()), Some("done"));
}

#[tokio::test]
async fn idea_and_details_are_composed_into_the_prompt() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Regex(
            "User Input: Project Idea: Weather app\\. Details: live radar".to_string(),
        ))
        .with_status(200)
        .with_body("{\"response\":\"ok\"}\n")
        .expect(1)
        .create_async()
        .await;

    let response = app_for(server.url())
        .oneshot(get("/process_query?idea=Weather%20app&details=live%20radar"))
        .await
        .unwrap();
    let frames = sse_frames(&body_text(response.into_body()).await);
    assert_eq!(messages(&frames), vec!["ok"]);

    mock.assert_async().await;
}

#[tokio::test]
async fn multiline_fragment_survives_framing() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("{\"response\":\"1. Title\\n\\n2. Problem\"}\n")
        .create_async()
        .await;

    let response = app_for(server.url())
        .oneshot(get("/process_query?query=x"))
        .await
        .unwrap();
    let frames = sse_frames(&body_text(response.into_body()).await);
    assert_eq!(messages(&frames), vec!["1. Title\n\n2. Problem"]);
}

#[tokio::test]
async fn client_disconnect_releases_upstream() {
    // Hand-rolled upstream that sends one record and then hangs.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (released_tx, released_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 64 * 1024];
        let _ = socket.read(&mut buf).await;

        let record = "{\"response\":\"Hel\"}\n";
        let head = "HTTP/1.1 200 OK\r\ncontent-type: application/x-ndjson\r\ntransfer-encoding: chunked\r\n\r\n";
        let chunk = format!("{:x}\r\n{}\r\n", record.len(), record);
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(chunk.as_bytes()).await.unwrap();

        // Drain until the relay hangs up.
        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
        let _ = released_tx.send(());
    });

    let response = app_for(format!("http://{addr}"))
        .oneshot(get("/process_query?query=hello"))
        .await
        .unwrap();
    let mut body = response.into_body();

    let mut seen = String::new();
    while !seen.contains("data: Hel") {
        let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
            .await
            .expect("first fragment in time")
            .expect("body still open")
            .unwrap();
        if let Ok(data) = frame.into_data() {
            seen.push_str(&String::from_utf8_lossy(&data));
        }
    }

    // Browser goes away.
    drop(body);

    tokio::time::timeout(Duration::from_secs(5), released_rx)
        .await
        .expect("upstream connection released after disconnect")
        .unwrap();
}

#[tokio::test]
async fn index_page_and_health() {
    let app = app_for("http://127.0.0.1:9".to_string());

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response.into_body()).await;
    assert!(html.contains("/process_query"));
    assert!(html.contains("test-model"));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let health: serde_json::Value =
        serde_json::from_str(&body_text(response.into_body()).await).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["model"], "test-model");
    assert_eq!(health["upstream"], "http://127.0.0.1:9/api/generate");
}
