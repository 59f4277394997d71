//! End-to-end tests against a live server on an ephemeral port

use std::net::SocketAddr;

use serde_json::{json, Value};
use tokio::sync::oneshot;

use senas_core::synthetic::synthetic_hand;
use senas_core::ThumbDirection;
use senas_runtime::{Server, ServerConfig};
use senas_wire::{HandPayload, HandednessPayload, PredictionRequest};

struct TestServer {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..ServerConfig::default()
        };
        let server = Server::bind(&config).await.unwrap();
        let addr = server.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .run_until(async move {
                    let _ = stopped.await;
                })
                .await
                .unwrap();
        });
        TestServer {
            addr,
            stop: Some(stop),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await.unwrap();
    }
}

fn request_for(fingers: [bool; 5], thumb: ThumbDirection, pinch: bool) -> PredictionRequest {
    let points = synthetic_hand(fingers, thumb, pinch);
    PredictionRequest {
        hands: vec![HandPayload::new(&points, HandednessPayload::Right, 0.95)],
        timestamp: Some(1_700_000_000.0),
    }
}

#[tokio::test]
async fn test_predict_peace() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/predict"))
        .json(&request_for(
            [false, true, true, false, false],
            ThumbDirection::Side,
            false,
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["gesture"], "Paz");
    assert_eq!(body["text"], "2");
    assert_eq!(body["confidence"], 1.0);
    assert!(body["processing_time_ms"].as_f64().unwrap() >= 0.0);

    server.shutdown().await;
}

#[tokio::test]
async fn test_predict_empty_hands() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    for payload in [json!({"hands": []}), json!({})] {
        let body: Value = client
            .post(server.url("/api/predict"))
            .json(&payload)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["gesture"], Value::Null);
        assert_eq!(body["text"], Value::Null);
        assert_eq!(body["confidence"], 0.0);
        assert_eq!(body["processing_time_ms"], 0.0);
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_predict_rejects_bad_input() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let malformed = client
        .post(server.url("/api/predict"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), 422);
    let body: Value = malformed.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Invalid JSON"));

    let short_hand = client
        .post(server.url("/api/predict"))
        .json(&json!({"hands": [{"landmarks": [{"x": 0.1, "y": 0.2, "z": 0.0}]}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(short_hand.status(), 422);

    server.shutdown().await;
}

#[tokio::test]
async fn test_gesture_listing() {
    let server = TestServer::start().await;

    let body: Value = reqwest::get(server.url("/api/gestures"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let gestures = body["gestures"].as_array().unwrap();
    assert_eq!(gestures.len(), 10);
    assert_eq!(gestures[0]["key"], "open_hand");
    assert_eq!(gestures[0]["name"], "Mano abierta");
    assert_eq!(gestures[0]["text"], "Hola");

    server.shutdown().await;
}

#[tokio::test]
async fn test_gesture_intake() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(server.url("/api/gestures"))
        .json(&json!({
            "gesture_name": "gracias",
            "text": "Gracias",
            "samples": [[{"x": 0.1, "y": 0.2, "z": 0.0}], []]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "received");
    assert!(body["message"].as_str().unwrap().contains("'gracias'"));
    assert!(body["message"].as_str().unwrap().contains("2 samples"));

    // Intake never changes the catalog
    let listing: Value = reqwest::get(server.url("/api/gestures"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["gestures"].as_array().unwrap().len(), 10);

    server.shutdown().await;
}

#[tokio::test]
async fn test_info_and_health() {
    let server = TestServer::start().await;

    let info: Value = reqwest::get(server.url("/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info["status"], "online");
    assert_eq!(info["endpoints"]["websocket"], "/ws");

    let health: Value = reqwest::get(server.url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    let timestamp = health["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    server.shutdown().await;
}
