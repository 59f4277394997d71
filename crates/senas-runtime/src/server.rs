//! HTTP and WebSocket surface
//!
//! Routes:
//! - `GET /` service info
//! - `GET /api/health` liveness with server time
//! - `POST /api/predict` one-shot classification
//! - `GET /api/gestures` catalog listing
//! - `POST /api/gestures` gesture intake (acknowledged, not trained)
//! - `GET /ws` streaming session

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;

use senas_core::PredictionService;
use senas_wire::{
    ErrorBody, GestureListing, GestureTrainingData, HealthStatus, IntakeReceipt,
    PredictionRequest, PredictionResponse, ServiceInfo, WireError, WireResult,
};

use crate::{RuntimeResult, ServerConfig, SessionManager, WsTransport};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
    pub sessions: Arc<SessionManager>,
    pub outbound_buffer: usize,
}

impl AppState {
    pub fn new(service: PredictionService, outbound_buffer: usize) -> Self {
        Self {
            service,
            sessions: Arc::new(SessionManager::new()),
            outbound_buffer,
        }
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/api/health", get(health))
        .route("/api/predict", axum::routing::post(predict))
        .route("/api/gestures", get(list_gestures).post(intake_gesture))
        .route("/ws", get(ws_upgrade))
        .with_state(state)
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo::online(env!("CARGO_PKG_VERSION")))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(chrono::Utc::now().to_rfc3339()))
}

fn unprocessable(e: WireError) -> Response {
    tracing::debug!(error = %e, "rejected request");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            detail: e.to_string(),
        }),
    )
        .into_response()
}

fn decode_request(body: &[u8]) -> WireResult<PredictionRequest> {
    Ok(serde_json::from_slice(body)?)
}

async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    let hands = match decode_request(&body).and_then(|request| request.observations()) {
        Ok(hands) => hands,
        Err(e) => return unprocessable(e),
    };
    let result = state.service.predict(&hands);
    Json(PredictionResponse::from(&result)).into_response()
}

async fn list_gestures(State(state): State<AppState>) -> Json<GestureListing> {
    Json(GestureListing::from_catalog(state.service.catalog()))
}

async fn intake_gesture(body: Bytes) -> Response {
    let data: GestureTrainingData = match serde_json::from_slice(&body) {
        Ok(data) => data,
        Err(e) => return unprocessable(WireError::from(e)),
    };
    tracing::info!(
        gesture = %data.gesture_name,
        samples = data.samples.len(),
        "gesture intake received"
    );
    Json(IntakeReceipt::received(&data)).into_response()
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        let AppState {
            service,
            sessions,
            outbound_buffer,
        } = state;
        sessions
            .run_session(WsTransport::new(socket), service, outbound_buffer)
            .await;
    })
}

/// Bound HTTP/WebSocket server
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Bind the listener with the builtin catalog
    pub async fn bind(config: &ServerConfig) -> RuntimeResult<Self> {
        Self::bind_with(config, PredictionService::builtin()).await
    }

    pub async fn bind_with(config: &ServerConfig, service: PredictionService) -> RuntimeResult<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        tracing::info!(
            addr = %listener.local_addr()?,
            gestures = service.catalog().len(),
            "listening"
        );
        Ok(Self {
            listener,
            state: AppState::new(service, config.outbound_buffer),
        })
    }

    pub fn local_addr(&self) -> RuntimeResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = create_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}
