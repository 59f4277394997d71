//! Frame transports - the per-session connection handle
//!
//! A session task reads client frames and writes server messages through a
//! [`FrameTransport`]. Production uses the axum WebSocket; tests and
//! in-process clients use [`MemoryTransport`].

use std::future::Future;

use axum::extract::ws::{Message, WebSocket};
use tokio::sync::mpsc;

use crate::{RuntimeError, RuntimeResult};

/// What a transport read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Text(String),
    Binary(Vec<u8>),
    /// Ping/pong and other frames with no payload for the session
    Control,
    /// Client asked to close
    Close,
    /// Unrecoverable transport failure
    Error(String),
}

/// Bidirectional connection handle owned by exactly one session task
pub trait FrameTransport: Send {
    /// Next incoming event; `None` once the peer is gone
    fn recv(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Write one text message
    fn send(&mut self, text: String) -> impl Future<Output = RuntimeResult<()>> + Send;
}

/// Axum WebSocket transport
pub struct WsTransport {
    socket: WebSocket,
}

impl WsTransport {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl FrameTransport for WsTransport {
    async fn recv(&mut self) -> Option<TransportEvent> {
        let event = match self.socket.recv().await? {
            Ok(Message::Text(text)) => TransportEvent::Text(text),
            Ok(Message::Binary(bytes)) => TransportEvent::Binary(bytes),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => TransportEvent::Control,
            Ok(Message::Close(_)) => TransportEvent::Close,
            Err(e) => TransportEvent::Error(e.to_string()),
        };
        Some(event)
    }

    async fn send(&mut self, text: String) -> RuntimeResult<()> {
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(|e| RuntimeError::Transport(e.to_string()))
    }
}

/// In-process transport over a pair of channels
pub struct MemoryTransport {
    incoming: mpsc::Receiver<TransportEvent>,
    outgoing: mpsc::Sender<String>,
}

/// Client side of a [`MemoryTransport`]
pub struct MemoryClient {
    pub to_server: mpsc::Sender<TransportEvent>,
    pub from_server: mpsc::Receiver<String>,
}

impl MemoryTransport {
    /// Connected transport / client pair
    pub fn pair(buffer: usize) -> (MemoryTransport, MemoryClient) {
        let (to_server, incoming) = mpsc::channel(buffer);
        let (outgoing, from_server) = mpsc::channel(buffer);
        (
            MemoryTransport { incoming, outgoing },
            MemoryClient {
                to_server,
                from_server,
            },
        )
    }
}

impl FrameTransport for MemoryTransport {
    async fn recv(&mut self) -> Option<TransportEvent> {
        self.incoming.recv().await
    }

    async fn send(&mut self, text: String) -> RuntimeResult<()> {
        self.outgoing
            .send(text)
            .await
            .map_err(|_| RuntimeError::Transport("client receiver dropped".to_string()))
    }
}

impl MemoryClient {
    pub async fn send_text(&self, text: impl Into<String>) -> bool {
        self.to_server
            .send(TransportEvent::Text(text.into()))
            .await
            .is_ok()
    }

    pub async fn close(&self) -> bool {
        self.to_server.send(TransportEvent::Close).await.is_ok()
    }

    pub async fn next_text(&mut self) -> Option<String> {
        self.from_server.recv().await
    }
}
