//! Señas Connect Runtime - streaming classification service
//!
//! This crate wires the classifier to connected clients:
//! - Per-connection sessions (OPEN → STREAMING → CLOSED)
//! - Session registry with isolated broadcast fan-out
//! - HTTP endpoints for one-shot prediction and catalog listing
//! - WebSocket endpoint running one session task per connection
//! - Configuration and tracing setup

pub mod error;
pub mod config;
pub mod telemetry;
pub mod session;
pub mod manager;
pub mod transport;
pub mod server;

pub use error::*;
pub use config::*;
pub use telemetry::*;
pub use session::*;
pub use manager::*;
pub use transport::*;
pub use server::*;
