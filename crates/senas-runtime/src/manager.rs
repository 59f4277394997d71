//! Session manager - registry of live sessions and broadcast fan-out
//!
//! The registry is the only shared mutable state in the service. Each
//! session registers a bounded outbound queue; broadcast pushes into those
//! queues without waiting, so one stuck or vanished client never delays
//! or aborts delivery to the others.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use senas_core::PredictionService;
use senas_wire::ServerMessage;

use crate::{FrameTransport, Session, SessionId, TransportEvent};

/// Queue feeding one session's transport
pub type Outbound = mpsc::Sender<ServerMessage>;

/// Result of one broadcast call
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: Vec<SessionId>,
}

/// Registry counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManagerStats {
    pub registered_total: u64,
    pub broadcasts: u64,
    pub send_failures: u64,
}

/// Registry of active sessions
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Outbound>>,
    next_id: AtomicU64,
    registered_total: AtomicU64,
    broadcasts: AtomicU64,
    send_failures: AtomicU64,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh session id
    pub fn next_session_id(&self) -> SessionId {
        SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Add a session; returns the new active count
    pub fn register(&self, id: SessionId, outbound: Outbound) -> usize {
        let active = {
            let mut sessions = self.sessions.write();
            sessions.insert(id, outbound);
            sessions.len()
        };
        self.registered_total.fetch_add(1, Ordering::Relaxed);
        tracing::info!(session = %id, active, "session registered");
        active
    }

    /// Remove a session; returns the new active count
    pub fn unregister(&self, id: SessionId) -> usize {
        let (removed, active) = {
            let mut sessions = self.sessions.write();
            let removed = sessions.remove(&id).is_some();
            (removed, sessions.len())
        };
        if removed {
            tracing::info!(session = %id, active, "session unregistered");
        }
        active
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Send `message` to every registered session, at most once each.
    ///
    /// Works on a snapshot taken under the read lock, so sessions joining
    /// or leaving mid-broadcast are simply included or missed. Failed
    /// sends are logged and reported; they never stop the fan-out or
    /// change the registry.
    pub fn broadcast(&self, message: &ServerMessage) -> BroadcastReport {
        let snapshot: Vec<(SessionId, Outbound)> = self
            .sessions
            .read()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut report = BroadcastReport::default();
        for (id, tx) in snapshot {
            match tx.try_send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(session = %id, error = %e, "broadcast send failed");
                    report.failed.push(id);
                }
            }
        }

        self.broadcasts.fetch_add(1, Ordering::Relaxed);
        self.send_failures
            .fetch_add(report.failed.len() as u64, Ordering::Relaxed);
        report
    }

    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            registered_total: self.registered_total.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
        }
    }

    /// Drive one connection from accept to close.
    ///
    /// Registers the session, answers every frame directly on the
    /// transport, forwards queued broadcasts, and unregisters on client
    /// close or transport failure. Per-frame errors become typed error
    /// messages and never end the session.
    pub async fn run_session<T: FrameTransport>(
        self: Arc<Self>,
        mut transport: T,
        service: PredictionService,
        outbound_buffer: usize,
    ) -> Session {
        let (tx, mut rx) = mpsc::channel(outbound_buffer.max(1));
        let mut session = Session::open(self.next_session_id());
        self.register(session.id(), tx);

        loop {
            let reply = tokio::select! {
                event = transport.recv() => match event {
                    Some(TransportEvent::Text(text)) => session.handle_frame(&service, &text),
                    Some(TransportEvent::Binary(bytes)) => session.handle_binary(&service, &bytes),
                    Some(TransportEvent::Control) => None,
                    Some(TransportEvent::Error(e)) => {
                        tracing::warn!(session = %session.id(), error = %e, "transport error");
                        break;
                    }
                    Some(TransportEvent::Close) | None => break,
                },
                Some(queued) = rx.recv() => Some(queued),
            };

            let Some(message) = reply else {
                continue;
            };
            let text = match message.to_json() {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(session = %session.id(), error = %e, "message encoding failed");
                    continue;
                }
            };
            if let Err(e) = transport.send(text).await {
                tracing::warn!(session = %session.id(), error = %e, "send failed, closing");
                break;
            }
        }

        session.close();
        self.unregister(session.id());
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryTransport, SessionState};
    use proptest::prelude::*;

    fn notice() -> ServerMessage {
        ServerMessage::error("server restarting")
    }

    #[test]
    fn test_register_unregister_counts() {
        let manager = SessionManager::new();
        let (tx, _rx) = mpsc::channel(4);
        let a = manager.next_session_id();
        let b = manager.next_session_id();
        assert_ne!(a, b);

        assert_eq!(manager.register(a, tx.clone()), 1);
        assert_eq!(manager.register(b, tx), 2);
        assert_eq!(manager.unregister(a), 1);
        // Unknown / repeated removal leaves the count alone
        assert_eq!(manager.unregister(a), 1);
        assert_eq!(manager.unregister(b), 0);
        assert_eq!(manager.stats().registered_total, 2);
    }

    #[tokio::test]
    async fn test_broadcast_isolates_failures() {
        let manager = SessionManager::new();
        let mut receivers = Vec::new();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::channel(4);
            let id = manager.next_session_id();
            manager.register(id, tx);
            ids.push(id);
            receivers.push(rx);
        }

        // Middle session's receiving side is gone
        drop(receivers.remove(1));

        let report = manager.broadcast(&notice());
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, vec![ids[1]]);
        assert_eq!(manager.active_count(), 3);

        for rx in &mut receivers {
            assert_eq!(rx.recv().await, Some(notice()));
        }
        assert_eq!(manager.stats().send_failures, 1);
    }

    #[tokio::test]
    async fn test_broadcast_full_queue_is_dropped() {
        let manager = SessionManager::new();
        let (tx, mut rx) = mpsc::channel(1);
        manager.register(manager.next_session_id(), tx);

        assert_eq!(manager.broadcast(&notice()).delivered, 1);
        assert_eq!(manager.broadcast(&notice()).failed.len(), 1);
        assert_eq!(rx.recv().await, Some(notice()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_run_session_lifecycle() {
        let manager = Arc::new(SessionManager::new());
        let (transport, mut client) = MemoryTransport::pair(8);
        let task = tokio::spawn(manager.clone().run_session(
            transport,
            PredictionService::builtin(),
            8,
        ));

        assert!(client.send_text("not json").await);
        let reply = ServerMessage::from_json(&client.next_text().await.unwrap()).unwrap();
        assert!(reply.is_error());
        assert_eq!(manager.active_count(), 1);

        // Broadcasts reach the client through the session task
        let report = manager.broadcast(&notice());
        assert_eq!(report.delivered, 1);
        let forwarded = ServerMessage::from_json(&client.next_text().await.unwrap()).unwrap();
        assert_eq!(forwarded, notice());

        assert!(client.close().await);
        let session = task.await.unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.stats().errors, 1);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn test_run_session_ends_when_client_vanishes() {
        let manager = Arc::new(SessionManager::new());
        let (transport, client) = MemoryTransport::pair(8);
        let task = tokio::spawn(manager.clone().run_session(
            transport,
            PredictionService::builtin(),
            8,
        ));

        drop(client);
        let session = task.await.unwrap();
        assert!(session.is_closed());
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_unregister() {
        const TASKS: usize = 16;
        const CONNECTS: usize = 50;

        let manager = Arc::new(SessionManager::new());
        let mut handles = Vec::new();
        for task in 0..TASKS {
            let manager = manager.clone();
            // Each task leaves `task % 5` of its sessions connected
            handles.push(tokio::spawn(async move {
                let (tx, _rx) = mpsc::channel(1);
                let mut live = Vec::new();
                for i in 0..CONNECTS {
                    let id = manager.next_session_id();
                    manager.register(id, tx.clone());
                    live.push(id);
                    if i % 7 == 0 {
                        manager.broadcast(&ServerMessage::error("tick"));
                    }
                    tokio::task::yield_now().await;
                }
                let keep = task % 5;
                for id in live.drain(keep..) {
                    manager.unregister(id);
                    tokio::task::yield_now().await;
                }
                keep
            }));
        }

        let mut expected = 0;
        for handle in handles {
            expected += handle.await.unwrap();
        }
        assert_eq!(manager.active_count(), expected);
        assert_eq!(manager.stats().registered_total, (TASKS * CONNECTS) as u64);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Connect,
        Disconnect(usize),
    }

    fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
        prop::collection::vec(
            prop_oneof![Just(Op::Connect), (0usize..16).prop_map(Op::Disconnect)],
            0..64,
        )
    }

    proptest! {
        #[test]
        fn prop_active_count_is_connects_minus_disconnects(ops in arb_ops()) {
            let manager = SessionManager::new();
            let (tx, _rx) = mpsc::channel(1);
            let mut live: Vec<SessionId> = Vec::new();
            let (mut connects, mut disconnects) = (0usize, 0usize);

            for op in ops {
                match op {
                    Op::Connect => {
                        let id = manager.next_session_id();
                        manager.register(id, tx.clone());
                        live.push(id);
                        connects += 1;
                    }
                    Op::Disconnect(i) if !live.is_empty() => {
                        let id = live.remove(i % live.len());
                        manager.unregister(id);
                        disconnects += 1;
                    }
                    Op::Disconnect(_) => {}
                }
                prop_assert_eq!(manager.active_count(), connects - disconnects);
            }
        }
    }
}
