//! Streaming session - per-connection lifecycle and frame handling

use std::fmt;

use senas_core::PredictionService;
use senas_wire::{decode_frame, ServerMessage};

/// Connection identity, unique for the lifetime of the process
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(pub u64);

impl SessionId {
    #[inline]
    pub fn new(id: u64) -> Self {
        SessionId(id)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session({:08x})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Session lifecycle. CLOSED is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Transport accepted, nothing processed yet
    Open,
    /// At least one frame processed
    Streaming,
    Closed,
}

/// Per-session counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_received: u64,
    pub predictions_sent: u64,
    pub empty_frames: u64,
    pub errors: u64,
}

/// One live streaming connection.
///
/// Owns no classification state; every frame is classified on its own.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    state: SessionState,
    stats: SessionStats,
}

impl Session {
    /// Enter OPEN on transport accept
    pub fn open(id: SessionId) -> Self {
        Session {
            id,
            state: SessionState::Open,
            stats: SessionStats::default(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Handle one incoming text frame.
    ///
    /// - malformed payload: typed error reply, state unchanged
    /// - no hands: no reply
    /// - hands: prediction for the first hand
    ///
    /// Frames arriving after close are ignored.
    pub fn handle_frame(
        &mut self,
        service: &PredictionService,
        text: &str,
    ) -> Option<ServerMessage> {
        if self.is_closed() {
            tracing::debug!(session = %self.id, "frame after close ignored");
            return None;
        }
        self.stats.frames_received += 1;

        let hands = match decode_frame(text) {
            Ok(hands) => hands,
            Err(e) => {
                self.stats.errors += 1;
                tracing::warn!(session = %self.id, error = %e, "rejected frame");
                return Some(ServerMessage::error(e.to_string()));
            }
        };

        self.state = SessionState::Streaming;

        if hands.is_empty() {
            self.stats.empty_frames += 1;
            return None;
        }
        if hands.len() > 1 {
            tracing::trace!(session = %self.id, hands = hands.len(), "extra hands ignored");
        }

        let result = service.predict(&hands);
        self.stats.predictions_sent += 1;
        Some(ServerMessage::prediction(&result))
    }

    /// Handle a binary frame as UTF-8 text
    pub fn handle_binary(
        &mut self,
        service: &PredictionService,
        bytes: &[u8],
    ) -> Option<ServerMessage> {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.handle_frame(service, text),
            Err(e) if !self.is_closed() => {
                self.stats.frames_received += 1;
                self.stats.errors += 1;
                tracing::warn!(session = %self.id, error = %e, "rejected binary frame");
                Some(ServerMessage::error(format!("Invalid payload: {e}")))
            }
            Err(_) => None,
        }
    }

    /// Enter CLOSED. Idempotent.
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            self.state = SessionState::Closed;
            tracing::debug!(
                session = %self.id,
                frames = self.stats.frames_received,
                predictions = self.stats.predictions_sent,
                errors = self.stats.errors,
                "session closed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use senas_core::synthetic::synthetic_hand;
    use senas_core::ThumbDirection;
    use senas_wire::{HandPayload, HandednessPayload, StreamFrame};
    use std::io;
    use std::sync::Arc;
    use parking_lot::Mutex;

    fn frame(fingers: [bool; 5], thumb: ThumbDirection, pinch: bool) -> String {
        let points = synthetic_hand(fingers, thumb, pinch);
        StreamFrame {
            hands: vec![HandPayload::new(&points, HandednessPayload::Right, 1.0)],
        }
        .to_json()
        .unwrap()
    }

    #[test]
    fn test_open_then_streaming() {
        let service = PredictionService::builtin();
        let mut session = Session::open(SessionId::new(1));
        assert_eq!(session.state(), SessionState::Open);

        let peace = frame([false, true, true, false, false], ThumbDirection::Side, false);
        let reply = session.handle_frame(&service, &peace).unwrap();
        assert_eq!(
            reply,
            ServerMessage::Prediction {
                gesture: Some("Paz".into()),
                text: Some("2".into()),
                confidence: 1.0
            }
        );
        assert_eq!(session.state(), SessionState::Streaming);
        assert_eq!(session.stats().predictions_sent, 1);
    }

    #[test]
    fn test_malformed_frame_keeps_session() {
        let service = PredictionService::builtin();
        let mut session = Session::open(SessionId::new(2));

        let reply = session.handle_frame(&service, "{oops").unwrap();
        assert!(reply.is_error());
        assert_eq!(session.state(), SessionState::Open);

        session.handle_frame(&service, &frame([false; 5], ThumbDirection::Side, false));
        let reply = session.handle_frame(&service, r#"{"hands":[{"landmarks":[]}]}"#).unwrap();
        assert!(reply.is_error());
        assert_eq!(session.state(), SessionState::Streaming);
        assert_eq!(session.stats().errors, 2);
    }

    #[test]
    fn test_empty_hands_no_reply() {
        let service = PredictionService::builtin();
        let mut session = Session::open(SessionId::new(3));
        assert!(session.handle_frame(&service, r#"{"hands":[]}"#).is_none());
        assert!(session.handle_frame(&service, "{}").is_none());
        assert_eq!(session.stats().empty_frames, 2);
        assert_eq!(session.state(), SessionState::Streaming);
    }

    #[test]
    fn test_no_match_still_replies() {
        let service = PredictionService::builtin();
        let mut session = Session::open(SessionId::new(4));
        // Every entry scores at most 0.6 for this pattern
        let unknown = frame([false, false, true, false, true], ThumbDirection::Side, false);
        let reply = session.handle_frame(&service, &unknown).unwrap();
        assert_eq!(
            reply,
            ServerMessage::Prediction {
                gesture: None,
                text: None,
                confidence: 0.0
            }
        );
    }

    #[test]
    fn test_binary_frames() {
        let service = PredictionService::builtin();
        let mut session = Session::open(SessionId::new(5));
        let text = frame([false; 5], ThumbDirection::Side, false);
        assert!(!session.handle_binary(&service, text.as_bytes()).unwrap().is_error());
        assert!(session.handle_binary(&service, &[0xff, 0xfe]).unwrap().is_error());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_invalid_utf8_binary_is_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let service = PredictionService::builtin();
        let mut session = Session::open(SessionId::new(7));
        let reply = tracing::subscriber::with_default(subscriber, || {
            session.handle_binary(&service, &[0xc3, 0x28])
        });

        assert!(reply.unwrap().is_error());
        assert_eq!(session.stats().errors, 1);
        let output = String::from_utf8(logs.0.lock().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("rejected binary frame"), "{output}");
        assert!(output.contains("00000007"), "{output}");
    }

    #[test]
    fn test_closed_is_terminal() {
        let service = PredictionService::builtin();
        let mut session = Session::open(SessionId::new(6));
        session.close();
        session.close();
        assert!(session.is_closed());
        assert!(session
            .handle_frame(&service, &frame([false; 5], ThumbDirection::Side, false))
            .is_none());
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.stats().frames_received, 0);
    }
}
