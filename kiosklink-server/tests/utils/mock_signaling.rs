use async_trait::async_trait;
use kiosklink_core::{Envelope, Response, SessionId};
use kiosklink_server::{DeliveryError, SignalingOutput};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text { session: SessionId, text: String },
    Terminate { session: SessionId },
}

#[derive(Default)]
struct MockState {
    outbound: Vec<Outbound>,
    /// Sessions that were terminated; sends to them fail like a closed socket.
    closed: HashSet<SessionId>,
}

/// Mock SignalingOutput that captures every frame and termination.
#[derive(Clone)]
pub struct MockSignalingOutput {
    tx: mpsc::UnboundedSender<Outbound>,
    state: Arc<Mutex<MockState>>,
}

impl MockSignalingOutput {
    /// Create a new MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            state: Arc::new(Mutex::new(MockState::default())),
        };
        (signaling, rx)
    }

    pub fn new_stored_only() -> Self {
        Self::new().0
    }

    /// Raw text frames delivered to `session`, oldest first.
    pub async fn texts_for(&self, session: SessionId) -> Vec<String> {
        self.state
            .lock()
            .await
            .outbound
            .iter()
            .filter_map(|o| match o {
                Outbound::Text { session: s, text } if *s == session => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn envelopes_for(&self, session: SessionId) -> Vec<Envelope> {
        self.texts_for(session)
            .await
            .iter()
            .map(|text| Envelope::decode(text).expect("broker sent an undecodable frame"))
            .collect()
    }

    pub async fn last_response_for(&self, session: SessionId) -> Option<Response> {
        self.envelopes_for(session)
            .await
            .into_iter()
            .rev()
            .find_map(|envelope| match envelope {
                Envelope::Response(response) => Some(response),
                Envelope::Request(_) => None,
            })
    }

    pub async fn is_terminated(&self, session: SessionId) -> bool {
        self.state.lock().await.closed.contains(&session)
    }

    /// Number of frames delivered to anyone.
    pub async fn text_count(&self) -> usize {
        self.state
            .lock()
            .await
            .outbound
            .iter()
            .filter(|o| matches!(o, Outbound::Text { .. }))
            .count()
    }

    pub async fn clear(&self) {
        self.state.lock().await.outbound.clear();
    }
}

impl Default for MockSignalingOutput {
    fn default() -> Self {
        Self::new_stored_only()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send_text(&self, session: SessionId, text: String) -> Result<(), DeliveryError> {
        tracing::debug!("[MockSignaling] send_text to {}", session);

        let mut state = self.state.lock().await;
        if state.closed.contains(&session) {
            return Err(DeliveryError::SessionGone(session));
        }
        let msg = Outbound::Text { session, text };
        state.outbound.push(msg.clone());
        let _ = self.tx.send(msg);
        Ok(())
    }

    async fn terminate(&self, session: SessionId) {
        tracing::debug!("[MockSignaling] terminate {}", session);

        let mut state = self.state.lock().await;
        if state.closed.insert(session) {
            let msg = Outbound::Terminate { session };
            state.outbound.push(msg.clone());
            let _ = self.tx.send(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_captures_text() {
        let (signaling, mut rx) = MockSignalingOutput::new();
        let session = SessionId::new();

        signaling.send_text(session, "hello".to_string()).await.unwrap();

        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, Outbound::Text { .. }));
        assert_eq!(signaling.texts_for(session).await, vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_terminated_session_refuses_frames() {
        let signaling = MockSignalingOutput::new_stored_only();
        let session = SessionId::new();

        signaling.terminate(session).await;

        assert!(signaling.is_terminated(session).await);
        assert!(signaling.send_text(session, "late".to_string()).await.is_err());
    }
}
