use crate::signaling::signaling_output::{DeliveryError, SignalingOutput};
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use kiosklink_core::SessionId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

struct SignalingInner {
    sessions: DashMap<SessionId, mpsc::UnboundedSender<Message>>,
}

/// Outbound side of every open WebSocket, keyed by session.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                sessions: DashMap::new(),
            }),
        }
    }

    pub fn add_session(&self, session: SessionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.sessions.insert(session, tx);
    }

    pub fn remove_session(&self, session: &SessionId) {
        self.inner.sessions.remove(session);
    }

    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_text(&self, session: SessionId, text: String) -> Result<(), DeliveryError> {
        let Some(peer) = self.inner.sessions.get(&session) else {
            warn!("Attempted to send to disconnected session {}", session);
            return Err(DeliveryError::SessionGone(session));
        };
        peer.send(Message::Text(text.into()))
            .map_err(|_| DeliveryError::SessionGone(session))
    }

    async fn terminate(&self, session: SessionId) {
        // Dropping the sender lets the writer drain the queue and exit.
        if let Some((_, tx)) = self.inner.sessions.remove(&session) {
            debug!("Terminating session {}", session);
            let _ = tx.send(Message::Close(None));
        }
    }
}
