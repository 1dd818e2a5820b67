use async_trait::async_trait;
use kiosklink_core::{Envelope, ProtocolError, SessionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("session {0} is no longer connected")]
    SessionGone(SessionId),

    #[error(transparent)]
    Encode(#[from] ProtocolError),
}

/// What the broker needs from the transport: push a text frame to a session,
/// or close it.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Queue a text frame for the socket behind `session`.
    async fn send_text(&self, session: SessionId, text: String) -> Result<(), DeliveryError>;

    /// Close the socket behind `session` after the frames already queued.
    async fn terminate(&self, session: SessionId);

    async fn send_envelope(
        &self,
        session: SessionId,
        envelope: &Envelope,
    ) -> Result<(), DeliveryError> {
        let text = envelope.encode()?;
        self.send_text(session, text).await
    }
}
