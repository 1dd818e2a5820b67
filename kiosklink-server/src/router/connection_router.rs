use crate::broker::{Broker, BrokerError};
use crate::registry::Role;
use kiosklink_core::{Connection, Envelope, Kiosk, RequestKind, SessionId};
use std::ops::ControlFlow;
use tracing::{error, warn};

/// Per-socket dispatcher. Knows which endpoint the socket came in on and
/// which frames that endpoint may send; everything else lives in the broker.
#[derive(Clone)]
pub struct ConnectionRouter {
    role: Role,
    session: SessionId,
    broker: Broker,
}

impl ConnectionRouter {
    pub fn new(role: Role, session: SessionId, broker: Broker) -> Self {
        Self {
            role,
            session,
            broker,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Handles one inbound text frame. `Break` means the socket should close.
    pub async fn handle_text(&self, text: &str) -> ControlFlow<()> {
        let envelope = match Envelope::decode(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Invalid frame from {} {}: {}", self.role, self.session, e);
                return ControlFlow::Continue(());
            }
        };

        let result = match self.role {
            Role::Kiosk => self.dispatch_kiosk(envelope, text).await,
            Role::Customer => self.dispatch_customer(envelope, text).await,
        };

        match result {
            Ok(()) => ControlFlow::Continue(()),
            Err(BrokerError::Protocol(e)) => {
                warn!("Dropping frame from {} {}: {}", self.role, self.session, e);
                ControlFlow::Continue(())
            }
            Err(BrokerError::Registry(e)) => {
                error!("Registry failure for {} {}: {}", self.role, self.session, e);
                ControlFlow::Break(())
            }
        }
    }

    /// Releases everything this socket owned. Called once the socket is gone.
    pub async fn close(&self) {
        if let Err(e) = self.broker.session_closed(self.session).await {
            error!("Cleanup of {} {} failed: {}", self.role, self.session, e);
        }
    }

    async fn dispatch_kiosk(&self, envelope: Envelope, text: &str) -> Result<(), BrokerError> {
        match envelope {
            Envelope::Request(request) => match request.request_kind {
                RequestKind::RegisterKiosk => {
                    let kiosk: Kiosk = request.payload_as()?;
                    self.broker.register_kiosk(self.session, kiosk).await
                }
                RequestKind::NegotiationTransport => {
                    let connection: Connection = request.payload_as()?;
                    self.relay(request.request_kind, connection, text).await
                }
                kind => self.off_vocabulary("request", kind),
            },
            Envelope::Response(response) => match response.request_kind {
                RequestKind::ConnectKiosk => {
                    self.broker.connect_result(self.session, response).await
                }
                RequestKind::DisconnectKiosk => {
                    self.broker.disconnect_result(self.session, response).await
                }
                RequestKind::NegotiationTransport => {
                    let connection: Connection = response.payload_as()?;
                    self.relay(response.request_kind, connection, text).await
                }
                kind => self.off_vocabulary("response", kind),
            },
        }
    }

    async fn dispatch_customer(&self, envelope: Envelope, text: &str) -> Result<(), BrokerError> {
        match envelope {
            Envelope::Request(request) => match request.request_kind {
                RequestKind::ConnectKiosk => {
                    let connection: Connection = request.payload_as()?;
                    self.broker.connect(self.session, connection).await
                }
                RequestKind::DisconnectKiosk => {
                    let connection: Connection = request.payload_as()?;
                    self.broker.disconnect(self.session, connection).await
                }
                RequestKind::NegotiationTransport | RequestKind::MouseEvent => {
                    let connection: Connection = request.payload_as()?;
                    self.relay(request.request_kind, connection, text).await
                }
                kind => self.off_vocabulary("request", kind),
            },
            Envelope::Response(response) => match response.request_kind {
                RequestKind::NegotiationTransport => {
                    let connection: Connection = response.payload_as()?;
                    self.relay(response.request_kind, connection, text).await
                }
                kind => self.off_vocabulary("response", kind),
            },
        }
    }

    async fn relay(
        &self,
        kind: RequestKind,
        connection: Connection,
        text: &str,
    ) -> Result<(), BrokerError> {
        self.broker
            .relay(self.role, self.session, kind, connection, text)
            .await
    }

    fn off_vocabulary(&self, variant: &str, kind: RequestKind) -> Result<(), BrokerError> {
        warn!(
            "{} {} may not send a {} {}, dropping",
            self.role, self.session, kind, variant
        );
        Ok(())
    }
}
