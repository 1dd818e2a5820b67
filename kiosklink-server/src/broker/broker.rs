use crate::broker::broker_error::BrokerError;
use crate::registry::{BrokenPairing, PairingPhase, RegistryError, RegistryHandle, Role};
use crate::signaling::SignalingOutput;
use kiosklink_core::{Connection, Envelope, Kiosk, Request, RequestKind, Response, SessionId};
use std::sync::Arc;
use tracing::{debug, info, warn};

const REASON_REJECTED: &str = "kiosk rejected the connection";
const REASON_KIOSK_OFFLINE: &str = "kiosk went offline";
const REASON_REREGISTERED: &str = "kiosk re-registered";
const REASON_DISCONNECT_FAILED: &str = "kiosk failed to disconnect cleanly";

/// Pairing rules between kiosks and customers.
///
/// Every decision is taken by the registry; the broker turns the outcome into
/// frames for the affected sessions. Frames are sent only after the registry
/// call has returned.
#[derive(Clone)]
pub struct Broker {
    registry: RegistryHandle,
    signaling: Arc<dyn SignalingOutput>,
}

impl Broker {
    pub fn new(registry: RegistryHandle, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry,
            signaling,
        }
    }

    /// `register_kiosk` from a kiosk socket. Always answered with success.
    pub async fn register_kiosk(
        &self,
        session: SessionId,
        kiosk: Kiosk,
    ) -> Result<(), BrokerError> {
        let registration = self.registry.register_kiosk(kiosk.clone(), session).await?;
        info!("{} registered on session {}", kiosk, session);

        if let Some(previous) = registration.replaced {
            warn!("{} re-registered, closing previous session {}", kiosk, previous);
            self.signaling.terminate(previous).await;
        }
        if let Some(orphaned) = registration.orphaned {
            self.drop_customer(&orphaned, REASON_REREGISTERED).await?;
        }

        let response = Response::success(RequestKind::RegisterKiosk).with_payload(&kiosk)?;
        self.deliver(session, &response.into()).await;
        Ok(())
    }

    /// `connect_kiosk` from a customer socket.
    pub async fn connect(
        &self,
        session: SessionId,
        connection: Connection,
    ) -> Result<(), BrokerError> {
        match self.registry.reserve_kiosk(connection.clone(), session).await {
            Ok(kiosk_session) => {
                info!("Connect requested for {}, waiting for kiosk", connection);
                let request = Request::connect_kiosk(&connection)?;
                // If the kiosk is gone its own closure releases the reservation.
                self.deliver(kiosk_session, &request.into()).await;
                Ok(())
            }
            Err(RegistryError::Closed) => Err(RegistryError::Closed.into()),
            Err(e) => {
                warn!("Connect refused for {}: {}", connection, e);
                self.reject(session, RequestKind::ConnectKiosk, e.reason(), &connection)
                    .await
            }
        }
    }

    /// Kiosk's answer to a forwarded `connect_kiosk`.
    pub async fn connect_result(
        &self,
        session: SessionId,
        response: Response,
    ) -> Result<(), BrokerError> {
        let connection: Connection = response.payload_as()?;
        if !self.owns_kiosk(session, &connection.kiosk).await? {
            warn!("Session {} answered for {} it does not own", session, connection.kiosk);
            return Ok(());
        }

        if !response.is_success() {
            warn!("{} rejected by kiosk: {}", connection, response.message);
            if let Some(customer_session) = self.registry.abort_connect(connection.clone()).await? {
                let failure = Response::failure(RequestKind::ConnectKiosk, REASON_REJECTED)
                    .with_payload(&connection)?;
                self.deliver(customer_session, &failure.into()).await;
                self.signaling.terminate(customer_session).await;
            }
            return Ok(());
        }

        match self.registry.try_create_connection(connection.clone()).await {
            Ok(customer_session) => {
                info!("Connection established: {}", connection);
                let success =
                    Response::success(RequestKind::ConnectKiosk).with_payload(&connection)?;
                self.deliver(customer_session, &success.into()).await;
                Ok(())
            }
            Err(RegistryError::Closed) => Err(RegistryError::Closed.into()),
            Err(e) => {
                // The customer left or the slot was taken meanwhile; make the
                // kiosk tear down what it just set up.
                warn!("Kiosk accepted {} but it cannot be paired: {}", connection, e);
                let request = Request::disconnect_kiosk(&connection)?;
                self.deliver(session, &request.into()).await;
                Ok(())
            }
        }
    }

    /// `disconnect_kiosk` from a customer socket.
    pub async fn disconnect(
        &self,
        session: SessionId,
        connection: Connection,
    ) -> Result<(), BrokerError> {
        match self.registry.begin_disconnect(connection.clone(), session).await {
            Ok(kiosk_session) => {
                info!("Disconnect requested for {}", connection);
                let request = Request::disconnect_kiosk(&connection)?;
                self.deliver(kiosk_session, &request.into()).await;
                Ok(())
            }
            Err(RegistryError::Closed) => Err(RegistryError::Closed.into()),
            Err(e) => {
                warn!("Disconnect refused for {}: {}", connection, e);
                self.reject(session, RequestKind::DisconnectKiosk, e.reason(), &connection)
                    .await
            }
        }
    }

    /// Kiosk's answer to a forwarded `disconnect_kiosk`. The pairing is torn
    /// down whatever the kiosk reports.
    pub async fn disconnect_result(
        &self,
        session: SessionId,
        response: Response,
    ) -> Result<(), BrokerError> {
        let connection: Connection = response.payload_as()?;
        if !self.owns_kiosk(session, &connection.kiosk).await? {
            warn!("Session {} answered for {} it does not own", session, connection.kiosk);
            return Ok(());
        }

        let customer_session = match self.registry.finish_disconnect(connection.clone()).await {
            Ok(customer_session) => customer_session,
            Err(RegistryError::Closed) => return Err(RegistryError::Closed.into()),
            Err(e) => {
                debug!("Disconnect result for {} ignored: {}", connection, e);
                return Ok(());
            }
        };

        let outcome = if response.is_success() {
            info!("Connection closed: {}", connection);
            Response::success(RequestKind::DisconnectKiosk)
        } else {
            warn!("Kiosk reported failure closing {}: {}", connection, response.message);
            let message = if response.message.is_empty() {
                REASON_DISCONNECT_FAILED.to_owned()
            } else {
                response.message.clone()
            };
            Response::failure(RequestKind::DisconnectKiosk, message)
        };
        let forwarded = outcome.with_payload(&connection)?;

        if let Some(customer_session) = customer_session {
            self.deliver(customer_session, &forwarded.into()).await;
            self.signaling.terminate(customer_session).await;
        }
        Ok(())
    }

    /// Forwards `text` unchanged to the other side of `connection`, if
    /// `connection` is the live pairing and `session` is its `from` side.
    /// Anything else is dropped.
    pub async fn relay(
        &self,
        from: Role,
        session: SessionId,
        kind: RequestKind,
        connection: Connection,
        text: &str,
    ) -> Result<(), BrokerError> {
        match self.registry.route(connection.clone(), from, session).await? {
            Some(destination) => {
                debug!("Relaying {} from {} for {}", kind, from, connection);
                if let Err(e) = self.signaling.send_text(destination, text.to_owned()).await {
                    warn!("Relay to {} failed: {}", destination, e);
                    self.signaling.terminate(destination).await;
                }
            }
            None => debug!("Dropping {} from {} for unmatched {}", kind, from, connection),
        }
        Ok(())
    }

    /// Releases everything `session` owned and tells the other side of any
    /// pairing it was part of.
    pub async fn session_closed(&self, session: SessionId) -> Result<(), BrokerError> {
        let released = self.registry.release_session(session).await?;

        for kiosk in &released.kiosks {
            info!("{} went offline", kiosk);
        }
        for broken in &released.broken {
            match broken.lost {
                Role::Kiosk => self.drop_customer(broken, REASON_KIOSK_OFFLINE).await?,
                Role::Customer => {
                    info!("{} left, asking kiosk to tear down", broken.connection.customer);
                    if let Some(kiosk_session) = broken.counterpart {
                        let request = Request::disconnect_kiosk(&broken.connection)?;
                        self.deliver(kiosk_session, &request.into()).await;
                    }
                }
            }
        }
        Ok(())
    }

    async fn drop_customer(&self, broken: &BrokenPairing, reason: &str) -> Result<(), BrokerError> {
        let Some(customer_session) = broken.counterpart else {
            return Ok(());
        };
        let kind = match broken.phase {
            PairingPhase::Connecting => RequestKind::ConnectKiosk,
            PairingPhase::Connected | PairingPhase::Disconnecting => RequestKind::DisconnectKiosk,
        };
        warn!("Dropping {}: {}", broken.connection, reason);
        let failure = Response::failure(kind, reason).with_payload(&broken.connection)?;
        self.deliver(customer_session, &failure.into()).await;
        self.signaling.terminate(customer_session).await;
        Ok(())
    }

    async fn reject(
        &self,
        session: SessionId,
        kind: RequestKind,
        reason: &str,
        connection: &Connection,
    ) -> Result<(), BrokerError> {
        let failure = Response::failure(kind, reason).with_payload(connection)?;
        self.deliver(session, &failure.into()).await;
        self.signaling.terminate(session).await;
        Ok(())
    }

    async fn owns_kiosk(&self, session: SessionId, kiosk: &Kiosk) -> Result<bool, BrokerError> {
        Ok(self.registry.lookup_kiosk_session(kiosk.clone()).await? == Some(session))
    }

    /// A failed send ends the destination's session, nothing else.
    async fn deliver(&self, session: SessionId, envelope: &Envelope) {
        if let Err(e) = self.signaling.send_envelope(session, envelope).await {
            warn!("Delivery of {} to {} failed: {}", envelope.request_kind(), session, e);
            self.signaling.terminate(session).await;
        }
    }
}
