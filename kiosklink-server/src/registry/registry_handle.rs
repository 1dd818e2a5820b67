use crate::registry::registry::Registry;
use crate::registry::registry_command::{RegistryCommand, Reply};
use crate::registry::registry_error::RegistryError;
use crate::registry::registry_types::{
    KioskStatus, Registration, RegistrySnapshot, Released, Role,
};
use kiosklink_core::{Connection, Customer, Kiosk, SessionId};
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to the registry event loop.
#[derive(Clone)]
pub struct RegistryHandle {
    command_tx: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    /// Starts the registry event loop on the current runtime.
    pub fn spawn(capacity: usize) -> Self {
        let (command_tx, command_rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(Registry::new(command_rx).run());
        Self { command_tx }
    }

    pub fn from_sender(command_tx: mpsc::Sender<RegistryCommand>) -> Self {
        Self { command_tx }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> RegistryCommand,
    ) -> Result<T, RegistryError> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(build(reply))
            .await
            .map_err(|_| RegistryError::Closed)?;
        response.await.map_err(|_| RegistryError::Closed)
    }

    pub async fn register_kiosk(
        &self,
        kiosk: Kiosk,
        session: SessionId,
    ) -> Result<Registration, RegistryError> {
        self.request(|reply| RegistryCommand::RegisterKiosk {
            kiosk,
            session,
            reply,
        })
        .await
    }

    pub async fn kiosk_status(&self, kiosk: Kiosk) -> Result<KioskStatus, RegistryError> {
        self.request(|reply| RegistryCommand::KioskStatus { kiosk, reply })
            .await
    }

    pub async fn bind_customer(
        &self,
        customer: Customer,
        session: SessionId,
    ) -> Result<(), RegistryError> {
        self.request(|reply| RegistryCommand::BindCustomer {
            customer,
            session,
            reply,
        })
        .await?
    }

    pub async fn release_customer(
        &self,
        customer: Customer,
    ) -> Result<Option<SessionId>, RegistryError> {
        self.request(|reply| RegistryCommand::ReleaseCustomer { customer, reply })
            .await
    }

    /// Claims a free kiosk for `connection.customer` and binds the customer to
    /// `session`. Returns the kiosk's session.
    pub async fn reserve_kiosk(
        &self,
        connection: Connection,
        session: SessionId,
    ) -> Result<SessionId, RegistryError> {
        self.request(|reply| RegistryCommand::ReserveKiosk {
            connection,
            session,
            reply,
        })
        .await?
    }

    /// Records the pairing as established. Returns the customer's session.
    pub async fn try_create_connection(
        &self,
        connection: Connection,
    ) -> Result<SessionId, RegistryError> {
        self.request(|reply| RegistryCommand::TryCreateConnection { connection, reply })
            .await?
    }

    pub async fn abort_connect(
        &self,
        connection: Connection,
    ) -> Result<Option<SessionId>, RegistryError> {
        self.request(|reply| RegistryCommand::AbortConnect { connection, reply })
            .await
    }

    /// Returns the kiosk's session.
    pub async fn begin_disconnect(
        &self,
        connection: Connection,
        session: SessionId,
    ) -> Result<SessionId, RegistryError> {
        self.request(|reply| RegistryCommand::BeginDisconnect {
            connection,
            session,
            reply,
        })
        .await?
    }

    pub async fn break_connection(&self, connection: Connection) -> Result<(), RegistryError> {
        self.request(|reply| RegistryCommand::BreakConnection { connection, reply })
            .await?
    }

    /// Breaks the pairing and releases the customer. Returns the customer's
    /// former session.
    pub async fn finish_disconnect(
        &self,
        connection: Connection,
    ) -> Result<Option<SessionId>, RegistryError> {
        self.request(|reply| RegistryCommand::FinishDisconnect { connection, reply })
            .await?
    }

    pub async fn lookup_kiosk_session(
        &self,
        kiosk: Kiosk,
    ) -> Result<Option<SessionId>, RegistryError> {
        self.request(|reply| RegistryCommand::LookupKiosk { kiosk, reply })
            .await
    }

    pub async fn lookup_customer_session(
        &self,
        customer: Customer,
    ) -> Result<Option<SessionId>, RegistryError> {
        self.request(|reply| RegistryCommand::LookupCustomer { customer, reply })
            .await
    }

    pub async fn route(
        &self,
        connection: Connection,
        from: Role,
        session: SessionId,
    ) -> Result<Option<SessionId>, RegistryError> {
        self.request(|reply| RegistryCommand::Route {
            connection,
            from,
            session,
            reply,
        })
        .await
    }

    pub async fn release_session(&self, session: SessionId) -> Result<Released, RegistryError> {
        self.request(|reply| RegistryCommand::ReleaseSession { session, reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<RegistrySnapshot, RegistryError> {
        self.request(|reply| RegistryCommand::Snapshot { reply })
            .await
    }
}
