use crate::registry::registry_error::RegistryError;
use crate::registry::registry_types::{
    KioskStatus, Registration, RegistrySnapshot, Released, Role,
};
use kiosklink_core::{Connection, Customer, Kiosk, SessionId};
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<T>;

/// Operations on the registry. Each carries the channel its result goes back on.
#[derive(Debug)]
pub enum RegistryCommand {
    RegisterKiosk {
        kiosk: Kiosk,
        session: SessionId,
        reply: Reply<Registration>,
    },
    KioskStatus {
        kiosk: Kiosk,
        reply: Reply<KioskStatus>,
    },
    BindCustomer {
        customer: Customer,
        session: SessionId,
        reply: Reply<Result<(), RegistryError>>,
    },
    ReleaseCustomer {
        customer: Customer,
        reply: Reply<Option<SessionId>>,
    },
    /// Check that the kiosk is free and claim it for the customer, in one step.
    ReserveKiosk {
        connection: Connection,
        session: SessionId,
        reply: Reply<Result<SessionId, RegistryError>>,
    },
    TryCreateConnection {
        connection: Connection,
        reply: Reply<Result<SessionId, RegistryError>>,
    },
    AbortConnect {
        connection: Connection,
        reply: Reply<Option<SessionId>>,
    },
    BeginDisconnect {
        connection: Connection,
        session: SessionId,
        reply: Reply<Result<SessionId, RegistryError>>,
    },
    BreakConnection {
        connection: Connection,
        reply: Reply<Result<(), RegistryError>>,
    },
    FinishDisconnect {
        connection: Connection,
        reply: Reply<Result<Option<SessionId>, RegistryError>>,
    },
    LookupKiosk {
        kiosk: Kiosk,
        reply: Reply<Option<SessionId>>,
    },
    LookupCustomer {
        customer: Customer,
        reply: Reply<Option<SessionId>>,
    },
    Route {
        connection: Connection,
        from: Role,
        session: SessionId,
        reply: Reply<Option<SessionId>>,
    },
    ReleaseSession {
        session: SessionId,
        reply: Reply<Released>,
    },
    Snapshot {
        reply: Reply<RegistrySnapshot>,
    },
}
