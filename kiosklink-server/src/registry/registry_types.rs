use kiosklink_core::{Connection, Customer, Kiosk, SessionId};
use std::fmt;

/// Which endpoint a socket was accepted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Kiosk,
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Kiosk => f.write_str("kiosk"),
            Role::Customer => f.write_str("customer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KioskStatus {
    NotFound,
    Free,
    Busy,
}

impl KioskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KioskStatus::NotFound => "not found",
            KioskStatus::Free => "free",
            KioskStatus::Busy => "busy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingPhase {
    /// Connect request forwarded, kiosk has not answered yet.
    Connecting,
    Connected,
    /// Disconnect request forwarded, kiosk has not answered yet.
    Disconnecting,
}

/// A pairing that lost one of its sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenPairing {
    pub connection: Connection,
    pub phase: PairingPhase,
    /// The side that went away.
    pub lost: Role,
    /// Session of the side that is still around, if it still has one.
    pub counterpart: Option<SessionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Previous session of this kiosk id when it differs from the new one.
    pub replaced: Option<SessionId>,
    /// Pairing held through the replaced session, torn down by the replacement.
    pub orphaned: Option<BrokenPairing>,
}

/// Everything a closed session owned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Released {
    pub kiosks: Vec<Kiosk>,
    pub customers: Vec<Customer>,
    pub broken: Vec<BrokenPairing>,
}

impl Released {
    pub fn is_empty(&self) -> bool {
        self.kiosks.is_empty() && self.customers.is_empty() && self.broken.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    pub kiosks: usize,
    pub customers: usize,
    pub pairings: Vec<(Connection, PairingPhase)>,
}

impl RegistrySnapshot {
    pub fn pairing_of(&self, kiosk: &Kiosk) -> Option<&(Connection, PairingPhase)> {
        self.pairings.iter().find(|(connection, _)| &connection.kiosk == kiosk)
    }
}
