use crate::registry::registry_types::KioskStatus;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("kiosk is not registered")]
    KioskNotFound,

    #[error("kiosk is paired with another customer")]
    KioskBusy,

    #[error("customer already holds a session or pairing")]
    CustomerInUse,

    #[error("customer has no live session")]
    CustomerNotBound,

    #[error("connection does not match the active pairing")]
    Mismatch,

    #[error("registry event loop is not running")]
    Closed,
}

impl RegistryError {
    /// Short reason sent back to the peer in a failure response.
    pub fn reason(&self) -> &'static str {
        match self {
            RegistryError::KioskNotFound => KioskStatus::NotFound.as_str(),
            RegistryError::KioskBusy => KioskStatus::Busy.as_str(),
            RegistryError::CustomerInUse => "customer already connected",
            RegistryError::CustomerNotBound => "customer not connected",
            RegistryError::Mismatch => "kiosk assigned to a different customer",
            RegistryError::Closed => "broker unavailable",
        }
    }
}
