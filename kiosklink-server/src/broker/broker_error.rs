use crate::registry::RegistryError;
use kiosklink_core::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
