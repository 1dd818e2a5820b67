use crate::protocol::request_kind::RequestKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frame does not match any known message shape")]
    UnknownShape,

    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        kind: RequestKind,
        source: serde_json::Error,
    },
}
