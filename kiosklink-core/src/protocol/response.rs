use crate::protocol::protocol_error::ProtocolError;
use crate::protocol::request_kind::RequestKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// Result of a request, either produced by the broker or by the kiosk.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(alias = "requestId")]
    pub request_kind: RequestKind,
    pub result: Outcome,
    pub message: String,
    pub payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "webRtcPayload")]
    pub negotiation_payload: Option<String>,
}

impl Response {
    pub fn success(request_kind: RequestKind) -> Self {
        Self {
            request_kind,
            result: Outcome::Success,
            message: String::new(),
            payload: String::new(),
            negotiation_payload: None,
        }
    }

    pub fn failure(request_kind: RequestKind, message: impl Into<String>) -> Self {
        Self {
            request_kind,
            result: Outcome::Failure,
            message: message.into(),
            payload: String::new(),
            negotiation_payload: None,
        }
    }

    pub fn with_payload<T: Serialize>(mut self, value: &T) -> Result<Self, ProtocolError> {
        self.payload = serde_json::to_string(value)?;
        Ok(self)
    }

    pub fn is_success(&self) -> bool {
        self.result == Outcome::Success
    }

    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_str(&self.payload).map_err(|source| ProtocolError::InvalidPayload {
            kind: self.request_kind,
            source,
        })
    }
}
