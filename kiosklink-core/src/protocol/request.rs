use crate::model::{Connection, Kiosk, MouseEvent};
use crate::protocol::protocol_error::ProtocolError;
use crate::protocol::request_kind::RequestKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A request travelling from a peer to the broker, or forwarded by the broker
/// to the kiosk.
///
/// `payload` is itself a JSON document (a [`Kiosk`] for registration, a
/// [`Connection`] for everything else) carried as a string.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(alias = "requestId")]
    pub request_kind: RequestKind,
    pub payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "webRtcPayload")]
    pub negotiation_payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouse_event_payload: Option<String>,
}

impl Request {
    pub fn new(request_kind: RequestKind) -> Self {
        Self {
            request_kind,
            payload: String::new(),
            negotiation_payload: None,
            mouse_event_payload: None,
        }
    }

    pub fn with_payload<T: Serialize>(mut self, value: &T) -> Result<Self, ProtocolError> {
        self.payload = serde_json::to_string(value)?;
        Ok(self)
    }

    pub fn register_kiosk(kiosk: &Kiosk) -> Result<Self, ProtocolError> {
        Self::new(RequestKind::RegisterKiosk).with_payload(kiosk)
    }

    pub fn connect_kiosk(connection: &Connection) -> Result<Self, ProtocolError> {
        Self::new(RequestKind::ConnectKiosk).with_payload(connection)
    }

    pub fn disconnect_kiosk(connection: &Connection) -> Result<Self, ProtocolError> {
        Self::new(RequestKind::DisconnectKiosk).with_payload(connection)
    }

    pub fn negotiation(
        connection: &Connection,
        negotiation_payload: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let mut request = Self::new(RequestKind::NegotiationTransport).with_payload(connection)?;
        request.negotiation_payload = Some(negotiation_payload.into());
        Ok(request)
    }

    pub fn mouse_event(connection: &Connection, event: &MouseEvent) -> Result<Self, ProtocolError> {
        let mut request = Self::new(RequestKind::MouseEvent).with_payload(connection)?;
        request.mouse_event_payload = Some(serde_json::to_string(event)?);
        Ok(request)
    }

    /// Decodes the nested `payload` document.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_str(&self.payload).map_err(|source| ProtocolError::InvalidPayload {
            kind: self.request_kind,
            source,
        })
    }
}
