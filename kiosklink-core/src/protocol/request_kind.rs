use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of operations a frame can carry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    RegisterKiosk,
    ConnectKiosk,
    DisconnectKiosk,
    /// Opaque offer/answer/ICE blob for the peer-to-peer channel.
    #[serde(alias = "web_rtc_transport")]
    NegotiationTransport,
    /// Pointer event from the customer, injected on the kiosk.
    MouseEvent,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::RegisterKiosk => "register_kiosk",
            RequestKind::ConnectKiosk => "connect_kiosk",
            RequestKind::DisconnectKiosk => "disconnect_kiosk",
            RequestKind::NegotiationTransport => "negotiation_transport",
            RequestKind::MouseEvent => "mouse_event",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
