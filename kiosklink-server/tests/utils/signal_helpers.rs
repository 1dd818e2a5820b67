use kiosklink_core::{
    Connection, Customer, Envelope, Kiosk, MouseEvent, MouseEventKind, Request, RequestKind,
    Response, SessionId,
};
use kiosklink_server::{Broker, ConnectionRouter, Role};

use super::mock_signaling::MockSignalingOutput;

/// Timeout for waiting on frames over a real socket (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 5000;

pub fn connection(kiosk_id: &str, customer_id: &str) -> Connection {
    Connection::new(Kiosk::new(kiosk_id), Customer::new(customer_id))
}

pub fn register_frame(kiosk_id: &str) -> String {
    encode(Request::register_kiosk(&Kiosk::new(kiosk_id)).unwrap())
}

pub fn connect_frame(connection: &Connection) -> String {
    encode(Request::connect_kiosk(connection).unwrap())
}

pub fn disconnect_frame(connection: &Connection) -> String {
    encode(Request::disconnect_kiosk(connection).unwrap())
}

/// Kiosk's answer to a forwarded request.
pub fn ack_frame(kind: RequestKind, connection: &Connection, success: bool) -> String {
    let response = if success {
        Response::success(kind)
    } else {
        Response::failure(kind, "kiosk said no")
    };
    encode(response.with_payload(connection).unwrap())
}

pub fn negotiation_request_frame(connection: &Connection, payload: &str) -> String {
    encode(Request::negotiation(connection, payload).unwrap())
}

pub fn negotiation_response_frame(connection: &Connection, payload: &str) -> String {
    let mut response = Response::success(RequestKind::NegotiationTransport)
        .with_payload(connection)
        .unwrap();
    response.negotiation_payload = Some(payload.to_string());
    encode(response)
}

pub fn mouse_frame(connection: &Connection, x: f32, y: f32) -> String {
    let event = MouseEvent {
        mouse_event_type: MouseEventKind::MouseDown,
        time_stamp: 1_700_000_000_000,
        x,
        y,
    };
    encode(Request::mouse_event(connection, &event).unwrap())
}

fn encode(envelope: impl Into<Envelope>) -> String {
    envelope.into().encode().unwrap()
}

/// One simulated socket: a router with a fresh session.
pub struct TestPeer {
    pub router: ConnectionRouter,
}

impl TestPeer {
    pub fn kiosk(broker: &Broker) -> Self {
        Self::new(Role::Kiosk, broker)
    }

    pub fn customer(broker: &Broker) -> Self {
        Self::new(Role::Customer, broker)
    }

    fn new(role: Role, broker: &Broker) -> Self {
        Self {
            router: ConnectionRouter::new(role, SessionId::new(), broker.clone()),
        }
    }

    pub fn session(&self) -> SessionId {
        self.router.session()
    }

    pub async fn send(&self, frame: &str) {
        assert!(
            self.router.handle_text(frame).await.is_continue(),
            "router asked to close the socket"
        );
    }

    pub async fn close(&self) {
        self.router.close().await;
    }
}

/// Registers `kiosk_id` on a new kiosk socket.
pub async fn register_kiosk(broker: &Broker, kiosk_id: &str) -> TestPeer {
    let kiosk = TestPeer::kiosk(broker);
    kiosk.send(&register_frame(kiosk_id)).await;
    kiosk
}

/// Runs connect request and kiosk acceptance; returns the customer socket.
pub async fn connect_customer(
    broker: &Broker,
    kiosk: &TestPeer,
    connection: &Connection,
) -> TestPeer {
    let customer = TestPeer::customer(broker);
    customer.send(&connect_frame(connection)).await;
    kiosk
        .send(&ack_frame(RequestKind::ConnectKiosk, connection, true))
        .await;
    customer
}

/// Asserts that the latest response to `peer` has `kind` and `success`, and
/// returns its message.
pub async fn expect_response(
    signaling: &MockSignalingOutput,
    peer: &TestPeer,
    kind: RequestKind,
    success: bool,
) -> String {
    let response = signaling
        .last_response_for(peer.session())
        .await
        .expect("no response delivered");
    assert_eq!(response.request_kind, kind);
    assert_eq!(response.is_success(), success, "unexpected outcome: {:?}", response);
    response.message
}

/// Latest request forwarded to `peer`.
pub async fn last_request(signaling: &MockSignalingOutput, peer: &TestPeer) -> Option<Request> {
    signaling
        .envelopes_for(peer.session())
        .await
        .into_iter()
        .rev()
        .find_map(|envelope| match envelope {
            Envelope::Request(request) => Some(request),
            Envelope::Response(_) => None,
        })
}
