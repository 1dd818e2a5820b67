use kiosklink_core::{Connection, Customer, Kiosk, RequestKind};
use kiosklink_server::registry::KioskStatus;

use crate::integration::{create_test_broker, init_tracing};
use crate::utils::{
    TestPeer, ack_frame, connect_customer, connect_frame, connection, last_request, register_kiosk,
};

#[tokio::test]
async fn test_customer_socket_closes_while_connected() {
    init_tracing();

    let (broker, registry, signaling) = create_test_broker();
    let kiosk = register_kiosk(&broker, "k1").await;
    let conn = connection("k1", "c1");
    let customer = connect_customer(&broker, &kiosk, &conn).await;

    customer.close().await;

    // The kiosk is told to stop streaming and is free again.
    let request = last_request(&signaling, &kiosk).await.unwrap();
    assert_eq!(request.request_kind, RequestKind::DisconnectKiosk);
    assert_eq!(request.payload_as::<Connection>().unwrap(), conn);
    assert_eq!(
        registry.kiosk_status(Kiosk::new("k1")).await.unwrap(),
        KioskStatus::Free
    );
    assert_eq!(
        registry.lookup_customer_session(Customer::new("c1")).await.unwrap(),
        None
    );

    // The kiosk's late answer has no pairing to act on.
    let sent = signaling.text_count().await;
    kiosk
        .send(&ack_frame(RequestKind::DisconnectKiosk, &conn, true))
        .await;
    assert_eq!(signaling.text_count().await, sent);
    assert!(!signaling.is_terminated(kiosk.session()).await);
}

#[tokio::test]
async fn test_freed_kiosk_accepts_next_customer() {
    init_tracing();

    let (broker, registry, signaling) = create_test_broker();
    let kiosk = register_kiosk(&broker, "k1").await;
    let first = connect_customer(&broker, &kiosk, &connection("k1", "c1")).await;
    first.close().await;

    let next = TestPeer::customer(&broker);
    next.send(&connect_frame(&connection("k1", "c2"))).await;

    let request = last_request(&signaling, &kiosk).await.unwrap();
    assert_eq!(request.request_kind, RequestKind::ConnectKiosk);
    assert_eq!(
        registry.kiosk_status(Kiosk::new("k1")).await.unwrap(),
        KioskStatus::Busy
    );
}
