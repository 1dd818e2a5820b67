use kiosklink_core::{Envelope, MouseEvent, MouseEventKind};

use crate::integration::{create_test_broker, init_tracing};
use crate::utils::{connect_customer, connection, mouse_frame, register_kiosk};

#[tokio::test]
async fn test_mouse_events_reach_kiosk() {
    init_tracing();

    let (broker, _, signaling) = create_test_broker();
    let kiosk = register_kiosk(&broker, "k1").await;
    let conn = connection("k1", "c1");
    let customer = connect_customer(&broker, &kiosk, &conn).await;

    let frame = mouse_frame(&conn, 120.5, 48.0);
    customer.send(&frame).await;

    let texts = signaling.texts_for(kiosk.session()).await;
    assert_eq!(texts.last(), Some(&frame));

    let Envelope::Request(request) = Envelope::decode(&frame).unwrap() else {
        panic!("expected a request");
    };
    let event: MouseEvent =
        serde_json::from_str(request.mouse_event_payload.as_deref().unwrap()).unwrap();
    assert_eq!(event.mouse_event_type, MouseEventKind::MouseDown);
    assert_eq!(event.x, 120.5);
}

#[tokio::test]
async fn test_kiosk_mouse_events_are_dropped() {
    init_tracing();

    let (broker, _, signaling) = create_test_broker();
    let kiosk = register_kiosk(&broker, "k1").await;
    let conn = connection("k1", "c1");
    let customer = connect_customer(&broker, &kiosk, &conn).await;
    let before = signaling.texts_for(customer.session()).await.len();

    kiosk.send(&mouse_frame(&conn, 1.0, 1.0)).await;

    assert_eq!(signaling.texts_for(customer.session()).await.len(), before);
}
