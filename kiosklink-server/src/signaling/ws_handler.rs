use crate::app::AppState;
use crate::registry::Role;
use crate::router::ConnectionRouter;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use kiosklink_core::SessionId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn kiosk_ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    upgrade(ws, state, Role::Kiosk)
}

pub async fn customer_ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    upgrade(ws, state, Role::Customer)
}

fn upgrade(ws: WebSocketUpgrade, state: AppState, role: Role) -> Response {
    let limit = state.config.max_frame_bytes;
    ws.max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| handle_socket(socket, role, state))
}

async fn handle_socket(socket: WebSocket, role: Role, state: AppState) {
    let session = SessionId::new();
    info!("New {} connection: {}", role, session);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.signaling.add_session(session, tx);
    let router = ConnectionRouter::new(role, session, state.broker.clone());

    let ping_interval = state.config.ping_interval;
    let mut send_task = tokio::spawn(async move {
        let mut keepalive = tokio::time::interval(ping_interval);
        // The first tick completes immediately.
        keepalive.tick().await;

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    let closing = matches!(msg, Message::Close(_));
                    if sender.send(msg).await.is_err() || closing {
                        break;
                    }
                }
                _ = keepalive.tick() => {
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    let idle_timeout = state.config.idle_timeout;
    let mut recv_task = tokio::spawn({
        let router = router.clone();

        async move {
            loop {
                let next = match tokio::time::timeout(idle_timeout, receiver.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        warn!("{} {} idle for {:?}, closing", role, session, idle_timeout);
                        break;
                    }
                };
                let Some(Ok(msg)) = next else { break };

                match msg {
                    Message::Text(text) => {
                        if router.handle_text(text.as_str()).await.is_break() {
                            break;
                        }
                    }
                    Message::Binary(data) => warn!(
                        "Dropping {} byte binary frame from {} {}",
                        data.len(),
                        role,
                        session
                    ),
                    Message::Close(_) => break,
                    Message::Ping(_) | Message::Pong(_) => debug!("Keepalive from {}", session),
                }
            }
        }
    });

    let writer_finished = tokio::select! {
        _ = (&mut send_task) => true,
        _ = (&mut recv_task) => false,
    };

    // Wait for the aborted task to unwind so that no command it already issued
    // can reach the registry after the session is released.
    let remaining = if writer_finished { recv_task } else { send_task };
    remaining.abort();
    let _ = remaining.await;

    state.signaling.remove_session(&session);
    router.close().await;
    info!("{} disconnected: {}", role, session);
}
