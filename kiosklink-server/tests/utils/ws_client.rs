use anyhow::{Context, Result, bail};
use futures::{SinkExt, StreamExt};
use kiosklink_core::Envelope;
use kiosklink_server::ServerConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::signal_helpers::SIGNAL_TIMEOUT_MS;

/// A broker running on an ephemeral port. Dropping it shuts the server down.
pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    pub async fn start(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test listener")?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            let served = kiosklink_server::serve_with_listener(listener, config, shutdown).await;
            if let Err(e) = served {
                tracing::error!("[TestServer] stopped with error: {:#}", e);
            }
        });

        Ok(Self {
            addr,
            _shutdown: shutdown_tx,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Raw HTTP response of `GET /health`, status line included.
    pub async fn health(&self) -> Result<String> {
        let mut stream = TcpStream::connect(self.addr).await?;
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await?;
        let mut response = String::new();
        stream.read_to_string(&mut response).await?;
        Ok(response)
    }
}

/// WebSocket client speaking raw text frames to the broker.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, frame: &str) -> Result<()> {
        self.stream
            .send(Message::text(frame.to_string()))
            .await
            .context("Failed to send frame")
    }

    /// Next text frame, skipping keepalives.
    pub async fn recv_text(&mut self) -> Result<String> {
        let timeout = Duration::from_millis(SIGNAL_TIMEOUT_MS);
        loop {
            let next = tokio::time::timeout(timeout, self.stream.next())
                .await
                .context("Timeout waiting for frame")?;
            match next {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_string()),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => bail!("Socket closed"),
                Some(Ok(other)) => bail!("Unexpected frame: {:?}", other),
                Some(Err(e)) => return Err(e).context("Socket error"),
            }
        }
    }

    pub async fn recv_envelope(&mut self) -> Result<Envelope> {
        let text = self.recv_text().await?;
        Envelope::decode(&text).context("Broker sent an undecodable frame")
    }

    /// Waits until the broker closes the socket, discarding anything queued
    /// before the close.
    pub async fn expect_closed(&mut self) -> Result<()> {
        let timeout = Duration::from_millis(SIGNAL_TIMEOUT_MS);
        loop {
            let next = tokio::time::timeout(timeout, self.stream.next())
                .await
                .context("Timeout waiting for close")?;
            match next {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return Ok(()),
                Some(Ok(_)) => continue,
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await.context("Failed to close socket")
    }
}
