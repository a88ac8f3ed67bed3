//! WebSocket Socket
//!
//! `tokio-tungstenite`-backed [`Socket`]. Connecting and sending are bounded
//! by the configured timeout; inbound text is size-checked and parsed
//! before it reaches the session.
//!
//! Reads are bounded too, but only once a message has started to arrive:
//! an idle socket between invites is normal, a frame that stops halfway is
//! not. The TCP stream is wrapped in [`CountingStream`] so the socket can
//! tell the two apart.

use std::future::{poll_fn, Future};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio::time::{sleep_until, timeout, Instant, Sleep};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{client_async_tls, MaybeTlsStream, WebSocketStream};

use super::traits::{Inbound, Socket, SocketError};
use crate::config::{ServerConfig, TransportSettings};

type Stream = WebSocketStream<MaybeTlsStream<CountingStream<TcpStream>>>;
type Frame = Option<Result<Message, tokio_tungstenite::tungstenite::Error>>;

// ============================================================================
// Read progress
// ============================================================================

/// Transport stream that counts the bytes read through it
struct CountingStream<S> {
    inner: S,
    read: Arc<AtomicU64>,
}

impl<S> CountingStream<S> {
    fn new(inner: S, read: Arc<AtomicU64>) -> Self {
        Self { inner, read }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for CountingStream<S> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let poll = Pin::new(&mut self.inner).poll_read(cx, buf);
        let added = buf.filled().len() - before;
        self.read.fetch_add(added as u64, Ordering::Relaxed);
        poll
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for CountingStream<S> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

/// Whether bytes of an unfinished message are waiting, and since when.
///
/// Lives on the socket rather than in one `recv` call, so a `recv`
/// cancelled by `select!` does not restart the clock.
#[derive(Debug, Default)]
struct ReadProgress {
    read: Arc<AtomicU64>,
    completed: u64,
    partial_since: Option<Instant>,
}

impl ReadProgress {
    fn reset(&mut self) {
        self.read = Arc::new(AtomicU64::new(0));
        self.completed = 0;
        self.partial_since = None;
    }

    /// A whole message came out of the stream
    fn complete(&mut self) {
        self.completed = self.read.load(Ordering::Relaxed);
        self.partial_since = None;
    }

    /// When the message currently arriving started, if one is
    fn partial_since(&mut self) -> Option<Instant> {
        if self.read.load(Ordering::Relaxed) > self.completed {
            Some(*self.partial_since.get_or_insert_with(Instant::now))
        } else {
            None
        }
    }
}

// ============================================================================
// Socket
// ============================================================================

/// Socket client
pub struct WsSocket {
    url: String,
    timeout: Duration,
    max_payload_bytes: usize,
    stream: Option<Stream>,
    progress: ReadProgress,
}

impl WsSocket {
    /// Create a disconnected socket
    #[must_use]
    pub fn new(server: &ServerConfig, settings: TransportSettings) -> Self {
        Self {
            url: server.ws_url.clone(),
            timeout: settings.timeout,
            max_payload_bytes: settings.max_payload_bytes,
            stream: None,
            progress: ReadProgress::default(),
        }
    }

    fn parse(&self, text: &str) -> Result<Inbound, SocketError> {
        if text.len() > self.max_payload_bytes {
            return Err(SocketError::TooLarge {
                size: text.len(),
                limit: self.max_payload_bytes,
            });
        }
        let tree = serde_json::from_str(text)
            .map_err(|e| SocketError::MalformedPayload(e.to_string()))?;
        Ok(Inbound::new(tree))
    }

    async fn open(&mut self) -> Result<Stream, SocketError> {
        let failed = |e: &dyn std::fmt::Display| SocketError::ConnectionFailed(e.to_string());
        let request = self.url.as_str().into_client_request().map_err(|e| failed(&e))?;
        let uri = request.uri();
        let host = uri
            .host()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
            .ok_or_else(|| SocketError::ConnectionFailed(format!("{} has no host", self.url)))?;
        let port = uri
            .port_u16()
            .unwrap_or(if uri.scheme_str() == Some("wss") { 443 } else { 80 });

        let tcp = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|e| failed(&e))?;
        self.progress.reset();
        let counted = CountingStream::new(tcp, Arc::clone(&self.progress.read));
        let (stream, _response) = client_async_tls(request, counted)
            .await
            .map_err(|e| failed(&e))?;
        // Handshake bytes are not part of any message
        self.progress.complete();
        Ok(stream)
    }

    /// Next frame from the stream, timing out once one has started arriving
    async fn next_frame(&mut self) -> Result<Frame, SocketError> {
        let limit = self.timeout;
        let Self {
            stream, progress, ..
        } = self;
        let Some(stream) = stream.as_mut() else {
            return std::future::pending().await;
        };

        let mut deadline: Option<Pin<Box<Sleep>>> = None;
        poll_fn(|cx| {
            if let Poll::Ready(frame) = stream.poll_next_unpin(cx) {
                progress.complete();
                return Poll::Ready(Ok(frame));
            }
            if let Some(started) = progress.partial_since() {
                let sleep = deadline.get_or_insert_with(|| Box::pin(sleep_until(started + limit)));
                if sleep.as_mut().poll(cx).is_ready() {
                    tracing::warn!(?limit, "Socket message stalled mid-frame");
                    return Poll::Ready(Err(SocketError::Timeout(limit)));
                }
            }
            Poll::Pending
        })
        .await
    }
}

#[async_trait]
impl Socket for WsSocket {
    async fn connect(&mut self) -> Result<(), SocketError> {
        tracing::info!(url = %self.url, "Connecting socket");
        let limit = self.timeout;
        let stream = timeout(limit, self.open())
            .await
            .map_err(|_| SocketError::Timeout(limit))??;
        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = timeout(self.timeout, stream.close(None)).await {
                tracing::debug!(error = %e, "Socket close did not complete");
            }
            tracing::info!("Socket disconnected");
        }
    }

    async fn send(&mut self, text: String) -> Result<(), SocketError> {
        let limit = self.timeout;
        let stream = self.stream.as_mut().ok_or(SocketError::NotConnected)?;
        timeout(limit, stream.send(Message::Text(text)))
            .await
            .map_err(|_| SocketError::Timeout(limit))?
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Inbound, SocketError> {
        loop {
            match self.next_frame().await? {
                Some(Ok(Message::Text(text))) => return self.parse(&text),
                Some(Ok(Message::Binary(bytes))) => {
                    let text = String::from_utf8(bytes)
                        .map_err(|e| SocketError::MalformedPayload(e.to_string()))?;
                    return self.parse(&text);
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "Socket closed by server");
                    self.stream = None;
                    return Err(SocketError::Closed);
                }
                // Pings are answered by tungstenite on the next write
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
                None => {
                    self.stream = None;
                    return Err(SocketError::Closed);
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}
