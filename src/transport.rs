//! Async connection to an IRC server over TCP or WebSocket.
//!
//! The server address picks the transport: `ws://` and `wss://` URLs open a
//! WebSocket, anything else is treated as a TCP `host:port` framed by
//! [`LineCodec`]. A WebSocket text frame may carry several CRLF-separated
//! lines; they are handed out one at a time.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::command::Command;
use crate::error::ProtocolError;
use crate::line::{self, LineCodec, MAX_LINE_LEN};

#[allow(clippy::large_enum_variant)]
pub enum Transport {
    Tcp {
        framed: Framed<TcpStream, LineCodec>,
    },
    WebSocket {
        stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
        /// Lines of the last frame not yet returned.
        pending: VecDeque<String>,
    },
}

impl Transport {
    /// Connect to `server`.
    pub async fn connect(server: &str) -> Result<Self> {
        if server.starts_with("ws://") || server.starts_with("wss://") {
            let (stream, _response) = tokio_tungstenite::connect_async(server)
                .await
                .with_context(|| format!("websocket connect to {}", server))?;
            Ok(Self::websocket(stream))
        } else {
            let stream = TcpStream::connect(server)
                .await
                .with_context(|| format!("tcp connect to {}", server))?;
            Ok(Self::tcp(stream))
        }
    }

    pub fn tcp(stream: TcpStream) -> Self {
        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        Self::Tcp {
            framed: Framed::new(stream, LineCodec::new()),
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> Result<()> {
        use socket2::{SockRef, TcpKeepalive};
        use std::time::Duration;

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)?;
        Ok(())
    }

    pub fn websocket(stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self::WebSocket {
            stream,
            pending: VecDeque::new(),
        }
    }

    pub fn is_websocket(&self) -> bool {
        matches!(self, Self::WebSocket { .. })
    }

    /// Read the next line; `None` when the server closed the connection.
    pub async fn read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        match self {
            Transport::Tcp { framed } => framed.next().await.transpose(),
            Transport::WebSocket { stream, pending } => {
                read_websocket_line(stream, pending).await
            }
        }
    }

    /// Write one command.
    pub async fn write_command(&mut self, cmd: &Command) -> Result<(), ProtocolError> {
        match self {
            Transport::Tcp { framed } => framed.send(cmd).await,
            Transport::WebSocket { stream, .. } => {
                let line = cmd.to_string();
                let line = line::sanitize(&line)?;
                stream
                    .send(WsMessage::Text(line.to_string()))
                    .await
                    .map_err(|e| ProtocolError::WebSocket(e.to_string()))
            }
        }
    }
}

async fn read_websocket_line<S>(
    stream: &mut WebSocketStream<S>,
    pending: &mut VecDeque<String>,
) -> Result<Option<String>, ProtocolError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    loop {
        if let Some(line) = pending.pop_front() {
            return Ok(Some(line));
        }
        match stream.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                pending.extend(split_frame(&text)?);
            }
            Some(Ok(WsMessage::Close(_))) | None => return Ok(None),
            Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => continue,
            Some(Ok(WsMessage::Binary(_))) => {
                warn!("ignoring binary WebSocket frame");
                continue;
            }
            Some(Ok(WsMessage::Frame(_))) => {
                debug!("ignoring raw WebSocket frame");
                continue;
            }
            Some(Err(e)) => return Err(ProtocolError::WebSocket(e.to_string())),
        }
    }
}

/// Split a text frame into its non-empty lines.
fn split_frame(text: &str) -> Result<Vec<String>, ProtocolError> {
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if raw.is_empty() {
            continue;
        }
        if raw.len() > MAX_LINE_LEN {
            return Err(ProtocolError::MessageTooLong {
                actual: raw.len(),
                limit: MAX_LINE_LEN,
            });
        }
        if let Some(ch) = raw.chars().find(|c| line::is_illegal_control_char(*c)) {
            return Err(ProtocolError::IllegalControlChar(ch));
        }
        lines.push(raw.to_string());
    }
    Ok(lines)
}
