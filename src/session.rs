//! Tokio driver for a [`Client`].
//!
//! [`Session::run`] connects, feeds every received line through the client,
//! writes what it asks to send, fires its timers, and reconnects after the
//! configured delay when the connection drops. Events go out and requests
//! come in over channels held by a [`SessionHandle`].
//!
//! ```no_run
//! use slirc_client::session::Session;
//! use slirc_client::{Client, ClientConfig, Request};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = ClientConfig::new("bob").with_server("irc.example.net:6667");
//! let (session, mut handle) = Session::new(Client::new(config)?);
//! tokio::spawn(session.run());
//!
//! handle.request(Request::Join("#dev".into()))?;
//! while let Some(event) = handle.next_event().await {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::{Client, ClientAction, ClientEvent, ConnectionStatus, Request, Timer};
use crate::error::ProtocolError;
use crate::transport::Transport;

/// The caller's side of a running [`Session`].
#[derive(Debug)]
pub struct SessionHandle {
    events: mpsc::UnboundedReceiver<ClientEvent>,
    requests: mpsc::UnboundedSender<Request>,
}

impl SessionHandle {
    /// Wait for the next event; `None` once the session has stopped.
    pub async fn next_event(&mut self) -> Option<ClientEvent> {
        self.events.recv().await
    }

    /// Queue a request for the session.
    pub fn request(&self, request: Request) -> anyhow::Result<()> {
        self.requests
            .send(request)
            .map_err(|_| anyhow!("session has stopped"))
    }
}

enum Step {
    Line(Result<Option<String>, ProtocolError>),
    Timer(Timer),
    Request(Option<Request>),
}

/// Owns a [`Client`] and its connection.
pub struct Session {
    client: Client,
    events: mpsc::UnboundedSender<ClientEvent>,
    requests: mpsc::UnboundedReceiver<Request>,
}

impl Session {
    pub fn new(client: Client) -> (Self, SessionHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let session = Self {
            client,
            events: event_tx,
            requests: request_rx,
        };
        let handle = SessionHandle {
            events: event_rx,
            requests: request_tx,
        };
        (session, handle)
    }

    /// Run until the user quits or the handle is dropped.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let server = self.client.config().server.clone();
        if server.is_empty() {
            return Err(anyhow!("no server configured"));
        }

        loop {
            self.status(ConnectionStatus::Connecting);
            let quit = match Transport::connect(&server).await {
                Ok(mut transport) => {
                    info!(%server, "connected");
                    self.status(ConnectionStatus::Connected);
                    self.drive(&mut transport).await
                }
                Err(e) => {
                    warn!(%server, error = %e, "connect failed");
                    false
                }
            };
            self.client.reset();
            self.status(ConnectionStatus::Disconnected);
            if quit || self.events.is_closed() {
                return Ok(());
            }

            let delay = self.client.config().reconnect_delay;
            info!(?delay, "reconnecting");
            self.status(ConnectionStatus::Reconnecting);
            tokio::time::sleep(delay).await;
        }
    }

    /// Serve one connection. Returns `true` if the user asked to quit.
    async fn drive(&mut self, transport: &mut Transport) -> bool {
        let (timer_tx, mut timers) = mpsc::unbounded_channel();
        let mut quitting = false;

        let hello = self.client.start();
        if let Err(e) = self.apply(hello, transport, &timer_tx).await {
            warn!(error = %e, "registration failed");
            return false;
        }

        loop {
            let step = tokio::select! {
                line = transport.read_line() => Step::Line(line),
                Some(timer) = timers.recv() => Step::Timer(timer),
                request = self.requests.recv(), if !quitting => Step::Request(request),
            };

            let actions = match step {
                Step::Line(Ok(Some(line))) => self.client.feed_line(&line),
                Step::Line(Ok(None)) => {
                    info!("server closed the connection");
                    break;
                }
                Step::Line(Err(e)) => {
                    warn!(error = %e, "read failed");
                    break;
                }
                Step::Timer(timer) => self.client.on_timer(timer),
                Step::Request(Some(request)) => {
                    quitting = matches!(request, Request::Quit(_));
                    self.client.request(request)
                }
                Step::Request(None) => {
                    quitting = true;
                    self.client.quit(None)
                }
            };
            if let Err(e) = self.apply(actions, transport, &timer_tx).await {
                warn!(error = %e, "write failed");
                break;
            }
        }
        quitting
    }

    async fn apply(
        &mut self,
        actions: Vec<ClientAction>,
        transport: &mut Transport,
        timers: &mpsc::UnboundedSender<Timer>,
    ) -> Result<(), ProtocolError> {
        for action in actions {
            match action {
                ClientAction::Send(cmd) => transport.write_command(&cmd).await?,
                ClientAction::Emit(event) => {
                    let _ = self.events.send(event);
                }
                ClientAction::Schedule(timer) => {
                    let timers = timers.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(timer.delay).await;
                        // The receiver is gone once the connection ends.
                        let _ = timers.send(timer);
                    });
                }
            }
        }
        Ok(())
    }

    fn status(&self, status: ConnectionStatus) {
        let _ = self.events.send(ClientEvent::Status(status));
    }
}
