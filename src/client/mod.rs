//! Sans-IO client engine.
//!
//! [`Client`] consumes raw lines and returns [`ClientAction`]s: lines to send,
//! events to hand to collaborators, and timers to schedule. It performs no
//! I/O and never sleeps, so it is driven the same way from an async task, a
//! blocking loop, or a test.
//!
//! # Example
//!
//! ```
//! use slirc_client::client::{Client, ClientAction, ClientEvent};
//! use slirc_client::ClientConfig;
//!
//! let mut client = Client::new(ClientConfig::new("bob")).unwrap();
//! let hello = client.start();
//! assert_eq!(hello.len(), 3);
//!
//! let actions = client.feed_line("PING :irc.example");
//! assert!(matches!(&actions[0], ClientAction::Send(cmd) if cmd.to_string() == "PONG irc.example"));
//! ```

mod dispatch;
mod event;
mod timer;

use std::collections::VecDeque;

use chrono::Utc;
use tracing::debug;

pub use self::event::{ClientEvent, ConnectionStatus, MessageEvent, MessageKind};
pub use self::timer::{Timer, TimerKind};

use crate::chan::ChannelExt;
use crate::colors::{NickColor, NickColorCache};
use crate::command::Command;
use crate::config::ClientConfig;
use crate::ctcp::format_action;
use crate::error::ConfigError;
use crate::ircv3::Route;
use crate::message::Message;
use crate::nick::sanitize_nickname;
use crate::state::{SessionState, TargetKind};

/// Something the caller must do on behalf of the client.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientAction {
    /// Send this line to the server.
    Send(Command),
    /// Hand this event to collaborators.
    Emit(ClientEvent),
    /// Call [`Client::on_timer`] with this timer after its delay.
    Schedule(Timer),
}

/// A user-initiated operation, for drivers that queue requests from another
/// task. See [`Client::request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Privmsg { target: String, text: String },
    Action { target: String, text: String },
    Notice { target: String, text: String },
    Join(String),
    Part {
        channel: String,
        reason: Option<String>,
    },
    Nick(String),
    Topic { channel: String, topic: String },
    Quit(Option<String>),
    List,
    OpenQuery(String),
    Close(String),
    Focus(String),
    /// Send a line as is.
    Raw(Command),
}

/// The client engine for one server.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    state: SessionState,
    colors: NickColorCache,
    generation: u64,
}

impl Client {
    /// Create a client after validating `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: SessionState::new(&config),
            colors: NickColorCache::new(config.color_cache_capacity),
            config,
            generation: 0,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session state of the current connection.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The local nickname.
    pub fn nick(&self) -> &str {
        self.state.nick()
    }

    /// Current connection generation. Timers from older generations are ignored.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drop all connection state and invalidate pending timers.
    pub fn reset(&mut self) {
        self.state.reset();
        self.generation += 1;
        debug!(generation = self.generation, "session reset");
    }

    /// Begin registration on a fresh connection.
    ///
    /// Returns `CAP LS 302`, `NICK` and `USER`.
    pub fn start(&mut self) -> Vec<ClientAction> {
        self.reset();
        self.state.set_nick(&self.config.nickname);
        vec![
            ClientAction::Send(self.state.caps.start()),
            ClientAction::Send(Command::NICK(self.config.nickname.clone())),
            ClientAction::Send(Command::USER(
                self.config.username.clone(),
                "0".to_string(),
                self.config.realname.clone(),
            )),
        ]
    }

    /// Process one raw line.
    ///
    /// Blank lines are ignored. Lines that belong to an open batch are held
    /// until the batch closes and then processed in arrival order.
    pub fn feed_line(&mut self, line: &str) -> Vec<ClientAction> {
        let msg = Message::parse(line);
        if msg.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let msg = match self.state.batches.route(msg) {
                Route::Buffered => continue,
                Route::Dispatch(msg) => msg,
            };
            match Command::from_message(&msg) {
                Command::BATCH(reference, kind, params) => {
                    if let Some(id) = reference.strip_prefix('+') {
                        self.state.batches.open(
                            id,
                            kind.as_deref().unwrap_or_default(),
                            params.first().map(String::as_str),
                        );
                    } else if let Some(id) = reference.strip_prefix('-') {
                        // Replayed lines go ahead of whatever was queued after the close.
                        for replayed in self.state.batches.close(id).into_iter().rev() {
                            queue.push_front(replayed);
                        }
                    }
                }
                cmd => self.dispatch(&msg, cmd, &mut out),
            }
        }
        out
    }

    /// Fire a timer previously returned in [`ClientAction::Schedule`].
    pub fn on_timer(&mut self, timer: Timer) -> Vec<ClientAction> {
        if timer.generation != self.generation {
            debug!(
                timer = timer.generation,
                current = self.generation,
                "stale timer ignored"
            );
            return Vec::new();
        }

        let mut out = Vec::new();
        match timer.kind {
            TimerKind::AutoJoin => {
                if !self.state.is_registered() {
                    return out;
                }
                if !self.config.auto_join.is_empty() {
                    let channels = self.config.auto_join.join(",");
                    debug!(%channels, "auto-joining");
                    out.push(ClientAction::Send(Command::JOIN(channels, None)));
                }
                if self.config.focus_after_join.is_some() {
                    out.push(ClientAction::Schedule(Timer::new(
                        self.generation,
                        TimerKind::FocusPoll {
                            remaining: self.config.auto_join_poll_timeout,
                        },
                        self.config.auto_join_poll_interval,
                    )));
                }
            }
            TimerKind::FocusPoll { remaining } => {
                let Some(wanted) = self.config.focus_after_join.clone() else {
                    return out;
                };
                if self.state.has_target(&wanted) {
                    out.extend(self.focus(&wanted));
                } else if let Some(remaining) =
                    remaining.checked_sub(self.config.auto_join_poll_interval)
                {
                    out.push(ClientAction::Schedule(Timer::new(
                        self.generation,
                        TimerKind::FocusPoll { remaining },
                        self.config.auto_join_poll_interval,
                    )));
                } else {
                    debug!(channel = %wanted, "focus target never appeared");
                }
            }
        }
        out
    }

    /// Display color for a participant name.
    pub fn color_of(&mut self, name: &str) -> NickColor {
        self.colors.color_of(name)
    }

    // === Outgoing ===

    /// Carry out a queued [`Request`].
    pub fn request(&mut self, request: Request) -> Vec<ClientAction> {
        match request {
            Request::Privmsg { target, text } => self.privmsg(&target, &text),
            Request::Action { target, text } => self.action(&target, &text),
            Request::Notice { target, text } => self.notice(&target, &text),
            Request::Join(channel) => self.join(&channel),
            Request::Part { channel, reason } => self.part(&channel, reason.as_deref()),
            Request::Nick(nick) => self.change_nick(&nick),
            Request::Topic { channel, topic } => self.set_topic(&channel, &topic),
            Request::Quit(reason) => self.quit(reason.as_deref()),
            Request::List => self.list(),
            Request::OpenQuery(nick) => self.open_query(&nick),
            Request::Close(name) => self.close_target(&name),
            Request::Focus(name) => self.focus(&name),
            Request::Raw(cmd) => vec![ClientAction::Send(cmd)],
        }
    }

    /// Send a message and echo it into the target's transcript.
    pub fn privmsg(&mut self, target: &str, text: &str) -> Vec<ClientAction> {
        let mut out = vec![ClientAction::Send(Command::PRIVMSG(
            target.to_string(),
            text.to_string(),
        ))];
        self.echo(target, text, false, &mut out);
        out
    }

    /// Send an ACTION (`/me`) and echo it.
    pub fn action(&mut self, target: &str, text: &str) -> Vec<ClientAction> {
        let mut out = vec![ClientAction::Send(Command::PRIVMSG(
            target.to_string(),
            format_action(text),
        ))];
        self.echo(target, text, true, &mut out);
        out
    }

    pub fn notice(&mut self, target: &str, text: &str) -> Vec<ClientAction> {
        vec![ClientAction::Send(Command::NOTICE(
            target.to_string(),
            text.to_string(),
        ))]
    }

    pub fn join(&mut self, channel: &str) -> Vec<ClientAction> {
        vec![ClientAction::Send(Command::JOIN(channel.to_string(), None))]
    }

    pub fn part(&mut self, channel: &str, reason: Option<&str>) -> Vec<ClientAction> {
        vec![ClientAction::Send(Command::PART(
            channel.to_string(),
            reason.map(str::to_string),
        ))]
    }

    /// Request a nickname change. The local nickname changes when the server
    /// confirms it.
    pub fn change_nick(&mut self, seed: &str) -> Vec<ClientAction> {
        match sanitize_nickname(seed) {
            Some(nick) => vec![ClientAction::Send(Command::NICK(nick))],
            None => vec![ClientAction::Emit(ClientEvent::Warning {
                target: self.state.focused_name().to_string(),
                text: format!("Invalid nickname: {}", seed),
            })],
        }
    }

    pub fn set_topic(&mut self, channel: &str, topic: &str) -> Vec<ClientAction> {
        vec![ClientAction::Send(Command::TOPIC(
            channel.to_string(),
            Some(topic.to_string()),
        ))]
    }

    /// Leave the server; the reason defaults to `Leaving`.
    pub fn quit(&mut self, reason: Option<&str>) -> Vec<ClientAction> {
        vec![ClientAction::Send(Command::QUIT(Some(
            reason.unwrap_or("Leaving").to_string(),
        )))]
    }

    /// List channels on the server.
    pub fn list(&mut self) -> Vec<ClientAction> {
        vec![ClientAction::Send(Command::LIST(None))]
    }

    /// Open a query with `nick` and focus it.
    pub fn open_query(&mut self, nick: &str) -> Vec<ClientAction> {
        if nick.is_empty() || self.state.is_reserved(nick) {
            return vec![ClientAction::Emit(ClientEvent::Warning {
                target: self.state.status_target().to_string(),
                text: format!("Cannot open a query with {:?}", nick),
            })];
        }
        self.state.ensure_target(nick);
        self.focus(nick)
    }

    /// Close a target. Channels are parted and removed when the server
    /// confirms; queries are removed at once. Special targets stay open.
    pub fn close_target(&mut self, name: &str) -> Vec<ClientAction> {
        let Some(target) = self.state.target(name) else {
            return Vec::new();
        };
        match target.kind() {
            TargetKind::Special => Vec::new(),
            TargetKind::Channel => self.part(name, None),
            TargetKind::Query => {
                let was_focused = self.state.is_focused(name);
                let mut out = Vec::new();
                if let Some(removed) = self.state.remove_target(name) {
                    out.push(ClientAction::Emit(ClientEvent::TargetClosed {
                        target: removed.name().to_string(),
                    }));
                }
                if was_focused {
                    out.push(self.focused_event());
                }
                out
            }
        }
    }

    /// Focus an existing target.
    pub fn focus(&mut self, name: &str) -> Vec<ClientAction> {
        if self.state.focus(name) {
            vec![self.focused_event()]
        } else {
            Vec::new()
        }
    }

    fn focused_event(&self) -> ClientAction {
        ClientAction::Emit(ClientEvent::Focused {
            target: self.state.focused_name().to_string(),
        })
    }

    fn echo(&mut self, target: &str, text: &str, is_action: bool, out: &mut Vec<ClientAction>) {
        if !target.is_channel_name()
            && (self.state.is_self(target) || self.state.is_reserved(target))
        {
            return;
        }
        let name = self.state.ensure_target(target).name().to_string();
        let event = MessageEvent {
            target: name.clone(),
            actor: self.state.nick().to_string(),
            text: text.to_string(),
            timestamp: Some(Utc::now()),
            is_action,
            is_mention: false,
            kind: MessageKind::Privmsg,
        };
        self.state.push_message(&name, event.clone());
        out.push(ClientAction::Emit(ClientEvent::Message(event)));
    }
}
