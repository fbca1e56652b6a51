//! Typed events emitted by the dispatcher.

use chrono::{DateTime, Utc};

use crate::state::Member;

/// Connection lifecycle as seen by collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    /// `001` received; carries the nickname the server confirmed.
    Registered { nick: String },
    Disconnected,
    /// Waiting out the reconnect delay.
    Reconnecting,
}

/// Whether a message arrived as `PRIVMSG` or `NOTICE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    Privmsg,
    Notice,
}

/// One chat message routed to a target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageEvent {
    /// Target the message belongs to.
    pub target: String,
    /// Sender nickname, or server name for server notices.
    pub actor: String,
    /// Message text with formatting codes intact; the `ACTION` wrapper is
    /// removed for actions.
    pub text: String,
    /// Server-time timestamp, when the server sent one.
    pub timestamp: Option<DateTime<Utc>>,
    pub is_action: bool,
    pub is_mention: bool,
    pub kind: MessageKind,
}

/// Everything the dispatcher reports to collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ClientEvent {
    Status(ConnectionStatus),
    Message(MessageEvent),
    /// A copy of a mentioning message, routed to the mentions target.
    Mention {
        target: String,
        message: MessageEvent,
    },
    Joined {
        target: String,
        nick: String,
        is_self: bool,
    },
    Parted {
        target: String,
        nick: String,
        reason: Option<String>,
        is_self: bool,
    },
    /// A user quit; `targets` lists the channels they were seen in.
    Quit {
        nick: String,
        reason: Option<String>,
        targets: Vec<String>,
    },
    Kicked {
        target: String,
        nick: String,
        by: String,
        reason: Option<String>,
        /// Whether the local user was kicked.
        is_self: bool,
    },
    Renamed {
        old: String,
        new: String,
        targets: Vec<String>,
        is_self: bool,
    },
    TopicChanged {
        target: String,
        topic: String,
        setter: Option<String>,
    },
    ModeChanged {
        target: String,
        modes: String,
        setter: String,
    },
    /// Full member list of a channel after a NAMES reply completed.
    MembersUpdated {
        target: String,
        members: Vec<Member>,
    },
    Focused {
        target: String,
    },
    TargetClosed {
        target: String,
    },
    Info {
        target: String,
        text: String,
    },
    Warning {
        target: String,
        text: String,
    },
    Error {
        target: String,
        text: String,
    },
    ChannelListStart,
    ChannelListEntry {
        channel: String,
        users: u32,
        topic: String,
    },
    ChannelListEnd,
}
