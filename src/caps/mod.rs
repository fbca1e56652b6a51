//! IRCv3 capability negotiation support.
//!
//! [`Capability`] names the extensions the client understands;
//! [`CapNegotiator`] drives the `CAP LS` / `REQ` / `END` exchange.
//! Capabilities outside the known set are negotiated opaquely as
//! [`Capability::Custom`].
//!
//! # Reference
//! - IRCv3 Capability Negotiation: <https://ircv3.net/specs/extensions/capability-negotiation>

mod negotiator;

pub use self::negotiator::{CapNegotiator, CapState};

/// Known IRCv3 capability types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capability {
    /// Server-time message tags
    ServerTime,
    /// Message batching
    Batch,
    /// Client message tags support
    MessageTags,
    /// Chat history retrieval (draft name)
    DraftChathistory,
    /// Chat history retrieval
    Chathistory,
    /// Non-message events in history playback (draft)
    DraftEventPlayback,
    /// Unknown/custom capability
    Custom(String),
}

impl Capability {
    /// Whether this capability enables `CHATHISTORY` requests.
    pub fn is_history(&self) -> bool {
        matches!(self, Self::DraftChathistory | Self::Chathistory)
    }
}

impl AsRef<str> for Capability {
    fn as_ref(&self) -> &str {
        match self {
            Self::ServerTime => "server-time",
            Self::Batch => "batch",
            Self::MessageTags => "message-tags",
            Self::DraftChathistory => "draft/chathistory",
            Self::Chathistory => "chathistory",
            Self::DraftEventPlayback => "draft/event-playback",
            Self::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl From<&str> for Capability {
    fn from(s: &str) -> Self {
        match s {
            "server-time" => Self::ServerTime,
            "batch" => Self::Batch,
            "message-tags" => Self::MessageTags,
            "draft/chathistory" => Self::DraftChathistory,
            "chathistory" => Self::Chathistory,
            "draft/event-playback" => Self::DraftEventPlayback,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Capability name without its `=value` suffix.
pub fn cap_name(token: &str) -> &str {
    token.split('=').next().unwrap_or(token)
}
