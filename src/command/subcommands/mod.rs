//! Subcommand types for CAP and CHATHISTORY.
//!
//! # Reference
//! - IRCv3 capability negotiation: <https://ircv3.net/specs/extensions/capability-negotiation>
//! - IRCv3 chathistory specification: <https://ircv3.net/specs/extensions/chathistory>

/// Subcommand for CAP (capability negotiation) messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum CapSubCommand {
    /// LS - List available capabilities
    LS,
    /// LIST - List currently enabled capabilities
    LIST,
    /// REQ - Request capabilities
    REQ,
    /// ACK - Server acknowledged capabilities
    ACK,
    /// NAK - Server rejected capabilities
    NAK,
    /// END - End capability negotiation
    END,
    /// NEW - Server advertising new capabilities (cap-notify)
    NEW,
    /// DEL - Server removing capabilities (cap-notify)
    DEL,
}

impl CapSubCommand {
    /// Get the string representation of this subcommand.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LS => "LS",
            Self::LIST => "LIST",
            Self::REQ => "REQ",
            Self::ACK => "ACK",
            Self::NAK => "NAK",
            Self::END => "END",
            Self::NEW => "NEW",
            Self::DEL => "DEL",
        }
    }

    /// Look up a subcommand by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_uppercase().as_str() {
            "LS" => Self::LS,
            "LIST" => Self::LIST,
            "REQ" => Self::REQ,
            "ACK" => Self::ACK,
            "NAK" => Self::NAK,
            "END" => Self::END,
            "NEW" => Self::NEW,
            "DEL" => Self::DEL,
            _ => return None,
        })
    }
}

impl std::fmt::Display for CapSubCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subcommand for CHATHISTORY requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ChatHistorySubCommand {
    /// Request the latest messages: `LATEST <target> <* | msgref> <limit>`
    LATEST,
    /// Request messages before a point: `BEFORE <target> <msgref> <limit>`
    BEFORE,
    /// Request messages after a point: `AFTER <target> <msgref> <limit>`
    AFTER,
}

impl ChatHistorySubCommand {
    /// Get the string representation of this subcommand.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LATEST => "LATEST",
            Self::BEFORE => "BEFORE",
            Self::AFTER => "AFTER",
        }
    }
}

impl std::fmt::Display for ChatHistorySubCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
