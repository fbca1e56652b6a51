//! IRC command types.
//!
//! This module provides type-safe representations of the IRC commands a
//! client sends and interprets, as defined in RFC 2812 and extended by IRCv3.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - IRCv3 specifications: <https://ircv3.net/>

use crate::response::Response;

use super::subcommands::{CapSubCommand, ChatHistorySubCommand};

/// IRC command with its parameters.
///
/// Commands the client does not interpret are captured in the `Raw` variant,
/// together with numerics outside [`Response`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Command {
    // === Connection Registration (RFC 2812 Section 3.1) ===
    /// `NICK nickname`
    NICK(String),
    /// `USER username mode realname`
    USER(String, String, String),
    /// `QUIT [message]`
    QUIT(Option<String>),

    // === Channel Operations (RFC 2812 Section 3.2) ===
    /// `JOIN channels [keys]`
    JOIN(String, Option<String>),
    /// `PART channels [message]`
    PART(String, Option<String>),
    /// `MODE target [modes [args...]]`
    MODE(String, Vec<String>),
    /// `TOPIC channel [topic]`
    TOPIC(String, Option<String>),
    /// `NAMES [channels]`
    NAMES(Option<String>),
    /// `LIST [channels]`
    LIST(Option<String>),
    /// `KICK channel user [comment]`
    KICK(String, String, Option<String>),

    // === Messaging (RFC 2812 Section 3.3) ===
    /// `PRIVMSG target text`
    PRIVMSG(String, String),
    /// `NOTICE target text`
    NOTICE(String, String),

    // === Miscellaneous (RFC 2812 Section 3.7) ===
    /// `PING token`
    PING(String),
    /// `PONG token`
    PONG(String),
    /// `ERROR message`
    ERROR(String),

    // === IRCv3 Extensions ===
    /// `CAP [target] subcommand [params] [capabilities]`
    CAP(
        Option<String>,
        CapSubCommand,
        Option<String>,
        Option<String>,
    ),
    /// `BATCH +/-reference [type] [params...]`
    BATCH(String, Option<String>, Vec<String>),
    /// `CHATHISTORY subcommand target reference limit`
    CHATHISTORY {
        subcommand: ChatHistorySubCommand,
        target: String,
        reference: String,
        limit: usize,
    },

    // === Numeric Response ===
    /// Numeric response from server
    Response(Response, Vec<String>),

    // === Unknown/Raw Commands ===
    /// Unknown command captured as raw
    Raw(String, Vec<String>),
}

impl Command {
    /// `CHATHISTORY LATEST <target> * <limit>`
    pub fn history_latest(target: impl Into<String>, limit: usize) -> Self {
        Command::CHATHISTORY {
            subcommand: ChatHistorySubCommand::LATEST,
            target: target.into(),
            reference: "*".to_string(),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_equality() {
        let cmd1 = Command::NICK("test".to_string());
        let cmd2 = Command::NICK("test".to_string());
        assert_eq!(cmd1, cmd2);

        let cmd3 = Command::NICK("other".to_string());
        assert_ne!(cmd1, cmd3);
    }
}
