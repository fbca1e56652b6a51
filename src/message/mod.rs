//! Parsed IRC lines.
//!
//! [`Message`] is the owned result of parsing one raw line. Parsing never
//! fails: each part of the grammar is optional, and a malformed line yields
//! whatever structure could be recovered.
//!
//! ```
//! use slirc_client::Message;
//!
//! let msg = Message::parse("@time=2023-01-01T12:00:00Z :alice!u@h PRIVMSG #dev :hi bob");
//! assert_eq!(msg.tags.get("time"), Some("2023-01-01T12:00:00Z"));
//! assert_eq!(msg.origin, "alice!u@h");
//! assert_eq!(msg.origin_nick(), "alice");
//! assert_eq!(msg.command, "PRIVMSG");
//! assert_eq!(msg.params, vec!["#dev", "hi bob"]);
//! ```

mod parse;
pub mod tags;

use std::convert::Infallible;
use std::str::FromStr;

use chrono::{DateTime, Utc};

pub use self::tags::Tags;

/// One parsed protocol line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// IRCv3 message tags.
    pub tags: Tags,
    /// Raw origin without the leading `:`; empty when absent.
    pub origin: String,
    /// Upper-cased command word or three-digit numeric; empty for a blank line.
    pub command: String,
    /// Positional parameters, the trailing parameter last.
    pub params: Vec<String>,
}

impl Message {
    /// Parse one line (line terminators are tolerated and dropped).
    pub fn parse(line: &str) -> Self {
        let parts = parse::split_line(line);
        let mut words = parts.words.into_iter();
        let command = words
            .next()
            .map(|word| word.to_ascii_uppercase())
            .unwrap_or_default();

        Self {
            tags: parts.tags.map(Tags::parse).unwrap_or_default(),
            origin: parts.origin.unwrap_or_default().to_string(),
            command,
            params: words.map(str::to_string).collect(),
        }
    }

    /// Nickname part of the origin (before the first `!` or `@`).
    pub fn origin_nick(&self) -> &str {
        crate::nick::nick_of(&self.origin)
    }

    /// Whether the origin carries a user mask (`nick!user@host`) rather than
    /// a bare server name.
    pub fn is_from_user(&self) -> bool {
        self.origin.contains('!')
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The last parameter (usually the trailing text), or `""`.
    pub fn last_param(&self) -> &str {
        self.params.last().map(String::as_str).unwrap_or("")
    }

    /// Parameters from `start` onward joined with single spaces.
    pub fn params_from(&self, start: usize) -> String {
        self.params.get(start..).unwrap_or_default().join(" ")
    }

    /// Value of the `batch` tag, if any.
    pub fn batch_ref(&self) -> Option<&str> {
        self.tags.get("batch").filter(|id| !id.is_empty())
    }

    /// Timestamp from the `time` tag (server-time), if present and valid.
    pub fn server_time(&self) -> Option<DateTime<Utc>> {
        self.tags
            .get("time")
            .and_then(crate::ircv3::parse_server_time)
    }

    /// Whether the line carried nothing to dispatch.
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

impl FromStr for Message {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
