//! Sans-IO capability negotiation state machine.
//!
//! The negotiator consumes `CAP` commands and returns the lines to send. It
//! performs no I/O and never fails; unexpected input is ignored.
//!
//! ```
//! use slirc_client::caps::{CapNegotiator, CapState};
//! use slirc_client::{Command, Message};
//!
//! let mut caps = CapNegotiator::new(["batch", "server-time", "chathistory"]);
//! let ls = Command::from_message(&Message::parse(":srv CAP * LS :batch sasl server-time"));
//! let reply = caps.handle(&ls);
//! assert_eq!(reply[0].to_string(), "CAP REQ :batch server-time");
//! assert_eq!(caps.state(), CapState::Requesting);
//! ```

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{cap_name, Capability};
use crate::command::{CapSubCommand, Command};

/// Negotiation progress within one connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CapState {
    /// No listing received yet.
    #[default]
    Idle,
    /// A multi-line listing is in progress.
    Listing,
    /// `CAP REQ` sent, awaiting `ACK` or `NAK`.
    Requesting,
    /// `CAP END` sent.
    Done,
}

/// Tracks offered and enabled capabilities for one connection.
#[derive(Clone, Debug)]
pub struct CapNegotiator {
    desired: Vec<String>,
    state: CapState,
    available: HashSet<String>,
    enabled: HashSet<String>,
    requested: HashSet<String>,
}

impl CapNegotiator {
    /// Create a negotiator requesting `desired` (in that order) when offered.
    pub fn new<I, S>(desired: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            desired: desired.into_iter().map(Into::into).collect(),
            state: CapState::Idle,
            available: HashSet::new(),
            enabled: HashSet::new(),
            requested: HashSet::new(),
        }
    }

    /// Get the current negotiation state.
    #[must_use]
    pub fn state(&self) -> CapState {
        self.state
    }

    /// Get the set of available capabilities.
    #[must_use]
    pub fn available(&self) -> &HashSet<String> {
        &self.available
    }

    /// Get the set of enabled capabilities.
    #[must_use]
    pub fn enabled(&self) -> &HashSet<String> {
        &self.enabled
    }

    /// Whether `name` was acknowledged.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// Whether a chat history capability was acknowledged.
    #[must_use]
    pub fn history_enabled(&self) -> bool {
        self.enabled
            .iter()
            .any(|name| Capability::from(name.as_str()).is_history())
    }

    /// Forget everything learned on the previous connection.
    pub fn reset(&mut self) {
        self.state = CapState::Idle;
        self.available.clear();
        self.enabled.clear();
        self.requested.clear();
    }

    /// The line that opens negotiation (`CAP LS 302`).
    #[must_use]
    pub fn start(&mut self) -> Command {
        self.reset();
        Command::CAP(None, CapSubCommand::LS, Some("302".to_string()), None)
    }

    /// Feed a command; returns the lines to send. Non-`CAP` commands are ignored.
    #[must_use]
    pub fn handle(&mut self, cmd: &Command) -> Vec<Command> {
        let Command::CAP(_, subcommand, param, caps) = cmd else {
            return Vec::new();
        };
        let caps = caps.as_deref().unwrap_or("");
        match subcommand {
            CapSubCommand::LS => self.on_ls(caps, param.as_deref() == Some("*")),
            CapSubCommand::ACK => self.on_ack(caps),
            CapSubCommand::NAK => self.on_nak(caps),
            CapSubCommand::NEW => {
                self.on_new(caps);
                Vec::new()
            }
            CapSubCommand::DEL => {
                self.on_del(caps);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// One chunk of a listing; `continued` is set for all but the last chunk.
    pub fn on_ls(&mut self, caps: &str, continued: bool) -> Vec<Command> {
        self.available
            .extend(caps.split_whitespace().map(|c| cap_name(c).to_string()));

        if !matches!(self.state, CapState::Idle | CapState::Listing) {
            return Vec::new();
        }
        if continued {
            self.state = CapState::Listing;
            return Vec::new();
        }

        let wanted: Vec<&String> = self
            .desired
            .iter()
            .filter(|cap| self.available.contains(*cap))
            .collect();
        if wanted.is_empty() {
            debug!(available = self.available.len(), "no desired capabilities offered");
            return vec![self.finish()];
        }

        let line = wanted
            .iter()
            .map(|cap| cap.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.requested = wanted.into_iter().cloned().collect();
        self.state = CapState::Requesting;
        debug!(caps = %line, "requesting capabilities");
        vec![Command::CAP(None, CapSubCommand::REQ, None, Some(line))]
    }

    /// Acknowledgment of a request.
    pub fn on_ack(&mut self, caps: &str) -> Vec<Command> {
        for cap in caps.split_whitespace() {
            if let Some(disabled) = cap.strip_prefix('-') {
                self.enabled.remove(disabled);
                continue;
            }
            let name = cap.trim_start_matches(['~', '=']);
            if self.requested.contains(name) || self.available.contains(name) {
                self.enabled.insert(name.to_string());
            }
        }
        debug!(enabled = ?self.enabled, "capabilities acknowledged");
        self.end_if_requesting()
    }

    /// Rejection of a request. Nothing is enabled.
    pub fn on_nak(&mut self, caps: &str) -> Vec<Command> {
        warn!(caps, "capability request rejected");
        self.end_if_requesting()
    }

    /// Capabilities advertised after registration (`cap-notify`).
    pub fn on_new(&mut self, caps: &str) {
        self.available
            .extend(caps.split_whitespace().map(|c| cap_name(c).to_string()));
    }

    /// Capabilities withdrawn by the server (`cap-notify`).
    pub fn on_del(&mut self, caps: &str) {
        for cap in caps.split_whitespace().map(cap_name) {
            self.available.remove(cap);
            self.enabled.remove(cap);
        }
    }

    fn end_if_requesting(&mut self) -> Vec<Command> {
        if self.state == CapState::Requesting {
            vec![self.finish()]
        } else {
            Vec::new()
        }
    }

    fn finish(&mut self) -> Command {
        self.state = CapState::Done;
        Command::CAP(None, CapSubCommand::END, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    fn feed(caps: &mut CapNegotiator, line: &str) -> Vec<String> {
        caps.handle(&Command::from_message(&Message::parse(line)))
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn negotiator() -> CapNegotiator {
        CapNegotiator::new(crate::config::DEFAULT_CAPS.iter().copied())
    }

    #[test]
    fn test_start_sends_cap_ls() {
        let mut caps = negotiator();
        assert_eq!(caps.start().to_string(), "CAP LS 302");
        assert_eq!(caps.state(), CapState::Idle);
    }

    #[test]
    fn test_requests_exactly_offered_subset() {
        let mut caps = negotiator();
        let sent = feed(&mut caps, ":srv CAP * LS :sasl batch multi-prefix chathistory");
        assert_eq!(sent, vec!["CAP REQ :batch chathistory"]);
        assert_eq!(caps.state(), CapState::Requesting);

        let sent = feed(&mut caps, ":srv CAP * ACK :batch chathistory");
        assert_eq!(sent, vec!["CAP END"]);
        assert_eq!(caps.state(), CapState::Done);
        assert!(caps.is_enabled("batch"));
        assert!(caps.history_enabled());
        assert!(caps.enabled().is_subset(caps.available()));
    }

    #[test]
    fn test_multiline_listing() {
        let mut caps = negotiator();
        assert!(feed(&mut caps, ":srv CAP * LS * :server-time=1 foo").is_empty());
        assert_eq!(caps.state(), CapState::Listing);
        let sent = feed(&mut caps, ":srv CAP * LS :message-tags");
        assert_eq!(sent, vec!["CAP REQ :server-time message-tags"]);
        assert!(caps.available().contains("server-time"));
    }

    #[test]
    fn test_nothing_desired_ends_immediately() {
        let mut caps = negotiator();
        assert_eq!(feed(&mut caps, ":srv CAP * LS :sasl"), vec!["CAP END"]);
        assert_eq!(caps.state(), CapState::Done);
    }

    #[test]
    fn test_nak_ends_without_enabling() {
        let mut caps = negotiator();
        let _ = feed(&mut caps, ":srv CAP * LS :batch");
        assert_eq!(feed(&mut caps, ":srv CAP * NAK :batch"), vec!["CAP END"]);
        assert!(caps.enabled().is_empty());
        assert_eq!(caps.state(), CapState::Done);
    }

    #[test]
    fn test_end_sent_once() {
        let mut caps = negotiator();
        let _ = feed(&mut caps, ":srv CAP * LS :batch");
        assert_eq!(feed(&mut caps, ":srv CAP * ACK :batch"), vec!["CAP END"]);
        assert!(feed(&mut caps, ":srv CAP * ACK :batch").is_empty());
        assert!(feed(&mut caps, ":srv CAP * NAK :batch").is_empty());
        assert!(feed(&mut caps, ":srv CAP * LS :batch server-time").is_empty());
    }

    #[test]
    fn test_new_and_del() {
        let mut caps = negotiator();
        let _ = feed(&mut caps, ":srv CAP * LS :batch");
        let _ = feed(&mut caps, ":srv CAP * ACK :batch");

        assert!(feed(&mut caps, ":srv CAP bob NEW :server-time").is_empty());
        assert!(caps.available().contains("server-time"));

        assert!(feed(&mut caps, ":srv CAP bob DEL :batch").is_empty());
        assert!(!caps.is_enabled("batch"));
        assert!(!caps.available().contains("batch"));
    }

    #[test]
    fn test_reset_forgets() {
        let mut caps = negotiator();
        let _ = feed(&mut caps, ":srv CAP * LS :batch");
        let _ = feed(&mut caps, ":srv CAP * ACK :batch");
        let _ = caps.start();
        assert_eq!(caps.state(), CapState::Idle);
        assert!(caps.enabled().is_empty());
        assert!(caps.available().is_empty());
    }
}
