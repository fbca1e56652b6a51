//! # slirc-client
//!
//! A sans-IO IRC client engine with IRCv3 support.
//!
//! ## Features
//!
//! - Lenient line parsing: tags, origin, command and parameters
//! - IRCv3 capability negotiation (`CAP LS 302` / `REQ` / `END`, `cap-notify`)
//! - Batch reconstruction with nesting, replayed in arrival order
//! - Session state: targets, members with rank prefixes, modes and topics
//! - Typed events for presentation layers, with mention detection
//! - mIRC formatting codec (style runs and stripping)
//! - Stable per-nickname colors with an LRU cache
//! - Optional Tokio driver over TCP or WebSocket with reconnect

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing IRC Lines
//!
//! ```rust
//! use slirc_client::{Command, Message};
//!
//! let msg = Message::parse("@time=2023-01-01T12:00:00Z :alice!u@h PRIVMSG #dev :hi bob");
//! assert_eq!(msg.origin_nick(), "alice");
//!
//! match Command::from_message(&msg) {
//!     Command::PRIVMSG(target, text) => assert_eq!((target.as_str(), text.as_str()), ("#dev", "hi bob")),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! ### Driving the Client
//!
//! ```rust
//! use slirc_client::{Client, ClientAction, ClientConfig, ClientEvent};
//!
//! let mut client = Client::new(ClientConfig::new("bob")).unwrap();
//! for action in client.start() {
//!     if let ClientAction::Send(cmd) = action {
//!         println!("-> {}", cmd); // CAP LS 302, NICK bob, USER ...
//!     }
//! }
//!
//! let _ = client.feed_line(":srv 001 bob :Welcome");
//! let _ = client.feed_line(":bob!u@h JOIN #dev");
//! let actions = client.feed_line(":alice!u@h PRIVMSG #dev :hi bob");
//! assert!(actions.iter().any(|a| matches!(a, ClientAction::Emit(ClientEvent::Mention { .. }))));
//! ```

pub mod caps;
pub mod casemap;
pub mod chan;
pub mod client;
pub mod colors;
pub mod command;
pub mod config;
pub mod ctcp;
pub mod error;
pub mod format;
pub mod ircv3;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod nick;
pub mod response;
#[cfg(feature = "tokio")]
pub mod session;
pub mod state;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::caps::{CapNegotiator, CapState, Capability};
pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::chan::ChannelExt;
pub use self::client::{
    Client, ClientAction, ClientEvent, ConnectionStatus, MessageEvent, MessageKind, Request,
};
pub use self::colors::{NickColor, NickColorCache};
pub use self::command::{CapSubCommand, Command};
pub use self::config::{ClientConfig, HistoryPolicy};
pub use self::error::{ConfigError, ProtocolError};
pub use self::format::FormattedStringExt;
pub use self::ircv3::{BatchBuffer, Route};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::{Message, Tags};
pub use self::response::Response;
#[cfg(feature = "tokio")]
pub use self::session::{Session, SessionHandle};
pub use self::state::{Member, SessionState, Target, TargetKind};
#[cfg(feature = "tokio")]
pub use self::transport::Transport;
