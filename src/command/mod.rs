//! Typed IRC commands.
//!
//! [`Command`] is used in both directions: inbound lines are converted from a
//! parsed [`Message`](crate::Message) with [`Command::from_message`], and
//! outbound requests serialize to a protocol line through `Display`.

mod parse;
mod serialize;
pub mod subcommands;
mod types;

pub use subcommands::{CapSubCommand, ChatHistorySubCommand};
pub use types::Command;
