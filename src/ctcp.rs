//! CTCP ACTION framing.
//!
//! An ACTION (`/me waves`) travels as a PRIVMSG whose body is wrapped in the
//! `\x01` delimiter: `\x01ACTION waves\x01`.
//!
//! # Example
//!
//! ```
//! use slirc_client::ctcp::{action_body, format_action};
//!
//! assert_eq!(action_body("\x01ACTION waves hello\x01"), Some("waves hello"));
//! assert_eq!(action_body("plain text"), None);
//! assert_eq!(format_action("dances"), "\x01ACTION dances\x01");
//! ```

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

const ACTION_PREFIX: &str = "\x01ACTION ";

/// Return the inner text of an ACTION body, or `None` if `text` is not one.
///
/// Both the leading `\x01ACTION ` marker and the closing delimiter are
/// required.
pub fn action_body(text: &str) -> Option<&str> {
    text.strip_prefix(ACTION_PREFIX)?.strip_suffix(CTCP_DELIM)
}

/// Wrap `text` as an ACTION body.
pub fn format_action(text: &str) -> String {
    format!("{}{}{}", ACTION_PREFIX, text, CTCP_DELIM)
}
