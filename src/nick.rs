//! Nickname utilities.
//!
//! Helpers for turning user-supplied identity seeds into nicknames a server
//! will accept, and for shortening names for narrow display columns.

/// Longest nickname produced by [`sanitize_nickname`].
pub const MAX_NICK_LEN: usize = 20;

/// Names longer than this are shortened by [`truncate_display`].
pub const DISPLAY_NICK_LEN: usize = 10;

fn is_nick_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '[' | ']')
}

/// Clean an identity seed into a nickname.
///
/// Drops every character outside `[A-Za-z0-9_\-\[\]]`, prefixes `Guest` when
/// the result starts with a digit, and truncates to [`MAX_NICK_LEN`].
/// Returns `None` when nothing usable remains.
///
/// # Examples
///
/// ```
/// use slirc_client::nick::sanitize_nickname;
///
/// assert_eq!(sanitize_nickname(" bob smith ").as_deref(), Some("bobsmith"));
/// assert_eq!(sanitize_nickname("1337").as_deref(), Some("Guest1337"));
/// assert_eq!(sanitize_nickname("!!!"), None);
/// ```
pub fn sanitize_nickname(seed: &str) -> Option<String> {
    let mut nick: String = seed.trim().chars().filter(|c| is_nick_char(*c)).collect();
    if nick.is_empty() {
        return None;
    }
    if nick.starts_with(|c: char| c.is_ascii_digit()) {
        nick.insert_str(0, "Guest");
    }
    nick.truncate(MAX_NICK_LEN);
    Some(nick)
}

/// Shorten a name for a fixed-width column, appending `..` when cut.
pub fn truncate_display(name: &str) -> String {
    match name.char_indices().nth(DISPLAY_NICK_LEN) {
        Some((idx, _)) => format!("{}..", &name[..idx]),
        None => name.to_string(),
    }
}

/// Extract the nickname from a `nick!user@host` origin.
///
/// Everything before the first `!` or `@`; the whole string when neither is
/// present (server origins).
pub fn nick_of(origin: &str) -> &str {
    origin
        .find(['!', '@'])
        .map_or(origin, |end| &origin[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_allowed() {
        assert_eq!(sanitize_nickname("[bob]-_x").as_deref(), Some("[bob]-_x"));
    }

    #[test]
    fn test_sanitize_truncates_after_guest_prefix() {
        let nick = sanitize_nickname("123456789012345678").unwrap();
        assert_eq!(nick, "Guest123456789012345");
        assert_eq!(nick.len(), MAX_NICK_LEN);
    }

    #[test]
    fn test_truncate_display() {
        assert_eq!(truncate_display("alice"), "alice");
        assert_eq!(truncate_display("0123456789"), "0123456789");
        assert_eq!(truncate_display("averyverylongnick"), "averyveryl..");
    }

    #[test]
    fn test_nick_of() {
        assert_eq!(nick_of("alice!u@h"), "alice");
        assert_eq!(nick_of("alice@h"), "alice");
        assert_eq!(nick_of("irc.example.net"), "irc.example.net");
        assert_eq!(nick_of(""), "");
    }
}
