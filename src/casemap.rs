//! IRC case-mapping functions.
//!
//! IRC compares nicknames and channel names case-insensitively with the
//! `rfc1459` mapping, where `[]\~` are the uppercase forms of `{}|^`.

#[inline]
fn fold(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c.to_ascii_lowercase(),
    }
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(fold).collect()
}

/// Compare two strings using IRC case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().map(fold).eq(b.chars().map(fold))
}

/// Case-insensitive substring search, used for highlight detection.
///
/// An empty needle never matches: a client without a nickname cannot be
/// mentioned.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    irc_to_lower(haystack).contains(&irc_to_lower(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irc_to_lower() {
        assert_eq!(irc_to_lower("Nick[Away]"), "nick{away}");
        assert_eq!(irc_to_lower("#BlackHole"), "#blackhole");
    }

    #[test]
    fn test_irc_eq() {
        assert!(irc_eq("Bob\\", "bob|"));
        assert!(!irc_eq("bob", "bobby"));
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("hi BOB, how are you", "bob"));
        assert!(!contains_ignore_case("hello", "bob"));
        assert!(!contains_ignore_case("anything", ""));
    }
}
