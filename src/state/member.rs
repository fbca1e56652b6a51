//! Channel members and rank prefixes.

use std::fmt;

use crate::casemap::irc_eq;

/// Ordered table of membership rank prefixes, highest rank first.
///
/// The default table is `~&@%+`: owner, admin, operator, half-operator, voice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixRanks {
    ranks: Vec<char>,
}

impl PrefixRanks {
    /// Build a table from prefix characters in rank order.
    ///
    /// Returns `None` if the table is empty, repeats a character, or contains
    /// an alphanumeric or whitespace character (these could not be told apart
    /// from the nickname itself).
    pub fn new(ranks: &str) -> Option<Self> {
        let ranks: Vec<char> = ranks.chars().collect();
        if ranks.is_empty() {
            return None;
        }
        for (i, c) in ranks.iter().enumerate() {
            if c.is_alphanumeric() || c.is_whitespace() || ranks[..i].contains(c) {
                return None;
            }
        }
        Some(Self { ranks })
    }

    /// Rank of a prefix character; `0` is the highest.
    pub fn rank(&self, prefix: char) -> Option<usize> {
        self.ranks.iter().position(|c| *c == prefix)
    }

    /// Split a NAMES entry such as `@+bob` into its prefix and bare name.
    pub fn split<'a>(&self, entry: &'a str) -> (&'a str, &'a str) {
        let bare = entry.trim_start_matches(|c: char| self.rank(c).is_some());
        (&entry[..entry.len() - bare.len()], bare)
    }

    /// Reorder a prefix string highest rank first, dropping unknown and
    /// repeated characters.
    pub fn normalize(&self, prefix: &str) -> String {
        self.ranks
            .iter()
            .filter(|c| prefix.contains(**c))
            .collect()
    }
}

impl Default for PrefixRanks {
    fn default() -> Self {
        Self {
            ranks: crate::config::DEFAULT_PREFIX_RANKS.chars().collect(),
        }
    }
}

/// A channel member: a bare nickname plus its rank prefixes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    /// Nickname without prefixes.
    pub nick: String,
    /// Rank prefixes, highest first; empty for an unranked member.
    pub prefix: String,
}

impl Member {
    /// Create a member.
    pub fn new(nick: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            prefix: prefix.into(),
        }
    }

    /// Whether this member's bare name is `nick` (IRC case-insensitive).
    pub fn is(&self, nick: &str) -> bool {
        irc_eq(&self.nick, nick)
    }

    /// Highest rank prefix, if any.
    pub fn highest_prefix(&self) -> Option<char> {
        self.prefix.chars().next()
    }
}

impl fmt::Display for Member {
    /// Formats as the NAMES entry, e.g. `@bob`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.nick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_names_entry() {
        let ranks = PrefixRanks::default();
        assert_eq!(ranks.split("@+bob"), ("@+", "bob"));
        assert_eq!(ranks.split("alice"), ("", "alice"));
        assert_eq!(ranks.split("~"), ("~", ""));
    }

    #[test]
    fn test_normalize_orders_by_rank() {
        let ranks = PrefixRanks::default();
        assert_eq!(ranks.normalize("+@"), "@+");
        assert_eq!(ranks.normalize("%~x"), "~%");
    }

    #[test]
    fn test_rank_order() {
        let ranks = PrefixRanks::default();
        assert!(ranks.rank('~') < ranks.rank('@'));
        assert!(ranks.rank('@') < ranks.rank('+'));
        assert_eq!(ranks.rank('!'), None);
    }

    #[test]
    fn test_invalid_tables() {
        assert!(PrefixRanks::new("").is_none());
        assert!(PrefixRanks::new("@@").is_none());
        assert!(PrefixRanks::new("@a").is_none());
        assert!(PrefixRanks::new("!@").is_some());
    }

    #[test]
    fn test_member_display() {
        let member = Member::new("bob", "@");
        assert_eq!(member.to_string(), "@bob");
        assert!(member.is("BOB"));
        assert_eq!(member.highest_prefix(), Some('@'));
    }
}
