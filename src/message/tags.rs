//! IRCv3 message tags.
//!
//! Tag values are stored exactly as received; escape sequences are not
//! decoded since nothing in the client interprets them.

use std::collections::HashMap;

/// Parsed `@key=value;key2` tag block.
///
/// Keys are unique; when a key repeats, the last occurrence wins. A key
/// without `=` has an empty value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tags(HashMap<String, String>);

impl Tags {
    /// Parse a tag block (without the leading `@`).
    pub fn parse(block: &str) -> Self {
        let map = block
            .split(';')
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (entry.to_string(), String::new()),
            })
            .collect();
        Self(map)
    }

    /// Look up a tag value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the tag is present (with or without a value).
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a tag, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no tags are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_pairs() {
        let tags = Tags::parse("time=2023-01-01T00:00:00Z;msgid=abc");
        assert_eq!(tags.get("time"), Some("2023-01-01T00:00:00Z"));
        assert_eq!(tags.get("msgid"), Some("abc"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_missing_value_is_empty() {
        let tags = Tags::parse("draft/bot;account=");
        assert_eq!(tags.get("draft/bot"), Some(""));
        assert_eq!(tags.get("account"), Some(""));
    }

    #[test]
    fn test_duplicate_last_wins() {
        let tags = Tags::parse("a=1;b=2;a=3");
        assert_eq!(tags.get("a"), Some("3"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_value_split_on_first_equals() {
        let tags = Tags::parse("+example/x=a=b");
        assert_eq!(tags.get("+example/x"), Some("a=b"));
    }

    #[test]
    fn test_values_are_raw() {
        let tags = Tags::parse("label=hello\\sworld");
        assert_eq!(tags.get("label"), Some("hello\\sworld"));
    }

    #[test]
    fn test_empty_block() {
        assert!(Tags::parse("").is_empty());
        assert!(Tags::parse(";;").is_empty());
    }
}
