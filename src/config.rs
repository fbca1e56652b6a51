//! Client configuration.
//!
//! [`ClientConfig`] carries every tunable of the engine. Defaults describe a
//! web-chat style client; override them field by field or with the `with_*`
//! helpers, then call [`ClientConfig::validate`].
//!
//! With the `toml` feature a configuration can be loaded from a file:
//!
//! ```toml
//! server = "wss://irc.example.net:7000"
//! nickname = "bob"
//! auto_join = ["#dev", "#ops"]
//! focus_after_join = "#dev"
//! auto_join_delay = 3000  # milliseconds
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Capabilities requested by default.
pub const DEFAULT_CAPS: &[&str] = &[
    "server-time",
    "batch",
    "message-tags",
    "draft/chathistory",
    "chathistory",
    "draft/event-playback",
];

/// Membership rank prefixes, highest rank first.
pub const DEFAULT_PREFIX_RANKS: &str = "~&@%+";

/// When a joined channel gets a history backfill request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HistoryPolicy {
    /// Only the first join of a channel in a connection requests history.
    #[default]
    OncePerConnection,
    /// Every join requests history, including re-joins after a part.
    EveryJoin,
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    /// Server address, `host:port` for TCP or a `ws://`/`wss://` URL.
    pub server: String,
    /// Initial nickname.
    pub nickname: String,
    /// Username sent in `USER`.
    pub username: String,
    /// Realname sent in `USER`.
    pub realname: String,
    /// Channels joined after registration.
    pub auto_join: Vec<String>,
    /// Target focused once it becomes known after auto-join.
    pub focus_after_join: Option<String>,
    /// A channel the client leaves immediately when forced into it.
    pub null_target: String,
    /// Capabilities requested when offered.
    pub desired_caps: Vec<String>,
    /// Appended to the nickname on collision.
    pub nick_collision_suffix: String,
    /// Delay before reconnecting after a disconnect.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub reconnect_delay: Duration,
    /// Delay between registration and auto-join.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub auto_join_delay: Duration,
    /// Interval of the focus-after-join poll.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub auto_join_poll_interval: Duration,
    /// Total time the focus-after-join poll keeps trying.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub auto_join_poll_timeout: Duration,
    /// Number of lines requested per history backfill.
    pub history_page_size: usize,
    /// When history backfill is requested.
    pub history_policy: HistoryPolicy,
    /// Membership rank prefixes, highest first.
    pub prefix_ranks: String,
    /// Capacity of the participant color cache.
    pub color_cache_capacity: usize,
    /// Message events kept per target.
    pub retention: usize,
    /// Target receiving server and status output.
    pub status_target: String,
    /// Target aggregating mentions.
    pub mentions_target: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            nickname: String::new(),
            username: "webirc".to_string(),
            realname: "slirc-client".to_string(),
            auto_join: Vec::new(),
            focus_after_join: None,
            null_target: "#blackhole".to_string(),
            desired_caps: DEFAULT_CAPS.iter().map(|cap| cap.to_string()).collect(),
            nick_collision_suffix: "_".to_string(),
            reconnect_delay: Duration::from_secs(15),
            auto_join_delay: Duration::from_secs(3),
            auto_join_poll_interval: Duration::from_millis(200),
            auto_join_poll_timeout: Duration::from_secs(15),
            history_page_size: 50,
            history_policy: HistoryPolicy::OncePerConnection,
            prefix_ranks: DEFAULT_PREFIX_RANKS.to_string(),
            color_cache_capacity: crate::colors::DEFAULT_CAPACITY,
            retention: 5000,
            status_target: "Status".to_string(),
            mentions_target: "Hilights".to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration for `nickname` with every other option defaulted.
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            ..Self::default()
        }
    }

    /// Set the server address.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Set the channels joined after registration.
    #[must_use]
    pub fn with_auto_join<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auto_join = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the target focused after auto-join.
    #[must_use]
    pub fn with_focus_after_join(mut self, target: impl Into<String>) -> Self {
        self.focus_after_join = Some(target.into());
        self
    }

    /// Replace the requested capability list.
    #[must_use]
    pub fn with_desired_caps<I, S>(mut self, caps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.desired_caps = caps.into_iter().map(Into::into).collect();
        self
    }

    /// Set the history backfill policy.
    #[must_use]
    pub fn with_history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.history_policy = policy;
        self
    }

    /// Set the reconnect delay.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the auto-join delay.
    #[must_use]
    pub fn with_auto_join_delay(mut self, delay: Duration) -> Self {
        self.auto_join_delay = delay;
        self
    }

    /// Check option consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nickname.trim().is_empty() {
            return Err(ConfigError::EmptyNickname);
        }
        for (field, value) in [
            ("color_cache_capacity", self.color_cache_capacity),
            ("retention", self.retention),
            ("history_page_size", self.history_page_size),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidCapacity { field });
            }
        }
        for (field, value) in [
            ("reconnect_delay", self.reconnect_delay),
            ("auto_join_poll_interval", self.auto_join_poll_interval),
        ] {
            if value.is_zero() {
                return Err(ConfigError::InvalidDuration { field });
            }
        }
        if crate::state::PrefixRanks::new(&self.prefix_ranks).is_none() {
            return Err(ConfigError::InvalidPrefixRanks(self.prefix_ranks.clone()));
        }
        Ok(())
    }

    /// Parse a TOML document and validate it.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file and validate it.
    #[cfg(feature = "toml")]
    pub fn from_toml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Durations as integer milliseconds.
#[cfg(feature = "serde")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
