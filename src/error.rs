//! Error types for the IRC client engine.
//!
//! The protocol core (parser, dispatcher, negotiator, batch buffer) has no
//! error path: malformed input degrades to a best-effort structure. Errors
//! only exist at the edges, for the transport and for configuration.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Transport and line-framing errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// Line exceeded maximum allowed length.
    #[error("line too long: {actual} bytes (limit {limit})")]
    MessageTooLong {
        /// Length of the offending line.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Illegal control character in a line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// WebSocket layer failure.
    #[error("websocket error: {0}")]
    WebSocket(String),
}

/// Errors reported by [`ClientConfig::validate`](crate::config::ClientConfig::validate)
/// and the configuration loaders.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No usable nickname was configured.
    #[error("nickname is empty")]
    EmptyNickname,

    /// A capacity option was zero.
    #[error("{field} must be greater than zero")]
    InvalidCapacity {
        /// Name of the offending option.
        field: &'static str,
    },

    /// A duration option was zero where a positive delay is required.
    #[error("{field} must be a positive duration")]
    InvalidDuration {
        /// Name of the offending option.
        field: &'static str,
    },

    /// The membership prefix rank table was empty or had duplicates.
    #[error("invalid prefix rank table: {0:?}")]
    InvalidPrefixRanks(String),

    /// The configuration file could not be read.
    #[cfg(feature = "toml")]
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file was not valid TOML for [`ClientConfig`](crate::config::ClientConfig).
    #[cfg(feature = "toml")]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_long_display() {
        let err = ProtocolError::MessageTooLong {
            actual: 9000,
            limit: 8191,
        };
        assert_eq!(err.to_string(), "line too long: 9000 bytes (limit 8191)");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidCapacity {
            field: "color_cache_capacity",
        };
        assert_eq!(
            err.to_string(),
            "color_cache_capacity must be greater than zero"
        );
    }
}
