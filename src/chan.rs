//! Channel name utilities.
//!
//! The client distinguishes multi-party channels from direct queries by the
//! leading sigil of the target name.

/// Sigils that introduce a multi-party channel name.
pub const CHANNEL_SIGILS: &[char] = &['#', '&'];

/// Extension trait for classifying conversation target names.
pub trait ChannelExt {
    /// Check if this name denotes a multi-party channel (starts with `#` or `&`).
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        self.starts_with(CHANNEL_SIGILS)
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }
}
