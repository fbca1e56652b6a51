//! Deferred actions requested by the client.
//!
//! The client never sleeps. It hands out [`Timer`]s; the driver waits for
//! `delay` and passes the timer back to [`Client::on_timer`]. Every timer
//! carries the connection generation it was created in, so a timer that
//! outlives its connection or registration is ignored when it fires.
//!
//! [`Client::on_timer`]: super::Client::on_timer

use std::time::Duration;

/// What to do when a timer fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Join the configured channels.
    AutoJoin,
    /// Check whether the focus-after-join target exists yet.
    FocusPoll {
        /// Time left before giving up.
        remaining: Duration,
    },
}

/// A deferred action tied to one connection generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    pub(crate) generation: u64,
    pub kind: TimerKind,
    /// How long to wait before firing.
    pub delay: Duration,
}

impl Timer {
    pub(crate) fn new(generation: u64, kind: TimerKind, delay: Duration) -> Self {
        Self {
            generation,
            kind,
            delay,
        }
    }

    /// Generation the timer belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
