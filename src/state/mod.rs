//! Session state store.
//!
//! [`SessionState`] owns everything the client knows about one connection:
//! the local nickname, the conversation targets with their members, modes and
//! topics, the open batches and the capability negotiator. It is a plain
//! container; the dispatcher in [`crate::client`] is the only code that
//! mutates it while lines are processed.
//!
//! Targets are keyed by their IRC-casefolded name, so `#Dev` and `#dev` are
//! the same target. The name as first seen is kept for display.
//!
//! ```
//! use slirc_client::state::SessionState;
//! use slirc_client::ClientConfig;
//!
//! let mut state = SessionState::new(&ClientConfig::new("bob"));
//! state.ensure_target("#dev");
//! state.add_member("#dev", "alice", "@");
//! state.rename_member("alice", "alicia");
//! assert_eq!(state.prefix_of("#DEV", "alicia"), Some("@"));
//! ```

mod member;
mod target;

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

pub use self::member::{Member, PrefixRanks};
pub use self::target::{Target, TargetKind};

use crate::caps::CapNegotiator;
use crate::casemap::{irc_eq, irc_to_lower};
use crate::client::MessageEvent;
use crate::config::{ClientConfig, HistoryPolicy};
use crate::ircv3::BatchBuffer;

/// Everything known about the current connection.
#[derive(Clone, Debug)]
pub struct SessionState {
    nick: String,
    registered: bool,
    targets: BTreeMap<String, Target>,
    focused: String,
    /// Open batches.
    pub batches: BatchBuffer,
    /// Capability negotiation for this connection.
    pub caps: CapNegotiator,
    ranks: PrefixRanks,
    retention: usize,
    status_target: String,
    mentions_target: String,
    /// Channels whose history was already requested on this connection.
    history_seen: HashSet<String>,
}

impl SessionState {
    /// Create an empty session holding only the special targets.
    pub fn new(config: &ClientConfig) -> Self {
        let mut state = Self {
            nick: config.nickname.clone(),
            registered: false,
            targets: BTreeMap::new(),
            focused: String::new(),
            batches: BatchBuffer::new(),
            caps: CapNegotiator::new(config.desired_caps.iter().cloned()),
            ranks: PrefixRanks::new(&config.prefix_ranks).unwrap_or_default(),
            retention: config.retention,
            status_target: config.status_target.clone(),
            mentions_target: config.mentions_target.clone(),
            history_seen: HashSet::new(),
        };
        state.reset();
        state
    }

    /// Forget everything learned on the current connection.
    ///
    /// The nickname is kept; the caller decides what to register with next.
    pub fn reset(&mut self) {
        self.registered = false;
        self.targets.clear();
        self.history_seen.clear();
        self.batches.clear();
        self.caps.reset();

        for name in [self.status_target.clone(), self.mentions_target.clone()] {
            self.targets
                .insert(irc_to_lower(&name), Target::new(&name, TargetKind::Special));
        }
        self.focused = irc_to_lower(&self.status_target);
    }

    /// The local nickname.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn set_nick(&mut self, nick: &str) {
        self.nick = nick.to_string();
    }

    /// Whether `nick` is the local identity.
    pub fn is_self(&self, nick: &str) -> bool {
        irc_eq(&self.nick, nick)
    }

    /// Whether `001` was received on this connection.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn set_registered(&mut self, registered: bool) {
        self.registered = registered;
    }

    /// Name of the status target.
    pub fn status_target(&self) -> &str {
        &self.status_target
    }

    /// Name of the mentions aggregation target.
    pub fn mentions_target(&self) -> &str {
        &self.mentions_target
    }

    /// Whether `name` is the status or the mentions target. Such names are
    /// never used for queries.
    pub fn is_reserved(&self, name: &str) -> bool {
        irc_eq(name, &self.status_target) || irc_eq(name, &self.mentions_target)
    }

    /// The rank prefix table.
    pub fn ranks(&self) -> &PrefixRanks {
        &self.ranks
    }

    // === Targets ===

    /// Create the target if it does not exist yet. Returns it either way.
    pub fn ensure_target(&mut self, name: &str) -> &mut Target {
        self.targets.entry(irc_to_lower(name)).or_insert_with(|| {
            debug!(name, "target created");
            Target::new(name, TargetKind::of(name))
        })
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.get(&irc_to_lower(name))
    }

    pub fn target_mut(&mut self, name: &str) -> Option<&mut Target> {
        self.targets.get_mut(&irc_to_lower(name))
    }

    pub fn has_target(&self, name: &str) -> bool {
        self.targets.contains_key(&irc_to_lower(name))
    }

    /// All targets ordered by casefolded name.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    /// Drop a target and all of its state.
    ///
    /// Special targets cannot be removed. If the removed target was focused,
    /// focus falls back to the status target.
    pub fn remove_target(&mut self, name: &str) -> Option<Target> {
        let key = irc_to_lower(name);
        if self.targets.get(&key)?.kind() == TargetKind::Special {
            return None;
        }
        let removed = self.targets.remove(&key)?;
        debug!(name = removed.name(), "target removed");
        if self.focused == key {
            self.focused = irc_to_lower(&self.status_target);
        }
        Some(removed)
    }

    /// Move a query target to a new name after its peer renamed.
    ///
    /// Nothing happens unless `old` is a query and `new` is free. Focus
    /// follows the target.
    pub fn rekey_target(&mut self, old: &str, new: &str) -> bool {
        let old_key = irc_to_lower(old);
        let new_key = irc_to_lower(new);
        if old_key != new_key && self.targets.contains_key(&new_key) {
            return false;
        }
        if self.targets.get(&old_key).map(Target::kind) != Some(TargetKind::Query) {
            return false;
        }
        let Some(mut target) = self.targets.remove(&old_key) else {
            return false;
        };
        target.rename(new);
        self.targets.insert(new_key.clone(), target);
        if self.focused == old_key {
            self.focused = new_key;
        }
        true
    }

    // === Focus ===

    /// The focused target.
    pub fn focused(&self) -> Option<&Target> {
        self.targets.get(&self.focused)
    }

    /// Display name of the focused target.
    pub fn focused_name(&self) -> &str {
        self.focused()
            .map(Target::name)
            .unwrap_or(&self.status_target)
    }

    pub fn is_focused(&self, name: &str) -> bool {
        self.focused == irc_to_lower(name)
    }

    /// Focus an existing target, clearing its unread count and mention flag.
    pub fn focus(&mut self, name: &str) -> bool {
        let key = irc_to_lower(name);
        match self.targets.get_mut(&key) {
            Some(target) => {
                target.mark_read();
                self.focused = key;
                true
            }
            None => false,
        }
    }

    // === Members ===

    /// Add a member, or replace the prefix of an existing one.
    pub fn add_member(&mut self, target: &str, nick: &str, prefix: &str) -> bool {
        let ranks = &self.ranks;
        match self.targets.get_mut(&irc_to_lower(target)) {
            Some(t) => t.upsert_member(nick, prefix, ranks),
            None => false,
        }
    }

    /// Merge one NAMES reply. Each entry carries its prefixes; the first
    /// occurrence of a bare name wins.
    pub fn merge_names(&mut self, target: &str, names: &str) {
        let ranks = &self.ranks;
        let Some(t) = self.targets.get_mut(&irc_to_lower(target)) else {
            return;
        };
        for entry in names.split_whitespace() {
            let (prefix, nick) = ranks.split(entry);
            if !nick.is_empty() {
                t.insert_member_once(nick, prefix, ranks);
            }
        }
    }

    /// Remove a member by bare name, whatever its prefix.
    pub fn remove_member(&mut self, target: &str, nick: &str) -> bool {
        self.target_mut(target)
            .is_some_and(|t| t.remove_member(nick))
    }

    /// Remove a member from every target; returns the targets it was in.
    pub fn remove_member_everywhere(&mut self, nick: &str) -> Vec<String> {
        self.targets
            .values_mut()
            .filter_map(|t| t.remove_member(nick).then(|| t.name().to_string()))
            .collect()
    }

    /// Rename a member in every target, keeping its prefix; returns the
    /// targets it was in.
    pub fn rename_member(&mut self, old: &str, new: &str) -> Vec<String> {
        self.targets
            .values_mut()
            .filter_map(|t| t.rename_member(old, new).then(|| t.name().to_string()))
            .collect()
    }

    pub fn clear_members(&mut self, target: &str) {
        if let Some(t) = self.target_mut(target) {
            t.clear_members();
        }
    }

    /// Rank prefixes of `nick` in `target`.
    pub fn prefix_of(&self, target: &str, nick: &str) -> Option<&str> {
        self.target(target)?
            .member(nick)
            .map(|m| m.prefix.as_str())
    }

    // === Mode and topic ===

    pub fn set_mode(&mut self, target: &str, mode: &str) {
        if let Some(t) = self.target_mut(target) {
            t.mode = mode.to_string();
        }
    }

    pub fn set_topic(&mut self, target: &str, topic: &str) {
        if let Some(t) = self.target_mut(target) {
            t.topic = topic.to_string();
        }
    }

    // === Messages ===

    /// Record a message event on `target`, creating the target if needed.
    ///
    /// The event's own `target` field is left alone, so a mention can be
    /// copied into the mentions target while still naming its channel.
    pub fn push_message(&mut self, target: &str, event: MessageEvent) {
        let focused = self.is_focused(target);
        let retention = self.retention;
        self.ensure_target(target)
            .push_message(event, retention, focused);
    }

    /// Flag a target as mentioned unless it is focused.
    pub fn mark_mentioned(&mut self, target: &str) {
        if self.is_focused(target) {
            return;
        }
        if let Some(t) = self.target_mut(target) {
            t.mark_mentioned();
        }
    }

    /// Record that history is about to be requested for `channel`.
    ///
    /// Returns `false` if the request should be skipped under `policy`.
    pub fn mark_history_requested(&mut self, channel: &str, policy: HistoryPolicy) -> bool {
        let key = irc_to_lower(channel);
        let Some(target) = self.targets.get_mut(&key) else {
            return false;
        };
        if target.history_requested {
            return false;
        }
        if policy == HistoryPolicy::OncePerConnection && !self.history_seen.insert(key) {
            return false;
        }
        target.history_requested = true;
        true
    }
}
