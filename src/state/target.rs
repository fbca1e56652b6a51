//! Conversation targets: channels, queries and the client's own special views.

use std::collections::VecDeque;

use super::member::{Member, PrefixRanks};
use crate::casemap::irc_eq;
use crate::chan::ChannelExt;
use crate::client::MessageEvent;

/// What a target stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    /// A multi-party channel (`#dev`).
    Channel,
    /// A direct conversation with one user.
    Query,
    /// A client-side view such as the status or mentions target.
    Special,
}

impl TargetKind {
    /// Classify a name by its leading sigil.
    pub fn of(name: &str) -> Self {
        if name.is_channel_name() {
            TargetKind::Channel
        } else {
            TargetKind::Query
        }
    }
}

/// One conversation and everything known about it.
#[derive(Clone, Debug)]
pub struct Target {
    name: String,
    kind: TargetKind,
    members: Vec<Member>,
    /// Current channel mode letters, e.g. `nt`; empty for none.
    pub mode: String,
    /// Current topic; empty for none.
    pub topic: String,
    /// Whether history backfill was already requested.
    pub history_requested: bool,
    messages: VecDeque<MessageEvent>,
    unread: usize,
    mentioned: bool,
}

impl Target {
    pub(crate) fn new(name: &str, kind: TargetKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            members: Vec::new(),
            mode: String::new(),
            topic: String::new(),
            history_requested: false,
            messages: VecDeque::new(),
            unread: 0,
            mentioned: false,
        }
    }

    /// Display name, in the case first seen.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn is_channel(&self) -> bool {
        self.kind == TargetKind::Channel
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Find a member by bare nickname.
    pub fn member(&self, nick: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.is(nick))
    }

    /// Retained message events, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &MessageEvent> {
        self.messages.iter()
    }

    /// Messages received while the target was not focused.
    pub fn unread(&self) -> usize {
        self.unread
    }

    /// Whether a mention arrived while the target was not focused.
    pub fn is_mentioned(&self) -> bool {
        self.mentioned
    }

    pub(crate) fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Add or update a member. Returns `true` if the member was new.
    pub(crate) fn upsert_member(&mut self, nick: &str, prefix: &str, ranks: &PrefixRanks) -> bool {
        let prefix = ranks.normalize(prefix);
        match self.members.iter_mut().find(|m| m.is(nick)) {
            Some(existing) => {
                existing.prefix = prefix;
                false
            }
            None => {
                self.members.push(Member::new(nick, prefix));
                true
            }
        }
    }

    /// Add a member only if no member with that bare name exists yet.
    pub(crate) fn insert_member_once(&mut self, nick: &str, prefix: &str, ranks: &PrefixRanks) {
        if self.member(nick).is_none() {
            self.members.push(Member::new(nick, ranks.normalize(prefix)));
        }
    }

    pub(crate) fn remove_member(&mut self, nick: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| !m.is(nick));
        self.members.len() != before
    }

    pub(crate) fn rename_member(&mut self, old: &str, new: &str) -> bool {
        let mut renamed = false;
        for member in self.members.iter_mut().filter(|m| irc_eq(&m.nick, old)) {
            member.nick = new.to_string();
            renamed = true;
        }
        renamed
    }

    pub(crate) fn clear_members(&mut self) {
        self.members.clear();
    }

    pub(crate) fn push_message(&mut self, event: MessageEvent, retention: usize, focused: bool) {
        while self.messages.len() >= retention.max(1) {
            self.messages.pop_front();
        }
        self.messages.push_back(event);
        if !focused {
            self.unread += 1;
        }
    }

    pub(crate) fn mark_mentioned(&mut self) {
        self.mentioned = true;
    }

    pub(crate) fn mark_read(&mut self) {
        self.unread = 0;
        self.mentioned = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MessageEvent, MessageKind};

    fn event(text: &str) -> MessageEvent {
        MessageEvent {
            target: "#dev".into(),
            actor: "alice".into(),
            text: text.into(),
            timestamp: None,
            is_action: false,
            is_mention: false,
            kind: MessageKind::Privmsg,
        }
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(TargetKind::of("#dev"), TargetKind::Channel);
        assert_eq!(TargetKind::of("alice"), TargetKind::Query);
    }

    #[test]
    fn test_upsert_replaces_prefix() {
        let ranks = PrefixRanks::default();
        let mut target = Target::new("#dev", TargetKind::Channel);
        assert!(target.upsert_member("bob", "", &ranks));
        assert!(!target.upsert_member("Bob", "+@", &ranks));
        assert_eq!(target.members().len(), 1);
        assert_eq!(target.members()[0].prefix, "@+");
    }

    #[test]
    fn test_insert_once_keeps_first() {
        let ranks = PrefixRanks::default();
        let mut target = Target::new("#dev", TargetKind::Channel);
        target.insert_member_once("bob", "@", &ranks);
        target.insert_member_once("bob", "+", &ranks);
        assert_eq!(target.member("bob").unwrap().prefix, "@");
    }

    #[test]
    fn test_retention_evicts_oldest() {
        let mut target = Target::new("#dev", TargetKind::Channel);
        for text in ["a", "b", "c"] {
            target.push_message(event(text), 2, false);
        }
        let texts: Vec<_> = target.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert_eq!(target.unread(), 3);

        target.mark_read();
        assert_eq!(target.unread(), 0);
    }
}
