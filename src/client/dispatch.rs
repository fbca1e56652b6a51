//! Per-command handling of dispatched lines.

use tracing::{debug, trace, warn};

use super::{Client, ClientAction, ClientEvent, ConnectionStatus, MessageEvent, MessageKind};
use super::{Timer, TimerKind};
use crate::casemap::{contains_ignore_case, irc_eq};
use crate::chan::ChannelExt;
use crate::command::Command;
use crate::ctcp::action_body;
use crate::format;
use crate::message::Message;
use crate::response::{self, Response};

fn send(out: &mut Vec<ClientAction>, cmd: Command) {
    out.push(ClientAction::Send(cmd));
}

fn emit(out: &mut Vec<ClientAction>, event: ClientEvent) {
    out.push(ClientAction::Emit(event));
}

fn arg(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or_default()
}

impl Client {
    /// Handle one line that is not a batch marker.
    pub(super) fn dispatch(&mut self, msg: &Message, cmd: Command, out: &mut Vec<ClientAction>) {
        trace!(command = %msg.command, origin = %msg.origin, "dispatch");
        let actor = msg.origin_nick();

        match cmd {
            Command::PING(token) => send(out, Command::PONG(token)),
            Command::CAP(..) => {
                for reply in self.state.caps.handle(&cmd) {
                    send(out, reply);
                }
            }
            Command::Response(resp, args) => self.on_response(msg, resp, &args, out),
            Command::JOIN(channel, _) => self.on_join(actor, &channel, out),
            Command::PART(channel, reason) => self.on_part(actor, &channel, reason, out),
            Command::QUIT(reason) => {
                if self.state.is_self(actor) {
                    return;
                }
                let targets = self.state.remove_member_everywhere(actor);
                emit(
                    out,
                    ClientEvent::Quit {
                        nick: actor.to_string(),
                        reason,
                        targets,
                    },
                );
            }
            Command::KICK(channel, victim, reason) => {
                self.on_kick(actor, &channel, &victim, reason, out)
            }
            Command::NICK(new) => self.on_nick(actor, &new, out),
            Command::MODE(target, modes) => self.on_mode(actor, &target, &modes, out),
            Command::TOPIC(channel, Some(topic)) => {
                if self.state.has_target(&channel) {
                    self.state.set_topic(&channel, &topic);
                    emit(
                        out,
                        ClientEvent::TopicChanged {
                            target: channel,
                            topic,
                            setter: Some(actor.to_string()),
                        },
                    );
                }
            }
            Command::PRIVMSG(target, text) => self.on_privmsg(msg, &target, &text, out),
            Command::NOTICE(target, text) => self.on_notice(msg, &target, &text, out),
            Command::ERROR(text) => emit(
                out,
                ClientEvent::Error {
                    target: self.state.status_target().to_string(),
                    text,
                },
            ),
            Command::Raw(ref name, _) if response::is_numeric(name) => {
                emit(out, self.status_info(msg.params_from(1)));
            }
            other => trace!(command = ?other, "ignored"),
        }
    }

    fn status_info(&self, text: String) -> ClientEvent {
        ClientEvent::Info {
            target: self.state.status_target().to_string(),
            text,
        }
    }

    fn on_response(
        &mut self,
        msg: &Message,
        resp: Response,
        args: &[String],
        out: &mut Vec<ClientAction>,
    ) {
        match resp {
            Response::RPL_WELCOME => {
                self.on_welcome(arg(args, 0), out);
                emit(out, self.status_info(msg.last_param().to_string()));
            }
            Response::RPL_CHANNELMODEIS => {
                let (channel, modes) = (arg(args, 1), arg(args, 2).trim_start_matches('+'));
                if self.state.has_target(channel) {
                    self.state.set_mode(channel, modes);
                    emit(
                        out,
                        ClientEvent::ModeChanged {
                            target: channel.to_string(),
                            modes: modes.to_string(),
                            setter: msg.origin_nick().to_string(),
                        },
                    );
                }
            }
            Response::RPL_CREATIONTIME | Response::RPL_TOPICWHOTIME => {}
            Response::RPL_NOTOPIC | Response::RPL_TOPIC => {
                let channel = arg(args, 1);
                let topic = if resp == Response::RPL_TOPIC { arg(args, 2) } else { "" };
                if channel.is_channel_name() {
                    self.state.ensure_target(channel);
                    self.state.set_topic(channel, topic);
                    emit(
                        out,
                        ClientEvent::TopicChanged {
                            target: channel.to_string(),
                            topic: topic.to_string(),
                            setter: None,
                        },
                    );
                }
            }
            Response::RPL_NAMREPLY => {
                let channel = arg(args, 2);
                if channel.is_channel_name() {
                    self.state.ensure_target(channel);
                    self.state.merge_names(channel, arg(args, 3));
                }
            }
            Response::RPL_ENDOFNAMES => self.on_end_of_names(arg(args, 1), out),
            Response::ERR_NICKNAMEINUSE => {
                let next = format!("{}{}", self.state.nick(), self.config.nick_collision_suffix);
                warn!(taken = %arg(args, 1), %next, "nickname in use");
                self.state.set_nick(&next);
                send(out, Command::NICK(next.clone()));
                emit(
                    out,
                    ClientEvent::Warning {
                        target: self.state.focused_name().to_string(),
                        text: format!("Nick in use, trying {}", next),
                    },
                );
            }
            Response::RPL_LISTSTART => emit(out, ClientEvent::ChannelListStart),
            Response::RPL_LIST => emit(
                out,
                ClientEvent::ChannelListEntry {
                    channel: arg(args, 1).to_string(),
                    users: arg(args, 2).parse().unwrap_or(0),
                    topic: arg(args, 3).to_string(),
                },
            ),
            Response::RPL_LISTEND => emit(out, ClientEvent::ChannelListEnd),
            resp if resp.is_error() => emit(
                out,
                ClientEvent::Error {
                    target: self.state.focused_name().to_string(),
                    text: msg.params_from(1),
                },
            ),
            _ => emit(out, self.status_info(msg.params_from(1))),
        }
    }

    fn on_welcome(&mut self, nick: &str, out: &mut Vec<ClientAction>) {
        if !nick.is_empty() {
            self.state.set_nick(nick);
        }
        self.state.set_registered(true);
        // Supersede timers scheduled for an earlier registration.
        self.generation += 1;
        debug!(nick = %self.state.nick(), generation = self.generation, "registered");

        emit(
            out,
            ClientEvent::Status(ConnectionStatus::Registered {
                nick: self.state.nick().to_string(),
            }),
        );
        if !self.config.auto_join.is_empty() || self.config.focus_after_join.is_some() {
            out.push(ClientAction::Schedule(Timer::new(
                self.generation,
                TimerKind::AutoJoin,
                self.config.auto_join_delay,
            )));
        }
    }

    fn on_end_of_names(&mut self, channel: &str, out: &mut Vec<ClientAction>) {
        let Some(target) = self.state.target(channel) else {
            return;
        };
        let name = target.name().to_string();
        emit(
            out,
            ClientEvent::MembersUpdated {
                target: name.clone(),
                members: target.members().to_vec(),
            },
        );
        send(out, Command::MODE(name.clone(), Vec::new()));

        if self.state.caps.history_enabled()
            && self
                .state
                .mark_history_requested(&name, self.config.history_policy)
        {
            debug!(channel = %name, "requesting history");
            send(
                out,
                Command::history_latest(name, self.config.history_page_size),
            );
        }
    }

    fn on_join(&mut self, actor: &str, channel: &str, out: &mut Vec<ClientAction>) {
        let is_self = self.state.is_self(actor);
        if is_self {
            if irc_eq(channel, &self.config.null_target) {
                debug!(channel, "leaving null target");
                send(out, Command::PART(channel.to_string(), None));
                return;
            }
            self.state.ensure_target(channel);
        } else if self.state.has_target(channel) {
            self.state.add_member(channel, actor, "");
        } else {
            return;
        }
        emit(
            out,
            ClientEvent::Joined {
                target: channel.to_string(),
                nick: actor.to_string(),
                is_self,
            },
        );
    }

    fn on_part(
        &mut self,
        actor: &str,
        channel: &str,
        reason: Option<String>,
        out: &mut Vec<ClientAction>,
    ) {
        let is_self = self.state.is_self(actor);
        if is_self {
            let was_focused = self.state.is_focused(channel);
            if self.state.remove_target(channel).is_none() {
                return;
            }
            emit(
                out,
                ClientEvent::Parted {
                    target: channel.to_string(),
                    nick: actor.to_string(),
                    reason,
                    is_self,
                },
            );
            if was_focused {
                out.push(self.focused_event());
            }
        } else if self.state.remove_member(channel, actor) {
            emit(
                out,
                ClientEvent::Parted {
                    target: channel.to_string(),
                    nick: actor.to_string(),
                    reason,
                    is_self,
                },
            );
        }
    }

    fn on_kick(
        &mut self,
        actor: &str,
        channel: &str,
        victim: &str,
        reason: Option<String>,
        out: &mut Vec<ClientAction>,
    ) {
        let is_self = self.state.is_self(victim);
        let was_focused = self.state.is_focused(channel);
        let known = if is_self {
            self.state.remove_target(channel).is_some()
        } else {
            self.state.remove_member(channel, victim)
        };
        if !known {
            return;
        }
        emit(
            out,
            ClientEvent::Kicked {
                target: channel.to_string(),
                nick: victim.to_string(),
                by: actor.to_string(),
                reason,
                is_self,
            },
        );
        if is_self && was_focused {
            out.push(self.focused_event());
        }
    }

    fn on_nick(&mut self, old: &str, new: &str, out: &mut Vec<ClientAction>) {
        let is_self = self.state.is_self(old);
        if is_self {
            self.state.set_nick(new);
        }
        let targets = self.state.rename_member(old, new);
        let rekeyed = self.state.rekey_target(old, new);
        emit(
            out,
            ClientEvent::Renamed {
                old: old.to_string(),
                new: new.to_string(),
                targets,
                is_self,
            },
        );
        if rekeyed && self.state.is_focused(new) {
            out.push(self.focused_event());
        }
    }

    fn on_mode(&mut self, actor: &str, target: &str, modes: &[String], out: &mut Vec<ClientAction>) {
        if !target.is_channel_name() {
            emit(
                out,
                self.status_info(format!("Mode {} {}", target, modes.join(" "))),
            );
            return;
        }
        if !self.state.has_target(target) {
            return;
        }
        emit(
            out,
            ClientEvent::ModeChanged {
                target: target.to_string(),
                modes: modes.join(" "),
                setter: actor.to_string(),
            },
        );
        // Prefixes may have changed; refetch members and modes.
        self.state.clear_members(target);
        send(out, Command::NAMES(Some(target.to_string())));
        send(out, Command::MODE(target.to_string(), Vec::new()));
    }

    fn on_privmsg(&mut self, msg: &Message, target: &str, text: &str, out: &mut Vec<ClientAction>) {
        let actor = msg.origin_nick();
        let from_self = self.state.is_self(actor);
        let in_channel = target.is_channel_name();
        // Direct messages live under the peer's name; our own echoes under the recipient.
        let peer = if from_self { target } else { actor };
        let dest = if in_channel {
            target.to_string()
        } else if peer.is_empty() {
            self.state.status_target().to_string()
        } else if self.state.is_reserved(peer) {
            warn!(nick = peer, "direct message under a reserved target name dropped");
            emit(
                out,
                ClientEvent::Warning {
                    target: self.state.status_target().to_string(),
                    text: format!("Ignored a private message with {}: the name is reserved", peer),
                },
            );
            return;
        } else {
            peer.to_string()
        };

        let (text, is_action) = match action_body(text) {
            Some(body) => (body, true),
            None => (text, false),
        };
        let is_mention = in_channel
            && !from_self
            && contains_ignore_case(&format::strip(text), self.state.nick());

        let name = self.state.ensure_target(&dest).name().to_string();
        let event = MessageEvent {
            target: name.clone(),
            actor: actor.to_string(),
            text: text.to_string(),
            timestamp: msg.server_time(),
            is_action,
            is_mention,
            kind: MessageKind::Privmsg,
        };
        self.state.push_message(&name, event.clone());
        emit(out, ClientEvent::Message(event.clone()));

        if is_mention {
            self.state.mark_mentioned(&name);
            let mentions = self.state.mentions_target().to_string();
            self.state.push_message(&mentions, event.clone());
            emit(
                out,
                ClientEvent::Mention {
                    target: mentions,
                    message: event,
                },
            );
        }
    }

    fn on_notice(&mut self, msg: &Message, target: &str, text: &str, out: &mut Vec<ClientAction>) {
        let actor = msg.origin_nick();
        let dest = if !msg.is_from_user() {
            self.state.status_target().to_string()
        } else if target.is_channel_name() {
            target.to_string()
        } else if self.state.has_target(actor) {
            actor.to_string()
        } else {
            self.state.status_target().to_string()
        };

        let name = self.state.ensure_target(&dest).name().to_string();
        let event = MessageEvent {
            target: name.clone(),
            actor: actor.to_string(),
            text: text.to_string(),
            timestamp: msg.server_time(),
            is_action: false,
            is_mention: false,
            kind: MessageKind::Notice,
        };
        self.state.push_message(&name, event.clone());
        emit(out, ClientEvent::Message(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, HistoryPolicy};

    fn client() -> Client {
        let mut client = Client::new(ClientConfig::new("bob")).unwrap();
        let _ = client.start();
        let _ = client.feed_line(":srv 001 bob :Welcome");
        client
    }

    fn sent(actions: &[ClientAction]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a {
                ClientAction::Send(cmd) => Some(cmd.to_string()),
                _ => None,
            })
            .collect()
    }

    fn events(actions: Vec<ClientAction>) -> Vec<ClientEvent> {
        actions
            .into_iter()
            .filter_map(|a| match a {
                ClientAction::Emit(ev) => Some(ev),
                _ => None,
            })
            .collect()
    }

    fn with_history(client: &mut Client) {
        let _ = client.feed_line(":srv CAP * LS :chathistory batch");
        let _ = client.feed_line(":srv CAP * ACK :chathistory batch");
    }

    #[test]
    fn test_null_target_is_left() {
        let mut client = client();
        let actions = client.feed_line(":bob!u@h JOIN #BlackHole");
        assert_eq!(sent(&actions), vec!["PART #BlackHole"]);
        assert!(!client.state().has_target("#blackhole"));
    }

    #[test]
    fn test_other_join_adds_member() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let actions = client.feed_line(":alice!u@h JOIN #dev");
        assert_eq!(
            events(actions),
            vec![ClientEvent::Joined {
                target: "#dev".into(),
                nick: "alice".into(),
                is_self: false
            }]
        );
        assert!(client.state().target("#dev").unwrap().member("alice").is_some());
    }

    #[test]
    fn test_names_then_end_requests_mode_and_history_once() {
        let mut client = client();
        with_history(&mut client);
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let _ = client.feed_line(":srv 353 bob = #dev :@alice bob +carol");
        let _ = client.feed_line(":srv 353 bob = #dev :alice dave");
        let actions = client.feed_line(":srv 366 bob #dev :End of /NAMES list.");
        assert_eq!(
            sent(&actions),
            vec!["MODE #dev", "CHATHISTORY LATEST #dev * 50"]
        );
        let members = client.state().target("#dev").unwrap().members().len();
        assert_eq!(members, 4);
        assert_eq!(client.state().prefix_of("#dev", "alice"), Some("@"));

        let again = client.feed_line(":srv 366 bob #dev :End of /NAMES list.");
        assert_eq!(sent(&again), vec!["MODE #dev"]);
    }

    #[test]
    fn test_no_history_without_capability() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let actions = client.feed_line(":srv 366 bob #dev :End");
        assert_eq!(sent(&actions), vec!["MODE #dev"]);
    }

    #[test]
    fn test_rejoin_history_every_join() {
        let config = ClientConfig::new("bob").with_history_policy(HistoryPolicy::EveryJoin);
        let mut client = Client::new(config).unwrap();
        let _ = client.start();
        with_history(&mut client);
        for _ in 0..2 {
            let _ = client.feed_line(":bob!u@h JOIN #dev");
            let actions = client.feed_line(":srv 366 bob #dev :End");
            assert_eq!(sent(&actions).len(), 2);
            let _ = client.feed_line(":bob!u@h PART #dev");
        }
    }

    #[test]
    fn test_self_part_removes_target_and_refocuses() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let _ = client.focus("#dev");
        let evs = events(client.feed_line(":bob!u@h PART #dev :bye"));
        assert_eq!(evs.len(), 2);
        assert_eq!(
            evs[1],
            ClientEvent::Focused {
                target: "Status".into()
            }
        );
        assert!(!client.state().has_target("#dev"));
    }

    #[test]
    fn test_kick_self_and_other() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let _ = client.feed_line(":srv 353 bob = #dev :bob alice");

        let evs = events(client.feed_line(":op!u@h KICK #dev alice :spam"));
        assert!(matches!(&evs[0], ClientEvent::Kicked { is_self: false, .. }));
        assert!(client.state().has_target("#dev"));

        let evs = events(client.feed_line(":op!u@h KICK #dev bob"));
        assert!(matches!(&evs[0], ClientEvent::Kicked { is_self: true, by, .. } if by == "op"));
        assert!(!client.state().has_target("#dev"));
    }

    #[test]
    fn test_quit_reports_channels() {
        let mut client = client();
        for chan in ["#a", "#b"] {
            let _ = client.feed_line(&format!(":bob!u@h JOIN {}", chan));
            let _ = client.feed_line(&format!(":alice!u@h JOIN {}", chan));
        }
        let evs = events(client.feed_line(":alice!u@h QUIT :gone"));
        assert_eq!(
            evs,
            vec![ClientEvent::Quit {
                nick: "alice".into(),
                reason: Some("gone".into()),
                targets: vec!["#a".into(), "#b".into()],
            }]
        );
    }

    #[test]
    fn test_nick_change_rekeys_query() {
        let mut client = client();
        let _ = client.feed_line(":alice!u@h PRIVMSG bob :psst");
        let _ = client.focus("alice");
        let evs = events(client.feed_line(":alice!u@h NICK alicia"));
        assert!(matches!(&evs[0], ClientEvent::Renamed { is_self: false, .. }));
        assert_eq!(
            evs[1],
            ClientEvent::Focused {
                target: "alicia".into()
            }
        );
        assert!(client.state().has_target("alicia"));
    }

    #[test]
    fn test_own_nick_change() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h NICK robert");
        assert_eq!(client.nick(), "robert");
    }

    #[test]
    fn test_channel_mode_refreshes_members() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let _ = client.feed_line(":srv 353 bob = #dev :bob alice");
        let actions = client.feed_line(":op!u@h MODE #dev +o alice");
        assert_eq!(sent(&actions), vec!["NAMES #dev", "MODE #dev"]);
        assert!(client.state().target("#dev").unwrap().members().is_empty());

        let _ = client.feed_line(":srv 324 bob #dev +nt");
        assert_eq!(client.state().target("#dev").unwrap().mode, "nt");
    }

    #[test]
    fn test_user_mode_is_status_info() {
        let mut client = client();
        let evs = events(client.feed_line(":bob MODE bob :+i"));
        assert_eq!(
            evs,
            vec![ClientEvent::Info {
                target: "Status".into(),
                text: "Mode bob +i".into()
            }]
        );
    }

    #[test]
    fn test_topic_replies() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let _ = client.feed_line(":srv 332 bob #dev :Welcome to dev");
        assert_eq!(client.state().target("#dev").unwrap().topic, "Welcome to dev");
        let _ = client.feed_line(":alice!u@h TOPIC #dev :New topic");
        assert_eq!(client.state().target("#dev").unwrap().topic, "New topic");
        let _ = client.feed_line(":srv 331 bob #dev :No topic is set");
        assert_eq!(client.state().target("#dev").unwrap().topic, "");
    }

    #[test]
    fn test_notice_routing() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let _ = client.open_query("alice");

        let route = |client: &mut Client, line: &str| match &events(client.feed_line(line))[0] {
            ClientEvent::Message(m) => m.target.clone(),
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(route(&mut client, ":irc.example NOTICE * :Looking up"), "Status");
        assert_eq!(route(&mut client, ":carol!u@h NOTICE #dev :hi all"), "#dev");
        assert_eq!(route(&mut client, ":alice!u@h NOTICE bob :hey"), "alice");
        assert_eq!(route(&mut client, ":dave!u@h NOTICE bob :who?"), "Status");
    }

    #[test]
    fn test_direct_privmsg_goes_to_sender() {
        let mut client = client();
        let evs = events(client.feed_line(":alice!u@h PRIVMSG bob :\x01ACTION waves\x01"));
        assert!(matches!(
            &evs[0],
            ClientEvent::Message(m) if m.target == "alice" && m.is_action && m.text == "waves" && !m.is_mention
        ));
        assert_eq!(client.state().target("alice").unwrap().unread(), 1);
    }

    #[test]
    fn test_privmsg_without_origin_goes_to_status() {
        let mut client = client();
        let evs = events(client.feed_line("PRIVMSG bob :hi"));
        assert!(matches!(
            &evs[0],
            ClientEvent::Message(m) if m.target == "Status" && m.actor.is_empty() && m.text == "hi"
        ));
        let names: Vec<&str> = client.state().targets().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Hilights", "Status"]);
    }

    #[test]
    fn test_privmsg_from_reserved_name_dropped() {
        let mut client = client();
        let evs = events(client.feed_line(":Status!u@h PRIVMSG bob :hello"));
        assert!(matches!(
            &evs[..],
            [ClientEvent::Warning { target, text }] if target == "Status" && text.contains("reserved")
        ));
        assert_eq!(client.state().target("Status").unwrap().messages().count(), 0);

        let evs = events(client.feed_line(":hilights!u@h PRIVMSG bob :hey"));
        assert!(matches!(&evs[..], [ClientEvent::Warning { .. }]));
        assert_eq!(client.state().target("Hilights").unwrap().messages().count(), 0);
    }

    #[test]
    fn test_error_numeric_on_focused_target() {
        let mut client = client();
        let _ = client.feed_line(":bob!u@h JOIN #dev");
        let _ = client.focus("#dev");
        let evs = events(client.feed_line(":srv 404 bob #dev :Cannot send to channel"));
        assert_eq!(
            evs,
            vec![ClientEvent::Error {
                target: "#dev".into(),
                text: "#dev Cannot send to channel".into()
            }]
        );
    }

    #[test]
    fn test_unknown_numeric_is_info() {
        let mut client = client();
        let evs = events(client.feed_line(":srv 999 bob some odd reply"));
        assert!(matches!(&evs[0], ClientEvent::Info { text, .. } if text == "some odd reply"));
        assert!(client.feed_line(":srv WALLOPS :x").is_empty());
    }

    #[test]
    fn test_channel_list() {
        let mut client = client();
        let evs = events(client.feed_line(":srv 322 bob #dev 12 :Rust talk"));
        assert_eq!(
            evs,
            vec![ClientEvent::ChannelListEntry {
                channel: "#dev".into(),
                users: 12,
                topic: "Rust talk".into()
            }]
        );
    }

    #[test]
    fn test_error_command() {
        let mut client = client();
        let evs = events(client.feed_line("ERROR :Closing link"));
        assert!(matches!(&evs[0], ClientEvent::Error { target, .. } if target == "Status"));
    }
}
