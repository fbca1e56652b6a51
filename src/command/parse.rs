//! Conversion of parsed lines into typed commands.
//!
//! Conversion never fails: a known command with too few parameters, or a
//! numeric outside [`Response`], falls back to [`Command::Raw`].

use super::subcommands::CapSubCommand;
use super::types::Command;
use crate::message::Message;
use crate::response::Response;

fn raw(cmd: &str, args: &[String]) -> Command {
    Command::Raw(cmd.to_owned(), args.to_vec())
}

fn opt(args: &[String], index: usize) -> Option<String> {
    args.get(index).cloned()
}

fn parse_cap(args: &[String]) -> Option<Command> {
    let subcommand = CapSubCommand::from_name(args.get(1)?)?;
    let target = opt(args, 0);
    let rest = args.get(2..).unwrap_or_default();
    let (param, caps) = match rest {
        [] => (None, None),
        [only] if only == "*" => (Some(only.clone()), None),
        [only] => (None, Some(only.clone())),
        [param, .., caps] => (Some(param.clone()), Some(caps.clone())),
    };
    Some(Command::CAP(target, subcommand, param, caps))
}

impl Command {
    /// Interpret a parsed line.
    pub fn from_message(msg: &Message) -> Command {
        let cmd = msg.command.as_str();
        let args = msg.params.as_slice();

        let parsed = match cmd {
            "PING" => Some(Command::PING(opt(args, 0).unwrap_or_default())),
            "PONG" => Some(Command::PONG(opt(args, 0).unwrap_or_default())),
            "ERROR" => Some(Command::ERROR(opt(args, 0).unwrap_or_default())),
            "NICK" => opt(args, 0).map(Command::NICK),
            "QUIT" => Some(Command::QUIT(opt(args, 0))),
            "JOIN" => args.first().map(|chan| {
                // extended-join appends account and realname; only the channel matters.
                let chan = chan.split(' ').next().unwrap_or_default();
                Command::JOIN(chan.to_owned(), opt(args, 1))
            }),
            "PART" => opt(args, 0).map(|chan| Command::PART(chan, opt(args, 1))),
            "KICK" => match args {
                [chan, victim, rest @ ..] => Some(Command::KICK(
                    chan.clone(),
                    victim.clone(),
                    rest.first().cloned(),
                )),
                _ => None,
            },
            "MODE" => args
                .split_first()
                .map(|(target, modes)| Command::MODE(target.clone(), modes.to_vec())),
            "TOPIC" => opt(args, 0).map(|chan| Command::TOPIC(chan, opt(args, 1))),
            "NAMES" => Some(Command::NAMES(opt(args, 0))),
            "LIST" => Some(Command::LIST(opt(args, 0))),
            "PRIVMSG" => opt(args, 0)
                .map(|target| Command::PRIVMSG(target, opt(args, 1).unwrap_or_default())),
            "NOTICE" => opt(args, 0)
                .map(|target| Command::NOTICE(target, opt(args, 1).unwrap_or_default())),
            "CAP" => parse_cap(args),
            "BATCH" => args.split_first().map(|(reference, rest)| {
                Command::BATCH(
                    reference.clone(),
                    rest.first().cloned(),
                    rest.get(1..).unwrap_or_default().to_vec(),
                )
            }),
            _ => cmd
                .parse::<Response>()
                .ok()
                .map(|resp| Command::Response(resp, args.to_vec())),
        };

        parsed.unwrap_or_else(|| raw(cmd, args))
    }
}

impl From<&Message> for Command {
    fn from(msg: &Message) -> Self {
        Command::from_message(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(line: &str) -> Command {
        Command::from_message(&Message::parse(line))
    }

    #[test]
    fn test_ping() {
        assert_eq!(cmd("PING :irc.example"), Command::PING("irc.example".into()));
        assert_eq!(cmd("PING"), Command::PING(String::new()));
    }

    #[test]
    fn test_privmsg() {
        assert_eq!(
            cmd(":a!u@h PRIVMSG #dev :hello there"),
            Command::PRIVMSG("#dev".into(), "hello there".into())
        );
        assert_eq!(cmd("PRIVMSG"), Command::Raw("PRIVMSG".into(), vec![]));
    }

    #[test]
    fn test_cap_ls_multiline() {
        assert_eq!(
            cmd(":srv CAP * LS * :batch server-time"),
            Command::CAP(
                Some("*".into()),
                CapSubCommand::LS,
                Some("*".into()),
                Some("batch server-time".into())
            )
        );
        assert_eq!(
            cmd(":srv CAP * LS :sasl=PLAIN"),
            Command::CAP(Some("*".into()), CapSubCommand::LS, None, Some("sasl=PLAIN".into()))
        );
    }

    #[test]
    fn test_cap_ack() {
        assert_eq!(
            cmd(":srv CAP bob ACK :batch"),
            Command::CAP(Some("bob".into()), CapSubCommand::ACK, None, Some("batch".into()))
        );
    }

    #[test]
    fn test_unknown_cap_subcommand_is_raw() {
        assert!(matches!(cmd(":srv CAP * BOGUS :x"), Command::Raw(..)));
    }

    #[test]
    fn test_join_extended() {
        assert_eq!(
            cmd(":a!u@h JOIN #dev acct :Real Name"),
            Command::JOIN("#dev".into(), Some("acct".into()))
        );
    }

    #[test]
    fn test_kick() {
        assert_eq!(
            cmd(":op!u@h KICK #dev bob :flooding"),
            Command::KICK("#dev".into(), "bob".into(), Some("flooding".into()))
        );
        assert!(matches!(cmd(":op!u@h KICK #dev"), Command::Raw(..)));
    }

    #[test]
    fn test_batch() {
        assert_eq!(
            cmd(":srv BATCH +abc chathistory #dev"),
            Command::BATCH("+abc".into(), Some("chathistory".into()), vec!["#dev".into()])
        );
        assert_eq!(cmd("BATCH -abc"), Command::BATCH("-abc".into(), None, vec![]));
    }

    #[test]
    fn test_numeric() {
        assert_eq!(
            cmd(":srv 366 bob #dev :End of /NAMES list."),
            Command::Response(
                Response::RPL_ENDOFNAMES,
                vec!["bob".into(), "#dev".into(), "End of /NAMES list.".into()]
            )
        );
        assert!(matches!(cmd(":srv 999 bob :odd"), Command::Raw(ref c, _) if c == "999"));
    }
}
