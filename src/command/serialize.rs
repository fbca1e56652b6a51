use std::fmt::{self, Write};

use super::types::Command;

/// Write a command with arguments directly to a formatter.
/// The last argument is treated as trailing and gets a `:` prefix if needed.
fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    if args.is_empty() {
        return f.write_str(cmd);
    }

    let (middle_params, trailing) = args.split_at(args.len() - 1);
    let trailing = trailing[0];

    f.write_str(cmd)?;

    for param in middle_params {
        f.write_char(' ')?;
        f.write_str(param)?;
    }

    f.write_char(' ')?;

    // Add colon prefix if trailing is empty, contains a space, or starts with ':'
    if trailing.is_empty() || trailing.contains(' ') || trailing.starts_with(':') {
        f.write_char(':')?;
    }

    f.write_str(trailing)
}

/// Write a command with a freeform (always colon-prefixed) trailing argument.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    match args.split_last() {
        Some((suffix, middle)) => {
            f.write_str(cmd)?;
            for arg in middle {
                f.write_char(' ')?;
                f.write_str(arg)?;
            }
            f.write_str(" :")?;
            f.write_str(suffix)
        }
        None => f.write_str(cmd),
    }
}

fn write_owned(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[String]) -> fmt::Result {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    write_cmd(f, cmd, &args)
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(n) => write_cmd(f, "NICK", &[n]),
            Command::USER(u, m, r) => write_cmd_freeform(f, "USER", &[u, m, "*", r]),
            Command::QUIT(Some(m)) => write_cmd_freeform(f, "QUIT", &[m]),
            Command::QUIT(None) => write_cmd(f, "QUIT", &[]),
            Command::JOIN(c, Some(k)) => write_cmd(f, "JOIN", &[c, k]),
            Command::JOIN(c, None) => write_cmd(f, "JOIN", &[c]),
            Command::PART(c, Some(m)) => write_cmd_freeform(f, "PART", &[c, m]),
            Command::PART(c, None) => write_cmd(f, "PART", &[c]),
            Command::MODE(t, modes) => {
                f.write_str("MODE ")?;
                f.write_str(t)?;
                for m in modes {
                    f.write_char(' ')?;
                    f.write_str(m)?;
                }
                Ok(())
            }
            Command::TOPIC(c, Some(t)) => write_cmd_freeform(f, "TOPIC", &[c, t]),
            Command::TOPIC(c, None) => write_cmd(f, "TOPIC", &[c]),
            Command::NAMES(Some(c)) => write_cmd(f, "NAMES", &[c]),
            Command::NAMES(None) => write_cmd(f, "NAMES", &[]),
            Command::LIST(Some(c)) => write_cmd(f, "LIST", &[c]),
            Command::LIST(None) => write_cmd(f, "LIST", &[]),
            Command::KICK(c, n, Some(r)) => write_cmd_freeform(f, "KICK", &[c, n, r]),
            Command::KICK(c, n, None) => write_cmd(f, "KICK", &[c, n]),
            Command::PRIVMSG(t, m) => write_cmd_freeform(f, "PRIVMSG", &[t, m]),
            Command::NOTICE(t, m) => write_cmd_freeform(f, "NOTICE", &[t, m]),
            Command::PING(s) => write_cmd(f, "PING", &[s]),
            Command::PONG(s) => write_cmd(f, "PONG", &[s]),
            Command::ERROR(m) => write_cmd_freeform(f, "ERROR", &[m]),

            Command::CAP(None, s, None, Some(p)) => write_cmd(f, "CAP", &[s.as_str(), p]),
            Command::CAP(None, s, None, None) => write_cmd(f, "CAP", &[s.as_str()]),
            Command::CAP(Some(k), s, None, Some(p)) => write_cmd(f, "CAP", &[k, s.as_str(), p]),
            Command::CAP(Some(k), s, None, None) => write_cmd(f, "CAP", &[k, s.as_str()]),
            Command::CAP(None, s, Some(c), Some(p)) => write_cmd(f, "CAP", &[s.as_str(), c, p]),
            Command::CAP(None, s, Some(c), None) => write_cmd(f, "CAP", &[s.as_str(), c]),
            Command::CAP(Some(k), s, Some(c), Some(p)) => {
                write_cmd(f, "CAP", &[k, s.as_str(), c, p])
            }
            Command::CAP(Some(k), s, Some(c), None) => write_cmd(f, "CAP", &[k, s.as_str(), c]),

            Command::BATCH(t, kind, params) => {
                f.write_str("BATCH ")?;
                f.write_str(t)?;
                if let Some(kind) = kind {
                    f.write_char(' ')?;
                    f.write_str(kind)?;
                }
                for p in params {
                    f.write_char(' ')?;
                    f.write_str(p)?;
                }
                Ok(())
            }
            Command::CHATHISTORY {
                subcommand,
                target,
                reference,
                limit,
            } => write!(f, "CHATHISTORY {} {} {} {}", subcommand, target, reference, limit),

            Command::Response(resp, args) => write_owned(f, &resp.to_string(), args),
            Command::Raw(c, args) => write_owned(f, c, args),
        }
    }
}
