//! Terminal chat over a [`Session`].
//!
//! ```text
//! cargo run --example webchat -- irc.libera.chat:6667 mynick "#rust"
//! cargo run --example webchat -- wss://irc.example.net/webirc mynick
//! ```
//!
//! Lines typed on stdin go to the focused target. `/join`, `/part`, `/nick`,
//! `/me`, `/msg`, `/query`, `/close`, `/focus`, `/topic`, `/list` and `/quit`
//! are understood. Set `RUST_LOG=slirc_client=debug` for protocol logging.

use slirc_client::session::Session;
use slirc_client::{Client, ClientConfig, ClientEvent, ConnectionStatus, Request};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn parse_input(line: &str, focused: &str) -> Option<Request> {
    let Some(command) = line.strip_prefix('/') else {
        return Some(Request::Privmsg {
            target: focused.to_string(),
            text: line.to_string(),
        });
    };
    let (verb, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();
    let request = match verb.to_ascii_lowercase().as_str() {
        "join" => Request::Join(rest.to_string()),
        "part" => Request::Part {
            channel: focused.to_string(),
            reason: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "nick" => Request::Nick(rest.to_string()),
        "me" => Request::Action {
            target: focused.to_string(),
            text: rest.to_string(),
        },
        "msg" => {
            let (target, text) = rest.split_once(' ')?;
            Request::Privmsg {
                target: target.to_string(),
                text: text.to_string(),
            }
        }
        "query" => Request::OpenQuery(rest.to_string()),
        "close" => Request::Close(focused.to_string()),
        "focus" => Request::Focus(rest.to_string()),
        "topic" => Request::Topic {
            channel: focused.to_string(),
            topic: rest.to_string(),
        },
        "list" => Request::List,
        "quit" => Request::Quit((!rest.is_empty()).then(|| rest.to_string())),
        _ => return None,
    };
    Some(request)
}

fn render(event: &ClientEvent) -> Option<String> {
    let line = match event {
        ClientEvent::Status(ConnectionStatus::Registered { nick }) => {
            format!("*** registered as {}", nick)
        }
        ClientEvent::Status(status) => format!("*** {:?}", status),
        ClientEvent::Message(m) if m.is_action => {
            format!("[{}] * {} {}", m.target, m.actor, slirc_client::format::strip(&m.text))
        }
        ClientEvent::Message(m) => {
            format!("[{}] <{}> {}", m.target, m.actor, slirc_client::format::strip(&m.text))
        }
        ClientEvent::Mention { message, .. } => {
            format!("!!! {} mentioned you in {}", message.actor, message.target)
        }
        ClientEvent::Joined { target, nick, .. } => format!("[{}] --> {}", target, nick),
        ClientEvent::Parted { target, nick, .. } => format!("[{}] <-- {}", target, nick),
        ClientEvent::Quit { nick, reason, .. } => {
            format!("*** {} quit ({})", nick, reason.as_deref().unwrap_or(""))
        }
        ClientEvent::Kicked { target, nick, by, .. } => {
            format!("[{}] {} was kicked by {}", target, nick, by)
        }
        ClientEvent::Renamed { old, new, .. } => format!("*** {} is now {}", old, new),
        ClientEvent::TopicChanged { target, topic, .. } => format!("[{}] topic: {}", target, topic),
        ClientEvent::Focused { target } => format!("=== now talking in {}", target),
        ClientEvent::Info { target, text } => format!("[{}] {}", target, text),
        ClientEvent::Warning { target, text } => format!("[{}] warning: {}", target, text),
        ClientEvent::Error { target, text } => format!("[{}] error: {}", target, text),
        ClientEvent::ChannelListEntry { channel, users, topic } => {
            format!("{:<20} {:>5} {}", channel, users, topic)
        }
        _ => return None,
    };
    Some(line)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let server = args
        .next()
        .unwrap_or_else(|| "irc.libera.chat:6667".to_string());
    let nick = args.next().unwrap_or_else(|| "slirc_demo".to_string());
    let channels: Vec<String> = args.collect();

    let mut config = ClientConfig::new(nick)
        .with_server(server)
        .with_auto_join(channels.clone());
    if let Some(first) = channels.first() {
        config = config.with_focus_after_join(first.clone());
    }

    let (session, mut handle) = Session::new(Client::new(config)?);
    let running = tokio::spawn(session.run());

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut focused = "Status".to_string();
    let mut input_open = true;
    loop {
        tokio::select! {
            event = handle.next_event() => {
                let Some(event) = event else { break };
                if let ClientEvent::Focused { target } = &event {
                    focused = target.clone();
                }
                if let Some(line) = render(&event) {
                    println!("{}", line);
                }
            }
            line = stdin.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    handle.request(Request::Quit(None))?;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_input(&line, &focused) {
                    Some(request) => handle.request(request)?,
                    None => eprintln!("unknown command: {}", line),
                }
            }
        }
    }

    running.await?
}
