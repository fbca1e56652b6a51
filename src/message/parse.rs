//! Nom-based IRC line parser.
//!
//! The grammar is applied leniently: every stage is optional, and input that
//! does not fit degrades to empty fields instead of an error.
//!
//! ```text
//! [@tags] [:origin] <command> [params...] [:trailing]
//! ```

use nom::{
    bytes::complete::{take_till, take_while},
    character::complete::char,
    combinator::opt,
    sequence::preceded,
    IResult,
};

type ParseResult<'a, O> = IResult<&'a str, O>;

/// Parse the tag block (the part after `@` and before the first space).
fn parse_tags(input: &str) -> ParseResult<'_, Option<&str>> {
    opt(preceded(char('@'), take_till(|c: char| c == ' ')))(input)
}

/// Parse the origin (the part after `:` and before the first space).
fn parse_origin(input: &str) -> ParseResult<'_, Option<&str>> {
    opt(preceded(char(':'), take_till(|c: char| c == ' ')))(input)
}

fn skip_spaces(input: &str) -> ParseResult<'_, &str> {
    take_while(|c: char| c == ' ')(input)
}

fn parse_header(input: &str) -> ParseResult<'_, (Option<&str>, Option<&str>)> {
    let (input, tags) = parse_tags(input)?;
    let (input, _) = skip_spaces(input)?;
    let (input, origin) = parse_origin(input)?;
    let (input, _) = skip_spaces(input)?;
    Ok((input, (tags, origin)))
}

/// Split the command and its parameters.
///
/// Tokens are separated by runs of spaces. A token starting with `:` ends
/// tokenization: the rest of the line, spaces included, becomes the final
/// parameter.
fn split_params(input: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }
        match rest.find(' ') {
            Some(end) => {
                params.push(&rest[..end]);
                rest = rest[end..].trim_start_matches(' ');
            }
            None => {
                params.push(rest);
                break;
            }
        }
    }

    params
}

/// Borrowed components of a raw line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct RawParts<'a> {
    /// Raw tag block (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Raw origin (without the leading `:`), if present.
    pub origin: Option<&'a str>,
    /// Command followed by its parameters.
    pub words: Vec<&'a str>,
}

/// Split a line into tags, origin, and words. Never fails.
pub(crate) fn split_line(line: &str) -> RawParts<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    match parse_header(line) {
        Ok((rest, (tags, origin))) => RawParts {
            tags,
            origin,
            words: split_params(rest),
        },
        Err(_) => RawParts::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_command() {
        let parts = split_line("PING");
        assert_eq!(parts.tags, None);
        assert_eq!(parts.origin, None);
        assert_eq!(parts.words, vec!["PING"]);
    }

    #[test]
    fn test_split_full_line() {
        let parts = split_line("@time=x;batch=1 :nick!u@h PRIVMSG #ch :hello there");
        assert_eq!(parts.tags, Some("time=x;batch=1"));
        assert_eq!(parts.origin, Some("nick!u@h"));
        assert_eq!(parts.words, vec!["PRIVMSG", "#ch", "hello there"]);
    }

    #[test]
    fn test_split_collapses_space_runs() {
        let parts = split_line(":srv   MODE   #ch   +nt  ");
        assert_eq!(parts.origin, Some("srv"));
        assert_eq!(parts.words, vec!["MODE", "#ch", "+nt"]);
    }

    #[test]
    fn test_split_tags_only() {
        let parts = split_line("@a=b");
        assert_eq!(parts.tags, Some("a=b"));
        assert!(parts.words.is_empty());
    }

    #[test]
    fn test_split_origin_only() {
        let parts = split_line(":irc.example.net");
        assert_eq!(parts.origin, Some("irc.example.net"));
        assert!(parts.words.is_empty());
    }

    #[test]
    fn test_trailing_keeps_colons_and_spaces() {
        let parts = split_line("PRIVMSG #ch :: a :b  c");
        assert_eq!(parts.words, vec!["PRIVMSG", "#ch", ": a :b  c"]);
    }

    #[test]
    fn test_empty_trailing() {
        let parts = split_line("PRIVMSG #channel :");
        assert_eq!(parts.words, vec!["PRIVMSG", "#channel", ""]);
    }

    #[test]
    fn test_strips_line_terminators() {
        let parts = split_line("PING :server\r\n");
        assert_eq!(parts.words, vec!["PING", "server"]);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(split_line(""), RawParts::default());
    }
}
