//! Line-based codec for tokio.
//!
//! This module provides a codec that reads CRLF- or LF-terminated lines as
//! strings without their terminators, and writes commands as CRLF-terminated
//! lines.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::command::Command;
use crate::error::{self, ProtocolError};

/// Maximum accepted line length in bytes, tags included.
pub const MAX_LINE_LEN: usize = 8191;

/// Characters that may never appear inside a line.
pub fn is_illegal_control_char(ch: char) -> bool {
    matches!(ch, '\0' | '\r' | '\n')
}

/// Truncate `line` at its first line ending and reject embedded NULs.
pub fn sanitize(line: &str) -> error::Result<&str> {
    let end = line.find(['\r', '\n']).unwrap_or(line.len());
    let line = &line[..end];
    match line.chars().find(|c| is_illegal_control_char(*c)) {
        Some(ch) => Err(ProtocolError::IllegalControlChar(ch)),
        None => Ok(line),
    }
}

/// Line-based codec that handles newline-terminated messages.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let data = String::from_utf8(line.to_vec())?;
            let data = data.trim_end_matches(['\r', '\n']);
            if let Some(ch) = data.chars().find(|c| is_illegal_control_char(*c)) {
                return Err(ProtocolError::IllegalControlChar(ch));
            }
            Ok(Some(data.to_string()))
        } else {
            // No complete line yet; resume the scan here next time.
            self.next_index = src.len();

            if src.len() > self.max_len {
                return Err(ProtocolError::MessageTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl Encoder<&Command> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, cmd: &Command, dst: &mut BytesMut) -> error::Result<()> {
        let line = cmd.to_string();
        let line = sanitize(&line)?;
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :test\r\n");

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, Some("PING :test".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_partial_then_rest() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"abc\nPONG");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING :abc".to_string()));
        assert_eq!(&buf[..], b"PONG");
    }

    #[test]
    fn test_decode_keeps_formatting_codes() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(":a PRIVMSG #x :\x02bold\x02 \x0304red\r\n");
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert!(line.ends_with("\x0304red"));
    }

    #[test]
    fn test_decode_too_long() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("this is way too long\n");

        let result = codec.decode(&mut buf);
        assert!(matches!(result, Err(ProtocolError::MessageTooLong { .. })));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PING :\xff\r\n"[..]);
        assert!(matches!(codec.decode(&mut buf), Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_encode_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec
            .encode(&Command::PONG("test".into()), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"PONG test\r\n");
    }

    #[test]
    fn test_sanitize_truncates_injection() {
        assert_eq!(sanitize("PRIVMSG #a :hi\r\nQUIT").unwrap(), "PRIVMSG #a :hi");
        assert!(matches!(
            sanitize("PRIVMSG #a :a\0b"),
            Err(ProtocolError::IllegalControlChar('\0'))
        ));
    }
}
