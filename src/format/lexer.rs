//! Single-pass tokenizer for mIRC formatting codes.
//!
//! Both the style encoder and the stripper are built on this lexer, so they
//! always agree on what counts as a control sequence.

/// Toggle bold (`^B`).
pub const BOLD: char = '\x02';
/// Color introducer (`^C`), followed by `fg[,bg]` digits.
pub const COLOR: char = '\x03';
/// Hex color introducer, followed by `RRGGBB`.
pub const HEX_COLOR: char = '\x04';
/// Reset all formatting (`^O`).
pub const RESET: char = '\x0F';
/// Swap foreground and background (`^V`).
pub const REVERSE: char = '\x16';
/// Toggle italic (`^]`).
pub const ITALIC: char = '\x1D';
/// Toggle underline (`^_`).
pub const UNDERLINE: char = '\x1F';

/// Every control character the lexer recognizes.
pub const FORMAT_CHARS: &[char] = &[BOLD, COLOR, HEX_COLOR, RESET, REVERSE, ITALIC, UNDERLINE];

/// A lexical unit of formatted text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text containing no control characters.
    Text(&'a str),
    Bold,
    Italic,
    Underline,
    Reverse,
    Reset,
    /// `^C` with its digits. `fg` is `None` for a bare `^C`.
    Color { fg: Option<u8>, bg: Option<u8> },
    /// `\x04` with its six hex digits, or `None` when they were malformed
    /// (the introducer alone is consumed; what follows stays literal).
    Hex(Option<[u8; 3]>),
}

/// Iterator over the [`Token`]s of a string.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// Consume one or two ASCII digits.
    fn digits(&mut self) -> Option<u8> {
        let bytes = self.rest.as_bytes();
        let len = bytes
            .iter()
            .take(2)
            .take_while(|b| b.is_ascii_digit())
            .count();
        if len == 0 {
            return None;
        }
        let value = bytes[..len]
            .iter()
            .fold(0u8, |acc, b| acc * 10 + (b - b'0'));
        self.rest = &self.rest[len..];
        Some(value)
    }

    fn color(&mut self) -> Token<'a> {
        let Some(fg) = self.digits() else {
            return Token::Color { fg: None, bg: None };
        };
        let bytes = self.rest.as_bytes();
        let bg = if bytes.first() == Some(&b',') && bytes.get(1).map_or(false, u8::is_ascii_digit) {
            self.rest = &self.rest[1..];
            self.digits()
        } else {
            None
        };
        Token::Color { fg: Some(fg), bg }
    }

    fn hex(&mut self) -> Token<'a> {
        let Some(candidate) = self.rest.get(..6) else {
            return Token::Hex(None);
        };
        if !candidate.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Token::Hex(None);
        }
        let channel = |i: usize| u8::from_str_radix(&candidate[i..i + 2], 16).unwrap_or(0);
        let rgb = [channel(0), channel(2), channel(4)];
        self.rest = &self.rest[6..];
        Token::Hex(Some(rgb))
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let first = self.rest.chars().next()?;
        if !FORMAT_CHARS.contains(&first) {
            let end = self.rest.find(FORMAT_CHARS).unwrap_or(self.rest.len());
            let (text, rest) = self.rest.split_at(end);
            self.rest = rest;
            return Some(Token::Text(text));
        }

        // All control characters are single-byte.
        self.rest = &self.rest[1..];
        Some(match first {
            BOLD => Token::Bold,
            ITALIC => Token::Italic,
            UNDERLINE => Token::Underline,
            REVERSE => Token::Reverse,
            RESET => Token::Reset,
            COLOR => self.color(),
            _ => self.hex(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<Token<'_>> {
        Tokens::new(text).collect()
    }

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(lex("hello world"), vec![Token::Text("hello world")]);
        assert!(lex("").is_empty());
    }

    #[test]
    fn test_toggles() {
        assert_eq!(
            lex("\x02b\x1Di\x1Fu\x16\x0F"),
            vec![
                Token::Bold,
                Token::Text("b"),
                Token::Italic,
                Token::Text("i"),
                Token::Underline,
                Token::Text("u"),
                Token::Reverse,
                Token::Reset,
            ]
        );
    }

    #[test]
    fn test_color_digits() {
        assert_eq!(lex("\x034x")[0], Token::Color { fg: Some(4), bg: None });
        assert_eq!(lex("\x0304x")[0], Token::Color { fg: Some(4), bg: None });
        assert_eq!(
            lex("\x0312,05x")[0],
            Token::Color { fg: Some(12), bg: Some(5) }
        );
        // At most two digits are consumed.
        assert_eq!(
            lex("\x03123"),
            vec![Token::Color { fg: Some(12), bg: None }, Token::Text("3")]
        );
    }

    #[test]
    fn test_color_comma_without_digit_stays_literal() {
        assert_eq!(
            lex("\x034,x"),
            vec![Token::Color { fg: Some(4), bg: None }, Token::Text(",x")]
        );
    }

    #[test]
    fn test_bare_color_clears() {
        assert_eq!(
            lex("\x03,5"),
            vec![Token::Color { fg: None, bg: None }, Token::Text(",5")]
        );
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(
            lex("\x04FF8000x"),
            vec![Token::Hex(Some([0xff, 0x80, 0x00])), Token::Text("x")]
        );
    }

    #[test]
    fn test_malformed_hex_left_literal() {
        assert_eq!(
            lex("\x04FF80"),
            vec![Token::Hex(None), Token::Text("FF80")]
        );
        assert_eq!(
            lex("\x04GG0000"),
            vec![Token::Hex(None), Token::Text("GG0000")]
        );
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            lex("héllo\x02wörld"),
            vec![Token::Text("héllo"), Token::Bold, Token::Text("wörld")]
        );
    }
}
