//! mIRC text formatting.
//!
//! [`encode`] turns formatted text into [`StyleRun`]s for presentation and
//! [`strip`] removes the control sequences. Both share one lexer.
//!
//! # Format codes
//! - 0x02 (^B): Bold
//! - 0x03 (^C): Color, followed by optional `fg[,bg]` palette indices
//! - 0x04: Hex color, followed by `RRGGBB`
//! - 0x0F (^O): Reset all formatting
//! - 0x16 (^V): Reverse
//! - 0x1D (^]): Italic
//! - 0x1F (^_): Underline
//!
//! ```
//! use slirc_client::format::{self, FormattedStringExt};
//!
//! let text = "\x02bold\x02 and \x034red\x03";
//! assert!(text.is_formatted());
//! assert_eq!(format::strip(text), "bold and red");
//! assert_eq!(text.to_style_runs().len(), 3);
//! ```

mod lexer;
pub mod palette;
mod style;

use std::borrow::Cow;

pub use self::lexer::{
    Token, Tokens, BOLD, COLOR, FORMAT_CHARS, HEX_COLOR, ITALIC, RESET, REVERSE, UNDERLINE,
};
pub use self::style::{encode, Color, Style, StyleRun};

/// Remove every recognized control sequence, keeping literal text in order.
pub fn strip(text: &str) -> String {
    Tokens::new(text)
        .filter_map(|token| match token {
            Token::Text(literal) => Some(literal),
            _ => None,
        })
        .collect()
}

/// Extension trait for handling formatted IRC strings.
pub trait FormattedStringExt<'a> {
    /// Check if the string contains any IRC formatting codes.
    fn is_formatted(&self) -> bool;

    /// Strip all IRC formatting codes from the string.
    ///
    /// Returns `Cow::Borrowed` if no formatting was present,
    /// or `Cow::Owned` with the stripped string otherwise.
    fn strip_formatting(self) -> Cow<'a, str>;

    /// Split the string into style runs.
    fn to_style_runs(&self) -> Vec<StyleRun>;
}

impl<'a> FormattedStringExt<'a> for &'a str {
    fn is_formatted(&self) -> bool {
        self.contains(FORMAT_CHARS)
    }

    fn strip_formatting(self) -> Cow<'a, str> {
        if !self.is_formatted() {
            return Cow::Borrowed(self);
        }
        Cow::Owned(strip(self))
    }

    fn to_style_runs(&self) -> Vec<StyleRun> {
        encode(self)
    }
}

impl FormattedStringExt<'static> for String {
    fn is_formatted(&self) -> bool {
        self.as_str().is_formatted()
    }

    fn strip_formatting(self) -> Cow<'static, str> {
        if !self.is_formatted() {
            return Cow::Owned(self);
        }
        Cow::Owned(strip(&self))
    }

    fn to_style_runs(&self) -> Vec<StyleRun> {
        encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_formatted() {
        assert!("\x02bold\x02".is_formatted());
        assert!("\x0304red".is_formatted());
        assert!("\x04ff0000hex".is_formatted());
        assert!(!"plain text".is_formatted());
    }

    #[test]
    fn test_strip_bold() {
        assert_eq!("\x02bold\x02".strip_formatting(), "bold");
    }

    #[test]
    fn test_strip_color() {
        assert_eq!("\x0304red".strip_formatting(), "red");
        assert_eq!("\x0304,02red on blue".strip_formatting(), "red on blue");
        assert_eq!("\x03,".strip_formatting(), ",");
    }

    #[test]
    fn test_strip_hex() {
        assert_eq!(strip("\x04ff8800warm\x0F"), "warm");
        assert_eq!(strip("\x04ff80"), "ff80");
    }

    #[test]
    fn test_strip_unformatted_borrows() {
        let s = "hello";
        assert!(matches!(s.strip_formatting(), Cow::Borrowed("hello")));
    }

    #[test]
    fn test_strip_owned_string() {
        let s = String::from("\x1Ditalic\x1D and \x1Funder\x1F");
        assert_eq!(s.strip_formatting(), "italic and under");
    }

    #[test]
    fn test_strip_is_idempotent_on_digit_tail() {
        // "\x03" + "1" + "\x03" + "2": once stripped nothing is left to eat.
        let once = strip("a\x031\x032b");
        assert_eq!(once, "ab");
        assert_eq!(strip(&once), once);
    }

    #[test]
    fn test_strip_matches_run_text() {
        let text = "x\x02y\x0312,1z\x0Fw";
        let joined: String = encode(text).into_iter().map(|run| run.text).collect();
        assert_eq!(joined, strip(text));
    }
}
