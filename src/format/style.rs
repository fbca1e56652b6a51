//! Conversion of formatted text into style runs.

use std::fmt;

use super::lexer::{Token, Tokens};
use super::palette;

/// A resolved text color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// An entry of the 99-color palette (index always in range).
    Palette(u8),
    /// An explicit `RRGGBB` color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Map a palette index, rejecting out-of-range values.
    pub fn from_index(index: u8) -> Option<Self> {
        palette::lookup(index).map(|_| Self::Palette(index))
    }

    /// The color as `0xRRGGBB`.
    pub fn rgb(&self) -> u32 {
        match *self {
            Self::Palette(index) => palette::lookup(index).unwrap_or(0),
            Self::Rgb(r, g, b) => u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b),
        }
    }
}

impl fmt::Display for Color {
    /// Formats as a CSS-style `#rrggbb` string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.rgb())
    }
}

/// The visual style shared by every character of a [`StyleRun`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Style {
    /// Whether this is the unstyled default.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&mut self, token: Token<'_>) {
        match token {
            Token::Text(_) => {}
            Token::Bold => self.bold = !self.bold,
            Token::Italic => self.italic = !self.italic,
            Token::Underline => self.underline = !self.underline,
            Token::Reverse => std::mem::swap(&mut self.fg, &mut self.bg),
            Token::Reset => *self = Self::default(),
            Token::Color { fg: None, .. } => {
                self.fg = None;
                self.bg = None;
            }
            Token::Color { fg: Some(fg), bg } => {
                self.fg = Color::from_index(fg);
                if let Some(bg) = bg {
                    self.bg = Color::from_index(bg);
                }
            }
            Token::Hex(Some([r, g, b])) => self.fg = Some(Color::Rgb(r, g, b)),
            Token::Hex(None) => {}
        }
    }
}

/// A maximal span of text sharing one [`Style`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleRun {
    pub style: Style,
    pub text: String,
}

/// Split formatted text into style runs.
///
/// A new run starts whenever the resolved style changes between two pieces
/// of literal text. The result is never empty: text without control
/// characters (including `""`) yields exactly one unstyled run.
pub fn encode(text: &str) -> Vec<StyleRun> {
    let mut runs = Vec::new();
    let mut current = StyleRun::default();

    for token in Tokens::new(text) {
        if let Token::Text(literal) = token {
            current.text.push_str(literal);
            continue;
        }

        let mut next = current.style;
        next.apply(token);
        if next == current.style {
            continue;
        }
        if current.text.is_empty() {
            current.style = next;
        } else {
            runs.push(std::mem::replace(
                &mut current,
                StyleRun {
                    style: next,
                    text: String::new(),
                },
            ));
        }
    }

    if !current.text.is_empty() || runs.is_empty() {
        runs.push(current);
    }
    runs
}
