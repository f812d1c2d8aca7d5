//! Text formatting code handling.
//!
//! Clients render `§` followed by one code character as a colour or style
//! change. This module builds coloured strings and strips codes for logs.

use std::borrow::Cow;

/// The formatting escape character.
pub const ESCAPE: char = '§';

/// Formatting codes understood by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Black (`0`).
    Black,
    /// Dark blue (`1`).
    DarkBlue,
    /// Dark green (`2`).
    DarkGreen,
    /// Dark aqua (`3`).
    DarkAqua,
    /// Dark red (`4`).
    DarkRed,
    /// Dark purple (`5`).
    DarkPurple,
    /// Gold (`6`).
    Gold,
    /// Grey (`7`).
    Grey,
    /// Dark grey (`8`).
    DarkGrey,
    /// Blue (`9`).
    Blue,
    /// Green (`a`).
    Green,
    /// Aqua (`b`).
    Aqua,
    /// Red (`c`).
    Red,
    /// Light purple (`d`).
    LightPurple,
    /// Yellow (`e`).
    Yellow,
    /// White (`f`).
    White,
    /// Obfuscated (`k`).
    Obfuscated,
    /// Bold (`l`).
    Bold,
    /// Italic (`o`).
    Italic,
    /// Reset all formatting (`r`).
    Reset,
}

impl Format {
    /// The code character following [`ESCAPE`].
    pub fn code(self) -> char {
        match self {
            Self::Black => '0',
            Self::DarkBlue => '1',
            Self::DarkGreen => '2',
            Self::DarkAqua => '3',
            Self::DarkRed => '4',
            Self::DarkPurple => '5',
            Self::Gold => '6',
            Self::Grey => '7',
            Self::DarkGrey => '8',
            Self::Blue => '9',
            Self::Green => 'a',
            Self::Aqua => 'b',
            Self::Red => 'c',
            Self::LightPurple => 'd',
            Self::Yellow => 'e',
            Self::White => 'f',
            Self::Obfuscated => 'k',
            Self::Bold => 'l',
            Self::Italic => 'o',
            Self::Reset => 'r',
        }
    }

    /// Wrap `text` in this format, resetting afterwards.
    pub fn apply(self, text: impl AsRef<str>) -> String {
        format!("{ESCAPE}{}{}{ESCAPE}r", self.code(), text.as_ref())
    }
}

/// Colour `text` yellow.
pub fn yellow(text: impl AsRef<str>) -> String {
    Format::Yellow.apply(text)
}

/// Colour `text` red.
pub fn red(text: impl AsRef<str>) -> String {
    Format::Red.apply(text)
}

/// Check if the string contains any formatting codes.
pub fn is_formatted(text: &str) -> bool {
    text.contains(ESCAPE)
}

/// Strip all formatting codes from the string.
///
/// Returns `Cow::Borrowed` if no formatting was present.
pub fn strip_formatting(text: &str) -> Cow<'_, str> {
    if !is_formatted(text) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            chars.next();
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yellow() {
        assert_eq!(yellow("joined"), "§ejoined§r");
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip_formatting("§eAlice has joined§r"), "Alice has joined");
        assert!(matches!(strip_formatting("plain"), Cow::Borrowed("plain")));
        // dangling escape at the end is dropped
        assert_eq!(strip_formatting("x§"), "x");
    }
}
