//! Keypad mapping: one input character, one calculator action.
//!
//! Mirrors the button grid of the desktop window:
//!
//! ```text
//!  C  %  D  /
//!  7  8  9  *
//!  4  5  6  -
//!  1  2  3  +
//!     0  .  =
//! ```

use crate::calculator::{Calculator, Operator};
use crate::history::HistoryStore;

/// A key that drives the equation state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A digit `0`-`9` or the decimal point.
    Entry(char),
    Operator(Operator),
    Equals,
    Delete,
    Clear,
}

impl Key {
    /// Map a typed character to a key. Letters are case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' | '.' => Some(Self::Entry(c)),
            '=' => Some(Self::Equals),
            'D' | 'd' | '<' => Some(Self::Delete),
            'C' | 'c' => Some(Self::Clear),
            _ => Operator::from_symbol(c).map(Self::Operator),
        }
    }

    /// Feed this key to the calculator.
    pub fn press<S: HistoryStore>(self, calc: &mut Calculator<S>) {
        match self {
            Self::Entry(c) => calc.insert_digit_or_point(&c.to_string()),
            Self::Operator(op) => calc.insert_operator(&op.to_string()),
            Self::Equals => calc.evaluate(),
            Self::Delete => calc.delete_last_character(),
            Self::Clear => calc.clear_all(),
        }
    }
}

/// Press every recognised key in `input`, skipping anything else.
///
/// Returns the characters that were not keys.
pub fn press_all<S: HistoryStore>(calc: &mut Calculator<S>, input: &str) -> Vec<char> {
    let mut ignored = Vec::new();
    for c in input.chars().filter(|c| !c.is_whitespace()) {
        match Key::from_char(c) {
            Some(key) => key.press(calc),
            None => ignored.push(c),
        }
    }
    ignored
}
