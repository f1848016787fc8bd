use std::fmt;

use serde::{Deserialize, Serialize};

/// A single Unicode scalar value as stored in a font's character map.
///
/// Displays as `U+` followed by at least four uppercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codepoint(pub u32);

impl Codepoint {
    pub fn value(self) -> u32 {
        self.0
    }

    /// The codepoint `n` positions after this one, if it is still a
    /// Unicode scalar range value (at most U+10FFFF).
    pub fn offset(self, n: u32) -> Option<Codepoint> {
        self.0
            .checked_add(n)
            .filter(|&value| value <= char::MAX as u32)
            .map(Codepoint)
    }

    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

impl From<char> for Codepoint {
    fn from(c: char) -> Self {
        Codepoint(c as u32)
    }
}

impl From<u32> for Codepoint {
    fn from(value: u32) -> Self {
        Codepoint(value)
    }
}

/// Which way an accidental alters the pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Down => write!(f, "down"),
            Direction::Up => write!(f, "up"),
        }
    }
}

/// The down/up codepoints assigned to one accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodepointPair {
    pub down: Codepoint,
    pub up: Codepoint,
}

impl CodepointPair {
    pub fn new(down: impl Into<Codepoint>, up: impl Into<Codepoint>) -> Self {
        CodepointPair {
            down: down.into(),
            up: up.into(),
        }
    }

    pub fn get(&self, direction: Direction) -> Codepoint {
        match direction {
            Direction::Down => self.down,
            Direction::Up => self.up,
        }
    }

    /// Both codepoints, down first.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Codepoint)> {
        [(Direction::Down, self.down), (Direction::Up, self.up)].into_iter()
    }

    /// True when `up` directly follows `down`.
    pub fn is_adjacent(&self) -> bool {
        self.down.0.checked_add(1) == Some(self.up.0)
    }
}

impl fmt::Display for CodepointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.down, self.up)
    }
}
