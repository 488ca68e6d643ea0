//! Faces, face turns, and their notation.

use itertools::Itertools;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The six faces in the order used by move identifiers and facelet strings.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Face {
        Face::ALL[index]
    }

    /// The face on the other side of the cube.
    #[must_use]
    pub const fn opposite(self) -> Face {
        Face::ALL[(self as usize + 3) % 6]
    }

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }

    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Face> {
        match letter {
            'U' => Some(Face::U),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'B' => Some(Face::B),
            _ => None,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One of the 18 face turns. The identifier is `face * 3 + power`, where a
/// power of 0, 1, or 2 means a clockwise quarter turn, a half turn, or a
/// counter-clockwise quarter turn.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct Move(u8);

impl Move {
    pub const COUNT: usize = 18;

    pub const ALL: [Move; Move::COUNT] = {
        let mut arr = [Move(0); Move::COUNT];
        let mut i = 0;
        while i < Move::COUNT {
            arr[i] = Move(i as u8);
            i += 1;
        }
        arr
    };

    /// The moves that keep a cube inside the subgroup reached by phase 1:
    /// any turn of U or D and half turns of the four side faces.
    pub const PHASE2: [Move; 10] = {
        let mut arr = [Move(0); 10];
        let mut i = 0;
        let mut j = 0;
        while i < Move::COUNT {
            if Move(i as u8).is_phase2() {
                arr[j] = Move(i as u8);
                j += 1;
            }
            i += 1;
        }
        arr
    };

    #[must_use]
    pub const fn new(face: Face, power: u8) -> Move {
        assert!(power < 3);
        Move(face as u8 * 3 + power)
    }

    /// # Panics
    ///
    /// If `id` is not a move identifier.
    #[must_use]
    pub const fn from_id(id: usize) -> Move {
        assert!(id < Move::COUNT);
        Move(id as u8)
    }

    #[must_use]
    pub const fn id(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn face(self) -> Face {
        Face::from_index(self.0 as usize / 3)
    }

    /// 0 for a quarter turn, 1 for a half turn, 2 for an inverse quarter turn.
    #[must_use]
    pub const fn power(self) -> u8 {
        self.0 % 3
    }

    #[must_use]
    pub const fn inverse(self) -> Move {
        Move(self.0 - self.power() + (2 - self.power()))
    }

    #[must_use]
    pub const fn is_phase2(self) -> bool {
        matches!(self.face(), Face::U | Face::D) || self.power() == 1
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.power() {
            0 => "",
            1 => "2",
            _ => "'",
        };
        write!(f, "{}{suffix}", self.face())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("Empty move")]
    Empty,
    #[error("Unknown face `{0}` in move `{1}`")]
    UnknownFace(char, String),
    #[error("Unknown suffix in move `{0}`, expected nothing, `2`, or `'`")]
    UnknownSuffix(String),
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(MoveParseError::Empty)?;
        let face =
            Face::from_letter(letter).ok_or_else(|| MoveParseError::UnknownFace(letter, s.to_owned()))?;
        let power = match chars.as_str() {
            "" => 0,
            "2" => 1,
            "'" => 2,
            _ => return Err(MoveParseError::UnknownSuffix(s.to_owned())),
        };
        Ok(Move::new(face, power))
    }
}

/// Parse a whitespace separated move sequence such as `R U2 F'`.
///
/// # Errors
///
/// If any token is not a face turn.
pub fn parse_moves(sequence: &str) -> Result<Vec<Move>, MoveParseError> {
    sequence.split_whitespace().map(str::parse).collect()
}

/// Format a move sequence in the same notation `parse_moves` reads.
#[must_use]
pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().join(" ")
}
