//! Core types and rules for the game of Xiangqi
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::mem;
use std::fmt;
use std::str::FromStr;
use std::convert::TryFrom;

pub mod bitboard;
pub mod moves;
pub mod position;
pub mod variations;
mod error;

pub use error::{Error, Result};
pub use bitboard::Bitboard;
pub use moves::Move;
pub use position::Position;
pub use position::Zobrist;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The color of a player or piece
///
/// # Examples
///
/// ```rust
/// use shuai::chess::Color;
///
/// assert_eq!(!Color::Red, Color::Black);
/// assert_eq!(!Color::Black, Color::Red);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    /// The player who moves first, with pieces on ranks 0 through 4
    Red = 0,
    /// The player who moves second, with pieces on ranks 5 through 9
    Black,
}

impl Color {
    /// The number of colors
    pub const COUNT: usize = 2;
}

impl std::ops::Not for Color {
    type Output = Color;

    fn not(self) -> Self::Output {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

impl TryFrom<usize> for Color {
    type Error = Error;

    fn try_from(val: usize) -> Result<Self> {
        if val < Self::COUNT {
            Ok(unsafe { mem::transmute::<u8, Color>(val as u8) })
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => "red",
            Color::Black => "black",
        }.fmt(f)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w" | "r" | "red" => Ok(Color::Red),
            "b" | "black" => Ok(Color::Black),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of a piece, without regard to its color
///
/// Seven types per side. The king and guards never leave the palace, the bishops never cross the
/// river, and the pawns gain sideways movement only after crossing it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Piece {
    /// The king (also called the general), confined to the palace
    King = 0,
    /// A guard (or advisor), confined to the palace diagonals
    Guard,
    /// A bishop (or elephant), moving two diagonal steps on its own half
    Bishop,
    /// A horse, moving one orthogonal then one diagonal step
    Horse,
    /// A rook (or chariot), sliding orthogonally
    Rook,
    /// A cannon, sliding orthogonally but capturing over a screen
    Cannon,
    /// A pawn (or soldier), stepping forward, and sideways once across the river
    Pawn,
}

impl Piece {
    /// The number of piece types
    pub const COUNT: usize = 7;

    /// Returns the piece's letter in board-layout notation, upper case for `Red` and lower case
    /// for `Black`.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            Piece::King => 'k',
            Piece::Guard => 'a',
            Piece::Bishop => 'b',
            Piece::Horse => 'n',
            Piece::Rook => 'r',
            Piece::Cannon => 'c',
            Piece::Pawn => 'p',
        };

        match color {
            Color::Red => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Converts a board-layout letter to a colored piece, if the letter is valid.
    pub fn from_char(c: char) -> Option<(Color, Piece)> {
        let color = if c.is_ascii_uppercase() { Color::Red } else { Color::Black };

        let piece = match c.to_ascii_lowercase() {
            'k' => Piece::King,
            'a' => Piece::Guard,
            'b' => Piece::Bishop,
            'n' => Piece::Horse,
            'r' => Piece::Rook,
            'c' => Piece::Cannon,
            'p' => Piece::Pawn,
            _ => return None,
        };

        Some((color, piece))
    }
}

impl TryFrom<usize> for Piece {
    type Error = Error;

    fn try_from(val: usize) -> Result<Self> {
        if val < Self::COUNT {
            Ok(unsafe { mem::transmute::<u8, Piece>(val as u8) })
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_char(Color::Red).fmt(f)
    }
}

impl FromStr for Piece {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => Piece::from_char(c).map(|(_, piece)| piece).ok_or(Error::ParseError),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A file (column) of the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0, B, C, D, E, F, G, H, I,
}

impl File {
    /// The number of files
    pub const COUNT: usize = 9;
}

impl TryFrom<usize> for File {
    type Error = Error;

    fn try_from(val: usize) -> Result<Self> {
        if val < Self::COUNT {
            Ok(unsafe { mem::transmute::<u8, File>(val as u8) })
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        char::from(b'a' + *self as u8).fmt(f)
    }
}

impl FromStr for File {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(c @ 'a'..='i'), None) => File::try_from((c as u8 - b'a') as usize),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A rank (row) of the board
///
/// Rank 0 is `Red`'s back rank and rank 9 is `Black`'s back rank.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    R0 = 0, R1, R2, R3, R4, R5, R6, R7, R8, R9,
}

impl Rank {
    /// The number of ranks
    pub const COUNT: usize = 10;
}

impl TryFrom<usize> for Rank {
    type Error = Error;

    fn try_from(val: usize) -> Result<Self> {
        if val < Self::COUNT {
            Ok(unsafe { mem::transmute::<u8, Rank>(val as u8) })
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        char::from(b'0' + *self as u8).fmt(f)
    }
}

impl FromStr for Rank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(c @ '0'..='9'), None) => Rank::try_from((c as u8 - b'0') as usize),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A square of the board
///
/// Squares are indexed 0 through 89, row-major from `Black`'s back rank down to `Red`'s, so that
/// index 0 is square `a9` and index 89 is square `i0`.
///
/// # Examples
///
/// ```rust
/// use std::convert::TryFrom;
/// use shuai::chess::{File, Rank, Square};
///
/// let sq = Square::from_coord(File::E, Rank::R0);
/// assert_eq!(sq.to_string(), "e0");
/// assert_eq!(sq, Square::try_from(85).unwrap());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// The number of squares
    pub const COUNT: usize = 90;

    /// Returns the square at the intersection of `file` and `rank`.
    pub fn from_coord(file: File, rank: Rank) -> Square {
        Square((9 - rank as u8) * 9 + file as u8)
    }

    /// Returns the square's index, 0 through 89.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the square's file.
    pub fn file(self) -> File {
        File::try_from(self.0 as usize % 9).expect("INFALLIBLE")
    }

    /// Returns the square's rank.
    pub fn rank(self) -> Rank {
        Rank::try_from(9 - self.0 as usize / 9).expect("INFALLIBLE")
    }
}

impl TryFrom<usize> for Square {
    type Error = Error;

    fn try_from(val: usize) -> Result<Self> {
        if val < Self::COUNT {
            Ok(Square(val as u8))
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() == 2 {
            let file = s[0..1].parse::<File>()?;
            let rank = s[1..2].parse::<Rank>()?;

            Ok(Square::from_coord(file, rank))
        } else {
            Err(Error::ParseError)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::convert::TryFrom;
    use super::*;

    #[test]
    fn colors() {
        assert_eq!(Color::try_from(0), Ok(Color::Red));
        assert_eq!(Color::try_from(1), Ok(Color::Black));
        assert_eq!(Color::try_from(2), Err(Error::TryFromIntError));

        assert_eq!("w".parse(), Ok(Color::Red));
        assert_eq!("b".parse(), Ok(Color::Black));
        assert_eq!("x".parse::<Color>(), Err(Error::ParseError));
    }

    #[test]
    fn pieces() {
        for val in 0..Piece::COUNT {
            let piece = Piece::try_from(val).unwrap();
            assert_eq!(piece as usize, val);

            for &color in &[Color::Red, Color::Black] {
                let c = piece.to_char(color);
                assert_eq!(Piece::from_char(c), Some((color, piece)));
            }
        }
        assert_eq!(Piece::try_from(Piece::COUNT), Err(Error::TryFromIntError));

        assert_eq!(Piece::from_char('K'), Some((Color::Red, Piece::King)));
        assert_eq!(Piece::from_char('n'), Some((Color::Black, Piece::Horse)));
        assert_eq!(Piece::from_char('q'), None);
    }

    #[test]
    fn squares() {
        for index in 0..Square::COUNT {
            let sq = Square::try_from(index).unwrap();
            assert_eq!(sq.index(), index);
            assert_eq!(Square::from_coord(sq.file(), sq.rank()), sq);
            assert_eq!(sq.to_string().parse::<Square>().unwrap(), sq);
        }
        assert_eq!(Square::try_from(Square::COUNT), Err(Error::TryFromIntError));

        assert_eq!(Square::from_coord(File::A, Rank::R9).index(), 0);
        assert_eq!(Square::from_coord(File::I, Rank::R9).index(), 8);
        assert_eq!(Square::from_coord(File::A, Rank::R0).index(), 81);
        assert_eq!(Square::from_coord(File::I, Rank::R0).index(), 89);
        assert_eq!("e0".parse::<Square>().map(Square::index), Ok(85));
        assert_eq!("e9".parse::<Square>().map(Square::index), Ok(4));
        assert_eq!("j5".parse::<Square>(), Err(Error::ParseError));
    }
}
