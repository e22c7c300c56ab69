//! Provides a set-of-squares representation of the pieces on the board
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::iter::FusedIterator;
use std::ops;
use std::fmt;
use super::*;

mod attacks;
pub use attacks::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares with each bit representing one square
///
/// A `Bitboard` is a set of [`Square`](../struct.Square.html)s stored in the low 90 bits of a
/// 128-bit integer, one bit per square in the same row-major order as `Square` indices. It
/// implements the bit-wise logic operators `|`, `&`, `^`, `!`, `|=`, `&=` and `^=`, along with the
/// usual set methods such as `insert`, `remove`, `len` and `contains`, and `IntoIterator`. Since
/// it is a plain integer it is `Copy`, so there is no need for borrowing iterators.
///
/// # Examples
///
/// ```rust
/// use std::convert::TryFrom;
/// use shuai::chess::{Bitboard, Square};
///
/// let mut bb = Bitboard::from(Square::try_from(0).unwrap());
/// bb.insert(Square::try_from(89).unwrap());
/// assert_eq!(bb.len(), 2);
/// assert_eq!(bb.pop(), Square::try_from(0).ok());
/// assert_eq!(bb.pop(), Square::try_from(89).ok());
/// assert_eq!(bb.pop(), None);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Bitboard(u128);

/// The bits of a `Bitboard` which correspond to squares
const BOARD_MASK: u128 = (1 << Square::COUNT) - 1;

impl Bitboard {
    /// Creates a new, empty bitboard
    pub fn new() -> Bitboard {
        Default::default()
    }

    /// Returns the number of squares in the bitboard
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the bitboard is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the bitboard contains `sq`
    pub fn contains(self, sq: Square) -> bool {
        !(self & sq.into()).is_empty()
    }

    /// Returns `true` if `self` intersects `other`
    pub fn intersects(self, other: Bitboard) -> bool {
        !(self & other).is_empty()
    }

    /// Returns `true` if `self` does not intersect `other`
    pub fn is_disjoint(self, other: Bitboard) -> bool {
        (self & other).is_empty()
    }

    /// Adds a square to the bitboard if it is not already present
    pub fn insert(&mut self, sq: Square) {
        *self |= sq.into();
    }

    /// Removes a square from the bitboard if it is present
    pub fn remove(&mut self, sq: Square) {
        *self &= !Bitboard::from(sq);
    }

    /// Toggles a square in the bitboard
    pub fn toggle(&mut self, sq: Square) {
        *self ^= sq.into();
    }

    /// Removes the lowest-indexed square from the bitboard and returns it
    pub fn pop(&mut self) -> Option<Square> {
        if self.0 > 0 {
            // get the least significant bit
            let sq: Square = (self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE");
            // clear the least significant bit
            self.0 &= self.0 - 1;

            Some(sq)
        } else {
            None
        }
    }

    /// Returns the square that would be removed by a `pop`
    pub fn peek(self) -> Option<Square> {
        if self.0 > 0 {
            Some((self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Returns the highest-indexed square in the bitboard
    pub fn peek_last(self) -> Option<Square> {
        if self.0 > 0 {
            Some((127 - self.0.leading_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard(1 << sq.index())
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl ops::BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl ops::BitXor for Bitboard {
    type Output = Bitboard;

    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl ops::BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}

impl ops::Not for Bitboard {
    type Output = Bitboard;

    /// Complements the set, restricted to the 90 bits which correspond to squares.
    fn not(self) -> Bitboard {
        Bitboard(!self.0 & BOARD_MASK)
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        Iter(self)
    }
}

/// An iterator over the squares of a `Bitboard`, from the lowest index to the highest
#[derive(Debug, Copy, Clone)]
pub struct Iter(Bitboard);

impl Iterator for Iter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl ExactSizeIterator for Iter { }

impl FusedIterator for Iter { }

impl fmt::Display for Bitboard {
    /// Draws the bitboard as a 10 by 9 grid of `.` and `x` characters, `Black`'s back rank on top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..Rank::COUNT {
            for col in 0..File::COUNT {
                let sq: Square = (row * 9 + col).try_into().expect("INFALLIBLE");
                if self.contains(sq) {
                    write!(f, " x")?;
                } else {
                    write!(f, " .")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::convert::TryFrom;
    use super::*;

    fn sq(index: usize) -> Square {
        Square::try_from(index).expect("valid index")
    }

    #[test]
    fn set_operations() {
        let mut bb = Bitboard::new();
        assert!(bb.is_empty());
        assert_eq!(bb.len(), 0);

        bb.insert(sq(0));
        bb.insert(sq(89));
        bb.insert(sq(45));
        assert_eq!(bb.len(), 3);
        assert!(bb.contains(sq(45)));
        assert!(!bb.contains(sq(44)));

        bb.remove(sq(45));
        assert_eq!(bb.len(), 2);
        assert_eq!(bb.peek(), Some(sq(0)));
        assert_eq!(bb.peek_last(), Some(sq(89)));

        bb.toggle(sq(45));
        assert!(bb.contains(sq(45)));
        bb.toggle(sq(45));
        assert!(!bb.contains(sq(45)));

        assert_eq!(bb.pop(), Some(sq(0)));
        assert_eq!(bb.pop(), Some(sq(89)));
        assert_eq!(bb.pop(), None);
    }

    #[test]
    fn complement_is_bounded() {
        let empty = Bitboard::new();
        let full = !empty;
        assert_eq!(full.len(), Square::COUNT);
        assert_eq!(full.peek_last(), Some(sq(89)));
        assert_eq!(!full, empty);
    }

    #[test]
    fn iteration() {
        let bb = Bitboard::from(sq(3)) | sq(30).into() | sq(77).into();
        let squares: Vec<Square> = bb.into_iter().collect();
        assert_eq!(squares, vec![sq(3), sq(30), sq(77)]);
    }
}
