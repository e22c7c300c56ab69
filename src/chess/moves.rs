//! Contains the structure used to represent moves
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use super::{Error, Result, Square};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move from one square to another
///
/// There is nothing more to a move: captures are inferred when the move is applied from whatever
/// occupies the destination, and no promotion exists in this game. A `Move` carries no legality
/// guarantee of its own; moves produced by the generator are pseudo-legal or legal according to
/// which method produced them.
///
/// Moves are written in coordinate notation, origin then destination, as in `h2e2`.
///
/// # Examples
///
/// ```rust
/// use shuai::chess::Move;
///
/// let mv: Move = "h2e2".parse().unwrap();
/// assert_eq!(mv.to_string(), "h2e2");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    /// The origin of the moved piece
    pub orig: Square,
    /// The destination of the moved piece
    pub dest: Square,
}

impl Move {
    /// Creates a move from `orig` to `dest`
    pub fn new(orig: Square, dest: Square) -> Move {
        Move { orig, dest }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.orig, self.dest)
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() == 4 {
            let orig = s[0..2].parse::<Square>()?;
            let dest = s[2..4].parse::<Square>()?;

            Ok(Move::new(orig, dest))
        } else {
            Err(Error::ParseError)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_notation() {
        let mv: Move = "h2e2".parse().unwrap();
        assert_eq!(mv.orig, "h2".parse().unwrap());
        assert_eq!(mv.dest, "e2".parse().unwrap());
        assert_eq!(mv.to_string(), "h2e2");

        assert_eq!("h2e".parse::<Move>(), Err(Error::ParseError));
        assert_eq!("h2ex".parse::<Move>(), Err(Error::ParseError));
        assert_eq!("h2e2+".parse::<Move>(), Err(Error::ParseError));
    }
}
