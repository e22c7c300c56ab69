//! Implements Zobrist hashing of positions
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng, rngs::StdRng};
use crate::chess::{Color, Piece, Square};

// The keys are drawn from a fixed-seed generator so that hashes are stable from one run to the
// next, which keeps opening-book entries valid.
const KEY_SEED: u64 = 0x7861_6e67_7169_u64;

lazy_static! {
    static ref KEYS: Keys = Keys::new();
}

struct Keys {
    pieces: [[[u64; Square::COUNT]; Piece::COUNT]; Color::COUNT],
    turn: u64,
}

impl Keys {
    fn new() -> Keys {
        let mut rng = StdRng::seed_from_u64(KEY_SEED);
        let mut pieces = [[[0u64; Square::COUNT]; Piece::COUNT]; Color::COUNT];

        for color in pieces.iter_mut() {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        Keys {
            pieces,
            turn: rng.gen(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The Zobrist hash of a position
///
/// Combines an independently random 64-bit key for each (color, piece, square) triple which is
/// occupied, plus one key toggled whenever `Black` is to move. Keys cancel under XOR, so a hash is
/// maintained incrementally by toggling exactly the keys a move changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Zobrist(u64);

impl Zobrist {
    /// Returns the hash of an empty board with `Red` to move
    pub fn new() -> Zobrist {
        Default::default()
    }

    /// Toggles the placement of `color`'s `piece` on `sq`
    pub fn toggle_piece_placement(&mut self, color: Color, piece: Piece, sq: Square) {
        self.0 ^= KEYS.pieces[color as usize][piece as usize][sq.index()];
    }

    /// Toggles which player is to move
    pub fn toggle_turn(&mut self) {
        self.0 ^= KEYS.turn;
    }
}

impl From<Zobrist> for u64 {
    fn from(zobrist: Zobrist) -> u64 {
        zobrist.0
    }
}

impl From<u64> for Zobrist {
    fn from(val: u64) -> Zobrist {
        Zobrist(val)
    }
}

impl fmt::Display for Zobrist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::convert::TryFrom;
    use super::*;

    #[test]
    fn toggles_cancel() {
        let sq = Square::try_from(40).unwrap();

        let mut zobrist = Zobrist::new();
        zobrist.toggle_piece_placement(Color::Red, Piece::Rook, sq);
        zobrist.toggle_turn();
        assert_ne!(zobrist, Zobrist::new());

        zobrist.toggle_turn();
        zobrist.toggle_piece_placement(Color::Red, Piece::Rook, sq);
        assert_eq!(zobrist, Zobrist::new());
    }

    #[test]
    fn keys_are_stable() {
        let sq = Square::try_from(0).unwrap();

        let mut a = Zobrist::new();
        let mut b = Zobrist::new();
        a.toggle_piece_placement(Color::Black, Piece::King, sq);
        b.toggle_piece_placement(Color::Black, Piece::King, sq);
        assert_eq!(a, b);
        assert_ne!(u64::from(a), 0);
    }
}
