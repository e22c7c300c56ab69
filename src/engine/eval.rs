//! Function to evaluate a position.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::ops;
use std::convert::TryFrom;
use crate::chess::{Color, Piece, File, Rank, Square, Position};
use crate::chess::bitboard::{self, Bitboard};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Score
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(i32);

impl Score {
    /// Returns the greatest possible score
    pub fn infinity() -> Self {
        Score(10_000)
    }
    /// Returns the score for a draw
    pub fn draw() -> Self {
        Score(0)
    }
    /// Returns the score for checkmating in `n` plies
    pub fn mates_in(n: usize) -> Self {
        Score::infinity() - n as i32
    }
    /// Returns the score for being checkmated in `n` plies
    pub fn mated_in(n: usize) -> Self {
        -Score::infinity() + n as i32
    }
    /// Returns `true` if the score is within 100 plies of a forced mate for either player
    pub fn is_mate(self) -> bool {
        self >= Score::mates_in(100) || self <= Score::mated_in(100)
    }
}

impl ops::Neg for Score {
    type Output = Score;

    fn neg(self) -> Self {
        Score(-self.0)
    }
}

impl ops::Add<i32> for Score {
    type Output = Score;

    fn add(self, rhs: i32) -> Self {
        Score(self.0 + rhs)
    }
}

impl ops::Sub<i32> for Score {
    type Output = Score;

    fn sub(self, rhs: i32) -> Self {
        Score(self.0 - rhs)
    }
}

impl From<i32> for Score {
    fn from(val: i32) -> Self {
        Score(val)
    }
}

impl From<Score> for i32 {
    fn from(val: Score) -> Self {
        val.0
    }
}

/// Material values, indexed by piece
const MATERIAL: [i32; Piece::COUNT] = [ 10_000, 200, 200, 450, 900, 500, 100 ];

/// Exchange values used for move ordering, indexed by piece
const ORDER_VAL: [i32; Piece::COUNT] = [ 0, 100, 100, 450, 900, 500, 100 ];

/// The combined material, guards through cannons, of a freshly set up game
const PHASE_MATERIAL: f64 = 4500.0;

const MOBILITY_ROOK: i32 = 1;
const MOBILITY_HORSE: i32 = 3;
const MOBILITY_CANNON: i32 = 1;
const BOTTOM_CANNON: i32 = 80;
const PALACE_HORSE: i32 = 70;
const MISSING_GUARD: i32 = 50;
const PALACE_ATTACK: i32 = 15;

// Piece-square tables from Red's point of view, the opponent's back rank first. A red piece on
// row `r`, column `c` of the board reads entry [9 - r][8 - c]; a black piece reads [r][c].
type PieceSquareTable = [[i32; File::COUNT]; Rank::COUNT];

const KING_TABLE: PieceSquareTable = [
    [   0,   0,   0,   8,   8,   8,   0,   0,   0 ],
    [   0,   0,   0,   8,   8,   8,   0,   0,   0 ],
    [   0,   0,   0,   6,   6,   6,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   6,   6,   6,   0,   0,   0 ],
    [   0,   0,   0,   8,   8,   8,   0,   0,   0 ],
    [   0,   0,   0,   8,   8,   8,   0,   0,   0 ],
];

const GUARD_TABLE: PieceSquareTable = [
    [   0,   0,   0,  20,   0,  20,   0,   0,   0 ],
    [   0,   0,   0,   0,  23,   0,   0,   0,   0 ],
    [   0,   0,   0,  20,   0,  20,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,  20,   0,  20,   0,   0,   0 ],
    [   0,   0,   0,   0,  23,   0,   0,   0,   0 ],
    [   0,   0,   0,  20,   0,  20,   0,   0,   0 ],
];

const BISHOP_TABLE: PieceSquareTable = [
    [   0,   0,  20,   0,   0,   0,  20,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,  23,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,  20,   0,   0,   0,  20,   0,   0 ],
    [   0,   0,  20,   0,   0,   0,  20,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,  23,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,  20,   0,   0,   0,  20,   0,   0 ],
];

const HORSE_TABLE: PieceSquareTable = [
    [  90,  90,  90,  96,  90,  96,  90,  90,  90 ],
    [  90,  96, 103,  97,  94,  97, 103,  96,  90 ],
    [  92,  98,  99, 103,  99, 103,  99,  98,  92 ],
    [  93, 108, 100, 107, 100, 107, 100, 108,  93 ],
    [  90, 100,  99, 103, 104, 103,  99, 100,  90 ],
    [  90,  98, 101, 102, 103, 102, 101,  98,  90 ],
    [  92,  94,  98,  95,  98,  95,  98,  94,  92 ],
    [  93,  92,  94,  95,  92,  95,  94,  92,  93 ],
    [  85,  90,  92,  93,  78,  93,  92,  90,  85 ],
    [  88,  85,  90,  88,  90,  88,  90,  85,  88 ],
];

const ROOK_TABLE: PieceSquareTable = [
    [ 206, 208, 207, 213, 214, 213, 207, 208, 206 ],
    [ 206, 212, 209, 216, 233, 216, 209, 212, 206 ],
    [ 206, 208, 207, 214, 216, 214, 207, 208, 206 ],
    [ 206, 213, 213, 216, 216, 216, 213, 213, 206 ],
    [ 208, 211, 211, 214, 215, 214, 211, 211, 208 ],
    [ 208, 212, 212, 214, 215, 214, 212, 212, 208 ],
    [ 204, 209, 204, 212, 214, 212, 204, 209, 204 ],
    [ 198, 208, 204, 212, 212, 212, 204, 208, 198 ],
    [ 200, 208, 206, 212, 200, 212, 206, 208, 200 ],
    [ 194, 206, 204, 212, 200, 212, 204, 206, 194 ],
];

const CANNON_TABLE: PieceSquareTable = [
    [ 100, 100,  96,  91,  90,  91,  96, 100, 100 ],
    [  98,  98,  96,  92,  89,  92,  96,  98,  98 ],
    [  97,  97,  96,  91,  92,  91,  96,  97,  97 ],
    [  96,  99,  99,  98, 100,  98,  99,  99,  96 ],
    [  96,  96,  96,  96, 100,  96,  96,  96,  96 ],
    [  95,  96,  99,  96, 100,  96,  99,  96,  95 ],
    [  96,  96,  96,  96,  96,  96,  96,  96,  96 ],
    [  97,  96, 100,  99, 101,  99, 100,  96,  97 ],
    [  96,  97,  98,  98,  98,  98,  98,  97,  96 ],
    [  96,  96,  97,  99,  99,  99,  97,  96,  96 ],
];

const PAWN_MID_TABLE: PieceSquareTable = [
    [   9,   9,   9,  11,  13,  11,   9,   9,   9 ],
    [  19,  24,  34,  42,  44,  42,  34,  24,  19 ],
    [  19,  24,  32,  37,  37,  37,  32,  24,  19 ],
    [  19,  23,  27,  29,  30,  29,  27,  23,  19 ],
    [  14,  18,  20,  27,  29,  27,  20,  18,  14 ],
    [   7,   0,  13,   0,  16,   0,  13,   0,   7 ],
    [   7,   0,   7,   0,  15,   0,   7,   0,   7 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
];

const PAWN_END_TABLE: PieceSquareTable = [
    [  20,  20,  20,  25,  30,  25,  20,  20,  20 ],
    [  40,  50,  60,  70,  75,  70,  60,  50,  40 ],
    [  40,  50,  60,  65,  70,  65,  60,  50,  40 ],
    [  40,  50,  55,  60,  60,  60,  55,  50,  40 ],
    [  30,  40,  45,  50,  50,  50,  45,  40,  30 ],
    [  15,  20,  25,  30,  30,  30,  25,  20,  15 ],
    [  10,  15,  20,  20,  20,  20,  20,  15,  10 ],
    [   5,   5,   5,   5,   5,   5,   5,   5,   5 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
    [   0,   0,   0,   0,   0,   0,   0,   0,   0 ],
];

const MID_TABLES: [&PieceSquareTable; Piece::COUNT] = [
    &KING_TABLE, &GUARD_TABLE, &BISHOP_TABLE, &HORSE_TABLE,
    &ROOK_TABLE, &CANNON_TABLE, &PAWN_MID_TABLE,
];

/// Returns the exchange value of a piece, used to order captures
pub fn piece_val(piece: Piece) -> i32 {
    ORDER_VAL[piece as usize]
}

/// Returns the estimated static score for the current search position
///
/// The score combines material, tapered piece-square tables, rook, horse and cannon mobility, a
/// few positional patterns, and penalties for a thin guard shelter, and is given from the point of
/// view of the player whose turn it is. Only the pawn table distinguishes the middle game from the
/// endgame; the taper follows the major material remaining on the board.
pub fn evaluate(pos: &Position) -> Score {
    let phase = game_phase(pos);
    let mut val = 0;

    for &color in &[Color::Red, Color::Black] {
        let sign = if color == Color::Red { 1 } else { -1 };

        for index in 0..Piece::COUNT {
            let piece = Piece::try_from(index).expect("INFALLIBLE");
            for sq in pos.occupied_by_piece(color, piece) {
                val += sign * (MATERIAL[index] + piece_square_val(color, piece, sq, phase));
            }
        }

        val += sign * mobility(pos, color);
        val += sign * patterns(pos, color);
        val -= sign * MISSING_GUARD * missing_guards(pos, color);
        val += sign * palace_pressure(pos, color);
    }

    match pos.turn() {
        Color::Red => val.into(),
        Color::Black => (-val).into(),
    }
}

/// Returns the fraction of major material still on the board, from 1.0 down to 0.0
fn game_phase(pos: &Position) -> f64 {
    let mut material = 0;

    for &color in &[Color::Red, Color::Black] {
        for &piece in &[Piece::Guard, Piece::Bishop, Piece::Horse, Piece::Rook, Piece::Cannon] {
            material += pos.occupied_by_piece(color, piece).len() as i32
                * MATERIAL[piece as usize];
        }
    }

    (f64::from(material) / PHASE_MATERIAL).min(1.0)
}

fn piece_square_val(color: Color, piece: Piece, sq: Square, phase: f64) -> i32 {
    let (row, col) = (sq.index() / 9, sq.index() % 9);
    let (row, col) = match color {
        Color::Red => (9 - row, 8 - col),
        Color::Black => (row, col),
    };

    let mid = MID_TABLES[piece as usize][row][col];
    let end = match piece {
        Piece::Pawn => PAWN_END_TABLE[row][col],
        _ => mid,
    };

    (f64::from(mid) * phase + f64::from(end) * (1.0 - phase)) as i32
}

fn mobility(pos: &Position, color: Color) -> i32 {
    let occupied = pos.occupied();
    let not_own = !pos.occupied_by(color);
    let mut val = 0;

    for sq in pos.occupied_by_piece(color, Piece::Rook) {
        val += MOBILITY_ROOK * (bitboard::rook_attacks(sq, occupied) & not_own).len() as i32;
    }
    for sq in pos.occupied_by_piece(color, Piece::Horse) {
        for dest in bitboard::horse_attacks(sq) & not_own {
            if !occupied.contains(bitboard::horse_leg(sq, dest)) {
                val += MOBILITY_HORSE;
            }
        }
    }
    for sq in pos.occupied_by_piece(color, Piece::Cannon) {
        val += MOBILITY_CANNON * (bitboard::cannon_attacks(sq, occupied) & not_own).len() as i32;
    }

    val
}

fn patterns(pos: &Position, color: Color) -> i32 {
    let mut val = 0;

    // a cannon on the opponent's back rank pins the guards against the king
    if pos.occupied_by_piece(color, Piece::Cannon).intersects(back_rank(!color)) {
        val += BOTTOM_CANNON;
    }
    // a horse on the opponent's palace center square
    let palace_center = match color {
        Color::Red => Square::try_from(4).expect("INFALLIBLE"),
        Color::Black => Square::try_from(85).expect("INFALLIBLE"),
    };
    if pos.occupied_by_piece(color, Piece::Horse).contains(palace_center) {
        val += PALACE_HORSE;
    }

    val
}

fn missing_guards(pos: &Position, color: Color) -> i32 {
    2 - (pos.occupied_by_piece(color, Piece::Guard).len() as i32).min(2)
}

/// Scores attacks against an opposing palace whose guard shelter is already thin
fn palace_pressure(pos: &Position, color: Color) -> i32 {
    let missing = missing_guards(pos, !color);
    if missing == 0 {
        return 0;
    }

    let attacked = bitboard::palace(!color).into_iter()
        .filter(|&sq| pos.square_attacked_by(sq, color))
        .count() as i32;

    attacked * missing * PALACE_ATTACK
}

fn back_rank(color: Color) -> Bitboard {
    let mut bb = Bitboard::new();
    let base = match color {
        Color::Black => 0,
        Color::Red => 81,
    };

    for index in base..base + File::COUNT {
        bb.insert(Square::try_from(index).expect("INFALLIBLE"));
    }

    bb
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod eval_test {
    use std::str::FromStr;
    use crate::chess::Position;
    use super::{Score, evaluate, piece_val};
    use crate::chess::Piece;

    fn eval(fen: &str) -> Score {
        evaluate(&Position::from_str(fen).unwrap())
    }

    #[test]
    fn symmetric_positions_are_balanced() {
        assert_eq!(eval(crate::chess::position::START_FEN), Score::draw());
        assert_eq!(
            eval("rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR b - - 0 1"),
            Score::draw()
        );
        assert_eq!(eval("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1"), Score::draw());
    }

    #[test]
    fn evaluation_flips_with_the_turn() {
        let red = eval("3k5/9/9/9/9/9/9/9/9/3K1R3 w - - 0 1");
        let black = eval("3k5/9/9/9/9/9/9/9/9/3K1R3 b - - 0 1");
        assert_eq!(red, -black);
        assert!(red > Score::draw());
    }

    #[test]
    fn extra_material_counts() {
        // an extra rook, plus its table bonus and mobility, dominates any other terms
        let up_a_rook = eval("3k5/9/9/9/9/9/9/9/9/3K1R3 w - - 0 1");
        assert!(up_a_rook > Score::from(900));
        assert!(up_a_rook < Score::from(1500));
    }

    #[test]
    fn missing_guards_are_penalized() {
        let sheltered = eval("3kaR3/4a4/9/9/9/9/9/9/9/4K4 w - - 0 1");
        let bare = eval("3k1R3/9/9/9/9/9/9/9/9/4K4 w - - 0 1");
        // from Red's point of view the bare king is a better target, even after
        // accounting for the lost guard material
        assert!(bare - i32::from(sheltered) > Score::from(2 * 200));
    }

    #[test]
    fn mate_scores() {
        assert_eq!(Score::mates_in(0), Score::infinity());
        assert_eq!(Score::mated_in(0), -Score::infinity());
        assert!(Score::mates_in(3) < Score::mates_in(2));
        assert!(Score::mates_in(3).is_mate());
        assert!(Score::mated_in(3).is_mate());
        assert!(!Score::from(500).is_mate());
    }

    #[test]
    fn exchange_values() {
        assert!(piece_val(Piece::Rook) > piece_val(Piece::Cannon));
        assert!(piece_val(Piece::Cannon) > piece_val(Piece::Pawn));
        assert_eq!(piece_val(Piece::King), 0);
    }
}
