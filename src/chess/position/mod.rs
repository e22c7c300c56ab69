//! Contains the `Position` structure, which represents a specific board position
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use super::*;

mod movegen;
mod zobrist;
pub use zobrist::Zobrist;

/// The standard starting position in board-layout notation
pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Represents a board position, mutated in place by applying and undoing moves
///
/// A `Position` keeps three redundant views of the same state, which must always agree: one
/// bitboard per (color, piece) pair, one bitboard per color, and a 90-entry mailbox array for O(1)
/// piece lookups by square. It also maintains a Zobrist hash, updated incrementally on every
/// change, and the history of hashes reached since the position was created, used for repetition
/// detection.
///
/// During a search a single `Position` is shared by every frame of the recursion:
/// [`make_move`](#method.make_move) before recursing, [`unmake_move`](#method.unmake_move) on the
/// way back up. The two are exact inverses, including the hash and the history length.
///
/// # Examples
///
/// ```rust
/// use shuai::chess::Position;
///
/// let mut pos = Position::new();
/// let mv = "h2e2".parse().unwrap();
/// let captured = pos.make_move(mv);
/// assert_eq!(captured, None);
/// pos.unmake_move(mv, captured);
/// assert_eq!(pos, Position::new());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    occ_squares: Bitboard,
    occ_by_color: [Bitboard; Color::COUNT],
    occ_by_piece: [[Bitboard; Piece::COUNT]; Color::COUNT],
    board: [Option<(Color, Piece)>; Square::COUNT],
    turn: Color,
    zobrist: Zobrist,
    history: Vec<Zobrist>,
}

impl Position {
    /// Creates the standard starting position
    pub fn new() -> Position {
        START_FEN.parse().expect("INFALLIBLE")
    }

    /// Returns the player whose turn it is
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the position's Zobrist hash
    pub fn zobrist(&self) -> Zobrist {
        self.zobrist
    }

    /// Returns the set of occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.occ_squares
    }

    /// Returns the set of squares occupied by `color`
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occ_by_color[color as usize]
    }

    /// Returns the set of squares occupied by `color`'s pieces of type `piece`
    pub fn occupied_by_piece(&self, color: Color, piece: Piece) -> Bitboard {
        self.occ_by_piece[color as usize][piece as usize]
    }

    /// Returns the piece at `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.board[sq.index()]
    }

    /// Returns the square of `color`'s king, or `None` if the king has been captured
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.occupied_by_piece(color, Piece::King).peek()
    }

    /// Returns the number of plies recorded in the hash history
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Applies a pseudo-legal move and returns the type of the captured piece, if any
    ///
    /// The caller must pass the returned capture back to [`unmake_move`](#method.unmake_move) to
    /// undo the move. If the origin square is empty the position is left untouched and `None` is
    /// returned.
    pub fn make_move(&mut self, mv: Move) -> Option<Piece> {
        let (color, piece) = match self.board[mv.orig.index()] {
            Some(occupant) => occupant,
            None => return None,
        };

        // the capture must be read before the mailbox is overwritten
        let captured = self.board[mv.dest.index()].map(|(_, piece)| piece);
        if let Some(captured) = captured {
            self.occ_by_piece[!color as usize][captured as usize].remove(mv.dest);
            self.occ_by_color[!color as usize].remove(mv.dest);
            self.zobrist.toggle_piece_placement(!color, captured, mv.dest);
        }

        self.board[mv.orig.index()] = None;
        self.board[mv.dest.index()] = Some((color, piece));

        let move_mask = Bitboard::from(mv.orig) | mv.dest.into();
        self.occ_by_piece[color as usize][piece as usize] ^= move_mask;
        self.occ_by_color[color as usize] ^= move_mask;
        self.occ_squares = self.occ_by_color[0] | self.occ_by_color[1];

        self.zobrist.toggle_piece_placement(color, piece, mv.orig);
        self.zobrist.toggle_piece_placement(color, piece, mv.dest);
        self.zobrist.toggle_turn();
        self.turn = !self.turn;
        self.history.push(self.zobrist);

        captured
    }

    /// Undoes a move made by [`make_move`](#method.make_move), given the capture it returned
    ///
    /// Restores bit-identical state: bitboards, mailbox, hash and history length.
    pub fn unmake_move(&mut self, mv: Move, captured: Option<Piece>) {
        self.history.pop();
        self.turn = !self.turn;
        self.zobrist.toggle_turn();

        let (color, piece) = match self.board[mv.dest.index()] {
            Some(occupant) => occupant,
            None => return,
        };

        self.board[mv.orig.index()] = Some((color, piece));
        self.board[mv.dest.index()] = captured.map(|piece| (!color, piece));

        let move_mask = Bitboard::from(mv.orig) | mv.dest.into();
        self.occ_by_piece[color as usize][piece as usize] ^= move_mask;
        self.occ_by_color[color as usize] ^= move_mask;

        self.zobrist.toggle_piece_placement(color, piece, mv.orig);
        self.zobrist.toggle_piece_placement(color, piece, mv.dest);

        if let Some(captured) = captured {
            self.occ_by_piece[!color as usize][captured as usize].insert(mv.dest);
            self.occ_by_color[!color as usize].insert(mv.dest);
            self.zobrist.toggle_piece_placement(!color, captured, mv.dest);
        }

        self.occ_squares = self.occ_by_color[0] | self.occ_by_color[1];
    }

    /// Passes the move: flips the side to move without touching any piece
    ///
    /// Used by null-move pruning. Undo with [`unmake_null`](#method.unmake_null).
    pub fn make_null(&mut self) {
        self.turn = !self.turn;
        self.zobrist.toggle_turn();
        self.history.push(self.zobrist);
    }

    /// Undoes a null move made by [`make_null`](#method.make_null)
    pub fn unmake_null(&mut self) {
        self.history.pop();
        self.zobrist.toggle_turn();
        self.turn = !self.turn;
    }

    /// Returns `true` if the current position is at least the third occurrence of its hash
    ///
    /// Only plies where the same player was to move are examined.
    pub fn repetition(&self) -> bool {
        let current = self.zobrist;

        self.history.iter()
            .rev()
            .skip(2)
            .step_by(2)
            .filter(|&&zobrist| zobrist == current)
            .count() >= 2
    }

    /// Recomputes the Zobrist hash from scratch
    ///
    /// The result must always equal the incrementally maintained hash; used to validate
    /// [`make_move`](#method.make_move) and [`unmake_move`](#method.unmake_move).
    pub fn calc_zobrist(&self) -> Zobrist {
        use std::convert::TryFrom;

        let mut zobrist = Zobrist::new();

        for index in 0..Square::COUNT {
            if let Some((color, piece)) = self.board[index] {
                let sq = Square::try_from(index).expect("INFALLIBLE");
                zobrist.toggle_piece_placement(color, piece, sq);
            }
        }
        if self.turn == Color::Black {
            zobrist.toggle_turn();
        }

        zobrist
    }

    /// Renders the board as a bordered text grid with rank and file labels
    pub fn board_string(&self) -> String {
        use std::convert::TryFrom;

        let mut s = String::new();
        s.push_str("  +-------------------+\n");
        for row in 0..Rank::COUNT {
            s.push_str(&format!("{} |", 9 - row));
            for col in 0..File::COUNT {
                let sq = Square::try_from(row * 9 + col).expect("INFALLIBLE");
                match self.piece_at(sq) {
                    Some((color, piece)) => s.push_str(&format!(" {}", piece.to_char(color))),
                    None => s.push_str(" ."),
                }
            }
            s.push_str(" |\n");
        }
        s.push_str("  +-------------------+\n");
        s.push_str("    a b c d e f g h i\n");

        s
    }

    fn add_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.board[sq.index()] = Some((color, piece));
        self.occ_by_piece[color as usize][piece as usize].insert(sq);
        self.occ_by_color[color as usize].insert(sq);
        self.occ_squares.insert(sq);
        self.zobrist.toggle_piece_placement(color, piece, sq);
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Parses a position from board-layout notation
    ///
    /// Ranks are listed top to bottom (`Black`'s back rank first) separated by `/`, with digits
    /// denoting runs of empty squares and letters denoting pieces, followed by a side-to-move
    /// token. Trailing fields, if present, are ignored. Fails if the grid does not describe
    /// exactly 10 ranks of 9 files, if a letter is not a piece, if either side does not have
    /// exactly one king, or if a king, guard or bishop is outside the zone it can never leave.
    fn from_str(s: &str) -> Result<Self> {
        use std::convert::TryFrom;

        let mut fields = s.split_whitespace();
        let board = fields.next().ok_or(Error::ParseError)?;
        let turn = fields.next().ok_or(Error::ParseError)?.parse::<Color>()?;

        let mut pos = Position {
            occ_squares: Bitboard::new(),
            occ_by_color: [Bitboard::new(); Color::COUNT],
            occ_by_piece: [[Bitboard::new(); Piece::COUNT]; Color::COUNT],
            board: [None; Square::COUNT],
            turn,
            zobrist: Zobrist::new(),
            history: Vec::new(),
        };

        let ranks: Vec<&str> = board.split('/').collect();
        if ranks.len() != Rank::COUNT {
            return Err(Error::ParseError);
        }

        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0;

            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                } else if let Some((color, piece)) = Piece::from_char(c) {
                    if col >= File::COUNT {
                        return Err(Error::ParseError);
                    }
                    let sq = Square::try_from(row * 9 + col).expect("INFALLIBLE");
                    pos.add_piece(color, piece, sq);
                    col += 1;
                } else {
                    return Err(Error::ParseError);
                }
            }

            if col != File::COUNT {
                return Err(Error::ParseError);
            }
        }

        for &color in &[Color::Red, Color::Black] {
            if pos.occupied_by_piece(color, Piece::King).len() != 1 {
                return Err(Error::InvalidKingCount);
            }

            let confined = pos.occupied_by_piece(color, Piece::King)
                | pos.occupied_by_piece(color, Piece::Guard);
            if !confined.is_disjoint(!bitboard::palace(color))
                || !pos.occupied_by_piece(color, Piece::Bishop)
                    .is_disjoint(!bitboard::side_mask(color)) {
                return Err(Error::PieceOutOfZone);
            }
        }

        if pos.turn == Color::Black {
            pos.zobrist.toggle_turn();
        }
        pos.history.push(pos.zobrist);

        Ok(pos)
    }
}

impl fmt::Display for Position {
    /// Writes the position in board-layout notation
    ///
    /// The trailing counter fields are normalized rather than tracked.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::convert::TryFrom;

        for row in 0..Rank::COUNT {
            let mut empty = 0;

            for col in 0..File::COUNT {
                let sq = Square::try_from(row * 9 + col).expect("INFALLIBLE");
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.to_char(color))?;
                    },
                    None => empty += 1,
                }
            }

            if empty > 0 {
                write!(f, "{}", empty)?;
            }
            if row < Rank::COUNT - 1 {
                write!(f, "/")?;
            }
        }

        let turn = match self.turn {
            Color::Red => 'w',
            Color::Black => 'b',
        };
        write!(f, " {} - - 0 1", turn)
    }
}
