//! Move generation and attack detection for `Position`
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::bitboard::*;
use super::*;

impl Position {
    /// Generates all pseudo-legal moves for the player whose turn it is
    ///
    /// Pseudo-legal moves obey each piece's movement rules, including horse-leg and bishop-eye
    /// blocking and cannon screens, but may leave the mover's own king in check.
    pub fn moves(&self) -> Vec<Move> {
        self.moves_into(!self.occupied_by(self.turn))
    }

    /// Generates the pseudo-legal moves which capture an opposing piece
    pub fn capture_moves(&self) -> Vec<Move> {
        self.moves_into(self.occupied_by(!self.turn))
    }

    /// Generates all legal moves for the player whose turn it is
    ///
    /// Each pseudo-legal move is applied, tested with [`in_check`](#method.in_check), and undone,
    /// so moves which leave the mover in check or expose the two kings on an open file are
    /// excluded. An empty result means checkmate or stalemate, both of which are losses for the
    /// player to move.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let color = self.turn;
        let mut moves = self.moves();

        let position = self;
        moves.retain(|&mv| {
            let captured = position.make_move(mv);
            let legal = !position.in_check(color);
            position.unmake_move(mv, captured);

            legal
        });

        moves
    }

    /// Returns `true` if any of `attacker`'s pieces attacks `sq`
    pub fn square_attacked_by(&self, sq: Square, attacker: Color) -> bool {
        let occupied = self.occupied();

        if pawn_attackers(attacker, sq)
            .intersects(self.occupied_by_piece(attacker, Piece::Pawn)) {
            return true;
        }
        if king_attacks(sq).intersects(self.occupied_by_piece(attacker, Piece::King)) {
            return true;
        }
        for orig in horse_attacks(sq) & self.occupied_by_piece(attacker, Piece::Horse) {
            if !occupied.contains(horse_leg(orig, sq)) {
                return true;
            }
        }
        // a bishop never leaves its owner's half, so it can only attack squares there
        if side_mask(attacker).contains(sq) {
            for orig in bishop_attacks(sq) & self.occupied_by_piece(attacker, Piece::Bishop) {
                if !occupied.contains(bishop_eye(orig, sq)) {
                    return true;
                }
            }
        }
        if rook_attacks(sq, occupied).intersects(self.occupied_by_piece(attacker, Piece::Rook)) {
            return true;
        }
        // the only occupied squares in a cannon attack set are its jump targets
        if cannon_attacks(sq, occupied)
            .intersects(self.occupied_by_piece(attacker, Piece::Cannon)) {
            return true;
        }

        false
    }

    /// Returns `true` if `color`'s king is in check
    ///
    /// Besides ordinary attacks on the king's square, this covers the flying-general rule: two
    /// kings may never face each other on a file with nothing between them. A side whose king has
    /// been captured is always considered in check.
    pub fn in_check(&self, color: Color) -> bool {
        let king = match self.king_square(color) {
            Some(king) => king,
            None => return true,
        };

        if self.square_attacked_by(king, !color) {
            return true;
        }

        if let Some(enemy_king) = self.king_square(!color) {
            if king.file() == enemy_king.file()
                && (file_between(king, enemy_king) & self.occupied()).is_empty() {
                return true;
            }
        }

        false
    }

    fn moves_into(&self, allowed: Bitboard) -> Vec<Move> {
        let color = self.turn;
        let mut moves = Vec::with_capacity(64);

        for orig in self.occupied_by(color) {
            let (_, piece) = self.board[orig.index()].expect("INFALLIBLE");

            for dest in self.destinations(color, piece, orig) & allowed {
                moves.push(Move::new(orig, dest));
            }
        }

        moves
    }

    fn destinations(&self, color: Color, piece: Piece, orig: Square) -> Bitboard {
        let occupied = self.occupied();

        match piece {
            Piece::King => king_attacks(orig),
            Piece::Guard => guard_attacks(orig),
            Piece::Bishop => {
                let mut dests = Bitboard::new();
                for dest in bishop_attacks(orig) & side_mask(color) {
                    if !occupied.contains(bishop_eye(orig, dest)) {
                        dests.insert(dest);
                    }
                }
                dests
            },
            Piece::Horse => {
                let mut dests = Bitboard::new();
                for dest in horse_attacks(orig) {
                    if !occupied.contains(horse_leg(orig, dest)) {
                        dests.insert(dest);
                    }
                }
                dests
            },
            Piece::Rook => rook_attacks(orig, occupied),
            Piece::Cannon => cannon_attacks(orig, occupied),
            Piece::Pawn => pawn_attacks(color, orig),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        fen.parse().expect("valid position")
    }

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn start_position_move_count() {
        let mut position = Position::new();
        assert_eq!(position.moves().len(), 44);
        assert_eq!(position.legal_moves().len(), 44);

        // each cannon can hop the opposing cannon and take the horse behind it
        let captures = position.capture_moves();
        assert_eq!(captures.len(), 2);
        assert!(captures.contains(&"b2b9".parse().unwrap()));
        assert!(captures.contains(&"h2h9".parse().unwrap()));
    }

    #[test]
    fn start_position_is_quiet() {
        let position = Position::new();
        assert!(!position.in_check(Color::Red));
        assert!(!position.in_check(Color::Black));
    }

    #[test]
    fn flying_generals() {
        // kings face each other on an open file
        let position = pos("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1");
        assert!(position.in_check(Color::Red));
        assert!(position.in_check(Color::Black));

        // any piece between them blocks the rule
        let position = pos("4k4/9/9/4p4/9/9/9/9/9/4K4 w - - 0 1");
        assert!(!position.in_check(Color::Red));
        assert!(!position.in_check(Color::Black));

        // different files
        let position = pos("3k5/9/9/9/9/9/9/9/9/4K4 w - - 0 1");
        assert!(!position.in_check(Color::Red));
        assert!(!position.in_check(Color::Black));
    }

    #[test]
    fn pinned_against_the_flying_general() {
        // the red rook on e3 is the only piece between the kings, so it may only move
        // along the e file; the king can also step aside
        let mut position = pos("4k4/9/9/9/9/9/4R4/9/9/4K4 w - - 0 1");

        assert_eq!(position.moves().len(), 19);
        let legal = position.legal_moves();
        assert_eq!(legal.len(), 11);
        assert!(legal.iter()
            .filter(|mv| mv.orig == sq("e3"))
            .all(|mv| mv.dest.file() == mv.orig.file()));
        assert!(!legal.contains(&"e3d3".parse().unwrap()));
        assert!(legal.contains(&"e3e8".parse().unwrap()));
        assert!(legal.contains(&"e0d0".parse().unwrap()));
    }

    #[test]
    fn cannon_checks_through_a_screen() {
        // red cannon on e2, black pawn screen on e5, black king on e9
        let position = pos("4k4/9/9/9/4p4/9/9/4C4/9/4K4 b - - 0 1");
        assert!(position.in_check(Color::Black));
        assert!(!position.in_check(Color::Red));

        // without the screen a cannon gives no check along the file, but the kings
        // would fly, so add a second blocker to isolate the cannon
        let position = pos("4k4/9/9/9/4p4/4p4/9/4C4/9/4K4 b - - 0 1");
        assert!(!position.in_check(Color::Black));
    }

    #[test]
    fn pawn_attacks_respect_direction_and_river() {
        // a red pawn before the river attacks only straight ahead
        let position = pos("4k4/9/9/9/9/9/4P4/9/9/4K4 b - - 0 1");
        assert!(position.square_attacked_by(sq("e4"), Color::Red));
        assert!(!position.square_attacked_by(sq("d3"), Color::Red));
        assert!(!position.square_attacked_by(sq("e2"), Color::Red));

        // across the river it also attacks sideways
        let position = pos("4k4/9/9/9/4P4/9/9/9/9/4K4 b - - 0 1");
        assert!(position.square_attacked_by(sq("e6"), Color::Red));
        assert!(position.square_attacked_by(sq("d5"), Color::Red));
        assert!(position.square_attacked_by(sq("f5"), Color::Red));
        assert!(!position.square_attacked_by(sq("e4"), Color::Red));
    }

    #[test]
    fn horse_attacks_are_blocked_at_the_leg() {
        // black horse on e5 attacks d3, but a piece on e4 ties its leg
        let position = pos("4k4/9/9/9/4n4/9/9/9/9/4K4 w - - 0 1");
        assert!(position.square_attacked_by(sq("d3"), Color::Black));

        let position = pos("4k4/9/9/9/4n4/4p4/9/9/9/4K4 w - - 0 1");
        assert!(!position.square_attacked_by(sq("d3"), Color::Black));
    }

    #[test]
    fn capture_moves_are_exactly_the_captures() {
        let mut position = Position::new();
        for mv in [
            "h2e2", "h7e7",
        ].iter().map(|s| s.parse::<Move>().unwrap()) {
            position.make_move(mv);
        }

        let captures = position.capture_moves();
        for &mv in &captures {
            let (color, _) = position.piece_at(mv.dest).expect("capture destination");
            assert_eq!(color, Color::Black);
        }
        // the red cannon on e2 can hop the e3 pawn and take the pawn on e6
        assert!(captures.contains(&"e2e6".parse().unwrap()));
    }

    #[test]
    fn checkmate_has_no_legal_moves() {
        // a bare black king smothered by two rooks
        let mut position = pos("3kR4/9/3R5/9/9/9/9/9/9/4K4 b - - 0 1");
        assert!(position.in_check(Color::Black));
        assert!(position.legal_moves().is_empty());
    }
}
