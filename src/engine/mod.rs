//! The engine
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////

use std::cmp::{max, min, Reverse};
use std::time::{Duration, Instant};
use log::debug;
use crate::chess::{Color, Piece, Square, Move, Position};
use crate::book::OpeningBook;

mod eval;
use eval::{evaluate, piece_val};
pub use eval::Score;

mod hash;
use hash::{Bound, HashEntry, HashTable};

/// The depth, in plies, by which a null-move search is shortened
const NULL_MOVE_REDUCTION: usize = 3;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Thinking output
#[derive(Debug, Clone)]
pub struct Thinking {
    score: Score,
    depth: usize,
    time: Duration,
    nodes: u64,
    best_move: Move,
}

impl Thinking {
    /// Returns the estimated score of the best move found.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Returns the search depth that was completed.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the amount of time used for the search.
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Returns the number of nodes searched.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Returns the average number of nodes searched per second.
    pub fn nps(&self) -> u64 {
        self.nodes * 1000 / max(self.time.as_millis() as u64, 1)
    }

    /// Returns the best move found in the search.
    pub fn best_move(&self) -> Move {
        self.best_move
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The engine
///
/// Searches a position with iterative-deepening negamax inside an alpha-beta window, with a
/// quiescence search at the leaves. Beyond the alpha-beta bounds themselves, the search is
/// narrowed by the transposition table, null-move pruning, and late-move reductions, and moves
/// are ordered by table move first, then captures by victim and attacker values, then quiet moves
/// by the history heuristic.
#[derive(Debug)]
pub struct Engine {
    hash_table: HashTable,
    history: [[[i32; Square::COUNT]; Piece::COUNT]; Color::COUNT],
    book: Option<OpeningBook>,
    nodes: u64,
    start_time: Instant,
    time_limit: Option<Duration>,
}

impl Engine {
    /// Creates a new Engine with no opening book.
    pub fn new() -> Self {
        Engine {
            hash_table: HashTable::default(),
            history: [[[0; Square::COUNT]; Piece::COUNT]; Color::COUNT],
            book: None,
            nodes: 0,
            start_time: Instant::now(),
            time_limit: None,
        }
    }

    /// Gives the engine an opening book to consult before searching.
    pub fn set_book(&mut self, book: OpeningBook) {
        self.book = Some(book);
    }

    /// Searches `pos` and returns the best move found, or `None` if there are no legal moves.
    ///
    /// If the position is in the opening book, a book move is played without searching.
    /// Otherwise the search iterates from depth 1 up to `max_depth`, keeping the best move of
    /// the deepest completed iteration. When `time_limit` is given, the elapsed time is checked
    /// before each root move, and on expiry the current iteration is abandoned.
    pub fn search(&mut self, pos: &mut Position, max_depth: usize, time_limit: Option<Duration>)
    -> Option<Thinking> {
        self.start_time = Instant::now();
        self.time_limit = time_limit;
        self.nodes = 0;
        self.hash_table.clear();
        self.history = [[[0; Square::COUNT]; Piece::COUNT]; Color::COUNT];

        if let Some(mv) = self.book_move(pos) {
            debug!("book move {}", mv);
            return Some(Thinking {
                score: Score::draw(),
                depth: 0,
                time: self.start_time.elapsed(),
                nodes: 0,
                best_move: mv,
            });
        }

        let mut best: Option<Thinking> = None;

        for depth in 1..=max_depth {
            let mut moves = pos.legal_moves();
            if moves.is_empty() {
                break;
            }
            self.order_moves(pos, &mut moves, None);

            let mut alpha = -Score::infinity();
            let beta = Score::infinity();
            let mut best_move = None;
            let mut out_of_time = false;

            for &mv in &moves {
                if self.time_to_stop() {
                    out_of_time = true;
                    break;
                }

                let captured = pos.make_move(mv);
                let score = -self.search_tree(pos, depth - 1, -beta, -alpha);
                pos.unmake_move(mv, captured);

                if score > alpha {
                    alpha = score;
                    best_move = Some(mv);
                }
            }

            if out_of_time {
                // the move from the last completed iteration stands
                break;
            }

            if let Some(mv) = best_move {
                debug!("depth {:2}: {} = {}, {} nodes", depth, mv, i32::from(alpha), self.nodes);
                best = Some(Thinking {
                    score: alpha,
                    depth,
                    time: self.start_time.elapsed(),
                    nodes: self.nodes,
                    best_move: mv,
                });

                if alpha.is_mate() {
                    break;
                }
            }
        }

        best
    }

    fn search_tree(&mut self, pos: &mut Position, depth: usize, mut alpha: Score, mut beta: Score)
    -> Score {
        self.nodes += 1;

        if pos.repetition() {
            return Score::draw();
        }

        let mut hash_move = None;
        if let Some(entry) = self.hash_table.get(pos.zobrist()) {
            if entry.depth() as usize >= depth {
                match entry.bound() {
                    Bound::Exact => return entry.score(),
                    Bound::Lower => alpha = max(alpha, entry.score()),
                    Bound::Upper => beta = min(beta, entry.score()),
                }
                if alpha >= beta {
                    return entry.score();
                }
            }
            hash_move = entry.best_move();
        }

        if depth == 0 {
            return self.qsearch(pos, alpha, beta);
        }

        let in_check = pos.in_check(pos.turn());

        // null move: if passing still fails high, an actual move surely would; skipped when in
        // check or when the side to move is down to pieces that could be in zugzwang
        if !in_check && depth >= NULL_MOVE_REDUCTION && self.major_pieces(pos, pos.turn()) > 1 {
            pos.make_null();
            let score = -self.search_tree(pos, depth - NULL_MOVE_REDUCTION, -beta, -beta + 1);
            pos.unmake_null();

            if score >= beta {
                self.hash_table.insert(
                    HashEntry::new(pos.zobrist(), depth as u8, Bound::Lower, beta, None));
                return beta;
            }
        }

        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return if in_check { Score::mated_in(depth) } else { Score::draw() };
        }
        self.order_moves(pos, &mut moves, hash_move);

        let original_alpha = alpha;
        let mut best_score = -Score::infinity();
        let mut best_move = None;

        for (count, &mv) in moves.iter().enumerate() {
            let quiet = pos.piece_at(mv.dest).is_none();
            let reduction = if depth >= 3 && count > 3 && quiet && !in_check { 1 } else { 0 };

            let captured = pos.make_move(mv);
            let mut score = -self.search_tree(pos, depth - 1 - reduction, -beta, -alpha);
            if reduction > 0 && score > alpha {
                // a reduced move which beats alpha gets a full-depth re-search
                score = -self.search_tree(pos, depth - 1, -beta, -alpha);
            }
            pos.unmake_move(mv, captured);

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                if quiet {
                    let (color, piece) = pos.piece_at(mv.orig).expect("INFALLIBLE");
                    self.history[color as usize][piece as usize][mv.dest.index()]
                        += (depth * depth) as i32;
                }
                break;
            }
        }

        let bound = if best_score <= original_alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.hash_table.insert(
            HashEntry::new(pos.zobrist(), depth as u8, bound, best_score, best_move));

        best_score
    }

    fn qsearch(&mut self, pos: &mut Position, mut alpha: Score, beta: Score) -> Score {
        self.nodes += 1;

        let stand_pat = evaluate(pos);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures = pos.capture_moves();
        self.order_moves(pos, &mut captures, None);

        for &mv in &captures {
            let captured = pos.make_move(mv);
            let score = -self.qsearch(pos, -beta, -alpha);
            pos.unmake_move(mv, captured);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    fn order_moves(&self, pos: &Position, moves: &mut Vec<Move>, hash_move: Option<Move>) {
        moves.sort_by_cached_key(|&mv| Reverse(self.move_score(pos, mv, hash_move)));
    }

    fn move_score(&self, pos: &Position, mv: Move, hash_move: Option<Move>) -> i32 {
        if hash_move == Some(mv) {
            return 1_000_000;
        }

        let (color, piece) = match pos.piece_at(mv.orig) {
            Some(occupant) => occupant,
            None => return 0,
        };

        if let Some((_, victim)) = pos.piece_at(mv.dest) {
            1000 * piece_val(victim) - piece_val(piece)
        } else {
            self.history[color as usize][piece as usize][mv.dest.index()]
        }
    }

    fn major_pieces(&self, pos: &Position, color: Color) -> usize {
        pos.occupied_by_piece(color, Piece::Rook).len()
            + pos.occupied_by_piece(color, Piece::Horse).len()
            + pos.occupied_by_piece(color, Piece::Cannon).len()
    }

    fn book_move(&self, pos: &mut Position) -> Option<Move> {
        let book = self.book.as_ref()?;
        let mv = book.lookup(pos.zobrist())?;

        // never trust a book blindly
        if pos.legal_moves().contains(&mv) {
            Some(mv)
        } else {
            None
        }
    }

    fn time_to_stop(&self) -> bool {
        match self.time_limit {
            Some(limit) => self.start_time.elapsed() >= limit,
            None => false,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        fen.parse().expect("valid position")
    }

    #[test]
    fn finds_a_mate_in_one() {
        // Re9 is mate: d8 is covered by the rook on a8, and e8 and e9 face the red king
        let mate_in_one = "3k5/R8/9/9/9/9/9/9/4R4/4K4 w - - 0 1";
        let mut position = pos(mate_in_one);
        let mut engine = Engine::new();

        let thinking = engine.search(&mut position, 4, None).expect("a best move");
        assert_eq!(thinking.best_move(), "e1e9".parse().unwrap());
        assert_eq!(thinking.score(), Score::mates_in(1));

        // the search must leave the position as it found it
        assert_eq!(position, pos(mate_in_one));
    }

    #[test]
    fn no_move_when_mated() {
        let mut position = pos("3kR4/9/3R5/9/9/9/9/9/9/4K4 b - - 0 1");
        let mut engine = Engine::new();
        assert!(engine.search(&mut position, 3, None).is_none());
    }

    #[test]
    fn search_is_deterministic() {
        let mut first = Position::new();
        let mut second = Position::new();

        let a = Engine::new().search(&mut first, 3, None).expect("a best move");
        let b = Engine::new().search(&mut second, 3, None).expect("a best move");

        assert_eq!(a.best_move(), b.best_move());
        assert_eq!(a.score(), b.score());
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn takes_a_hanging_rook() {
        // the black rook on e5 is free to the red rook below it; the kings sit on
        // different files so nothing pins the capture
        let mut position = pos("3k5/9/9/9/4r4/9/9/9/4R4/4K4 w - - 0 1");
        let mut engine = Engine::new();

        let thinking = engine.search(&mut position, 3, None).expect("a best move");
        assert_eq!(thinking.best_move(), "e1e5".parse().unwrap());
    }
}
