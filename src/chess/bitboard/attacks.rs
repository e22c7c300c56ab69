//! Precomputed movement geometry for every piece type
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! The tables are built once, on first use, and are independent of any game state. Leaper tables
//! (king, guard, bishop, horse, pawn) give candidate destinations per square; the bishop and horse
//! additionally map each (origin, destination) pair to the single intermediate square that must be
//! empty for the move to be playable. Slider attacks (rook, cannon) are computed on the fly from
//! four directional ray masks and an occupancy bitboard.
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use lazy_static::lazy_static;
use crate::chess::{Color, Square};
use super::Bitboard;

lazy_static! {
    static ref TABLES: Tables = Tables::new();
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// One of the four orthogonal ray directions
///
/// `North` points toward `Black`'s back rank (decreasing square index).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// Toward `Black`'s back rank
    North = 0,
    /// Toward file `i`
    East,
    /// Toward `Red`'s back rank
    South,
    /// Toward file `a`
    West,
}

impl Direction {
    /// All four directions
    pub const ALL: [Direction; 4] = [
        Direction::North, Direction::East, Direction::South, Direction::West,
    ];
}

/// Returns the nearest blocker to the ray's origin, given the blockers on one directional ray.
fn nearest_blocker(dir: Direction, blockers: Bitboard) -> Option<Square> {
    // North and West rays hold squares with indices below the origin's
    match dir {
        Direction::North | Direction::West => blockers.peek_last(),
        Direction::East | Direction::South => blockers.peek(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
struct Tables {
    king: [Bitboard; Square::COUNT],
    guard: [Bitboard; Square::COUNT],
    bishop: [Bitboard; Square::COUNT],
    bishop_eyes: [[u8; Square::COUNT]; Square::COUNT],
    horse: [Bitboard; Square::COUNT],
    horse_legs: [[u8; Square::COUNT]; Square::COUNT],
    pawn: [[Bitboard; Square::COUNT]; Color::COUNT],
    pawn_rev: [[Bitboard; Square::COUNT]; Color::COUNT],
    rays: [[Bitboard; Square::COUNT]; 4],
    half: [Bitboard; Color::COUNT],
    palace: [Bitboard; Color::COUNT],
}

fn valid(r: i32, c: i32) -> bool {
    (0..10).contains(&r) && (0..9).contains(&c)
}

fn square_at(r: i32, c: i32) -> Square {
    Square::try_from((r * 9 + c) as usize).expect("INFALLIBLE")
}

/// `true` if (r, c) is inside either palace
fn in_palace(r: i32, c: i32) -> bool {
    (3..=5).contains(&c) && ((0..=2).contains(&r) || (7..=9).contains(&r))
}

impl Tables {
    fn new() -> Tables {
        let mut tables = Tables {
            king: [Bitboard::new(); Square::COUNT],
            guard: [Bitboard::new(); Square::COUNT],
            bishop: [Bitboard::new(); Square::COUNT],
            bishop_eyes: [[0; Square::COUNT]; Square::COUNT],
            horse: [Bitboard::new(); Square::COUNT],
            horse_legs: [[0; Square::COUNT]; Square::COUNT],
            pawn: [[Bitboard::new(); Square::COUNT]; Color::COUNT],
            pawn_rev: [[Bitboard::new(); Square::COUNT]; Color::COUNT],
            rays: [[Bitboard::new(); Square::COUNT]; 4],
            half: [Bitboard::new(); Color::COUNT],
            palace: [Bitboard::new(); Color::COUNT],
        };

        tables.build_leapers();
        tables.build_pawns();
        tables.build_rays();
        tables.build_zones();

        tables
    }

    fn build_leapers(&mut self) {
        const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
        const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
        const BISHOP: [(i32, i32); 4] = [(2, 2), (2, -2), (-2, 2), (-2, -2)];
        const HORSE: [(i32, i32); 8] = [
            (2, 1), (2, -1), (-2, 1), (-2, -1), (1, 2), (1, -2), (-1, 2), (-1, -2),
        ];

        for r in 0..10 {
            for c in 0..9 {
                let from = square_at(r, c).index();

                // king and guard destinations are restricted to the palaces
                for &(dr, dc) in &ORTHOGONAL {
                    if in_palace(r + dr, c + dc) {
                        self.king[from].insert(square_at(r + dr, c + dc));
                    }
                }
                for &(dr, dc) in &DIAGONAL {
                    if in_palace(r + dr, c + dc) {
                        self.guard[from].insert(square_at(r + dr, c + dc));
                    }
                }

                // each bishop destination pairs with the "eye" midpoint square
                for &(dr, dc) in &BISHOP {
                    if valid(r + dr, c + dc) {
                        let to = square_at(r + dr, c + dc);
                        self.bishop[from].insert(to);
                        self.bishop_eyes[from][to.index()] =
                            square_at(r + dr / 2, c + dc / 2).index() as u8;
                    }
                }

                // each horse destination pairs with the "leg" square one orthogonal
                // step from the origin in the long direction of the L
                for &(dr, dc) in &HORSE {
                    if valid(r + dr, c + dc) {
                        let to = square_at(r + dr, c + dc);
                        self.horse[from].insert(to);
                        let (leg_r, leg_c) = if dr.abs() == 2 {
                            (r + dr / 2, c)
                        } else {
                            (r, c + dc / 2)
                        };
                        self.horse_legs[from][to.index()] = square_at(leg_r, leg_c).index() as u8;
                    }
                }
            }
        }
    }

    fn build_pawns(&mut self) {
        for r in 0..10 {
            for c in 0..9 {
                let from = square_at(r, c).index();

                // Red marches north and gains sideways steps past the river
                if valid(r - 1, c) {
                    self.pawn[Color::Red as usize][from].insert(square_at(r - 1, c));
                }
                if r < 5 {
                    if valid(r, c - 1) {
                        self.pawn[Color::Red as usize][from].insert(square_at(r, c - 1));
                    }
                    if valid(r, c + 1) {
                        self.pawn[Color::Red as usize][from].insert(square_at(r, c + 1));
                    }
                }

                if valid(r + 1, c) {
                    self.pawn[Color::Black as usize][from].insert(square_at(r + 1, c));
                }
                if r > 4 {
                    if valid(r, c - 1) {
                        self.pawn[Color::Black as usize][from].insert(square_at(r, c - 1));
                    }
                    if valid(r, c + 1) {
                        self.pawn[Color::Black as usize][from].insert(square_at(r, c + 1));
                    }
                }
            }
        }

        // exact reverse map: which squares hold a pawn of `color` attacking here
        for color in 0..Color::COUNT {
            for from in 0..Square::COUNT {
                for to in self.pawn[color][from] {
                    let from = Square::try_from(from).expect("INFALLIBLE");
                    self.pawn_rev[color][to.index()].insert(from);
                }
            }
        }
    }

    fn build_rays(&mut self) {
        for r in 0..10 {
            for c in 0..9 {
                let sq = square_at(r, c).index();

                for i in (0..r).rev() {
                    self.rays[Direction::North as usize][sq].insert(square_at(i, c));
                }
                for i in c + 1..9 {
                    self.rays[Direction::East as usize][sq].insert(square_at(r, i));
                }
                for i in r + 1..10 {
                    self.rays[Direction::South as usize][sq].insert(square_at(i, c));
                }
                for i in (0..c).rev() {
                    self.rays[Direction::West as usize][sq].insert(square_at(r, i));
                }
            }
        }
    }

    fn build_zones(&mut self) {
        for r in 0..10 {
            for c in 0..9 {
                let sq = square_at(r, c);
                let color = if r >= 5 { Color::Red } else { Color::Black };
                self.half[color as usize].insert(sq);

                if in_palace(r, c) {
                    let color = if r >= 7 { Color::Red } else { Color::Black };
                    self.palace[color as usize].insert(sq);
                }
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Returns the squares a king on `sq` can step to, restricted to the palaces.
pub fn king_attacks(sq: Square) -> Bitboard {
    TABLES.king[sq.index()]
}

/// Returns the squares a guard on `sq` can step to, restricted to the palaces.
pub fn guard_attacks(sq: Square) -> Bitboard {
    TABLES.guard[sq.index()]
}

/// Returns a bishop's candidate destinations from `sq`, before river and eye filtering.
pub fn bishop_attacks(sq: Square) -> Bitboard {
    TABLES.bishop[sq.index()]
}

/// Returns the midpoint square that must be empty for a bishop to move from `from` to `to`.
///
/// Only meaningful when `to` is in `bishop_attacks(from)`.
pub fn bishop_eye(from: Square, to: Square) -> Square {
    Square::try_from(TABLES.bishop_eyes[from.index()][to.index()] as usize).expect("INFALLIBLE")
}

/// Returns a horse's candidate destinations from `sq`, before leg filtering.
pub fn horse_attacks(sq: Square) -> Bitboard {
    TABLES.horse[sq.index()]
}

/// Returns the leg square that must be empty for a horse to move from `from` to `to`.
///
/// Only meaningful when `to` is in `horse_attacks(from)`.
pub fn horse_leg(from: Square, to: Square) -> Square {
    Square::try_from(TABLES.horse_legs[from.index()][to.index()] as usize).expect("INFALLIBLE")
}

/// Returns the squares a pawn of `color` on `sq` attacks.
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    TABLES.pawn[color as usize][sq.index()]
}

/// Returns the squares from which a pawn of `color` would attack `sq`.
pub fn pawn_attackers(color: Color, sq: Square) -> Bitboard {
    TABLES.pawn_rev[color as usize][sq.index()]
}

/// Returns the ray extending from `sq` in direction `dir`, excluding `sq` itself.
pub fn ray(dir: Direction, sq: Square) -> Bitboard {
    TABLES.rays[dir as usize][sq.index()]
}

/// Returns the half of the board belonging to `color`.
pub fn side_mask(color: Color) -> Bitboard {
    TABLES.half[color as usize]
}

/// Returns the nine palace squares of `color`.
pub fn palace(color: Color) -> Bitboard {
    TABLES.palace[color as usize]
}

/// Returns the squares a rook on `sq` attacks, given the occupied squares.
///
/// Each ray is truncated at, and includes, its first blocker; whether the blocker may actually be
/// captured is decided by the caller.
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::new();

    for &dir in &Direction::ALL {
        let r = ray(dir, sq);
        let blockers = occupied & r;

        if let Some(first) = nearest_blocker(dir, blockers) {
            attacks |= (r ^ ray(dir, first)) | first.into();
        } else {
            attacks |= r;
        }
    }

    attacks
}

/// Returns the squares a cannon on `sq` can move to or capture on, given the occupied squares.
///
/// Quiet destinations run up to, but not including, the first blocker (the screen); the only
/// capture square in a direction is the second blocker beyond the screen, if one exists.
pub fn cannon_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::new();

    for &dir in &Direction::ALL {
        let r = ray(dir, sq);
        let blockers = occupied & r;

        if let Some(screen) = nearest_blocker(dir, blockers) {
            attacks |= (r ^ ray(dir, screen)) ^ screen.into();

            let behind = blockers ^ screen.into();
            if let Some(target) = nearest_blocker(dir, behind) {
                attacks |= target.into();
            }
        } else {
            attacks |= r;
        }
    }

    attacks
}

/// Returns the squares strictly between two squares which share a file.
///
/// Empty if the squares are on different files.
pub fn file_between(a: Square, b: Square) -> Bitboard {
    if a.file() != b.file() {
        return Bitboard::new();
    }

    let (lower, upper) = if a.index() < b.index() { (a, b) } else { (b, a) };
    ray(Direction::South, lower) & ray(Direction::North, upper)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).expect("valid square")
    }

    #[test]
    fn king_and_guard_stay_in_the_palace() {
        assert_eq!(king_attacks(sq("e1")).len(), 4);
        assert_eq!(king_attacks(sq("e0")).len(), 3);
        assert_eq!(king_attacks(sq("d2")).len(), 2);
        assert!(king_attacks(sq("d2")).contains(sq("e2")));
        assert!(!king_attacks(sq("d2")).contains(sq("c2")));
        assert!(king_attacks(sq("a0")).is_empty());

        assert_eq!(guard_attacks(sq("e1")).len(), 4);
        assert_eq!(guard_attacks(sq("d0")).len(), 1);
        assert!(guard_attacks(sq("d0")).contains(sq("e1")));
        assert_eq!(guard_attacks(sq("e8")).len(), 4);
    }

    #[test]
    fn bishop_eyes() {
        let attacks = bishop_attacks(sq("c0"));
        assert_eq!(attacks.len(), 2);
        assert!(attacks.contains(sq("a2")));
        assert!(attacks.contains(sq("e2")));
        assert_eq!(bishop_eye(sq("c0"), sq("a2")), sq("b1"));
        assert_eq!(bishop_eye(sq("c0"), sq("e2")), sq("d1"));
    }

    #[test]
    fn horse_legs() {
        let attacks = horse_attacks(sq("a0"));
        assert_eq!(attacks.len(), 2);
        assert!(attacks.contains(sq("b2")));
        assert!(attacks.contains(sq("c1")));
        assert_eq!(horse_leg(sq("a0"), sq("b2")), sq("a1"));
        assert_eq!(horse_leg(sq("a0"), sq("c1")), sq("b0"));

        assert_eq!(horse_attacks(sq("e5")).len(), 8);
    }

    #[test]
    fn pawns_cross_the_river() {
        // red pawn on its own half: forward only
        let attacks = pawn_attacks(Color::Red, sq("e3"));
        assert_eq!(attacks.len(), 1);
        assert!(attacks.contains(sq("e4")));

        // red pawn across the river: forward and sideways
        let attacks = pawn_attacks(Color::Red, sq("e5"));
        assert_eq!(attacks.len(), 3);
        assert!(attacks.contains(sq("e6")));
        assert!(attacks.contains(sq("d5")));
        assert!(attacks.contains(sq("f5")));

        // red pawn on the last rank: sideways only
        let attacks = pawn_attacks(Color::Red, sq("e9"));
        assert_eq!(attacks.len(), 2);

        // black mirrors red
        let attacks = pawn_attacks(Color::Black, sq("e6"));
        assert_eq!(attacks.len(), 1);
        assert!(attacks.contains(sq("e5")));
        assert_eq!(pawn_attacks(Color::Black, sq("e4")).len(), 3);
    }

    #[test]
    fn pawn_reverse_table_matches_forward_table() {
        use std::convert::TryFrom;

        for color in &[Color::Red, Color::Black] {
            for from in 0..Square::COUNT {
                let from = Square::try_from(from).expect("INFALLIBLE");
                for to in pawn_attacks(*color, from) {
                    assert!(pawn_attackers(*color, to).contains(from),
                        "{} pawn {} -> {} missing from reverse table", color, from, to);
                }
                for to in pawn_attackers(*color, from) {
                    assert!(pawn_attacks(*color, to).contains(from),
                        "{} pawn reverse {} -> {} not a forward attack", color, from, to);
                }
            }
        }
    }

    #[test]
    fn rook_rays_stop_at_blockers() {
        // open board: full rank and file
        assert_eq!(rook_attacks(sq("a0"), Bitboard::new()).len(), 17);

        let occupied = Bitboard::from(sq("a5")) | sq("c0").into();
        let attacks = rook_attacks(sq("a0"), occupied);
        assert!(attacks.contains(sq("a5")));
        assert!(!attacks.contains(sq("a6")));
        assert!(attacks.contains(sq("c0")));
        assert!(!attacks.contains(sq("d0")));
        assert_eq!(attacks.len(), 7);
    }

    #[test]
    fn cannon_jumps_exactly_one_screen() {
        let occupied = Bitboard::from(sq("e3")) | sq("e6").into() | sq("e8").into();
        let attacks = cannon_attacks(sq("e0"), occupied);

        // quiet moves stop short of the screen
        assert!(attacks.contains(sq("e1")));
        assert!(attacks.contains(sq("e2")));
        assert!(!attacks.contains(sq("e3")));
        // capture lands on the second blocker only
        assert!(!attacks.contains(sq("e4")));
        assert!(!attacks.contains(sq("e5")));
        assert!(attacks.contains(sq("e6")));
        assert!(!attacks.contains(sq("e8")));
    }

    #[test]
    fn files_between_kings() {
        let between = file_between(sq("e0"), sq("e9"));
        assert_eq!(between.len(), 8);
        assert!(between.contains(sq("e5")));
        assert!(!between.contains(sq("e0")));
        assert!(!between.contains(sq("e9")));

        assert!(file_between(sq("e0"), sq("d9")).is_empty());
        assert_eq!(file_between(sq("e9"), sq("e0")), between);
    }

    #[test]
    fn zones() {
        assert_eq!(side_mask(Color::Red).len(), 45);
        assert_eq!(side_mask(Color::Black).len(), 45);
        assert!(side_mask(Color::Red).is_disjoint(side_mask(Color::Black)));
        assert!(side_mask(Color::Red).contains(sq("e0")));
        assert!(side_mask(Color::Black).contains(sq("e9")));

        assert_eq!(palace(Color::Red).len(), 9);
        assert!(palace(Color::Red).contains(sq("e1")));
        assert!(!palace(Color::Red).contains(sq("e3")));
        assert!(palace(Color::Black).contains(sq("e8")));
    }
}
