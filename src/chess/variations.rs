//! Module for counting and printing the number of variations from a given position
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::*;

/// Print the number of variations of the given `depth` for each legal move from `pos`
pub fn print(pos: &mut Position, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let mut total = 0;

    for mv in pos.legal_moves() {
        let captured = pos.make_move(mv);
        let count = count(pos, depth - 1);
        total += count;
        println!("\t{:7}\t{:12}\t{}", mv, count, pos);
        pos.unmake_move(mv, captured);
    }

    total
}

/// Count the number of variations of the given `depth` from `pos`
pub fn count(pos: &mut Position, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let mut total = 0;

    for mv in pos.legal_moves() {
        let captured = pos.make_move(mv);
        total += count(pos, depth - 1);
        pos.unmake_move(mv, captured);
    }

    total
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_counts() {
        let mut pos = Position::new();
        assert_eq!(count(&mut pos, 0), 1);
        assert_eq!(count(&mut pos, 1), 44);

        // counting must leave the position untouched
        assert_eq!(pos, Position::new());
    }
}
