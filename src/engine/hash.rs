//! The Transposition Table
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::{Move, Zobrist};
use crate::engine::Score;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Indicates the kind of bound a transposition table score represents.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Exact,
    Upper,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// An entry in the transposition table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HashEntry {
    zobrist: Zobrist,
    depth: u8,
    bound: Bound,
    score: Score,
    best_move: Option<Move>,
}

impl HashEntry {
    pub fn new(
        zobrist: Zobrist,
        depth: u8,
        bound: Bound, score: Score,
        best_move: Option<Move>)
    -> HashEntry {
        HashEntry {
            zobrist,
            depth,
            bound,
            score,
            best_move,
        }
    }

    pub fn zobrist(&self) -> Zobrist {
        self.zobrist
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A transposition table with one entry per slot
///
/// Collisions are resolved by always keeping the newest entry, on the assumption that entries from
/// the current part of the search are the ones most likely to be probed again.
#[derive(Debug)]
pub struct HashTable(Vec<Option<HashEntry>>);

impl HashTable {
    /// The number of entries used by [`HashTable::default`](#method.default)
    pub const DEFAULT_ENTRIES: usize = 1 << 20;

    pub fn new(entries: usize) -> HashTable {
        HashTable(vec![None; entries.max(1)])
    }

    /// Looks up the entry for `zobrist`, if one is stored
    pub fn get(&self, zobrist: Zobrist) -> Option<HashEntry> {
        let index = u64::from(zobrist) as usize % self.0.len();

        match self.0[index] {
            Some(entry) if entry.zobrist == zobrist => Some(entry),
            _ => None,
        }
    }

    /// Stores `entry`, replacing whatever occupied its slot
    pub fn insert(&mut self, entry: HashEntry) {
        let index = u64::from(entry.zobrist) as usize % self.0.len();
        self.0[index] = Some(entry);
    }

    pub fn clear(&mut self) {
        let len = self.0.len();
        self.0.clear();
        self.0.resize(len, None);
    }
}

impl Default for HashTable {
    fn default() -> HashTable {
        HashTable::new(Self::DEFAULT_ENTRIES)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn store_and_probe() {
        let mut table = HashTable::new(1024);
        let zobrist = Zobrist::from(0x1234_5678_9abc_def0);
        let mv = "h2e2".parse().ok();

        assert_eq!(table.get(zobrist), None);

        let entry = HashEntry::new(zobrist, 5, Bound::Exact, Score::from(42), mv);
        table.insert(entry);
        assert_eq!(table.get(zobrist), Some(entry));

        // a different hash mapping to the same slot misses, then evicts
        let other = Zobrist::from(u64::from(zobrist) + 1024);
        assert_eq!(table.get(other), None);

        table.insert(HashEntry::new(other, 1, Bound::Lower, Score::from(-7), None));
        assert_eq!(table.get(zobrist), None);
        assert_eq!(table.get(other).map(|entry| entry.score()), Some(Score::from(-7)));
    }

    #[test]
    fn clear_empties_the_table() {
        let mut table = HashTable::new(64);
        let zobrist = Zobrist::from(99);
        table.insert(HashEntry::new(zobrist, 3, Bound::Upper, Score::draw(), None));

        table.clear();
        assert_eq!(table.get(zobrist), None);
    }
}
