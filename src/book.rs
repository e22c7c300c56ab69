//! The opening book
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::fs;
use std::path::Path;
use log::warn;
use rand::seq::SliceRandom;
use crate::chess::{Move, Square, Zobrist};

/// The size of one book record: a position hash followed by an origin and a destination square
const RECORD_SIZE: usize = 10;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A book of prepared opening moves, keyed by position hash
///
/// The book is a flat sequence of 10-byte records, each a little-endian 64-bit Zobrist hash
/// followed by the origin and destination square indices of one playable move. A position may
/// have any number of records; [`lookup`](#method.lookup) picks among them at random.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: Vec<(u64, Move)>,
}

impl OpeningBook {
    /// Loads the book at `path`
    ///
    /// A missing or unreadable file yields an empty book with a logged warning, since an engine
    /// without its book should still play.
    pub fn open<P: AsRef<Path>>(path: P) -> OpeningBook {
        let path = path.as_ref();

        match fs::read(path) {
            Ok(bytes) => {
                let book = OpeningBook::from_bytes(&bytes);
                if bytes.len() % RECORD_SIZE != 0 {
                    warn!("opening book {} has a truncated final record", path.display());
                }
                book
            },
            Err(err) => {
                warn!("cannot read opening book {}: {}", path.display(), err);
                OpeningBook::default()
            },
        }
    }

    /// Decodes a book from its on-disk representation, skipping malformed records
    pub fn from_bytes(bytes: &[u8]) -> OpeningBook {
        let mut entries = Vec::with_capacity(bytes.len() / RECORD_SIZE);

        for record in bytes.chunks_exact(RECORD_SIZE) {
            let mut hash = [0; 8];
            hash.copy_from_slice(&record[..8]);
            let hash = u64::from_le_bytes(hash);

            let orig = Square::try_from(record[8] as usize);
            let dest = Square::try_from(record[9] as usize);
            match (orig, dest) {
                (Ok(orig), Ok(dest)) => entries.push((hash, Move::new(orig, dest))),
                _ => warn!("opening book record for {:#018x} names an invalid square", hash),
            }
        }

        OpeningBook { entries }
    }

    /// Returns the number of records in the book
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the book holds no records
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns one of the book moves for the position hashed by `zobrist`, chosen at random
    pub fn lookup(&self, zobrist: Zobrist) -> Option<Move> {
        let hash = u64::from(zobrist);

        let matches: Vec<Move> = self.entries.iter()
            .filter(|&&(entry_hash, _)| entry_hash == hash)
            .map(|&(_, mv)| mv)
            .collect();

        matches.choose(&mut rand::thread_rng()).copied()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: u64, orig: u8, dest: u8) -> Vec<u8> {
        let mut bytes = hash.to_le_bytes().to_vec();
        bytes.push(orig);
        bytes.push(dest);
        bytes
    }

    #[test]
    fn lookup_finds_only_matching_hashes() {
        let mut bytes = record(0xdead_beef, 67, 58);
        bytes.extend(record(0xdead_beef, 61, 40));
        bytes.extend(record(0xcafe_f00d, 7, 25));

        let book = OpeningBook::from_bytes(&bytes);
        assert_eq!(book.len(), 3);

        let mv = book.lookup(Zobrist::from(0xdead_beef)).expect("a book move");
        assert!(mv == Move::new(
                Square::try_from(67).unwrap(), Square::try_from(58).unwrap())
            || mv == Move::new(
                Square::try_from(61).unwrap(), Square::try_from(40).unwrap()));

        assert_eq!(
            book.lookup(Zobrist::from(0xcafe_f00d)),
            Some(Move::new(Square::try_from(7).unwrap(), Square::try_from(25).unwrap()))
        );
        assert_eq!(book.lookup(Zobrist::from(12345)), None);
    }

    #[test]
    fn malformed_records_are_skipped() {
        // a square index past the end of the board, then a truncated record
        let mut bytes = record(1, 95, 0);
        bytes.extend(&[0, 1, 2]);

        let book = OpeningBook::from_bytes(&bytes);
        assert!(book.is_empty());
        assert_eq!(book.lookup(Zobrist::from(1)), None);
    }

    #[test]
    fn missing_file_yields_an_empty_book() {
        let book = OpeningBook::open("no/such/book.bin");
        assert!(book.is_empty());
    }
}
