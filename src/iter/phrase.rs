use std::collections::BTreeMap;

use super::{AndPostingIterator, BoxedIterator, PostingIterator, VectorPostingIterator};
use crate::error::Result;
use crate::kv::Snapshot;
use crate::subdb::{PositionDb, PostingDb};

/// Wraps an And over the per-term posting iterators; on each And candidate,
/// checks that the terms' positions line up according to `offsets` (each
/// term's position relative to the phrase's start) before yielding it.
pub struct PhraseIterator {
    inner: AndPostingIterator,
    /// Per term, a `doc id -> positions` lookup built once at construction.
    positions: Vec<BTreeMap<u64, Vec<u32>>>,
    offsets: Vec<u32>,
    current: u64,
}

impl PhraseIterator {
    /// Builds a phrase iterator for `terms` at `offsets` (same length,
    /// `offsets[0]` is conventionally `0`). Positions for every term are
    /// read from `PositionDB` up front.
    pub fn new(snapshot: &impl Snapshot, terms: &[Vec<u8>], offsets: &[u32]) -> Result<Self> {
        assert_eq!(terms.len(), offsets.len(), "one offset per term");

        let mut term_iterators: Vec<BoxedIterator> = Vec::with_capacity(terms.len());
        let mut positions = Vec::with_capacity(terms.len());
        for term in terms {
            let ids = PostingDb::get(snapshot, term)?;
            term_iterators.push(Box::new(VectorPostingIterator::new(ids)));

            let records = PositionDb::get(snapshot, term)?;
            let map: BTreeMap<u64, Vec<u32>> =
                records.into_iter().map(|r| (r.id, r.positions)).collect();
            positions.push(map);
        }

        Ok(Self {
            inner: AndPostingIterator::new(term_iterators),
            positions,
            offsets: offsets.to_vec(),
            current: 0,
        })
    }

    fn aligns(&self, id: u64) -> bool {
        let Some(base_positions) = self.positions[0].get(&id) else {
            return false;
        };
        for &p0 in base_positions {
            let base = p0 as i64 - self.offsets[0] as i64;
            let all_align = (1..self.positions.len()).all(|i| {
                let target = base + self.offsets[i] as i64;
                target >= 0
                    && self.positions[i]
                        .get(&id)
                        .is_some_and(|ps| ps.binary_search(&(target as u32)).is_ok())
            });
            if all_align {
                return true;
            }
        }
        false
    }

    fn advance_until_match(&mut self, mut candidate: u64) -> u64 {
        while candidate != 0 && !self.aligns(candidate) {
            candidate = self.inner.next();
        }
        self.current = candidate;
        candidate
    }
}

impl PostingIterator for PhraseIterator {
    fn doc_id(&self) -> u64 {
        self.current
    }

    fn next(&mut self) -> u64 {
        let candidate = self.inner.next();
        self.advance_until_match(candidate)
    }

    fn skip_to(&mut self, target: u64) -> u64 {
        let candidate = self.inner.skip_to(target);
        self.advance_until_match(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PositionRecord;
    use crate::kv::btree_store::BTreeKv;
    use crate::kv::KvStore;
    use crate::subdb::{PositionDb, PostingDb};

    #[test]
    fn matches_only_adjacent_occurrences() {
        let kv = BTreeKv::in_memory();
        let mut w = kv.begin_write().unwrap();
        // doc 1: "quick brown" adjacent at (0,1); doc 2: same terms but not adjacent.
        PostingDb::put(&mut w, b"quick", &[1, 2]);
        PostingDb::put(&mut w, b"brown", &[1, 2]);
        PositionDb::put(
            &mut w,
            b"quick",
            &[
                PositionRecord { id: 1, positions: vec![0] },
                PositionRecord { id: 2, positions: vec![0] },
            ],
        );
        PositionDb::put(
            &mut w,
            b"brown",
            &[
                PositionRecord { id: 1, positions: vec![1] },
                PositionRecord { id: 2, positions: vec![5] },
            ],
        );
        w.commit().unwrap();

        let snap = kv.begin_read();
        let terms = vec![b"quick".to_vec(), b"brown".to_vec()];
        let mut it = PhraseIterator::new(&snap, &terms, &[0, 1]).unwrap();
        assert_eq!(it.next(), 1);
        assert_eq!(it.next(), 0);
    }
}
