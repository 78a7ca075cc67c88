use super::{BoxedIterator, PostingIterator};

/// Union over child iterators. At each `next()`, every child currently
/// sitting on the last-returned id is advanced, then the minimum non-zero
/// `doc_id()` across all children is returned. Ties collapse: an id shared
/// by several children surfaces once. Exhausted (`doc_id() == 0`) children
/// are simply skipped, not removed.
pub struct OrPostingIterator {
    children: Vec<BoxedIterator>,
    current: u64,
}

impl OrPostingIterator {
    pub fn new(children: Vec<BoxedIterator>) -> Self {
        Self { children, current: 0 }
    }

    fn min_non_zero(&self) -> u64 {
        self.children
            .iter()
            .map(|c| c.doc_id())
            .filter(|&id| id != 0)
            .min()
            .unwrap_or(0)
    }
}

impl PostingIterator for OrPostingIterator {
    fn doc_id(&self) -> u64 {
        self.current
    }

    fn next(&mut self) -> u64 {
        for child in &mut self.children {
            if child.doc_id() == self.current {
                child.next();
            }
        }
        self.current = self.min_non_zero();
        self.current
    }

    fn skip_to(&mut self, target: u64) -> u64 {
        for child in &mut self.children {
            if child.doc_id() < target {
                child.skip_to(target);
            }
        }
        self.current = self.min_non_zero();
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iter::VectorPostingIterator;

    fn v(ids: &[u64]) -> BoxedIterator {
        Box::new(VectorPostingIterator::new(ids.to_vec()))
    }

    #[test]
    fn merges_three_overlapping_lists_in_ascending_order() {
        let mut it = OrPostingIterator::new(vec![
            v(&[1, 3, 5, 7]),
            v(&[3, 4, 5, 7, 9, 11]),
            v(&[1, 3, 7]),
        ]);
        let mut out = Vec::new();
        loop {
            let id = it.next();
            if id == 0 {
                break;
            }
            out.push(id);
        }
        assert_eq!(out, vec![1, 3, 4, 5, 7, 9, 11]);
    }

    #[test]
    fn empty_child_does_not_disturb_the_merge() {
        let mut it = OrPostingIterator::new(vec![v(&[1, 2]), v(&[])]);
        assert_eq!(it.next(), 1);
        assert_eq!(it.next(), 2);
        assert_eq!(it.next(), 0);
    }

    #[test]
    fn no_children_is_immediately_exhausted() {
        let mut it = OrPostingIterator::new(vec![]);
        assert_eq!(it.next(), 0);
    }
}
