//! `PhaseSet`: a multiset of hyper-edge paths through the splice graph,
//! expressed as ordered position lists, carrying multiplicity.

use std::collections::HashMap;

use crate::region::GenomicPosition;

/// Mapping from an ordered sequence of positions (a hyper-edge path) to an
/// integer multiplicity. Combination is additive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseSet {
    pmap: HashMap<Vec<GenomicPosition>, u32>,
}

impl PhaseSet {
    /// Construct an empty phase set.
    pub fn new() -> Self {
        Self {
            pmap: HashMap::new(),
        }
    }

    /// Add `count` occurrences of the position sequence `path`.
    pub fn add(&mut self, path: Vec<GenomicPosition>, count: u32) {
        *self.pmap.entry(path).or_insert(0) += count;
    }

    /// Fold `other`'s entries additively into `self`.
    pub fn combine(&mut self, other: &PhaseSet) {
        for (path, count) in &other.pmap {
            *self.pmap.entry(path.clone()).or_insert(0) += count;
        }
    }

    /// Number of distinct phase paths recorded.
    pub fn len(&self) -> usize {
        self.pmap.len()
    }

    /// True if no phase path has been recorded.
    pub fn is_empty(&self) -> bool {
        self.pmap.is_empty()
    }

    /// Iterate `(path, multiplicity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<GenomicPosition>, &u32)> {
        self.pmap.iter()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.pmap.clear();
    }

    /// Project every recorded path's start/end boundary positions through
    /// canonical-representative maps produced by
    /// [`crate::splice_graph::group_start_boundaries`] /
    /// [`crate::splice_graph::group_end_boundaries`].
    ///
    /// Only the first and last position of each path are boundary
    /// candidates; interior positions are splice junction endpoints and are
    /// left untouched.
    pub fn project_boundaries(
        &mut self,
        smap: &HashMap<GenomicPosition, GenomicPosition>,
        tmap: &HashMap<GenomicPosition, GenomicPosition>,
    ) {
        let old = std::mem::take(&mut self.pmap);
        for (mut path, count) in old {
            if let Some(first) = path.first_mut() {
                if let Some(&rep) = smap.get(first) {
                    *first = rep;
                }
            }
            if path.len() > 1 {
                if let Some(last) = path.last_mut() {
                    if let Some(&rep) = tmap.get(last) {
                        *last = rep;
                    }
                }
            }
            *self.pmap.entry(path).or_insert(0) += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_is_additive_on_multiplicity() {
        let mut a = PhaseSet::new();
        a.add(vec![1, 2, 3], 2);

        let mut b = PhaseSet::new();
        b.add(vec![1, 2, 3], 5);
        b.add(vec![4, 5], 1);

        a.combine(&b);
        assert_eq!(a.len(), 2);
        assert_eq!(*a.pmap.get(&vec![1, 2, 3]).unwrap(), 7);
        assert_eq!(*a.pmap.get(&vec![4, 5]).unwrap(), 1);
    }

    #[test]
    fn project_boundaries_canonicalizes_endpoints_only() {
        let mut ps = PhaseSet::new();
        ps.add(vec![100, 150, 200], 1);

        let mut smap = HashMap::new();
        smap.insert(100, 95);
        let mut tmap = HashMap::new();
        tmap.insert(200, 205);

        ps.project_boundaries(&smap, &tmap);
        assert!(ps.pmap.contains_key(&vec![95, 150, 205]));
    }
}
