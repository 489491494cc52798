//! Union-find with union-by-size, used by [`BundleGroup`](crate::bundle_group::BundleGroup)'s
//! two-round clustering to test and commit capacity-bounded unions in O(1).

/// A union-find forest over `0..n`, tracking component size so capacity
/// limits (`max_group_size`) can be checked in O(1) before a union commits.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    /// Construct `n` singleton components.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Find the representative of `x`'s component, path-compressing along the way.
    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Size of the component containing `x`.
    pub fn size_of(&mut self, x: usize) -> usize {
        let r = self.find(x);
        self.size[r]
    }

    /// True if `a` and `b` are already in the same component.
    pub fn same(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Union the components of `a` and `b` unless either is already at
    /// least `max_size`, attaching the smaller root under the larger
    /// (union-by-size). Returns `true` if a union was performed (or `a`
    /// and `b` were already joined), `false` if the union was refused
    /// because one side had already reached `max_size`.
    pub fn try_union(&mut self, a: usize, b: usize, max_size: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return true;
        }
        if self.size[ra] >= max_size || self.size[rb] >= max_size {
            return false;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        true
    }

    /// Union the components of `a` and `b` unconditionally (no capacity check).
    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }

    /// Number of elements tracked.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True if no elements are tracked.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Group every element by its component representative, in ascending
    /// element order within each group.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut by_root: std::collections::HashMap<usize, Vec<usize>> =
            std::collections::HashMap::new();
        for i in 0..n {
            let r = self.find(i);
            by_root.entry(r).or_default().push(i);
        }
        let mut groups: Vec<Vec<usize>> = by_root.into_values().collect();
        groups.sort_by_key(|g| g[0]);
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_are_disjoint() {
        let mut ds = DisjointSet::new(4);
        assert!(!ds.same(0, 1));
        assert_eq!(ds.groups().len(), 4);
    }

    #[test]
    fn union_merges_components_and_tracks_size() {
        let mut ds = DisjointSet::new(5);
        ds.union(0, 1);
        ds.union(1, 2);
        assert!(ds.same(0, 2));
        assert_eq!(ds.size_of(0), 3);
        assert_eq!(ds.groups().len(), 3);
    }

    #[test]
    fn try_union_allows_union_when_neither_side_at_capacity() {
        let mut ds = DisjointSet::new(4);
        ds.union(0, 1);
        ds.union(2, 3);
        assert_eq!(ds.size_of(0), 2);
        // Neither component's size (2) is >= max_size (3), so the union is
        // allowed even though the combined size (4) exceeds max_size.
        assert!(ds.try_union(0, 2, 3));
        assert!(ds.same(0, 2));
    }

    #[test]
    fn try_union_refuses_when_either_side_at_capacity() {
        let mut ds = DisjointSet::new(4);
        ds.union(0, 1);
        ds.union(2, 3);
        assert_eq!(ds.size_of(0), 2);
        // Both components are already at max_size (2), so the union is refused.
        assert!(!ds.try_union(0, 2, 2));
        assert!(!ds.same(0, 2));
        assert!(ds.try_union(0, 2, 3));
        assert!(ds.same(0, 2));
    }

    #[test]
    fn try_union_idempotent_when_already_joined() {
        let mut ds = DisjointSet::new(3);
        ds.union(0, 1);
        assert!(ds.try_union(0, 1, 1));
    }
}
