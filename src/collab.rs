//! Collaborator interfaces for subsystems this crate calls into but does
//! not implement — the paired-end bridging solver and the splice-graph
//! decomposition kernel. Production implementations live in sibling
//! crates; this crate depends only on the trait boundary.

use crate::config::Config;
use crate::pereads::{BridgePath, PereadCluster};
use crate::phase::PhaseSet;
use crate::splice_graph::SpliceGraph;
use crate::transcript::Transcript;

/// Resolves unbridged paired-end fragments pooled across a cluster's graphs
/// into bridging paths through a combined splice graph.
pub trait BridgeSolver {
    /// Given the cluster's combined splice graph, the pooled fragments, and
    /// the cluster's observed insert-size range, return one [`BridgePath`]
    /// per input fragment, aligned 1-to-1 by index.
    fn solve(
        &self,
        graph: &SpliceGraph,
        clusters: &[PereadCluster],
        insertsize_low: i32,
        insertsize_high: i32,
    ) -> Vec<BridgePath>;

    /// Populate `ps` with phase fragments derived from `clusters` and their
    /// resolved `paths`, aligned 1-to-1 by index.
    fn build_phase_set(&self, clusters: &[PereadCluster], paths: &[BridgePath], ps: &mut PhaseSet);
}

/// A placeholder for the hyper-edge node set the decomposition kernel
/// filters against the splice graph before decomposing it. The core only
/// needs to construct and filter this set; its internal representation is
/// owned by the decomposition kernel crate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HyperSet {
    /// Phase-set paths retained after filtering against the splice graph's
    /// current vertex set.
    pub paths: Vec<Vec<i32>>,
}

impl HyperSet {
    /// Build a hyper-set directly from a phase set's recorded paths.
    pub fn from_phase_set(ps: &PhaseSet) -> Self {
        let mut paths: Vec<Vec<i32>> = Vec::with_capacity(ps.len());
        for (path, count) in ps.iter() {
            for _ in 0..*count {
                paths.push(path.clone());
            }
        }
        Self { paths }
    }

    /// Drop any path containing a position absent from the splice graph's
    /// resolvable set (neither a `lindex` nor `rindex` hit).
    pub fn filter_against(&mut self, resolvable: impl Fn(i32) -> bool) {
        self.paths.retain(|path| path.iter().all(|&p| resolvable(p)));
    }
}

/// Decomposes a refined splice graph plus its hyper-edge constraints into a
/// small set of weighted source-to-sink transcripts.
pub trait Decomposer {
    /// Run decomposition, returning the transcripts found. `cfg` carries the
    /// tunables (e.g. minimum guaranteed edge weight) the decomposition
    /// kernel needs but that this crate does not interpret itself.
    fn decompose(&self, graph: &SpliceGraph, hyper_set: &HyperSet, cfg: &Config) -> Vec<Transcript>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyper_set_from_phase_set_expands_multiplicity() {
        let mut ps = PhaseSet::new();
        ps.add(vec![1, 2, 3], 2);
        let hs = HyperSet::from_phase_set(&ps);
        assert_eq!(hs.paths.len(), 2);
    }

    #[test]
    fn filter_against_drops_unresolvable_paths() {
        let mut hs = HyperSet {
            paths: vec![vec![1, 2], vec![1, 99]],
        };
        hs.filter_against(|p| p != 99);
        assert_eq!(hs.paths, vec![vec![1, 2]]);
    }
}
