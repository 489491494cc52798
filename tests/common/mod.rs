//! Shared fixture builders for integration tests: small synthetic
//! `CombinedGraph` inputs matching the scenarios exercised across
//! `tests/*.rs`.

use aletsch_core::{CombinedGraph, Interval, PhaseSet, WeightedCount};

/// Build a `CombinedGraph` directly from literal regions/junctions/bounds,
/// bypassing `build` for tests that want precise control over the inputs.
pub fn graph_with(
    chrm: &str,
    strand: char,
    regions: &[(i32, i32, f64, u32)],
    junctions: &[(i32, i32, f64, u32)],
    sbounds: &[(i32, f64, u32)],
    tbounds: &[(i32, f64, u32)],
) -> CombinedGraph {
    let mut g = CombinedGraph::new();
    g.chrm = chrm.to_string();
    g.strand = strand;
    g.num_combined = 1;
    g.regions = regions
        .iter()
        .map(|&(l, r, w, c)| (Interval::new(l, r), WeightedCount::new(w, c)))
        .collect();
    g.junctions = junctions
        .iter()
        .map(|&(l, r, w, c)| (Interval::new(l, r), WeightedCount::new(w, c)))
        .collect();
    g.sbounds = sbounds
        .iter()
        .map(|&(p, w, c)| (p, WeightedCount::new(w, c)))
        .collect();
    g.tbounds = tbounds
        .iter()
        .map(|&(p, w, c)| (p, WeightedCount::new(w, c)))
        .collect();
    g.splices = Vec::new();
    g.ps = PhaseSet::new();
    g
}
