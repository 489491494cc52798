//! `SpliceGraph`: a vertex-labeled DAG with a universal source (vertex `0`)
//! and sink (vertex `n+1`), plus the dual `lindex`/`rindex` position
//! indices used to resolve junction endpoints.

use std::collections::HashMap;

use crate::region::{BoundaryKind, GenomicPosition, WeightedCount};

/// Per-vertex payload. Vertex `0` and the sink vertex carry `lpos == rpos`;
/// their position is meaningless except as the continuation-edge anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexInfo {
    /// Region start.
    pub lpos: GenomicPosition,
    /// Region end.
    pub rpos: GenomicPosition,
    /// Accumulated weight.
    pub weight: f64,
    /// Contributing-sample count.
    pub count: u32,
}

impl VertexInfo {
    /// Vertex length, `rpos - lpos`.
    pub fn length(&self) -> i32 {
        self.rpos - self.lpos
    }
}

/// Per-edge payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInfo {
    /// Accumulated weight.
    pub weight: f64,
    /// Contributing-sample count.
    pub count: u32,
}

/// Vertex id. `0` is the universal source; `vertex_count() - 1` is the
/// universal sink.
pub type VertexId = usize;

/// A splice graph: vertices `0..n+1` where `0` is source and `n+1` is sink.
#[derive(Debug, Clone, Default)]
pub struct SpliceGraph {
    vinfo: Vec<VertexInfo>,
    /// Adjacency: `out_edges[s]` maps target vertex -> edge payload.
    out_edges: Vec<HashMap<VertexId, EdgeInfo>>,
    in_edges: Vec<HashMap<VertexId, EdgeInfo>>,
    lindex: HashMap<GenomicPosition, VertexId>,
    rindex: HashMap<GenomicPosition, VertexId>,
}

impl SpliceGraph {
    /// Construct an empty graph (no vertices yet; callers add the source,
    /// one vertex per region, and the sink via [`SpliceGraph::add_vertex`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex, returning its id.
    pub fn add_vertex(&mut self, info: VertexInfo) -> VertexId {
        let id = self.vinfo.len();
        self.vinfo.push(info);
        self.out_edges.push(HashMap::new());
        self.in_edges.push(HashMap::new());
        id
    }

    /// Number of vertices, including source and sink.
    pub fn vertex_count(&self) -> usize {
        self.vinfo.len()
    }

    /// The sink vertex id (`vertex_count() - 1`).
    ///
    /// Panics if no vertices have been added yet.
    pub fn sink(&self) -> VertexId {
        assert!(!self.vinfo.is_empty(), "sink() on an empty graph");
        self.vinfo.len() - 1
    }

    /// Vertex payload.
    pub fn vertex_info(&self, v: VertexId) -> VertexInfo {
        self.vinfo[v]
    }

    /// Overwrite a vertex's weight and count.
    pub fn set_vertex_weight(&mut self, v: VertexId, weight: f64, count: u32) {
        self.vinfo[v].weight = weight;
        self.vinfo[v].count = count;
    }

    /// Overwrite a vertex's full payload.
    pub fn set_vertex_info(&mut self, v: VertexId, info: VertexInfo) {
        self.vinfo[v] = info;
    }

    /// Add (or overwrite) the edge `s -> t`.
    ///
    /// Panics if `s >= t` is violated is not checked here (the caller owns
    /// acyclicity); `s == t` self-loops are rejected since the graph
    /// represents linear genomic continuation.
    pub fn add_edge(&mut self, s: VertexId, t: VertexId, info: EdgeInfo) {
        assert_ne!(s, t, "splice graph edges may not be self-loops");
        self.out_edges[s].insert(t, info);
        self.in_edges[t].insert(s, info);
    }

    /// Overwrite an existing edge's weight and count.
    pub fn set_edge_weight(&mut self, s: VertexId, t: VertexId, weight: f64, count: u32) {
        let info = EdgeInfo { weight, count };
        self.out_edges[s].insert(t, info);
        self.in_edges[t].insert(s, info);
    }

    /// Overwrite an existing edge's payload.
    pub fn set_edge_info(&mut self, s: VertexId, t: VertexId, info: EdgeInfo) {
        self.out_edges[s].insert(t, info);
        self.in_edges[t].insert(s, info);
    }

    /// Remove the edge `s -> t`, if present.
    pub fn remove_edge(&mut self, s: VertexId, t: VertexId) {
        self.out_edges[s].remove(&t);
        self.in_edges[t].remove(&s);
    }

    /// Out-degree of `v`.
    pub fn out_degree(&self, v: VertexId) -> usize {
        self.out_edges[v].len()
    }

    /// In-degree of `v`.
    pub fn in_degree(&self, v: VertexId) -> usize {
        self.in_edges[v].len()
    }

    /// Iterate `(target, edge info)` pairs leaving `v`.
    pub fn out_iter(&self, v: VertexId) -> impl Iterator<Item = (VertexId, EdgeInfo)> + '_ {
        self.out_edges[v].iter().map(|(&t, &info)| (t, info))
    }

    /// Iterate `(source, edge info)` pairs entering `v`.
    pub fn in_iter(&self, v: VertexId) -> impl Iterator<Item = (VertexId, EdgeInfo)> + '_ {
        self.in_edges[v].iter().map(|(&s, &info)| (s, info))
    }

    /// Iterate all internal vertices (excludes source `0` and the sink).
    pub fn internal_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        let sink = self.vertex_count().saturating_sub(1);
        1..sink
    }

    /// Rebuild the `lpos -> vertex` and `rpos -> vertex` indices over
    /// internal vertices. Must be called after all internal vertices are
    /// added and before any lookup through [`SpliceGraph::lindex`] /
    /// [`SpliceGraph::rindex`].
    pub fn build_vertex_index(&mut self) {
        self.lindex.clear();
        self.rindex.clear();
        let sink = self.vertex_count().saturating_sub(1);
        for v in 1..sink {
            let info = self.vinfo[v];
            self.lindex.insert(info.lpos, v);
            self.rindex.insert(info.rpos, v);
        }
    }

    /// Resolve a region start position to its vertex, if present.
    pub fn lindex(&self, lpos: GenomicPosition) -> Option<VertexId> {
        self.lindex.get(&lpos).copied()
    }

    /// Resolve a region end position to its vertex, if present.
    pub fn rindex(&self, rpos: GenomicPosition) -> Option<VertexId> {
        self.rindex.get(&rpos).copied()
    }

    /// Guarantee every internal vertex at least a minimal source or sink
    /// edge: any vertex with no incoming edge gets one from the source, and
    /// any vertex with no outgoing edge gets one to the sink, each weighted
    /// `min_guaranteed_edge_weight`. Covers single-exon fragments that would
    /// otherwise present with no source or sink edge at all.
    pub fn extend_strands(&mut self, min_guaranteed_edge_weight: f64) {
        let source = 0usize;
        let sink = self.sink();
        for v in 1..sink {
            if self.in_degree(v) == 0 {
                self.add_edge(
                    source,
                    v,
                    EdgeInfo {
                        weight: min_guaranteed_edge_weight,
                        count: 1,
                    },
                );
            }
            if self.out_degree(v) == 0 {
                self.add_edge(
                    v,
                    sink,
                    EdgeInfo {
                        weight: min_guaranteed_edge_weight,
                        count: 1,
                    },
                );
            }
        }
    }

    /// Drop every edge between internal vertices whose endpoints are not
    /// both present in `reliable`. Used by `CombinedGraph::refine_junctions`
    /// before `build_splice_graph` is re-run with multi-sample evidence, and
    /// directly by the assembler as a post-build refinement step.
    pub fn refine_splice_graph(&mut self, reliable: &std::collections::HashSet<GenomicPosition>) {
        let sink = self.sink();
        let mut to_remove = Vec::new();
        for s in 1..sink {
            let lpos = self.vinfo[s].rpos;
            for (&t, _) in self.out_edges[s].iter() {
                if t == sink || t == 0 {
                    continue;
                }
                let rpos = self.vinfo[t].lpos;
                if lpos >= rpos && !(reliable.contains(&lpos) && reliable.contains(&rpos)) {
                    to_remove.push((s, t));
                }
            }
        }
        for (s, t) in to_remove {
            self.remove_edge(s, t);
        }
    }
}

/// Produce a map from each start-boundary position in `positions` to a
/// single canonical representative, grouping positions within `dist` of
/// each other. Positions are processed in ascending order; the first
/// position in each run becomes the representative.
pub fn group_start_boundaries(
    positions: &[GenomicPosition],
    dist: GenomicPosition,
) -> HashMap<GenomicPosition, GenomicPosition> {
    group_boundaries(positions, dist)
}

/// Symmetric to [`group_start_boundaries`] for end-boundary positions.
pub fn group_end_boundaries(
    positions: &[GenomicPosition],
    dist: GenomicPosition,
) -> HashMap<GenomicPosition, GenomicPosition> {
    group_boundaries(positions, dist)
}

fn group_boundaries(
    positions: &[GenomicPosition],
    dist: GenomicPosition,
) -> HashMap<GenomicPosition, GenomicPosition> {
    let mut sorted: Vec<GenomicPosition> = positions.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut map = HashMap::new();
    let mut rep: Option<GenomicPosition> = None;
    for p in sorted {
        match rep {
            Some(r) if p - r <= dist => {
                map.insert(p, r);
            }
            _ => {
                rep = Some(p);
                map.insert(p, p);
            }
        }
    }
    map
}

/// Classify a position's boundary role (see [`BoundaryKind`]).
pub fn classify_boundary(is_left_splice: bool, is_right_splice: bool) -> BoundaryKind {
    match (is_left_splice, is_right_splice) {
        (true, true) => BoundaryKind::LeftRightSplice,
        (true, false) => BoundaryKind::LeftSplice,
        (false, true) => BoundaryKind::RightSplice,
        (false, false) => BoundaryKind::MiddleCut,
    }
}

/// Weight/count of the continuation edge between two adjacent regions:
/// prefer the side with smaller (out|in)-degree, floored at 1, with
/// `count = min(source.count, target.count)`.
pub fn continuation_edge_weight(
    source_out_degree: usize,
    target_in_degree: usize,
    source_weight: f64,
    target_weight: f64,
    source_count: u32,
    target_count: u32,
) -> WeightedCount {
    let weight = if source_out_degree < target_in_degree {
        source_weight
    } else {
        target_weight
    };
    WeightedCount {
        weight: weight.max(1.0),
        count: source_count.min(target_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mkvertex(lpos: i32, rpos: i32, weight: f64) -> VertexInfo {
        VertexInfo {
            lpos,
            rpos,
            weight,
            count: 1,
        }
    }

    #[test]
    fn source_and_sink_wire_through_vertex_index() {
        let mut g = SpliceGraph::new();
        let source = g.add_vertex(mkvertex(0, 0, 0.0));
        let v1 = g.add_vertex(mkvertex(100, 200, 3.0));
        let v2 = g.add_vertex(mkvertex(300, 400, 5.0));
        let sink = g.add_vertex(mkvertex(400, 400, 0.0));
        g.build_vertex_index();

        assert_eq!(source, 0);
        assert_eq!(sink, g.sink());
        assert_eq!(g.lindex(100), Some(v1));
        assert_eq!(g.rindex(400), Some(v2));

        g.add_edge(source, v1, EdgeInfo { weight: 3.0, count: 1 });
        g.add_edge(v1, v2, EdgeInfo { weight: 5.0, count: 1 });
        g.add_edge(v2, sink, EdgeInfo { weight: 3.0, count: 1 });

        assert_eq!(g.out_degree(v1), 1);
        assert_eq!(g.in_degree(v2), 1);
    }

    #[test]
    fn extend_strands_anchors_orphan_vertices() {
        let mut g = SpliceGraph::new();
        g.add_vertex(mkvertex(0, 0, 0.0));
        let v1 = g.add_vertex(mkvertex(100, 200, 3.0));
        g.add_vertex(mkvertex(200, 200, 0.0));
        g.build_vertex_index();

        g.extend_strands(1.5);
        assert_eq!(g.in_degree(v1), 1);
        assert_eq!(g.out_degree(v1), 1);
    }

    #[test]
    fn group_boundaries_clusters_within_distance() {
        let positions = [100, 105, 108, 500, 520];
        let map = group_start_boundaries(&positions, 16);
        assert_eq!(map[&100], 100);
        assert_eq!(map[&105], 100);
        assert_eq!(map[&108], 100);
        assert_eq!(map[&500], 500);
        assert_eq!(map[&520], 500);
    }

    #[test]
    fn continuation_weight_prefers_lower_degree_side_floored_at_one() {
        let wc = continuation_edge_weight(1, 3, 0.4, 9.0, 2, 5);
        assert_eq!(wc.weight, 1.0);
        assert_eq!(wc.count, 2);

        let wc2 = continuation_edge_weight(3, 1, 0.4, 9.0, 2, 5);
        assert_eq!(wc2.weight, 9.0);
        assert_eq!(wc2.count, 2);
    }
}
