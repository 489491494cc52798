//! `CombinedGraph`: a per-sample (or consensus) summary of regions,
//! junctions, and start/end boundaries, built from a [`SpliceGraph`] and
//! folded together by [`combine`](CombinedGraph::combine).

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::interval::IntervalAggregator;
use crate::pereads::{BridgeKind, BridgePath, PereadCluster};
use crate::phase::PhaseSet;
use crate::region::{GenomicPosition, Interval, WeightedCount};
use crate::splice_graph::{self, EdgeInfo, SpliceGraph, VertexInfo};

/// A position-keyed additive bound (start or end), `(position, weight, count)`.
type BoundEntry = (GenomicPosition, WeightedCount);

/// Outcome of [`CombinedGraph::build_splice_graph`]: the built graph plus a
/// report of any junctions that could not be resolved against the region
/// vertex index, so callers can assert the drop ratio instead of losing
/// the count silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpliceGraphBuildReport {
    /// Total junctions considered.
    pub total_junctions: usize,
    /// Junctions dropped because one or both endpoints did not resolve
    /// through `rindex`/`lindex`.
    pub dropped_junctions: usize,
}

impl SpliceGraphBuildReport {
    /// Fraction of junctions dropped, `0.0` when there were none to drop.
    pub fn dropped_ratio(&self) -> f64 {
        if self.total_junctions == 0 {
            0.0
        } else {
            self.dropped_junctions as f64 / self.total_junctions as f64
        }
    }
}

/// A per-sample (or consensus) summary of a splice graph's regions,
/// junctions, and boundaries, plus the phase constraints and unbridged
/// paired-end fragments observed over it.
#[derive(Debug, Clone, Default)]
pub struct CombinedGraph {
    /// Identifier assigned by [`CombinedGraph::set_gid`].
    pub gid: String,
    /// Chromosome name.
    pub chrm: String,
    /// Strand (`+`, `-`, or `.`).
    pub strand: char,
    /// Originating sample id; `-1` for a cluster's consensus graph.
    pub sid: i64,
    /// Number of per-sample graphs folded into this one (1 for a freshly built graph).
    pub num_combined: u32,
    /// Sorted, deduplicated splice endpoint positions.
    pub splices: Vec<GenomicPosition>,
    /// `(interval, weight/count)` per region, in ascending order.
    pub regions: Vec<(Interval, WeightedCount)>,
    /// `(interval, weight/count)` per junction.
    pub junctions: Vec<(Interval, WeightedCount)>,
    /// Start-boundary positions with accumulated evidence.
    pub sbounds: Vec<BoundEntry>,
    /// End-boundary positions with accumulated evidence.
    pub tbounds: Vec<BoundEntry>,
    /// Phase constraints accumulated over this graph.
    pub ps: PhaseSet,
    /// Unbridged paired-end fragments awaiting re-bridging.
    pub vc: Vec<PereadCluster>,
}

impl CombinedGraph {
    /// Construct an empty combined graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `gid` to `"{batch}.{instance}.{subindex}"`.
    pub fn set_gid(&mut self, batch: u64, instance: u64, subindex: u64) {
        self.gid = format!("{batch}.{instance}.{subindex}");
    }

    /// Copy `gid`, `chrm`, `strand`, and `sid` from `other`, used when
    /// seeding a cluster's consensus graph.
    pub fn copy_meta_information(&mut self, other: &CombinedGraph) {
        self.gid = other.gid.clone();
        self.chrm = other.chrm.clone();
        self.strand = other.strand;
        self.sid = other.sid;
    }

    /// Populate this graph from a splice graph, its phase set, and its
    /// unbridged fragments.
    pub fn build(&mut self, gr: &SpliceGraph, chrm: &str, strand: char, phase: PhaseSet, unbridged: Vec<PereadCluster>) {
        self.chrm = chrm.to_string();
        self.strand = strand;
        self.num_combined = 1;

        self.build_regions(gr);
        self.build_start_bounds(gr);
        self.build_end_bounds(gr);
        self.build_splices_junctions(gr);
        self.ps = phase;
        self.vc = unbridged;
    }

    fn build_regions(&mut self, gr: &SpliceGraph) {
        self.regions.clear();
        let sink = gr.sink();
        for v in 1..sink {
            if gr.in_degree(v) == 0 && gr.out_degree(v) == 0 {
                continue;
            }
            let info = gr.vertex_info(v);
            if info.lpos >= info.rpos {
                continue;
            }
            self.regions.push((
                Interval::new(info.lpos, info.rpos),
                WeightedCount::new(info.weight, 1),
            ));
        }
    }

    fn build_start_bounds(&mut self, gr: &SpliceGraph) {
        self.sbounds.clear();
        let sink = gr.sink();
        for (t, edge) in gr.out_iter(0) {
            if t == sink {
                continue;
            }
            let p = gr.vertex_info(t).lpos;
            self.sbounds.push((p, WeightedCount::new(edge.weight, 1)));
        }
    }

    fn build_end_bounds(&mut self, gr: &SpliceGraph) {
        self.tbounds.clear();
        let sink = gr.sink();
        for (s, edge) in gr.in_iter(sink) {
            if s == 0 {
                continue;
            }
            let p = gr.vertex_info(s).rpos;
            self.tbounds.push((p, WeightedCount::new(edge.weight, 1)));
        }
    }

    fn build_splices_junctions(&mut self, gr: &SpliceGraph) {
        self.junctions.clear();
        let mut sp: HashSet<GenomicPosition> = HashSet::new();
        let sink = gr.sink();
        for s in 1..sink {
            for (t, edge) in gr.out_iter(s) {
                if t == sink || s == 0 {
                    continue;
                }
                let p1 = gr.vertex_info(s).rpos;
                let p2 = gr.vertex_info(t).lpos;
                if p1 >= p2 {
                    continue;
                }
                self.junctions
                    .push((Interval::new(p1, p2), WeightedCount::new(edge.weight, 1)));
                sp.insert(p1);
                sp.insert(p2);
            }
        }
        let mut splices: Vec<_> = sp.into_iter().collect();
        splices.sort_unstable();
        self.splices = splices;
    }

    /// Number of splice positions in `self.splices` also present in `other`.
    pub fn overlapped_splice_count(&self, other: &[GenomicPosition]) -> usize {
        let set: HashSet<GenomicPosition> = other.iter().copied().collect();
        self.splices.iter().filter(|p| set.contains(p)).count()
    }

    /// Fold the peer graphs `peers` into `self`, additively aggregating
    /// regions (via [`IntervalAggregator`]), junctions, and boundaries, and
    /// resetting every input to empty.
    pub fn combine(&mut self, peers: &mut [CombinedGraph]) {
        let mut region_agg = IntervalAggregator::new();
        let mut junction_map: HashMap<Interval, WeightedCount> = HashMap::new();
        let mut sbound_map: HashMap<GenomicPosition, WeightedCount> = HashMap::new();
        let mut tbound_map: HashMap<GenomicPosition, WeightedCount> = HashMap::new();

        for (iv, wc) in &self.regions {
            region_agg.add(*iv, wc.weight);
        }
        for (iv, wc) in &self.junctions {
            junction_map
                .entry(*iv)
                .and_modify(|e| *e = e.combine(wc))
                .or_insert(*wc);
        }
        for (p, wc) in &self.sbounds {
            sbound_map
                .entry(*p)
                .and_modify(|e| *e = e.combine(wc))
                .or_insert(*wc);
        }
        for (p, wc) in &self.tbounds {
            tbound_map
                .entry(*p)
                .and_modify(|e| *e = e.combine(wc))
                .or_insert(*wc);
        }

        for peer in peers.iter_mut() {
            for (iv, wc) in &peer.regions {
                region_agg.add(*iv, wc.weight);
            }
            for (iv, wc) in &peer.junctions {
                junction_map
                    .entry(*iv)
                    .and_modify(|e| *e = e.combine(wc))
                    .or_insert(*wc);
            }
            for (p, wc) in &peer.sbounds {
                sbound_map
                    .entry(*p)
                    .and_modify(|e| *e = e.combine(wc))
                    .or_insert(*wc);
            }
            for (p, wc) in &peer.tbounds {
                tbound_map
                    .entry(*p)
                    .and_modify(|e| *e = e.combine(wc))
                    .or_insert(*wc);
            }
            self.ps.combine(&peer.ps);
            self.num_combined += peer.num_combined;
        }

        self.regions = region_agg
            .iter()
            .map(|(iv, w)| (iv, WeightedCount::new(w, 1)))
            .collect();
        self.junctions = junction_map.into_iter().collect();
        self.junctions.sort_by_key(|(iv, _)| (iv.l, iv.r));
        self.sbounds = sbound_map.into_iter().collect();
        self.sbounds.sort_by_key(|(p, _)| *p);
        self.tbounds = tbound_map.into_iter().collect();
        self.tbounds.sort_by_key(|(p, _)| *p);
    }

    /// Append a re-bridged paired-end fragment's regions, junctions, and
    /// phase contributions. Callers are responsible for only appending
    /// fragments that actually bridged; unbridged fragments are re-pooled
    /// instead.
    pub fn append(&mut self, pc: &PereadCluster, bbp: &BridgePath) {
        self.append_regions(pc, bbp);
        self.append_junctions(pc, bbp);
        self.add_phases_from_bridged_pereads_cluster(pc, bbp);
    }

    fn append_regions(&mut self, pc: &PereadCluster, bbp: &BridgePath) {
        let chain = match &bbp.kind {
            BridgeKind::Bridged { chain } => chain.as_slice(),
            BridgeKind::Unbridged => &[],
        };

        if chain.is_empty() {
            let (p1, p2) = (pc.extend[1], pc.extend[2]);
            if p1 < p2 {
                self.regions
                    .push((Interval::new(p1, p2), WeightedCount::new(pc.count as f64, 1)));
            }
            return;
        }

        let (p1, p2) = (pc.extend[1], chain[0]);
        if p1 < p2 {
            self.regions
                .push((Interval::new(p1, p2), WeightedCount::new(pc.count as f64, 1)));
        } else if p2 < p1 {
            self.regions.push((Interval::new(p2, p1), WeightedCount::new(0.1, 1)));
        }

        let pair_count = chain.len() / 2;
        for i in 0..pair_count.saturating_sub(1) {
            let a = chain[i * 2 + 1];
            let b = chain[i * 2 + 2];
            debug_assert!(a < b, "middle bridge region out of order");
            self.regions
                .push((Interval::new(a, b), WeightedCount::new(pc.count as f64, 1)));
        }

        let (p1, p2) = (*chain.last().unwrap(), pc.extend[2]);
        if p1 < p2 {
            self.regions
                .push((Interval::new(p1, p2), WeightedCount::new(pc.count as f64, 1)));
        } else if p2 < p1 {
            self.regions.push((Interval::new(p2, p1), WeightedCount::new(0.1, 1)));
        }
    }

    fn append_junctions(&mut self, pc: &PereadCluster, bbp: &BridgePath) {
        let chain = match &bbp.kind {
            BridgeKind::Bridged { chain } => chain.as_slice(),
            BridgeKind::Unbridged => return,
        };
        for i in 0..chain.len() / 2 {
            let p1 = chain[i * 2];
            let p2 = chain[i * 2 + 1];
            debug_assert!(p1 < p2, "bridge junction out of order");
            self.junctions
                .push((Interval::new(p1, p2), WeightedCount::new(pc.count as f64, 1)));
        }
    }

    /// Emit the ordered position list for this read pair — mate-1 chain,
    /// then bridge chain, then mate-2 chain — incremented by `pc.count`.
    fn add_phases_from_bridged_pereads_cluster(&mut self, pc: &PereadCluster, bbp: &BridgePath) {
        let mut path: Vec<GenomicPosition> = Vec::new();
        path.extend_from_slice(&pc.chain1);
        if let BridgeKind::Bridged { chain } = &bbp.kind {
            path.extend_from_slice(chain);
        }
        path.extend_from_slice(&pc.chain2);
        if path.is_empty() {
            return;
        }
        self.ps.add(path, pc.count);
    }

    fn get_leftmost_bound(&self) -> GenomicPosition {
        self.sbounds
            .iter()
            .map(|(p, _)| *p)
            .min()
            .expect("get_leftmost_bound requires at least one sbound")
    }

    fn get_rightmost_bound(&self) -> GenomicPosition {
        self.tbounds
            .iter()
            .map(|(p, _)| *p)
            .max()
            .expect("get_rightmost_bound requires at least one tbound")
    }

    /// Build a [`SpliceGraph`] from this combined graph's regions,
    /// junctions, and boundaries. Returns the graph plus a report of any
    /// junctions that could not be resolved.
    pub fn build_splice_graph(&self) -> (SpliceGraph, SpliceGraphBuildReport) {
        let mut gr = SpliceGraph::new();

        let leftmost = self.get_leftmost_bound();
        gr.add_vertex(VertexInfo {
            lpos: leftmost,
            rpos: leftmost,
            weight: 0.0,
            count: 0,
        });

        for (iv, wc) in &self.regions {
            gr.add_vertex(VertexInfo {
                lpos: iv.l,
                rpos: iv.r,
                weight: wc.weight,
                count: wc.count,
            });
        }

        let rightmost = self.get_rightmost_bound();
        gr.add_vertex(VertexInfo {
            lpos: rightmost,
            rpos: rightmost,
            weight: 0.0,
            count: 0,
        });

        gr.build_vertex_index();
        let sink = gr.sink();

        for (p, wc) in &self.sbounds {
            if let Some(k) = gr.lindex(*p) {
                gr.add_edge(
                    0,
                    k,
                    EdgeInfo {
                        weight: wc.weight,
                        count: wc.count,
                    },
                );
            }
        }

        for (p, wc) in &self.tbounds {
            if let Some(k) = gr.rindex(*p) {
                gr.add_edge(
                    k,
                    sink,
                    EdgeInfo {
                        weight: wc.weight,
                        count: wc.count,
                    },
                );
            }
        }

        let mut report = SpliceGraphBuildReport {
            total_junctions: self.junctions.len(),
            dropped_junctions: 0,
        };
        for (iv, wc) in &self.junctions {
            let s = gr.rindex(iv.l);
            let t = gr.lindex(iv.r);
            match (s, t) {
                (Some(s), Some(t)) => {
                    gr.add_edge(
                        s,
                        t,
                        EdgeInfo {
                            weight: wc.weight,
                            count: wc.count,
                        },
                    );
                }
                _ => {
                    report.dropped_junctions += 1;
                    warn!(
                        l = iv.l,
                        r = iv.r,
                        "junction endpoint did not resolve through lindex/rindex; dropping"
                    );
                }
            }
        }

        for i in 1..self.regions.len() {
            let (prev_iv, prev_wc) = self.regions[i - 1];
            let (cur_iv, cur_wc) = self.regions[i];
            if prev_iv.r != cur_iv.l {
                continue;
            }
            let s = i;
            let t = i + 1;
            let wc = splice_graph::continuation_edge_weight(
                gr.out_degree(s),
                gr.in_degree(t),
                prev_wc.weight,
                cur_wc.weight,
                prev_wc.count,
                cur_wc.count,
            );
            gr.add_edge(
                s,
                t,
                EdgeInfo {
                    weight: wc.weight,
                    count: wc.count,
                },
            );
        }

        (gr, report)
    }

    /// Endpoints whose summed junction weight is at least `weight`, or
    /// summed junction count is at least `samples`.
    pub fn get_reliable_splices(&self, samples: u32, weight: f64) -> HashSet<GenomicPosition> {
        let mut m: HashMap<GenomicPosition, WeightedCount> = HashMap::new();
        for (iv, wc) in &self.junctions {
            m.entry(iv.l).and_modify(|e| *e = e.combine(wc)).or_insert(*wc);
            m.entry(iv.r).and_modify(|e| *e = e.combine(wc)).or_insert(*wc);
        }
        m.into_iter()
            .filter(|(_, wc)| wc.weight >= weight || wc.count >= samples)
            .map(|(p, _)| p)
            .collect()
    }

    /// Drop junctions whose endpoints are not in `reliable` (when supplied);
    /// with `reliable = None`, this is a no-op, which is how the single-graph
    /// path skips cross-sample refinement.
    pub fn refine_junctions(&mut self, reliable: Option<&HashSet<GenomicPosition>>) {
        let Some(reliable) = reliable else { return };
        self.junctions
            .retain(|(iv, _)| reliable.contains(&iv.l) && reliable.contains(&iv.r));
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        *self = CombinedGraph::default();
    }
}
