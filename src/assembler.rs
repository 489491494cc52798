//! `Assembler`: orchestrates per-cluster resolution — combine, bridge,
//! append, assemble, hand off to the decomposition kernel.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::collab::{BridgeSolver, Decomposer, HyperSet};
use crate::combined_graph::CombinedGraph;
use crate::config::Config;
use crate::error::Result;
use crate::pereads::PereadCluster;
use crate::region::GenomicPosition;
use crate::sample::SampleProfile;
use crate::splice_graph::{self, SpliceGraph};
use crate::transcript::{AddMode, TranscriptSet};

/// Drives cluster resolution and per-graph assembly given the configured
/// bridging and decomposition collaborators.
pub struct Assembler<S, D> {
    cfg: Config,
    solver: S,
    decomposer: D,
}

impl<S: BridgeSolver, D: Decomposer> Assembler<S, D> {
    /// Construct an assembler over the given configuration and collaborators.
    pub fn new(cfg: Config, solver: S, decomposer: D) -> Self {
        Self { cfg, solver, decomposer }
    }

    /// Resolve one cluster of co-grouped graphs, producing transcripts into
    /// `ts`. `gv.len() == 1` takes the direct path; otherwise a consensus
    /// graph is built via [`Assembler::resolve_cluster`] and both the
    /// originals and the consensus are assembled.
    pub fn assemble_cluster(
        &self,
        gv: &mut [CombinedGraph],
        batch: u64,
        instance: u64,
        ts: &mut Mutex<TranscriptSet>,
        samples: &[SampleProfile],
    ) {
        let mut subindex = 0u64;

        if gv.len() == 1 {
            let gt = &mut gv[0];
            gt.set_gid(batch, instance, subindex);
            gt.refine_junctions(None);
            self.assemble(gt, ts, AddMode::CountAddCoverageAdd);
            ts.lock().increase_count(1);
            self.maybe_emit_bridged_output(gt, samples);
            return;
        }

        let mut cx = CombinedGraph::new();
        self.resolve_cluster(gv, &mut cx, samples);

        for gt in gv.iter_mut() {
            gt.set_gid(batch, instance, subindex);
            subindex += 1;
            self.assemble(gt, ts, AddMode::CountAddCoverageAdd);
        }

        cx.set_gid(batch, instance, subindex);
        self.assemble(&mut cx, ts, AddMode::CountAddCoverageNul);
    }

    /// Combine `gv` into `cx`, bridge the pooled unbridged fragments, and
    /// append bridged results back into each original graph.
    pub fn resolve_cluster(&self, gv: &mut [CombinedGraph], cx: &mut CombinedGraph, samples: &[SampleProfile]) {
        assert!(gv.len() >= 2, "resolve_cluster requires at least two graphs");

        cx.copy_meta_information(&gv[0]);
        cx.combine(gv);
        cx.sid = -1;

        let reliable = combined_reliable_splices(gv, &self.cfg);
        cx.refine_junctions(Some(&reliable));

        let (gx, report) = cx.build_splice_graph();
        if report.dropped_junctions > 0 {
            warn!(
                dropped = report.dropped_junctions,
                total = report.total_junctions,
                ratio = report.dropped_ratio(),
                "dropped unresolvable junctions while building cluster splice graph"
            );
        }

        let mut pooled: Vec<PereadCluster> = Vec::new();
        let mut ranges: Vec<(usize, usize)> = Vec::with_capacity(gv.len());
        let mut length_low = i32::MAX;
        let mut length_high = i32::MIN;
        for gt in gv.iter() {
            let sp = &samples[gt.sid as usize];
            length_low = length_low.min(sp.insertsize_low);
            length_high = length_high.max(sp.insertsize_high);
            let start = pooled.len();
            pooled.extend(gt.vc.iter().cloned());
            ranges.push((start, pooled.len()));
        }
        if length_low > length_high {
            length_low = 0;
            length_high = 0;
        }

        let paths = self.solver.solve(&gx, &pooled, length_low, length_high);
        self.solver.build_phase_set(&pooled, &paths, &mut cx.ps);

        for (i, &(start, end)) in ranges.iter().enumerate() {
            let mut g1 = CombinedGraph::new();
            for k in start..end {
                if paths[k].is_bridged() {
                    g1.append(&pooled[k], &paths[k]);
                }
            }
            let mut peers = [g1];
            gv[i].combine(&mut peers);
        }

        if let Some(dir) = self.cfg.output_bridged_bam_dir.clone() {
            for (i, &(start, end)) in ranges.iter().enumerate() {
                let sp = &samples[gv[i].sid as usize];
                if let Err(err) = sp.open_bridged_bam(&dir) {
                    warn!(error = %err, "failed to open bridged bam for sample");
                    continue;
                }
                for k in start..end {
                    debug!(
                        bridged = paths[k].is_bridged(),
                        cluster_count = pooled[k].count,
                        "would emit pereads cluster to bridged bam"
                    );
                }
                sp.close_bridged_bam();
            }
        }

        for gt in gv.iter_mut() {
            gt.vc.clear();
        }
    }

    fn maybe_emit_bridged_output(&self, gt: &CombinedGraph, samples: &[SampleProfile]) {
        let Some(dir) = self.cfg.output_bridged_bam_dir.clone() else { return };
        if gt.vc.is_empty() {
            return;
        }
        let sp = &samples[gt.sid as usize];
        if let Err(err) = self.open_and_close_bridged(sp, &dir, gt.vc.len()) {
            warn!(error = %err, "failed to emit unbridged bam output for sample");
        }
    }

    fn open_and_close_bridged(&self, sp: &SampleProfile, dir: &std::path::Path, count: usize) -> Result<()> {
        sp.open_bridged_bam(dir)?;
        debug!(count, "would emit unbridged pereads clusters to bridged bam");
        sp.close_bridged_bam();
        Ok(())
    }

    /// Materialize `cb`'s splice graph, refine it, hand off to the
    /// decomposition kernel, and fold the resulting transcripts into `ts`.
    pub fn assemble(&self, cb: &mut CombinedGraph, ts: &Mutex<TranscriptSet>, mode: AddMode) {
        let transcripts = self.assemble_graph(cb);
        let mut guard = ts.lock();
        for t in transcripts {
            guard.add(t, 1, cb.sid, mode);
        }
    }

    fn assemble_graph(&self, cb: &CombinedGraph) -> Vec<crate::transcript::Transcript> {
        let (mut gx, report) = cb.build_splice_graph();
        if report.dropped_junctions > 0 {
            warn!(
                gid = %cb.gid,
                dropped = report.dropped_junctions,
                total = report.total_junctions,
                "dropped unresolvable junctions while building splice graph"
            );
        }

        gx.build_vertex_index();
        gx.extend_strands(self.cfg.min_guaranteed_edge_weight);

        let start_positions: Vec<GenomicPosition> = cb.sbounds.iter().map(|(p, _)| *p).collect();
        let end_positions: Vec<GenomicPosition> = cb.tbounds.iter().map(|(p, _)| *p).collect();
        let smap = splice_graph::group_start_boundaries(&start_positions, self.cfg.max_group_boundary_distance);
        let tmap = splice_graph::group_end_boundaries(&end_positions, self.cfg.max_group_boundary_distance);

        let mut ps = cb.ps.clone();
        ps.project_boundaries(&smap, &tmap);

        let reliable = cb.get_reliable_splices(1, self.cfg.min_guaranteed_edge_weight);
        gx.refine_splice_graph(&reliable);

        let mut hyper_set = HyperSet::from_phase_set(&ps);
        hyper_set.filter_against(|p| gx.lindex(p).is_some() || gx.rindex(p).is_some());

        let mut transcripts = self.decomposer.decompose(&gx, &hyper_set, &self.cfg);
        for t in transcripts.iter_mut() {
            t.rpkm = 0.0;
        }
        transcripts
    }
}

/// Build the multi-sample reliable-splice set used to refine a cluster's
/// consensus graph: every junction endpoint reliable in at least one
/// member graph.
fn combined_reliable_splices(gv: &[CombinedGraph], cfg: &Config) -> std::collections::HashSet<GenomicPosition> {
    let mut counts: HashMap<GenomicPosition, (f64, u32)> = HashMap::new();
    for gt in gv {
        for (iv, wc) in &gt.junctions {
            let entry = counts.entry(iv.l).or_insert((0.0, 0));
            entry.0 += wc.weight;
            entry.1 += wc.count;
            let entry = counts.entry(iv.r).or_insert((0.0, 0));
            entry.0 += wc.weight;
            entry.1 += wc.count;
        }
    }
    counts
        .into_iter()
        .filter(|(_, (w, c))| *w >= cfg.min_guaranteed_edge_weight || *c as usize >= gv.len())
        .map(|(p, _)| p)
        .collect()
}
