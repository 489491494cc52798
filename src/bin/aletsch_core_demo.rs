//! Thin demonstration binary: assembles a couple of synthetic splice graphs
//! through the full cluster-resolution pipeline and prints the resulting
//! transcripts. Real deployments supply their own [`BridgeSolver`] and
//! [`Decomposer`] implementations and their own splice-graph input; this
//! binary exists to exercise the library end to end, not to replace those
//! collaborators.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aletsch_core::{
    Assembler, BridgePath, BridgeSolver, CombinedGraph, Config, Decomposer, EdgeInfo, HyperSet,
    PereadCluster, PhaseSet, SampleProfile, SpliceGraph, Transcript, TranscriptSet, VertexInfo,
};

/// Assemble a small synthetic multi-sample cluster and print the transcripts found.
#[derive(Parser, Debug)]
#[command(name = "aletsch-core-demo", about = "Demonstration run of the core assembly pipeline")]
struct Cli {
    /// Directory to write bridged BAM output into (omit to skip BAM output).
    #[arg(long)]
    output_bridged_bam_dir: Option<PathBuf>,
    /// Maximum worker threads per grouping round.
    #[arg(long, default_value_t = 2)]
    max_threads: usize,
}

/// A solver that never bridges a fragment: useful for demonstration runs
/// without a real paired-end bridging implementation.
struct UnbridgingSolver;

impl BridgeSolver for UnbridgingSolver {
    fn solve(
        &self,
        _graph: &SpliceGraph,
        clusters: &[PereadCluster],
        _insertsize_low: i32,
        _insertsize_high: i32,
    ) -> Vec<BridgePath> {
        clusters.iter().map(|_| BridgePath::unbridged()).collect()
    }

    fn build_phase_set(&self, _clusters: &[PereadCluster], _paths: &[BridgePath], _ps: &mut PhaseSet) {}
}

/// A decomposer that emits the heaviest single-vertex path through each
/// graph, standing in for a real maximum-flow decomposition kernel.
struct HeaviestVertexDecomposer;

impl Decomposer for HeaviestVertexDecomposer {
    fn decompose(&self, graph: &SpliceGraph, _hyper_set: &HyperSet, _cfg: &Config) -> Vec<Transcript> {
        let sink = graph.sink();
        if sink < 2 {
            return Vec::new();
        }
        let best = (1..sink)
            .map(|v| (v, graph.vertex_info(v)))
            .max_by(|a, b| a.1.weight.partial_cmp(&b.1.weight).unwrap());
        match best {
            Some((_, info)) => vec![Transcript::new(vec![(info.lpos, info.rpos)], info.weight)],
            None => Vec::new(),
        }
    }
}

fn synthetic_splice_graph(offset: i32) -> SpliceGraph {
    let mut g = SpliceGraph::new();
    g.add_vertex(VertexInfo {
        lpos: offset,
        rpos: offset,
        weight: 0.0,
        count: 0,
    });
    g.add_vertex(VertexInfo {
        lpos: offset,
        rpos: offset + 100,
        weight: 6.0,
        count: 1,
    });
    g.add_vertex(VertexInfo {
        lpos: offset + 200,
        rpos: offset + 300,
        weight: 6.0,
        count: 1,
    });
    g.add_vertex(VertexInfo {
        lpos: offset + 300,
        rpos: offset + 300,
        weight: 0.0,
        count: 0,
    });
    g.build_vertex_index();
    g.add_edge(0, 1, EdgeInfo { weight: 6.0, count: 1 });
    g.add_edge(1, 2, EdgeInfo { weight: 5.0, count: 1 });
    g.add_edge(2, 3, EdgeInfo { weight: 6.0, count: 1 });
    g
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let cfg = Config {
        max_threads: cli.max_threads.max(1),
        output_bridged_bam_dir: cli.output_bridged_bam_dir,
        ..Config::default()
    };
    cfg.validate().context("invalid configuration")?;

    let mut gv: Vec<CombinedGraph> = (0..2)
        .map(|i| {
            let gr = synthetic_splice_graph(100 * i);
            let mut cg = CombinedGraph::new();
            cg.build(&gr, "chr1", '+', PhaseSet::new(), Vec::new());
            cg.sid = 0;
            cg
        })
        .collect();

    let samples = vec![SampleProfile::synthetic(0, 200, 500)];

    let assembler = Assembler::new(cfg, UnbridgingSolver, HeaviestVertexDecomposer);
    let mut ts = Mutex::new(TranscriptSet::new());
    assembler.assemble_cluster(&mut gv, 0, 0, &mut ts, &samples);

    let ts = ts.into_inner();
    info!(transcripts = ts.len(), "assembly complete");
    for (t, count, coverage) in ts.iter() {
        println!(
            "transcript exons={:?} count={} coverage={:.2} rpkm={:.2}",
            t.exons, count, coverage, t.rpkm
        );
    }

    Ok(())
}
