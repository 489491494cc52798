//! `Transcript`/`TranscriptSet`: the decomposition kernel's output,
//! accumulated across every assembled graph.

use std::collections::HashMap;

use crate::region::GenomicPosition;

/// A weighted source-to-sink path through a splice graph, as returned by the
/// decomposition kernel collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Exon boundaries, as `(lpos, rpos)` pairs in genomic order.
    pub exons: Vec<(GenomicPosition, GenomicPosition)>,
    /// Estimated abundance.
    pub abundance: f64,
    /// Reads-per-kilobase-per-million, assigned `0.0` at assembly time
    /// (computed later once total library size is known).
    pub rpkm: f64,
}

impl Transcript {
    /// Construct a transcript, tagging `rpkm = 0.0` until total library
    /// size is known.
    pub fn new(exons: Vec<(GenomicPosition, GenomicPosition)>, abundance: f64) -> Self {
        Self {
            exons,
            abundance,
            rpkm: 0.0,
        }
    }
}

/// How a transcript's coverage contribution is merged into an existing
/// [`TranscriptSet`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    /// Count and coverage both accumulate (`ADD+ADD`).
    CountAddCoverageAdd,
    /// Count accumulates; coverage is left untouched (`ADD+NUL`), used for
    /// the consensus graph of a resolved cluster so its abundance does not
    /// double-count evidence already carried by the per-sample graphs.
    CountAddCoverageNul,
}

#[derive(Debug, Clone, Default)]
struct Entry {
    count: u32,
    coverage: f64,
    transcript: Transcript,
}

/// Accumulates [`Transcript`]s across every assembled graph, merging
/// equivalent transcripts (identical exon structure) additively on count
/// and, depending on [`AddMode`], on coverage.
#[derive(Debug, Clone, Default)]
pub struct TranscriptSet {
    entries: HashMap<Vec<(GenomicPosition, GenomicPosition)>, Entry>,
    graph_count: u64,
}

impl TranscriptSet {
    /// Construct an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `transcript` in with `multiplicity` contributing samples,
    /// under `mode`.
    pub fn add(&mut self, transcript: Transcript, multiplicity: u32, _sample_id: i64, mode: AddMode) {
        let key = transcript.exons.clone();
        let entry = self.entries.entry(key).or_insert_with(|| Entry {
            count: 0,
            coverage: 0.0,
            transcript: transcript.clone(),
        });
        entry.count += multiplicity;
        if mode == AddMode::CountAddCoverageAdd {
            entry.coverage += transcript.abundance;
        }
    }

    /// Bump the count of graphs that have contributed to this set, whether
    /// or not they yielded any transcripts.
    pub fn increase_count(&mut self, n: u64) {
        self.graph_count += n;
    }

    /// Number of graphs that have contributed, via [`TranscriptSet::increase_count`].
    pub fn graph_count(&self) -> u64 {
        self.graph_count
    }

    /// Number of distinct transcripts recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no transcript has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(transcript, count, summed coverage)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&Transcript, u32, f64)> {
        self.entries
            .values()
            .map(|e| (&e.transcript, e.count, e.coverage))
    }
}
