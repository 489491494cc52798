//! `BundleGroup`: two-round concurrent clustering of per-sample
//! [`CombinedGraph`]s that share splicing structure. Round one is a
//! high-precision local pass bounded by `max_group_size`; round two
//! relaxes the similarity threshold and unions whatever remains through a
//! shared disjoint-set. Both rounds fan out over `rayon` scoped pools with
//! `parking_lot::Mutex` guarding the shared state.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::combined_graph::CombinedGraph;
use crate::config::Config;
use crate::disjoint_set::DisjointSet;
use crate::region::GenomicPosition;

type SimPair = (usize, usize, f64);

/// Clusters [`CombinedGraph`]s sharing `(chrm, strand)` by splice-position
/// similarity. Holds only the sorted splice-position lists it needs;
/// never mutates the graphs it was built from.
#[derive(Debug)]
pub struct BundleGroup {
    chrm: String,
    strand: char,
    cfg: Config,
    splices: Vec<Vec<GenomicPosition>>,
    sindex: HashMap<GenomicPosition, BTreeSet<usize>>,
}

impl BundleGroup {
    /// Build a grouping session over `gset`, a set of graphs already
    /// verified to share `(chrm, strand)`.
    pub fn new(chrm: impl Into<String>, strand: char, gset: &[CombinedGraph], cfg: Config) -> Self {
        let splices = gset.iter().map(|g| g.splices.clone()).collect();
        Self {
            chrm: chrm.into(),
            strand,
            cfg,
            splices,
            sindex: HashMap::new(),
        }
    }

    fn build_splice_index(&mut self) {
        self.sindex.clear();
        for (k, sp) in self.splices.iter().enumerate() {
            for &p in sp {
                self.sindex.entry(p).or_default().insert(k);
            }
        }
    }

    /// Run the two-round clustering and return a partition of
    /// `0..gset.len()`: each element lists the graph indices to be
    /// co-resolved.
    pub fn resolve(mut self) -> Vec<Vec<usize>> {
        self.build_splice_index();
        let n = self.splices.len();
        let buckets: Vec<&BTreeSet<usize>> = self.sindex.values().collect();

        let round1_state = Mutex::new((vec![false; n], Vec::<Vec<usize>>::new()));
        let pool1 = build_pool(self.cfg.max_threads, "round1");
        pool1.install(|| {
            buckets.par_iter().for_each(|bucket| {
                self.process_subset1(bucket, &round1_state);
            });
        });
        let (mut grouped, mut gvv) = round1_state.into_inner();
        info!(
            chrm = %self.chrm,
            strand = %self.strand,
            round = 1,
            groups = gvv.len(),
            "bundle grouping round complete"
        );
        debug!(chrm = %self.chrm, strand = %self.strand, round = 1, stats = ?stats(&gvv), "group size histogram");

        let ds = Mutex::new(DisjointSet::new(n));
        let pool2 = build_pool(self.cfg.max_threads, "round2");
        pool2.install(|| {
            buckets.par_iter().for_each(|bucket| {
                self.process_subset2(bucket, &grouped, &ds);
            });
        });
        let mut ds = ds.into_inner();
        let all: Vec<usize> = (0..n).collect();
        self.commit_groups(&all, &mut ds, 1, &mut grouped, &mut gvv);

        info!(
            chrm = %self.chrm,
            strand = %self.strand,
            round = 2,
            groups = gvv.len(),
            "bundle grouping round complete"
        );
        debug!(chrm = %self.chrm, strand = %self.strand, round = 2, stats = ?stats(&gvv), "group size histogram");

        gvv
    }

    fn process_subset1(&self, bucket: &BTreeSet<usize>, state: &Mutex<(Vec<bool>, Vec<Vec<usize>>)>) {
        let ss: Vec<usize> = {
            let (grouped, _) = &*state.lock();
            bucket.iter().copied().filter(|&g| !grouped[g]).collect()
        };
        let vpid = self.similarity(&ss, true, self.cfg.max_grouping_similarity);

        let mut guard = state.lock();
        let (grouped, gvv) = &mut *guard;
        let filtered: Vec<SimPair> = vpid
            .into_iter()
            .filter(|&(x, y, _)| !grouped[ss[x]] && !grouped[ss[y]])
            .collect();

        let mut local_ds = DisjointSet::new(ss.len());
        for (x, y, _) in &filtered {
            local_ds.try_union(*x, *y, self.cfg.max_group_size);
        }
        self.commit_groups(&ss, &mut local_ds, self.cfg.max_group_size, grouped, gvv);
    }

    fn process_subset2(&self, bucket: &BTreeSet<usize>, grouped: &[bool], ds: &Mutex<DisjointSet>) {
        let ss: Vec<usize> = bucket.iter().copied().filter(|&g| !grouped[g]).collect();
        let vpid = self.similarity(&ss, false, self.cfg.min_grouping_similarity);

        let mut guard = ds.lock();
        for (x, y, _) in vpid {
            if grouped[x] || grouped[y] {
                continue;
            }
            guard.try_union(x, y, self.cfg.max_group_size);
        }
    }

    /// Pairwise splice-set similarity within `ss`. When `local`, pairs are
    /// reported as indices into `ss`; otherwise as the underlying global
    /// graph indices. Sorted by similarity descending so unions are
    /// committed highest-similarity-first.
    fn similarity(&self, ss: &[usize], local: bool, threshold: f64) -> Vec<SimPair> {
        let mut out = Vec::new();
        for xi in 0..ss.len() {
            let i = ss[xi];
            if too_many_junctions(&self.splices[i], self.cfg.max_num_junctions_to_combine) {
                continue;
            }
            for xj in 0..ss.len() {
                let j = ss[xj];
                if i >= j {
                    continue;
                }
                if too_many_junctions(&self.splices[j], self.cfg.max_num_junctions_to_combine) {
                    continue;
                }
                let c = intersection_count(&self.splices[i], &self.splices[j]);
                let small = self.splices[i].len().min(self.splices[j].len());
                if small == 0 || c <= 1 {
                    continue;
                }
                let r = c as f64 / small as f64;
                if r < threshold {
                    continue;
                }
                if local {
                    out.push((xi, xj, r));
                } else {
                    out.push((i, j, r));
                }
            }
        }
        out.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap());
        out
    }

    /// Commit groups of size `>= min_group_size` from `ds` into `gvv`,
    /// marking their members grouped. `ss[i]` is the global graph index
    /// represented by disjoint-set element `i`.
    fn commit_groups(
        &self,
        ss: &[usize],
        ds: &mut DisjointSet,
        min_group_size: usize,
        grouped: &mut [bool],
        gvv: &mut Vec<Vec<usize>>,
    ) {
        let mut index_of_root: HashMap<usize, usize> = HashMap::new();
        for (i, &g) in ss.iter().enumerate() {
            let root = ds.find(i);
            let size = ds.size_of(root);
            if size < min_group_size || grouped[g] {
                continue;
            }
            grouped[g] = true;
            let idx = *index_of_root.entry(root).or_insert_with(|| {
                gvv.push(Vec::new());
                gvv.len() - 1
            });
            gvv[idx].push(g);
        }
    }
}

/// Histogram of group sizes, mapping `group size -> count of groups with
/// that size`. Useful for tuning `max_group_size`; diagnostic only.
pub fn stats(gvv: &[Vec<usize>]) -> BTreeMap<usize, usize> {
    let mut hist = BTreeMap::new();
    for g in gvv {
        *hist.entry(g.len()).or_insert(0) += 1;
    }
    hist
}

fn too_many_junctions(splices: &[GenomicPosition], max_num_junctions_to_combine: usize) -> bool {
    splices.len() as f64 / 2.0 > max_num_junctions_to_combine as f64
}

fn intersection_count(a: &[GenomicPosition], b: &[GenomicPosition]) -> usize {
    let (mut i, mut j, mut c) = (0usize, 0usize, 0usize);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            c += 1;
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    c
}

fn build_pool(num_threads: usize, label: &'static str) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(move |i| format!("bundle-group-{label}-{i}"))
        .build()
        .expect("failed to build bundle-group thread pool")
}
