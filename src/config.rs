//! Configuration recognized by the core.
//!
//! Loading configuration from a file or CLI is a collaborator concern;
//! this module only defines the recognized fields, their defaults, and
//! validation.

use crate::error::Error;

/// Tunables consumed by [`crate::bundle_group::BundleGroup`],
/// [`crate::assembler::Assembler`], and [`crate::combined_graph::CombinedGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of worker threads used per grouping round.
    pub max_threads: usize,
    /// Round-1 (high-precision local grouping) similarity threshold, in `(0, 1]`.
    pub max_grouping_similarity: f64,
    /// Round-2 (relaxed global grouping) similarity threshold, in `(0, 1]`, `<= max_grouping_similarity`.
    pub min_grouping_similarity: f64,
    /// Upper bound on the number of graphs folded into one group.
    pub max_group_size: usize,
    /// Graphs with more splice junctions than this are excluded from similarity scoring.
    pub max_num_junctions_to_combine: usize,
    /// Maximum distance at which two start/end boundaries are considered the same.
    pub max_group_boundary_distance: i32,
    /// Minimum gap, in bases, below which two adjacent sub-region boundaries are smoothed together.
    pub min_subregion_gap: i32,
    /// Minimum length, in bases, a sub-region must have to be retained.
    pub min_subregion_length: i32,
    /// Minimum fractional coverage overlap a sub-region must retain.
    pub min_subregion_overlap: f64,
    /// Minimum edge weight guaranteed for synthetic boundary regions.
    pub min_guaranteed_edge_weight: f64,
    /// Output directory for per-sample bridged BAM files; empty disables writing.
    pub output_bridged_bam_dir: Option<std::path::PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_threads: 1,
            max_grouping_similarity: 0.8,
            min_grouping_similarity: 0.5,
            max_group_size: 10,
            max_num_junctions_to_combine: 100,
            max_group_boundary_distance: 16,
            min_subregion_gap: 3,
            min_subregion_length: 20,
            min_subregion_overlap: 0.5,
            min_guaranteed_edge_weight: 1.5,
            output_bridged_bam_dir: None,
        }
    }
}

impl Config {
    /// Validate recognized ranges, returning a [`Error::Config`] naming the
    /// first violated constraint.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_threads == 0 {
            return Err(Error::Config("max_threads must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.max_grouping_similarity) || self.max_grouping_similarity <= 0.0
        {
            return Err(Error::Config(
                "max_grouping_similarity must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_grouping_similarity) || self.min_grouping_similarity <= 0.0
        {
            return Err(Error::Config(
                "min_grouping_similarity must be in (0, 1]".into(),
            ));
        }
        if self.min_grouping_similarity > self.max_grouping_similarity {
            return Err(Error::Config(
                "min_grouping_similarity must be <= max_grouping_similarity".into(),
            ));
        }
        if self.max_group_size < 2 {
            return Err(Error::Config("max_group_size must be >= 2".into()));
        }
        if self.max_num_junctions_to_combine == 0 {
            return Err(Error::Config(
                "max_num_junctions_to_combine must be >= 1".into(),
            ));
        }
        if self.max_group_boundary_distance < 0 {
            return Err(Error::Config(
                "max_group_boundary_distance must be >= 0".into(),
            ));
        }
        Ok(())
    }
}
