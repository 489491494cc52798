//! Crate-wide error type.
//!
//! Only [`Error::Precondition`] is meant to propagate out of normal
//! operation. Locally-recovered conditions (a dropped junction, an
//! over-capacity grouping attempt, a bridged-BAM I/O failure) are logged
//! via `tracing` at the call site and never turned into an `Error`.

use thiserror::Error;

/// Errors surfaced by the core assembly pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// An invariant the caller is responsible for upholding was violated
    /// (e.g. `bridge_path` with a malformed chain, fewer than two graphs
    /// passed to `resolve_cluster`, a reversed interval).
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Bridged-BAM I/O failure. Recovered by the caller (logged, not
    /// propagated) in every production call site; exposed as a variant so
    /// `SampleProfile` methods can still return a `Result`.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Failure opening, reading, or writing a BAM/CRAM file via `rust-htslib`.
    #[error("htslib failure: {0}")]
    Htslib(#[from] rust_htslib::errors::Error),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
