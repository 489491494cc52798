//! `SampleProfile`: per-sample alignment metadata and the lifecycle of an
//! optional bridged-BAM output writer sharing the input file's header.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rust_htslib::bam::{self, Header, HeaderView, Read as _};
use tracing::info;

use crate::error::{Error, Result};

/// Per-sample alignment metadata and the shared lock guarding its optional
/// bridged-BAM output handle.
///
/// `hdr` and `bam_lock` are cheap to clone (`Arc`/`Mutex` respectively) so a
/// `SampleProfile` can be shared across the worker closures that append
/// bridged fragments for a given sample, with the mutex serializing all
/// writers.
pub struct SampleProfile {
    /// Path to this sample's input alignment file.
    pub align_file: PathBuf,
    /// Stable identifier for this sample within a batch.
    pub sample_id: i64,
    /// Lower bound of the observed insert-size distribution.
    pub insertsize_low: i32,
    /// Upper bound of the observed insert-size distribution.
    pub insertsize_high: i32,
    /// Header shared between the input alignment file and any bridged-BAM
    /// output, so bridged records reference the same target list.
    pub hdr: Arc<HeaderView>,
    bridged_bam: Mutex<Option<bam::Writer>>,
}

impl SampleProfile {
    /// Open `align_file` to capture its header, without reading any records.
    pub fn open(align_file: impl Into<PathBuf>, sample_id: i64, insertsize_low: i32, insertsize_high: i32) -> Result<Self> {
        let align_file = align_file.into();
        let reader = bam::Reader::from_path(&align_file)?;
        let hdr = Arc::new(reader.header().clone());
        Ok(Self {
            align_file,
            sample_id,
            insertsize_low,
            insertsize_high,
            hdr,
            bridged_bam: Mutex::new(None),
        })
    }

    /// Open this sample's bridged-BAM output under `dir`, named
    /// `"{sample_id}.bam"`, sharing the input alignment file's header.
    pub fn open_bridged_bam(&self, dir: impl AsRef<Path>) -> Result<()> {
        let path = dir.as_ref().join(format!("{}.bam", self.sample_id));
        let header = Header::from_template(&self.hdr);
        let writer = bam::Writer::from_path(&path, &header, bam::Format::Bam)?;
        *self.bridged_bam.lock() = Some(writer);
        Ok(())
    }

    /// Write a single bridged alignment record under `bam_lock`.
    pub fn write_bridged_record(&self, record: &bam::Record) -> Result<()> {
        let mut guard = self.bridged_bam.lock();
        let writer = guard
            .as_mut()
            .ok_or_else(|| Error::Precondition("write_bridged_record called before open_bridged_bam".into()))?;
        writer.write(record)?;
        Ok(())
    }

    /// Close this sample's bridged-BAM output, if open.
    pub fn close_bridged_bam(&self) {
        let closed = self.bridged_bam.lock().take().is_some();
        info!(sample = %self.align_file.display(), closed, "closed bridged bam");
    }
}

impl SampleProfile {
    /// Build a profile carrying a minimal synthetic header rather than one
    /// read from a real alignment file. Used by unit tests that exercise
    /// insert-size bookkeeping and by the demonstration binary, neither of
    /// which has a BAM file to open via [`SampleProfile::open`].
    pub fn synthetic(sample_id: i64, insertsize_low: i32, insertsize_high: i32) -> Self {
        let hdr = Arc::new(HeaderView::from_bytes(b"@HD\tVN:1.6\tSO:unknown\n@SQ\tSN:chr1\tLN:1000000\n"));
        Self {
            align_file: PathBuf::from("synthetic.bam"),
            sample_id,
            insertsize_low,
            insertsize_high,
            hdr,
            bridged_bam: Mutex::new(None),
        }
    }
}

impl std::fmt::Debug for SampleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleProfile")
            .field("align_file", &self.align_file)
            .field("sample_id", &self.sample_id)
            .field("insertsize_low", &self.insertsize_low)
            .field("insertsize_high", &self.insertsize_high)
            .finish_non_exhaustive()
    }
}
