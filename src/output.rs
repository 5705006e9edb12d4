//! Result types returned by the generation entry points.
//!
//! All of them derive `Serialize` so the CLI's `--json` mode can print them
//! without a parallel set of wire types. Counts are derived from the data
//! they describe, never tracked separately, so a summary cannot disagree
//! with itself.

use serde::Serialize;
use std::path::PathBuf;

/// One box as it will print.
#[derive(Debug, Clone, Serialize)]
pub struct BoxSummary {
    /// Box id, the CAIXA value.
    pub caixa: String,
    /// Unit count, the QUANTIDADE field.
    pub quantity: usize,
    /// The DATA field exactly as the label shows it.
    pub data: String,
    /// True when the date cell passed through unparsed.
    pub date_fallback: bool,
}

/// What a manifest contains, before any rendering.
///
/// Returned by [`crate::inspect`]; also embedded in [`GenerateSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct ManifestSummary {
    /// The manifest file the rows came from. `None` when the rows were
    /// handed over in memory rather than read from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Data rows read, one per serialized unit.
    pub rows: usize,
    /// Distinct boxes in first-seen order.
    pub boxes: Vec<BoxSummary>,
}

impl ManifestSummary {
    /// Labels a generation run will produce (= pages).
    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Boxes whose date passed through unparsed.
    pub fn fallback_count(&self) -> usize {
        self.boxes.iter().filter(|b| b.date_fallback).count()
    }
}

/// Result of a full generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    /// The manifest that was rendered.
    pub manifest: ManifestSummary,
    /// Where the finished PDF landed.
    pub output: PathBuf,
    /// Pages written, one per box.
    pub pages: usize,
    /// Size of the finished PDF in bytes.
    pub bytes: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u128,
}
