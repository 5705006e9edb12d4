//! Top-level generation entry points.
//!
//! The run behind [`generate`] is short and strictly sequential:
//!
//! ```text
//! read_manifest ──▶ group_by_box ──▶ render_label (per box) ──▶ compose ──▶ write
//! ```
//!
//! Everything before the final write is pure, so the same run is exposed at
//! three depths: [`generate`] (file in, file out), [`generate_from_rows`]
//! (rows in, file out) and [`compose_from_rows`] (rows in, bytes out).
//! [`inspect`] stops after grouping and reports what a run would print
//! without rendering anything.

use crate::config::GenerateConfig;
use crate::error::EtiquetaError;
use crate::manifest::{self, BoxGroup, ManifestRow};
use crate::output::{BoxSummary, GenerateSummary, ManifestSummary};
use crate::pipeline::date::{self, NormalizedDate};
use crate::pipeline::label::{self, Element};
use crate::pipeline::{document, ingest};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate the label PDF for a manifest file.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — Manifest path (`.xlsx`, `.xls`, `.xlsb`, `.ods` or `.csv`)
/// * `output` — Where the PDF lands; parent directories are created
/// * `config` — Sheet selection
///
/// # Errors
/// Fails fast on the first problem: missing file, bad schema, a box whose
/// serials overflow the QR code, a write failure. On error nothing is left
/// at `output`; see [`EtiquetaError`] for the full taxonomy. An unparseable
/// date is *not* an error (the label shows the cell verbatim).
pub fn generate(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &GenerateConfig,
) -> Result<GenerateSummary, EtiquetaError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();
    info!("Generating labels from {}", input.display());

    // ── Step 1: Ingest the manifest ──────────────────────────────────────
    let rows = ingest::read_manifest(input, &config.sheet)?;

    // ── Step 2: Compose the document in memory ───────────────────────────
    let (bytes, boxes) = compose_from_rows(&rows)?;

    // ── Step 3: Write atomically ─────────────────────────────────────────
    write_atomic(output, &bytes)?;

    // ── Step 4: Summarise ────────────────────────────────────────────────
    let pages = boxes.len();
    let elapsed_ms = total_start.elapsed().as_millis();
    info!(
        "Wrote {} ({} pages, {} bytes) in {}ms",
        output.display(),
        pages,
        bytes.len(),
        elapsed_ms
    );

    Ok(GenerateSummary {
        manifest: ManifestSummary {
            input: Some(input.to_path_buf()),
            rows: rows.len(),
            boxes,
        },
        output: output.to_path_buf(),
        pages,
        bytes: bytes.len(),
        elapsed_ms,
    })
}

/// Like [`generate`] for callers that already hold the rows in memory.
///
/// Runs the same composition and atomic write; only the ingest stage is
/// skipped, so `manifest.input` is `None` in the returned summary.
pub fn generate_from_rows(
    rows: &[ManifestRow],
    output: impl AsRef<Path>,
) -> Result<GenerateSummary, EtiquetaError> {
    let start = Instant::now();
    let output = output.as_ref();

    let (bytes, boxes) = compose_from_rows(rows)?;
    write_atomic(output, &bytes)?;

    let pages = boxes.len();
    Ok(GenerateSummary {
        manifest: ManifestSummary {
            input: None,
            rows: rows.len(),
            boxes,
        },
        output: output.to_path_buf(),
        pages,
        bytes: bytes.len(),
        elapsed_ms: start.elapsed().as_millis(),
    })
}

/// Compose the PDF in memory: rows in, finished bytes plus one summary per
/// box out. Nothing here touches the filesystem.
///
/// # Errors
/// [`EtiquetaError::EmptyManifest`] when `rows` is empty (a zero-page PDF
/// is never produced), otherwise whatever the encoding and render stages
/// report.
pub fn compose_from_rows(
    rows: &[ManifestRow],
) -> Result<(Vec<u8>, Vec<BoxSummary>), EtiquetaError> {
    if rows.is_empty() {
        return Err(EtiquetaError::EmptyManifest);
    }

    let groups = manifest::group_by_box(rows);
    debug!(rows = rows.len(), boxes = groups.len(), "manifest grouped");

    let mut elements = Vec::new();
    let mut boxes = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        let when = date::normalize(&group.first().data);
        if when.is_fallback() {
            warn!(
                caixa = group.caixa,
                data = when.display(),
                "date cell did not parse; the label will show it verbatim"
            );
        }
        elements.extend(label::render_label(group, &when)?);
        // Page break between labels, never after the last one.
        if i + 1 < groups.len() {
            elements.push(Element::PageBreak);
        }
        boxes.push(box_summary(group, &when));
    }

    let bytes = document::compose(&elements)?;
    debug!(bytes = bytes.len(), "document composed");
    Ok((bytes, boxes))
}

/// Read and group a manifest without rendering anything.
///
/// Reports what [`generate`] would print: box ids, unit counts and the
/// dates as the labels will show them (fallbacks included).
pub fn inspect(
    input: impl AsRef<Path>,
    config: &GenerateConfig,
) -> Result<ManifestSummary, EtiquetaError> {
    let input = input.as_ref();
    let rows = ingest::read_manifest(input, &config.sheet)?;
    let groups = manifest::group_by_box(&rows);
    let boxes = groups
        .iter()
        .map(|group| box_summary(group, &date::normalize(&group.first().data)))
        .collect();
    Ok(ManifestSummary {
        input: Some(input.to_path_buf()),
        rows: rows.len(),
        boxes,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn box_summary(group: &BoxGroup<'_>, when: &NormalizedDate) -> BoxSummary {
    BoxSummary {
        caixa: group.caixa.to_string(),
        quantity: group.quantity(),
        data: when.display().to_string(),
        date_fallback: when.is_fallback(),
    }
}

/// Atomic write: temp file alongside the target, then rename. An
/// interrupted run never leaves a half-written PDF at `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), EtiquetaError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EtiquetaError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, bytes).map_err(|e| EtiquetaError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    std::fs::rename(&tmp_path, path).map_err(|e| EtiquetaError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
