//! Error types for the etiqueta library.
//!
//! One fatal error type covers the whole run: [`EtiquetaError`]. The pipeline
//! has no per-box recovery — a box that cannot be encoded or rendered aborts
//! the batch, and the output file is written only after every page composed,
//! so callers see either a complete document or none.
//!
//! The single recoverable condition, an unparseable date cell, is *not* an
//! error. It is modelled as [`crate::pipeline::date::NormalizedDate::Fallback`]
//! and surfaces in summaries as `date_fallback: true`.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the etiqueta library.
#[derive(Debug, Error)]
pub enum EtiquetaError {
    // ── Data-source errors ────────────────────────────────────────────────
    /// Manifest file was not found at the given path.
    #[error("Manifest file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The manifest exists but could not be read or parsed as a table.
    #[error("Failed to read manifest '{path}': {detail}\nSupported formats: xlsx, xls, xlsb, ods, csv.")]
    DataSource { path: PathBuf, detail: String },

    /// The requested worksheet does not exist in the workbook.
    #[error("Worksheet '{requested}' not found.\nAvailable sheets: {available:?}")]
    SheetNotFound {
        requested: String,
        available: Vec<String>,
    },

    // ── Schema errors ─────────────────────────────────────────────────────
    /// The header row lacks one or more required columns.
    ///
    /// Every missing column is reported at once; ingest never partially
    /// succeeds and then fails on first access.
    #[error("Manifest is missing required column(s): {missing:?}\nExpected headers (case-sensitive): CAIXA, NOME, DATA, CD, CIDADE, COD._ITEM, DESCRICAO, N._Nfe, LOTE, SERIAL")]
    MissingColumns { missing: Vec<String> },

    /// Header row is valid but there are no data rows to label.
    #[error("Manifest has a valid header but no data rows.\nNothing to label; no output was written.")]
    EmptyManifest,

    // ── Encoding errors ───────────────────────────────────────────────────
    /// The newline-joined serial list exceeds QR capacity.
    ///
    /// The largest QR symbol (version 40) holds 2331 bytes at the default
    /// error-correction level, so this only fires for boxes with very large
    /// serial counts.
    #[error("QR payload too large: {serials} serials join to {bytes} bytes, above the 2331-byte QR ceiling.\nSplit the contents across more boxes or shorten the serials.")]
    QrCapacity { serials: usize, bytes: usize },

    /// The QR encoder rejected the payload for a reason other than size.
    #[error("QR encoding failed: {detail}")]
    QrEncode { detail: String },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The PDF backend failed while composing the document.
    #[error("PDF composition failed: {detail}")]
    PdfRender { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create, write, or move the output PDF into place.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
