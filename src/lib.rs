//! # etiqueta
//!
//! Turn a reverse-logistics manifest (XLSX/CSV) into printable return
//! labels: one US-Letter page per box with an 11-row summary table and a
//! QR code holding every serial packed in that box.
//!
//! ## Why this crate?
//!
//! Return shipments come back from the field as a spreadsheet: one row per
//! serialized unit, tagged with the box (`CAIXA`) it was packed in.
//! Warehouse intake wants the opposite shape — one page per box, the
//! shipment metadata human-readable on top and the serials machine-readable
//! below, so a single scan books the whole box in. This crate does that
//! reshaping and nothing else.
//!
//! ## Pipeline Overview
//!
//! ```text
//! manifest (.xlsx/.csv)
//!  │
//!  ├─ 1. Ingest   case-sensitive header check + row extraction (calamine / csv)
//!  ├─ 2. Group    rows → boxes, first-seen order, metadata from first row
//!  ├─ 3. Dates    normalise DATA to DD/MM/YYYY, verbatim fallback
//!  ├─ 4. QR       serials joined with '\n' → PNG (qrcode + image)
//!  ├─ 5. Label    11-row table + QR image laid out for one Letter page
//!  └─ 6. Compose  printpdf document, one page per box, atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use etiqueta::{generate, GenerateConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerateConfig::default();
//!     let summary = generate("reversa.xlsx", "etiquetas_saida.pdf", &config)?;
//!     println!("{} pages ({} boxes, {} rows)",
//!         summary.pages,
//!         summary.manifest.box_count(),
//!         summary.manifest.rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `etiqueta` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! etiqueta = { version = "0.3", default-features = false }
//! ```
//!
//! ## Label Anatomy
//!
//! | Rows | Left column | Right column |
//! |------|-------------|--------------|
//! | 1    | `CLARO` | `ETIQUETA DE RETORNO REVERSA` (grey header) |
//! | 2-7  | `NOME`, `DATA`, `CD`, `CIDADE`, `COD._ITEM`, `DESCRICAO` | first row of the box (`DATA` normalised) |
//! | 8    | `QUANTIDADE` | number of rows in the box |
//! | 9-11 | `N._Nfe`, `CAIXA`, `LOTE` | first row of the box |
//!
//! Below the table sits a 2x2 inch QR code with every serial of the box,
//! one per line, in manifest order. Scanning it books the whole box in one
//! read.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod fonts;
pub mod generate;
pub mod manifest;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerateConfig, SheetSelection};
pub use error::EtiquetaError;
pub use generate::{compose_from_rows, generate, generate_from_rows, inspect};
pub use manifest::{group_by_box, BoxGroup, DateValue, ManifestRow, REQUIRED_COLUMNS};
pub use output::{BoxSummary, GenerateSummary, ManifestSummary};
pub use pipeline::date::NormalizedDate;
