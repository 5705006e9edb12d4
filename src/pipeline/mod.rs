//! Pipeline stages for manifest-to-label-sheet generation.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and keeps the file formats at
//! the edges: spreadsheet types never reach the composer, PDF types never
//! reach ingest.
//!
//! ## Data Flow
//!
//! ```text
//! ingest ──▶ date ──▶ qr ──▶ label ──▶ document
//! (rows)   (DD/MM/YYYY) (PNG) (elements) (PDF bytes)
//! ```
//!
//! 1. [`ingest`]   — read the tabular file, validate the header, build
//!    [`crate::manifest::ManifestRow`]s
//! 2. [`date`]     — normalize each group's DATA value, falling back to the
//!    raw text when nothing parses
//! 3. [`qr`]       — newline-join a group's serials and render the QR PNG
//! 4. [`label`]    — lay out one label per box as abstract elements
//! 5. [`document`] — serialize the element sequence to PDF bytes
//!
//! Grouping rows into boxes happens in [`crate::manifest`]; driving the
//! stages in order is [`crate::generate`]'s job.

pub mod date;
pub mod document;
pub mod ingest;
pub mod label;
pub mod qr;
