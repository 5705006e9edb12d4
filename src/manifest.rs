//! The manifest data model: typed rows and per-box groups.
//!
//! A manifest is one row per serialized unit. Rows are read once by
//! [`crate::pipeline::ingest`], validated against [`REQUIRED_COLUMNS`] at load
//! time, and never mutated afterwards. Column access happens through struct
//! fields, so a missing column fails fast during ingest instead of panicking
//! midway through rendering.

use chrono::NaiveDateTime;

/// Column headers the manifest must carry — case-sensitive, exactly as the
/// upstream export writes them. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "CAIXA",
    "NOME",
    "DATA",
    "CD",
    "CIDADE",
    "COD._ITEM",
    "DESCRICAO",
    "N._Nfe",
    "LOTE",
    "SERIAL",
];

/// The raw DATA cell of a row.
///
/// Workbook cells can hold a native date/datetime, which calamine hands us as
/// a typed value; everything else (CSV fields included) arrives as text. The
/// distinction matters to [`crate::pipeline::date::normalize`]: timestamps
/// format directly, text goes through the parse-or-fall-back path.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    /// The cell's text, trimmed.
    Text(String),
    /// A native spreadsheet date/datetime cell.
    Timestamp(NaiveDateTime),
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue::Text(String::new())
    }
}

/// One serialized unit: a single manifest row.
///
/// All fields are opaque strings except [`data`](Self::data). Numeric cells
/// (invoice numbers, box ids) are stringified at ingest with integral floats
/// losing their `.0`, so `12345.0` labels as `12345`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestRow {
    /// Box id, the grouping key (`CAIXA`).
    pub caixa: String,
    /// Recipient name (`NOME`).
    pub nome: String,
    /// Shipment date cell (`DATA`).
    pub data: DateValue,
    /// Distribution-center code (`CD`).
    pub cd: String,
    /// City (`CIDADE`).
    pub cidade: String,
    /// Item code (`COD._ITEM`).
    pub cod_item: String,
    /// Item description (`DESCRICAO`).
    pub descricao: String,
    /// Invoice number (`N._Nfe`).
    pub n_nfe: String,
    /// Lot number (`LOTE`).
    pub lote: String,
    /// Unit serial number (`SERIAL`).
    pub serial: String,
}

/// The rows sharing one box id, in input order.
///
/// Non-serial fields are assumed identical across the group; the label takes
/// them from the first row. Groups are never empty by construction — one is
/// only created when its first row is seen.
#[derive(Debug)]
pub struct BoxGroup<'a> {
    /// The box id shared by every row in the group.
    pub caixa: &'a str,
    /// Member rows, original manifest order.
    pub rows: Vec<&'a ManifestRow>,
}

impl<'a> BoxGroup<'a> {
    /// The first row, source of every non-quantity field on the label.
    pub fn first(&self) -> &'a ManifestRow {
        self.rows[0]
    }

    /// Number of units in the box (the QUANTIDADE field).
    pub fn quantity(&self) -> usize {
        self.rows.len()
    }

    /// Serial numbers in input order, one per row.
    pub fn serials(&self) -> Vec<&'a str> {
        self.rows.iter().map(|r| r.serial.as_str()).collect()
    }
}

/// Partition rows into per-box groups, preserving first-occurrence order.
///
/// The output order is the order each distinct `CAIXA` value first appears in
/// the manifest — stable, never sorted — because warehouse staff match pages
/// against the physical stack of boxes, which was packed in manifest order.
/// Rows of the same box that appear apart in the input still join one group.
///
/// The linear scan per row is quadratic in the number of distinct boxes,
/// which stays trivially small for label batches.
pub fn group_by_box(rows: &[ManifestRow]) -> Vec<BoxGroup<'_>> {
    let mut groups: Vec<BoxGroup<'_>> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.caixa == row.caixa) {
            Some(group) => group.rows.push(row),
            None => groups.push(BoxGroup {
                caixa: &row.caixa,
                rows: vec![row],
            }),
        }
    }
    groups
}
