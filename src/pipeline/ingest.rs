//! Manifest ingest: tabular file → validated [`ManifestRow`]s.
//!
//! Two readers hide behind one entry point: calamine auto-detects xlsx, xls,
//! xlsb, and ods workbooks, while `.csv` goes through the csv crate. Both
//! paths feed the same header-validation and cell-conversion code, so the
//! rest of the pipeline never knows which format it came from.
//!
//! Validation is fail-fast. The header row is matched case-sensitively
//! against [`REQUIRED_COLUMNS`] before any row is built, and every missing
//! column is reported in a single error — nobody fixes a manifest one
//! column per run.

use crate::config::SheetSelection;
use crate::error::EtiquetaError;
use crate::manifest::{DateValue, ManifestRow, REQUIRED_COLUMNS};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

/// Read and validate the manifest at `path`.
///
/// Dispatch is by extension: `.csv` is CSV, everything else goes to the
/// workbook auto-detector. `sheet` applies only to workbooks. A valid header
/// with zero data rows is [`EtiquetaError::EmptyManifest`] — a blank label
/// sheet helps nobody at the packing bench.
pub fn read_manifest(
    path: &Path,
    sheet: &SheetSelection,
) -> Result<Vec<ManifestRow>, EtiquetaError> {
    if !path.exists() {
        return Err(EtiquetaError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let rows = if is_csv {
        read_csv(path)?
    } else {
        read_workbook(path, sheet)?
    };

    if rows.is_empty() {
        return Err(EtiquetaError::EmptyManifest);
    }
    debug!(rows = rows.len(), "manifest loaded");
    Ok(rows)
}

fn read_workbook(
    path: &Path,
    sheet: &SheetSelection,
) -> Result<Vec<ManifestRow>, EtiquetaError> {
    let data_source = |detail: String| EtiquetaError::DataSource {
        path: path.to_path_buf(),
        detail,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| data_source(e.to_string()))?;
    let names = workbook.sheet_names();
    let sheet_name = sheet.resolve(&names)?;
    debug!(sheet = %sheet_name, "reading worksheet");

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| data_source(e.to_string()))?;

    let mut cells_rows = range.rows();
    let header = cells_rows.next().ok_or_else(|| EtiquetaError::MissingColumns {
        missing: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
    })?;
    let headers: Vec<String> = header.iter().map(cell_to_string).collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for cells in cells_rows {
        if cells.iter().all(is_blank) {
            continue;
        }
        let text = |i: usize| cell_to_string(cells.get(i).unwrap_or(&Data::Empty));
        rows.push(ManifestRow {
            caixa: text(index.caixa),
            nome: text(index.nome),
            data: date_value(cells.get(index.data).unwrap_or(&Data::Empty)),
            cd: text(index.cd),
            cidade: text(index.cidade),
            cod_item: text(index.cod_item),
            descricao: text(index.descricao),
            n_nfe: text(index.n_nfe),
            lote: text(index.lote),
            serial: text(index.serial),
        });
    }
    Ok(rows)
}

fn read_csv(path: &Path) -> Result<Vec<ManifestRow>, EtiquetaError> {
    let data_source = |detail: String| EtiquetaError::DataSource {
        path: path.to_path_buf(),
        detail,
    };

    // flexible: a short record means trailing blank cells, not a hard error.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| data_source(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| data_source(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| data_source(e.to_string()))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let text = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        rows.push(ManifestRow {
            caixa: text(index.caixa),
            nome: text(index.nome),
            data: DateValue::Text(text(index.data)),
            cd: text(index.cd),
            cidade: text(index.cidade),
            cod_item: text(index.cod_item),
            descricao: text(index.descricao),
            n_nfe: text(index.n_nfe),
            lote: text(index.lote),
            serial: text(index.serial),
        });
    }
    Ok(rows)
}

/// Positions of the required columns within the header row.
///
/// Resolved once per run; row construction is then plain indexing, never a
/// by-name lookup that could fail halfway through the file.
struct ColumnIndex {
    caixa: usize,
    nome: usize,
    data: usize,
    cd: usize,
    cidade: usize,
    cod_item: usize,
    descricao: usize,
    n_nfe: usize,
    lote: usize,
    serial: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, EtiquetaError> {
        let mut missing = Vec::new();
        // 0 is a placeholder; it is discarded with the error below.
        let mut col = |name: &'static str| match headers.iter().position(|h| h == name) {
            Some(i) => i,
            None => {
                missing.push(name.to_string());
                0
            }
        };
        let index = ColumnIndex {
            caixa: col("CAIXA"),
            nome: col("NOME"),
            data: col("DATA"),
            cd: col("CD"),
            cidade: col("CIDADE"),
            cod_item: col("COD._ITEM"),
            descricao: col("DESCRICAO"),
            n_nfe: col("N._Nfe"),
            lote: col("LOTE"),
            serial: col("SERIAL"),
        };
        if missing.is_empty() {
            Ok(index)
        } else {
            Err(EtiquetaError::MissingColumns { missing })
        }
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Convert a cell to the string the label shows.
///
/// Floats with a zero fraction lose the trailing `.0`: box ids and invoice
/// numbers arrive as spreadsheet numerics and must print as integers.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    }
}

/// The DATA column keeps native date cells typed so the normalizer can
/// format them without a text round-trip.
fn date_value(cell: &Data) -> DateValue {
    match cell {
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => DateValue::Timestamp(ts),
            None => DateValue::Text(dt.as_f64().to_string()),
        },
        other => DateValue::Text(cell_to_string(other)),
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}
