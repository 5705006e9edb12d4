//! Per-box label layout.
//!
//! A label is a fixed sequence of abstract elements: a spacer, an 11-row
//! key/value table, another spacer, and the QR image. The constants below
//! are presentation decisions locked to the printed sheet the warehouses
//! already use; none of them is configurable, so labels from any machine
//! come out identical.
//!
//! This module only *describes* the page. Turning elements into PDF
//! operations is [`crate::pipeline::document`]'s job.

use crate::error::EtiquetaError;
use crate::manifest::BoxGroup;
use crate::pipeline::date::NormalizedDate;
use crate::pipeline::qr::{self, QrPng};

// ── Page geometry (points) ────────────────────────────────────────────────

/// US Letter page width.
pub const PAGE_WIDTH_PT: f64 = 612.0;
/// US Letter page height.
pub const PAGE_HEIGHT_PT: f64 = 792.0;
/// Margin on all four sides (0.5 in).
pub const MARGIN_PT: f64 = 36.0;

// ── Table presentation ────────────────────────────────────────────────────

/// Left cell of the static header row.
pub const HEADER_LEFT: &str = "CLARO";
/// Right cell of the static header row.
pub const HEADER_RIGHT: &str = "ETIQUETA DE RETORNO REVERSA";
/// Key column width (3 in).
pub const LABEL_COL_PT: f64 = 216.0;
/// Value column width (4 in).
pub const VALUE_COL_PT: f64 = 288.0;
/// Height of every table row.
pub const ROW_HEIGHT_PT: f64 = 25.0;
/// Cell text size.
pub const FONT_SIZE_PT: f64 = 12.0;
/// Light grey (#D3D3D3) fill behind the two header cells.
pub const HEADER_GREY: f64 = 0.827;
/// Grid stroke width.
pub const GRID_PT: f64 = 1.0;

// ── Vertical rhythm ───────────────────────────────────────────────────────

/// Gap between the top margin and the table.
pub const TOP_SPACER_PT: f64 = 30.0;
/// Gap between the table and the QR image.
pub const QR_SPACER_PT: f64 = 20.0;
/// Printed QR edge length (2 in, square).
pub const QR_SIDE_PT: f64 = 144.0;

/// One abstract layout element.
///
/// The composer consumes these in order, flowing top-down from the top
/// margin and starting a fresh page at every [`Element::PageBreak`].
#[derive(Debug, Clone)]
pub enum Element {
    /// Vertical gap of the given height in points.
    Spacer { height: f64 },
    /// The key/value table, horizontally centred in the frame.
    Table(LabelTable),
    /// A QR image, horizontally centred, printed square at `side_pt`.
    QrImage { png: QrPng, side_pt: f64 },
    /// Start a new page.
    PageBreak,
}

/// The label's table: a bold header row plus ten field rows.
#[derive(Debug, Clone)]
pub struct LabelTable {
    /// (left cell, right cell) pairs, top to bottom.
    pub rows: Vec<(String, String)>,
}

impl LabelTable {
    /// Total table height in points.
    pub fn height_pt(&self) -> f64 {
        self.rows.len() as f64 * ROW_HEIGHT_PT
    }

    /// Total table width in points.
    pub fn width_pt(&self) -> f64 {
        LABEL_COL_PT + VALUE_COL_PT
    }
}

/// Lay out one box's label: spacer, table, spacer, QR image.
///
/// Metadata comes from the group's first row, QUANTIDADE from its row count,
/// and the QR payload from its serials in input order. The only failure mode
/// is the QR encoder's; a page break between labels is the driver's call,
/// not the label's.
pub fn render_label(
    group: &BoxGroup<'_>,
    date: &NormalizedDate,
) -> Result<Vec<Element>, EtiquetaError> {
    let first = group.first();
    let rows = vec![
        (HEADER_LEFT.to_string(), HEADER_RIGHT.to_string()),
        ("NOME".to_string(), first.nome.clone()),
        ("DATA".to_string(), date.display().to_string()),
        ("CD".to_string(), first.cd.clone()),
        ("CIDADE".to_string(), first.cidade.clone()),
        ("COD._ITEM".to_string(), first.cod_item.clone()),
        ("DESCRICAO".to_string(), first.descricao.clone()),
        ("QUANTIDADE".to_string(), group.quantity().to_string()),
        ("N._Nfe".to_string(), first.n_nfe.clone()),
        ("CAIXA".to_string(), first.caixa.clone()),
        ("LOTE".to_string(), first.lote.clone()),
    ];

    let png = qr::encode_serials(&group.serials())?;

    Ok(vec![
        Element::Spacer {
            height: TOP_SPACER_PT,
        },
        Element::Table(LabelTable { rows }),
        Element::Spacer {
            height: QR_SPACER_PT,
        },
        Element::QrImage {
            png,
            side_pt: QR_SIDE_PT,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{group_by_box, DateValue, ManifestRow};

    fn sample_rows() -> Vec<ManifestRow> {
        let base = ManifestRow {
            caixa: "CX-01".into(),
            nome: "LOJA CENTRO".into(),
            data: DateValue::Text("05/03/2024".into()),
            cd: "CD-SP".into(),
            cidade: "SAO PAULO".into(),
            cod_item: "IT-77".into(),
            descricao: "ROTEADOR".into(),
            n_nfe: "12345".into(),
            lote: "L-9".into(),
            serial: "S1".into(),
        };
        let mut second = base.clone();
        second.serial = "S2".into();
        vec![base, second]
    }

    fn render_sample() -> Vec<Element> {
        let rows = sample_rows();
        let groups = group_by_box(&rows);
        let date = NormalizedDate::Parsed("05/03/2024".into());
        render_label(&groups[0], &date).unwrap()
    }

    #[test]
    fn label_is_spacer_table_spacer_qr() {
        let elements = render_sample();
        assert_eq!(elements.len(), 4);
        assert!(matches!(elements[0], Element::Spacer { height } if height == TOP_SPACER_PT));
        assert!(matches!(elements[1], Element::Table(_)));
        assert!(matches!(elements[2], Element::Spacer { height } if height == QR_SPACER_PT));
        assert!(matches!(elements[3], Element::QrImage { side_pt, .. } if side_pt == QR_SIDE_PT));
    }

    #[test]
    fn table_rows_are_fixed_and_ordered() {
        let elements = render_sample();
        let Element::Table(table) = &elements[1] else {
            panic!("second element must be the table");
        };
        let keys: Vec<&str> = table.rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "CLARO",
                "NOME",
                "DATA",
                "CD",
                "CIDADE",
                "COD._ITEM",
                "DESCRICAO",
                "QUANTIDADE",
                "N._Nfe",
                "CAIXA",
                "LOTE",
            ]
        );
        assert_eq!(table.rows[0].1, HEADER_RIGHT);
    }

    #[test]
    fn quantidade_is_the_row_count() {
        let elements = render_sample();
        let Element::Table(table) = &elements[1] else {
            panic!("second element must be the table");
        };
        assert_eq!(table.rows[7], ("QUANTIDADE".to_string(), "2".to_string()));
    }

    #[test]
    fn data_row_shows_the_normalized_display() {
        let rows = sample_rows();
        let groups = group_by_box(&rows);
        let date = NormalizedDate::Fallback("N/A".into());
        let elements = render_label(&groups[0], &date).unwrap();
        let Element::Table(table) = &elements[1] else {
            panic!("second element must be the table");
        };
        assert_eq!(table.rows[2], ("DATA".to_string(), "N/A".to_string()));
    }

    #[test]
    fn table_geometry_matches_the_sheet() {
        let elements = render_sample();
        let Element::Table(table) = &elements[1] else {
            panic!("second element must be the table");
        };
        assert_eq!(table.height_pt(), 275.0);
        assert_eq!(table.width_pt(), 504.0);
    }

    #[test]
    fn qr_failure_propagates() {
        // Lowercase padding forces QR byte mode; 40 serials of 100 bytes
        // exceed every symbol version.
        let mut rows = Vec::new();
        for i in 0..40 {
            rows.push(ManifestRow {
                caixa: "CX-XL".into(),
                serial: format!("{i:a>100}"),
                ..ManifestRow::default()
            });
        }
        let groups = group_by_box(&rows);
        let date = NormalizedDate::Fallback("N/A".into());
        let err = render_label(&groups[0], &date).unwrap_err();
        assert!(matches!(err, EtiquetaError::QrCapacity { .. }));
    }
}
