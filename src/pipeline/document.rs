//! PDF composition: abstract layout elements → document bytes.
//!
//! Pages are US Letter with half-inch margins. Elements flow top-down from
//! the top margin; [`Element::PageBreak`] starts the next page. Text is set
//! in the built-in Helvetica faces, so no font program is embedded and the
//! output stays small — a page is mostly its QR raster.
//!
//! PDF user space puts the origin at the *bottom*-left corner of the page.
//! The composer tracks a cursor holding the top of the unplaced region, in
//! points, and converts to bottom-left millimetres at each drawing call.

use crate::error::EtiquetaError;
use crate::fonts;
use crate::pipeline::label::{
    Element, LabelTable, FONT_SIZE_PT, GRID_PT, HEADER_GREY, LABEL_COL_PT, MARGIN_PT,
    PAGE_HEIGHT_PT, PAGE_WIDTH_PT, ROW_HEIGHT_PT, VALUE_COL_PT,
};
use crate::pipeline::qr::QrPng;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Pt, Rgb,
};
use std::io::Cursor;
use tracing::debug;

/// PDF metadata title.
const DOC_TITLE: &str = "Etiquetas de Retorno Reversa";
/// Name of the single content layer on every page.
const LAYER_NAME: &str = "Conteudo";

/// Serialize the element sequence into a finished PDF.
pub fn compose(elements: &[Element]) -> Result<Vec<u8>, EtiquetaError> {
    let mut composer = Composer::new()?;
    for element in elements {
        match element {
            Element::Spacer { height } => composer.spacer(*height),
            Element::Table(table) => composer.table(table),
            Element::QrImage { png, side_pt } => composer.qr_image(png, *side_pt)?,
            Element::PageBreak => composer.page_break(),
        }
    }
    composer.finish()
}

struct Composer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Top of the unplaced region, points above the page bottom.
    cursor: f64,
    pages: usize,
}

impl Composer {
    fn new() -> Result<Self, EtiquetaError> {
        let (doc, page, layer) =
            PdfDocument::new(DOC_TITLE, mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), LAYER_NAME);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_render)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_render)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT_PT - MARGIN_PT,
            pages: 1,
        })
    }

    fn finish(self) -> Result<Vec<u8>, EtiquetaError> {
        debug!(pages = self.pages, "serializing document");
        self.doc.save_to_bytes().map_err(pdf_render)
    }

    fn spacer(&mut self, height: f64) {
        self.cursor -= height;
    }

    fn page_break(&mut self) {
        let (page, layer) = self.doc.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT_PT - MARGIN_PT;
        self.pages += 1;
    }

    fn table(&mut self, table: &LabelTable) {
        let width = table.width_pt();
        let x0 = MARGIN_PT + (frame_width() - width) / 2.0;
        let top = self.cursor;

        // Paint order: header fill, then grid strokes, then text. Fill colour
        // doubles as text colour in PDF, so black is restored before text.
        if !table.rows.is_empty() {
            let row_bottom = top - ROW_HEIGHT_PT;
            let grey = HEADER_GREY as f32;
            self.layer
                .set_fill_color(Color::Rgb(Rgb::new(grey, grey, grey, None)));
            self.fill_rect(x0, row_bottom, LABEL_COL_PT, ROW_HEIGHT_PT);
            self.fill_rect(x0 + LABEL_COL_PT, row_bottom, VALUE_COL_PT, ROW_HEIGHT_PT);
        }

        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(GRID_PT as f32);
        for i in 0..table.rows.len() {
            let row_bottom = top - ROW_HEIGHT_PT * (i + 1) as f64;
            self.stroke_rect(x0, row_bottom, LABEL_COL_PT, ROW_HEIGHT_PT);
            self.stroke_rect(x0 + LABEL_COL_PT, row_bottom, VALUE_COL_PT, ROW_HEIGHT_PT);
        }

        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        for (i, (left, right)) in table.rows.iter().enumerate() {
            let bold = i == 0;
            let row_bottom = top - ROW_HEIGHT_PT * (i + 1) as f64;
            let baseline =
                row_bottom + (ROW_HEIGHT_PT - fonts::CAP_HEIGHT_EM * FONT_SIZE_PT) / 2.0;
            self.cell_text(left, bold, x0 + LABEL_COL_PT / 2.0, baseline);
            self.cell_text(right, bold, x0 + LABEL_COL_PT + VALUE_COL_PT / 2.0, baseline);
        }

        self.cursor -= table.height_pt();
    }

    fn qr_image(&mut self, png: &QrPng, side_pt: f64) -> Result<(), EtiquetaError> {
        let decoder = PngDecoder::new(Cursor::new(png.bytes.as_slice()))
            .map_err(|e| EtiquetaError::PdfRender {
                detail: format!("QR PNG decode: {e}"),
            })?;
        let image = Image::try_from(decoder).map_err(|e| EtiquetaError::PdfRender {
            detail: format!("QR image embed: {e}"),
        })?;

        // A raster prints at pixels/dpi inches; pinning dpi to the pixel
        // count over the wanted edge length scales it exactly.
        let side_inches = side_pt / 72.0;
        let dpi = f64::from(png.pixels) / side_inches;
        let x = MARGIN_PT + (frame_width() - side_pt) / 2.0;
        let y = self.cursor - side_pt;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(y)),
                dpi: Some(dpi as f32),
                ..Default::default()
            },
        );

        self.cursor -= side_pt;
        Ok(())
    }

    fn cell_text(&self, text: &str, bold: bool, center_x: f64, baseline_y: f64) {
        let font = if bold { &self.bold } else { &self.regular };
        let width = fonts::text_width_pt(text, bold, FONT_SIZE_PT);
        let x = center_x - width / 2.0;
        self.layer
            .use_text(text, FONT_SIZE_PT as f32, mm(x), mm(baseline_y), font);
    }

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
        self.layer.add_polygon(Polygon {
            rings: vec![rect_ring(x, y, w, h)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64) {
        self.layer.add_line(Line {
            points: rect_ring(x, y, w, h),
            is_closed: true,
        });
    }
}

fn frame_width() -> f64 {
    PAGE_WIDTH_PT - 2.0 * MARGIN_PT
}

/// Layout math runs in f64 points; printpdf's unit types take f32.
fn mm(points: f64) -> Mm {
    Mm::from(Pt(points as f32))
}

fn rect_ring(x: f64, y: f64, w: f64, h: f64) -> Vec<(Point, bool)> {
    [(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
        .into_iter()
        .map(|(px, py)| (Point::new(mm(px), mm(py)), false))
        .collect()
}

fn pdf_render(e: printpdf::Error) -> EtiquetaError {
    EtiquetaError::PdfRender {
        detail: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::qr::encode_serials;

    fn table() -> LabelTable {
        LabelTable {
            rows: vec![
                ("CLARO".into(), "ETIQUETA DE RETORNO REVERSA".into()),
                ("NOME".into(), "LOJA".into()),
            ],
        }
    }

    #[test]
    fn empty_sequence_is_a_one_page_pdf() {
        let bytes = compose(&[]).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn page_breaks_add_pages() {
        let bytes = compose(&[Element::PageBreak, Element::PageBreak]).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn full_label_sequence_composes() {
        let png = encode_serials(&["S1", "S2"]).unwrap();
        let elements = vec![
            Element::Spacer { height: 30.0 },
            Element::Table(table()),
            Element::Spacer { height: 20.0 },
            Element::QrImage {
                png,
                side_pt: 144.0,
            },
        ];
        let bytes = compose(&elements).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn strokes_and_header_fill_reach_the_content_stream() {
        let bytes = compose(&[Element::Table(table())]).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let raw = doc.get_page_content(page_id).unwrap();
        let content = lopdf::content::Content::decode(&raw).unwrap();

        fn number(obj: &lopdf::Object) -> f64 {
            match obj {
                lopdf::Object::Integer(i) => *i as f64,
                lopdf::Object::Real(r) => f64::from(*r),
                other => panic!("expected number, got {other:?}"),
            }
        }

        let ops = &content.operations;
        assert!(
            ops.iter()
                .any(|op| op.operator == "w" && (number(&op.operands[0]) - GRID_PT).abs() < 0.01),
            "grid stroke width should reach the page"
        );
        assert!(
            ops.iter().any(|op| {
                op.operator == "rg" && (number(&op.operands[0]) - HEADER_GREY).abs() < 0.01
            }),
            "header grey fill should reach the page"
        );
    }
}
