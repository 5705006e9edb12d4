//! Advance-width metrics for the built-in Helvetica faces.
//!
//! Labels use the PDF "standard 14" Helvetica fonts, which viewers ship and
//! documents never embed. That keeps the output small, but it also means the
//! composer has no font file to measure text against, so the AFM advance
//! widths are compiled in here. Widths are in 1/1000 em, straight from the
//! Adobe AFM tables, covering printable ASCII; anything outside that range
//! falls back to an average width, which keeps accented Latin-1 strings
//! within a point of true centre.

/// Cap height of Helvetica and Helvetica-Bold, in 1/1000 em.
///
/// Used to optically centre a single line of text in a table cell: the
/// visual mass of upper-case Latin text sits between the baseline and the
/// cap line, so centring that band looks right where centring the full em
/// box would sit the text too low.
pub const CAP_HEIGHT_EM: f64 = 0.718;

/// Width assumed for characters outside the ASCII table.
const DEFAULT_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667,
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556,
    556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    333, 333, 584, 584, 584, 611, 975,
    // A-Z
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667,
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    333, 278, 333, 584, 556, 333,
    // a-z
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611,
    611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // { | } ~
    389, 280, 389, 584,
];

/// Width of `text` set in Helvetica (or Helvetica-Bold) at `size` points.
pub fn text_width_pt(text: &str, bold: bool, size: f64) -> f64 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let units: u64 = text.chars().map(|c| u64::from(char_width(table, c))).sum();
    units as f64 * size / 1000.0
}

fn char_width(table: &[u16; 95], c: char) -> u16 {
    let cp = c as u32;
    if (32..=126).contains(&cp) {
        table[(cp - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_width_matches_afm() {
        // Digits are 556/1000 em in both faces.
        let w = text_width_pt("0", false, 12.0);
        assert!((w - 6.672).abs() < 1e-9, "got {w}");
        let wb = text_width_pt("0", true, 12.0);
        assert!((wb - 6.672).abs() < 1e-9, "got {wb}");
    }

    #[test]
    fn claro_header_width() {
        // C 722 + L 611 + A 722 + R 722 + O 778 = 3555 units.
        let w = text_width_pt("CLARO", true, 12.0);
        assert!((w - 42.66).abs() < 1e-9, "got {w}");
    }

    #[test]
    fn bold_is_at_least_as_wide_as_regular() {
        let text = "ETIQUETA DE RETORNO REVERSA";
        assert!(text_width_pt(text, true, 12.0) >= text_width_pt(text, false, 12.0));
    }

    #[test]
    fn non_ascii_uses_fallback_width() {
        let w = text_width_pt("Ã", false, 10.0);
        assert!((w - 5.56).abs() < 1e-9, "got {w}");
    }

    #[test]
    fn empty_text_has_zero_width() {
        assert_eq!(text_width_pt("", false, 12.0), 0.0);
    }
}
