//! QR encoding of a box's serial numbers.
//!
//! Serials are joined with newlines, not commas, so a phone scan shows one
//! serial per line and downstream systems can split the payload without
//! guessing a delimiter. The symbol version is auto-selected (smallest that
//! fits at the default error-correction level) and rendered black-on-white
//! at a fixed module size with the standard 4-module quiet zone.
//!
//! The stage hands PNG bytes to the composer rather than a pixel buffer.
//! PNG is the one format both ends already speak, and it keeps the raster
//! library out of the composer's signature.

use crate::error::EtiquetaError;
use image::Luma;
use qrcode::{types::QrError, QrCode};
use std::io::Cursor;

/// Pixels per QR module in the rendered raster.
const MODULE_PIXELS: u32 = 10;

/// A rendered QR symbol, PNG-encoded.
#[derive(Debug, Clone)]
pub struct QrPng {
    /// PNG bytes, black modules on white, square, positioned at the start.
    pub bytes: Vec<u8>,
    /// Edge length in pixels; the composer derives print DPI from this.
    pub pixels: u32,
}

/// Join `serials` with newlines and render the QR symbol as a PNG.
///
/// Fails with [`EtiquetaError::QrCapacity`] when the joined payload exceeds
/// what the largest QR version can hold.
pub fn encode_serials<S: AsRef<str>>(serials: &[S]) -> Result<QrPng, EtiquetaError> {
    let payload = serials
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");

    let code = QrCode::new(payload.as_bytes()).map_err(|err| match err {
        QrError::DataTooLong => EtiquetaError::QrCapacity {
            serials: serials.len(),
            bytes: payload.len(),
        },
        other => EtiquetaError::QrEncode {
            detail: other.to_string(),
        },
    })?;

    let img = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .quiet_zone(true)
        .build();
    let pixels = img.width();

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|err| EtiquetaError::QrEncode {
            detail: err.to_string(),
        })?;

    Ok(QrPng { bytes, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(qr: &QrPng) -> String {
        let img = image::load_from_memory(&qr.bytes).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            img.width() as usize,
            img.height() as usize,
            |x, y| img.get_pixel(x as u32, y as u32)[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "expected exactly one QR symbol");
        let (_meta, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn output_is_png() {
        let qr = encode_serials(&["S1"]).unwrap();
        assert_eq!(&qr.bytes[..4], b"\x89PNG");
    }

    #[test]
    fn payload_round_trips_through_a_scanner() {
        let qr = encode_serials(&["SER-001", "SER-002", "SER-003"]).unwrap();
        assert_eq!(decode(&qr), "SER-001\nSER-002\nSER-003");
    }

    #[test]
    fn single_serial_has_no_separator() {
        let qr = encode_serials(&["UNICO-123"]).unwrap();
        assert_eq!(decode(&qr), "UNICO-123");
    }

    #[test]
    fn serial_order_is_preserved() {
        let serials = ["Z9", "A1", "M5"];
        let qr = encode_serials(&serials).unwrap();
        let decoded = decode(&qr);
        let parts: Vec<&str> = decoded.split('\n').collect();
        assert_eq!(parts, serials);
    }

    #[test]
    fn pixel_size_includes_quiet_zone() {
        // Smallest symbol: 21 modules + 4 quiet on each side, 10 px each.
        let qr = encode_serials(&["S1"]).unwrap();
        assert!(qr.pixels >= 290, "got {}", qr.pixels);
        assert_eq!(qr.pixels % MODULE_PIXELS, 0);

        let img = image::load_from_memory(&qr.bytes).unwrap().to_luma8();
        assert_eq!(img.width(), qr.pixels);
        assert_eq!(img.height(), qr.pixels);
    }

    #[test]
    fn renders_black_on_white() {
        let qr = encode_serials(&["S1"]).unwrap();
        let img = image::load_from_memory(&qr.bytes).unwrap().to_luma8();
        // Quiet zone is white; the finder-pattern core is black.
        assert_eq!(img.get_pixel(5, 5)[0], 255);
        assert_eq!(img.get_pixel(75, 75)[0], 0);
    }

    #[test]
    fn oversized_payload_reports_capacity() {
        // Lowercase padding keeps the payload in 8-bit byte mode (digit-only
        // serials would pack in numeric mode and fit). Thirty 100-byte
        // serials join to 3029 bytes, past the 2331-byte ceiling of version
        // 40 at the default error-correction level.
        let serials: Vec<String> = (0..30).map(|i| format!("{i:a>100}")).collect();
        let err = encode_serials(&serials).unwrap_err();
        match err {
            EtiquetaError::QrCapacity { serials, bytes } => {
                assert_eq!(serials, 30);
                assert!(bytes > 2331, "got {bytes}");
            }
            other => panic!("expected QrCapacity, got: {other}"),
        }
    }
}
