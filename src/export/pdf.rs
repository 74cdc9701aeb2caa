//! PDF export: embed a chart image into a landscape document.

use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::error::ExportError;

// Landscape A4
const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 10.0;

// Placement resolution for the embedded image
const DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

/// Uniform scale that fits an image of the given pixel size inside the
/// page margins, preserving aspect ratio. Charts smaller than the page
/// are scaled up to fill it.
fn fit_scale(width_px: usize, height_px: usize) -> f32 {
    let width_mm = width_px.max(1) as f32 * MM_PER_INCH / DPI;
    let height_mm = height_px.max(1) as f32 * MM_PER_INCH / DPI;
    let max_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let max_height = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
    (max_width / width_mm).min(max_height / height_mm)
}

/// Build a one-page landscape PDF with the chart PNG placed at the
/// margin and scaled to fit the page.
pub fn build_chart_pdf(png_bytes: &[u8], title: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "chart",
    );

    let decoder = PngDecoder::new(Cursor::new(png_bytes))
        .map_err(|e| ExportError::Pdf(format!("invalid PNG: {}", e)))?;
    let image = Image::try_from(decoder)
        .map_err(|e| ExportError::Pdf(format!("image decode failed: {}", e)))?;

    let scale = fit_scale(image.image.width.0, image.image.height.0);

    image.add_to_layer(
        doc.get_page(page).get_layer(layer),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_MM)),
            translate_y: Some(Mm(MARGIN_MM)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(DPI),
            ..Default::default()
        },
    );

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG: 1x1 grayscale pixel
    fn tiny_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        // signature
        bytes.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        // IHDR: 1x1, bit depth 8, color type 0
        push_chunk(
            &mut bytes,
            b"IHDR",
            &[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0],
        );
        // IDAT: zlib-wrapped scanline (filter 0, one gray byte)
        push_chunk(
            &mut bytes,
            b"IDAT",
            &[0x78, 0x01, 0x63, 0x60, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01],
        );
        push_chunk(&mut bytes, b"IEND", &[]);
        bytes
    }

    fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        let mut crc_input = Vec::with_capacity(4 + data.len());
        crc_input.extend_from_slice(kind);
        crc_input.extend_from_slice(data);
        out.extend_from_slice(&crc32(&crc_input).to_be_bytes());
    }

    fn crc32(data: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for &byte in data {
            crc ^= byte as u32;
            for _ in 0..8 {
                let mask = (crc & 1).wrapping_neg();
                crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
            }
        }
        !crc
    }

    #[test]
    fn test_build_chart_pdf_from_png() {
        let bytes = build_chart_pdf(&tiny_png(), "Chart Visualization").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_fit_scale_shrinks_oversized_charts() {
        // 4000x2000 px at 300 dpi is wider than the printable area
        let scale = fit_scale(4000, 2000);
        assert!(scale < 1.0);

        let scaled_width_mm = 4000.0 * MM_PER_INCH / DPI * scale;
        let scaled_height_mm = 2000.0 * MM_PER_INCH / DPI * scale;
        assert!(scaled_width_mm <= PAGE_WIDTH_MM - 2.0 * MARGIN_MM + 0.01);
        assert!(scaled_height_mm <= PAGE_HEIGHT_MM - 2.0 * MARGIN_MM + 0.01);
    }

    #[test]
    fn test_fit_scale_expands_small_charts() {
        assert!(fit_scale(100, 100) > 1.0);
    }

    #[test]
    fn test_invalid_png_is_an_error() {
        let result = build_chart_pdf(b"not a png", "Chart");
        assert!(matches!(result, Err(ExportError::Pdf(_))));
    }
}
