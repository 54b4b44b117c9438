//! Integration tests for font selection and text output.
//!
//! Tests cover:
//! - Standard fonts and their encodings
//! - Text metrics queries
//! - TrueType fonts supplied through a custom metrics source
//! - Degraded behaviour for unknown fonts

use bytes::Bytes;
use pdf_scribe::fonts::metrics::{FontKind, FontMetrics, MemoryMetricsSource};
use pdf_scribe::writer::FontDifferences;
use pdf_scribe::{PdfConfig, PdfWriter};
use std::collections::BTreeMap;

fn debug_text(writer: &PdfWriter) -> String {
    String::from_utf8_lossy(&writer.output_debug().unwrap()).into_owned()
}

fn page_text(writer: &PdfWriter) -> String {
    String::from_utf8_lossy(&writer.store().contents(writer.current_contents()).unwrap().data).into_owned()
}

/// TrueType metrics whose program is not a real font, so subsetting
/// falls back to embedding it whole.
fn fake_truetype(name: &str) -> FontMetrics {
    let codepoints = [32u32, 65, 66, 97, 0x0634];
    let widths: BTreeMap<u32, u16> = codepoints.iter().map(|&cp| (cp, 500 + cp as u16 % 100)).collect();
    let glyph_ids = codepoints
        .iter()
        .enumerate()
        .map(|(i, &cp)| (cp, i as u16 + 1))
        .collect();
    FontMetrics {
        name: name.to_string(),
        kind: FontKind::TrueType,
        widths,
        glyph_ids,
        missing_width: 500,
        bbox: [-100, -200, 1000, 900],
        ascender: 800,
        descender: -200,
        cap_height: 700,
        x_height: 500,
        italic_angle: 0.0,
        stem_v: 80,
        flags: 32,
        program: Some(Bytes::from_static(b"not really a font program")),
    }
}

fn writer_with_truetype(config: PdfConfig) -> PdfWriter {
    let source = MemoryMetricsSource::new().with_font("Demo", fake_truetype("DemoSans"));
    PdfWriter::with_config(config.with_compress(false)).with_metrics_source(source)
}

mod standard_font_tests {
    use super::*;

    #[test]
    fn test_select_returns_stable_numbers() {
        let mut writer = PdfWriter::new();
        assert_eq!(writer.select_font("Helvetica", None, true, false).unwrap(), Some(1));
        assert_eq!(writer.select_font("Times-Roman", None, false, false).unwrap(), Some(2));
        assert_eq!(writer.select_font("Helvetica", None, false, false).unwrap(), Some(1));
        assert_eq!(writer.current_font(), Some("Helvetica"));
        let pdf = debug_text(&writer);
        assert_eq!(pdf.matches("/Type /Font").count(), 2);
        assert!(pdf.contains("/F1 "));
        assert!(pdf.contains("/F2 "));
    }

    #[test]
    fn test_winansi_text() {
        let mut writer = PdfWriter::new();
        writer.select_font("Helvetica", None, true, false).unwrap();
        writer.add_text(10.0, 20.0, 12.0, "Caf\u{e9} \u{20ac}5", 0.0, 0.0, 0.0).unwrap();
        let data = writer.store().contents(writer.current_contents()).unwrap().data.clone();
        let needle = b"(Caf\xE9 \x805) Tj";
        assert!(data.windows(needle.len()).any(|w| w == needle));
        assert!(debug_text(&writer).contains("/Encoding /WinAnsiEncoding"));
    }

    #[test]
    fn test_differences_encoding() {
        let mut writer = PdfWriter::new();
        let differences = FontDifferences::new().with(0x41, "Euro");
        writer
            .select_font("Times-Roman", Some(&differences), true, false)
            .unwrap();
        writer.add_text(0.0, 0.0, 10.0, "\u{20ac}", 0.0, 0.0, 0.0).unwrap();
        assert!(page_text(&writer).contains("(A) Tj"));
        let pdf = debug_text(&writer);
        assert!(pdf.contains("/Differences [65 /Euro]"));
    }

    #[test]
    fn test_symbol_font_has_no_encoding() {
        let mut writer = PdfWriter::new();
        writer.select_font("Symbol", None, true, false).unwrap();
        let pdf = debug_text(&writer);
        assert!(pdf.contains("/BaseFont /Symbol"));
        assert!(!pdf.contains("/Encoding"));
    }

    #[test]
    fn test_text_width() {
        let mut writer = PdfWriter::new();
        writer.select_font("Courier", None, true, false).unwrap();
        assert!((writer.text_width(10.0, "abc", 0.0, 0.0).unwrap() - 18.0).abs() < 1e-4);
        // one space gets the word spacing, every char the char spacing
        assert!((writer.text_width(10.0, "a b", 2.0, 1.0).unwrap() - 23.0).abs() < 1e-4);

        writer.select_font("Helvetica", None, true, false).unwrap();
        assert!((writer.text_width(10.0, "Hello", 0.0, 0.0).unwrap() - 22.78).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_metrics() {
        let mut writer = PdfWriter::new();
        writer.select_font("Helvetica", None, true, false).unwrap();
        assert!((writer.font_height(10.0).unwrap() - 11.56).abs() < 1e-3);
        assert!((writer.font_descender(10.0).unwrap() + 2.07).abs() < 1e-3);
        assert!((writer.font_x_height(10.0).unwrap() - 5.23).abs() < 1e-3);
        assert_eq!(writer.font_bbox().unwrap(), Some([-166, -225, 1000, 931]));
    }

    #[test]
    fn test_metrics_default_to_configured_font() {
        let mut writer = PdfWriter::with_config(PdfConfig::new().with_default_font("Courier"));
        assert!((writer.text_width(10.0, "ab", 0.0, 0.0).unwrap() - 12.0).abs() < 1e-4);
        assert_eq!(writer.current_font(), Some("Courier"));
    }

    #[test]
    fn test_rotated_text() {
        let mut writer = PdfWriter::new();
        writer.select_font("Helvetica", None, true, false).unwrap();
        writer.add_text(100.0, 200.0, 12.0, "Up", 90.0, 0.0, 0.0).unwrap();
        assert!(page_text(&writer).contains("0 1 -1 0 100 200 Tm"));
    }

    #[test]
    fn test_spacing_does_not_leak_into_next_text() {
        let mut writer = PdfWriter::new();
        writer.select_font("Helvetica", None, true, false).unwrap();
        writer.add_text(10.0, 10.0, 12.0, "spaced", 0.0, 3.0, 0.5).unwrap();
        writer.add_text(10.0, 30.0, 12.0, "plain", 0.0, 0.0, 0.0).unwrap();

        let text = page_text(&writer);
        assert!(text.contains("3 Tw\n0.5 Tc\n/F1 12 Tf\n(spaced) Tj\nET\n0 Tw\n0 Tc\nBT"));
        let plain = &text[text.find("(plain)").unwrap()..];
        assert!(!plain.contains("Tw") && !plain.contains("Tc"));
    }

    #[test]
    fn test_word_spacing_alone_resets_only_word_spacing() {
        let mut writer = PdfWriter::new();
        writer.select_font("Helvetica", None, true, false).unwrap();
        writer.add_text(0.0, 0.0, 10.0, "a b", 0.0, 2.0, 0.0).unwrap();
        let text = page_text(&writer);
        assert!(text.ends_with("ET\n0 Tw"));
        assert!(!text.contains("Tc"));
    }
}

mod missing_font_tests {
    use super::*;

    #[test]
    fn test_unknown_font_is_reported() {
        let mut writer = PdfWriter::new();
        assert_eq!(writer.select_font("NoSuchFont", None, true, false).unwrap(), None);
        assert!(writer.messages().iter().any(|m| m.contains("NoSuchFont")));
        assert_eq!(writer.current_font(), None);
    }

    #[test]
    fn test_font_directory_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.ttf"), b"garbage").unwrap();
        let mut writer = PdfWriter::with_config(PdfConfig::new().with_font_dir(dir.path()));
        assert_eq!(writer.select_font("Broken", None, true, false).unwrap(), None);
        assert!(writer.messages()[0].contains("Broken"));
    }
}

mod truetype_tests {
    use super::*;

    #[test]
    fn test_registered_code_points_define_the_cid_set() {
        let mut writer = writer_with_truetype(PdfConfig::new());
        writer.register_text("Demo", "Aa\u{0634}");
        writer.select_font("Demo", None, true, true).unwrap();
        writer.add_text(0.0, 0.0, 10.0, "Aa", 0.0, 0.0, 0.0).unwrap();

        let pdf = debug_text(&writer);
        assert!(pdf.contains("/Subtype /Type0"));
        assert!(pdf.contains("/Encoding /Identity-H"));
        // 32, 65 and 97 are not consecutive, 0x0634 stands alone
        assert!(pdf.contains("/W [32 [532] 65 [565] 97 [597] 1588 [588]]"));
        assert!(page_text(&writer).contains("<00410061> Tj"));
        assert!(writer.messages().iter().any(|m| m.contains("Subsetting")));
    }

    #[test]
    fn test_unregistered_font_without_subset_maps_everything() {
        let mut writer = writer_with_truetype(PdfConfig::new());
        writer.select_font("Demo", None, true, false).unwrap();
        let pdf = debug_text(&writer);
        assert!(pdf.contains("/W [32 [532] 65 [565 566] 97 [597] 1588 [588]]"));
        assert!(writer.messages().is_empty());
    }

    #[test]
    fn test_single_byte_truetype() {
        let mut writer = writer_with_truetype(PdfConfig::new().with_unicode(false));
        writer.select_font("Demo", None, true, false).unwrap();
        writer.add_text(0.0, 0.0, 10.0, "AB", 0.0, 0.0, 0.0).unwrap();
        let pdf = debug_text(&writer);
        assert!(pdf.contains("/Subtype /TrueType"));
        assert!(pdf.contains("/FirstChar 32\n/LastChar 255"));
        assert!(pdf.contains("/FontFile2"));
        assert!(page_text(&writer).contains("(AB) Tj"));
    }

    #[test]
    fn test_word_spacing_uses_text_array() {
        let mut writer = writer_with_truetype(PdfConfig::new());
        writer.select_font("Demo", None, true, false).unwrap();
        writer.add_text(0.0, 0.0, 10.0, "A A", 0.0, 2.0, 0.0).unwrap();
        assert!(page_text(&writer).contains("[<00410020> -200 <0041>] TJ"));
    }
}
