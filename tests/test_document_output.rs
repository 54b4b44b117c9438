//! Integration tests for whole-document output.
//!
//! Tests cover:
//! - File structure: header, objects, xref table, trailer
//! - Stream lengths and compression
//! - Document-level entries: info, viewer preferences, JavaScript, links

use chrono::DateTime;
use flate2::read::ZlibDecoder;
use pdf_scribe::objects::catalog::{Direction, ViewerPreference};
use pdf_scribe::objects::navigation::DestinationFit;
use pdf_scribe::writer::{Color, PAGES_ID};
use pdf_scribe::{PdfConfig, PdfWriter};
use regex::bytes::Regex;
use std::collections::BTreeMap;
use std::io::Read;

fn fixed_config() -> PdfConfig {
    let date = DateTime::parse_from_rfc3339("2024-06-01T12:00:00+02:00").unwrap();
    PdfConfig::new()
        .with_creation_date(date)
        .with_document_id("integration")
}

/// Object bodies by id.
fn objects(pdf: &[u8]) -> BTreeMap<u32, Vec<u8>> {
    let re = Regex::new(r"(?s)\n(\d+) 0 obj\n(.*?)\nendobj").unwrap();
    re.captures_iter(pdf)
        .map(|c| {
            let id = std::str::from_utf8(&c[1]).unwrap().parse().unwrap();
            (id, c[2].to_vec())
        })
        .collect()
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn hello_world() -> PdfWriter {
    let mut writer = PdfWriter::with_config(fixed_config());
    writer.select_font("Helvetica", None, true, false).unwrap();
    writer
        .add_text(72.0, 720.0, 12.0, "Hello, World!", 0.0, 0.0, 0.0)
        .unwrap();
    writer
}

mod structure_tests {
    use super::*;

    #[test]
    fn test_hello_world_objects() {
        let pdf = hello_world().output().unwrap();
        let objs = objects(&pdf);

        let kinds = |needle: &str| objs.values().filter(|b| text(b).contains(needle)).count();
        assert_eq!(kinds("/Type /Page\n"), 1);
        assert_eq!(kinds("/BaseFont /Helvetica"), 1);
        assert_eq!(kinds("/Type /Catalog"), 1);
        assert!(text(&objs[&1]).contains("/Pages 3 0 R"));
        assert!(text(&objs[&6]).contains("/Contents 7 0 R"));
        assert!(text(&objs[&3]).contains("/Kids [6 0 R]"));
    }

    #[test]
    fn test_xref_covers_every_object() {
        let writer = hello_world();
        let pdf = writer.output().unwrap();
        let objs = objects(&pdf);
        let count = writer.store().next_id() - 1;
        assert_eq!(objs.len() as u32, count);
        assert_eq!(*objs.keys().last().unwrap(), count);

        let s = text(&pdf);
        assert!(s.contains(&format!("xref\n0 {}\n0000000000 65535 f \n", count + 1)));
        let rows = Regex::new(r"\d{10} 00000 n \n").unwrap();
        assert_eq!(rows.find_iter(&pdf).count() as u32, count);
        assert!(s.contains(&format!("/Size {}\n/Root 1 0 R\n/Info 5 0 R\n", count + 1)));
    }

    #[test]
    fn test_startxref_points_at_xref() {
        let pdf = hello_world().output().unwrap();
        let s = text(&pdf);
        let tail = s.rsplit("startxref\n").next().unwrap();
        let offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(s[offset..].starts_with("xref\n"));
    }

    #[test]
    fn test_output_is_stable() {
        let writer = hello_world();
        assert_eq!(writer.output().unwrap(), writer.output().unwrap());
        assert_eq!(
            hello_world().output().unwrap(),
            writer.output().unwrap(),
            "same inputs and injected date give the same file"
        );
    }

    #[test]
    fn test_mutation_after_output_shows_up() {
        let mut writer = hello_world();
        let first = writer.output().unwrap();
        writer.new_page().unwrap();
        let second = writer.output().unwrap();
        assert_ne!(first, second);
        assert!(text(&second).contains("/Count 2"));
        assert_eq!(writer.page_count(), 2);
    }

    #[test]
    fn test_empty_loose_object_is_written() {
        let mut writer = hello_world();
        writer.open_object();
        writer.close_object().unwrap();
        assert!(writer.output().is_ok());
    }
}

mod stream_tests {
    use super::*;

    fn check_lengths(pdf: &[u8]) -> usize {
        let re = Regex::new(r"/Length (\d+)\n>>\nstream\n").unwrap();
        let mut checked = 0;
        for caps in re.captures_iter(pdf) {
            let length: usize = std::str::from_utf8(&caps[1]).unwrap().parse().unwrap();
            let start = caps.get(0).unwrap().end();
            assert_eq!(&pdf[start + length..start + length + 10], b"\nendstream");
            checked += 1;
        }
        checked
    }

    #[test]
    fn test_lengths_match_payload() {
        let mut writer = hello_world();
        writer.set_color(Color::rgb(1.0, 0.0, 0.0)).unwrap();
        writer.filled_rectangle(10.0, 10.0, 50.0, 50.0).unwrap();
        writer.new_page().unwrap();
        writer.ellipse(100.0, 100.0, 40.0, 20.0).unwrap();

        assert_eq!(check_lengths(&writer.output().unwrap()), 2);
        assert_eq!(check_lengths(&writer.output_debug().unwrap()), 2);
    }

    #[test]
    fn test_compressed_contents_inflate_to_operators() {
        let pdf = hello_world().output().unwrap();
        let objs = objects(&pdf);
        let body = &objs[&7];
        assert!(text(body).contains("/Filter /FlateDecode"));

        let start = body.windows(7).position(|w| w == b"stream\n").unwrap() + 7;
        let end = body.windows(10).rposition(|w| w == b"\nendstream").unwrap();
        let mut plain = String::new();
        ZlibDecoder::new(&body[start..end])
            .read_to_string(&mut plain)
            .unwrap();
        assert!(plain.contains("/F1 12 Tf"));
        assert!(plain.contains("(Hello, World!) Tj"));
    }

    #[test]
    fn test_uncompressed_config() {
        let mut writer = PdfWriter::with_config(fixed_config().with_compress(false));
        writer.line(0.0, 0.0, 100.0, 100.0).unwrap();
        let s = text(&writer.output().unwrap());
        assert!(!s.contains("/FlateDecode"));
        assert!(s.contains("0 0 m\n100 100 l\nS"));
    }

    #[test]
    fn test_compression_toggled_later() {
        let mut writer = hello_world();
        writer.set_compression(false);
        assert_eq!(writer.output().unwrap(), writer.output_debug().unwrap());
    }
}

mod document_tests {
    use super::*;

    #[test]
    fn test_info_entries() {
        let mut writer = PdfWriter::with_config(fixed_config().with_title("Quarterly"));
        writer.add_info("Keywords", "finance, report").unwrap();
        writer.add_info("Author", "Zoë").unwrap();
        let objs = objects(&writer.output().unwrap());
        let info = text(&objs[&5]);
        assert!(info.contains("/Producer (pdf_scribe)"));
        assert!(info.contains("/Title (Quarterly)"));
        assert!(info.contains("/CreationDate (D:20240601120000+02'00')"));
        assert!(info.contains("/Keywords (finance, report)"));
        assert!(info.contains("/Author <FEFF005A006F00EB>"));
    }

    #[test]
    fn test_viewer_preferences() {
        let mut writer = PdfWriter::with_config(fixed_config());
        writer.set_preference(ViewerPreference::HideToolbar(true)).unwrap();
        writer.set_preference(ViewerPreference::Direction(Direction::R2L)).unwrap();
        let pdf = text(&writer.output().unwrap());
        let re = regex::Regex::new(r"/ViewerPreferences (\d+) 0 R").unwrap();
        assert_eq!(re.find_iter(&pdf).count(), 1);
        assert!(pdf.contains("/HideToolbar true"));
        assert!(pdf.contains("/Direction /R2L"));
    }

    #[test]
    fn test_javascript_single_names_entry() {
        let mut writer = PdfWriter::with_config(fixed_config());
        writer.add_javascript("app.alert('one');").unwrap();
        let _ = writer.output().unwrap();
        writer.add_javascript("app.alert('two');").unwrap();
        let pdf = text(&writer.output_debug().unwrap());
        assert_eq!(pdf.matches("/Names").count(), 2, "catalog entry plus EmbeddedJS names");
        assert_eq!(pdf.matches("/S /JavaScript").count(), 1);
        assert!(pdf.contains("app.alert\\('one'\\);"));
        assert!(pdf.contains("app.alert\\('two'\\);"));
    }

    #[test]
    fn test_links_and_destinations() {
        let mut writer = PdfWriter::with_config(fixed_config());
        writer.add_destination("intro", DestinationFit::Fit).unwrap();
        writer.new_page().unwrap();
        writer.add_internal_link("intro", 0.0, 0.0, 100.0, 20.0).unwrap();
        writer.add_internal_link("missing", 0.0, 30.0, 100.0, 50.0).unwrap();
        writer.add_link("https://example.com/a(b)", 0.0, 60.0, 100.0, 80.0).unwrap();
        writer.open_here(DestinationFit::FitH(500.0)).unwrap();

        let pdf = text(&writer.output().unwrap());
        assert!(pdf.contains("/S /GoTo"));
        assert_eq!(pdf.matches("/S /GoTo").count(), 1);
        assert!(pdf.contains("/URI (https://example.com/a\\(b\\))"));
        assert!(pdf.contains("[6 0 R /Fit]"));
        assert!(pdf.contains("/OpenAction"));
        assert_eq!(pdf.matches("/Subtype /Link").count(), 3);
    }

    #[test]
    fn test_page_tree_media_box() {
        let writer = PdfWriter::with_config(fixed_config().with_media_box([0.0, 0.0, 612.0, 792.0]));
        let objs = objects(&writer.output().unwrap());
        assert!(text(&objs[&PAGES_ID]).contains("/MediaBox [0 0 612 792]"));
    }

    #[test]
    fn test_page_media_box_overrides_tree() {
        let mut writer = PdfWriter::with_config(fixed_config().with_media_box([0.0, 0.0, 612.0, 792.0]));
        writer.new_page().unwrap();
        writer.set_page_media_box([0.0, 0.0, 200.0, 300.0]).unwrap();
        assert!(writer.set_page_media_box([0.0, 0.0, f32::NAN, 1.0]).is_err());

        let objs = objects(&writer.output().unwrap());
        assert!(!text(&objs[&6]).contains("/MediaBox"));
        let second = objs
            .values()
            .map(|b| text(b))
            .find(|b| b.contains("/Type /Page\n") && b.contains("/MediaBox"))
            .unwrap();
        assert!(second.contains("/MediaBox [0 0 200 300]"));
        assert!(text(&objs[&PAGES_ID]).contains("/MediaBox [0 0 612 792]"));
    }

    #[test]
    fn test_config_from_json() {
        let config = PdfConfig::from_json(r#"{"compress": false, "producer": "json-test"}"#).unwrap();
        let writer = PdfWriter::with_config(config);
        let pdf = text(&writer.output().unwrap());
        assert!(pdf.contains("/Producer (json-test)"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let writer = hello_world();
        writer.write_to_file(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), writer.output().unwrap());
    }
}
