//! Integration tests for PDF encryption on write.
//!
//! Tests encryption functionality including:
//! - /O and /U values of the standard security handler
//! - Per-object encryption of strings and streams
//! - Interaction with compression
//! - RC4 properties

use chrono::DateTime;
use flate2::read::ZlibDecoder;
use pdf_scribe::encryption::algorithms::pad_password;
use pdf_scribe::encryption::rc4::rc4_crypt;
use pdf_scribe::encryption::{
    Algorithm, EncryptionSettings, EncryptionWriteHandler, Permissions, SecurityValues,
};
use pdf_scribe::writer::hex_upper;
use pdf_scribe::{PdfConfig, PdfWriter};
use regex::bytes::Regex;
use std::io::Read;

fn writer_with_text(text: &str) -> PdfWriter {
    let date = DateTime::parse_from_rfc3339("2024-02-29T08:00:00+00:00").unwrap();
    let mut writer = PdfWriter::with_config(
        PdfConfig::new()
            .with_creation_date(date)
            .with_document_id("encryption")
            .with_title("Secret title"),
    );
    writer.select_font("Courier", None, true, false).unwrap();
    writer.add_text(72.0, 700.0, 10.0, text, 0.0, 0.0, 0.0).unwrap();
    writer
}

fn hex_entry(pdf: &[u8], key: &str) -> Vec<u8> {
    let re = Regex::new(&format!(r"/{} <([0-9A-F]+)>", key)).unwrap();
    let caps = re.captures(pdf).unwrap();
    let hex = std::str::from_utf8(&caps[1]).unwrap();
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

/// Raw payload of the stream in object `id`.
fn stream_payload(pdf: &[u8], id: u32) -> Vec<u8> {
    let re = Regex::new(&format!(r"(?s)\n{} 0 obj\n.*?/Length (\d+)\n>>\nstream\n", id)).unwrap();
    let caps = re.captures(pdf).unwrap();
    let length: usize = std::str::from_utf8(&caps[1]).unwrap().parse().unwrap();
    let start = caps.get(0).unwrap().end();
    pdf[start..start + length].to_vec()
}

mod security_value_tests {
    use super::*;

    #[test]
    fn test_owner_and_user_values_are_32_bytes() {
        let mut writer = writer_with_text("hidden");
        writer
            .set_encryption(EncryptionSettings::new("", "owner"))
            .unwrap();
        let pdf = writer.output().unwrap();

        assert_eq!(hex_entry(&pdf, "O").len(), 32);
        assert_eq!(hex_entry(&pdf, "U").len(), 32);
        let s = String::from_utf8_lossy(&pdf);
        assert!(s.contains("/Filter /Standard\n/V 1\n/R 2\n"));
    }

    #[test]
    fn test_user_value_is_rc4_of_padding() {
        let settings = EncryptionSettings::new("", "owner");
        let mut writer = writer_with_text("hidden");
        writer.set_encryption(settings.clone()).unwrap();
        let pdf = writer.output().unwrap();

        let values = SecurityValues::compute(&settings, writer.file_id());
        assert_eq!(values.key.len(), 5);
        assert_eq!(hex_entry(&pdf, "U"), rc4_crypt(&values.key, &pad_password(b"")));
        assert_eq!(hex_entry(&pdf, "O"), values.owner_hash);
    }

    #[test]
    fn test_permissions_value() {
        let settings = EncryptionSettings::new("user", "owner")
            .with_permissions(Permissions::PRINT | Permissions::COPY);
        let mut writer = writer_with_text("hidden");
        writer.set_encryption(settings).unwrap();
        let s = String::from_utf8_lossy(&writer.output().unwrap()).into_owned();
        // 0xC0 | 4 | 16 with the upper bytes set
        assert!(s.contains(&format!("/P {}", i32::from_le_bytes([0xD4, 0xFF, 0xFF, 0xFF]))));
    }

    #[test]
    fn test_rc4_128_dictionary() {
        let mut writer = writer_with_text("hidden");
        writer
            .set_encryption(EncryptionSettings::new("u", "o").with_algorithm(Algorithm::Rc4_128))
            .unwrap();
        let s = String::from_utf8_lossy(&writer.output().unwrap()).into_owned();
        assert!(s.contains("/V 2\n/R 3\n/Length 128\n"));
        assert!(s.starts_with("%PDF-1.4\n"));
    }

    #[test]
    fn test_header_version_follows_key_length() {
        let mut writer = writer_with_text("hidden");
        assert_eq!(writer.pdf_version(), "1.3");
        writer.set_encryption(EncryptionSettings::new("u", "o")).unwrap();
        assert!(writer.output().unwrap().starts_with(b"%PDF-1.3\n%"));

        writer
            .set_encryption(EncryptionSettings::new("u", "o").with_algorithm(Algorithm::Rc4_128))
            .unwrap();
        assert_eq!(writer.pdf_version(), "1.4");
        writer.set_encryption(EncryptionSettings::new("u", "o")).unwrap();
        assert_eq!(writer.pdf_version(), "1.3");
    }

    #[test]
    fn test_id_is_written_in_clear() {
        let mut writer = writer_with_text("hidden");
        writer
            .set_encryption(EncryptionSettings::new("", "owner"))
            .unwrap();
        let s = String::from_utf8_lossy(&writer.output().unwrap()).into_owned();
        let id = hex_upper(writer.file_id());
        assert!(s.contains(&format!("/ID[<{}><{}>]", id, id)));
    }
}

mod object_encryption_tests {
    use super::*;

    #[test]
    fn test_plaintext_does_not_leak() {
        let mut writer = writer_with_text("classified payload");
        writer
            .set_encryption(EncryptionSettings::new("", "owner"))
            .unwrap();
        let pdf = writer.output_debug().unwrap();
        let s = String::from_utf8_lossy(&pdf);
        assert!(!s.contains("classified payload"));
        assert!(!s.contains("Secret title"));
        assert!(s.contains("/BaseFont /Courier"), "names are not encrypted");
    }

    #[test]
    fn test_decrypt_then_inflate_round_trip() {
        let settings = EncryptionSettings::new("", "owner");
        let mut writer = writer_with_text("classified payload");
        writer.set_encryption(settings.clone()).unwrap();
        let contents = writer.current_contents();
        let pdf = writer.output().unwrap();

        let raw = stream_payload(&pdf, contents);
        assert!(
            ZlibDecoder::new(&raw[..]).read_to_end(&mut Vec::new()).is_err(),
            "ciphertext must not inflate"
        );

        let values = SecurityValues::compute(&settings, writer.file_id());
        let handler = EncryptionWriteHandler::from_key(values.key);
        let compressed = handler.encrypt_stream(&raw, contents, 0);
        let mut plain = String::new();
        ZlibDecoder::new(&compressed[..])
            .read_to_string(&mut plain)
            .unwrap();
        assert!(plain.contains("(classified payload) Tj"));
    }

    #[test]
    fn test_encrypting_twice_keeps_one_dictionary() {
        let mut writer = writer_with_text("x");
        writer.set_encryption(EncryptionSettings::new("a", "b")).unwrap();
        let count = writer.store().len();
        writer.set_encryption(EncryptionSettings::new("c", "d")).unwrap();
        assert_eq!(writer.store().len(), count);
        let s = String::from_utf8_lossy(&writer.output().unwrap()).into_owned();
        assert_eq!(s.matches("/Filter /Standard").count(), 1);
    }
}

mod rc4_property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// RC4 is its own inverse under the same key
        #[test]
        fn rc4_is_self_inverse(
            key in prop::collection::vec(any::<u8>(), 1..32),
            data in prop::collection::vec(any::<u8>(), 0..512),
        ) {
            let encrypted = rc4_crypt(&key, &data);
            prop_assert_eq!(encrypted.len(), data.len());
            prop_assert_eq!(rc4_crypt(&key, &encrypted), data);
        }

        /// Object keys differ between objects
        #[test]
        fn object_keys_are_salted(key in prop::collection::vec(any::<u8>(), 5..=16), a in 1u32..10_000, b in 1u32..10_000) {
            prop_assume!(a != b);
            let handler = EncryptionWriteHandler::from_key(key.clone());
            let ka = handler.derive_object_key(a, 0);
            prop_assert_eq!(ka.len(), (key.len() + 5).min(16));
            prop_assert_ne!(ka, handler.derive_object_key(b, 0));
        }
    }
}
