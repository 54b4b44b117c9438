//! PDF object serialization.
//!
//! Serializes [`Object`] values to bytes, optionally encrypting every string
//! and stream payload with the owning object's RC4 key.

use crate::encryption::EncryptionWriteHandler;
use crate::object::{Dict, Object};

/// Serializer for PDF objects.
///
/// The default layout puts one dictionary entry per line; the compact layout
/// keeps a dictionary on one line.
#[derive(Debug, Clone, Default)]
pub struct ObjectSerializer {
    /// Whether to use compact formatting (minimal whitespace)
    compact: bool,
}

/// Encryption context of the object being written.
#[derive(Clone, Copy)]
struct Crypt<'a> {
    handler: &'a EncryptionWriteHandler,
    obj_num: u32,
}

impl ObjectSerializer {
    /// Create a new object serializer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact serializer (single-line dictionaries).
    pub fn compact() -> Self {
        Self { compact: true }
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj, None);
        buf
    }

    /// Serialize an object to a string (for debugging).
    pub fn serialize_to_string(&self, obj: &Object) -> String {
        String::from_utf8_lossy(&self.serialize(obj)).to_string()
    }

    /// Append an indirect object definition to `buf`.
    ///
    /// Format: `\n{id} 0 obj\n{object}\nendobj`. Returns the byte offset of
    /// the object number, which is what the xref table records.
    ///
    /// When `handler` is given, strings and stream payloads inside the object
    /// are encrypted with the key derived for `id`, and each stream's
    /// `/Length` is set from the encrypted payload.
    pub fn serialize_indirect(
        &self,
        buf: &mut Vec<u8>,
        id: u32,
        obj: &Object,
        handler: Option<&EncryptionWriteHandler>,
    ) -> usize {
        buf.push(b'\n');
        let offset = buf.len();
        push(buf, &format!("{} 0 obj\n", id));
        let crypt = handler.map(|handler| Crypt {
            handler,
            obj_num: id,
        });
        self.write_object(buf, obj, crypt);
        push(buf, "\nendobj");
        offset
    }

    fn write_object(&self, buf: &mut Vec<u8>, obj: &Object, crypt: Option<Crypt<'_>>) {
        match obj {
            Object::Null => push(buf, "null"),
            Object::Boolean(b) => push(buf, if *b { "true" } else { "false" }),
            Object::Integer(i) => push(buf, &i.to_string()),
            Object::Real(r) => push(buf, &format_real(*r)),
            Object::String(s) => match crypt {
                Some(c) => write_string(buf, &c.handler.encrypt_string(s, c.obj_num, 0)),
                None => write_string(buf, s),
            },
            Object::Name(n) => write_name(buf, n),
            Object::Array(arr) => self.write_array(buf, arr, crypt),
            Object::Dictionary(dict) => self.write_dictionary(buf, dict, crypt),
            Object::Stream { dict, data } => self.write_stream(buf, dict, data, crypt),
            Object::Reference(r) => push(buf, &format!("{} {} R", r.id, r.gen)),
        }
    }

    fn write_array(&self, buf: &mut Vec<u8>, arr: &[Object], crypt: Option<Crypt<'_>>) {
        buf.push(b'[');
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                buf.push(b' ');
            }
            self.write_object(buf, obj, crypt);
        }
        buf.push(b']');
    }

    fn write_dictionary(&self, buf: &mut Vec<u8>, dict: &Dict, crypt: Option<Crypt<'_>>) {
        push(buf, "<<");
        for (key, value) in dict {
            buf.push(if self.compact { b' ' } else { b'\n' });
            write_name(buf, key);
            buf.push(b' ');
            self.write_object(buf, value, crypt);
        }
        push(buf, if self.compact { " >>" } else { "\n>>" });
    }

    /// Streams always get `/Length` from the bytes actually written.
    fn write_stream(&self, buf: &mut Vec<u8>, dict: &Dict, data: &[u8], crypt: Option<Crypt<'_>>) {
        let payload = match crypt {
            Some(c) => c.handler.encrypt_stream(data, c.obj_num, 0),
            None => data.to_vec(),
        };

        let mut dict = dict.clone();
        dict.insert("Length".to_string(), Object::Integer(payload.len() as i64));

        self.write_dictionary(buf, &dict, crypt);
        push(buf, "\nstream\n");
        buf.extend_from_slice(&payload);
        push(buf, "\nendstream");
    }
}

fn push(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
}

/// Format a real number with up to 5 decimals, trailing zeros removed.
///
/// PDF has no syntax for NaN or infinity, so those are written as `0`.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{:.5}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Write a PDF string: literal syntax for printable ASCII, hex otherwise.
fn write_string(buf: &mut Vec<u8>, data: &[u8]) {
    let is_printable = data
        .iter()
        .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

    if is_printable {
        buf.push(b'(');
        for &byte in data {
            match byte {
                b'(' => push(buf, "\\("),
                b')' => push(buf, "\\)"),
                b'\\' => push(buf, "\\\\"),
                b'\n' => push(buf, "\\n"),
                b'\r' => push(buf, "\\r"),
                b'\t' => push(buf, "\\t"),
                _ => buf.push(byte),
            }
        }
        buf.push(b')');
    } else {
        buf.push(b'<');
        push(buf, &hex_upper(data));
        buf.push(b'>');
    }
}

/// Uppercase hex encoding.
pub fn hex_upper(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Write a PDF name; bytes outside the regular set are escaped as `#xx`.
fn write_name(buf: &mut Vec<u8>, name: &str) {
    buf.push(b'/');
    for byte in name.bytes() {
        match byte {
            b'!'
            | b'"'
            | b'$'
            | b'&'
            | b'\''
            | b'*'..=b'.'
            | b'0'..=b'9'
            | b';'
            | b'='
            | b'?'
            | b'@'
            | b'A'..=b'Z'
            | b'\\'
            | b'^'..=b'z'
            | b'|'
            | b'~' => buf.push(byte),
            _ => push(buf, &format!("#{:02X}", byte)),
        }
    }
}
