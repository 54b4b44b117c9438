//! Document serialization.
//!
//! Output is two passes over the store: every object is written in id order
//! while its offset is recorded, then the xref table and trailer follow.

use std::fmt::Write as _;
use std::path::Path;

use super::object_serializer::{hex_upper, ObjectSerializer};
use super::pdf_writer::{PdfWriter, CATALOG_ID, INFO_ID};
use crate::encryption::Algorithm;
use crate::error::Result;
use crate::objects::OutContext;
use crate::store::ObjectKind;

/// Binary marker comment following the version line.
const BINARY_MARKER: &[u8] = b"\n%\xE2\xE3\xCF\xD3";

impl PdfWriter {
    /// Serialize the document, compressing streams when the configuration
    /// says so.
    ///
    /// Output does not consume the writer. Calling it twice with no
    /// mutation in between yields identical bytes; later mutations show up
    /// in later outputs.
    pub fn output(&self) -> Result<Vec<u8>> {
        self.render(self.state.config.compress)
    }

    /// Serialize without compression, for inspecting content streams.
    pub fn output_debug(&self) -> Result<Vec<u8>> {
        self.render(false)
    }

    /// Write `output()` to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.output()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// 1.3 unless 128-bit RC4, a 1.4 feature, is in use.
    pub fn pdf_version(&self) -> &'static str {
        match self.state.encryption.as_ref().map(|enc| enc.algorithm) {
            Some(Algorithm::Rc4_128) => "1.4",
            _ => "1.3",
        }
    }

    pub(crate) fn render(&self, compress: bool) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::new();
        let ctx = OutContext {
            compress,
            destinations: &self.state.destinations,
        };
        let store = &self.state.store;
        let encryption = self.state.encryption.as_ref();

        let mut output = format!("%PDF-{}", self.pdf_version()).into_bytes();
        output.extend_from_slice(BINARY_MARKER);
        let count = store.next_id() - 1;
        let mut offsets = Vec::with_capacity(count as usize);
        for id in 1..=count {
            let object = store.get(id)?;
            let handler = match encryption {
                Some(enc) if object.kind() != ObjectKind::Encryption => Some(&enc.handler),
                _ => None,
            };
            let lowered = object.to_object(&ctx)?;
            offsets.push(serializer.serialize_indirect(&mut output, id, &lowered, handler));
        }

        output.push(b'\n');
        let xref_start = output.len();
        let mut tail = String::new();
        // Writing to a String cannot fail.
        let _ = write!(tail, "xref\n0 {}\n0000000000 65535 f \n", count + 1);
        for offset in &offsets {
            let _ = write!(tail, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            tail,
            "trailer\n<<\n/Size {}\n/Root {} 0 R\n/Info {} 0 R\n",
            count + 1,
            CATALOG_ID,
            INFO_ID
        );
        if let Some(enc) = encryption {
            let _ = writeln!(tail, "/Encrypt {} 0 R", enc.dict_id);
        }
        let id = hex_upper(&self.state.file_id);
        let _ = write!(tail, "/ID[<{}><{}>]\n>>\nstartxref\n{}\n%%EOF\n", id, id, xref_start);
        output.extend_from_slice(tail.as_bytes());

        log::info!(
            "Serialized {} objects on {} pages into {} bytes (compress: {}, encrypted: {})",
            count,
            self.page_count(),
            output.len(),
            compress,
            encryption.is_some()
        );
        Ok(output)
    }
}
