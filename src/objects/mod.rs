//! Typed PDF object handlers.
//!
//! Each handler owns the attributes of one object type and lowers itself to
//! a generic [`Object`](crate::object::Object) when the document is written.
//! Stream handlers compress at that point, so the store always holds
//! plaintext and every output pass starts from the same state.

use std::io::Write;

use indexmap::IndexMap;

use crate::store::ObjectId;

pub mod catalog;
pub mod contents;
pub mod font;
pub mod image;
pub mod javascript;
pub mod navigation;
pub mod pages;
pub mod security;

/// Settings shared by every handler during one output pass.
#[derive(Debug, Clone, Copy)]
pub struct OutContext<'a> {
    /// Flate-compress streams that are not pre-encoded
    pub compress: bool,
    /// Named destinations, for resolving GoTo actions
    pub destinations: &'a IndexMap<String, ObjectId>,
}

/// Compress data using Flate/Deflate compression.
///
/// Returns compressed bytes suitable for the FlateDecode filter.
pub(crate) fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
