//! Streaming a document as an HTTP response.
//!
//! The writer knows nothing about a particular web framework; callers adapt
//! their response type to [`ResponseSink`].

use super::pdf_writer::PdfWriter;
use crate::error::{Error, Result};

/// Destination for an HTTP response.
pub trait ResponseSink {
    /// Whether headers already went out on this response.
    fn headers_sent(&self) -> bool;

    /// Set one response header.
    fn set_header(&mut self, name: &str, value: &str) -> std::io::Result<()>;

    /// Write body bytes.
    fn write_body(&mut self, data: &[u8]) -> std::io::Result<()>;
}

/// How a streamed document is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Compress streams; `false` sends the debug rendition
    pub compress: bool,
    /// `inline` rather than `attachment` disposition
    pub inline: bool,
    /// Advertise `Accept-Ranges: bytes`
    pub accept_ranges: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            compress: true,
            inline: false,
            accept_ranges: false,
        }
    }
}

/// Filename safe inside a quoted header parameter: printable Latin-1 kept,
/// everything else replaced with `_`.
fn fallback_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            ' '..='~' | '\u{A0}'..='\u{FF}' => c,
            _ => '_',
        })
        .collect()
}

/// RFC 5987 `ext-value` encoding of the UTF-8 bytes.
fn percent_encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for &b in name.as_bytes() {
        if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// `Content-Disposition` value for `filename`.
pub fn content_disposition(filename: &str, inline: bool) -> String {
    let kind = if inline { "inline" } else { "attachment" };
    let fallback = fallback_filename(filename);
    let mut value = format!("{}; filename=\"{}\"", kind, fallback);
    if fallback != filename {
        value.push_str("; filename*=UTF-8''");
        value.push_str(&percent_encode(filename));
    }
    value
}

impl PdfWriter {
    /// Send the document through `sink` with download headers.
    ///
    /// Fails with [`Error::HeadersAlreadySent`] before rendering anything if
    /// the response is already committed.
    pub fn stream<S: ResponseSink + ?Sized>(&self, sink: &mut S, filename: &str, options: StreamOptions) -> Result<()> {
        if sink.headers_sent() {
            return Err(Error::HeadersAlreadySent);
        }
        let compress = options.compress && self.state.config.compress;
        let body = self.render(compress)?;

        sink.set_header("Cache-Control", "private")?;
        sink.set_header("Content-Type", "application/pdf")?;
        sink.set_header("Content-Length", &body.len().to_string())?;
        sink.set_header("Content-Disposition", &content_disposition(filename, options.inline))?;
        if options.accept_ranges {
            sink.set_header("Accept-Ranges", "bytes")?;
        }
        sink.write_body(&body)?;
        log::debug!("Streamed {} ({} bytes)", filename, body.len());
        Ok(())
    }
}
