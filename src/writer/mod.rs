//! PDF writing.
//!
//! ## Architecture
//!
//! ```text
//! drawing / text / image calls
//!     ↓
//! [PdfWriter] (document state, drawing context, transactions)
//!     ↓
//! [ContentStreamBuilder] (operators → content stream bytes)
//!     ↓
//! [ObjectStore] (typed objects by id)
//!     ↓
//! [ObjectSerializer] (objects → bytes, RC4 per object)
//!     ↓
//! PDF bytes, a file, or an HTTP response
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use pdf_scribe::writer::PdfWriter;
//!
//! let mut writer = PdfWriter::new();
//! writer.select_font("Helvetica", None, true, false)?;
//! writer.add_text(72.0, 720.0, 12.0, "Hello, World!", 0.0, 0.0, 0.0)?;
//! let bytes = writer.output()?;
//! ```

mod content_stream;
mod drawing;
mod font_manager;
mod graphics_state;
mod http_stream;
mod image_handler;
mod object_serializer;
mod output;
mod pdf_writer;

pub use content_stream::{fmt_num, ContentStreamBuilder, ContentStreamOp, LineCap, LineJoin, TextArrayItem};
pub use drawing::EllipseArc;
pub use font_manager::FontDifferences;
pub use graphics_state::{BlendMode, Color, ExtGState, FillRule, LineStyle};
pub use http_stream::{content_disposition, ResponseSink, StreamOptions};
pub use image_handler::{parse_jpeg_header, ImageError, PixelFormat, PngInfo};
pub use object_serializer::{format_real, hex_upper, ObjectSerializer};
pub use pdf_writer::{
    ObjectPlacement, PageRule, PdfWriter, CATALOG_ID, INFO_ID, OUTLINES_ID, PAGES_ID, PROCSET_ID,
};
