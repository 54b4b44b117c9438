//! Font metrics, encodings and TrueType embedding support.
//!
//! The writer resolves fonts by name through [`MetricsSource`]
//! implementations. Standard fonts come with built-in widths; TrueType
//! fonts are parsed with `ttf-parser` and can be subset before embedding.

pub mod cmap;
pub mod encoding;
pub mod font_subsetter;
pub mod metrics;
pub mod standard_fonts;
pub mod truetype_parser;

#[cfg(test)]
pub(crate) mod test_font;

pub use metrics::{
    FileMetricsSource, FontKind, FontMetrics, MemoryMetricsSource, MetricsSource, StandardMetrics,
};
