//! Font metrics records and the sources that supply them.
//!
//! The writer never parses AFM files itself. It asks a chain of
//! [`MetricsSource`] implementations for a [`FontMetrics`] record by font
//! name; the first source that knows the name wins.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::Result;
use crate::fonts::standard_fonts;
use crate::fonts::truetype_parser;

/// Where a metrics record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    /// One of the 14 standard fonts; never embedded
    Standard,
    /// TrueType program; embedded, optionally as a Unicode CID font
    TrueType,
}

/// Metrics of one font, in thousandths of an em.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// PostScript name
    pub name: String,
    /// Standard or TrueType
    pub kind: FontKind,
    /// Advance widths by Unicode code point
    pub widths: BTreeMap<u32, u16>,
    /// Glyph index by Unicode code point (TrueType only)
    pub glyph_ids: BTreeMap<u32, u16>,
    /// Width used for code points missing from `widths`
    pub missing_width: u16,
    /// Font bounding box `[llx lly urx ury]`
    pub bbox: [i32; 4],
    /// Ascender
    pub ascender: i32,
    /// Descender (negative)
    pub descender: i32,
    /// Cap height
    pub cap_height: i32,
    /// x-height
    pub x_height: i32,
    /// Italic angle in degrees
    pub italic_angle: f32,
    /// Dominant vertical stem width
    pub stem_v: i32,
    /// FontDescriptor flags
    pub flags: u32,
    /// Font program for embedding (TrueType only)
    pub program: Option<Bytes>,
}

impl FontMetrics {
    /// Width of a code point, falling back to the missing width.
    pub fn width(&self, codepoint: u32) -> u16 {
        self.widths
            .get(&codepoint)
            .copied()
            .unwrap_or(self.missing_width)
    }

    /// Glyph index of a code point.
    pub fn glyph_id(&self, codepoint: u32) -> Option<u16> {
        self.glyph_ids.get(&codepoint).copied()
    }

    /// Whether the font has a program that can be embedded.
    pub fn is_embeddable(&self) -> bool {
        self.kind == FontKind::TrueType && self.program.is_some()
    }
}

/// A supplier of font metrics.
///
/// `Ok(None)` means the source does not know the font; an error means it
/// knows the font but could not read it.
pub trait MetricsSource: std::fmt::Debug + Send + Sync {
    /// Look up metrics for `name`.
    fn load(&self, name: &str) -> Result<Option<FontMetrics>>;
}

/// Built-in metrics for the 14 standard PDF fonts.
///
/// Accepts bare names (`Helvetica-Bold`) as well as metric file paths
/// (`fonts/Helvetica-Bold.afm`); matching ignores case.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl MetricsSource for StandardMetrics {
    fn load(&self, name: &str) -> Result<Option<FontMetrics>> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        Ok(standard_fonts::metrics(stem))
    }
}

/// TrueType fonts read from disk with `ttf-parser`.
///
/// A name ending in `.ttf` or `.otf` is tried as a path first, then
/// `<dir>/<name>.ttf` for each search directory.
#[derive(Debug, Clone, Default)]
pub struct FileMetricsSource {
    search_dirs: Vec<PathBuf>,
}

impl FileMetricsSource {
    /// Source with no search directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory to search for `<name>.ttf`.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".ttf") || lower.ends_with(".otf") {
            paths.push(PathBuf::from(name));
        }
        for dir in &self.search_dirs {
            paths.push(dir.join(format!("{}.ttf", name)));
        }
        paths
    }
}

impl MetricsSource for FileMetricsSource {
    fn load(&self, name: &str) -> Result<Option<FontMetrics>> {
        let Some(path) = self.candidates(name).into_iter().find(|p| p.is_file()) else {
            return Ok(None);
        };
        log::debug!("Loading TrueType metrics from {}", path.display());
        let data = Bytes::from(std::fs::read(&path)?);
        let metrics = truetype_parser::parse_font_metrics(data)?;
        Ok(Some(metrics))
    }
}

/// Metrics registered in memory, keyed by exact name.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetricsSource {
    fonts: HashMap<String, FontMetrics>,
}

impl MemoryMetricsSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metrics under `name`.
    pub fn insert(&mut self, name: impl Into<String>, metrics: FontMetrics) {
        self.fonts.insert(name.into(), metrics);
    }

    /// Builder form of [`MemoryMetricsSource::insert`].
    pub fn with_font(mut self, name: impl Into<String>, metrics: FontMetrics) -> Self {
        self.insert(name, metrics);
        self
    }

    /// Parse a TrueType program from memory and register it.
    pub fn insert_truetype(&mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Result<()> {
        let metrics = truetype_parser::parse_font_metrics(data.into())?;
        self.insert(name, metrics);
        Ok(())
    }
}

impl MetricsSource for MemoryMetricsSource {
    fn load(&self, name: &str) -> Result<Option<FontMetrics>> {
        Ok(self.fonts.get(name).cloned())
    }
}
