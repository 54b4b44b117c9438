//! TrueType/OpenType font parser for PDF embedding.
//!
//! This module wraps the `ttf-parser` crate to extract the data a font
//! descriptor and a width table need. Everything is scaled to thousandths
//! of an em, the unit PDF font dictionaries use.

use std::collections::{BTreeMap, HashMap};
use std::io;

use bytes::Bytes;
use ttf_parser::{Face, GlyphId};

use crate::fonts::metrics::{FontKind, FontMetrics};

/// Error types for TrueType font parsing.
#[derive(Debug, thiserror::Error)]
pub enum TrueTypeError {
    /// Failed to parse font file
    #[error("Failed to parse font file: {0}")]
    ParseError(String),

    /// Font file is empty or invalid
    #[error("Font file is empty or invalid")]
    EmptyFont,

    /// Required table is missing
    #[error("Required font table is missing: {0}")]
    MissingTable(String),

    /// IO error during font operations
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type for TrueType operations.
pub type TrueTypeResult<T> = Result<T, TrueTypeError>;

/// Parsed TrueType font data.
#[derive(Debug)]
pub struct TrueTypeFont<'a> {
    /// The parsed font face
    face: Face<'a>,
    /// Cached Unicode to glyph ID mapping
    unicode_to_glyph: HashMap<u32, u16>,
    /// Cached glyph widths (glyph ID -> width in 1/1000 em)
    glyph_widths: HashMap<u16, u16>,
}

impl<'a> TrueTypeFont<'a> {
    /// Parse a TrueType/OpenType font from raw data.
    pub fn parse(data: &'a [u8]) -> TrueTypeResult<Self> {
        if data.is_empty() {
            return Err(TrueTypeError::EmptyFont);
        }

        let face = Face::parse(data, 0).map_err(|e| TrueTypeError::ParseError(e.to_string()))?;
        if face.tables().hmtx.is_none() {
            return Err(TrueTypeError::MissingTable("hmtx".to_string()));
        }

        let mut font = Self {
            face,
            unicode_to_glyph: HashMap::new(),
            glyph_widths: HashMap::new(),
        };

        font.build_unicode_map();
        font.build_width_table();

        Ok(font)
    }

    /// Build Unicode to glyph ID mapping from the cmap table (BMP only).
    fn build_unicode_map(&mut self) {
        for codepoint in 0..=0xFFFF_u32 {
            if let Some(ch) = char::from_u32(codepoint) {
                if let Some(glyph_id) = self.face.glyph_index(ch) {
                    self.unicode_to_glyph.insert(codepoint, glyph_id.0);
                }
            }
        }
    }

    /// Build glyph width table from hmtx table.
    fn build_width_table(&mut self) {
        for glyph_id in 0..self.face.number_of_glyphs() {
            let advance = self.face.glyph_hor_advance(GlyphId(glyph_id)).unwrap_or(0);
            let width = u16::try_from(self.to_pdf_units(advance)).unwrap_or(u16::MAX);
            self.glyph_widths.insert(glyph_id, width);
        }
    }

    /// Get the font's PostScript name.
    pub fn postscript_name(&self) -> Option<String> {
        self.face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .and_then(|name| name.to_string())
    }

    /// Get the font family name.
    pub fn family_name(&self) -> Option<String> {
        self.face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::FAMILY)
            .and_then(|name| name.to_string())
    }

    /// Units per em.
    pub fn units_per_em(&self) -> u16 {
        self.face.units_per_em()
    }

    /// Convert font units to 1/1000 em.
    pub fn to_pdf_units(&self, value: impl Into<i32>) -> i32 {
        (value.into() * 1000) / i32::from(self.units_per_em().max(1))
    }

    /// Whether the font is bold.
    pub fn is_bold(&self) -> bool {
        self.face.is_bold()
    }

    /// Whether the font is italic.
    pub fn is_italic(&self) -> bool {
        self.face.is_italic()
    }

    /// Glyph ID for a code point.
    pub fn glyph_id(&self, codepoint: u32) -> Option<u16> {
        self.unicode_to_glyph.get(&codepoint).copied()
    }

    /// Width of a glyph in 1/1000 em.
    pub fn glyph_width(&self, glyph_id: u16) -> u16 {
        self.glyph_widths.get(&glyph_id).copied().unwrap_or(0)
    }

    /// Number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.face.number_of_glyphs()
    }

    /// Calculate StemV, estimated from the font weight.
    ///
    /// TrueType doesn't store StemV directly.
    pub fn stem_v(&self) -> i32 {
        if self.is_bold() {
            140
        } else {
            80
        }
    }

    /// Get font flags for PDF FontDescriptor.
    ///
    /// - Bit 1: FixedPitch
    /// - Bit 6: Nonsymbolic (set for every TrueType text font)
    /// - Bit 7: Italic
    pub fn font_flags(&self) -> u32 {
        let mut flags = 1u32 << 5;
        if self.face.is_monospaced() {
            flags |= 1 << 0;
        }
        if self.is_italic() {
            flags |= 1 << 6;
        }
        flags
    }

    /// Collect the metrics record used by the writer.
    ///
    /// `program` is the original font file, kept for embedding.
    pub fn to_metrics(&self, program: Bytes) -> FontMetrics {
        let mut widths = BTreeMap::new();
        let mut glyph_ids = BTreeMap::new();
        for (&codepoint, &gid) in &self.unicode_to_glyph {
            glyph_ids.insert(codepoint, gid);
            widths.insert(codepoint, self.glyph_width(gid));
        }

        let bbox = self.face.global_bounding_box();
        let ascender = self.to_pdf_units(self.face.ascender());
        let name = self
            .postscript_name()
            .or_else(|| self.family_name().map(|f| f.replace(' ', "")))
            .unwrap_or_else(|| "Unknown".to_string());

        FontMetrics {
            name,
            kind: FontKind::TrueType,
            widths,
            glyph_ids,
            missing_width: self.glyph_width(0),
            bbox: [
                self.to_pdf_units(bbox.x_min),
                self.to_pdf_units(bbox.y_min),
                self.to_pdf_units(bbox.x_max),
                self.to_pdf_units(bbox.y_max),
            ],
            ascender,
            descender: self.to_pdf_units(self.face.descender()),
            cap_height: self
                .face
                .capital_height()
                .map(|h| self.to_pdf_units(h))
                .unwrap_or(ascender),
            x_height: self
                .face
                .x_height()
                .map(|h| self.to_pdf_units(h))
                .unwrap_or(ascender / 2),
            italic_angle: self.face.italic_angle().unwrap_or(0.0),
            stem_v: self.stem_v(),
            flags: self.font_flags(),
            program: Some(program),
        }
    }
}

/// Parse a font program into a metrics record that keeps the program.
pub fn parse_font_metrics(data: Bytes) -> TrueTypeResult<FontMetrics> {
    let font = TrueTypeFont::parse(&data)?;
    log::debug!(
        "Parsed TrueType font {:?}: {} glyphs, {} mapped code points",
        font.postscript_name(),
        font.num_glyphs(),
        font.unicode_to_glyph.len()
    );
    Ok(font.to_metrics(data.clone()))
}
