//! Font selection, embedding and text placement.
//!
//! Fonts are resolved by name through the writer's metrics sources the
//! first time they are selected and reused after that. Standard fonts are
//! referenced by name only. TrueType fonts are embedded, either as a Type0
//! font with 2-byte Unicode codes (optionally subset to the code points
//! announced with [`PdfWriter::register_text`]) or as a single-byte WinAnsi
//! TrueType font.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bytes::Bytes;

use super::content_stream::{ContentStreamOp, TextArrayItem};
use super::pdf_writer::PdfWriter;
use crate::error::Result;
use crate::fonts::encoding::{encode_utf16be, glyph_name_to_unicode, unicode_to_winansi, winansi_to_unicode};
use crate::fonts::font_subsetter::{subset_font_name, subset_tag, subset_truetype};
use crate::fonts::metrics::FontMetrics;
use crate::fonts::standard_fonts;
use crate::objects::font::{
    CidFont, CidToGidMap, Font, FontDescriptor, FontEncoding, FontEncodingRef, FontFile, FontSubtype, ToUnicode,
};
use crate::store::{ObjectId, PdfObject};

const WINANSI: &str = "WinAnsiEncoding";

/// A custom encoding for a simple font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontDifferences {
    /// Base encoding name; WinAnsiEncoding when `None`
    pub base: Option<String>,
    /// Code to glyph name, e.g. `0x80 => "Euro"`
    pub differences: BTreeMap<u8, String>,
}

impl FontDifferences {
    /// Differences over WinAnsiEncoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `code` to the glyph `name`.
    pub fn with(mut self, code: u8, name: impl Into<String>) -> Self {
        self.differences.insert(code, name.into());
        self
    }
}

/// A font the document knows.
#[derive(Debug, Clone)]
pub(crate) struct FontEntry {
    /// `n` of the `/F<n>` resource
    pub number: usize,
    pub font_id: ObjectId,
    pub metrics: Arc<FontMetrics>,
    /// 2-byte Identity-H codes
    pub unicode: bool,
    /// Code point to byte, from a /Differences encoding
    pub reverse_differences: HashMap<u32, u8>,
}

impl FontEntry {
    fn resource_name(&self) -> String {
        format!("F{}", self.number)
    }

    /// Encode `text` for a show-text operator.
    fn encode(&self, text: &str) -> Vec<u8> {
        if self.unicode {
            return encode_utf16be(text);
        }
        text.chars()
            .map(|ch| {
                let cp = ch as u32;
                self.reverse_differences
                    .get(&cp)
                    .copied()
                    .or_else(|| unicode_to_winansi(cp))
                    .unwrap_or(b'?')
            })
            .collect()
    }
}

impl PdfWriter {
    /// Announce text that will be drawn with `font`, so a subset embedding
    /// keeps its glyphs. Must precede the first `select_font` of that font.
    pub fn register_text(&mut self, font: &str, text: &str) {
        let embedded = self
            .state
            .fonts
            .get(font)
            .is_some_and(|entry| entry.unicode && self.state.config.subset_fonts);
        if embedded {
            self.warn(format!("Text registered for {} after it was embedded", font));
        }
        self.state
            .registered_text
            .entry(font.to_string())
            .or_default()
            .extend(text.chars().map(|c| c as u32));
    }

    /// Select a font by name, loading and embedding it on first use.
    ///
    /// With `set` the font becomes current. Returns the font number, or
    /// `None` (with a message) when no source knows the font.
    pub fn select_font(
        &mut self,
        name: &str,
        encoding: Option<&FontDifferences>,
        set: bool,
        subset: bool,
    ) -> Result<Option<usize>> {
        if let Some(entry) = self.state.fonts.get(name) {
            let number = entry.number;
            if set {
                self.ctx.current_font = Some(name.to_string());
            }
            return Ok(Some(number));
        }

        let Some(metrics) = self.load_metrics(name) else {
            return Ok(None);
        };
        let number = self.state.fonts.len() + 1;
        let resource_name = format!("F{}", number);
        let unicode = metrics.is_embeddable() && self.state.config.unicode;

        let font_id = if !metrics.is_embeddable() {
            self.add_standard_font(name, &metrics, &resource_name, encoding)
        } else if unicode {
            let subset = subset && self.state.config.subset_fonts;
            self.add_unicode_font(name, &metrics, &resource_name, subset)?
        } else {
            self.add_single_byte_font(&metrics, &resource_name)
        };

        self.pages_mut()?
            .resources
            .fonts
            .insert(resource_name.clone(), font_id);
        log::debug!("Font {} as /{} in object {}", name, resource_name, font_id);

        let reverse_differences = match encoding {
            Some(enc) if !unicode => enc
                .differences
                .iter()
                .filter_map(|(&code, glyph)| glyph_name_to_unicode(glyph).map(|cp| (cp, code)))
                .collect(),
            _ => HashMap::new(),
        };
        self.state.fonts.insert(
            name.to_string(),
            FontEntry {
                number,
                font_id,
                metrics: Arc::new(metrics),
                unicode,
                reverse_differences,
            },
        );
        if set {
            self.ctx.current_font = Some(name.to_string());
        }
        Ok(Some(number))
    }

    fn load_metrics(&mut self, name: &str) -> Option<FontMetrics> {
        for source in self.sources.clone() {
            match source.load(name) {
                Ok(Some(metrics)) => return Some(metrics),
                Ok(None) => {}
                Err(e) => {
                    self.warn(format!("Font {} could not be loaded: {}", name, e));
                    return None;
                }
            }
        }
        self.warn(format!("Font {} not found", name));
        None
    }

    fn add_standard_font(
        &mut self,
        name: &str,
        metrics: &FontMetrics,
        resource_name: &str,
        encoding: Option<&FontDifferences>,
    ) -> ObjectId {
        let encoding = if standard_fonts::is_symbolic(name) {
            FontEncodingRef::None
        } else {
            match encoding {
                Some(enc) if !enc.differences.is_empty() => {
                    let id = self.state.store.insert(PdfObject::FontEncoding(FontEncoding {
                        base: enc.base.clone().unwrap_or_else(|| WINANSI.to_string()),
                        differences: enc.differences.clone(),
                    }));
                    FontEncodingRef::Differences(id)
                }
                Some(enc) => FontEncodingRef::Named(enc.base.clone().unwrap_or_else(|| WINANSI.to_string())),
                None => FontEncodingRef::Named(WINANSI.to_string()),
            }
        };
        self.state
            .store
            .insert(PdfObject::Font(Font::type1(resource_name, &metrics.name, encoding)))
    }

    fn add_single_byte_font(&mut self, metrics: &FontMetrics, resource_name: &str) -> ObjectId {
        let program = metrics.program.clone().unwrap_or_default();
        let font_file = self.state.store.insert(PdfObject::FontFile(FontFile { program }));
        let descriptor = self.state.store.insert(PdfObject::FontDescriptor(FontDescriptor::from_metrics(
            metrics,
            &metrics.name,
            Some(font_file),
        )));
        let widths = (32u8..=255)
            .map(|byte| winansi_to_unicode(byte).map_or(metrics.missing_width, |cp| metrics.width(cp)))
            .collect();
        self.state.store.insert(PdfObject::Font(Font {
            subtype: FontSubtype::TrueType,
            descriptor: Some(descriptor),
            first_char: 32,
            widths,
            ..Font::type1(resource_name, &metrics.name, FontEncodingRef::Named(WINANSI.to_string()))
        }))
    }

    fn add_unicode_font(
        &mut self,
        name: &str,
        metrics: &FontMetrics,
        resource_name: &str,
        subset: bool,
    ) -> Result<ObjectId> {
        let used: BTreeMap<u32, u16> = if subset {
            let mut codepoints = self.state.registered_text.get(name).cloned().unwrap_or_default();
            codepoints.insert(32);
            codepoints
                .into_iter()
                .filter(|cp| *cp <= 0xFFFF)
                .filter_map(|cp| metrics.glyph_id(cp).map(|gid| (cp, gid)))
                .collect()
        } else {
            metrics
                .glyph_ids
                .iter()
                .filter(|(cp, _)| **cp <= 0xFFFF)
                .map(|(cp, gid)| (*cp, *gid))
                .collect()
        };

        let full_program = metrics.program.clone().unwrap_or_default();
        let (program, base_font, remap) = if subset {
            match subset_truetype(&full_program, &used) {
                Ok(font) => {
                    let tag = subset_tag(used.values().copied());
                    (Bytes::from(font.program), subset_font_name(&tag, &metrics.name), Some(font.gid_remap))
                }
                Err(e) => {
                    self.warn(format!("Subsetting {} failed, embedding the full font: {}", name, e));
                    (full_program, metrics.name.clone(), None)
                }
            }
        } else {
            (full_program, metrics.name.clone(), None)
        };

        let map = used
            .iter()
            .map(|(&cp, &gid)| {
                let gid = remap.as_ref().and_then(|r| r.get(&gid).copied()).unwrap_or(gid);
                (cp, gid)
            })
            .collect();
        let widths = used.keys().map(|&cp| (cp, metrics.width(cp))).collect();

        let font_id = self.state.store.allocate();
        let font_file = self.state.store.insert(PdfObject::FontFile(FontFile { program }));
        let descriptor = self.state.store.insert(PdfObject::FontDescriptor(FontDescriptor::from_metrics(
            metrics,
            &base_font,
            Some(font_file),
        )));
        let cid_to_gid_map = self
            .state
            .store
            .insert(PdfObject::FontGidToCidMap(CidToGidMap { map }));
        let descendant = self.state.store.insert(PdfObject::FontDescendantCid(CidFont {
            base_font: base_font.clone(),
            descriptor,
            cid_to_gid_map,
            widths,
            default_width: metrics.missing_width,
        }));
        let to_unicode = self.state.store.insert(PdfObject::FontToUnicode(ToUnicode));
        let font = Font {
            subtype: FontSubtype::Type0,
            descendant: Some(descendant),
            to_unicode: Some(to_unicode),
            ..Font::type1(resource_name, base_font, FontEncodingRef::None)
        };
        self.state.store.set(font_id, PdfObject::Font(font))?;
        Ok(font_id)
    }

    /// The current font, falling back to the configured default.
    fn text_font(&mut self) -> Result<Option<FontEntry>> {
        if self.ctx.current_font.is_none() {
            let default = self.state.config.default_font.clone();
            self.select_font(&default, None, true, true)?;
        }
        Ok(self
            .ctx
            .current_font
            .as_ref()
            .and_then(|name| self.state.fonts.get(name))
            .cloned())
    }

    /// Draw `text` with its baseline starting at `(x, y)`.
    ///
    /// `angle` rotates counterclockwise in degrees. The spacing
    /// adjustments are in unscaled text space units.
    #[allow(clippy::too_many_arguments)]
    pub fn add_text(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        text: &str,
        angle: f32,
        word_space_adjust: f32,
        char_space_adjust: f32,
    ) -> Result<()> {
        let Some(font) = self.text_font()? else {
            self.warn("No font available for text");
            return Ok(());
        };

        let mut ops = vec![ContentStreamOp::BeginText];
        if angle == 0.0 {
            ops.push(ContentStreamOp::MoveText(x, y));
        } else {
            let (s, c) = angle.to_radians().sin_cos();
            ops.push(ContentStreamOp::SetTextMatrix(c, s, -s, c, x, y));
        }
        if word_space_adjust != 0.0 {
            ops.push(ContentStreamOp::SetWordSpacing(word_space_adjust));
        }
        if char_space_adjust != 0.0 {
            ops.push(ContentStreamOp::SetCharacterSpacing(char_space_adjust));
        }
        ops.push(ContentStreamOp::SetFont(font.resource_name(), size));

        let encoded = font.encode(text);
        if font.unicode && word_space_adjust != 0.0 && size != 0.0 {
            let adjustment = -(1000.0 / size * word_space_adjust).round() as i32;
            let mut items = Vec::new();
            let mut chunk = Vec::new();
            for unit in encoded.chunks(2) {
                chunk.extend_from_slice(unit);
                if unit == [0x00, 0x20] {
                    items.push(TextArrayItem::HexText(std::mem::take(&mut chunk)));
                    items.push(TextArrayItem::Adjustment(adjustment));
                }
            }
            if !chunk.is_empty() {
                items.push(TextArrayItem::HexText(chunk));
            }
            ops.push(ContentStreamOp::ShowTextArray(items));
        } else if font.unicode {
            ops.push(ContentStreamOp::ShowHexText(encoded));
        } else {
            ops.push(ContentStreamOp::ShowText(encoded));
        }
        ops.push(ContentStreamOp::EndText);
        // Tw and Tc outlive ET
        if word_space_adjust != 0.0 {
            ops.push(ContentStreamOp::SetWordSpacing(0.0));
        }
        if char_space_adjust != 0.0 {
            ops.push(ContentStreamOp::SetCharacterSpacing(0.0));
        }
        self.emit(ops)
    }

    /// Width of `text` at `size` in the current font.
    pub fn text_width(&mut self, size: f32, text: &str, word_spacing: f32, char_spacing: f32) -> Result<f32> {
        let Some(font) = self.text_font()? else {
            return Ok(0.0);
        };
        if size == 0.0 {
            return Ok(0.0);
        }
        let mut total = 0.0f32;
        for ch in text.chars() {
            let cp = ch as u32;
            total += f32::from(font.metrics.width(cp));
            if cp == 32 {
                total += word_spacing * 1000.0 / size;
            }
            total += char_spacing * 1000.0 / size;
        }
        Ok(total * size / 1000.0)
    }

    /// Bounding box height of the current font at `size`.
    pub fn font_height(&mut self, size: f32) -> Result<f32> {
        Ok(self
            .text_font()?
            .map_or(0.0, |f| (f.metrics.bbox[3] - f.metrics.bbox[1]) as f32 * size / 1000.0))
    }

    /// Descender of the current font at `size`; negative below the baseline.
    pub fn font_descender(&mut self, size: f32) -> Result<f32> {
        Ok(self
            .text_font()?
            .map_or(0.0, |f| f.metrics.descender as f32 * size / 1000.0))
    }

    /// x-height of the current font at `size`.
    pub fn font_x_height(&mut self, size: f32) -> Result<f32> {
        Ok(self
            .text_font()?
            .map_or(0.0, |f| f.metrics.x_height as f32 * size / 1000.0))
    }

    /// Bounding box of the current font in glyph units.
    pub fn font_bbox(&mut self) -> Result<Option<[i32; 4]>> {
        Ok(self.text_font()?.map(|f| f.metrics.bbox))
    }

    /// Name of the current font.
    pub fn current_font(&self) -> Option<&str> {
        self.ctx.current_font.as_deref()
    }
}
