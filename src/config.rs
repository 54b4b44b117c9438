//! Configuration for document generation.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::Result;

/// Common paper sizes, in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    /// 297 x 420 mm
    A3,
    /// 210 x 297 mm
    A4,
    /// 148 x 210 mm
    A5,
    /// 8.5 x 11 in
    Letter,
    /// 8.5 x 14 in
    Legal,
}

impl PaperSize {
    /// Portrait width and height.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (841.89, 1190.55),
            PaperSize::A4 => (595.28, 841.89),
            PaperSize::A5 => (419.53, 595.28),
            PaperSize::Letter => (612.0, 792.0),
            PaperSize::Legal => (612.0, 1008.0),
        }
    }

    /// Media box `[0 0 w h]`, swapped for landscape.
    pub fn media_box(&self, landscape: bool) -> [f32; 4] {
        let (w, h) = self.dimensions();
        if landscape {
            [0.0, 0.0, h, w]
        } else {
            [0.0, 0.0, w, h]
        }
    }
}

/// Document generation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Media box inherited by every page
    pub media_box: [f32; 4],

    /// Flate-compress streams in `output()`
    pub compress: bool,

    /// Font used by `add_text` when none is selected
    pub default_font: String,

    /// Embed TrueType fonts as Type0 fonts with 2-byte codes
    pub unicode: bool,

    /// Subset embedded Unicode TrueType fonts
    pub subset_fonts: bool,

    /// Directories searched for `<name>.ttf`
    pub font_dirs: Vec<PathBuf>,

    /// /Producer entry
    pub producer: String,

    /// /Title entry
    pub title: Option<String>,

    /// /Author entry
    pub author: Option<String>,

    /// /Subject entry
    pub subject: Option<String>,

    /// /Creator entry
    pub creator: Option<String>,

    /// Fixed /CreationDate; the current local time when unset
    #[serde(skip)]
    pub creation_date: Option<DateTime<FixedOffset>>,

    /// Seed for the file identifier; derived from the creation date when unset
    pub document_id: Option<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfConfig {
    /// Create new configuration with defaults: A4 portrait, compression on.
    pub fn new() -> Self {
        Self {
            media_box: PaperSize::A4.media_box(false),
            compress: true,
            default_font: "Helvetica".to_string(),
            unicode: true,
            subset_fonts: true,
            font_dirs: Vec::new(),
            producer: "pdf_scribe".to_string(),
            title: None,
            author: None,
            subject: None,
            creator: None,
            creation_date: None,
            document_id: None,
        }
    }

    /// Read configuration from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the media box.
    pub fn with_media_box(mut self, media_box: [f32; 4]) -> Self {
        self.media_box = media_box;
        self
    }

    /// Set the media box from a paper size.
    pub fn with_paper_size(mut self, size: PaperSize, landscape: bool) -> Self {
        self.media_box = size.media_box(landscape);
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the fallback font.
    pub fn with_default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = font.into();
        self
    }

    /// Embed TrueType fonts as Unicode or as single-byte WinAnsi fonts.
    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    /// Enable or disable TrueType subsetting.
    pub fn with_subset_fonts(mut self, subset: bool) -> Self {
        self.subset_fonts = subset;
        self
    }

    /// Add a font search directory.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Fix the creation date, for reproducible output.
    pub fn with_creation_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Fix the file identifier seed, for reproducible output.
    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }
}

/// Format a date as a PDF date string, `D:YYYYMMDDHHmmSS+HH'mm'`.
pub fn pdf_date(date: &DateTime<FixedOffset>) -> String {
    let offset = date.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    format!(
        "{}{}{:02}'{:02}'",
        date.format("D:%Y%m%d%H%M%S"),
        sign,
        offset / 3600,
        (offset % 3600) / 60
    )
}
