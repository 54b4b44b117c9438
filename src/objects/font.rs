//! Font dictionaries and their satellites.
//!
//! A simple font is one object (plus an optional encoding and descriptor).
//! A Unicode font is a Type0 font whose descendant CIDFontType2 carries the
//! widths, with a CIDToGIDMap stream, a ToUnicode stream, a descriptor and
//! the font program as separate objects.

use std::collections::BTreeMap;

use bytes::Bytes;

use super::{compress_data, OutContext};
use crate::error::Result;
use crate::fonts::cmap::{CID_SYSTEM_INFO, IDENTITY_UCS};
use crate::fonts::metrics::FontMetrics;
use crate::object::{Dict, Object};
use crate::store::ObjectId;

/// Font dictionary subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSubtype {
    /// Standard font, never embedded
    Type1,
    /// Single-byte embedded TrueType
    TrueType,
    /// Composite font with an Identity-H CMap
    Type0,
}

/// The /Encoding entry of a font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontEncodingRef {
    /// No entry (symbolic fonts)
    None,
    /// A predefined encoding name
    Named(String),
    /// A FontEncoding object with /Differences
    Differences(ObjectId),
}

/// A font dictionary.
#[derive(Debug, Clone)]
pub struct Font {
    /// Resource name, `F<n>`
    pub resource_name: String,
    /// /BaseFont, including a subset tag when subset
    pub base_font: String,
    /// Font subtype
    pub subtype: FontSubtype,
    /// /Encoding for simple fonts
    pub encoding: FontEncodingRef,
    /// Descendant CIDFont (Type0 only)
    pub descendant: Option<ObjectId>,
    /// ToUnicode stream (Type0 only)
    pub to_unicode: Option<ObjectId>,
    /// Descriptor (embedded simple fonts)
    pub descriptor: Option<ObjectId>,
    /// First code of `widths`
    pub first_char: u32,
    /// /Widths of an embedded simple font
    pub widths: Vec<u16>,
}

impl Font {
    /// A standard font.
    pub fn type1(resource_name: impl Into<String>, base_font: impl Into<String>, encoding: FontEncodingRef) -> Self {
        Self {
            resource_name: resource_name.into(),
            base_font: base_font.into(),
            subtype: FontSubtype::Type1,
            encoding,
            descendant: None,
            to_unicode: None,
            descriptor: None,
            first_char: 0,
            widths: Vec::new(),
        }
    }

    /// Build the font dictionary.
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Font"));
        match self.subtype {
            FontSubtype::Type0 => {
                dict.insert("Subtype".into(), Object::name("Type0"));
                dict.insert("BaseFont".into(), Object::name(&self.base_font));
                dict.insert("Encoding".into(), Object::name("Identity-H"));
                if let Some(id) = self.descendant {
                    dict.insert("DescendantFonts".into(), Object::Array(vec![Object::reference(id)]));
                }
                if let Some(id) = self.to_unicode {
                    dict.insert("ToUnicode".into(), Object::reference(id));
                }
            }
            FontSubtype::Type1 | FontSubtype::TrueType => {
                let subtype = if self.subtype == FontSubtype::Type1 { "Type1" } else { "TrueType" };
                dict.insert("Subtype".into(), Object::name(subtype));
                dict.insert("Name".into(), Object::name(&self.resource_name));
                dict.insert("BaseFont".into(), Object::name(&self.base_font));
                match &self.encoding {
                    FontEncodingRef::None => {}
                    FontEncodingRef::Named(name) => {
                        dict.insert("Encoding".into(), Object::name(name));
                    }
                    FontEncodingRef::Differences(id) => {
                        dict.insert("Encoding".into(), Object::reference(*id));
                    }
                }
                if !self.widths.is_empty() {
                    let last = self.first_char as usize + self.widths.len() - 1;
                    dict.insert("FirstChar".into(), Object::Integer(i64::from(self.first_char)));
                    dict.insert("LastChar".into(), Object::Integer(last as i64));
                    dict.insert(
                        "Widths".into(),
                        Object::integers(self.widths.iter().map(|w| i64::from(*w))),
                    );
                }
                if let Some(id) = self.descriptor {
                    dict.insert("FontDescriptor".into(), Object::reference(id));
                }
            }
        }
        Object::Dictionary(dict)
    }
}

/// Font descriptor of an embedded font.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    /// /FontName, matching the font's /BaseFont
    pub font_name: String,
    /// /Flags
    pub flags: u32,
    /// /FontBBox
    pub bbox: [i32; 4],
    /// /ItalicAngle
    pub italic_angle: f32,
    /// /Ascent
    pub ascent: i32,
    /// /Descent
    pub descent: i32,
    /// /CapHeight
    pub cap_height: i32,
    /// /XHeight
    pub x_height: i32,
    /// /StemV
    pub stem_v: i32,
    /// /MissingWidth
    pub missing_width: u16,
    /// /FontFile2
    pub font_file: Option<ObjectId>,
}

impl FontDescriptor {
    /// Descriptor values taken from a metrics record.
    pub fn from_metrics(metrics: &FontMetrics, font_name: impl Into<String>, font_file: Option<ObjectId>) -> Self {
        Self {
            font_name: font_name.into(),
            flags: metrics.flags,
            bbox: metrics.bbox,
            italic_angle: metrics.italic_angle,
            ascent: metrics.ascender,
            descent: metrics.descender,
            cap_height: metrics.cap_height,
            x_height: metrics.x_height,
            stem_v: metrics.stem_v,
            missing_width: metrics.missing_width,
            font_file,
        }
    }

    /// Build the descriptor dictionary.
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("FontDescriptor"));
        dict.insert("FontName".into(), Object::name(&self.font_name));
        dict.insert("Flags".into(), Object::Integer(i64::from(self.flags)));
        dict.insert(
            "FontBBox".into(),
            Object::integers(self.bbox.iter().map(|v| i64::from(*v))),
        );
        dict.insert("ItalicAngle".into(), Object::from(self.italic_angle));
        dict.insert("Ascent".into(), Object::Integer(i64::from(self.ascent)));
        dict.insert("Descent".into(), Object::Integer(i64::from(self.descent)));
        dict.insert("CapHeight".into(), Object::Integer(i64::from(self.cap_height)));
        dict.insert("XHeight".into(), Object::Integer(i64::from(self.x_height)));
        dict.insert("StemV".into(), Object::Integer(i64::from(self.stem_v)));
        dict.insert("MissingWidth".into(), Object::Integer(i64::from(self.missing_width)));
        if let Some(id) = self.font_file {
            dict.insert("FontFile2".into(), Object::reference(id));
        }
        Object::Dictionary(dict)
    }
}

/// An encoding dictionary with a /Differences array.
#[derive(Debug, Clone)]
pub struct FontEncoding {
    /// /BaseEncoding name
    pub base: String,
    /// Code to glyph name
    pub differences: BTreeMap<u8, String>,
}

impl FontEncoding {
    /// Build the encoding dictionary.
    ///
    /// Consecutive codes share one leading number in /Differences.
    pub fn to_object(&self) -> Object {
        let mut diffs = Vec::new();
        let mut previous: Option<u8> = None;
        for (&code, name) in &self.differences {
            if previous.map(|p| u16::from(p) + 1) != Some(u16::from(code)) {
                diffs.push(Object::Integer(i64::from(code)));
            }
            diffs.push(Object::name(name));
            previous = Some(code);
        }

        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Encoding"));
        dict.insert("BaseEncoding".into(), Object::name(&self.base));
        dict.insert("Differences".into(), Object::Array(diffs));
        Object::Dictionary(dict)
    }
}

/// The CIDFontType2 descendant of a Unicode font.
#[derive(Debug, Clone)]
pub struct CidFont {
    /// /BaseFont
    pub base_font: String,
    /// Font descriptor
    pub descriptor: ObjectId,
    /// CIDToGIDMap stream
    pub cid_to_gid_map: ObjectId,
    /// Width per CID
    pub widths: BTreeMap<u32, u16>,
    /// /DW
    pub default_width: u16,
}

impl CidFont {
    /// The /W array: `start [w1 w2 ...]` for each run of consecutive CIDs.
    pub fn width_array(&self) -> Object {
        let mut array = Vec::new();
        let mut run: Vec<Object> = Vec::new();
        let mut run_start = 0u32;
        let mut previous: Option<u32> = None;

        for (&cid, &width) in &self.widths {
            if previous.map(|p| p + 1) != Some(cid) && !run.is_empty() {
                array.push(Object::Integer(i64::from(run_start)));
                array.push(Object::Array(std::mem::take(&mut run)));
            }
            if run.is_empty() {
                run_start = cid;
            }
            run.push(Object::Integer(i64::from(width)));
            previous = Some(cid);
        }
        if !run.is_empty() {
            array.push(Object::Integer(i64::from(run_start)));
            array.push(Object::Array(run));
        }
        Object::Array(array)
    }

    /// Build the CIDFont dictionary.
    pub fn to_object(&self) -> Object {
        let (registry, ordering, supplement) = CID_SYSTEM_INFO;
        let mut info = Dict::new();
        info.insert("Registry".into(), Object::string(registry));
        info.insert("Ordering".into(), Object::string(ordering));
        info.insert("Supplement".into(), Object::Integer(supplement));

        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("Font"));
        dict.insert("Subtype".into(), Object::name("CIDFontType2"));
        dict.insert("BaseFont".into(), Object::name(&self.base_font));
        dict.insert("CIDSystemInfo".into(), Object::Dictionary(info));
        dict.insert("FontDescriptor".into(), Object::reference(self.descriptor));
        dict.insert("DW".into(), Object::Integer(i64::from(self.default_width)));
        dict.insert("W".into(), self.width_array());
        dict.insert("CIDToGIDMap".into(), Object::reference(self.cid_to_gid_map));
        Object::Dictionary(dict)
    }
}

fn stream(mut dict: Dict, data: Vec<u8>, ctx: &OutContext<'_>) -> Result<Object> {
    let data = if ctx.compress {
        dict.insert("Filter".into(), Object::name("FlateDecode"));
        compress_data(&data)?
    } else {
        data
    };
    Ok(Object::Stream {
        dict,
        data: Bytes::from(data),
    })
}

/// CID to glyph id map of a Unicode font.
#[derive(Debug, Clone, Default)]
pub struct CidToGidMap {
    /// Glyph id per CID
    pub map: BTreeMap<u32, u16>,
}

impl CidToGidMap {
    /// Two big-endian bytes per CID from 0 to the highest mapped CID.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.map.keys().next_back().map_or(0, |max| *max as usize + 1);
        let mut data = vec![0u8; len * 2];
        for (&cid, &gid) in &self.map {
            let at = cid as usize * 2;
            data[at..at + 2].copy_from_slice(&gid.to_be_bytes());
        }
        data
    }

    /// Build the map stream.
    pub fn to_object(&self, ctx: &OutContext<'_>) -> Result<Object> {
        stream(Dict::new(), self.to_bytes(), ctx)
    }
}

/// Identity-UCS ToUnicode stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToUnicode;

impl ToUnicode {
    /// Build the CMap stream.
    pub fn to_object(&self, ctx: &OutContext<'_>) -> Result<Object> {
        stream(Dict::new(), IDENTITY_UCS.as_bytes().to_vec(), ctx)
    }
}

/// Embedded TrueType program.
#[derive(Debug, Clone)]
pub struct FontFile {
    /// The program bytes
    pub program: Bytes,
}

impl FontFile {
    /// Build the FontFile2 stream; /Length1 is the uncompressed length.
    pub fn to_object(&self, ctx: &OutContext<'_>) -> Result<Object> {
        let mut dict = Dict::new();
        dict.insert("Length1".into(), Object::Integer(self.program.len() as i64));
        if !ctx.compress {
            return Ok(Object::Stream {
                dict,
                data: self.program.clone(),
            });
        }
        stream(dict, self.program.to_vec(), ctx)
    }
}
