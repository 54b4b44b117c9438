//! Minimal TrueType files built in memory for unit tests.

use byteorder::{BigEndian, ByteOrder};

use crate::fonts::font_subsetter::{build_cmap_format4, write_ttf_file};

enum Outline {
    Empty,
    Simple,
    Composite(Vec<u16>),
}

/// One glyph of a generated font; units per em is 1000.
pub(crate) struct TestGlyph {
    advance: u16,
    outline: Outline,
    codepoint: Option<u32>,
}

impl TestGlyph {
    pub(crate) fn empty(advance: u16) -> Self {
        Self {
            advance,
            outline: Outline::Empty,
            codepoint: None,
        }
    }

    /// A one-contour triangle.
    pub(crate) fn simple(advance: u16) -> Self {
        Self {
            outline: Outline::Simple,
            ..Self::empty(advance)
        }
    }

    pub(crate) fn composite(advance: u16, components: &[u16]) -> Self {
        Self {
            outline: Outline::Composite(components.to_vec()),
            ..Self::empty(advance)
        }
    }

    pub(crate) fn maps_to(mut self, codepoint: u32) -> Self {
        self.codepoint = Some(codepoint);
        self
    }
}

fn simple_glyph() -> Vec<u8> {
    let mut g = Vec::new();
    for v in [1i16, 0, 0, 100, 100] {
        g.extend_from_slice(&v.to_be_bytes());
    }
    g.extend_from_slice(&2u16.to_be_bytes()); // endPtsOfContours
    g.extend_from_slice(&0u16.to_be_bytes()); // instructionLength
    g.extend_from_slice(&[0x37, 0x37, 0x37]);
    g.extend_from_slice(&[0, 100, 0]);
    g.extend_from_slice(&[0, 0, 100]);
    g
}

fn composite_glyph(components: &[u16]) -> Vec<u8> {
    let mut g = Vec::new();
    for v in [-1i16, 0, 0, 100, 100] {
        g.extend_from_slice(&v.to_be_bytes());
    }
    for (i, &gid) in components.iter().enumerate() {
        let more = if i + 1 < components.len() { 0x0020 } else { 0 };
        g.extend_from_slice(&(0x0002u16 | more).to_be_bytes());
        g.extend_from_slice(&gid.to_be_bytes());
        g.extend_from_slice(&[0, 0]);
    }
    g
}

fn name_table(postscript_name: &str) -> Vec<u8> {
    let string: Vec<u8> = postscript_name
        .encode_utf16()
        .flat_map(u16::to_be_bytes)
        .collect();
    let mut t = Vec::new();
    // format, count, stringOffset
    for v in [0u16, 1, 18] {
        t.extend_from_slice(&v.to_be_bytes());
    }
    // platform 3, encoding 1, language 0x409, name id 6
    for v in [3u16, 1, 0x409, 6, string.len() as u16, 0] {
        t.extend_from_slice(&v.to_be_bytes());
    }
    t.extend_from_slice(&string);
    t
}

/// Build a font named `TestSans` with the given glyphs, ascender 800 and
/// descender -200.
pub(crate) fn build_test_font(glyphs: &[TestGlyph]) -> Vec<u8> {
    let num_glyphs = glyphs.len() as u16;

    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    let mut hmtx = Vec::new();
    for glyph in glyphs {
        loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());
        match &glyph.outline {
            Outline::Empty => {}
            Outline::Simple => glyf.extend(simple_glyph()),
            Outline::Composite(components) => glyf.extend(composite_glyph(components)),
        }
        while glyf.len() % 4 != 0 {
            glyf.push(0);
        }
        hmtx.extend_from_slice(&glyph.advance.to_be_bytes());
        hmtx.extend_from_slice(&0i16.to_be_bytes());
    }
    loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());

    let mut head = vec![0u8; 54];
    BigEndian::write_u32(&mut head[0..4], 0x0001_0000);
    BigEndian::write_u32(&mut head[12..16], 0x5F0F_3CF5);
    BigEndian::write_u16(&mut head[18..20], 1000);
    BigEndian::write_i16(&mut head[36..38], -50);
    BigEndian::write_i16(&mut head[38..40], -200);
    BigEndian::write_i16(&mut head[40..42], 1000);
    BigEndian::write_i16(&mut head[42..44], 800);
    BigEndian::write_i16(&mut head[50..52], 1);

    let mut hhea = vec![0u8; 36];
    BigEndian::write_u32(&mut hhea[0..4], 0x0001_0000);
    BigEndian::write_i16(&mut hhea[4..6], 800);
    BigEndian::write_i16(&mut hhea[6..8], -200);
    BigEndian::write_u16(&mut hhea[34..36], num_glyphs);

    let mut maxp = vec![0u8; 6];
    BigEndian::write_u32(&mut maxp[0..4], 0x0000_5000);
    BigEndian::write_u16(&mut maxp[4..6], num_glyphs);

    let mut post = vec![0u8; 32];
    BigEndian::write_u32(&mut post[0..4], 0x0003_0000);

    let char_to_gid: Vec<(u16, u16)> = glyphs
        .iter()
        .enumerate()
        .filter_map(|(gid, g)| g.codepoint.map(|cp| (cp as u16, gid as u16)))
        .collect();

    let mut tables = vec![
        (*b"cmap", build_cmap_format4(&char_to_gid)),
        (*b"glyf", glyf),
        (*b"head", head),
        (*b"hhea", hhea),
        (*b"hmtx", hmtx),
        (*b"loca", loca),
        (*b"maxp", maxp),
        (*b"name", name_table("TestSans")),
        (*b"post", post),
    ];
    write_ttf_file(&mut tables)
}
