//! Metrics for the 14 standard PDF fonts.
//!
//! Widths for the printable ASCII range come from the Adobe core font
//! metrics. Oblique and italic faces reuse the widths of their upright face.
//! Latin-1 accented letters take the width of their base letter.

use std::collections::BTreeMap;

use super::metrics::{FontKind, FontMetrics};

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

#[rustfmt::skip]
const SYMBOL: [u16; 95] = [
    250, 333, 713, 500, 549, 833, 778, 439, 333, 333, 500, 549, 250, 549, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 549, 549, 549, 444, 549,
    722, 667, 722, 612, 611, 763, 603, 722, 333, 631, 722, 686, 889,
    722, 722, 768, 741, 556, 592, 611, 690, 439, 768, 645, 795, 611,
    333, 863, 333, 658, 500, 500,
    631, 549, 549, 494, 439, 521, 411, 603, 329, 603, 549, 549, 576,
    521, 549, 549, 521, 549, 603, 439, 576, 713, 686, 493, 686, 494,
    480, 200, 480, 549,
];

/// WinAnsi characters outside ASCII: (code point, sans width, serif width).
#[rustfmt::skip]
const EXTENDED: &[(u32, u16, u16)] = &[
    (0x20AC, 556, 500), (0x201A, 222, 333), (0x0192, 556, 500), (0x201E, 333, 444),
    (0x2026, 1000, 1000), (0x2020, 556, 500), (0x2021, 556, 500), (0x02C6, 333, 333),
    (0x2030, 1000, 1000), (0x0160, 667, 556), (0x2039, 333, 333), (0x0152, 1000, 889),
    (0x017D, 611, 611), (0x2018, 222, 333), (0x2019, 222, 333), (0x201C, 333, 444),
    (0x201D, 333, 444), (0x2022, 350, 350), (0x2013, 556, 500), (0x2014, 1000, 1000),
    (0x02DC, 333, 333), (0x2122, 1000, 980), (0x0161, 500, 389), (0x203A, 333, 333),
    (0x0153, 944, 722), (0x017E, 500, 444), (0x0178, 667, 722),
    (0xA1, 333, 333), (0xA2, 556, 500), (0xA3, 556, 500), (0xA4, 556, 500),
    (0xA5, 556, 500), (0xA6, 260, 200), (0xA7, 556, 500), (0xA8, 333, 333),
    (0xA9, 737, 760), (0xAA, 370, 276), (0xAB, 556, 500), (0xAC, 584, 564),
    (0xAD, 333, 333), (0xAE, 737, 760), (0xAF, 333, 333), (0xB0, 400, 400),
    (0xB1, 584, 564), (0xB2, 333, 300), (0xB3, 333, 300), (0xB4, 333, 333),
    (0xB5, 556, 500), (0xB6, 537, 453), (0xB7, 278, 250), (0xB8, 333, 333),
    (0xB9, 333, 300), (0xBA, 365, 310), (0xBB, 556, 500), (0xBC, 834, 750),
    (0xBD, 834, 750), (0xBE, 834, 750), (0xBF, 611, 444), (0xC6, 1000, 889),
    (0xD0, 722, 722), (0xD7, 584, 564), (0xD8, 778, 722), (0xDE, 667, 556),
    (0xDF, 611, 500), (0xE6, 889, 667), (0xF0, 556, 500), (0xF7, 584, 564),
    (0xF8, 611, 500), (0xFE, 556, 500),
];

/// Base letter of a Latin-1 accented letter.
fn base_letter(cp: u32) -> Option<u32> {
    let base = match cp {
        0xC0..=0xC5 => 'A',
        0xC7 => 'C',
        0xC8..=0xCB => 'E',
        0xCC..=0xCF => 'I',
        0xD1 => 'N',
        0xD2..=0xD6 => 'O',
        0xD9..=0xDC => 'U',
        0xDD => 'Y',
        0xE0..=0xE5 => 'a',
        0xE7 => 'c',
        0xE8..=0xEB => 'e',
        0xEC..=0xEF => 'i',
        0xF1 => 'n',
        0xF2..=0xF6 => 'o',
        0xF9..=0xFC => 'u',
        0xFD | 0xFF => 'y',
        _ => return None,
    };
    Some(base as u32)
}

#[derive(Clone, Copy)]
enum Family {
    Helvetica,
    Times,
    Courier,
    Symbol,
    ZapfDingbats,
}

struct Face {
    name: &'static str,
    family: Family,
    bold: bool,
    italic: bool,
}

const FACES: [Face; 14] = [
    Face { name: "Helvetica", family: Family::Helvetica, bold: false, italic: false },
    Face { name: "Helvetica-Bold", family: Family::Helvetica, bold: true, italic: false },
    Face { name: "Helvetica-Oblique", family: Family::Helvetica, bold: false, italic: true },
    Face { name: "Helvetica-BoldOblique", family: Family::Helvetica, bold: true, italic: true },
    Face { name: "Times-Roman", family: Family::Times, bold: false, italic: false },
    Face { name: "Times-Bold", family: Family::Times, bold: true, italic: false },
    Face { name: "Times-Italic", family: Family::Times, bold: false, italic: true },
    Face { name: "Times-BoldItalic", family: Family::Times, bold: true, italic: true },
    Face { name: "Courier", family: Family::Courier, bold: false, italic: false },
    Face { name: "Courier-Bold", family: Family::Courier, bold: true, italic: false },
    Face { name: "Courier-Oblique", family: Family::Courier, bold: false, italic: true },
    Face { name: "Courier-BoldOblique", family: Family::Courier, bold: true, italic: true },
    Face { name: "Symbol", family: Family::Symbol, bold: false, italic: false },
    Face { name: "ZapfDingbats", family: Family::ZapfDingbats, bold: false, italic: false },
];

/// Whether `name` is one of the standard fonts (case-insensitive).
pub fn is_standard_font(name: &str) -> bool {
    find_face(name).is_some()
}

/// Whether the standard font uses its own built-in encoding.
pub fn is_symbolic(name: &str) -> bool {
    matches!(
        find_face(name).map(|f| f.family),
        Some(Family::Symbol | Family::ZapfDingbats)
    )
}

fn find_face(name: &str) -> Option<&'static Face> {
    let name = if name.eq_ignore_ascii_case("Times") {
        "Times-Roman"
    } else {
        name
    };
    FACES.iter().find(|f| f.name.eq_ignore_ascii_case(name))
}

/// Metrics for a standard font, or `None` if the name is not one of them.
pub fn metrics(name: &str) -> Option<FontMetrics> {
    let face = find_face(name)?;
    let mut widths = BTreeMap::new();

    let ascii: Option<&[u16; 95]> = match (face.family, face.bold) {
        (Family::Helvetica, false) => Some(&HELVETICA),
        (Family::Helvetica, true) => Some(&HELVETICA_BOLD),
        (Family::Times, false) => Some(&TIMES_ROMAN),
        (Family::Times, true) => Some(&TIMES_BOLD),
        (Family::Symbol, _) => Some(&SYMBOL),
        _ => None,
    };

    match face.family {
        Family::Courier => {
            for cp in (32..=126).chain(0xA0..=0xFF) {
                widths.insert(cp, 600);
            }
            for &(cp, _, _) in EXTENDED {
                widths.insert(cp, 600);
            }
        },
        Family::ZapfDingbats => {
            widths.insert(32, 278);
            for cp in 33..=126 {
                widths.insert(cp, 788);
            }
        },
        Family::Symbol => {
            if let Some(table) = ascii {
                for (i, w) in table.iter().enumerate() {
                    widths.insert(32 + i as u32, *w);
                }
            }
        },
        Family::Helvetica | Family::Times => {
            if let Some(table) = ascii {
                for (i, w) in table.iter().enumerate() {
                    widths.insert(32 + i as u32, *w);
                }
            }
            let serif = matches!(face.family, Family::Times);
            for &(cp, sans, serif_w) in EXTENDED {
                widths.insert(cp, if serif { serif_w } else { sans });
            }
            widths.insert(0xA0, widths.get(&32).copied().unwrap_or(250));
            for cp in 0xC0..=0xFF {
                if let Some(base) = base_letter(cp) {
                    if let Some(w) = widths.get(&base).copied() {
                        widths.insert(cp, w);
                    }
                }
            }
        },
    }

    let (bbox, ascender, descender, cap_height, x_height) = match (face.family, face.bold) {
        (Family::Helvetica, false) => ([-166, -225, 1000, 931], 718, -207, 718, 523),
        (Family::Helvetica, true) => ([-170, -228, 1003, 962], 718, -207, 718, 532),
        (Family::Times, false) => ([-168, -218, 1000, 898], 683, -217, 662, 450),
        (Family::Times, true) => ([-168, -218, 1000, 935], 683, -217, 676, 461),
        (Family::Courier, false) => ([-23, -250, 715, 805], 629, -157, 562, 426),
        (Family::Courier, true) => ([-113, -250, 749, 801], 629, -157, 562, 439),
        (Family::Symbol, _) => ([-180, -293, 1090, 1010], 1010, -293, 1010, 500),
        (Family::ZapfDingbats, _) => ([-1, -143, 981, 820], 820, -143, 820, 500),
    };

    let mut flags = match face.family {
        Family::Symbol | Family::ZapfDingbats => 1 << 2,
        _ => 1 << 5,
    };
    if matches!(face.family, Family::Courier) {
        flags |= 1;
    }
    if matches!(face.family, Family::Times) {
        flags |= 1 << 1;
    }
    if face.italic {
        flags |= 1 << 6;
    }

    Some(FontMetrics {
        name: face.name.to_string(),
        kind: FontKind::Standard,
        widths,
        glyph_ids: BTreeMap::new(),
        missing_width: if matches!(face.family, Family::Courier) { 600 } else { 500 },
        bbox,
        ascender,
        descender,
        cap_height,
        x_height,
        italic_angle: if face.italic { -12.0 } else { 0.0 },
        stem_v: if face.bold { 140 } else { 80 },
        flags,
        program: None,
    })
}
