//! Text encodings used when writing strings.
//!
//! Single-byte fonts use WinAnsi (Windows-1252); Unicode fonts use two-byte
//! codes equal to the UTF-16BE code units of the text.

/// WinAnsi code points for bytes 0x80-0x9F, where WinAnsi differs from Latin-1.
const WINANSI_HIGH: [(u8, u32); 27] = [
    (0x80, 0x20AC), // Euro sign
    (0x82, 0x201A), // Single low-9 quotation mark
    (0x83, 0x0192), // Latin small letter f with hook
    (0x84, 0x201E), // Double low-9 quotation mark
    (0x85, 0x2026), // Horizontal ellipsis
    (0x86, 0x2020), // Dagger
    (0x87, 0x2021), // Double dagger
    (0x88, 0x02C6), // Modifier letter circumflex accent
    (0x89, 0x2030), // Per mille sign
    (0x8A, 0x0160), // Latin capital letter S with caron
    (0x8B, 0x2039), // Single left-pointing angle quotation mark
    (0x8C, 0x0152), // Latin capital ligature OE
    (0x8E, 0x017D), // Latin capital letter Z with caron
    (0x91, 0x2018), // Left single quotation mark
    (0x92, 0x2019), // Right single quotation mark
    (0x93, 0x201C), // Left double quotation mark
    (0x94, 0x201D), // Right double quotation mark
    (0x95, 0x2022), // Bullet
    (0x96, 0x2013), // En dash
    (0x97, 0x2014), // Em dash
    (0x98, 0x02DC), // Small tilde
    (0x99, 0x2122), // Trade mark sign
    (0x9A, 0x0161), // Latin small letter s with caron
    (0x9B, 0x203A), // Single right-pointing angle quotation mark
    (0x9C, 0x0153), // Latin small ligature oe
    (0x9E, 0x017E), // Latin small letter z with caron
    (0x9F, 0x0178), // Latin capital letter Y with diaeresis
];

/// Map a Unicode code point to its WinAnsi byte.
pub fn unicode_to_winansi(codepoint: u32) -> Option<u8> {
    if codepoint < 0x80 || (0xA0..=0xFF).contains(&codepoint) {
        return Some(codepoint as u8);
    }
    WINANSI_HIGH
        .iter()
        .find(|(_, cp)| *cp == codepoint)
        .map(|(byte, _)| *byte)
}

/// Map a WinAnsi byte back to its Unicode code point.
pub fn winansi_to_unicode(byte: u8) -> Option<u32> {
    if byte < 0x80 || byte >= 0xA0 {
        return Some(u32::from(byte));
    }
    WINANSI_HIGH
        .iter()
        .find(|(b, _)| *b == byte)
        .map(|(_, cp)| *cp)
}

/// UTF-16BE code units of `text`, without a byte order mark.
pub fn encode_utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

/// Encode a PDF text string (document information, annotations).
///
/// ASCII text is kept as is; anything else becomes UTF-16BE with a BOM.
pub fn encode_text_string(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        return text.as_bytes().to_vec();
    }
    let mut out = vec![0xFE, 0xFF];
    out.extend(encode_utf16be(text));
    out
}

/// Glyph names most often seen in `/Differences` arrays.
const GLYPH_NAMES: &[(&str, u32)] = &[
    ("space", 0x20),
    ("exclam", 0x21),
    ("quotedbl", 0x22),
    ("numbersign", 0x23),
    ("dollar", 0x24),
    ("percent", 0x25),
    ("ampersand", 0x26),
    ("quotesingle", 0x27),
    ("parenleft", 0x28),
    ("parenright", 0x29),
    ("asterisk", 0x2A),
    ("plus", 0x2B),
    ("comma", 0x2C),
    ("hyphen", 0x2D),
    ("period", 0x2E),
    ("slash", 0x2F),
    ("zero", 0x30),
    ("one", 0x31),
    ("two", 0x32),
    ("three", 0x33),
    ("four", 0x34),
    ("five", 0x35),
    ("six", 0x36),
    ("seven", 0x37),
    ("eight", 0x38),
    ("nine", 0x39),
    ("colon", 0x3A),
    ("semicolon", 0x3B),
    ("less", 0x3C),
    ("equal", 0x3D),
    ("greater", 0x3E),
    ("question", 0x3F),
    ("at", 0x40),
    ("bracketleft", 0x5B),
    ("backslash", 0x5C),
    ("bracketright", 0x5D),
    ("asciicircum", 0x5E),
    ("underscore", 0x5F),
    ("grave", 0x60),
    ("braceleft", 0x7B),
    ("bar", 0x7C),
    ("braceright", 0x7D),
    ("asciitilde", 0x7E),
    ("nbspace", 0xA0),
    ("exclamdown", 0xA1),
    ("cent", 0xA2),
    ("sterling", 0xA3),
    ("currency", 0xA4),
    ("yen", 0xA5),
    ("section", 0xA7),
    ("dieresis", 0xA8),
    ("copyright", 0xA9),
    ("guillemotleft", 0xAB),
    ("registered", 0xAE),
    ("degree", 0xB0),
    ("plusminus", 0xB1),
    ("acute", 0xB4),
    ("mu", 0xB5),
    ("paragraph", 0xB6),
    ("periodcentered", 0xB7),
    ("guillemotright", 0xBB),
    ("questiondown", 0xBF),
    ("multiply", 0xD7),
    ("germandbls", 0xDF),
    ("divide", 0xF7),
    ("dotlessi", 0x0131),
    ("Lslash", 0x0141),
    ("lslash", 0x0142),
    ("OE", 0x0152),
    ("oe", 0x0153),
    ("Scaron", 0x0160),
    ("scaron", 0x0161),
    ("Ydieresis", 0x0178),
    ("Zcaron", 0x017D),
    ("zcaron", 0x017E),
    ("florin", 0x0192),
    ("circumflex", 0x02C6),
    ("caron", 0x02C7),
    ("breve", 0x02D8),
    ("dotaccent", 0x02D9),
    ("ring", 0x02DA),
    ("ogonek", 0x02DB),
    ("tilde", 0x02DC),
    ("hungarumlaut", 0x02DD),
    ("endash", 0x2013),
    ("emdash", 0x2014),
    ("quoteleft", 0x2018),
    ("quoteright", 0x2019),
    ("quotesinglbase", 0x201A),
    ("quotedblleft", 0x201C),
    ("quotedblright", 0x201D),
    ("quotedblbase", 0x201E),
    ("dagger", 0x2020),
    ("daggerdbl", 0x2021),
    ("bullet", 0x2022),
    ("ellipsis", 0x2026),
    ("perthousand", 0x2030),
    ("guilsinglleft", 0x2039),
    ("guilsinglright", 0x203A),
    ("Euro", 0x20AC),
    ("trademark", 0x2122),
    ("fi", 0xFB01),
    ("fl", 0xFB02),
];

/// Resolve a glyph name to a Unicode code point.
///
/// Handles single ASCII letters, `uniXXXX`, `uXXXX[XX]` and a table of
/// common names.
pub fn glyph_name_to_unicode(name: &str) -> Option<u32> {
    let bytes = name.as_bytes();
    if bytes.len() == 1 && bytes[0].is_ascii_alphabetic() {
        return Some(u32::from(bytes[0]));
    }
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            return u32::from_str_radix(hex, 16).ok();
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            if let Ok(cp) = u32::from_str_radix(hex, 16) {
                return Some(cp);
            }
        }
    }
    GLYPH_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, cp)| *cp)
}
