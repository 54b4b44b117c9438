//! TrueType font subsetting for PDF embedding.
//!
//! Subset fonts carry a six letter tag prefix ("ABCDEF+FontName") and keep
//! only the glyphs the document uses. Glyph ids are renumbered contiguously
//! from 0, so the caller's CID-to-GID map must use the new ids returned in
//! [`SubsetFont::gid_remap`].
//!
//! Rebuilt tables: glyf, loca, hmtx, hhea, head, maxp, cmap (format 4) and
//! post (format 3). name, OS/2 and the hinting tables are copied as is.

use std::collections::{BTreeMap, BTreeSet};

use byteorder::{BigEndian, ByteOrder};
use md5::{Digest, Md5};

/// Errors raised while rebuilding a font program.
#[derive(Debug, thiserror::Error)]
pub enum SubsetError {
    /// A table the subsetter depends on is absent
    #[error("Missing font table: {0}")]
    MissingTable(&'static str),

    /// A table is shorter than its structure requires
    #[error("Truncated font table: {0}")]
    Truncated(&'static str),

    /// The font is not a glyf-based TrueType font
    #[error("Unsupported font: {0}")]
    Unsupported(String),
}

/// Result type for subsetting.
pub type SubsetResult<T> = std::result::Result<T, SubsetError>;

/// A rebuilt font program.
#[derive(Debug, Clone)]
pub struct SubsetFont {
    /// The subset TrueType file
    pub program: Vec<u8>,
    /// Original glyph id to new glyph id
    pub gid_remap: BTreeMap<u16, u16>,
}

impl SubsetFont {
    /// New glyph id for an original glyph id.
    pub fn new_gid(&self, old_gid: u16) -> Option<u16> {
        self.gid_remap.get(&old_gid).copied()
    }
}

/// Six uppercase letters derived from the used glyph set.
///
/// The same set always yields the same tag.
pub fn subset_tag<I: IntoIterator<Item = u16>>(glyphs: I) -> String {
    let mut hasher = Md5::new();
    for gid in glyphs {
        hasher.update(gid.to_be_bytes());
    }
    let digest = hasher.finalize();
    digest[..6]
        .iter()
        .map(|b| char::from(b'A' + b % 26))
        .collect()
}

/// "TAG+BaseName".
pub fn subset_font_name(tag: &str, base_name: &str) -> String {
    format!("{}+{}", tag, base_name)
}

/// Subset `data` to the glyphs of `used`, a code point to glyph id map.
///
/// Glyph 0 (.notdef) and every component of a used composite glyph are
/// always kept.
pub fn subset_truetype(data: &[u8], used: &BTreeMap<u32, u16>) -> SubsetResult<SubsetFont> {
    let head = find_table(data, b"head").ok_or(SubsetError::MissingTable("head"))?;
    let hhea = find_table(data, b"hhea").ok_or(SubsetError::MissingTable("hhea"))?;
    let maxp = find_table(data, b"maxp").ok_or(SubsetError::MissingTable("maxp"))?;
    let hmtx = find_table(data, b"hmtx").ok_or(SubsetError::MissingTable("hmtx"))?;
    let loca = find_table(data, b"loca").ok_or_else(|| {
        SubsetError::Unsupported("no glyf/loca tables (CFF outlines?)".to_string())
    })?;
    let glyf = find_table(data, b"glyf").ok_or(SubsetError::MissingTable("glyf"))?;

    if head.len() < 54 {
        return Err(SubsetError::Truncated("head"));
    }
    if hhea.len() < 36 {
        return Err(SubsetError::Truncated("hhea"));
    }
    let num_glyphs = read_u16(maxp, 4, "maxp")?;
    let loca_format = read_i16(head, 50, "head")?;
    let loca_offsets = parse_loca(loca, loca_format, num_glyphs)?;

    let mut needed: BTreeSet<u16> = BTreeSet::new();
    needed.insert(0);
    needed.extend(used.values().copied().filter(|&gid| gid < num_glyphs));
    let initial: Vec<u16> = needed.iter().copied().collect();
    for gid in initial {
        collect_composite_deps(glyf, &loca_offsets, gid, &mut needed, 0);
    }

    let gid_remap: BTreeMap<u16, u16> = needed
        .iter()
        .enumerate()
        .map(|(new_gid, &old_gid)| (old_gid, new_gid as u16))
        .collect();
    let new_num_glyphs = needed.len() as u16;

    let (new_glyf, new_offsets) = rebuild_glyf(glyf, &loca_offsets, &needed, &gid_remap);
    let new_loca_format: i16 = if new_glyf.len() > 0x1FFFE { 1 } else { 0 };
    let new_loca = build_loca(&new_offsets, new_loca_format);

    let num_h_metrics = read_u16(hhea, 34, "hhea")? as usize;
    let new_hmtx = rebuild_hmtx(hmtx, &needed, num_h_metrics);

    let char_to_gid: Vec<(u16, u16)> = used
        .iter()
        .filter(|(cp, _)| **cp <= 0xFFFF)
        .filter_map(|(&cp, old)| gid_remap.get(old).map(|&new_gid| (cp as u16, new_gid)))
        .collect();
    let new_cmap = build_cmap_format4(&char_to_gid);

    let mut new_head = head.to_vec();
    BigEndian::write_u32(&mut new_head[8..12], 0);
    BigEndian::write_i16(&mut new_head[50..52], new_loca_format);

    let mut new_hhea = hhea.to_vec();
    BigEndian::write_u16(&mut new_hhea[34..36], new_num_glyphs);

    let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
        (*b"cmap", new_cmap),
        (*b"glyf", new_glyf),
        (*b"head", new_head),
        (*b"hhea", new_hhea),
        (*b"hmtx", new_hmtx),
        (*b"loca", new_loca),
        (*b"maxp", rebuild_maxp(maxp, new_num_glyphs)),
        (*b"post", build_post_format3(data)),
    ];
    for tag in [b"name", b"OS/2", b"cvt ", b"fpgm", b"prep"] {
        if let Some(table) = find_table(data, tag) {
            tables.push((*tag, table.to_vec()));
        }
    }
    tables.sort_by_key(|(tag, _)| *tag);

    log::debug!(
        "Subset font program: {} of {} glyphs kept",
        new_num_glyphs,
        num_glyphs
    );

    Ok(SubsetFont {
        program: write_ttf_file(&mut tables),
        gid_remap,
    })
}

/// Locate a table in the font's table directory.
pub(crate) fn find_table<'a>(data: &'a [u8], tag: &[u8; 4]) -> Option<&'a [u8]> {
    let num_tables = data.get(4..6).map(BigEndian::read_u16)? as usize;
    (0..num_tables).find_map(|i| {
        let record = data.get(12 + i * 16..12 + i * 16 + 16)?;
        if &record[..4] != tag {
            return None;
        }
        let offset = BigEndian::read_u32(&record[8..12]) as usize;
        let length = BigEndian::read_u32(&record[12..16]) as usize;
        data.get(offset..offset.checked_add(length)?)
    })
}

fn parse_loca(data: &[u8], format: i16, num_glyphs: u16) -> SubsetResult<Vec<u32>> {
    let count = num_glyphs as usize + 1;
    let entry = if format == 0 { 2 } else { 4 };
    if data.len() < count * entry {
        return Err(SubsetError::Truncated("loca"));
    }
    Ok((0..count)
        .map(|i| {
            let pos = i * entry;
            if format == 0 {
                u32::from(BigEndian::read_u16(&data[pos..])) * 2
            } else {
                BigEndian::read_u32(&data[pos..])
            }
        })
        .collect())
}

fn glyph_range(loca_offsets: &[u32], gid: u16, glyf_len: usize) -> Option<(usize, usize)> {
    let idx = gid as usize;
    let start = *loca_offsets.get(idx)? as usize;
    let end = (*loca_offsets.get(idx + 1)? as usize).min(glyf_len);
    (start < end).then_some((start, end))
}

/// Walk the component records of a composite glyph.
///
/// Calls `f` with the byte position of each component's glyph index.
fn for_each_component(glyph: &[u8], mut f: impl FnMut(usize, u16)) {
    let mut pos = 10;
    while pos + 4 <= glyph.len() {
        let flags = BigEndian::read_u16(&glyph[pos..]);
        f(pos + 2, BigEndian::read_u16(&glyph[pos + 2..]));
        pos += 4;
        pos += if flags & 0x0001 != 0 { 4 } else { 2 };
        if flags & 0x0008 != 0 {
            pos += 2;
        } else if flags & 0x0040 != 0 {
            pos += 4;
        } else if flags & 0x0080 != 0 {
            pos += 8;
        }
        if flags & 0x0020 == 0 {
            break;
        }
    }
}

fn is_composite(glyph: &[u8]) -> bool {
    glyph.len() >= 10 && BigEndian::read_i16(glyph) < 0
}

fn collect_composite_deps(
    glyf: &[u8],
    loca_offsets: &[u32],
    gid: u16,
    needed: &mut BTreeSet<u16>,
    depth: u8,
) {
    // Malformed fonts can contain reference cycles.
    if depth > 16 {
        return;
    }
    let Some((start, end)) = glyph_range(loca_offsets, gid, glyf.len()) else {
        return;
    };
    let glyph = &glyf[start..end];
    if !is_composite(glyph) {
        return;
    }
    let mut components = Vec::new();
    for_each_component(glyph, |_, component| components.push(component));
    for component in components {
        if needed.insert(component) {
            collect_composite_deps(glyf, loca_offsets, component, needed, depth + 1);
        }
    }
}

fn rebuild_glyf(
    glyf: &[u8],
    loca_offsets: &[u32],
    needed: &BTreeSet<u16>,
    gid_remap: &BTreeMap<u16, u16>,
) -> (Vec<u8>, Vec<u32>) {
    let mut new_glyf = Vec::new();
    let mut new_offsets = Vec::with_capacity(needed.len() + 1);

    for &old_gid in needed {
        new_offsets.push(new_glyf.len() as u32);
        let Some((start, end)) = glyph_range(loca_offsets, old_gid, glyf.len()) else {
            continue;
        };
        let mut glyph = glyf[start..end].to_vec();
        if is_composite(&glyph) {
            let mut rewrites = Vec::new();
            for_each_component(&glyph, |pos, component| {
                if let Some(&new_gid) = gid_remap.get(&component) {
                    rewrites.push((pos, new_gid));
                }
            });
            for (pos, new_gid) in rewrites {
                BigEndian::write_u16(&mut glyph[pos..pos + 2], new_gid);
            }
        }
        new_glyf.extend_from_slice(&glyph);
        while new_glyf.len() % 4 != 0 {
            new_glyf.push(0);
        }
    }
    new_offsets.push(new_glyf.len() as u32);
    (new_glyf, new_offsets)
}

fn build_loca(offsets: &[u32], format: i16) -> Vec<u8> {
    let mut data = Vec::with_capacity(offsets.len() * 4);
    for &offset in offsets {
        if format == 0 {
            data.extend_from_slice(&((offset / 2) as u16).to_be_bytes());
        } else {
            data.extend_from_slice(&offset.to_be_bytes());
        }
    }
    data
}

/// Every kept glyph gets a full (advance, lsb) record.
fn rebuild_hmtx(hmtx: &[u8], needed: &BTreeSet<u16>, num_h_metrics: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(needed.len() * 4);
    let last_advance = num_h_metrics
        .checked_sub(1)
        .and_then(|i| hmtx.get(i * 4..i * 4 + 2))
        .unwrap_or(&[0, 0]);

    for &old_gid in needed {
        let idx = old_gid as usize;
        if idx < num_h_metrics {
            data.extend_from_slice(hmtx.get(idx * 4..idx * 4 + 4).unwrap_or(&[0, 0, 0, 0]));
        } else {
            let lsb_offset = num_h_metrics * 4 + (idx - num_h_metrics) * 2;
            data.extend_from_slice(last_advance);
            data.extend_from_slice(hmtx.get(lsb_offset..lsb_offset + 2).unwrap_or(&[0, 0]));
        }
    }
    data
}

/// A cmap table holding one (3, 1) format 4 subtable.
pub(crate) fn build_cmap_format4(char_to_gid: &[(u16, u16)]) -> Vec<u8> {
    let mut sorted = char_to_gid.to_vec();
    sorted.sort_by_key(|(ch, _)| *ch);
    sorted.dedup_by_key(|(ch, _)| *ch);

    // (start, end, glyph ids)
    let mut segments: Vec<(u16, u16, Vec<u16>)> = Vec::new();
    for &(ch, gid) in sorted.iter().filter(|(ch, _)| *ch != 0xFFFF) {
        if let Some(last) = segments.last_mut() {
            if ch == last.1 + 1 {
                last.1 = ch;
                last.2.push(gid);
                continue;
            }
        }
        segments.push((ch, ch, vec![gid]));
    }
    segments.push((0xFFFF, 0xFFFF, vec![0]));

    let seg_count = segments.len() as u16;
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * 2;
    let range_shift = (seg_count * 2).saturating_sub(search_range);

    let mut end_codes = Vec::new();
    let mut start_codes = Vec::new();
    let mut id_deltas = Vec::new();
    let mut id_range_offsets = Vec::new();
    let mut glyph_ids: Vec<u16> = Vec::new();

    for (i, (start, end, gids)) in segments.iter().enumerate() {
        start_codes.push(*start);
        end_codes.push(*end);
        if *start == 0xFFFF {
            id_deltas.push(1u16);
            id_range_offsets.push(0u16);
        } else if gids.len() == 1 {
            id_deltas.push(gids[0].wrapping_sub(*start));
            id_range_offsets.push(0);
        } else {
            id_deltas.push(0);
            let remaining = (segments.len() - i) as u16;
            id_range_offsets.push((remaining + glyph_ids.len() as u16) * 2);
            glyph_ids.extend_from_slice(gids);
        }
    }

    let length = 16 + seg_count as usize * 8 + glyph_ids.len() * 2;
    let mut sub = Vec::with_capacity(length);
    for v in [4u16, length as u16, 0, seg_count * 2, search_range, entry_selector, range_shift] {
        sub.extend_from_slice(&v.to_be_bytes());
    }
    end_codes.iter().for_each(|v| sub.extend_from_slice(&v.to_be_bytes()));
    sub.extend_from_slice(&0u16.to_be_bytes());
    for list in [&start_codes, &id_deltas, &id_range_offsets, &glyph_ids] {
        list.iter().for_each(|v| sub.extend_from_slice(&v.to_be_bytes()));
    }

    let mut cmap = Vec::with_capacity(12 + sub.len());
    for v in [0u16, 1, 3, 1] {
        cmap.extend_from_slice(&v.to_be_bytes());
    }
    cmap.extend_from_slice(&12u32.to_be_bytes());
    cmap.extend_from_slice(&sub);
    cmap
}

fn rebuild_maxp(maxp: &[u8], num_glyphs: u16) -> Vec<u8> {
    let mut data = maxp.to_vec();
    if data.len() < 6 {
        data.resize(6, 0);
        BigEndian::write_u32(&mut data[0..4], 0x0000_5000);
    }
    BigEndian::write_u16(&mut data[4..6], num_glyphs);
    data
}

/// post format 3 keeps the original italic angle and underline metrics.
fn build_post_format3(font: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 32];
    if let Some(post) = find_table(font, b"post").filter(|p| p.len() >= 16) {
        // italicAngle, underline metrics, isFixedPitch
        data[..16].copy_from_slice(&post[..16]);
    }
    BigEndian::write_u32(&mut data[0..4], 0x0003_0000);
    data
}

/// Assemble a TrueType file from tables sorted by tag.
pub(crate) fn write_ttf_file(tables: &mut [([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let entry_selector = 15u16.saturating_sub(num_tables.leading_zeros() as u16);
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = (num_tables * 16).saturating_sub(search_range);

    let mut output = Vec::new();
    output.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    for v in [num_tables, search_range, entry_selector, range_shift] {
        output.extend_from_slice(&v.to_be_bytes());
    }

    for (_, data) in tables.iter_mut() {
        while data.len() % 4 != 0 {
            data.push(0);
        }
    }

    let mut offset = 12 + tables.len() * 16;
    let mut head_offset = None;
    for (tag, data) in tables.iter() {
        if tag == b"head" {
            head_offset = Some(offset);
        }
        output.extend_from_slice(tag);
        output.extend_from_slice(&table_checksum(data).to_be_bytes());
        output.extend_from_slice(&(offset as u32).to_be_bytes());
        output.extend_from_slice(&(data.len() as u32).to_be_bytes());
        offset += data.len();
    }
    for (_, data) in tables.iter() {
        output.extend_from_slice(data);
    }

    if let Some(head) = head_offset.filter(|h| h + 12 <= output.len()) {
        let adjustment = 0xB1B0_AFBAu32.wrapping_sub(table_checksum(&output));
        BigEndian::write_u32(&mut output[head + 8..head + 12], adjustment);
    }
    output
}

fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn read_u16(data: &[u8], offset: usize, table: &'static str) -> SubsetResult<u16> {
    data.get(offset..offset + 2)
        .map(BigEndian::read_u16)
        .ok_or(SubsetError::Truncated(table))
}

fn read_i16(data: &[u8], offset: usize, table: &'static str) -> SubsetResult<i16> {
    data.get(offset..offset + 2)
        .map(BigEndian::read_i16)
        .ok_or(SubsetError::Truncated(table))
}
