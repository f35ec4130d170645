//! Embedding of TrueType / OpenType faces as Type0 (CID-keyed) fonts with an
//! Identity-H encoding, so that text is written as 2-byte glyph ids.

use crate::refs::{ObjectReferences, RefType};
use crate::PDFError;
use owned_ttf_parser::{AsFaceRef, Face, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Str,
};
use std::collections::BTreeMap;

/// Every glyph reachable through a unicode cmap subtable, with the first
/// character that maps onto it
fn glyph_chars(face: &Face) -> BTreeMap<u16, char> {
    let mut map = BTreeMap::new();
    let Some(cmap) = face.tables().cmap else {
        return map;
    };
    for subtable in cmap.subtables.into_iter().filter(|t| t.is_unicode()) {
        subtable.codepoints(|codepoint| {
            if let Ok(ch) = char::try_from(codepoint) {
                if let Some(gid) = subtable.glyph_index(codepoint).filter(|g| g.0 > 0) {
                    map.entry(gid.0).or_insert(ch);
                }
            }
        });
    }
    map
}

pub(crate) fn font_name(face: &Face, name_id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == name_id && name.is_unicode())
        .and_then(|name| name.to_string())
}

pub(crate) fn write(
    face: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Result<(), PDFError> {
    let face_ref = face.as_face_ref();
    let base_name = format!("F{font_index}");
    let glyphs = glyph_chars(face_ref);
    if glyphs.is_empty() {
        return Err(PDFError::MissingCmap(
            font_name(face_ref, owned_ttf_parser::name_id::FULL_NAME).unwrap_or(base_name),
        ));
    }

    let scaling = 1000.0 / face_ref.units_per_em() as f32;
    let font_id = refs.gen(RefType::Font(font_index));
    let cid_font_id = refs.gen(RefType::CidFont(font_index));
    let descriptor_id = refs.gen(RefType::FontDescriptor(font_index));
    let data_id = refs.gen(RefType::FontData(font_index));
    let to_unicode_id = refs.gen(RefType::ToUnicode(font_index));

    let mut font = writer.type0_font(font_id);
    font.base_font(Name(base_name.as_bytes()));
    font.encoding_predefined(Name(b"Identity-H"));
    font.descendant_font(cid_font_id);
    font.to_unicode(to_unicode_id);
    font.finish();

    let widths: Vec<(u16, f32)> = glyphs
        .keys()
        .map(|&gid| {
            let advance = face_ref
                .glyph_hor_advance(owned_ttf_parser::GlyphId(gid))
                .unwrap_or_default();
            (gid, advance as f32 * scaling)
        })
        .collect();

    let mut cid_font = writer.cid_font(cid_font_id);
    cid_font.subtype(CidFontType::Type2);
    cid_font.base_font(Name(base_name.as_bytes()));
    cid_font.system_info(SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    });
    cid_font.font_descriptor(descriptor_id);
    cid_font.default_width(1000.0);
    {
        // group runs of consecutive glyph ids into single width arrays
        let mut w = cid_font.widths();
        let mut run_start = widths[0].0;
        let mut run: Vec<f32> = Vec::new();
        for &(gid, width) in widths.iter() {
            if gid != run_start + run.len() as u16 {
                w.consecutive(run_start, run.drain(..));
                run_start = gid;
            }
            run.push(width);
        }
        w.consecutive(run_start, run);
    }
    cid_font.cid_to_gid_map_predefined(Name(b"Identity"));
    cid_font.finish();

    let mut flags = FontFlags::NON_SYMBOLIC;
    if face_ref.is_monospaced() {
        flags |= FontFlags::FIXED_PITCH;
    }
    if face_ref.is_italic() {
        flags |= FontFlags::ITALIC;
    }
    let bbox = face_ref.global_bounding_box();
    let family = font_name(face_ref, owned_ttf_parser::name_id::FAMILY).unwrap_or_default();

    let mut descriptor = writer.font_descriptor(descriptor_id);
    descriptor.name(Name(base_name.as_bytes()));
    descriptor.family(Str(family.as_bytes()));
    descriptor.flags(flags);
    descriptor.bbox(pdf_writer::Rect {
        x1: bbox.x_min as f32 * scaling,
        y1: bbox.y_min as f32 * scaling,
        x2: bbox.x_max as f32 * scaling,
        y2: bbox.y_max as f32 * scaling,
    });
    descriptor.italic_angle(0.0);
    descriptor.ascent(face_ref.ascender() as f32 * scaling);
    descriptor.descent(face_ref.descender() as f32 * scaling);
    descriptor.cap_height(
        face_ref
            .capital_height()
            .map(|h| h as f32 * scaling)
            .unwrap_or(700.0),
    );
    // no reliable source for the stem width in the font tables
    descriptor.stem_v(80.0);
    descriptor.font_file2(data_id);
    descriptor.finish();

    let data = face.as_slice();
    writer
        .stream(data_id, data)
        .pair(Name(b"Length1"), data.len() as i32);

    let cmap = to_unicode_cmap(&glyphs);
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(cmap.as_bytes(), 6);
    writer
        .stream(to_unicode_id, compressed.as_slice())
        .filter(Filter::FlateDecode);

    Ok(())
}

fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let mut map = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    // bfchar blocks hold at most 100 entries
    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();
    for block in entries.chunks(100) {
        map.push_str(&format!("{} beginbfchar\n", block.len()));
        for (gid, ch) in block {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04x}"))
                .collect();
            map.push_str(&format!("<{gid:04x}> <{hex}>\n"));
        }
        map.push_str("endbfchar\n");
    }

    map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmap_blocks_are_capped_at_one_hundred_entries() {
        let glyphs: BTreeMap<u16, char> = (1..=150u16)
            .map(|gid| (gid, char::from_u32(0x40 + gid as u32).unwrap()))
            .collect();
        let cmap = to_unicode_cmap(&glyphs);
        assert!(cmap.contains("100 beginbfchar"));
        assert!(cmap.contains("50 beginbfchar"));
        assert!(cmap.contains("<0001> <0041>"));
    }

    #[test]
    fn astral_characters_map_to_surrogate_pairs() {
        let glyphs: BTreeMap<u16, char> = [(7u16, '😀')].into_iter().collect();
        assert!(to_unicode_cmap(&glyphs).contains("<0007> <d83dde00>"));
    }
}
