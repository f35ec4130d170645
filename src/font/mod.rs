//! Fonts and text metrics.
//!
//! A [Font] is either one of the PDF base-14 [StandardFont]s, whose metrics are
//! compiled into the crate, or a TrueType / OpenType face that is parsed with
//! [owned_ttf_parser] and embedded in its entirety in the generated PDF.

mod standard;
mod truetype;

pub use standard::*;

use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::PDFError;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pdf_writer::{Finish, Name, Pdf};

/// Where the glyphs and metrics of a [Font] come from
pub enum FontFace {
    Standard(StandardFont),
    TrueType(OwnedFace),
}

/// A font that can be measured and written to a document. Fonts are stored in
/// the [Document](crate::Document) and referred to by their `Id`.
pub struct Font {
    pub face: FontFace,
}

impl Font {
    /// Use one of the base-14 fonts
    pub fn standard(font: StandardFont) -> Font {
        Font {
            face: FontFace::Standard(font),
        }
    }

    /// Load a TrueType / OpenType font from raw bytes, returning an error if the
    /// font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font {
            face: FontFace::TrueType(face),
        })
    }

    /// The full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        match &self.face {
            FontFace::Standard(font) => Some(font.base_font().to_string()),
            FontFace::TrueType(face) => {
                truetype::font_name(face.as_face_ref(), owned_ttf_parser::name_id::FULL_NAME)
            }
        }
    }

    fn units_per_em(&self) -> f32 {
        match &self.face {
            FontFace::Standard(_) => standard::UNITS_PER_EM,
            FontFace::TrueType(face) => face.as_face_ref().units_per_em() as f32,
        }
    }

    fn vertical_metrics(&self) -> (i16, i16, i16) {
        match &self.face {
            FontFace::Standard(_) => (standard::ASCENDER, standard::DESCENDER, standard::LINE_GAP),
            FontFace::TrueType(face) => {
                let face = face.as_face_ref();
                (face.ascender(), face.descender(), face.line_gap())
            }
        }
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        size * (self.vertical_metrics().0 as f32 / self.units_per_em())
    }

    /// Distance from the baseline to the bottom of the font at the given size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        size * (self.vertical_metrics().1 as f32 / self.units_per_em())
    }

    /// How far to move down between two consecutive lines of text at the given size
    pub fn line_height(&self, size: Pt) -> Pt {
        let (ascender, descender, line_gap) = self.vertical_metrics();
        size * ((ascender - descender + line_gap) as f32 / self.units_per_em())
    }

    /// Calculate the width of a string set in this font. Newlines are ignored
    /// and characters the font can't show are measured as `?`.
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let units: f32 = match &self.face {
            FontFace::Standard(font) => text
                .chars()
                .filter(|&ch| ch != '\n')
                .map(|ch| font.advance(winansi_code(ch).unwrap_or(b'?')) as f32)
                .sum(),
            FontFace::TrueType(face) => {
                let face = face.as_face_ref();
                text.chars()
                    .filter(|&ch| ch != '\n')
                    .filter_map(|ch| self.glyph_id(ch))
                    .map(|gid| {
                        face.glyph_hor_advance(owned_ttf_parser::GlyphId(gid))
                            .unwrap_or_default() as f32
                    })
                    .sum()
            }
        };
        size * (units / self.units_per_em())
    }

    /// The glyph for a character in an embedded font, falling back to the
    /// replacement character and then `?`
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        match &self.face {
            FontFace::Standard(_) => None,
            FontFace::TrueType(face) => {
                let face = face.as_face_ref();
                face.glyph_index(ch)
                    .or_else(|| face.glyph_index('\u{FFFD}'))
                    .or_else(|| face.glyph_index('?'))
                    .map(|gid| gid.0)
            }
        }
    }

    /// Encode text into the bytes a `Tj` operator expects for this font
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.face {
            FontFace::Standard(_) => encode_winansi(text),
            FontFace::TrueType(_) => text
                .chars()
                .flat_map(|ch| self.glyph_id(ch).unwrap_or_default().to_be_bytes())
                .collect(),
        }
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        match &self.face {
            FontFace::Standard(font) => {
                let id = refs.gen(RefType::Font(font_index));
                let mut type1 = writer.type1_font(id);
                type1.base_font(Name(font.base_font().as_bytes()));
                type1.encoding_predefined(Name(b"WinAnsiEncoding"));
                type1.finish();
                Ok(())
            }
            FontFace::TrueType(face) => truetype::write(face, refs, font_index, writer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_fonts_measure_with_afm_widths() {
        let font = Font::standard(StandardFont::Helvetica);
        // H e l l o = 722 + 556 + 222 + 222 + 556
        let width = font.width_of_text("Hello", Pt(10.0));
        assert!((width.0 - 22.78).abs() < 1e-3);

        let bold = Font::standard(StandardFont::HelveticaBold);
        assert!(bold.width_of_text("Hello", Pt(10.0)) > width);
    }

    #[test]
    fn standard_line_height_is_fixed_ratio() {
        let font = Font::standard(StandardFont::Helvetica);
        let lh = font.line_height(Pt(10.0));
        assert!((lh.0 - 11.5).abs() < 1e-4);
        assert!(font.descent(Pt(10.0)) < Pt(0.0));
    }

    #[test]
    fn standard_fonts_encode_winansi() {
        let font = Font::standard(StandardFont::Helvetica);
        assert_eq!(font.encode("né"), vec![b'n', 0xe9]);
        assert_eq!(font.name().as_deref(), Some("Helvetica"));
    }

    #[test]
    fn garbage_is_not_a_truetype_font() {
        assert!(matches!(
            Font::load(vec![0, 1, 2, 3]),
            Err(PDFError::FaceParsingError(_))
        ));
    }
}
