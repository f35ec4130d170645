use crate::colour::colours;
use crate::document::Document;
use crate::font::Font;
use crate::layout::PageGeometry;
use crate::page::{SpanFont, SpanLayout};
use crate::units::Pt;
use id_arena::Id;

const FOOTER_SIZE: Pt = Pt(8.0);

/// The centred footer text of page `number` (1-based) out of `count`
pub fn page_label(number: usize, count: usize) -> String {
    format!("Page {number} of {count}")
}

/// Stamp "Page X of N" and the attribution along the bottom of every page.
///
/// Must run after all content has been laid out, since it needs the final page
/// count. Footers are placed at fixed positions and ignore the layout cursor.
pub(crate) fn stamp_footers(
    document: &mut Document,
    font: Id<Font>,
    geometry: &PageGeometry,
    attribution: &str,
) {
    let Document {
        pages,
        page_order,
        fonts,
        ..
    } = document;
    let font_ref = &fonts[font];
    let count = page_order.len();
    let span_font = SpanFont {
        id: font,
        size: FOOTER_SIZE,
    };

    for (i, id) in page_order.iter().enumerate() {
        let page = &mut pages[*id];
        let width = page.width();
        let y = geometry.footer_offset;

        let label = page_label(i + 1, count);
        let label_width = font_ref.width_of_text(&label, FOOTER_SIZE);
        page.add_span(SpanLayout {
            text: label,
            font: span_font,
            colour: colours::FOOTER,
            coords: ((width - label_width) / 2.0, y),
        });

        if !attribution.is_empty() {
            let attribution_width = font_ref.width_of_text(attribution, FOOTER_SIZE);
            page.add_span(SpanLayout {
                text: attribution.to_string(),
                font: span_font,
                colour: colours::FOOTER,
                coords: (width - geometry.margin_x - attribution_width, y),
            });
        }
    }
    log::debug!("stamped footers on {count} pages");
}
