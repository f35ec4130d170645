//! Conversion of high-level page contents into PDF content stream operators.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{ImageLayout, Paint, PageContents, Shape, SpanLayout};
use crate::rect::Rect;
use crate::units::Pt;
use id_arena::Arena;
use pdf_writer::{Content, Name, Str};

/// Bezier control point distance for approximating a quarter circle
const KAPPA: f32 = 0.552_284_8;

/// Renders page contents to an (uncompressed) PDF content stream.
pub(crate) fn render_contents(contents: &[PageContents], fonts: &Arena<Font>) -> Vec<u8> {
    let mut content = Content::new();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => render_text_spans(&mut content, spans, fonts),
            PageContents::Image(image) => render_image(&mut content, image),
            PageContents::Shape(shape) => {
                content.save_state();
                match shape.shape {
                    Shape::Line { from, to } => {
                        content.move_to(*from.0, *from.1);
                        content.line_to(*to.0, *to.1);
                    }
                    Shape::Rect(rect) => {
                        content.rect(*rect.x1, *rect.y1, *rect.width(), *rect.height());
                    }
                    Shape::RoundedRect { rect, radius } => {
                        rounded_rect_path(&mut content, rect, radius);
                    }
                }
                paint_path(&mut content, shape.paint, matches!(shape.shape, Shape::Line { .. }));
                content.restore_state();
            }
        }
    }

    content.finish()
}

fn render_text_spans(content: &mut Content, spans: &[SpanLayout], fonts: &Arena<Font>) {
    if spans.is_empty() {
        return;
    }

    content.save_state();
    let mut current_colour: Option<Colour> = None;
    for span in spans.iter() {
        let Some(font) = fonts.get(span.font.id) else {
            log::warn!("skipping span {:?}: font is not in the document", span.text);
            continue;
        };
        if current_colour != Some(span.colour) {
            span.colour.set_fill(content);
            current_colour = Some(span.colour);
        }

        content.begin_text();
        content.set_font(
            Name(format!("F{}", span.font.id.index()).as_bytes()),
            *span.font.size,
        );
        content.next_line(*span.coords.0, *span.coords.1);
        content.show(Str(&font.encode(&span.text)));
        content.end_text();
    }
    content.restore_state();
}

fn render_image(content: &mut Content, image: &ImageLayout) {
    let position = image.position;
    content.save_state();
    content.transform([
        *position.width(),
        0.0,
        0.0,
        *position.height(),
        *position.x1,
        *position.y1,
    ]);
    content.x_object(Name(format!("I{}", image.image_id.index()).as_bytes()));
    content.restore_state();
}

fn rounded_rect_path(content: &mut Content, rect: Rect, radius: Pt) {
    let r = *radius
        .min(rect.width() / 2.0)
        .min(rect.height() / 2.0)
        .max(Pt(0.0));
    let (x1, y1, x2, y2) = (*rect.x1, *rect.y1, *rect.x2, *rect.y2);
    let k = r * KAPPA;

    content.move_to(x1 + r, y1);
    content.line_to(x2 - r, y1);
    content.cubic_to(x2 - r + k, y1, x2, y1 + r - k, x2, y1 + r);
    content.line_to(x2, y2 - r);
    content.cubic_to(x2, y2 - r + k, x2 - r + k, y2, x2 - r, y2);
    content.line_to(x1 + r, y2);
    content.cubic_to(x1 + r - k, y2, x1, y2 - r + k, x1, y2 - r);
    content.line_to(x1, y1 + r);
    content.cubic_to(x1, y1 + r - k, x1 + r - k, y1, x1 + r, y1);
    content.close_path();
}

fn paint_path(content: &mut Content, paint: Paint, open_path: bool) {
    match paint {
        Paint::Fill(colour) if open_path => {
            // a line can't be filled, so stroke it in the fill colour instead
            colour.set_stroke(content);
            content.stroke();
        }
        Paint::Fill(colour) => {
            colour.set_fill(content);
            content.fill_nonzero();
        }
        Paint::Stroke { colour, width } => {
            colour.set_stroke(content);
            content.set_line_width(*width);
            content.stroke();
        }
        Paint::FillAndStroke {
            fill,
            stroke,
            width,
        } => {
            fill.set_fill(content);
            stroke.set_stroke(content);
            content.set_line_width(*width);
            if open_path {
                content.stroke();
            } else {
                content.fill_nonzero_and_stroke();
            }
        }
    }
}
