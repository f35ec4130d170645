//! Drawing primitives that write at the layout cursor.
//!
//! Positions handed to a [Canvas] are measured from the top-left corner of the
//! page, with text placed on its baseline. Each flowing primitive asks the
//! cursor for its worst-case height before it writes anything, so it may start
//! a new page but never spills past the bottom of the content area.

use crate::colour::{colours, Colour};
use crate::document::Document;
use crate::font::{Font, StandardFont};
use crate::image::Image;
use crate::layout::{self, LayoutState, PageGeometry};
use crate::page::{ImageLayout, Paint, Shape, SpanFont, SpanLayout};
use crate::rect::Rect;
use crate::report::{mm, DiagramImage, FontSource, ReportConfig, ReportError};
use crate::units::Pt;
use id_arena::Id;

/// Shown in place of a diagram that couldn't be decoded
pub const IMAGE_PLACEHOLDER: &str = "(Diagram image could not be included)";

/// The regular and bold faces a report is set in
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FontSet {
    pub regular: Id<Font>,
    pub bold: Id<Font>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub size: Pt,
    pub bold: bool,
    pub colour: Colour,
}

impl TextStyle {
    pub const fn regular(size: f32, colour: Colour) -> TextStyle {
        TextStyle {
            size: Pt(size),
            bold: false,
            colour,
        }
    }

    pub const fn bold(size: f32, colour: Colour) -> TextStyle {
        TextStyle {
            size: Pt(size),
            bold: true,
            colour,
        }
    }
}

/// A document being laid out, together with its layout cursor
pub struct Canvas {
    pub(super) document: Document,
    pub(super) state: LayoutState,
    pub(super) fonts: FontSet,
}

impl Canvas {
    /// Start an empty, single page document with the configured fonts loaded
    pub fn new(config: &ReportConfig) -> Result<Canvas, ReportError> {
        let mut document = Document {
            compress: config.compress,
            ..Document::default()
        };

        let (regular, bold) = match &config.fonts {
            FontSource::Helvetica => (
                Font::standard(StandardFont::Helvetica),
                Font::standard(StandardFont::HelveticaBold),
            ),
            FontSource::TrueType { regular, bold } => (
                Font::load(regular.clone()).map_err(ReportError::Font)?,
                Font::load(bold.clone()).map_err(ReportError::Font)?,
            ),
        };
        let fonts = FontSet {
            regular: document.add_font(regular),
            bold: document.add_font(bold),
        };

        Ok(Canvas {
            document,
            state: LayoutState::new(config.geometry),
            fonts,
        })
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LayoutState {
        &mut self.state
    }

    pub fn geometry(&self) -> PageGeometry {
        *self.state.geometry()
    }

    pub fn fonts(&self) -> FontSet {
        self.fonts
    }

    fn font_id(&self, bold: bool) -> Id<Font> {
        if bold {
            self.fonts.bold
        } else {
            self.fonts.regular
        }
    }

    pub fn font(&self, bold: bool) -> &Font {
        &self.document.fonts[self.font_id(bold)]
    }

    /// Width of `text` set in `style`
    pub fn measure(&self, text: &str, style: TextStyle) -> Pt {
        layout::width_of_text(text, self.font(style.bold), style.size)
    }

    /// Wrap `text` at word boundaries to fit within `width`
    pub fn wrap(&self, text: &str, style: TextStyle, width: Pt) -> Vec<String> {
        layout::wrap_lines(text, self.font(style.bold), style.size, width)
    }

    /// Cut `text` down to fit within `width`, marking the cut with `...`
    pub fn truncate(&self, text: &str, style: TextStyle, width: Pt) -> String {
        layout::truncate_to_width(text, self.font(style.bold), style.size, width)
    }

    /// Place a single line of text with its baseline `baseline` below the top
    /// of the current page. Doesn't move the cursor.
    pub fn place_text(&mut self, text: &str, x: Pt, baseline: Pt, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let y = self.state.geometry().to_page_y(baseline);
        let id = self.font_id(style.bold);
        self.state.page_mut().add_span(SpanLayout {
            text: text.to_string(),
            font: SpanFont {
                id,
                size: style.size,
            },
            colour: style.colour,
            coords: (x, y),
        });
    }

    /// Place a line of text centred on `centre`
    pub fn place_text_centred(&mut self, text: &str, centre: Pt, baseline: Pt, style: TextStyle) {
        let x = centre - self.measure(text, style) / 2.0;
        self.place_text(text, x, baseline, style);
    }

    /// A rectangle whose top-left corner is `top` below the top of the page,
    /// converted into page space
    pub fn page_rect(&self, x: Pt, top: Pt, width: Pt, height: Pt) -> Rect {
        let bottom = self.state.geometry().to_page_y(top + height);
        Rect::from_origin(x, bottom, width, height)
    }

    /// Place a shape on the current page. Doesn't move the cursor.
    pub fn place_shape(&mut self, shape: Shape, paint: Paint) {
        self.state.page_mut().add_shape(shape, paint);
    }

    /// A horizontal line `at` below the top of the page
    pub fn place_hline(&mut self, from: Pt, to: Pt, at: Pt, colour: Colour, width: Pt) {
        let y = self.state.geometry().to_page_y(at);
        self.place_shape(
            Shape::Line {
                from: (from, y),
                to: (to, y),
            },
            Paint::Stroke { colour, width },
        );
    }

    /// Bookmark the current page
    pub fn bookmark<S: ToString>(&mut self, title: S) {
        let page = self.state.page_index();
        self.document.add_bookmark(title, page);
    }

    /// Move the cursor down without drawing anything
    pub fn space(&mut self, height: Pt) {
        self.state.advance(height);
    }

    /// Start a new page regardless of how much room is left
    pub fn break_page(&mut self) {
        self.state.break_page();
    }

    /// A large heading in the title colour
    pub fn title(&mut self, text: &str, size: f32) {
        self.state.ensure_space(mm(15.0));
        let x = self.geometry().left();
        let y = self.state.cursor_y();
        self.place_text(text, x, y, TextStyle::bold(size, colours::TITLE));
        self.state.advance(mm(12.0));
    }

    /// A section heading
    pub fn subtitle(&mut self, text: &str, size: f32) {
        self.state.ensure_space(mm(12.0));
        let x = self.geometry().left();
        let y = self.state.cursor_y();
        self.place_text(text, x, y, TextStyle::bold(size, colours::SUBTITLE));
        self.state.advance(mm(10.0));
    }

    /// A wrapped block of body text across the full content width. Lines are
    /// placed one at a time, so a long paragraph flows onto following pages.
    pub fn paragraph(&mut self, text: &str, size: f32) {
        let style = TextStyle::regular(size, colours::BODY);
        let x = self.geometry().left();
        for line in self.wrap(text, style, self.geometry().content_width()) {
            self.text_line(&line, x, style);
        }
        self.state.advance(mm(2.0));
    }

    /// A bulleted list, each item wrapped and indented under its bullet
    pub fn bullet_list<S: AsRef<str>>(&mut self, items: &[S], size: f32) {
        let style = TextStyle::regular(size, colours::BODY);
        let bullet_x = self.geometry().left();
        let indent = mm(5.0);
        let width = self.geometry().content_width() - indent;
        for item in items {
            let lines = self.wrap(item.as_ref(), style, width);
            for (i, line) in lines.iter().enumerate() {
                self.state.ensure_space(mm(7.0));
                if i == 0 {
                    let y = self.state.cursor_y();
                    self.place_text("\u{2022}", bullet_x, y, style);
                }
                self.text_line_unchecked(line, bullet_x + indent, style);
            }
        }
        self.state.advance(mm(2.0));
    }

    fn text_line(&mut self, line: &str, x: Pt, style: TextStyle) {
        self.state.ensure_space(mm(7.0));
        self.text_line_unchecked(line, x, style);
    }

    fn text_line_unchecked(&mut self, line: &str, x: Pt, style: TextStyle) {
        let y = self.state.cursor_y();
        self.place_text(line, x, y, style);
        self.state.advance(mm(6.0));
    }

    /// A bold label followed by its value on the same baseline
    pub fn key_value(&mut self, label: &str, value: &str, size: f32) {
        self.state.ensure_space(mm(7.0));
        let label_style = TextStyle::bold(size, colours::LABEL);
        let value_style = TextStyle::regular(size, colours::BODY);
        let x = self.geometry().left();
        let y = self.state.cursor_y();
        self.place_text(label, x, y, label_style);
        let value_x = x + self.measure(label, label_style) + mm(2.0);
        self.place_text(value, value_x, y, value_style);
        self.state.advance(mm(7.0));
    }

    /// A thin divider across the content width
    pub fn rule(&mut self) {
        self.state.ensure_space(mm(5.0));
        let geometry = self.geometry();
        let y = self.state.cursor_y();
        self.place_hline(geometry.left(), geometry.right(), y, colours::RULE, Pt(0.5));
        self.state.advance(mm(8.0));
    }

    /// A rounded, filled label whose right edge is at `right` and whose top is
    /// `top` below the top of the page. Labels too long for the badge are cut.
    pub fn badge(&mut self, label: &str, colour: Colour, right: Pt, top: Pt) {
        let (width, height) = (mm(28.0), mm(6.0));
        let rect = self.page_rect(right - width, top, width, height);
        self.place_shape(
            Shape::RoundedRect {
                rect,
                radius: mm(2.0),
            },
            Paint::Fill(colour),
        );

        let style = TextStyle::bold(8.0, colours::WHITE);
        let label = self.truncate(label, style, width - mm(3.0));
        self.place_text_centred(&label, right - width / 2.0, top + mm(4.0), style);
    }

    /// Place the diagram scaled to fit a 170 x 80 mm box, keeping its aspect
    /// ratio. If the image can't be decoded a placeholder line is written
    /// instead and the layout carries on.
    pub fn image(&mut self, image: &DiagramImage) {
        let decoded = image.bytes().and_then(|bytes| Image::from_bytes(&bytes));
        let image = match decoded {
            Ok(image) => image,
            Err(e) => {
                log::warn!("diagram image could not be included: {e}");
                self.paragraph(IMAGE_PLACEHOLDER, 10.0);
                return;
            }
        };

        let (box_width, box_height) = (mm(170.0), mm(80.0));
        self.state.ensure_space(box_height);

        let aspect = image.aspect_ratio();
        let (width, height) = if aspect >= box_width / box_height {
            (box_width, box_width / aspect)
        } else {
            (box_height * aspect, box_height)
        };
        let x = self.geometry().left() + (box_width - width) / 2.0;
        let position = self.page_rect(x, self.state.cursor_y(), width, height);

        let image_id = self.document.add_image(image);
        self.state
            .page_mut()
            .add_image(ImageLayout { image_id, position });
        self.state.advance(box_height + mm(10.0));
    }

    /// Finish laying out, moving every page into the document
    pub fn finish(self) -> (Document, FontSet) {
        let Canvas {
            mut document,
            state,
            fonts,
        } = self;
        for page in state.into_pages() {
            document.add_page(page);
        }
        (document, fonts)
    }
}
