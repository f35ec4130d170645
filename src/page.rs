use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Font;
use crate::image::Image;
use crate::layout::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use crate::PDFError;
use id_arena::{Arena, Id};
use pdf_writer::{Filter, Finish, Name, Pdf};

/// Which font, at which size, a span of text is set in
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A single run of text placed at an absolute baseline position
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    /// Start of the baseline, in page space
    pub coords: (Pt, Pt),
}

/// An image drawn into a rectangle on the page
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

/// How a shape is painted
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Paint {
    Fill(Colour),
    Stroke { colour: Colour, width: Pt },
    FillAndStroke { fill: Colour, stroke: Colour, width: Pt },
}

/// Vector geometry that can be placed on a page
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Shape {
    Line { from: (Pt, Pt), to: (Pt, Pt) },
    Rect(Rect),
    RoundedRect { rect: Rect, radius: Pt },
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ShapeLayout {
    pub shape: Shape,
    pub paint: Paint,
}

/// One drawing instruction on a page. Instructions are painted in order, so
/// later contents are drawn on top of earlier ones.
#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Image(ImageLayout),
    Shape(ShapeLayout),
}

#[derive(Debug)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The ordered drawing instructions
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(size: PageSize, margins: Option<Margins>) -> Page {
        let margins = margins.unwrap_or_else(Margins::empty);
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: size.0,
                y2: size.1,
            },
            content_box: Rect {
                x1: margins.left,
                y1: margins.bottom,
                x2: size.0 - margins.right,
                y2: size.1 - margins.top,
            },
            contents: Vec::default(),
        }
    }

    pub fn width(&self) -> Pt {
        self.media_box.width()
    }

    pub fn height(&self) -> Pt {
        self.media_box.height()
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(vec![span]));
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_shape(&mut self, shape: Shape, paint: Paint) {
        self.contents
            .push(PageContents::Shape(ShapeLayout { shape, paint }));
    }

    /// All text spans on the page, in drawing order
    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.contents
            .iter()
            .filter_map(|c| match c {
                PageContents::Text(spans) => Some(spans.iter()),
                _ => None,
            })
            .flatten()
    }

    /// All shapes on the page, in drawing order
    pub fn shapes(&self) -> impl Iterator<Item = &ShapeLayout> {
        self.contents.iter().filter_map(|c| match c {
            PageContents::Shape(shape) => Some(shape),
            _ => None,
        })
    }

    /// All images on the page, in drawing order
    pub fn images(&self) -> impl Iterator<Item = &ImageLayout> {
        self.contents.iter().filter_map(|c| match c {
            PageContents::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Whether any span on the page reads exactly `text`
    pub fn has_text(&self, text: &str) -> bool {
        self.spans().any(|span| span.text == text)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        compress: bool,
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        let id = refs.get_or_gen(RefType::Page(page_index));
        let parent = refs.get_or_gen(RefType::PageTree);
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(parent);
        page.contents(content_id);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            if let Some(font_ref) = refs.get(RefType::Font(font_id.index())) {
                resource_fonts.pair(Name(format!("F{}", font_id.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (image_id, _) in images.iter() {
            if let Some(image_ref) = refs.get(RefType::Image(image_id.index())) {
                resource_xobjects.pair(
                    Name(format!("I{}", image_id.index()).as_bytes()),
                    image_ref,
                );
            }
        }
        resource_xobjects.finish();
        resources.finish();
        page.finish();

        let rendered = render_contents(&self.contents, fonts);
        if compress {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&rendered, 6);
            writer
                .stream(content_id, compressed.as_slice())
                .filter(Filter::FlateDecode);
        } else {
            writer.stream(content_id, rendered.as_slice());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize;

    #[test]
    fn margins_shrink_the_content_box() {
        let page = Page::new(pagesize::A4, Some(Margins::all(Pt(36.0))));
        assert_eq!(page.content_box.x1, Pt(36.0));
        assert_eq!(page.content_box.y2, pagesize::A4.1 - Pt(36.0));
        assert_eq!(page.width(), pagesize::A4.0);
    }

    #[test]
    fn content_accessors_filter_by_kind() {
        let mut page = Page::new(pagesize::A4, None);
        page.add_shape(
            Shape::Rect(Rect::from_origin(Pt(0.0), Pt(0.0), Pt(10.0), Pt(10.0))),
            Paint::Fill(crate::colours::BLACK),
        );
        assert_eq!(page.shapes().count(), 1);
        assert_eq!(page.spans().count(), 0);
        assert_eq!(page.images().count(), 0);
        assert!(!page.has_text("anything"));
    }
}
