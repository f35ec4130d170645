use crate::{
    font::Font,
    image::Image,
    info::Info,
    outline::Outline,
    page::Page,
    refs::{ObjectReferences, RefType},
    PDFError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

/// A document stores all the contents of the PDF and renders it out with a call
/// to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
    pub images: Arena<Image>,
    pub outline: Outline,
    /// Whether page content streams are Flate-compressed
    pub compress: bool,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            info: None,
            pages: Arena::new(),
            page_order: Vec::new(),
            fonts: Arena::new(),
            images: Arena::new(),
            outline: Outline::default(),
            compress: true,
        }
    }
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its id
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// The page at the given 0-based position in the document
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.page_order
            .get(index)
            .and_then(|&id| self.pages.get(id))
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        let id = *self.page_order.get(index)?;
        self.pages.get_mut(id)
    }

    /// All pages in document order
    pub fn pages_in_order(&self) -> impl Iterator<Item = &Page> {
        self.page_order.iter().filter_map(|&id| self.pages.get(id))
    }

    /// Add a font to the document. Fonts are stored "globally" within the document
    /// so any page can refer to one by its id.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Add an image to the document. Like fonts, images are shared by every page.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Add a bookmark pointing at the page with the given index
    pub fn add_bookmark<S: ToString>(&mut self, title: S, page_index: usize) {
        self.outline.add_bookmark(page_index, title.to_string());
    }

    /// Write the entire document to the writer. The whole document is rendered
    /// in memory first, then written in one go.
    ///
    /// All object references are generated here, so pages, fonts, and images can
    /// be freely added or edited until `write` is called.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), PDFError> {
        let bytes = self.to_bytes()?;
        w.write_all(bytes.as_slice()).map_err(Into::into)
    }

    /// Render the document into a byte buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, PDFError> {
        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = &self.info {
            info.write(&mut refs, &mut writer);
        }

        // page refs are keyed by position in the document (not arena index) so
        // that bookmarks can refer to pages by the order they're read in
        let page_refs: Vec<Ref> = (0..self.page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in self.fonts.iter() {
            font.write(&mut refs, id.index(), &mut writer)?;
        }

        for (id, image) in self.images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        for (page_index, id) in self.page_order.iter().enumerate() {
            let page = self
                .pages
                .get(*id)
                .ok_or(PDFError::PageMissing(page_index))?;
            page.write(
                &mut refs,
                page_index,
                &self.fonts,
                &self.images,
                self.compress,
                &mut writer,
            )?;
        }

        if !self.outline.is_empty() {
            self.outline.write(&mut refs, &mut writer);
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        if let Some(outlines_id) = refs.get(RefType::Outlines) {
            catalog.outlines(outlines_id);
        }
        catalog.finish();

        Ok(writer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;
    use crate::page::{SpanFont, SpanLayout};
    use crate::{colours, pagesize, Pt};

    #[test]
    fn writes_a_pdf_with_every_page() {
        let mut doc = Document::default();
        let font = doc.add_font(Font::standard(StandardFont::Helvetica));
        for i in 0..3 {
            let mut page = Page::new(pagesize::A4, None);
            page.add_span(SpanLayout {
                text: format!("page {i}"),
                font: SpanFont {
                    id: font,
                    size: Pt(12.0),
                },
                colour: colours::BLACK,
                coords: (Pt(72.0), Pt(72.0)),
            });
            doc.add_page(page);
        }
        doc.add_bookmark("Second", 1);
        doc.set_info(Info::new().title("Test").clone());

        let bytes = doc.to_bytes().expect("can write document");
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 3"));
        assert!(text.contains("/Helvetica"));
        assert!(text.contains("/Outlines"));
    }

    #[test]
    fn pages_are_addressed_by_position() {
        let mut doc = Document::default();
        doc.add_page(Page::new(pagesize::A4, None));
        doc.add_page(Page::new(pagesize::LETTER, None));
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page(1).map(|p| p.width()), Some(pagesize::LETTER.0));
        assert!(doc.page(2).is_none());
        assert_eq!(doc.pages_in_order().count(), 2);
    }
}
