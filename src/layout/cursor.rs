use crate::layout::PageGeometry;
use crate::page::Page;
use crate::units::Pt;

/// The vertical write position of a flowing layout, together with the pages it
/// has produced so far.
///
/// The engine is greedy: before anything is written, [LayoutState::ensure_space]
/// is asked for the worst-case height of that one write, and a new page is
/// started if it would cross [PageGeometry::content_bottom]. Nothing looks
/// further ahead than the next write. Pages are only ever appended.
#[derive(Debug)]
pub struct LayoutState {
    geometry: PageGeometry,
    cursor_y: Pt,
    pages: Vec<Page>,
    page_index: usize,
}

impl LayoutState {
    /// Start a layout with a single empty page and the cursor at the top margin
    pub fn new(geometry: PageGeometry) -> LayoutState {
        LayoutState {
            geometry,
            cursor_y: geometry.top,
            pages: vec![Page::new(geometry.page_size, Some(geometry.margins()))],
            page_index: 0,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Current distance of the write position from the top of the page
    pub fn cursor_y(&self) -> Pt {
        self.cursor_y
    }

    /// Index of the page currently being written
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Space left between the cursor and the bottom of the content area
    pub fn remaining(&self) -> Pt {
        self.geometry.content_bottom - self.cursor_y
    }

    /// Whether nothing has been advanced past on the current page yet
    pub fn at_page_top(&self) -> bool {
        self.cursor_y <= self.geometry.top
    }

    /// Start a new page if `required` doesn't fit below the cursor. Returns
    /// `true` if a page break happened.
    pub fn ensure_space(&mut self, required: Pt) -> bool {
        if self.cursor_y + required > self.geometry.content_bottom {
            self.break_page();
            true
        } else {
            false
        }
    }

    /// Move the cursor down unconditionally
    pub fn advance(&mut self, height: Pt) {
        self.cursor_y += height;
    }

    /// Append a fresh page and move the cursor to its top
    pub fn break_page(&mut self) {
        self.pages.push(Page::new(
            self.geometry.page_size,
            Some(self.geometry.margins()),
        ));
        self.page_index = self.pages.len() - 1;
        self.cursor_y = self.geometry.top;
        log::debug!("page break, now on page {}", self.page_index + 1);
    }

    /// The page currently being written
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.page_index]
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Finish the layout, handing back its pages in order
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> PageGeometry {
        PageGeometry {
            top: Pt(20.0),
            content_bottom: Pt(100.0),
            ..PageGeometry::default()
        }
    }

    #[test]
    fn space_that_fits_does_not_break() {
        let mut state = LayoutState::new(geometry());
        assert!(!state.ensure_space(Pt(80.0)));
        assert_eq!(state.page_count(), 1);
        assert!(state.at_page_top());
    }

    #[test]
    fn overflowing_space_starts_a_page() {
        let mut state = LayoutState::new(geometry());
        state.advance(Pt(50.0));
        assert_eq!(state.cursor_y(), Pt(70.0));
        assert!(!state.at_page_top());
        assert!(state.ensure_space(Pt(31.0)));
        assert_eq!(state.page_count(), 2);
        assert_eq!(state.page_index(), 1);
        assert_eq!(state.cursor_y(), Pt(20.0));
        assert_eq!(state.remaining(), Pt(80.0));
    }

    #[test]
    fn exact_fit_stays_on_the_page() {
        let mut state = LayoutState::new(geometry());
        state.advance(Pt(50.0));
        assert!(!state.ensure_space(Pt(30.0)));
    }
}
