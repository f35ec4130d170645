use crate::layout::Margins;
use crate::pagesize::{self, PageSize};
use crate::units::{Mm, Pt};
use serde::{Deserialize, Serialize};

/// The fixed frame every page of a flowing layout shares.
///
/// Vertical positions are measured downwards from the top edge of the page, the
/// way the content is read; [PageGeometry::to_page_y] converts them into PDF
/// page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_size: PageSize,
    /// Left and right margin
    pub margin_x: Pt,
    /// Where the cursor starts on a fresh page
    pub top: Pt,
    /// The lowest point content may reach before flowing to the next page
    pub content_bottom: Pt,
    /// Distance of the footer baseline above the bottom edge of the page
    pub footer_offset: Pt,
}

impl Default for PageGeometry {
    /// A4 with 20 mm side margins, content from 20 mm to 280 mm, and a footer
    /// 10 mm above the bottom edge
    fn default() -> Self {
        PageGeometry {
            page_size: pagesize::A4,
            margin_x: Mm(20.0).into(),
            top: Mm(20.0).into(),
            content_bottom: Mm(280.0).into(),
            footer_offset: Mm(10.0).into(),
        }
    }
}

impl PageGeometry {
    pub fn page_width(&self) -> Pt {
        self.page_size.0
    }

    pub fn page_height(&self) -> Pt {
        self.page_size.1
    }

    /// Width available between the side margins
    pub fn content_width(&self) -> Pt {
        self.page_width() - self.margin_x * 2.0
    }

    /// Usable height between the top of the content and its lowest point
    pub fn content_height(&self) -> Pt {
        self.content_bottom - self.top
    }

    /// x of the left margin
    pub fn left(&self) -> Pt {
        self.margin_x
    }

    /// x of the right margin
    pub fn right(&self) -> Pt {
        self.page_width() - self.margin_x
    }

    /// Converts a distance from the top of the page into a PDF y coordinate
    pub fn to_page_y(&self, from_top: Pt) -> Pt {
        self.page_height() - from_top
    }

    /// The margins implied by the geometry, used for each page's content box
    pub fn margins(&self) -> Margins {
        Margins::trbl(
            self.top,
            self.margin_x,
            self.page_height() - self.content_bottom,
            self.margin_x,
        )
    }
}
