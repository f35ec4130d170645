//! Layout utilities for flowing content down pages.
//!
//! - [PageGeometry](crate::layout::PageGeometry) describes the frame shared by every page
//! - [LayoutState](crate::layout::LayoutState) tracks the write position and decides
//!   when content has to flow onto a new page
//! - [wrap_lines](crate::layout::wrap_lines) breaks text into lines at word boundaries
//!
//! # Example
//!
//! ```
//! use stride_report::{Font, StandardFont, Pt};
//! use stride_report::layout::{wrap_lines, LayoutState, PageGeometry};
//!
//! let font = Font::standard(StandardFont::Helvetica);
//! let mut state = LayoutState::new(PageGeometry::default());
//! let width = state.geometry().content_width();
//! let line_height = font.line_height(Pt(11.0));
//!
//! for _line in wrap_lines(&"lorem ipsum ".repeat(1500), &font, Pt(11.0), width) {
//!     state.ensure_space(line_height);
//!     // ... draw the line at state.cursor_y() ...
//!     state.advance(line_height);
//! }
//! assert!(state.page_count() > 1);
//! ```

mod cursor;
mod geometry;
mod margins;
mod text;

pub use cursor::*;
pub use geometry::*;
pub use margins::*;
pub use text::*;
