//! Common paper sizes, in portrait orientation (width, height).
//!
//! ```
//! use stride_report::pagesize::{A4, PageOrientation};
//!
//! let landscape = A4.landscape();
//! assert!(landscape.0 > landscape.1);
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

const MM: f32 = PT_PER_MM;

pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));

pub const A3: PageSize = (Pt(297.0 * MM), Pt(420.0 * MM));
pub const A4: PageSize = (Pt(210.0 * MM), Pt(297.0 * MM));
pub const A5: PageSize = (Pt(148.0 * MM), Pt(210.0 * MM));

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// The size with width ≤ height
    fn portrait(self) -> Self;
    /// The size with width ≥ height
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}
