//! Render STRIDE threat-model analyses into paginated PDF reports.
//!
//! The crate has two layers:
//!
//! - a small PDF document model ([Document], [Page], [Font], [Image], ...) built
//!   on top of [pdf_writer], with flowing [layout] helpers
//! - the [report] renderer, which lays a [ReportModel](report::ReportModel) out
//!   onto that document section by section and stamps every page with a footer
//!
//! # Example
//!
//! ```
//! use stride_report::report::{ReportModel, ReportRenderer};
//!
//! let model: ReportModel = serde_json::from_str(r#"{
//!     "system_name": "Payments API",
//!     "summary": "Two externally reachable services.",
//!     "threats": [
//!         { "title": "Token replay", "category": "Spoofing", "severity": "high" }
//!     ]
//! }"#).unwrap();
//!
//! let rendered = ReportRenderer::default().render(&model).unwrap();
//! assert!(rendered.bytes.starts_with(b"%PDF-"));
//! assert!(rendered.file_name.starts_with("stride_analysis_payments_api_"));
//! ```

mod colour;
pub use colour::*;

pub(crate) mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Utility functions and structures to flow content down pages
pub mod layout;

mod outline;
pub use outline::*;

mod page;
pub use page::*;

/// Common page sizes
pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

/// The STRIDE report renderer
pub mod report;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
