//! Render STRIDE analyses as paginated PDF reports.
//!
//! A [ReportRenderer] lays a [ReportModel] out in a fixed order:
//!
//! 1. the title with the system name and generation time
//! 2. the summary
//! 3. the architecture diagram
//! 4. the architecture description, components table, data flows and trust
//!    boundaries
//! 5. an overview of the threats followed by one box per threat, on a new page
//! 6. the recommended mitigations, on a new page
//!
//! Sections without data are left out. Once everything is laid out, every page
//! is stamped with a "Page X of N" footer.
//!
//! Rendering is a pure function of the model and the [ReportConfig]: each call
//! builds its own document, so one renderer can be shared between threads.

mod canvas;
mod composer;
mod config;
mod error;
mod finalizer;
mod model;
mod table;

pub use canvas::*;
pub use composer::{threat_heading, threat_overview, NO_SUMMARY, UNKNOWN_SYSTEM, UNTITLED_THREAT};
pub use config::*;
pub use error::*;
pub use finalizer::page_label;
pub use model::*;
pub use table::*;

use crate::document::Document;
use crate::info::Info;
use crate::units::{Mm, Pt};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub(crate) fn mm(value: f32) -> Pt {
    Mm(value).into()
}

/// A finished report
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// The complete PDF file
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Where the report should be saved, see [suggested_file_name]
    pub file_name: String,
}

impl RenderedReport {
    /// Save the report under its suggested file name inside `dir`
    pub fn save_in<P: AsRef<Path>>(&self, dir: P) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    config: ReportConfig,
}

impl ReportRenderer {
    pub fn new(config: ReportConfig) -> ReportRenderer {
        ReportRenderer { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Lay the report out without serializing it. The returned document has
    /// its footers, metadata and bookmarks in place.
    pub fn compose(
        &self,
        model: &ReportModel,
        generated_at: DateTime<Local>,
    ) -> Result<Document, ReportError> {
        let mut canvas = Canvas::new(&self.config)?;
        composer::compose(&mut canvas, model, &self.config, generated_at);
        let (mut document, fonts) = canvas.finish();

        finalizer::stamp_footers(
            &mut document,
            fonts.regular,
            &self.config.geometry,
            &self.config.attribution,
        );

        let system_name = if model.system_name.trim().is_empty() {
            UNKNOWN_SYSTEM
        } else {
            model.system_name.as_str()
        };
        let mut info = Info::new();
        info.title(format!("{} - {}", self.config.title, system_name))
            .subject(format!("STRIDE threat analysis of {system_name}"))
            .keywords("STRIDE, threat model, security")
            .created(generated_at);
        if let Some(author) = &self.config.author {
            info.author(author);
        }
        document.set_info(info);

        Ok(document)
    }

    /// Render the report as if it had been generated at `generated_at`
    pub fn render_at(
        &self,
        model: &ReportModel,
        generated_at: DateTime<Local>,
    ) -> Result<RenderedReport, ReportError> {
        let document = self.compose(model, generated_at)?;
        let page_count = document.page_count();
        let bytes = document.to_bytes()?;
        let file_name = suggested_file_name(&self.config.file_prefix, &model.system_name, generated_at);
        log::info!(
            "rendered report for {:?}: {page_count} pages, {} bytes",
            model.system_name,
            bytes.len()
        );

        Ok(RenderedReport {
            bytes,
            page_count,
            file_name,
        })
    }

    /// Render the report, stamped with the current time
    pub fn render(&self, model: &ReportModel) -> Result<RenderedReport, ReportError> {
        self.render_at(model, Local::now())
    }
}

/// Replace everything but ASCII letters and digits with `_`, and lower-case
/// the result. Blank names become `report`.
pub fn sanitize_file_segment(name: &str) -> String {
    if name.trim().is_empty() {
        return "report".to_string();
    }
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// `<prefix>_<sanitized system name>_<unix millis>.pdf`
///
/// ```
/// use chrono::{Local, TimeZone};
/// use stride_report::report::suggested_file_name;
///
/// let at = Local.timestamp_millis_opt(1_700_000_000_000).unwrap();
/// assert_eq!(
///     suggested_file_name("stride_analysis", "Payments API v2", at),
///     "stride_analysis_payments_api_v2_1700000000000.pdf"
/// );
/// ```
pub fn suggested_file_name(prefix: &str, system_name: &str, at: DateTime<Local>) -> String {
    format!(
        "{prefix}_{}_{}.pdf",
        sanitize_file_segment(system_name),
        at.timestamp_millis()
    )
}
