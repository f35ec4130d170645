use crate::layout::PageGeometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which fonts the report is set in
#[derive(Clone, Default)]
pub enum FontSource {
    /// The built-in Helvetica and Helvetica-Bold. Only covers the WinAnsi
    /// character set, anything else is shown as `?`.
    #[default]
    Helvetica,
    /// TrueType / OpenType files, embedded in every report
    TrueType { regular: Vec<u8>, bold: Vec<u8> },
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Helvetica => f.write_str("Helvetica"),
            FontSource::TrueType { regular, bold } => write!(
                f,
                "TrueType {{ regular: {} bytes, bold: {} bytes }}",
                regular.len(),
                bold.len()
            ),
        }
    }
}

/// Everything about a report that isn't part of the analysis itself.
///
/// All fields have defaults, so a config file only needs to name what it
/// changes:
///
/// ```
/// use stride_report::report::ReportConfig;
///
/// let config: ReportConfig = serde_json::from_str(r#"{ "title": "Threat Model" }"#).unwrap();
/// assert_eq!(config.title, "Threat Model");
/// assert_eq!(config.file_prefix, "stride_analysis");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    /// Heading on the first page
    pub title: String,
    /// Printed in the bottom right corner of every page
    pub attribution: String,
    /// Written to the document metadata
    pub author: Option<String>,
    /// First segment of [suggested_file_name](crate::report::suggested_file_name)
    pub file_prefix: String,
    /// Whether page contents are Flate-compressed
    pub compress: bool,
    #[serde(skip)]
    pub fonts: FontSource,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            geometry: PageGeometry::default(),
            title: "STRIDE Analysis Report".to_string(),
            attribution: "Generated by STRIDE Analyser".to_string(),
            author: None,
            file_prefix: "stride_analysis".to_string(),
            compress: true,
            fonts: FontSource::default(),
        }
    }
}

impl ReportConfig {
    pub fn new() -> ReportConfig {
        ReportConfig::default()
    }

    pub fn geometry(&mut self, geometry: PageGeometry) -> &mut Self {
        self.geometry = geometry;
        self
    }

    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn attribution<S: ToString>(&mut self, attribution: S) -> &mut Self {
        self.attribution = attribution.to_string();
        self
    }

    pub fn author<S: ToString>(&mut self, author: S) -> &mut Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn file_prefix<S: ToString>(&mut self, prefix: S) -> &mut Self {
        self.file_prefix = prefix.to_string();
        self
    }

    pub fn compress(&mut self, compress: bool) -> &mut Self {
        self.compress = compress;
        self
    }

    /// Embed the given TrueType / OpenType fonts instead of using Helvetica.
    /// The bytes are parsed on every render, so a broken font is reported by
    /// [ReportRenderer::render](crate::report::ReportRenderer::render).
    pub fn truetype_fonts(&mut self, regular: Vec<u8>, bold: Vec<u8>) -> &mut Self {
        self.fonts = FontSource::TrueType { regular, bold };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Pt;

    #[test]
    fn partial_configs_keep_defaults() {
        let config: ReportConfig = serde_json::from_str(
            r#"{ "attribution": "ACME", "compress": false, "geometry": { "margin_x": 36.0 } }"#,
        )
        .expect("valid config");
        assert_eq!(config.attribution, "ACME");
        assert!(!config.compress);
        assert_eq!(config.geometry.margin_x, Pt(36.0));
        assert_eq!(config.geometry.top, PageGeometry::default().top);
        assert_eq!(config.title, "STRIDE Analysis Report");
        assert!(matches!(config.fonts, FontSource::Helvetica));
    }

    #[test]
    fn setters_chain() {
        let mut config = ReportConfig::new();
        config.title("Review").author("Security team").compress(false);
        assert_eq!(config.title, "Review");
        assert_eq!(config.author.as_deref(), Some("Security team"));
        assert!(!config.compress);
    }
}
