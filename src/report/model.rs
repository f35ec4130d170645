//! The analysis result a report is rendered from, as delivered by the analysis
//! service's job API.
//!
//! Every field is optional on the wire: missing and `null` values deserialize to
//! empty defaults, and the renderer substitutes fallback text for them.

use crate::colour::{colours, Colour};
use crate::image::ImageError;
use crate::report::ReportError;
use base64::Engine;
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use std::fmt;

/// Treat `null` the same as a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportModel {
    #[serde(deserialize_with = "nullable")]
    pub system_name: String,
    #[serde(deserialize_with = "nullable")]
    pub summary: String,
    /// The diagram that was analysed. The section is skipped if absent.
    pub diagram_image: Option<DiagramImage>,
    #[serde(deserialize_with = "nullable")]
    pub architecture: Architecture,
    #[serde(deserialize_with = "nullable")]
    pub threats: Vec<Threat>,
}

impl ReportModel {
    /// Parse a bare report (the `data` member of a completed job)
    pub fn from_json(json: &str) -> Result<ReportModel, ReportError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Number of threats with a recognised severity of `severity`
    pub fn count_severity(&self, severity: &Severity) -> usize {
        self.threats
            .iter()
            .filter(|threat| &threat.severity == severity)
            .count()
    }

    /// Whether any threat carries a mitigation worth listing
    pub fn has_mitigations(&self) -> bool {
        self.threats.iter().any(|threat| threat.mitigation().is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Architecture {
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub components: Vec<Component>,
    #[serde(deserialize_with = "nullable")]
    pub data_flows: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub trust_boundaries: Vec<String>,
}

impl Architecture {
    /// Whether there is anything at all to show in the architecture sections
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty()
            && self.components.is_empty()
            && self.data_flows.is_empty()
            && self.trust_boundaries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Component {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Threat {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(alias = "category_name", deserialize_with = "nullable")]
    pub category: String,
    #[serde(deserialize_with = "nullable")]
    pub severity: Severity,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub affected_components: Vec<String>,
    pub attack_scenario: Option<String>,
    pub mitigation: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub references: Vec<String>,
}

impl Threat {
    /// The mitigation text, if there is one that isn't blank
    pub fn mitigation(&self) -> Option<&str> {
        self.mitigation
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// How severe a threat is. Parsing never fails: labels that aren't one of the
/// four known levels are kept as [Severity::Unrecognized] and styled like
/// [Severity::Medium].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    /// Anything else, including an empty label. Holds the trimmed original text.
    Unrecognized(String),
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unrecognized(String::new())
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        Severity::parse(&label)
    }
}

impl From<&str> for Severity {
    fn from(label: &str) -> Self {
        Severity::parse(label)
    }
}

impl Severity {
    /// Case-insensitive match against the four known levels
    pub fn parse(label: &str) -> Severity {
        let label = label.trim();
        match label.to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unrecognized(label.to_string()),
        }
    }

    /// The text shown in the severity badge. Unknown labels are shown as
    /// given (upper-cased); a missing label reads `MEDIUM`.
    pub fn label(&self) -> String {
        match self {
            Severity::Critical => "CRITICAL".to_string(),
            Severity::High => "HIGH".to_string(),
            Severity::Medium => "MEDIUM".to_string(),
            Severity::Low => "LOW".to_string(),
            Severity::Unrecognized(label) if label.is_empty() => "MEDIUM".to_string(),
            Severity::Unrecognized(label) => label.to_uppercase(),
        }
    }

    /// The badge and border colour for this severity
    pub fn colour(&self) -> Colour {
        match self {
            Severity::Critical => colours::SEVERITY_CRITICAL,
            Severity::High => colours::SEVERITY_HIGH,
            Severity::Medium | Severity::Unrecognized(_) => colours::SEVERITY_MEDIUM,
            Severity::Low => colours::SEVERITY_LOW,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Severity::Unrecognized(_))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The encoded bytes of the analysed diagram
#[derive(Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum DiagramImage {
    /// Encoded image bytes (PNG, JPEG, ...)
    Raw(Vec<u8>),
    /// A `data:` URL, or bare base64
    DataUrl(String),
}

impl From<String> for DiagramImage {
    fn from(url: String) -> Self {
        DiagramImage::DataUrl(url)
    }
}

impl fmt::Debug for DiagramImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramImage::Raw(bytes) => write!(f, "Raw({} bytes)", bytes.len()),
            DiagramImage::DataUrl(url) => write!(f, "DataUrl({} chars)", url.len()),
        }
    }
}

impl DiagramImage {
    /// The encoded image bytes, decoding the data URL if necessary
    pub fn bytes(&self) -> Result<Cow<'_, [u8]>, ImageError> {
        match self {
            DiagramImage::Raw(bytes) if bytes.is_empty() => Err(ImageError::NoData),
            DiagramImage::Raw(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            DiagramImage::DataUrl(url) => {
                let url = url.trim();
                let payload = match url.strip_prefix("data:") {
                    Some(rest) => match rest.split_once(',') {
                        Some((meta, data)) if meta.ends_with(";base64") => data,
                        Some((_, data)) => return Ok(Cow::Owned(data.as_bytes().to_vec())),
                        None => return Err(ImageError::NoData),
                    },
                    None => url,
                };
                if payload.is_empty() {
                    return Err(ImageError::NoData);
                }
                let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
                Ok(Cow::Owned(bytes))
            }
        }
    }
}

/// Where a job is in the analysis pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        })
    }
}

/// The envelope the job API wraps results in. `data` only holds a report once
/// the job has completed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobResult {
    pub status: JobStatus,
    #[serde(default)]
    pub data: Option<ReportModel>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobResult {
    pub fn from_json(json: &str) -> Result<JobResult, ReportError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Unwrap the report of a completed job
    pub fn into_report(self) -> Result<ReportModel, ReportError> {
        match (self.status, self.data) {
            (JobStatus::Completed, Some(report)) => Ok(report),
            (JobStatus::Completed, None) => Err(ReportError::MissingData),
            (JobStatus::Failed, _) => Err(ReportError::JobFailed(
                self.error.unwrap_or_else(|| "no error given".to_string()),
            )),
            (status, _) => Err(ReportError::JobNotReady(status)),
        }
    }
}
