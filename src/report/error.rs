use crate::report::JobStatus;
use crate::PDFError;
use thiserror::Error;

/// Everything that can stop a report from being produced. Problems with the
/// report's content (missing text, a broken diagram) never end up here; they
/// are rendered around instead.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write the report: {0}")]
    /// The document could not be serialized
    Serialization(#[from] PDFError),

    #[error("failed to load report font: {0}")]
    /// A configured TrueType font could not be parsed
    Font(#[source] PDFError),

    #[error("invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("job is still {0}")]
    /// The job hasn't finished yet so there's nothing to render
    JobNotReady(JobStatus),

    #[error("job completed without any report data")]
    MissingData,

    #[error("job failed: {0}")]
    JobFailed(String),
}
