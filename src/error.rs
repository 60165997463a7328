//! Error types for the extraction-and-publishing pipeline
//!
//! Every failure a caller can observe maps to one variant here, each
//! carrying the message shown to the end user.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Error taxonomy for URL processing
#[derive(Debug, Error)]
pub enum ProcessError {
    /// URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL points at an already-published page or an excluded platform
    #[error("URL not supported (already published, video platform, or messenger link): {0}")]
    SkippedUrl(String),

    /// Every extraction tier was attempted and none produced content
    #[error("Failed to extract content from URL")]
    ExtractionFailed,

    /// Page matched a known deleted/app-only/restricted signature
    #[error("Content unavailable (deleted or requires app to view)")]
    ContentUnavailable,

    /// Sanitized content fell below the minimum article length
    #[error("Extracted content too short to publish")]
    TooShort,

    /// Renderer did not produce HTML within its budget
    #[error("Page render timed out after {0}s")]
    RenderTimeout(u64),

    /// Renderer navigation or evaluation failed
    #[error("Page render failed: {0}")]
    RenderFailed(String),

    /// Destination service rejected the page or was unreachable
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    /// Whole-pipeline deadline exceeded
    #[error("Processing timed out ({0}s)")]
    Timeout(u64),

    /// Configuration problem (missing credentials, bad overrides)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProcessError {
    /// True when the URL itself was rejected before any extraction ran.
    #[must_use]
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, Self::InvalidUrl(_) | Self::SkippedUrl(_))
    }

    /// True when the page content, not the machinery, caused the failure.
    #[must_use]
    pub fn is_content_failure(&self) -> bool {
        matches!(
            self,
            Self::ExtractionFailed | Self::ContentUnavailable | Self::TooShort
        )
    }
}
