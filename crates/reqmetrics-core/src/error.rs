//! Shared error type across reqmetrics crates.

use thiserror::Error;

/// Coarse error classes (stable API).
///
/// Startup errors stop the process before it serves traffic. Export errors are
/// logged and the next export cycle simply tries again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad project id, bad config, or a measure/view registration conflict.
    StartupConfiguration,
    /// Monitoring backend unreachable or rejected the batch.
    Export,
    /// Internal invariant broken.
    Internal,
}

impl ErrorClass {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::StartupConfiguration => "STARTUP_CONFIGURATION",
            ErrorClass::Export => "EXPORT",
            ErrorClass::Internal => "INTERNAL",
        }
    }

    /// Whether the process must refuse to start.
    pub fn is_fatal(self) -> bool {
        !matches!(self, ErrorClass::Export)
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReqMetricsError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum ReqMetricsError {
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("measure already defined: {0}")]
    DuplicateMeasure(String),
    #[error("view already registered: {0}")]
    DuplicateView(String),
    #[error("view {view} references undefined measure {measure}")]
    UnknownMeasure { view: String, measure: String },
    #[error("invalid bucket boundaries for view {view}: {reason}")]
    InvalidBuckets { view: String, reason: String },
    #[error("views cannot be registered after recording has started")]
    RegistryFrozen,
    #[error("config: {0}")]
    Config(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ReqMetricsError {
    /// Map an error onto its class.
    pub fn class(&self) -> ErrorClass {
        match self {
            ReqMetricsError::InvalidName(_)
            | ReqMetricsError::DuplicateMeasure(_)
            | ReqMetricsError::DuplicateView(_)
            | ReqMetricsError::UnknownMeasure { .. }
            | ReqMetricsError::InvalidBuckets { .. }
            | ReqMetricsError::RegistryFrozen
            | ReqMetricsError::Config(_) => ErrorClass::StartupConfiguration,
            ReqMetricsError::Export(_) => ErrorClass::Export,
            ReqMetricsError::Internal(_) => ErrorClass::Internal,
        }
    }
}
