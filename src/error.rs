//! Error types for the supplier risk pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Shared `Result` alias for the library.
pub type Result<T> = std::result::Result<T, RiskError>;

/// Errors raised while loading data, training, or scoring suppliers.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Source table missing, unreadable, or malformed
    #[error("failed to load dataset from {path}: {details}")]
    DataLoad { path: PathBuf, details: String },

    /// Feature vector does not match the columns the model was fitted on
    #[error("feature shape mismatch: {details}")]
    FeatureShape { details: String },

    /// Request value outside the accepted input limits
    #[error("invalid value for {field}: {details}")]
    InvalidRequest { field: &'static str, details: String },

    /// Not enough rows (or classes) to fit a model
    #[error("insufficient training data: {details}")]
    InsufficientData { details: String },

    /// Configuration rejected during validation
    #[error("invalid configuration: {details}")]
    InvalidConfig { details: String },
}

impl RiskError {
    pub fn data_load(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::DataLoad {
            path: path.into(),
            details: details.into(),
        }
    }

    pub fn feature_shape(details: impl Into<String>) -> Self {
        Self::FeatureShape {
            details: details.into(),
        }
    }

    pub fn insufficient_data(details: impl Into<String>) -> Self {
        Self::InsufficientData {
            details: details.into(),
        }
    }

    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// Stable machine-readable code, sent back to callers on rejection.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DataLoad { .. } => "data_load",
            Self::FeatureShape { .. } => "feature_shape",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InvalidConfig { .. } => "invalid_config",
        }
    }

    /// Whether the error only affects a single request.
    ///
    /// Everything else happens at startup and aborts the process.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::FeatureShape { .. } | Self::InvalidRequest { .. })
    }
}
