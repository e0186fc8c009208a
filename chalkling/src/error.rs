//! Error types for chalkling.
//!
//! Every error carries a stable string code so hosts can branch on it
//! without parsing messages.

use thiserror::Error;

/// Errors from topology edits on a form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("point not found: {0}")]
    MissingPoint(u32),

    #[error("line not found: {0}")]
    MissingLine(u32),

    #[error("line endpoints cannot be the same point ({0})")]
    SelfLoop(u32),

    #[error("no previous point to join from")]
    NoPreviousPoint,

    #[error("parameter '{0}' must be finite")]
    NonFinite(&'static str),

    #[error("parameter '{0}' outside the accepted range")]
    OutOfRange(&'static str),
}

impl FormError {
    pub fn code(&self) -> &'static str {
        match self {
            FormError::MissingPoint(_) | FormError::MissingLine(_) => "invalid_id",
            FormError::SelfLoop(_) | FormError::NoPreviousPoint => "invalid_line",
            FormError::NonFinite(_) => "non_finite",
            FormError::OutOfRange(_) => "out_of_range",
        }
    }
}

/// Errors from comparing a form against a variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("position vectors differ in length: {original} vs {variant}")]
    ShapeMismatch { original: usize, variant: usize },

    #[error("position vector has zero norm")]
    ZeroNorm,

    #[error("similarity is not a finite number")]
    NonFinite,
}

impl ScoreError {
    pub fn code(&self) -> &'static str {
        match self {
            ScoreError::ShapeMismatch { .. } => "shape_mismatch",
            ScoreError::ZeroNorm => "zero_norm",
            ScoreError::NonFinite => "non_finite",
        }
    }
}

/// Errors from loading a form document or a configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("limit exceeded: {0}")]
    Limit(&'static str),

    #[error("invalid document: {0}")]
    Invalid(String),

    #[error("unsupported document version {0}")]
    UnsupportedVersion(u32),
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Json(_) => "json_parse",
            LoadError::Limit(_) => "limit_exceeded",
            LoadError::Invalid(_) => "invalid_document",
            LoadError::UnsupportedVersion(_) => "unsupported_version",
        }
    }
}

/// Errors from a single export iteration.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("sink rejected variant {index}: {message}")]
    Sink { index: u32, message: String },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Score(e) => e.code(),
            ExportError::Sink { .. } => "sink",
            ExportError::Encode(_) => "encode",
        }
    }
}
