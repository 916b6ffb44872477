use thiserror::Error;

use crate::collection::ExportError;
use crate::spec::SpecError;

#[derive(Error, Debug)]
pub enum PostgenError {
    #[error("invalid spec: {0}")]
    Spec(#[from] SpecError),

    #[error("collection export failed: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type for the postgen crate
pub type Result<T> = std::result::Result<T, PostgenError>;
