//! Error handling

use thiserror::Error;

use crate::logic::catalog::AssetId;

pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal errors for one engine run.
///
/// Row-level input problems are not here: they are recovered by the loader
/// and reported through [`crate::logic::catalog::LoadReport`].
#[derive(Debug, Error)]
pub enum EngineError {
    // Run errors
    #[error("target asset {target} not found in catalog ({catalog_size} assets loaded)")]
    TargetNotFound { target: AssetId, catalog_size: usize },

    #[error("deadline of {secs}s exceeded, run aborted")]
    DeadlineExceeded { secs: u64 },

    #[error("engine task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    // Validation errors
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("input table is missing required column '{0}'")]
    MissingColumn(String),

    // I/O errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = err.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        EngineError::InvalidConfig(format!("invalid value for {}", fields.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_not_found_message() {
        let err = EngineError::TargetNotFound { target: 29, catalog_size: 12 };
        let msg = err.to_string();
        assert!(msg.contains("29"));
        assert!(msg.contains("12 assets"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
