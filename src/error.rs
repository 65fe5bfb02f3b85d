use thiserror::Error;

/// An error raised while building or tracking a path.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("A curve needs at least 2 control points, but {count} were given")]
    InsufficientControlPoints { count: usize },

    #[error("The flattening step must lie in (0, 1], but was {step}")]
    InvalidStep { step: f64 },

    #[error("Attempted to track an empty path")]
    EmptyPath,

    #[cfg(feature = "serde")]
    #[error("Cannot read the curve definition: {0}")]
    Json(#[from] serde_json::Error),
}

/// Checks that a flattening step lies in `(0, 1]`.
pub(crate) fn validate_step(step: f64) -> Result<f64, PathError> {
    if step > 0.0 && step <= 1.0 {
        Ok(step)
    } else {
        Err(PathError::InvalidStep { step })
    }
}
