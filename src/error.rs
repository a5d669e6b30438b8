//! Error types for astral.

use thiserror::Error;

/// Errors that can occur while building an engine or running a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AstarError {
    /// A required allocation could not be made.
    #[error("memory allocation failed")]
    MemFail,

    /// The dimensionality is zero, or too large to index with 16-bit
    /// dimension indices.
    #[error("invalid dimensionality")]
    InvalidDim,

    /// More extended shells were requested than the precomputed probe
    /// count table covers.
    #[error("number of shells exceeds the supported maximum of {max}")]
    InvalidNumShells { max: u32 },

    /// The packing radius is not a positive finite number.
    #[error("packing radius must be positive")]
    InvalidPackingRadius,

    /// A user callback failed; the message carries the callback's own
    /// description of the failure.
    #[error("callback failed: {0}")]
    InCallback(String),

    /// A code path requested more scratch slots than its arena holds.
    #[error("out of scratch buffers")]
    InsufficientBuffers,

    /// An internal consistency check failed. This indicates a bug in the
    /// core, not a user error.
    #[error("internal consistency check failed")]
    Unknown,
}

impl AstarError {
    /// Stable numeric code for this error.
    ///
    /// Code 0 means "no error" and is represented by `Result::Ok`; the
    /// remaining codes are numbered 1..=7 for binary compatibility with
    /// other implementations of the same scheme.
    pub fn code(&self) -> u8 {
        match self {
            AstarError::MemFail => 1,
            AstarError::InvalidDim => 2,
            AstarError::InvalidNumShells { .. } => 3,
            AstarError::InvalidPackingRadius => 4,
            AstarError::InCallback(_) => 5,
            AstarError::InsufficientBuffers => 6,
            AstarError::Unknown => 7,
        }
    }

    /// Wrap a failure raised inside a user callback so it can travel
    /// through the query unchanged. Errors already in this taxonomy
    /// should be returned as-is instead.
    pub fn in_callback(err: impl std::fmt::Display) -> Self {
        AstarError::InCallback(err.to_string())
    }
}

/// Result type alias for astral operations.
pub type Result<T> = std::result::Result<T, AstarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let all = [
            AstarError::MemFail,
            AstarError::InvalidDim,
            AstarError::InvalidNumShells { max: 30 },
            AstarError::InvalidPackingRadius,
            AstarError::InCallback(String::new()),
            AstarError::InsufficientBuffers,
            AstarError::Unknown,
        ];
        for (i, err) in all.iter().enumerate() {
            assert_eq!(err.code() as usize, i + 1);
        }
    }

    #[test]
    fn test_in_callback_carries_message() {
        let err = AstarError::in_callback("bucket store offline");
        assert_eq!(err.to_string(), "callback failed: bucket store offline");
    }
}
