//! Errors raised while reading or writing stored state

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("IO operation failed: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl CoreError {
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: CoreError = std::io::Error::other("boom").into();
        assert!(matches!(err, CoreError::Io { .. }));
        assert_eq!(err.to_string(), "IO operation failed: boom");
    }

    #[test]
    fn json_errors_convert() {
        let err: CoreError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(matches!(err, CoreError::Serialization { .. }));
    }
}
