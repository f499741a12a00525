use thiserror::Error;

/// Main error type for kgscope
#[derive(Error, Debug)]
pub enum KgscopeError {
    /// Transport failure, bad status, timeout or malformed response from the triple store
    #[error("Store query failed: {0}")]
    StoreQuery(String),

    /// Missing or malformed caller input (query text, resource identifier)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Render model / HTML generation errors
    #[error("Render error: {0}")]
    Render(String),
}

impl KgscopeError {
    /// True when the error came from the remote store rather than the caller.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, KgscopeError::StoreQuery(_))
    }
}

/// Convenient Result type using KgscopeError
pub type Result<T> = std::result::Result<T, KgscopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KgscopeError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_store_failure_is_distinguishable() {
        let err = KgscopeError::StoreQuery("timeout".to_string());
        assert!(err.is_store_failure());
        assert!(!KgscopeError::InvalidInput("empty".to_string()).is_store_failure());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KgscopeError = io_err.into();
        assert!(matches!(err, KgscopeError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: KgscopeError = json_err.into();
        assert!(matches!(err, KgscopeError::Serialization(_)));
    }
}
