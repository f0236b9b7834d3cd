use thiserror::Error;

/// Main error type for the date plan view
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ViewError>;

impl ViewError {
    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::Config(_) => "CONFIG_ERROR",
            ViewError::Io(_) => "IO_ERROR",
            ViewError::Serialization(_) => "SERIALIZATION_ERROR",
            ViewError::Validation(_) => "VALIDATION_ERROR",
            ViewError::Schema(_) => "SCHEMA_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_shape() {
        let error = ViewError::Validation("status missing".to_string());
        let payload = error.to_error_payload();

        assert_eq!(payload["error"]["code"], "VALIDATION_ERROR");
        assert!(payload["error"]["message"]
            .as_str()
            .unwrap()
            .contains("status missing"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
        let error: ViewError = io.into();
        assert_eq!(error.error_code(), "IO_ERROR");
    }
}
