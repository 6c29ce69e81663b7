use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Remote error: status {status}, body: {body}")]
    Remote { status: u16, body: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Missing identifier: {message}")]
    MissingIdentifier { message: String },

    #[error("Replacement required: {message}")]
    ReplacementRequired { message: String },

    #[error("Unknown value: {message}")]
    UnknownValue { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn missing_identifier(message: impl Into<String>) -> Self {
        Self::MissingIdentifier {
            message: message.into(),
        }
    }

    pub fn replacement_required(message: impl Into<String>) -> Self {
        Self::ReplacementRequired {
            message: message.into(),
        }
    }

    pub fn unknown_value(message: impl Into<String>) -> Self {
        Self::UnknownValue {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Status code carried by a remote failure, if any
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the remote reported that the key does not exist
    pub fn is_not_found(&self) -> bool {
        self.remote_status() == Some(404)
    }

    /// Failures raised locally, before anything was sent to the gateway
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput { .. }
                | Self::Encoding { .. }
                | Self::Validation { .. }
                | Self::MissingIdentifier { .. }
                | Self::ReplacementRequired { .. }
                | Self::UnknownValue { .. }
                | Self::Configuration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let error = DomainError::remote(403, r#"{"status":"error","message":"Forbidden"}"#);
        assert_eq!(
            error.to_string(),
            r#"Remote error: status 403, body: {"status":"error","message":"Forbidden"}"#
        );
    }

    #[test]
    fn test_malformed_input_error() {
        let error = DomainError::malformed_input("expected value at line 1 column 1");
        assert_eq!(
            error.to_string(),
            "Malformed input: expected value at line 1 column 1"
        );
        assert!(error.is_local());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(DomainError::remote(404, "").is_not_found());
        assert!(!DomainError::remote(400, "").is_not_found());
        assert!(!DomainError::transport("connection refused").is_not_found());
    }

    #[test]
    fn test_transport_is_not_local() {
        assert!(!DomainError::transport("timed out").is_local());
        assert!(!DomainError::remote(500, "boom").is_local());
    }
}
