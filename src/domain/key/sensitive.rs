//! Wrapper for credential-bearing values

use std::fmt;

use serde::{Deserialize, Serialize};

const MASK: &str = "***";

/// A secret string that serializes verbatim but never prints its content
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sensitive(String);

impl Sensitive {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying secret
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Sensitive {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Sensitive {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Sensitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sensitive({})", MASK)
    }
}

impl fmt::Display for Sensitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_are_masked() {
        let secret = Sensitive::new("hmac-secret-value");

        assert_eq!(format!("{:?}", secret), "Sensitive(***)");
        assert_eq!(secret.to_string(), "***");
        assert_eq!(secret.expose(), "hmac-secret-value");
    }

    #[test]
    fn test_serializes_transparently() {
        let secret = Sensitive::new("s3cr3t");

        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, r#""s3cr3t""#);

        let parsed: Sensitive = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, secret);
    }
}
