//! Desired-state document for a managed key

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::key::Sensitive;
use crate::domain::DomainError;

/// A single attribute of a desired-state document
///
/// `Unknown` only exists while an orchestrator is planning; it can never be
/// persisted or sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttributeValue<T> {
    #[default]
    Null,
    Unknown,
    Known(T),
}

impl<T> AttributeValue<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Known(v),
            None => Self::Null,
        }
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The known value, `None` for null, or an error naming the attribute if unknown
    pub fn resolve(&self, attribute: &str) -> Result<Option<&T>, DomainError> {
        match self {
            Self::Null => Ok(None),
            Self::Known(v) => Ok(Some(v)),
            Self::Unknown => Err(DomainError::unknown_value(format!(
                "'{}' is not known yet",
                attribute
            ))),
        }
    }
}

impl<T: Serialize> Serialize for AttributeValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Known(v) => serializer.serialize_some(v),
            Self::Unknown => Err(serde::ser::Error::custom(
                "unknown attribute values cannot be serialized",
            )),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for AttributeValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from_option)
    }
}

/// State of one managed key: the caller's input plus server-computed identifiers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyResourceModel {
    /// Address the key by its hash instead of its plain value. Immutable.
    pub hashed: AttributeValue<bool>,
    /// Key Record as JSON text
    pub config: AttributeValue<String>,
    /// Computed plain key
    pub key: AttributeValue<Sensitive>,
    /// Computed key hash
    pub key_hash: AttributeValue<String>,
}

impl KeyResourceModel {
    pub fn new(config: impl Into<String>, hashed: bool) -> Self {
        Self {
            hashed: AttributeValue::Known(hashed),
            config: AttributeValue::Known(config.into()),
            ..Self::default()
        }
    }

    /// Whether hashed-identifier mode is in effect; null means plain identifiers
    pub fn is_hashed(&self) -> Result<bool, DomainError> {
        Ok(self.hashed.resolve("hashed")?.copied().unwrap_or(false))
    }
}
