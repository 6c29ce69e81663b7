//! Canonical Key Record as accepted and returned by the gateway
//!
//! Every field is optional: absent fields are omitted from the wire shape so a
//! sparse caller document stays sparse. Fields the gateway adds that this type
//! does not model are kept in `extra` and written back unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::sensitive::Sensitive;
use crate::domain::DomainError;

/// Gradual ramp of the rate allowance instead of a hard cutoff
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSmoothing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Request count per interval below which no smoothing applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
    /// Fraction of `step` at which a smoothing event fires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<f64>,
    /// Allowance increment per smoothing event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
    /// Minimum seconds between smoothing events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
}

impl RateLimitSmoothing {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

/// `rate` requests every `per` seconds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<RateLimitSmoothing>,
}

/// Per-API throughput and quota limits
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiLimit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<RateLimitSmoothing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle_retry_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_depth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_renews: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_renewal_rate: Option<i64>,
}

/// URL pattern and the methods allowed on it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
}

/// GraphQL type with the subset of its fields an access rule covers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphqlType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_depth: Option<i64>,
}

/// Query-depth limit for a single GraphQL field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAccessDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<FieldLimits>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointMethod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<RateLimit>,
}

/// Rate overrides for one endpoint path, per HTTP method
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<EndpointMethod>>,
}

/// Access and limits granted on a single API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_urls: Option<Vec<AccessSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted_types: Option<Vec<GraphqlType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<GraphqlType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<ApiLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_access_rights: Option<Vec<FieldAccessDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_introspection: Option<bool>,
    /// Groups APIs that share one rate and quota counter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowance_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<Endpoint>>,
}

impl AccessDefinition {
    pub fn new(api_id: impl Into<String>, api_name: impl Into<String>) -> Self {
        Self {
            api_id: Some(api_id.into()),
            api_name: Some(api_name.into()),
            ..Self::default()
        }
    }

    pub fn with_versions(mut self, versions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.versions = Some(versions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_limit(mut self, limit: ApiLimit) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicAuthData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Sensitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<Sensitive>,
}

/// Usage thresholds that trigger alerts
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_limits: Option<Vec<f64>>,
}

/// The gateway's key (session) record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle_retry_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_depth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    /// Epoch seconds, 0 means never
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_renews: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_renewal_rate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_rights: Option<BTreeMap<String, AccessDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_keys: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth_data: Option<BasicAuthData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_data: Option<JwtData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_http_signature_validation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_string: Option<Sensitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsa_certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_inactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_policy_id: Option<String>,
    /// Policy identifiers merged into this key by the gateway, in order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_policies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_expires: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<Monitor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_detailed_recording: Option<bool>,
    /// Caller-owned metadata, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_extractor_deadline: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_lifetime: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<RateLimitSmoothing>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl KeyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON document into a record
    pub fn from_json_str(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|e| DomainError::malformed_input(e.to_string()))
    }

    /// Decode a JSON value into a record
    pub fn from_json_value(value: Value) -> Result<Self, DomainError> {
        serde_json::from_value(value).map_err(|e| DomainError::malformed_input(e.to_string()))
    }

    /// Encode the record as its wire JSON
    pub fn to_json_value(&self) -> Result<Value, DomainError> {
        serde_json::to_value(self).map_err(|e| DomainError::encoding(e.to_string()))
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn with_rate_limit(mut self, rate: f64, per: f64) -> Self {
        self.rate = Some(rate);
        self.per = Some(per);
        self
    }

    pub fn with_quota(mut self, quota_max: i64, quota_remaining: i64) -> Self {
        self.quota_max = Some(quota_max);
        self.quota_remaining = Some(quota_remaining);
        self
    }

    pub fn with_smoothing(mut self, smoothing: RateLimitSmoothing) -> Self {
        self.smoothing = Some(smoothing);
        self
    }

    pub fn with_access_right(
        mut self,
        api_id: impl Into<String>,
        definition: AccessDefinition,
    ) -> Self {
        self.access_rights
            .get_or_insert_with(BTreeMap::new)
            .insert(api_id.into(), definition);
        self
    }
}

/// Body returned by the gateway for create and update calls
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifyKeyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Sensitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_hash: Option<String>,
}

/// Server-assigned identifiers for a key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyIdentifiers {
    pub key: Option<Sensitive>,
    pub key_hash: Option<String>,
}

impl From<ModifyKeyResponse> for KeyIdentifiers {
    fn from(response: ModifyKeyResponse) -> Self {
        Self {
            key: response.key.filter(|k| !k.is_empty()),
            key_hash: response.key_hash.filter(|h| !h.is_empty()),
        }
    }
}
