//! Translation between the desired-state document and the canonical Key Record

use serde_json::{Map, Value};

use super::model::{AttributeValue, KeyResourceModel};
use crate::domain::key::{KeyIdentifiers, KeyRecord};
use crate::domain::DomainError;

/// Decode the desired `config` into a validated Key Record.
///
/// A null config yields an empty record. Nothing here touches the network.
pub fn to_remote(desired: &KeyResourceModel) -> Result<KeyRecord, DomainError> {
    let record = match desired.config.resolve("config")? {
        Some(text) => KeyRecord::from_json_str(text)?,
        None => KeyRecord::default(),
    };

    record.validate()?;
    Ok(record)
}

/// Identifier used for every call after creation: `key_hash` in hashed mode, `key` otherwise
pub fn identifier_for(state: &KeyResourceModel, hashed: bool) -> Result<&str, DomainError> {
    let id = if hashed {
        state.key_hash.resolve("key_hash")?.map(String::as_str)
    } else {
        state.key.resolve("key")?.map(|k| k.expose())
    };

    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(DomainError::missing_identifier(if hashed {
            "state has no key_hash to address the key by"
        } else {
            "state has no key to address the key by"
        })),
    }
}

/// Changing the identifier space changes the key's identity
pub fn requires_replacement(prior: &KeyResourceModel, desired: &KeyResourceModel) -> bool {
    if desired.hashed.is_unknown() {
        return false;
    }

    let before = prior.hashed.known().copied().unwrap_or(false);
    let after = desired.hashed.known().copied().unwrap_or(false);
    before != after
}

/// State after a successful create: the desired input plus the minted identifiers
pub fn merge_created(desired: &KeyResourceModel, identifiers: KeyIdentifiers) -> KeyResourceModel {
    KeyResourceModel {
        hashed: desired.hashed.clone(),
        config: desired.config.clone(),
        key: AttributeValue::from_option(identifiers.key),
        key_hash: AttributeValue::from_option(identifiers.key_hash),
    }
}

/// State after a successful full replace.
///
/// Identifiers always come from the prior state: the gateway echoes the URL
/// identifier as `key`, which is the hash in hashed mode.
pub fn merge_updated(prior: &KeyResourceModel, desired: &KeyResourceModel) -> KeyResourceModel {
    KeyResourceModel {
        hashed: desired.hashed.clone(),
        config: desired.config.clone(),
        key: prior.key.clone(),
        key_hash: prior.key_hash.clone(),
    }
}

/// Refresh the caller's config from what the gateway reports.
///
/// Only keys the caller declared are touched. A key the gateway omits or
/// returns as null keeps its prior value, so write-only secrets survive.
pub fn apply_remote_to_state(
    record: &KeyRecord,
    state: &KeyResourceModel,
) -> Result<KeyResourceModel, DomainError> {
    let Some(text) = state.config.resolve("config")? else {
        return Ok(state.clone());
    };

    let prior: Value =
        serde_json::from_str(text).map_err(|e| DomainError::malformed_input(e.to_string()))?;
    let remote = record.to_json_value()?;

    let mut refreshed = prior.clone();
    overlay(&mut refreshed, &remote);

    let config = if refreshed == prior {
        text.clone()
    } else {
        serde_json::to_string(&refreshed).map_err(|e| DomainError::encoding(e.to_string()))?
    };

    Ok(KeyResourceModel {
        config: AttributeValue::Known(config),
        ..state.clone()
    })
}

fn overlay(prior: &mut Value, remote: &Value) {
    if let (Value::Object(prior_map), Value::Object(remote_map)) = (prior, remote) {
        overlay_object(prior_map, remote_map);
    }
}

fn overlay_object(prior: &mut Map<String, Value>, remote: &Map<String, Value>) {
    for (field, value) in prior.iter_mut() {
        let Some(observed) = remote.get(field).filter(|v| !v.is_null()) else {
            continue;
        };

        if let (Value::Object(inner), Value::Object(observed_inner)) = (&mut *value, observed) {
            overlay_object(inner, observed_inner);
        } else if !same_value(value, observed) {
            *value = observed.clone();
        }
    }
}

/// Numbers compare by value so `100` and `100.0` are not a change
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::key::{AccessDefinition, Sensitive};
    use serde_json::json;

    fn state_with_ids(config: &str, hashed: bool) -> KeyResourceModel {
        KeyResourceModel {
            key: AttributeValue::Known(Sensitive::new("plain-key")),
            key_hash: AttributeValue::Known("hash-of-key".to_string()),
            ..KeyResourceModel::new(config, hashed)
        }
    }

    #[test]
    fn test_to_remote_decodes_config() {
        let desired = KeyResourceModel::new(
            r#"{"alias":"example-key","org_id":"default","rate":100,"per":60}"#,
            false,
        );

        let record = to_remote(&desired).unwrap();

        assert_eq!(record.alias.as_deref(), Some("example-key"));
        assert_eq!(record.org_id.as_deref(), Some("default"));
        assert_eq!(record.rate, Some(100.0));
        assert_eq!(record.per, Some(60.0));
    }

    #[test]
    fn test_to_remote_round_trips_serialized_record() {
        let record = KeyRecord::new()
            .with_alias("rt")
            .with_quota(100, 50)
            .with_access_right(
                "httpbin-api",
                AccessDefinition::new("httpbin-api", "Httpbin API"),
            );
        let text = serde_json::to_string(&record).unwrap();

        assert_eq!(to_remote(&KeyResourceModel::new(text, false)).unwrap(), record);
    }

    #[test]
    fn test_to_remote_invalid_json() {
        let err = to_remote(&KeyResourceModel::new("{\"alias\": ", false)).unwrap_err();
        assert!(matches!(err, DomainError::MalformedInput { .. }));
    }

    #[test]
    fn test_to_remote_null_config_is_empty_record() {
        let desired = KeyResourceModel {
            config: AttributeValue::Null,
            ..KeyResourceModel::default()
        };

        assert_eq!(to_remote(&desired).unwrap(), KeyRecord::default());
    }

    #[test]
    fn test_to_remote_unknown_config() {
        let desired = KeyResourceModel {
            config: AttributeValue::Unknown,
            ..KeyResourceModel::default()
        };

        assert!(matches!(
            to_remote(&desired),
            Err(DomainError::UnknownValue { .. })
        ));
    }

    #[test]
    fn test_to_remote_rejects_invariant_violation() {
        let desired = KeyResourceModel::new(r#"{"quota_max":10,"quota_remaining":11}"#, false);

        assert!(matches!(
            to_remote(&desired),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_identifier_for_selects_identifier_space() {
        let state = state_with_ids("{}", false);

        assert_eq!(identifier_for(&state, false).unwrap(), "plain-key");
        assert_eq!(identifier_for(&state, true).unwrap(), "hash-of-key");
    }

    #[test]
    fn test_identifier_for_missing_or_empty() {
        let state = KeyResourceModel {
            key_hash: AttributeValue::Known(String::new()),
            ..KeyResourceModel::new("{}", true)
        };

        assert!(matches!(
            identifier_for(&state, true),
            Err(DomainError::MissingIdentifier { .. })
        ));
        assert!(matches!(
            identifier_for(&state, false),
            Err(DomainError::MissingIdentifier { .. })
        ));
    }

    #[test]
    fn test_requires_replacement_on_hashed_change() {
        let prior = state_with_ids("{}", false);

        assert!(requires_replacement(&prior, &KeyResourceModel::new("{}", true)));
        assert!(!requires_replacement(&prior, &KeyResourceModel::new("{}", false)));

        let null_hashed = KeyResourceModel {
            hashed: AttributeValue::Null,
            ..KeyResourceModel::default()
        };
        assert!(!requires_replacement(&prior, &null_hashed));
    }

    #[test]
    fn test_merge_created_writes_identifiers_and_echoes_config() {
        let desired = KeyResourceModel::new(r#"{"alias":"a"}"#, true);
        let ids = KeyIdentifiers {
            key: Some(Sensitive::new("minted")),
            key_hash: Some("minted-hash".to_string()),
        };

        let state = merge_created(&desired, ids);

        assert_eq!(state.config, desired.config);
        assert_eq!(state.hashed, AttributeValue::Known(true));
        assert_eq!(state.key.known().map(Sensitive::expose), Some("minted"));
        assert_eq!(state.key_hash.known().map(String::as_str), Some("minted-hash"));
    }

    #[test]
    fn test_merge_updated_keeps_prior_identifiers() {
        let prior = state_with_ids(r#"{"alias":"old"}"#, true);
        let desired = KeyResourceModel::new(r#"{"alias":"new"}"#, true);

        let state = merge_updated(&prior, &desired);

        assert_eq!(state.config, desired.config);
        assert_eq!(state.key.known().map(Sensitive::expose), Some("plain-key"));
        assert_eq!(state.key_hash, prior.key_hash);
    }

    #[test]
    fn test_apply_remote_keeps_text_when_nothing_changed() {
        let text = "{\n  \"alias\": \"example-key\",\n  \"rate\": 100\n}";
        let state = state_with_ids(text, false);
        let remote = KeyRecord::new()
            .with_alias("example-key")
            .with_rate_limit(100.0, 60.0)
            .with_org_id("default");

        let refreshed = apply_remote_to_state(&remote, &state).unwrap();

        assert_eq!(refreshed.config.known().map(String::as_str), Some(text));
    }

    #[test]
    fn test_apply_remote_overlays_declared_fields_only() {
        let state = state_with_ids(r#"{"alias":"example-key","rate":100}"#, false);
        let remote = KeyRecord::new()
            .with_alias("renamed-out-of-band")
            .with_rate_limit(100.0, 60.0)
            .with_org_id("default");

        let refreshed = apply_remote_to_state(&remote, &state).unwrap();
        let config: Value =
            serde_json::from_str(refreshed.config.known().unwrap()).unwrap();

        assert_eq!(config, json!({"alias": "renamed-out-of-band", "rate": 100}));
        assert_eq!(refreshed.key, state.key);
    }

    #[test]
    fn test_apply_remote_preserves_write_only_secrets() {
        let state = state_with_ids(
            r#"{"hmac_string":"secret","basic_auth_data":{"password":"pw","hash_type":"bcrypt"}}"#,
            false,
        );
        let mut remote = KeyRecord::new();
        remote.basic_auth_data = Some(crate::domain::key::BasicAuthData {
            password: None,
            hash_type: Some("bcrypt".to_string()),
        });

        let refreshed = apply_remote_to_state(&remote, &state).unwrap();
        let config: Value =
            serde_json::from_str(refreshed.config.known().unwrap()).unwrap();

        assert_eq!(config["hmac_string"], json!("secret"));
        assert_eq!(config["basic_auth_data"]["password"], json!("pw"));
    }

    #[test]
    fn test_apply_remote_recurses_into_access_rights() {
        let state = state_with_ids(
            r#"{"access_rights":{"httpbin-api":{"api_id":"httpbin-api","api_name":"Httpbin API"}}}"#,
            true,
        );
        let remote = KeyRecord::new().with_access_right(
            "httpbin-api",
            AccessDefinition::new("httpbin-api", "Httpbin (renamed)").with_versions(["Default"]),
        );

        let refreshed = apply_remote_to_state(&remote, &state).unwrap();
        let config: Value =
            serde_json::from_str(refreshed.config.known().unwrap()).unwrap();

        assert_eq!(
            config,
            json!({"access_rights": {"httpbin-api": {
                "api_id": "httpbin-api",
                "api_name": "Httpbin (renamed)"
            }}})
        );
    }

    #[test]
    fn test_apply_remote_null_config_unchanged() {
        let state = KeyResourceModel {
            config: AttributeValue::Null,
            ..state_with_ids("{}", false)
        };

        let refreshed = apply_remote_to_state(&KeyRecord::new().with_alias("x"), &state).unwrap();
        assert_eq!(refreshed, state);
    }
}
