//! Key Record invariant checks

use thiserror::Error;

use super::entity::{ApiLimit, KeyRecord, RateLimitSmoothing};
use crate::domain::DomainError;

/// Errors that can occur during Key Record validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyValidationError {
    #[error("{scope}: quota_remaining ({remaining}) exceeds quota_max ({max})")]
    QuotaRemainingExceedsMax {
        scope: String,
        remaining: i64,
        max: i64,
    },

    #[error("{scope}: smoothing threshold ({threshold}) must be less than rate ({rate})")]
    SmoothingThresholdNotBelowRate {
        scope: String,
        threshold: i64,
        rate: f64,
    },

    #[error("{scope}: smoothing trigger ({trigger}) must be in (0, 1]")]
    SmoothingTriggerOutOfRange { scope: String, trigger: f64 },
}

impl From<KeyValidationError> for DomainError {
    fn from(error: KeyValidationError) -> Self {
        DomainError::validation(error.to_string())
    }
}

impl KeyRecord {
    /// Check quota and smoothing invariants at the key level and per API
    pub fn validate(&self) -> Result<(), KeyValidationError> {
        validate_quota("key", self.quota_max, self.quota_remaining)?;

        if let Some(smoothing) = &self.smoothing {
            validate_smoothing("key", smoothing, self.rate)?;
        }

        for (api_id, definition) in self.access_rights.iter().flatten() {
            if let Some(limit) = &definition.limit {
                validate_api_limit(&format!("access_rights.{}", api_id), limit)?;
            }
        }

        Ok(())
    }
}

fn validate_api_limit(scope: &str, limit: &ApiLimit) -> Result<(), KeyValidationError> {
    validate_quota(scope, limit.quota_max, limit.quota_remaining)?;

    if let Some(smoothing) = &limit.smoothing {
        validate_smoothing(scope, smoothing, limit.rate)?;
    }

    Ok(())
}

/// A negative quota_max means unlimited
fn validate_quota(
    scope: &str,
    quota_max: Option<i64>,
    quota_remaining: Option<i64>,
) -> Result<(), KeyValidationError> {
    match (quota_max, quota_remaining) {
        (Some(max), Some(remaining)) if max >= 0 && remaining > max => {
            Err(KeyValidationError::QuotaRemainingExceedsMax {
                scope: scope.to_string(),
                remaining,
                max,
            })
        }
        _ => Ok(()),
    }
}

fn validate_smoothing(
    scope: &str,
    smoothing: &RateLimitSmoothing,
    rate: Option<f64>,
) -> Result<(), KeyValidationError> {
    if !smoothing.is_enabled() {
        return Ok(());
    }

    if let (Some(threshold), Some(rate)) = (smoothing.threshold, rate) {
        if threshold as f64 >= rate {
            return Err(KeyValidationError::SmoothingThresholdNotBelowRate {
                scope: scope.to_string(),
                threshold,
                rate,
            });
        }
    }

    if let Some(trigger) = smoothing.trigger {
        if !(trigger > 0.0 && trigger <= 1.0) {
            return Err(KeyValidationError::SmoothingTriggerOutOfRange {
                scope: scope.to_string(),
                trigger,
            });
        }
    }

    Ok(())
}
