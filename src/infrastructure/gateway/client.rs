use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::GatewayConfig;
use crate::domain::key::{KeyIdentifiers, KeyRecord, KeyStore, ModifyKeyResponse};
use crate::domain::DomainError;

/// Header carrying the gateway credential
pub const AUTHORIZATION_HEADER: &str = "X-Tyk-Authorization";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Key store backed by the gateway's REST API
#[derive(Debug, Clone)]
pub struct GatewayKeyStore {
    http_client: reqwest::Client,
    base_url: Url,
    authorization: HeaderValue,
}

impl GatewayKeyStore {
    pub fn new(
        base_url: &str,
        api_key: &SecretString,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| DomainError::configuration(format!("Invalid gateway url: {}", e)))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(DomainError::configuration(
                "Gateway url must be an absolute http(s) url",
            ));
        }

        let mut authorization = HeaderValue::from_str(api_key.expose_secret()).map_err(|_| {
            DomainError::configuration("Gateway api_key is not a valid header value")
        })?;
        authorization.set_sensitive(true);

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url,
            authorization,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, DomainError> {
        Self::new(
            &config.url,
            &config.api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn keys_url(&self, id: Option<&str>) -> Result<Url, DomainError> {
        let mut url = self.base_url.clone();

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| DomainError::configuration("Gateway url cannot be a base"))?;
            segments.pop_if_empty().push("tyk").push("keys");

            if let Some(id) = id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        hashed: bool,
        body: Option<Vec<u8>>,
    ) -> Result<String, DomainError> {
        let mut request = self
            .http_client
            .request(method.clone(), url)
            .query(&[("hashed", hashed)])
            .header(AUTHORIZATION_HEADER, self.authorization.clone());

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                DomainError::transport(format!("Request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| {
                DomainError::transport(format!("Failed to read response: {}", e.without_url()))
            })?;

        debug!(method = %method, hashed, status = status.as_u16(), "Gateway key request completed");

        if status != StatusCode::OK {
            return Err(DomainError::remote(status.as_u16(), text));
        }

        Ok(text)
    }
}

fn encode(record: &KeyRecord) -> Result<Vec<u8>, DomainError> {
    serde_json::to_vec(record).map_err(|e| DomainError::encoding(e.to_string()))
}

fn decode_identifiers(text: &str) -> Result<KeyIdentifiers, DomainError> {
    let response: ModifyKeyResponse = serde_json::from_str(text)
        .map_err(|e| DomainError::invalid_response(format!("Failed to parse response: {}", e)))?;
    Ok(response.into())
}

#[async_trait]
impl KeyStore for GatewayKeyStore {
    async fn create(
        &self,
        record: &KeyRecord,
        hashed: bool,
    ) -> Result<KeyIdentifiers, DomainError> {
        let body = encode(record)?;
        let url = self.keys_url(None)?;

        let text = self.send(Method::POST, url, hashed, Some(body)).await?;
        decode_identifiers(&text)
    }

    async fn read(&self, id: &str, hashed: bool) -> Result<KeyRecord, DomainError> {
        let url = self.keys_url(Some(id))?;

        let text = self.send(Method::GET, url, hashed, None).await?;
        serde_json::from_str(&text)
            .map_err(|e| DomainError::invalid_response(format!("Failed to parse key: {}", e)))
    }

    async fn update(
        &self,
        id: &str,
        hashed: bool,
        record: &KeyRecord,
    ) -> Result<KeyIdentifiers, DomainError> {
        let body = encode(record)?;
        let url = self.keys_url(Some(id))?;

        let text = self.send(Method::PUT, url, hashed, Some(body)).await?;
        decode_identifiers(&text)
    }

    async fn delete(&self, id: &str, hashed: bool) -> Result<(), DomainError> {
        let url = self.keys_url(Some(id))?;

        self.send(Method::DELETE, url, hashed, None).await?;
        Ok(())
    }
}
