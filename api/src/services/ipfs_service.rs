// IPFS storage for support messages via a Pinata-compatible pinning API

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum IpfsError {
    #[error("IPFS transport error: {0}")]
    Transport(String),
    #[error("IPFS returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("IPFS response could not be decoded: {0}")]
    Decode(String),
    #[error("IPFS not configured: {0}")]
    NotConfigured(String),
}

/// Content-addressed JSON storage
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Stores a JSON document and returns its CID
    async fn store_json(&self, value: &Value) -> Result<String, IpfsError>;

    /// Fetches a JSON document by CID
    async fn fetch_json(&self, cid: &str) -> Result<Value, IpfsError>;
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Pins through `POST /pinning/pinJSONToIPFS` and reads through an HTTP gateway
pub struct PinataIpfsService {
    http_client: reqwest::Client,
    api_url: String,
    jwt: Option<String>,
    gateway_url: String,
}

impl PinataIpfsService {
    pub fn new(http_client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            http_client,
            api_url: config.ipfs_api_url.trim_end_matches('/').to_string(),
            jwt: config.ipfs_jwt.clone(),
            gateway_url: config.ipfs_gateway_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ContentStore for PinataIpfsService {
    async fn store_json(&self, value: &Value) -> Result<String, IpfsError> {
        let jwt = self
            .jwt
            .as_deref()
            .ok_or_else(|| IpfsError::NotConfigured("IPFS_JWT is not set".to_string()))?;

        let resp = self
            .http_client
            .post(format!("{}/pinning/pinJSONToIPFS", self.api_url))
            .bearer_auth(jwt)
            .json(&json!({ "pinataContent": value }))
            .send()
            .await
            .map_err(|e| IpfsError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IpfsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let pinned: PinResponse = resp
            .json()
            .await
            .map_err(|e| IpfsError::Decode(e.to_string()))?;
        tracing::debug!("Pinned support message as {}", pinned.ipfs_hash);
        Ok(pinned.ipfs_hash)
    }

    async fn fetch_json(&self, cid: &str) -> Result<Value, IpfsError> {
        let resp = self
            .http_client
            .get(format!("{}/{}", self.gateway_url, cid))
            .send()
            .await
            .map_err(|e| IpfsError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IpfsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| IpfsError::Decode(e.to_string()))
    }
}

/// CIDv0 (`Qm...`) and CIDv1 base32/base58 identifiers are plain alphanumerics
pub fn is_valid_cid(cid: &str) -> bool {
    (10..=128).contains(&cid.len()) && cid.chars().all(|c| c.is_ascii_alphanumeric())
}
