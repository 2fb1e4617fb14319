use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_API_BASE: &str = "https://api.pagar.me/core/v5";

/// Stored Pagar.me credential. The token is sent verbatim after `Basic `;
/// whatever the operator saved is used as-is, with no encoding applied.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct PagarMeApi {
    pub tokens: String,
}

impl fmt::Debug for PagarMeApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagarMeApi").field("tokens", &"***").finish()
    }
}

impl PagarMeApi {
    pub fn new(tokens: impl Into<String>) -> Self {
        Self { tokens: tokens.into() }
    }

    pub fn authorization(&self) -> String {
        format!("Basic {}", self.tokens)
    }

    pub fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.authorization())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as JSON, or as a JSON string when it does not parse.
    pub fn body_value(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).to_string()))
    }
}

/// HTTP client that injects its credential into every request it sends.
#[async_trait]
pub trait AuthenticatingClient: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<RawResponse>;
}

pub struct PagarMeClient {
    client: Client,
    credential: PagarMeApi,
    base_url: String,
}

impl PagarMeClient {
    pub fn new(credential: PagarMeApi) -> Self {
        Self {
            client: Client::new(),
            credential,
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl AuthenticatingClient for PagarMeClient {
    async fn post_json(&self, path: &str, body: &Value) -> Result<RawResponse> {
        let request = self
            .client
            .post(self.url(path))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(body);

        let resp = self.credential.authenticate(request).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}
