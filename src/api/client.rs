//! Authenticated JSON transport shared by every resource client

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Attaches credentials to an outgoing request
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError>;
}

/// Reads the session token on every request and sends it as a bearer token
#[derive(Debug, Clone)]
pub struct BearerTokenSigner {
    session: SessionStore,
}

impl BearerTokenSigner {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl RequestSigner for BearerTokenSigner {
    fn sign(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self
            .session
            .load_token()?
            .ok_or(ApiError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }
}

/// Fixed bearer token, for scripted use
#[derive(Debug, Clone)]
pub struct StaticTokenSigner {
    token: String,
}

impl StaticTokenSigner {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl RequestSigner for StaticTokenSigner {
    fn sign(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(request.bearer_auth(&self.token))
    }
}

/// HTTP client bound to one API host
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    signer: Arc<dyn RequestSigner>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, signer: Arc<dyn RequestSigner>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            signer,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.execute(self.http.get(&url), &url).await?;
        decode(response, &url).await
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.http.request(method, &url).json(body);
        let response = self.execute(request, &url).await?;
        decode(response, &url).await
    }

    /// DELETE a resource; any 2xx status counts as success and the body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        self.execute(self.http.delete(&url), &url).await?;
        Ok(())
    }

    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        let request = self.signer.sign(request)?;
        debug!("Sending request to {}", url);

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Request to {} failed with status {}", url, status);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized {
                url: url.to_string(),
                status: status.as_u16(),
            }),
            _ => Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            }),
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
