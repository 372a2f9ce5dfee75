use crate::config::AssistantConfig;
use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::Proxy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::time::Duration;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        // Generation on local hardware is slow; the timeout covers the whole response.
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("AI_HTTP_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )));

        if let Ok(proxy_url) = env::var("AI_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(TransportError::Http)?;
        Self::decode_json(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(TransportError::Http)?;
        Self::decode_json(response).await
    }

    /// POST and return the raw body as a byte stream (for NDJSON responses).
    pub async fn post_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<BoxStream<'static, Bytes>> {
        let url = self.url(path);
        tracing::debug!(url = %url, "POST (stream)");
        let response = self
            .client
            .post(&url)
            .header("accept", "application/x-ndjson")
            .json(body)
            .send()
            .await
            .map_err(TransportError::Http)?;
        let response = Self::check_status(response).await?;

        let byte_stream = response
            .bytes_stream()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)));
        Ok(Box::pin(byte_stream))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(crate::Error::remote(status.as_u16(), &body))
    }

    async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let text = response.text().await.map_err(TransportError::Http)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
