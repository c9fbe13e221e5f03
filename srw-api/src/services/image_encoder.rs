//! Image fetch-and-encode
//!
//! Downloads an image and returns it as a `data:` URI so the front-end can
//! render avatars without hot-linking the upstream CDN.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use srw_common::config::UpstreamConfig;
use tracing::debug;

use crate::types::{FetchError, ImageEncoder};

const FALLBACK_MIME: &str = "image/jpeg";

/// Build a `data:` URI from raw image bytes
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// [`ImageEncoder`] backed by plain HTTP GETs
pub struct HttpImageEncoder {
    http_client: Client,
}

impl HttpImageEncoder {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.image_timeout())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl ImageEncoder for HttpImageEncoder {
    async fn encode(&self, url: &str) -> Result<String, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::Image("empty image URL".to_string()));
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Image(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Image(format!("{} returned HTTP {}", url, status.as_u16())));
        }

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Image(format!("{}: {}", url, e)))?;

        debug!(url, size = bytes.len(), mime = %mime, "Encoded image");
        Ok(to_data_uri(&mime, &bytes))
    }
}
