use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

const API_BASE: &str = "https://pixabay.com/api/";

/// Pixabay rejects per_page values below 3.
const MIN_PER_PAGE: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image search returned HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// An illustrative photo, URL already forced onto https.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResult {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "webformatURL")]
    webformat_url: Option<String>,
    #[serde(rename = "largeImageURL")]
    large_image_url: Option<String>,
    #[serde(rename = "previewURL")]
    preview_url: Option<String>,
}

/// HTTP client for the Pixabay photo-search API.
#[derive(Clone)]
pub struct ImageClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl ImageClient {
    pub fn new(http: Client, api_key: &str) -> Self {
        Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            base_url: base_url.to_string(),
        }
    }

    /// Search photos for `term`, returning at most `max_images` results.
    pub async fn search(
        &self,
        term: &str,
        max_images: usize,
    ) -> Result<Vec<ImageResult>, ImageError> {
        let per_page = max_images.max(MIN_PER_PAGE);
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.0.as_str()),
                ("q", term),
                ("image_type", "photo"),
                ("safesearch", "true"),
            ])
            .query(&[("per_page", per_page)])
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "image search failed");
            return Err(ImageError::Status(status.as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        let images: Vec<ImageResult> = body
            .hits
            .iter()
            .filter_map(display_url)
            .take(max_images)
            .map(|url| ImageResult { url })
            .collect();
        debug!(count = images.len(), "image search complete");
        Ok(images)
    }
}

/// Displayable URL for one hit: webformat, else large, else preview.
/// Skips hits with no usable http(s) candidate.
fn display_url(hit: &Hit) -> Option<String> {
    let raw = hit
        .webformat_url
        .as_deref()
        .or(hit.large_image_url.as_deref())
        .or(hit.preview_url.as_deref())?;
    force_https(raw)
}

fn force_https(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw).ok()?;
    match url.scheme() {
        "https" => {}
        "http" => url.set_scheme("https").ok()?,
        _ => return None,
    }
    Some(url.into())
}
