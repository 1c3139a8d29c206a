pub mod types;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Client;
use tracing::{debug, warn};

use types::DefinitionEntry;

const API_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// Characters to percent-encode when placing the search term into the URL
/// path. Includes `/` so a term can never introduce extra path segments.
const TERM_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'?')
    .add(b'[')
    .add(b']');

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("dictionary service returned HTTP {0}")]
    Unavailable(u16),

    #[error("no definition found")]
    WordNotFound,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// HTTP client for the dictionaryapi.dev entries endpoint.
#[derive(Clone)]
pub struct DictionaryClient {
    http: Client,
    base_url: String,
}

impl DictionaryClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    /// Fetch the definition entry for `term`.
    ///
    /// The upstream returns a JSON array of entries; only the first is kept.
    /// A 2xx body that is not a non-empty entry array is treated as
    /// "word not found", never as a crash.
    pub async fn define(&self, term: &str) -> Result<DefinitionEntry, DictionaryError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(term, TERM_ENCODE_SET)
        );
        let response = self
            .http
            .get(&url)
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "dictionary lookup failed");
            return Err(DictionaryError::Unavailable(status.as_u16()));
        }

        let body = response.text().await?;
        let mut entries: Vec<DefinitionEntry> =
            serde_json::from_str(&body).map_err(|e| {
                debug!(error = %e, "dictionary payload was not an entry array");
                DictionaryError::WordNotFound
            })?;
        if entries.is_empty() {
            return Err(DictionaryError::WordNotFound);
        }

        debug!(word = %entries[0].word, "definition fetched");
        Ok(entries.swap_remove(0))
    }
}
