use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::dictionary::types::DefinitionEntry;
use crate::dictionary::{DictionaryClient, DictionaryError};
use crate::images::{ImageClient, ImageError, ImageResult};

pub const DEFAULT_MAX_IMAGES: usize = 6;

/// Seam for the definition fetch; implemented by `DictionaryClient` for
/// production, mock implementations used in tests.
pub trait DefineSource {
    async fn define(&self, term: &str) -> Result<DefinitionEntry, DictionaryError>;
}

/// Seam for the photo search; implemented by `ImageClient` for production.
pub trait ImageSource {
    async fn search(
        &self,
        term: &str,
        max_images: usize,
    ) -> Result<Vec<ImageResult>, ImageError>;
}

impl DefineSource for DictionaryClient {
    async fn define(&self, term: &str) -> Result<DefinitionEntry, DictionaryError> {
        DictionaryClient::define(self, term).await
    }
}

impl ImageSource for ImageClient {
    async fn search(
        &self,
        term: &str,
        max_images: usize,
    ) -> Result<Vec<ImageResult>, ImageError> {
        ImageClient::search(self, term, max_images).await
    }
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Pixabay API key; absence degrades to no-images mode.
    pub image_api_key: Option<String>,
    pub max_images: usize,
    /// Treat an image-lookup failure as fatal instead of degrading.
    pub require_images: bool,
}

impl LookupConfig {
    pub fn from_env() -> Self {
        let image_api_key = std::env::var("PIXABAY_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            image_api_key,
            max_images: DEFAULT_MAX_IMAGES,
            require_images: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("The dictionary service is unavailable. Try again later.")]
    DictionaryUnavailable { status: Option<u16> },

    #[error("No definition found.")]
    WordNotFound,

    #[error("Could not load images for this word.")]
    ImagesUnavailable,
}

impl From<DictionaryError> for LookupError {
    fn from(e: DictionaryError) -> Self {
        match e {
            DictionaryError::Unavailable(status) => Self::DictionaryUnavailable {
                status: Some(status),
            },
            DictionaryError::Network(_) => Self::DictionaryUnavailable { status: None },
            DictionaryError::WordNotFound => Self::WordNotFound,
        }
    }
}

/// Everything one successful lookup produced. `images` may be empty on
/// success; `images_failed` marks a swallowed image-search failure so the
/// caller can show a non-blocking notice.
#[derive(Debug, PartialEq)]
pub struct LookupReport {
    pub entry: DefinitionEntry,
    pub images: Vec<ImageResult>,
    pub images_failed: bool,
}

/// Outcome of one lookup, stamped with a monotonically increasing
/// generation so callers that overlap lookups can discard superseded
/// results.
#[derive(Debug)]
pub struct LookupResult {
    pub generation: u64,
    pub outcome: Result<LookupReport, LookupError>,
}

/// Orchestrates one search: definition fetch first, then (if configured)
/// the photo search. The two calls are strictly sequential; there are no
/// retries, timeouts, or cancellation.
pub struct Lookup<D, I> {
    dictionary: D,
    images: Option<I>,
    max_images: usize,
    require_images: bool,
    generation: AtomicU64,
}

impl Lookup<DictionaryClient, ImageClient> {
    /// Wire up production clients from one shared HTTP client.
    pub fn new(http: reqwest::Client, config: &LookupConfig) -> Self {
        let images = config
            .image_api_key
            .as_deref()
            .map(|key| ImageClient::new(http.clone(), key));
        Self {
            dictionary: DictionaryClient::new(http),
            images,
            max_images: config.max_images,
            require_images: config.require_images,
            generation: AtomicU64::new(0),
        }
    }
}

impl<D: DefineSource, I: ImageSource> Lookup<D, I> {
    #[cfg(test)]
    fn with_sources(dictionary: D, images: Option<I>, config: &LookupConfig) -> Self {
        Self {
            dictionary,
            images,
            max_images: config.max_images,
            require_images: config.require_images,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn lookup(&self, term: &str) -> LookupResult {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let outcome = self.run(term).await;
        LookupResult { generation, outcome }
    }

    async fn run(&self, term: &str) -> Result<LookupReport, LookupError> {
        let entry = self.dictionary.define(term).await?;

        let (images, images_failed) = match &self.images {
            None => (Vec::new(), false),
            Some(source) => match source.search(term, self.max_images).await {
                Ok(images) => (images, false),
                Err(e) if self.require_images => {
                    warn!(error = %e, "image search failed");
                    return Err(LookupError::ImagesUnavailable);
                }
                Err(e) => {
                    warn!(error = %e, "image search failed (continuing without images)");
                    (Vec::new(), true)
                }
            },
        };

        debug!(word = %entry.word, images = images.len(), "lookup complete");
        Ok(LookupReport {
            entry,
            images,
            images_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    struct MockDefine {
        responses: Mutex<VecDeque<Result<DefinitionEntry, DictionaryError>>>,
    }

    impl MockDefine {
        fn with(responses: Vec<Result<DefinitionEntry, DictionaryError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
            }
        }
    }

    impl DefineSource for MockDefine {
        async fn define(&self, _term: &str) -> Result<DefinitionEntry, DictionaryError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(DictionaryError::WordNotFound))
        }
    }

    struct MockImages {
        responses: Mutex<VecDeque<Result<Vec<ImageResult>, ImageError>>>,
        calls: AtomicUsize,
    }

    impl MockImages {
        fn with(responses: Vec<Result<Vec<ImageResult>, ImageError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl ImageSource for MockImages {
        async fn search(
            &self,
            _term: &str,
            _max_images: usize,
        ) -> Result<Vec<ImageResult>, ImageError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Vec::new()))
        }
    }

    fn entry(word: &str) -> DefinitionEntry {
        serde_json::from_value(serde_json::json!({"word": word})).unwrap()
    }

    fn image(url: &str) -> ImageResult {
        ImageResult { url: url.into() }
    }

    fn config() -> LookupConfig {
        LookupConfig {
            image_api_key: None,
            max_images: DEFAULT_MAX_IMAGES,
            require_images: false,
        }
    }

    #[tokio::test]
    async fn lookup_without_image_source_yields_empty_images() {
        let lookup = Lookup::<_, MockImages>::with_sources(
            MockDefine::with(vec![Ok(entry("cat"))]),
            None,
            &config(),
        );

        let result = lookup.lookup("cat").await;
        let report = result.outcome.unwrap();
        assert_eq!(report.entry.word, "cat");
        assert!(report.images.is_empty());
        assert!(!report.images_failed);
    }

    #[tokio::test]
    async fn lookup_combines_definition_and_images() {
        let images = MockImages::with(vec![Ok(vec![image("https://x/1.jpg")])]);
        let lookup = Lookup::with_sources(
            MockDefine::with(vec![Ok(entry("cat"))]),
            Some(images),
            &config(),
        );

        let report = lookup.lookup("cat").await.outcome.unwrap();
        assert_eq!(report.images, vec![image("https://x/1.jpg")]);
        assert!(!report.images_failed);
    }

    #[tokio::test]
    async fn image_failure_is_soft_by_default() {
        let images = MockImages::with(vec![Err(ImageError::Status(500))]);
        let lookup = Lookup::with_sources(
            MockDefine::with(vec![Ok(entry("cat"))]),
            Some(images),
            &config(),
        );

        let report = lookup.lookup("cat").await.outcome.unwrap();
        assert_eq!(report.entry.word, "cat");
        assert!(report.images.is_empty());
        assert!(report.images_failed);
    }

    #[tokio::test]
    async fn image_failure_is_fatal_when_required() {
        let images = MockImages::with(vec![Err(ImageError::Status(500))]);
        let lookup = Lookup::with_sources(
            MockDefine::with(vec![Ok(entry("cat"))]),
            Some(images),
            &LookupConfig {
                require_images: true,
                ..config()
            },
        );

        let outcome = lookup.lookup("cat").await.outcome;
        assert_eq!(outcome.unwrap_err(), LookupError::ImagesUnavailable);
    }

    #[tokio::test]
    async fn definition_failure_prevents_the_image_call() {
        let images = MockImages::with(vec![Ok(vec![image("https://x/1.jpg")])]);
        let lookup = Lookup::with_sources(
            MockDefine::with(vec![Err(DictionaryError::Unavailable(404))]),
            Some(images),
            &config(),
        );

        let outcome = lookup.lookup("qqqq").await.outcome;
        assert_eq!(
            outcome.unwrap_err(),
            LookupError::DictionaryUnavailable { status: Some(404) }
        );
        assert_eq!(lookup.images.as_ref().unwrap().call_count(), 0);
    }

    #[tokio::test]
    async fn network_failure_maps_to_unavailable_without_status() {
        let bad_client = reqwest::Client::new();
        // Unroutable port on localhost to synthesize a transport error.
        let dictionary =
            DictionaryClient::with_base_url(bad_client, "http://127.0.0.1:9");
        let lookup =
            Lookup::<_, MockImages>::with_sources(dictionary, None, &config());

        let outcome = lookup.lookup("cat").await.outcome;
        assert_eq!(
            outcome.unwrap_err(),
            LookupError::DictionaryUnavailable { status: None }
        );
    }

    #[tokio::test]
    async fn generation_increases_per_lookup() {
        let lookup = Lookup::<_, MockImages>::with_sources(
            MockDefine::with(vec![Ok(entry("cat")), Ok(entry("cat"))]),
            None,
            &config(),
        );

        let first = lookup.lookup("cat").await;
        let second = lookup.lookup("cat").await;
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
    }

    #[tokio::test]
    async fn identical_upstream_responses_yield_identical_outcomes() {
        let images = MockImages::with(vec![
            Ok(vec![image("https://x/1.jpg")]),
            Ok(vec![image("https://x/1.jpg")]),
        ]);
        let lookup = Lookup::with_sources(
            MockDefine::with(vec![Ok(entry("cat")), Ok(entry("cat"))]),
            Some(images),
            &config(),
        );

        let first = lookup.lookup("cat").await;
        let second = lookup.lookup("cat").await;
        assert_eq!(first.outcome, second.outcome);
        assert_ne!(first.generation, second.generation);
    }
}
