use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::{info, warn};
use url::Url;

use crate::errors::AppError;
use crate::models::{NewsArticle, NewsCategory, NewsPayload};
use crate::services::calibration::CacheEntry;
use crate::services::rss::parse_rss_items;

/// Per-category cache freshness window.
pub const NEWS_CACHE_TTL_SECS: i64 = 120;

/// Headlines kept per category after filtering.
pub const MAX_ARTICLES: usize = 12;

/// A headline survives when it names at least one of these.
const MUST_HAVE: &[&str] = &[
    "gold", "bullion", "24k", "22k", "hallmark", "jewellery", "jewelry", "mcx", "xau", "xauusd",
    "sovereign", "karat", "carat",
];

/// Noise keywords that disqualify a headline outright.
const BLOCKED: &[&str] = &[
    "bitcoin", "crypto", "nft", "football", "cricket", "movie", "celebrity", "song", "game",
];

/// Case-insensitive substring relevance check on the headline.
pub fn is_relevant_title(title: &str) -> bool {
    let t = title.to_lowercase();

    if !MUST_HAVE.iter().any(|k| t.contains(k)) {
        return false;
    }

    !BLOCKED.iter().any(|k| t.contains(k))
}

/// Raw RSS retrieval boundary, so the cache lifecycle can run against stubs.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, category: NewsCategory) -> Result<String, AppError>;
}

/// Production source: Google News RSS search over HTTPS.
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (GoldWise News)")
                .timeout(std::time::Duration::from_secs(20))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, category: NewsCategory) -> Result<String, AppError> {
        let url = rss_search_url(category);

        let resp = self.client.get(url).send().await.map_err(|e| {
            warn!("News fetch failed for '{}': {}", category, e);
            AppError::External(format!("News upstream unreachable: {}", e))
        })?;

        if !resp.status().is_success() {
            return Err(AppError::External(format!("News upstream {}", resp.status())));
        }

        resp.text()
            .await
            .map_err(|e| AppError::External(format!("News upstream body: {}", e)))
    }
}

/// Fetch → parse → dedupe → relevance-filter → cache pipeline, keyed by
/// category. Structurally the same lifecycle as the quote path, with an
/// independent TTL.
pub struct NewsService {
    source: Arc<dyn FeedSource>,
    cache: DashMap<NewsCategory, CacheEntry<NewsPayload>>,
    ttl: Duration,
}

impl NewsService {
    pub fn new() -> Self {
        Self::with_source(Arc::new(HttpFeedSource::new()))
    }

    pub fn with_source(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source,
            cache: DashMap::new(),
            ttl: Duration::seconds(NEWS_CACHE_TTL_SECS),
        }
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn category_news(&self, category: NewsCategory) -> Result<NewsPayload, AppError> {
        let now = Utc::now();
        if let Some(entry) = self.cache.get(&category) {
            if entry.is_fresh(now, self.ttl) {
                return Ok(entry.value.clone());
            }
        }

        // An expired entry is never served; the fetch either succeeds or the
        // caller gets the error.
        let xml = self.source.fetch(category).await?;
        let payload = build_payload(&xml, category);

        info!("✓ News refreshed for '{}': {} articles", category, payload.articles.len());
        self.cache
            .insert(category, CacheEntry { fetched_at: Utc::now(), value: payload.clone() });
        Ok(payload)
    }
}

impl Default for NewsService {
    fn default() -> Self {
        Self::new()
    }
}

fn rss_search_url(category: NewsCategory) -> Url {
    Url::parse_with_params(
        "https://news.google.com/rss/search",
        &[
            ("q", category.search_query()),
            ("hl", "en-IN"),
            ("gl", "IN"),
            ("ceid", "IN:en"),
        ],
    )
    .expect("static news feed url is valid")
}

/// Pure tail of the pipeline: parse items, keep relevant headlines, truncate,
/// wrap with metadata.
pub fn build_payload(xml: &str, category: NewsCategory) -> NewsPayload {
    let mut articles: Vec<NewsArticle> = parse_rss_items(xml)
        .into_iter()
        .filter(|a| is_relevant_title(&a.title))
        .collect();
    articles.truncate(MAX_ARTICLES);

    NewsPayload { ok: true, category, updated_at: Utc::now(), articles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct StubFeed {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl StubFeed {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), fail: AtomicBool::new(false) })
        }
    }

    #[async_trait]
    impl FeedSource for StubFeed {
        async fn fetch(&self, _category: NewsCategory) -> Result<String, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::External("News upstream 503 Service Unavailable".into()));
            }
            Ok("<rss><channel>\
                <item><title>Gold rallies on MCX</title><link>https://example.com/a</link></item>\
                </channel></rss>"
                .to_string())
        }
    }

    #[tokio::test]
    async fn reads_within_ttl_share_one_upstream_fetch() {
        let feed = StubFeed::new();
        let svc = NewsService::with_source(feed.clone());

        let first = svc.category_news(NewsCategory::India).await.unwrap();
        let second = svc.category_news(NewsCategory::India).await.unwrap();

        assert_eq!(first.updated_at, second.updated_at);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched_not_served() {
        let feed = StubFeed::new();
        let svc = NewsService::with_source(feed.clone()).with_ttl(Duration::zero());

        svc.category_news(NewsCategory::India).await.unwrap();
        svc.category_news(NewsCategory::India).await.unwrap();
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);

        // Once the refetch starts failing, the stale payload stays buried.
        feed.fail.store(true, Ordering::SeqCst);
        let result = svc.category_news(NewsCategory::India).await;
        assert!(matches!(result, Err(AppError::External(_))));
    }

    #[tokio::test]
    async fn fetch_failure_on_a_cold_cache_surfaces() {
        let feed = StubFeed::new();
        feed.fail.store(true, Ordering::SeqCst);
        let svc = NewsService::with_source(feed);

        assert!(matches!(
            svc.category_news(NewsCategory::Global).await,
            Err(AppError::External(_))
        ));
    }

    #[tokio::test]
    async fn categories_are_cached_independently() {
        let feed = StubFeed::new();
        let svc = NewsService::with_source(feed.clone());

        svc.category_news(NewsCategory::India).await.unwrap();
        svc.category_news(NewsCategory::Silver).await.unwrap();
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn relevance_filter_contract() {
        assert!(is_relevant_title("Gold prices surge in MCX trading"));
        // Blocked keyword wins even with a must-have present.
        assert!(!is_relevant_title("Bitcoin and gold both rally"));
        // No must-have keyword at all.
        assert!(!is_relevant_title("Stock market update"));
        assert!(is_relevant_title("Hallmark jewellery demand strong in Srinagar"));
    }

    #[test]
    fn payload_filters_and_truncates_in_feed_order() {
        let mut items = String::new();
        for i in 0..20 {
            items.push_str(&format!(
                "<item><title>Gold update {}</title><link>https://example.com/{}</link></item>",
                i, i
            ));
        }
        items.push_str(
            "<item><title>Cricket scores</title><link>https://example.com/cricket</link></item>",
        );
        let xml = format!("<rss><channel>{}</channel></rss>", items);

        let payload = build_payload(&xml, NewsCategory::India);
        assert!(payload.ok);
        assert_eq!(payload.articles.len(), MAX_ARTICLES);
        assert_eq!(payload.articles[0].title, "Gold update 0");
        assert!(payload.articles.iter().all(|a| a.title.starts_with("Gold update")));
    }

    #[test]
    fn search_url_encodes_category_query() {
        let url = rss_search_url(NewsCategory::Kashmir);
        assert_eq!(url.host_str(), Some("news.google.com"));
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(q.contains("Srinagar"));
    }
}
