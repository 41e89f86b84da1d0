//! Legal news feed.
//!
//! Fetches from a GNews-style endpoint and caches pages for five minutes.
//! The cache is an explicit dependency with TTL metadata, evicted on read;
//! there is no ambient timer and no module-level state.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{NewsArticle, NewsFilters, NewsResponse, NewsSource};

/// How long a fetched page stays valid.
pub const NEWS_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

const NEWS_QUERY: &str = "legal law court legislation";
const PAGE_SIZE: u32 = 10;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("News API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Could not parse news response: {0}")]
    ResponseParsing(String),

    #[error("Internal lock error")]
    LockPoisoned,
}

// ── Cache ───────────────────────────────────────────────────

/// TTL cache keyed by `{country}-{page}`. Expired entries are dropped when
/// read, not by a background sweeper.
pub struct NewsCache {
    entries: HashMap<String, (NewsResponse, Instant)>,
    ttl: Duration,
}

impl NewsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<NewsResponse> {
        match self.entries.get(key) {
            Some((_, inserted)) if inserted.elapsed() >= self.ttl => {
                self.entries.remove(key);
                None
            }
            Some((response, _)) => Some(response.clone()),
            None => None,
        }
    }

    pub fn put(&mut self, key: String, response: NewsResponse) {
        self.entries.insert(key, (response, Instant::now()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Service ─────────────────────────────────────────────────

pub struct NewsService {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    cache: Mutex<NewsCache>,
}

impl NewsService {
    pub fn new(base_url: &str, api_key: &str, cache: NewsCache) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            cache: Mutex::new(cache),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            &crate::config::news_base_url(),
            &crate::config::news_api_key(),
            NewsCache::new(NEWS_CACHE_TTL),
        )
    }

    /// Fetch a page of legal news, served from cache when fresh.
    pub async fn fetch_legal_news(
        &self,
        filters: &NewsFilters,
    ) -> Result<NewsResponse, NewsError> {
        let key = filters.cache_key();
        {
            let mut cache = self.cache.lock().map_err(|_| NewsError::LockPoisoned)?;
            if let Some(cached) = cache.get(&key) {
                tracing::debug!(key = %key, "News served from cache");
                return Ok(cached);
            }
        }

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", NEWS_QUERY),
                ("country", &filters.country),
                ("page", &filters.page.to_string()),
                ("max", &PAGE_SIZE.to_string()),
                ("apikey", &self.api_key),
                ("category", "general"),
            ])
            .send()
            .await
            .map_err(|e| NewsError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewsError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: RawNewsResponse = response
            .json()
            .await
            .map_err(|e| NewsError::ResponseParsing(e.to_string()))?;
        let transformed = transform(raw);

        let mut cache = self.cache.lock().map_err(|_| NewsError::LockPoisoned)?;
        cache.put(key, transformed.clone());
        Ok(transformed)
    }
}

// ── Upstream wire types ─────────────────────────────────────

#[derive(Deserialize)]
struct RawNewsResponse {
    #[serde(rename = "totalArticles", default)]
    total_articles: u64,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Deserialize)]
struct RawArticle {
    title: String,
    description: Option<String>,
    content: Option<String>,
    url: String,
    image: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
    source: RawSource,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSource {
    name: String,
    url: Option<String>,
}

fn transform(raw: RawNewsResponse) -> NewsResponse {
    NewsResponse {
        total_articles: raw.total_articles,
        articles: raw
            .articles
            .into_iter()
            .map(|a| NewsArticle {
                title: a.title,
                description: a.description,
                content: a.content,
                url: a.url,
                image: a.image,
                published_at: a.published_at,
                source: NewsSource {
                    name: a.source.name,
                    url: a.source.url,
                },
            })
            .collect(),
    }
}
