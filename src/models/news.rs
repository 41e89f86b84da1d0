use serde::{Deserialize, Serialize};

/// A single legal-news article as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub published_at: String,
    pub source: NewsSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsSource {
    pub name: String,
    pub url: Option<String>,
}

/// A page of legal news.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsResponse {
    pub total_articles: u64,
    pub articles: Vec<NewsArticle>,
}

/// Query parameters for a news fetch. Country + page form the cache key.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsFilters {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_country() -> String {
    "us".to_string()
}

fn default_page() -> u32 {
    1
}

impl NewsFilters {
    pub fn cache_key(&self) -> String {
        format!("{}-{}", self.country, self.page)
    }
}
