use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single headline surfaced to the client. `published_at` stays `None`
/// when the feed carries an unparsable date; the article itself is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsArticle {
    /// Deduplication key: URL, falling back to the title when absent.
    pub fn dedupe_key(&self) -> &str {
        if self.url.is_empty() {
            &self.title
        } else {
            &self.url
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Kashmir,
    India,
    Global,
    Silver,
}

impl NewsCategory {
    /// Query-string key to category; unknown keys fall back to India.
    pub fn from_param(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "kashmir" => NewsCategory::Kashmir,
            "india" => NewsCategory::India,
            "global" => NewsCategory::Global,
            "silver" => NewsCategory::Silver,
            _ => NewsCategory::India,
        }
    }

    /// Search query feeding the syndication feed for this category.
    pub fn search_query(&self) -> &'static str {
        match self {
            NewsCategory::Kashmir => {
                "gold price Kashmir OR Srinagar OR bullion Kashmir OR jewellery Kashmir"
            }
            NewsCategory::India => {
                "gold price India OR MCX gold OR bullion India OR jewellery India"
            }
            NewsCategory::Global => {
                "gold price global OR XAUUSD OR inflation OR Federal Reserve OR bullion market"
            }
            NewsCategory::Silver => "silver price India OR XAG OR silver demand OR silver market",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Kashmir => "kashmir",
            NewsCategory::India => "india",
            NewsCategory::Global => "global",
            NewsCategory::Silver => "silver",
        }
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire envelope for `GET /api/news`; also the cached value per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPayload {
    pub ok: bool,
    pub category: NewsCategory,
    pub updated_at: DateTime<Utc>,
    pub articles: Vec<NewsArticle>,
}
