use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw values resolved from the upstream feeds, before any retail markup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotSnapshot {
    pub gold_usd_oz: f64,
    pub silver_usd_oz: f64,
    pub usd_to_inr: f64,
}

/// The published price payload for one freshness window. Replaced wholesale
/// on every successful recomputation; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub updated_at: DateTime<Utc>,
    pub premium_pct: f64,
    pub gold: GoldQuote,
    pub silver: SilverQuote,
    pub fx: FxQuote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldQuote {
    pub usd_per_ounce24: f64,
    pub inr_per_gram24: f64,
    pub inr_per_gram22: f64,
    pub inr_per_gram18: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SilverQuote {
    pub usd_per_ounce: f64,
    pub inr_per_gram: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxQuote {
    pub usd_to_inr: f64,
}

/// Wire envelope for `GET /api/live`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub quote: Quote,
}
