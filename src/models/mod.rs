mod news;
mod quote;

pub use news::{NewsArticle, NewsCategory, NewsPayload};
pub use quote::{FxQuote, GoldQuote, LiveResponse, Quote, SilverQuote, SpotSnapshot};
