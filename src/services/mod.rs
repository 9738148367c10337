pub mod calibration;
pub mod news_service;
pub mod pricing;
pub mod quote_service;
pub mod rss;
