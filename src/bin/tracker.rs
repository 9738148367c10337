use chrono::Local;
use tracing::{info, warn};

use goldwise_backend::logging::{init_logging, LoggingConfig};
use goldwise_backend::models::{LiveResponse, Quote};
use goldwise_backend::tracker::{JsonFileStore, Tracker};

/// Log the classifier outputs roughly once a minute at the default cadence.
const REPORT_EVERY_TICKS: u64 = 12;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging(LoggingConfig::from_env());

    let base_url =
        std::env::var("GOLDWISE_URL").unwrap_or_else(|_| "http://localhost:5050".to_string());
    let data_dir =
        std::env::var("GOLDWISE_DATA_DIR").unwrap_or_else(|_| ".goldwise".to_string());
    let poll_ms: u64 = std::env::var("GOLDWISE_POLL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5000);

    let repo = JsonFileStore::new(&data_dir)?;
    let mut tracker = Tracker::load(repo, Local::now().date_naive());

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()?;

    info!("🚀 Tracker polling {} every {}ms (state in {})", base_url, poll_ms, data_dir);

    let mut interval = tokio::time::interval(std::time::Duration::from_millis(poll_ms));
    let mut tick: u64 = 0;

    loop {
        interval.tick().await;
        tick += 1;

        let quote = match fetch_live(&client, &base_url).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!("Live update failed: {}", e);
                continue;
            }
        };

        let now = Local::now();
        tracker.record_sample(
            now.format("%H:%M:%S").to_string(),
            quote.gold.inr_per_gram24,
            quote.silver.inr_per_gram,
            now.date_naive(),
        );

        info!(
            "Gold ₹{}/g (24K), silver ₹{}/g",
            quote.gold.inr_per_gram24, quote.silver.inr_per_gram
        );

        if tick % REPORT_EVERY_TICKS == 1 {
            let mood = tracker.market_mood();
            info!(
                "Market mood: {} (confidence {}, gold {}, silver {}, volatility {})",
                mood.signal, mood.confidence, mood.gold_trend, mood.silver_trend, mood.volatility
            );

            let window = tracker.buy_window();
            info!("Buy window: {} — {} (risk {})", window.badge, window.title, window.risk);
        }
    }
}

async fn fetch_live(client: &reqwest::Client, base_url: &str) -> anyhow::Result<Quote> {
    let resp = client.get(format!("{}/api/live", base_url)).send().await?;

    if !resp.status().is_success() {
        anyhow::bail!("live endpoint returned {}", resp.status());
    }

    let body = resp.json::<LiveResponse>().await?;
    if !body.ok {
        anyhow::bail!("live endpoint reported failure");
    }
    Ok(body.quote)
}
