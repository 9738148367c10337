//! Short-window trend and volatility classification over the live series,
//! feeding the composite market-mood signal.

pub const TREND_LOOKBACK: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => f.write_str("UP"),
            Trend::Down => f.write_str("DOWN"),
            Trend::Stable => f.write_str("STABLE"),
        }
    }
}

/// Latest sample versus the one six positions back; short series read as
/// stable.
pub fn trend_direction(values: &[f64]) -> Trend {
    if values.len() < TREND_LOOKBACK {
        return Trend::Stable;
    }

    let last = values[values.len() - 1];
    let prev = values[values.len() - TREND_LOOKBACK];

    if last > prev {
        Trend::Up
    } else if last < prev {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Percent change of the latest sample against the one `lookback` positions
/// earlier; 0 on short series or a zero reference.
pub fn pct_change(values: &[f64], lookback: usize) -> f64 {
    if values.len() < lookback + 1 {
        return 0.0;
    }

    let last = values[values.len() - 1];
    let prev = values[values.len() - 1 - lookback];
    if prev == 0.0 || !prev.is_finite() {
        return 0.0;
    }

    (last - prev) / prev * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatilityTier {
    Low,
    Medium,
    High,
}

impl VolatilityTier {
    pub fn score(&self) -> i32 {
        match self {
            VolatilityTier::Low => 35,
            VolatilityTier::Medium => 60,
            VolatilityTier::High => 90,
        }
    }
}

impl std::fmt::Display for VolatilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolatilityTier::Low => f.write_str("LOW"),
            VolatilityTier::Medium => f.write_str("MEDIUM"),
            VolatilityTier::High => f.write_str("HIGH"),
        }
    }
}

pub fn classify_volatility(values: &[f64]) -> VolatilityTier {
    let movement = pct_change(values, TREND_LOOKBACK).abs();
    if movement >= 0.35 {
        VolatilityTier::High
    } else if movement >= 0.18 {
        VolatilityTier::Medium
    } else {
        VolatilityTier::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodSignal {
    Buy,
    Wait,
    Watch,
}

impl std::fmt::Display for MoodSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoodSignal::Buy => f.write_str("BUY"),
            MoodSignal::Wait => f.write_str("WAIT"),
            MoodSignal::Watch => f.write_str("WATCH"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketMood {
    pub signal: MoodSignal,
    pub confidence: i32,
    pub reason: &'static str,
    pub tip: &'static str,
    pub gold_trend: Trend,
    pub silver_trend: Trend,
    pub volatility: VolatilityTier,
}

/// Composite market mood from both metal series. Confidence starts at 55,
/// moves with the gold trend, silver agreement, and volatility, and is
/// clamped to [25, 95].
pub fn build_market_mood(gold: &[f64], silver: &[f64]) -> MarketMood {
    let gold_trend = trend_direction(gold);
    let silver_trend = trend_direction(silver);
    let volatility = classify_volatility(gold);

    let mut confidence: i32 = 55;

    match gold_trend {
        Trend::Up => confidence += 18,
        Trend::Down => confidence += 10,
        Trend::Stable => confidence -= 5,
    }

    if silver.len() > TREND_LOOKBACK && gold_trend != Trend::Stable {
        if silver_trend == gold_trend {
            confidence += 12;
        } else {
            confidence -= 6;
        }
    }

    confidence += ((volatility.score() as f64 - 50.0) * 0.22).floor() as i32;
    confidence = confidence.clamp(25, 95);

    let (signal, reason, tip) = match gold_trend {
        Trend::Up if volatility != VolatilityTier::Low => (
            MoodSignal::Buy,
            "Gold is rising — buying early may help reduce cost.",
            "Split buy: part now + part later.",
        ),
        Trend::Down if volatility != VolatilityTier::Low => (
            MoodSignal::Wait,
            "Gold is falling — waiting may give better price.",
            "If urgent, buy small quantity now.",
        ),
        _ => (
            MoodSignal::Watch,
            "Gold and silver are steady — safe to monitor.",
            "Tip: Jewellery final price = rate + making + GST.",
        ),
    };

    MarketMood { signal, confidence, reason, tip, gold_trend, silver_trend, volatility }
}
