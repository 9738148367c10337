use chrono::{DateTime, Utc};

use crate::models::{FxQuote, GoldQuote, Quote, SilverQuote, SpotSnapshot};

pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1034768;

/// Round to 2 decimal places, half away from zero.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Pure quote computation: no hidden state, bit-for-bit reproducible for
/// identical inputs.
///
/// The retail premium is applied multiplicatively to the 24K gold gram price
/// only; silver and the raw USD figures are published unmarked. 22K and 18K
/// are exact fractions of the marked-up 24K price.
pub fn compute_quote(spot: SpotSnapshot, premium_pct: f64, updated_at: DateTime<Utc>) -> Quote {
    let inr_per_ounce_gold = spot.gold_usd_oz * spot.usd_to_inr;
    let inr_per_ounce_silver = spot.silver_usd_oz * spot.usd_to_inr;

    let gold_spot_gram24 = inr_per_ounce_gold / GRAMS_PER_TROY_OUNCE;
    let silver_spot_gram = inr_per_ounce_silver / GRAMS_PER_TROY_OUNCE;

    let factor = 1.0 + premium_pct / 100.0;

    let gold_inr_gram24 = gold_spot_gram24 * factor;
    let gold_inr_gram22 = gold_inr_gram24 * (22.0 / 24.0);
    let gold_inr_gram18 = gold_inr_gram24 * (18.0 / 24.0);

    Quote {
        updated_at,
        premium_pct,
        gold: GoldQuote {
            usd_per_ounce24: round2(spot.gold_usd_oz),
            inr_per_gram24: round2(gold_inr_gram24),
            inr_per_gram22: round2(gold_inr_gram22),
            inr_per_gram18: round2(gold_inr_gram18),
        },
        silver: SilverQuote {
            usd_per_ounce: round2(spot.silver_usd_oz),
            inr_per_gram: round2(silver_spot_gram),
        },
        fx: FxQuote { usd_to_inr: round2(spot.usd_to_inr) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SpotSnapshot {
        SpotSnapshot { gold_usd_oz: 2400.0, silver_usd_oz: 29.0, usd_to_inr: 83.5 }
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 2.125 is exactly representable, so the half really is a half.
        assert_eq!(round2(2.125), 2.13);
        assert_eq!(round2(-2.125), -2.13);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(2.346), 2.35);
        assert_eq!(round2(86.5), 86.5);
    }

    #[test]
    fn purity_fractions_hold_after_rounding() {
        for premium in [0.0, 2.5, 4.8, 7.33, 12.0] {
            let quote = compute_quote(snapshot(), premium, Utc::now());
            let g24 = quote.gold.inr_per_gram24;
            assert!((quote.gold.inr_per_gram22 - g24 * 22.0 / 24.0).abs() < 0.01);
            assert!((quote.gold.inr_per_gram18 - g24 * 18.0 / 24.0).abs() < 0.01);
        }
    }

    #[test]
    fn premium_marks_up_gold_grams_only() {
        let flat = compute_quote(snapshot(), 0.0, Utc::now());
        let marked = compute_quote(snapshot(), 10.0, Utc::now());

        assert!(marked.gold.inr_per_gram24 > flat.gold.inr_per_gram24);
        assert_eq!(marked.gold.usd_per_ounce24, flat.gold.usd_per_ounce24);
        assert_eq!(marked.silver, flat.silver);
        assert_eq!(marked.fx, flat.fx);

        let expected = flat.gold.inr_per_gram24 * 1.10;
        assert!((marked.gold.inr_per_gram24 - expected).abs() < 0.02);
    }

    #[test]
    fn computation_is_deterministic() {
        let at = Utc::now();
        assert_eq!(compute_quote(snapshot(), 4.8, at), compute_quote(snapshot(), 4.8, at));
    }

    #[test]
    fn all_monetary_fields_are_non_negative_and_finite() {
        let quote = compute_quote(snapshot(), 12.0, Utc::now());
        for value in [
            quote.gold.usd_per_ounce24,
            quote.gold.inr_per_gram24,
            quote.gold.inr_per_gram22,
            quote.gold.inr_per_gram18,
            quote.silver.usd_per_ounce,
            quote.silver.inr_per_gram,
            quote.fx.usd_to_inr,
        ] {
            assert!(value.is_finite() && value >= 0.0);
        }
    }
}
