use std::collections::VecDeque;

/// One polled price point feeding the chart series and the classifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    /// Display timestamp, e.g. "14:05:09".
    pub label: String,
    pub gold_per_gram: f64,
    pub silver_per_gram: f64,
}

pub const MAX_POINTS: usize = 120;

/// Bounded FIFO sequence of recent samples. In-memory only: every session
/// starts empty.
#[derive(Debug, Default)]
pub struct PriceSeries {
    samples: VecDeque<PriceSample>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: PriceSample) {
        self.samples.push_back(sample);
        if self.samples.len() > MAX_POINTS {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    pub fn last_gold(&self) -> Option<f64> {
        self.samples.back().map(|s| s.gold_per_gram)
    }

    pub fn last_silver(&self) -> Option<f64> {
        self.samples.back().map(|s| s.silver_per_gram)
    }

    pub fn gold_values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.gold_per_gram).collect()
    }

    pub fn silver_values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.silver_per_gram).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(gold: f64) -> PriceSample {
        PriceSample { label: "10:00:00".into(), gold_per_gram: gold, silver_per_gram: 90.0 }
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut series = PriceSeries::new();
        for i in 0..(MAX_POINTS + 5) {
            series.push(sample(i as f64));
        }

        assert_eq!(series.len(), MAX_POINTS);
        assert_eq!(series.gold_values()[0], 5.0);
        assert_eq!(series.last_gold(), Some((MAX_POINTS + 4) as f64));
    }

    #[test]
    fn starts_empty() {
        let series = PriceSeries::new();
        assert!(series.is_empty());
        assert_eq!(series.last_gold(), None);
    }
}
