// Resampler - Buckets raw samples into per-minute averages
use crate::domain::circular_stats::{circular_mean, linear_mean};
use crate::domain::telemetry::{AggregatedPoint, MinuteKey, Sample};
use std::collections::BTreeMap;

pub type MinuteSeries = BTreeMap<MinuteKey, AggregatedPoint>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Speeds: arithmetic mean per minute.
    Linear,
    /// Angles in degrees: vector mean per minute.
    Circular,
}

/// Inclusive range of plausible values for a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const DIRECTION: ValueRange = ValueRange { min: 0.0, max: 360.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn speed(max: f64) -> Self {
        Self::new(0.0, max)
    }

    /// Non-finite values are never accepted.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    kind: SeriesKind,
    range: ValueRange,
}

impl Resampler {
    pub fn new(kind: SeriesKind, range: ValueRange) -> Self {
        Self { kind, range }
    }

    pub fn speed(max: f64) -> Self {
        Self::new(SeriesKind::Linear, ValueRange::speed(max))
    }

    pub fn direction() -> Self {
        Self::new(SeriesKind::Circular, ValueRange::DIRECTION)
    }

    /// Average the valid samples of each minute. Minutes without a valid
    /// sample do not appear in the result. Input order does not matter.
    pub fn resample(&self, samples: &[Sample]) -> MinuteSeries {
        let mut buckets: BTreeMap<MinuteKey, Vec<f64>> = BTreeMap::new();
        let mut rejected = 0usize;

        for sample in samples {
            if !self.range.accepts(sample.value) {
                rejected += 1;
                continue;
            }
            buckets
                .entry(MinuteKey::from_datetime(sample.timestamp))
                .or_default()
                .push(sample.value);
        }

        if rejected > 0 {
            tracing::debug!(
                "Dropped {} of {} {} samples outside {:?}",
                rejected,
                samples.len(),
                samples.first().map(|s| s.series_id.as_str()).unwrap_or_default(),
                self.range
            );
        }

        buckets
            .into_iter()
            .map(|(minute, mut values)| {
                // Sum order must not depend on fetch order
                values.sort_by(f64::total_cmp);
                let value = match self.kind {
                    SeriesKind::Linear => linear_mean(&values),
                    SeriesKind::Circular => circular_mean(&values),
                };
                (minute, AggregatedPoint::new(minute, value))
            })
            .collect()
    }
}

/// Newest aggregated point of a series.
pub fn latest(series: &MinuteSeries) -> Option<AggregatedPoint> {
    series.values().next_back().copied()
}
