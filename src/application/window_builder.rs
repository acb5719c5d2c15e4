// WindowBuilder - Assembles the fixed-length minute window
use crate::application::resampler::MinuteSeries;
use crate::domain::telemetry::MinuteKey;
use crate::domain::window::{Window, WindowSlot};

/// Per-minute aggregates for the three wind series.
#[derive(Debug, Clone, Default)]
pub struct WindSeries {
    pub wind: MinuteSeries,
    pub gust: MinuteSeries,
    pub direction: MinuteSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltWindow {
    pub window: Window,
    pub max_gust: f64,
}

/// Build `minutes` slots ending at `now`, oldest first.
///
/// Missing wind and direction read as 0. Missing gust reads as that
/// minute's wind. Speeds are clamped after the fallback is resolved.
pub fn build_window(series: &WindSeries, now: MinuteKey, minutes: usize) -> BuiltWindow {
    let mut slots = Vec::with_capacity(minutes);
    let mut max_gust = 0.0_f64;

    for back in (0..minutes as i64).rev() {
        let key = now.minus(back);
        let wind = series.wind.get(&key).map(|p| p.value).unwrap_or(0.0);
        let gust = series.gust.get(&key).map(|p| p.value).unwrap_or(wind);
        let direction = series.direction.get(&key).map(|p| p.value).unwrap_or(0.0);

        let slot = WindowSlot::clamped(wind, gust, direction);
        max_gust = max_gust.max(slot.gust);
        slots.push(slot);
    }

    BuiltWindow {
        window: Window::from_slots(slots),
        max_gust,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::AggregatedPoint;
    use crate::domain::window::MAX_SPEED;

    fn now() -> MinuteKey {
        MinuteKey::from_datetime(
            chrono::DateTime::parse_from_rfc3339("2026-07-01T18:42:17Z")
                .unwrap()
                .into(),
        )
    }

    fn put(series: &mut MinuteSeries, key: MinuteKey, value: f64) {
        series.insert(key, AggregatedPoint::new(key, value));
    }

    #[test]
    fn test_length_is_fixed_when_empty() {
        let built = build_window(&WindSeries::default(), now(), 5);
        assert_eq!(built.window.len(), 5);
        assert!(built.window.slots().iter().all(|s| *s == WindowSlot::default()));
        assert_eq!(built.max_gust, 0.0);
    }

    #[test]
    fn test_gust_falls_back_to_wind() {
        let mut series = WindSeries::default();
        put(&mut series.wind, now(), 12.0);

        let built = build_window(&series, now(), 3);
        assert_eq!(
            built.window.newest(),
            Some(&WindowSlot {
                wind: 12.0,
                gust: 12.0,
                direction: 0.0
            })
        );
        assert_eq!(built.max_gust, 12.0);
    }

    #[test]
    fn test_slots_ordered_oldest_first() {
        let mut series = WindSeries::default();
        put(&mut series.wind, now().minus(2), 1.0);
        put(&mut series.wind, now().minus(1), 2.0);
        put(&mut series.wind, now(), 3.0);
        put(&mut series.gust, now().minus(1), 9.0);
        put(&mut series.direction, now().minus(2), 45.0);
        // outside the window
        put(&mut series.gust, now().minus(3), 50.0);

        let built = build_window(&series, now(), 3);
        let winds: Vec<f64> = built.window.slots().iter().map(|s| s.wind).collect();
        let gusts: Vec<f64> = built.window.slots().iter().map(|s| s.gust).collect();
        assert_eq!(winds, vec![1.0, 2.0, 3.0]);
        assert_eq!(gusts, vec![1.0, 9.0, 3.0]);
        assert_eq!(built.window.slots()[0].direction, 45.0);
        assert_eq!(built.max_gust, 9.0);
    }

    #[test]
    fn test_values_clamped() {
        let mut series = WindSeries::default();
        put(&mut series.wind, now(), 80.0);
        put(&mut series.gust, now(), 95.0);

        let built = build_window(&series, now(), 30);
        for slot in built.window.slots() {
            assert!((0.0..=MAX_SPEED).contains(&slot.wind));
            assert!((0.0..=MAX_SPEED).contains(&slot.gust));
            assert!((0.0..360.0).contains(&slot.direction));
        }
        assert_eq!(built.max_gust, MAX_SPEED);
    }

    #[test]
    fn test_rebuild_is_identical() {
        let mut series = WindSeries::default();
        put(&mut series.wind, now().minus(4), 7.25);
        put(&mut series.direction, now().minus(4), 359.5);

        assert_eq!(build_window(&series, now(), 10), build_window(&series, now(), 10));
    }
}
