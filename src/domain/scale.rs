// Grid levels and bar heights for the bar chart
use crate::domain::window::WindowSlot;
use serde::Serialize;

/// Spacing between horizontal grid lines, in speed units.
pub const GRID_STEP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScaleMode {
    /// Heights are fractions of the largest gust in the window.
    Auto,
    /// Heights are `value * multiplier` graph units.
    Fixed { multiplier: f64 },
}

impl ScaleMode {
    pub fn from_settings(autoscale: bool, multiplier: f64) -> Self {
        if autoscale {
            ScaleMode::Auto
        } else {
            ScaleMode::Fixed { multiplier }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleState {
    #[serde(flatten)]
    pub mode: ScaleMode,
    pub max_gust: f64,
    /// Divisor used in auto mode, `max(max_gust, 1)`. Unused in fixed mode.
    pub scale: f64,
    /// Axis ceiling in graph units.
    pub graph_height: f64,
    /// Fractions of `scale` in auto mode, graph units in fixed mode.
    pub grid_levels: Vec<f64>,
}

/// Stacked bar heights for one slot. `gust_excess` sits on top of `wind`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarHeights {
    pub wind: f64,
    pub gust_excess: f64,
}

impl ScaleState {
    pub fn compute(mode: ScaleMode, max_gust: f64, graph_height: f64) -> Self {
        match mode {
            ScaleMode::Auto => {
                let scale = max_gust.max(1.0);
                let grid_levels = grid_multiples(scale)
                    .map(|level| level / scale)
                    .collect();
                Self {
                    mode,
                    max_gust,
                    scale,
                    graph_height,
                    grid_levels,
                }
            }
            ScaleMode::Fixed { multiplier } => {
                let grid_levels = if multiplier > 0.0 {
                    grid_multiples(graph_height / multiplier)
                        .map(|level| level * multiplier)
                        .collect()
                } else {
                    Vec::new()
                };
                Self {
                    mode,
                    max_gust,
                    scale: 1.0,
                    graph_height,
                    grid_levels,
                }
            }
        }
    }

    /// Height of a value: a fraction of `scale` in auto mode, graph units in fixed mode.
    pub fn height(&self, value: f64) -> f64 {
        match self.mode {
            ScaleMode::Auto => value / self.scale,
            ScaleMode::Fixed { multiplier } => value * multiplier,
        }
    }

    pub fn bar_heights(&self, slot: &WindowSlot) -> BarHeights {
        BarHeights {
            wind: self.height(slot.wind),
            gust_excess: self.height((slot.gust - slot.wind).max(0.0)),
        }
    }
}

/// `GRID_STEP, 2 * GRID_STEP, ...` up to and including `floor(limit / GRID_STEP) * GRID_STEP`.
fn grid_multiples(limit: f64) -> impl Iterator<Item = f64> {
    let count = (limit / GRID_STEP).floor().max(0.0) as usize;
    (1..=count).map(|n| n as f64 * GRID_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_scale_grid_levels() {
        let scale = ScaleState::compute(ScaleMode::Auto, 20.0, 100.0);
        assert_eq!(scale.scale, 20.0);
        assert_eq!(scale.grid_levels, vec![0.25, 0.5, 0.75, 1.0]);

        let scale = ScaleState::compute(ScaleMode::Auto, 12.0, 100.0);
        assert_eq!(scale.grid_levels.len(), 2);
        assert!((scale.grid_levels[1] - 10.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_auto_scale_calm_window() {
        let scale = ScaleState::compute(ScaleMode::Auto, 0.0, 100.0);
        assert_eq!(scale.scale, 1.0);
        assert!(scale.grid_levels.is_empty());
        assert_eq!(scale.height(0.0), 0.0);
    }

    #[test]
    fn test_fixed_scale_uses_multiplier() {
        let scale = ScaleState::compute(ScaleMode::Fixed { multiplier: 2.0 }, 40.0, 30.0);
        assert_eq!(scale.grid_levels, vec![10.0, 20.0, 30.0]);

        let bars = scale.bar_heights(&WindowSlot::clamped(10.0, 14.0, 0.0));
        assert_eq!(bars.wind, 20.0);
        assert_eq!(bars.gust_excess, 8.0);
    }

    #[test]
    fn test_gust_below_wind_clamps_excess() {
        let scale = ScaleState::compute(ScaleMode::Auto, 10.0, 100.0);
        let bars = scale.bar_heights(&WindowSlot::clamped(10.0, 8.0, 0.0));
        assert_eq!(bars.wind, 1.0);
        assert_eq!(bars.gust_excess, 0.0);
    }

    #[test]
    fn test_mode_from_settings() {
        assert_eq!(ScaleMode::from_settings(true, 3.0), ScaleMode::Auto);
        assert_eq!(
            ScaleMode::from_settings(false, 3.0),
            ScaleMode::Fixed { multiplier: 3.0 }
        );
    }
}
