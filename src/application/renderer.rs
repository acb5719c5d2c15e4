// Renderer trait - Consumer of window snapshots
use crate::domain::scale::{BarHeights, ScaleState};
use crate::domain::window::Window;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-cycle values that accompany every snapshot of a reveal sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameContext {
    pub scale: ScaleState,
    pub last_updated: DateTime<Utc>,
    /// Latest averaged direction in the fetched range, for the heading arrow.
    pub heading: Option<f64>,
    /// False when the fetch succeeded but every series was empty.
    pub data_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub window: Window,
    pub bars: Vec<BarHeights>,
    #[serde(flatten)]
    pub context: FrameContext,
}

impl RenderFrame {
    pub fn new(window: Window, context: FrameContext) -> Self {
        let bars = window
            .slots()
            .iter()
            .map(|slot| context.scale.bar_heights(slot))
            .collect();
        Self {
            window,
            bars,
            context,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    /// The source answered but none of the series had samples in range.
    Empty,
    /// The source call failed.
    FetchFailed,
}

pub trait Renderer: Send + Sync {
    fn render(&self, frame: RenderFrame);

    fn no_data(&self, reason: NoDataReason);
}
