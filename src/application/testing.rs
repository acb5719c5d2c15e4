// Test doubles shared by the application layer tests
use crate::application::history_repository::HistoryRepository;
use crate::application::renderer::{FrameContext, NoDataReason, RenderFrame, Renderer};
use crate::application::reveal_scheduler::lock;
use crate::domain::scale::{ScaleMode, ScaleState};
use crate::domain::telemetry::Sample;
use crate::domain::window::{Window, WindowSlot};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Frame(RenderFrame),
    NoData(NoDataReason),
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<RenderEvent> {
        lock(&self.events).clone()
    }

    pub fn frames(&self) -> Vec<RenderFrame> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RenderEvent::Frame(frame) => Some(frame),
                RenderEvent::NoData(_) => None,
            })
            .collect()
    }

    pub fn windows(&self) -> Vec<Window> {
        self.frames().into_iter().map(|f| f.window).collect()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, frame: RenderFrame) {
        lock(&self.events).push(RenderEvent::Frame(frame));
    }

    fn no_data(&self, reason: NoDataReason) {
        lock(&self.events).push(RenderEvent::NoData(reason));
    }
}

/// Window whose slots have `wind == gust == value` and direction 0.
pub fn window_of(values: &[f64]) -> Window {
    Window::from_slots(
        values
            .iter()
            .map(|v| WindowSlot::clamped(*v, *v, 0.0))
            .collect(),
    )
}

pub fn context() -> FrameContext {
    FrameContext {
        scale: ScaleState::compute(ScaleMode::Auto, 10.0, 100.0),
        last_updated: at(12, 0, 0),
        heading: None,
        data_available: true,
    }
}

pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, second).unwrap()
}

/// Repository serving canned responses, counting calls.
#[derive(Default)]
pub struct FakeRepository {
    samples: Mutex<HashMap<String, Vec<Sample>>>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
    last_range: Mutex<Option<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl FakeRepository {
    pub fn with_samples(samples: Vec<Sample>) -> Self {
        let repo = Self::default();
        {
            let mut by_series = lock(&repo.samples);
            for sample in samples {
                by_series.entry(sample.series_id.clone()).or_default().push(sample);
            }
        }
        repo
    }

    /// Fail the next `count` calls.
    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        *lock(&self.last_range)
    }
}

#[async_trait]
impl HistoryRepository for FakeRepository {
    async fn fetch_history(
        &self,
        series_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<String, Vec<Sample>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_range) = Some((start, end));

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            anyhow::bail!("history source unreachable");
        }

        let by_series = lock(&self.samples);
        Ok(series_ids
            .iter()
            .filter_map(|id| by_series.get(id).map(|s| (id.clone(), s.clone())))
            .collect())
    }
}
