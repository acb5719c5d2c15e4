// Wind service - One fetch cycle from history to reveal
use crate::application::history_repository::HistoryRepository;
use crate::application::renderer::{FrameContext, NoDataReason};
use crate::application::resampler::{self, Resampler};
use crate::application::reveal_scheduler::RevealScheduler;
use crate::application::window_builder::{build_window, WindSeries};
use crate::domain::scale::{ScaleMode, ScaleState};
use crate::domain::telemetry::{MinuteKey, Sample};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Entity ids of the three inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesIds {
    pub wind: String,
    pub gust: String,
    pub direction: String,
}

impl SeriesIds {
    fn to_vec(&self) -> Vec<String> {
        vec![self.wind.clone(), self.gust.clone(), self.direction.clone()]
    }
}

#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub minutes: usize,
    pub graph_height: f64,
    pub scale_mode: ScaleMode,
    pub plausible_speed_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A window was built and handed to the reveal scheduler.
    Revealed { generation: u64 },
    /// The source answered with no samples for any series; a zero window was revealed.
    NoData { generation: u64 },
    FetchFailed,
}

pub struct WindService {
    repository: Arc<dyn HistoryRepository>,
    reveal: Arc<RevealScheduler>,
    series: SeriesIds,
    settings: WindowSettings,
}

impl WindService {
    pub fn new(
        repository: Arc<dyn HistoryRepository>,
        reveal: Arc<RevealScheduler>,
        series: SeriesIds,
        settings: WindowSettings,
    ) -> Self {
        Self {
            repository,
            reveal,
            series,
            settings,
        }
    }

    pub fn reveal_scheduler(&self) -> &Arc<RevealScheduler> {
        &self.reveal
    }

    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleOutcome {
        let end_minute = MinuteKey::from_datetime(now);
        let start = end_minute
            .minus(self.settings.minutes.saturating_sub(1) as i64)
            .start();

        let ids = self.series.to_vec();
        let mut history = match self.repository.fetch_history(&ids, start, now).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Error fetching wind history: {:#}", e);
                // Keep a slow reveal from painting over the no-data state
                self.reveal.no_data(NoDataReason::FetchFailed, true);
                return CycleOutcome::FetchFailed;
            }
        };

        let wind = take_series(&mut history, &self.series.wind);
        let gust = take_series(&mut history, &self.series.gust);
        let direction = take_series(&mut history, &self.series.direction);
        let raw_empty = wind.is_empty() && gust.is_empty() && direction.is_empty();

        tracing::debug!(
            "Fetched {} wind, {} gust, {} direction samples since {}",
            wind.len(),
            gust.len(),
            direction.len(),
            start
        );

        let speed = Resampler::speed(self.settings.plausible_speed_max);
        let series = WindSeries {
            wind: speed.resample(&wind),
            gust: speed.resample(&gust),
            direction: Resampler::direction().resample(&direction),
        };
        let heading = resampler::latest(&series.direction).map(|p| {
            tracing::debug!("Heading {:.0} deg from minute {}", p.value, p.minute.start());
            p.value
        });

        let built = build_window(&series, end_minute, self.settings.minutes);
        let scale = ScaleState::compute(
            self.settings.scale_mode,
            built.max_gust,
            self.settings.graph_height,
        );

        if raw_empty {
            tracing::info!("No wind samples in the last {} minutes", self.settings.minutes);
            self.reveal.no_data(NoDataReason::Empty, false);
        }

        let context = FrameContext {
            scale,
            last_updated: now,
            heading,
            data_available: !raw_empty,
        };
        let generation = self.reveal.handle(built.window, context);

        if raw_empty {
            CycleOutcome::NoData { generation }
        } else {
            CycleOutcome::Revealed { generation }
        }
    }
}

fn take_series(history: &mut HashMap<String, Vec<Sample>>, id: &str) -> Vec<Sample> {
    history.remove(id).unwrap_or_default()
}
