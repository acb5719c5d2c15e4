// Repository trait for sensor history access
use crate::domain::telemetry::Sample;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Fetch every sample recorded for `series_ids` between `start` and `end`.
    ///
    /// A series without samples in range maps to an empty list (or is absent);
    /// that is not an error for the other series.
    async fn fetch_history(
        &self,
        series_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<String, Vec<Sample>>>;
}
