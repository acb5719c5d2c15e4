// Home Assistant history repository implementation
use crate::application::history_repository::HistoryRepository;
use crate::domain::telemetry::Sample;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct HomeAssistantRepository {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

/// One entry of `/api/history/period`. With `minimal_response` only the first
/// entry of each entity list carries `entity_id`.
#[derive(Debug, Deserialize)]
struct HistoryState {
    #[serde(default)]
    entity_id: Option<String>,
    state: String,
    #[serde(default)]
    last_changed: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
}

impl HomeAssistantRepository {
    pub fn new(base_url: String, token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn build_history_url(
        &self,
        series_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> String {
        let start = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = end.to_rfc3339_opts(SecondsFormat::Secs, true);
        format!(
            "{}/api/history/period/{}?filter_entity_id={}&end_time={}&minimal_response&no_attributes",
            self.base_url,
            urlencoding::encode(&start),
            urlencoding::encode(&series_ids.join(",")),
            urlencoding::encode(&end),
        )
    }
}

#[async_trait]
impl HistoryRepository for HomeAssistantRepository {
    async fn fetch_history(
        &self,
        series_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<String, Vec<Sample>>> {
        let url = self.build_history_url(series_ids, start, end);
        tracing::debug!("Requesting history: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to Home Assistant")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Home Assistant history query failed with status {}: {}", status, body);
        }

        let lists = response
            .json::<Vec<Vec<HistoryState>>>()
            .await
            .context("Failed to parse Home Assistant history response")?;

        Ok(samples_by_series(lists))
    }
}

/// Group history entries by entity. Unparsable states become `NaN` so the
/// resampler drops them; entries with unreadable timestamps are skipped.
fn samples_by_series(lists: Vec<Vec<HistoryState>>) -> HashMap<String, Vec<Sample>> {
    let mut by_series: HashMap<String, Vec<Sample>> = HashMap::new();

    for list in lists {
        let Some(entity_id) = list.first().and_then(|s| s.entity_id.clone()) else {
            tracing::warn!("Skipping history list without entity_id ({} entries)", list.len());
            continue;
        };

        let samples = by_series.entry(entity_id.clone()).or_default();
        for entry in list {
            let stamp = entry.last_changed.as_deref().or(entry.last_updated.as_deref());
            let Some(timestamp) = stamp.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) else {
                tracing::debug!("Skipping {} entry with bad timestamp {:?}", entity_id, stamp);
                continue;
            };
            let value = entry.state.trim().parse::<f64>().unwrap_or(f64::NAN);
            samples.push(Sample::new(entity_id.clone(), timestamp.with_timezone(&Utc), value));
        }
    }

    by_series
}
