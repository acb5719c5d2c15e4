use crate::application::reveal_scheduler::DEFAULT_STEP_DELAY;
use crate::application::wind_service::{SeriesIds, WindowSettings};
use crate::domain::scale::ScaleMode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Longest window the card will draw: one day of minute slots.
pub const MAX_MINUTES: usize = 24 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("wind_speed, wind_gust and wind_dir must be set (missing {0})")]
    MissingSeries(&'static str),
    #[error("minutes must be greater than zero")]
    ZeroMinutes,
    #[error("minutes must be at most 1440 (got {0})")]
    TooManyMinutes(usize),
    #[error("{0} must be a positive number")]
    NotPositive(&'static str),
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub home_assistant: HomeAssistantSettings,
    pub card: CardConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HomeAssistantSettings {
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CardConfig {
    #[serde(default = "default_minutes")]
    pub minutes: usize,
    #[serde(default = "default_graph_height")]
    pub graph_height: f64,
    #[serde(default = "default_autoscale")]
    pub autoscale: bool,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_plausible_speed_max")]
    pub plausible_speed_max: f64,
    #[serde(default = "default_reveal_step_ms")]
    pub reveal_step_ms: u64,
    pub wind_speed: Option<String>,
    pub wind_gust: Option<String>,
    pub wind_dir: Option<String>,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_minutes() -> usize {
    30
}

fn default_graph_height() -> f64 {
    100.0
}

fn default_autoscale() -> bool {
    true
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_plausible_speed_max() -> f64 {
    200.0
}

fn default_reveal_step_ms() -> u64 {
    DEFAULT_STEP_DELAY.as_millis() as u64
}

impl CardConfig {
    /// Check the card settings; nothing is fetched until this passes.
    pub fn validate(&self) -> Result<(SeriesIds, WindowSettings), ConfigError> {
        let series = SeriesIds {
            wind: required(&self.wind_speed, "wind_speed")?,
            gust: required(&self.wind_gust, "wind_gust")?,
            direction: required(&self.wind_dir, "wind_dir")?,
        };
        if self.minutes == 0 {
            return Err(ConfigError::ZeroMinutes);
        }
        if self.minutes > MAX_MINUTES {
            return Err(ConfigError::TooManyMinutes(self.minutes));
        }
        positive(self.graph_height, "graph_height")?;
        positive(self.plausible_speed_max, "plausible_speed_max")?;
        if !self.autoscale {
            positive(self.multiplier, "multiplier")?;
        }

        let settings = WindowSettings {
            minutes: self.minutes,
            graph_height: self.graph_height,
            scale_mode: ScaleMode::from_settings(self.autoscale, self.multiplier),
            plausible_speed_max: self.plausible_speed_max,
        };
        Ok((series, settings))
    }

    pub fn reveal_step(&self) -> Duration {
        Duration::from_millis(self.reveal_step_ms)
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ConfigError::MissingSeries(name)),
    }
}

fn positive(value: f64, name: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive(name))
    }
}

/// Load `config/wind` overlaid with `WIND__SECTION__KEY` environment variables.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/wind").required(false))
        .add_source(
            config::Environment::with_prefix("WIND")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
