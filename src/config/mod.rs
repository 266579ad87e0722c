//! Run configuration. Every field has a default so an empty JSON object, or no file at all, gives
//! the standard three instrument run.
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::perf::DEFAULT_ROLLING_WINDOW;
use crate::source::yahoo::YAHOO_CHART_URL;

//A century of daily closes, far past what the source will serve
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Display, Error, PartialEq)]
pub enum ConfigError {
    #[display("at least one instrument is required")]
    NoInstruments,
    #[display("window of {days} days is outside 1 to 36500")]
    InvalidWindow { days: i64 },
    #[display("rolling window of {window} is too small, at least 2 is required")]
    InvalidRollingWindow { window: usize },
    #[display("{weights} weights given for {instruments} instruments")]
    WeightMismatch { instruments: usize, weights: usize },
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub instruments: Vec<String>,
    /// Lookback in calendar days ending at the time of the run
    pub window_days: i64,
    /// Raw weights, one per instrument, normalized before charting
    pub weights: Vec<f64>,
    pub rolling_window: usize,
    pub output_dir: PathBuf,
    pub source_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instruments: vec!["GOOGL".to_string(), "AAPL".to_string(), "MSFT".to_string()],
            window_days: 30,
            weights: vec![40.0, 35.0, 25.0],
            rolling_window: DEFAULT_ROLLING_WINDOW,
            output_dir: PathBuf::from("charts"),
            source_url: YAHOO_CHART_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)
            .with_context(|| format!("could not read config at {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::NoInstruments);
        }
        if self.window_days <= 0 || self.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidWindow {
                days: self.window_days,
            });
        }
        if self.rolling_window < 2 {
            return Err(ConfigError::InvalidRollingWindow {
                window: self.rolling_window,
            });
        }
        if self.weights.len() != self.instruments.len() {
            return Err(ConfigError::WeightMismatch {
                instruments: self.instruments.len(),
                weights: self.weights.len(),
            });
        }
        Ok(())
    }
}
