//! Sequences a single run: fetch prices, summarise them, render the three charts.
use anyhow::Result;
use log::{info, warn};

use crate::chart::{
    render_return_risk_over_time, render_risk_return, render_weight_allocation, ChartSink,
    RETURN_RISK_OVER_TIME, RISK_RETURN, WEIGHT_ALLOCATION,
};
use crate::clock::DateWindow;
use crate::config::{Config, ConfigError};
use crate::perf::{calculate_return_and_risk, MIN_OBSERVATIONS};
use crate::source::PriceSource;
use crate::weights::normalize;

pub const NO_DATA_MESSAGE: &str =
    "No data found. Please check the instrument symbols or the date range.";

#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    /// Charts were rendered using the listed instruments, others were dropped.
    Rendered { instruments: Vec<String> },
    /// Nothing usable came back from the source, no chart was rendered.
    NoData,
}

/// Runs over the configured lookback ending now.
pub fn run(
    config: &Config,
    source: &impl PriceSource,
    sink: &mut impl ChartSink,
) -> Result<RunOutcome> {
    config.validate()?;
    let window = DateWindow::ending_now(config.window_days).ok_or(ConfigError::InvalidWindow {
        days: config.window_days,
    })?;
    run_over(config, &window, source, sink)
}

pub fn run_over(
    config: &Config,
    window: &DateWindow,
    source: &impl PriceSource,
    sink: &mut impl ChartSink,
) -> Result<RunOutcome> {
    config.validate()?;
    let weights = normalize(&config.weights)?;

    println!("Fetching data for instruments: {:?}", config.instruments);
    let mut history = source.fetch(&config.instruments, window)?;

    if history.has_no_prices() {
        println!("{NO_DATA_MESSAGE}");
        return Ok(RunOutcome::NoData);
    }

    for symbol in &config.instruments {
        if history.get(symbol).is_none() {
            warn!("{symbol}: no data returned, dropping");
        }
    }
    for symbol in history.drop_shorter_than(MIN_OBSERVATIONS) {
        warn!("{symbol}: fewer than {MIN_OBSERVATIONS} prices in window, dropping");
    }
    if history.is_empty() {
        println!("{NO_DATA_MESSAGE}");
        return Ok(RunOutcome::NoData);
    }

    let summaries = calculate_return_and_risk(&history)?;
    for (symbol, summary) in &summaries {
        info!(
            "{symbol}: expected return {:.6}, risk {:.6} over {} returns",
            summary.expected_return,
            summary.risk,
            summary.returns.len()
        );
    }
    sink.show(RISK_RETURN, render_risk_return(&summaries))?;

    sink.show(
        WEIGHT_ALLOCATION,
        render_weight_allocation(&config.instruments, &weights),
    )?;

    sink.show(
        RETURN_RISK_OVER_TIME,
        render_return_risk_over_time(&history, config.rolling_window)?,
    )?;

    Ok(RunOutcome::Rendered {
        instruments: history.symbols(),
    })
}
