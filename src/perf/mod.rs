//! Derives return and risk from closing prices.
//!
//! Two derivations are offered. [calculate_return_and_risk] reduces each whole series to an
//! expected return and a risk figure. [return_risk_over_time] keeps the date index and produces
//! the cumulative return path alongside a trailing-window risk, this needs the per-step product
//! and a sliding window so it is not built from the whole-series summary.
use std::collections::BTreeMap;

use derive_more::{Display, Error};
use log::debug;

use crate::clock::DateTime;
use crate::input::prices::{PriceHistory, PriceSeries};

pub const DEFAULT_ROLLING_WINDOW: usize = 5;

//Two returns are needed for a sample standard deviation
pub const MIN_OBSERVATIONS: usize = 3;

#[derive(Debug, Display, Error, PartialEq)]
pub enum PerfError {
    #[display("{symbol} has {observations} prices, at least 3 are required")]
    InsufficientData { symbol: String, observations: usize },
    #[display("{symbol} has an unusable price {price} at position {position}")]
    InvalidPrice {
        symbol: String,
        position: usize,
        price: f64,
    },
    #[display("rolling window of {window} is too small, at least 2 is required")]
    InvalidWindow { window: usize },
}

/// Summary of one instrument: mean and sample standard deviation of the daily returns together
/// with the returns themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskReturn {
    pub expected_return: f64,
    pub risk: f64,
    pub returns: Vec<f64>,
}

/// Cumulative return and rolling risk aligned to the dates of the return series, so the first
/// price date is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnRiskOverTime {
    pub dates: Vec<DateTime>,
    pub cumulative: Vec<f64>,
    pub rolling_risk: Vec<Option<f64>>,
}

/// Plain numeric reductions over ordered prices and returns.
pub struct ReturnRiskCalculator;

impl ReturnRiskCalculator {
    /// Fractional change between consecutive prices. Returns the position of the first price that
    /// cannot be divided by.
    pub fn returns(values: &[f64]) -> Result<Vec<f64>, (usize, f64)> {
        let mut res: Vec<f64> = Vec::with_capacity(values.len().saturating_sub(1));
        for (pos, window) in values.windows(2).enumerate() {
            let (prev, curr) = (window[0], window[1]);
            if !prev.is_finite() || prev <= 0.0 {
                return Err((pos, prev));
            }
            if !curr.is_finite() {
                return Err((pos + 1, curr));
            }
            res.push((curr - prev) / prev);
        }
        Ok(res)
    }

    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Unbiased estimator, divides by n - 1.
    pub fn sample_std(values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        let mean = Self::mean(values)?;
        let sum_of_diff = values
            .iter()
            .map(|ret| ret - mean)
            .map(|diff| diff * diff)
            .sum::<f64>();
        Some((sum_of_diff / (values.len() - 1) as f64).sqrt())
    }

    pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
        let mut growth = 1.0;
        returns
            .iter()
            .map(|ret| {
                growth *= 1.0 + ret;
                growth - 1.0
            })
            .collect()
    }

    /// Sample standard deviation over the trailing `window` values ending at each position. The
    /// first `window - 1` positions have no full window and are None.
    pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|end| {
                if window < 2 || end + 1 < window {
                    None
                } else {
                    Self::sample_std(&values[end + 1 - window..=end])
                }
            })
            .collect()
    }
}

fn series_returns(symbol: &str, series: &PriceSeries) -> Result<Vec<f64>, PerfError> {
    if series.len() < MIN_OBSERVATIONS {
        return Err(PerfError::InsufficientData {
            symbol: symbol.to_string(),
            observations: series.len(),
        });
    }
    ReturnRiskCalculator::returns(series.prices()).map_err(|(position, price)| {
        PerfError::InvalidPrice {
            symbol: symbol.to_string(),
            position,
            price,
        }
    })
}

pub fn risk_return(symbol: &str, series: &PriceSeries) -> Result<RiskReturn, PerfError> {
    let returns = series_returns(symbol, series)?;
    //Both are defined once the length check has passed
    let insufficient = || PerfError::InsufficientData {
        symbol: symbol.to_string(),
        observations: series.len(),
    };
    let expected_return = ReturnRiskCalculator::mean(&returns).ok_or_else(insufficient)?;
    let risk = ReturnRiskCalculator::sample_std(&returns).ok_or_else(insufficient)?;
    debug!("{symbol}: expected return {expected_return:.6}, risk {risk:.6}");
    Ok(RiskReturn {
        expected_return,
        risk,
        returns,
    })
}

/// Fails on the first degenerate series rather than dropping it, callers that want a partial
/// result should filter the history first.
pub fn calculate_return_and_risk(
    history: &PriceHistory,
) -> Result<BTreeMap<String, RiskReturn>, PerfError> {
    history
        .iter()
        .map(|(symbol, series)| Ok((symbol.clone(), risk_return(symbol, series)?)))
        .collect()
}

pub fn return_risk_over_time(
    symbol: &str,
    series: &PriceSeries,
    window: usize,
) -> Result<ReturnRiskOverTime, PerfError> {
    if window < 2 {
        return Err(PerfError::InvalidWindow { window });
    }
    let returns = series_returns(symbol, series)?;
    Ok(ReturnRiskOverTime {
        dates: series.dates()[1..].to_vec(),
        cumulative: ReturnRiskCalculator::cumulative_returns(&returns),
        rolling_risk: ReturnRiskCalculator::rolling_std(&returns, window),
    })
}
