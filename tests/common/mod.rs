use std::cell::RefCell;

use anyhow::{anyhow, Result};
use rand::thread_rng;
use rand_distr::{Distribution, Normal};

use tiree::clock::{DateTime, DateWindow};
use tiree::input::prices::{PriceHistory, PriceHistoryBuilder};
use tiree::source::PriceSource;

pub const START_DATE: i64 = 1609750800; //Date - 4/1/21 9:00:0000

/// Random walk of closing prices, daily returns drawn from a normal distribution.
pub fn build_fake_price_stream(
    builder: &mut PriceHistoryBuilder,
    symbol: &str,
    start_price: f64,
    length_in_days: i64,
) {
    let return_dist = Normal::new(0.0005, 0.015).unwrap();
    let mut rng = thread_rng();

    let mut price = start_price;
    for day in 0..length_in_days {
        builder.add_price(price, START_DATE + day * DateTime::SECS_IN_DAY, symbol);
        price *= 1.0 + return_dist.sample(&mut rng);
    }
}

pub fn fake_history(symbols: &[&str], length_in_days: i64) -> PriceHistory {
    let mut builder = PriceHistoryBuilder::new();
    for (i, symbol) in symbols.iter().enumerate() {
        build_fake_price_stream(&mut builder, symbol, 100.0 * (i + 1) as f64, length_in_days);
    }
    builder.build()
}

/// Returns a canned history, keeping only the requested symbols, and remembers every window it
/// was asked for.
pub struct FakeSource {
    history: PriceHistory,
    pub windows: RefCell<Vec<DateWindow>>,
}

impl FakeSource {
    pub fn new(history: PriceHistory) -> Self {
        Self {
            history,
            windows: RefCell::new(Vec::new()),
        }
    }
}

impl PriceSource for FakeSource {
    fn fetch(&self, symbols: &[String], window: &DateWindow) -> Result<PriceHistory> {
        self.windows.borrow_mut().push(window.clone());
        Ok(self
            .history
            .iter()
            .filter(|(symbol, _)| symbols.contains(symbol))
            .map(|(symbol, series)| (symbol.clone(), series.clone()))
            .collect())
    }
}

pub struct FailingSource;

impl PriceSource for FailingSource {
    fn fetch(&self, _symbols: &[String], _window: &DateWindow) -> Result<PriceHistory> {
        Err(anyhow!("connection refused"))
    }
}
