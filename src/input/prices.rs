use std::collections::BTreeMap;

use crate::clock::DateTime;

/// Closing prices for one instrument ordered by date ascending. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSeries {
    dates: Vec<DateTime>,
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Pairs are sorted by date, a repeated date keeps the last price given.
    pub fn new(pairs: impl IntoIterator<Item = (DateTime, f64)>) -> Self {
        let ordered: BTreeMap<DateTime, f64> = pairs.into_iter().collect();
        let (dates, prices) = ordered.into_iter().unzip();
        Self { dates, prices }
    }

    pub fn from_prices(start: impl Into<DateTime>, prices: &[f64]) -> Self {
        let start_val: DateTime = start.into();
        Self::new(prices.iter().enumerate().map(|(i, price)| {
            let date = DateTime::from(*start_val + i as i64 * DateTime::SECS_IN_DAY);
            (date, *price)
        }))
    }

    pub fn dates(&self) -> &[DateTime] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Price series keyed by instrument identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceHistory {
    inner: BTreeMap<String, PriceSeries>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, symbol: impl Into<String>, series: PriceSeries) {
        self.inner.insert(symbol.into(), series);
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.inner.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PriceSeries)> {
        self.inner.iter()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.inner.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// True when no instrument has a single price, an entry holding an empty series counts as no
    /// data.
    pub fn has_no_prices(&self) -> bool {
        self.inner.values().all(|series| series.is_empty())
    }

    /// Splits off every series shorter than `min_len`, returning the symbols removed.
    pub fn drop_shorter_than(&mut self, min_len: usize) -> Vec<String> {
        let dropped: Vec<String> = self
            .inner
            .iter()
            .filter(|(_, series)| series.len() < min_len)
            .map(|(symbol, _)| symbol.clone())
            .collect();
        for symbol in &dropped {
            self.inner.remove(symbol);
        }
        dropped
    }
}

impl FromIterator<(String, PriceSeries)> for PriceHistory {
    fn from_iter<T: IntoIterator<Item = (String, PriceSeries)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Accumulates prices one observation at a time, in any order, before producing a
/// [PriceHistory].
pub struct PriceHistoryBuilder {
    inner: BTreeMap<String, BTreeMap<DateTime, f64>>,
}

impl PriceHistoryBuilder {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn add_price(&mut self, price: f64, date: impl Into<DateTime>, symbol: impl Into<String>) {
        self.inner
            .entry(symbol.into())
            .or_default()
            .insert(date.into(), price);
    }

    /// Registers the symbol without prices, used when a source answers but has nothing in range.
    pub fn add_symbol(&mut self, symbol: impl Into<String>) {
        self.inner.entry(symbol.into()).or_default();
    }

    pub fn build(self) -> PriceHistory {
        self.inner
            .into_iter()
            .map(|(symbol, rows)| (symbol, PriceSeries::new(rows)))
            .collect()
    }
}

impl Default for PriceHistoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{PriceHistoryBuilder, PriceSeries};
    use crate::clock::DateTime;

    #[test]
    fn test_that_series_is_ordered_by_date() {
        let series = PriceSeries::new(vec![
            (DateTime::from(300), 99.0),
            (DateTime::from(100), 100.0),
            (DateTime::from(200), 110.0),
        ]);
        assert_eq!(series.prices(), &[100.0, 110.0, 99.0]);
        let dates: Vec<DateTime> = vec![100.into(), 200.into(), 300.into()];
        assert_eq!(series.dates(), dates.as_slice());
    }

    #[test]
    fn test_that_builder_groups_by_symbol() {
        let mut builder = PriceHistoryBuilder::new();
        builder.add_price(101.0, 101, "ABC");
        builder.add_price(10.0, 100, "BCD");
        builder.add_price(100.0, 100, "ABC");
        builder.add_price(11.0, 101, "BCD");

        let history = builder.build();
        assert_eq!(history.symbols(), vec!["ABC".to_string(), "BCD".to_string()]);
        assert_eq!(history.get("ABC").unwrap().prices(), &[100.0, 101.0]);
        assert_eq!(history.get("BCD").unwrap().prices(), &[10.0, 11.0]);
    }

    #[test]
    fn test_that_history_with_only_empty_series_has_no_prices() {
        let mut builder = PriceHistoryBuilder::new();
        builder.add_symbol("ABC");
        let history = builder.build();
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
        assert!(history.has_no_prices());

        let mut builder = PriceHistoryBuilder::new();
        builder.add_price(100.0, 100, "ABC");
        builder.add_symbol("BCD");
        assert!(!builder.build().has_no_prices());
    }

    #[test]
    fn test_that_short_series_are_dropped() {
        let mut builder = PriceHistoryBuilder::new();
        builder.add_price(100.0, 100, "ABC");
        builder.add_price(101.0, 101, "ABC");
        builder.add_price(102.0, 102, "ABC");
        builder.add_price(10.0, 100, "BCD");
        builder.add_symbol("CDE");

        let mut history = builder.build();
        let dropped = history.drop_shorter_than(3);
        assert_eq!(dropped, vec!["BCD".to_string(), "CDE".to_string()]);
        assert_eq!(history.symbols(), vec!["ABC".to_string()]);
    }
}
