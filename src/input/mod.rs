//! Inputs wrap around the data returned by a source, giving the calculator and the charts a simple
//! ordered view of closing prices.
//!
//! Sources should build inputs through [PriceHistoryBuilder](crate::input::prices::PriceHistoryBuilder)
//! so that clients do not have to marshall data into internal types.
pub mod prices;
