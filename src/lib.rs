//! # What is Tiree?
//!
//! Tiree fetches recent daily closing prices for a handful of instruments, derives the expected
//! return and risk of each from its daily percentage changes, and renders three charts: risk
//! against expected return, the portfolio weight allocation, and cumulative return against
//! rolling risk over time.
//!
//! # Implementation
//!
//! A run is composed of:
//! - A source, [YahooSource](crate::source::yahoo::YahooSource) is the only one. Sources hide
//! their wire format and hand back a [PriceHistory](crate::input::prices::PriceHistory).
//! - The calculator in [perf](crate::perf), plain numeric reductions over ordered prices with no
//! state between calls.
//! - The charts in [chart](crate::chart), which produce SVG documents and pass them to a sink.
//! - The orchestration in [app](crate::app), parameterized over the source and the sink so that
//! a run can be tested without the network or the filesystem.
//!
//! Weights are supplied through [Config](crate::config::Config) and are only normalized, they are
//! not optimized or derived from the computed risk.
//!
//! ``
//! cargo run --bin tiree [config.json]
//! ``
pub mod app;
pub mod chart;
pub mod clock;
pub mod config;
pub mod input;
pub mod perf;
pub mod source;
pub mod weights;
