//! Sources are external data sources that produce the closing prices everything else is derived
//! from. Each source has its own wire format that is converted into
//! [PriceHistory](crate::input::prices::PriceHistory) inside the source so clients never see it.
pub mod yahoo;

use anyhow::Result;

use crate::clock::DateWindow;
use crate::input::prices::PriceHistory;

pub trait PriceSource {
    /// Daily closing prices for each symbol over the window. Symbols the source does not know are
    /// left out of the result, any other failure is returned as an error.
    fn fetch(&self, symbols: &[String], window: &DateWindow) -> Result<PriceHistory>;
}
