use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::clock::DateWindow;
use crate::input::prices::{PriceHistory, PriceHistoryBuilder};
use crate::source::PriceSource;

pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com";

//Requests without a browser-like agent are regularly refused
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) tiree";

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

/// Adds the closes in a chart response to the builder. Returns false when the response says the
/// symbol is unknown, the symbol is then not added at all.
pub fn add_chart_response(
    builder: &mut PriceHistoryBuilder,
    symbol: &str,
    response: ChartResponse,
) -> bool {
    if let Some(err) = response.chart.error {
        warn!(
            "{symbol}: source returned {} ({})",
            err.code,
            err.description.unwrap_or_default()
        );
        return false;
    }

    let Some(result) = response.chart.result.and_then(|rows| rows.into_iter().next()) else {
        warn!("{symbol}: source returned no chart");
        return false;
    };

    builder.add_symbol(symbol);
    if let Some(quote) = result.indicators.quote.first() {
        //Null closes are placeholders for days without a trade
        for (date, close) in result.timestamp.iter().zip(quote.close.iter()) {
            if let Some(price) = close {
                builder.add_price(*price, *date, symbol);
            }
        }
    }
    true
}

/// Daily closes from the Yahoo Finance chart API, one blocking request per symbol.
pub struct YahooSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::from_client(base_url, client))
    }

    fn from_client(base_url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn chart_url(&self, symbol: &str, window: &DateWindow) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url.trim_end_matches('/'),
            symbol,
            *window.start,
            *window.end
        )
    }
}

impl PriceSource for YahooSource {
    fn fetch(&self, symbols: &[String], window: &DateWindow) -> Result<PriceHistory> {
        let mut builder = PriceHistoryBuilder::new();

        for symbol in symbols {
            let url = self.chart_url(symbol, window);
            debug!("GET {url}");
            let resp = self.client.get(&url).send()?;
            let status = resp.status();
            //Unknown symbols come back as 404 with an error body
            if !status.is_success() && status != StatusCode::NOT_FOUND {
                return Err(anyhow!("{symbol}: source responded with {status}"));
            }

            let body: ChartResponse = resp.json()?;
            if add_chart_response(&mut builder, symbol, body) {
                info!(
                    "{symbol}: fetched chart for {} to {}",
                    window.start.date_string(),
                    window.end.date_string()
                );
            }
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::{add_chart_response, ChartResponse, YahooSource};
    use crate::clock::DateWindow;
    use crate::input::prices::PriceHistoryBuilder;
    use crate::source::PriceSource;

    /// Serves one canned (status, body) per symbol on a local port, returns the base url.
    fn serve(responses: HashMap<&'static str, (&'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                loop {
                    let mut header = String::new();
                    if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                        break;
                    }
                }

                let symbol = request_line
                    .split("/chart/")
                    .nth(1)
                    .and_then(|rest| rest.split('?').next())
                    .unwrap_or_default();
                let (status, body) = responses
                    .get(symbol)
                    .copied()
                    .unwrap_or(("500 Internal Server Error", ""));

                let mut stream = stream;
                let _ = write!(
                    stream,
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
            }
        });
        format!("http://{addr}")
    }

    fn local_source(base_url: String) -> YahooSource {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .unwrap();
        YahooSource::from_client(base_url, client)
    }

    const FOUND: &str = r#"{"chart":{"result":[{"meta":{"symbol":"ABC"},
        "timestamp":[1700000000,1700086400,1700172800,1700259200],
        "indicators":{"quote":[{"open":[1.0,2.0,3.0,4.0],"close":[100.0,null,110.0,99.0]}]}}],
        "error":null}}"#;

    const NOT_FOUND: &str = r#"{"chart":{"result":null,
        "error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

    #[test]
    fn test_that_closes_are_read_and_nulls_skipped() {
        let response: ChartResponse = serde_json::from_str(FOUND).unwrap();
        let mut builder = PriceHistoryBuilder::new();
        assert!(add_chart_response(&mut builder, "ABC", response));

        let history = builder.build();
        let series = history.get("ABC").unwrap();
        assert_eq!(series.prices(), &[100.0, 110.0, 99.0]);
        assert_eq!(*series.dates()[1], 1700172800);
    }

    #[test]
    fn test_that_unknown_symbol_is_left_out() {
        let response: ChartResponse = serde_json::from_str(NOT_FOUND).unwrap();
        let mut builder = PriceHistoryBuilder::new();
        assert!(!add_chart_response(&mut builder, "XYZ", response));
        assert_eq!(builder.build().len(), 0);
    }

    #[test]
    fn test_that_url_covers_window() {
        let source = YahooSource::new("http://localhost:8080/").unwrap();
        let url = source.chart_url("ABC", &DateWindow::new(100, 200));
        assert_eq!(
            url,
            "http://localhost:8080/v8/finance/chart/ABC?period1=100&period2=200&interval=1d&events=history"
        );
    }

    #[test]
    fn test_that_unknown_symbol_gives_partial_history() {
        let base_url = serve(HashMap::from([
            ("ABC", ("200 OK", FOUND)),
            ("XYZ", ("404 Not Found", NOT_FOUND)),
        ]));
        let source = local_source(base_url);
        let symbols = vec!["ABC".to_string(), "XYZ".to_string()];

        let history = source.fetch(&symbols, &DateWindow::new(100, 200)).unwrap();
        assert_eq!(history.symbols(), vec!["ABC".to_string()]);
        assert_eq!(history.get("ABC").unwrap().prices(), &[100.0, 110.0, 99.0]);
    }

    #[test]
    fn test_that_server_error_fails_fetch() {
        let base_url = serve(HashMap::from([
            ("ABC", ("200 OK", FOUND)),
            ("BAD", ("500 Internal Server Error", "{}")),
        ]));
        let source = local_source(base_url);
        let symbols = vec!["ABC".to_string(), "BAD".to_string()];
        assert!(source.fetch(&symbols, &DateWindow::new(100, 200)).is_err());
    }

    #[test]
    fn test_that_malformed_body_fails_fetch() {
        let base_url = serve(HashMap::from([("TXT", ("200 OK", "not json"))]));
        let source = local_source(base_url);
        let symbols = vec!["TXT".to_string()];
        assert!(source.fetch(&symbols, &DateWindow::new(100, 200)).is_err());
    }
}
