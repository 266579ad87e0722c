use std::collections::{BTreeMap, BTreeSet};

use crate::clock::DateTime;
use crate::input::prices::PriceHistory;
use crate::perf::{return_risk_over_time, PerfError, RiskReturn};

use super::svg::{escape, extent, no_data, polyline, Frame, AXIS_COLOR, PALETTE};

const SCATTER_COLOR: &str = "#0000ff";
const BAR_COLOR: &str = "#ffa500";
const MAX_DATE_LABELS: usize = 8;

struct LegendEntry {
    label: String,
    color: &'static str,
    dash: bool,
}

fn draw_legend(svg: &mut String, frame: &Frame, entries: &[LegendEntry]) {
    let x = frame.left() + 10.0;
    let mut y = frame.top() + 16.0;
    for entry in entries {
        svg.push_str(&polyline(&[(x, y - 4.0), (x + 22.0, y - 4.0)], entry.color, entry.dash));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="start">{label}</text>"#,
            x = x + 28.0,
            y = y,
            label = escape(&entry.label)
        ));
        y += 15.0;
    }
}

/// Scatter of risk against expected return, one labelled point per instrument.
pub fn render_risk_return(summaries: &BTreeMap<String, RiskReturn>) -> String {
    let x_range = extent(summaries.values().map(|s| s.risk), false);
    let y_range = extent(summaries.values().map(|s| s.expected_return), false);

    let frame = Frame::new(
        x_range.unwrap_or((0.0, 1.0)),
        y_range.unwrap_or((-1.0, 1.0)),
    );
    let mut svg = frame.open(
        "Risk vs Expected Return",
        "Risk (std. dev. of daily returns)",
        "Expected return (mean of daily returns)",
    );

    if summaries.is_empty() || x_range.is_none() || y_range.is_none() {
        no_data(&mut svg, &frame);
        svg.push_str(frame.close());
        return svg;
    }

    frame.y_grid(&mut svg, 6);
    frame.x_grid(&mut svg, 6);
    frame.border(&mut svg);

    for (symbol, summary) in summaries {
        let x = frame.x(summary.risk);
        let y = frame.y(summary.expected_return);
        svg.push_str(&format!(
            r#"<circle cx="{x:.2}" cy="{y:.2}" r="5" fill="{color}" />"#,
            x = x,
            y = y,
            color = SCATTER_COLOR
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = x,
            y = y - 10.0,
            label = escape(symbol)
        ));
    }

    svg.push_str(frame.close());
    svg
}

/// Bar per instrument on a fixed 0 to 100 axis, each annotated with its weight. Weights are
/// expected to be normalized already.
pub fn render_weight_allocation(symbols: &[String], weights: &[f64]) -> String {
    let frame = Frame::new((0.0, 1.0), (0.0, 100.0));
    let mut svg = frame.open("Portfolio Weight Allocation", "Assets", "Weight (%)");

    let count = symbols.len().min(weights.len());
    if count == 0 {
        no_data(&mut svg, &frame);
        svg.push_str(frame.close());
        return svg;
    }

    frame.y_grid(&mut svg, 6);
    frame.border(&mut svg);

    let band = (frame.right() - frame.left()) / count as f64;
    let bar_width = band * 0.8;
    for (i, (symbol, weight)) in symbols.iter().zip(weights.iter()).enumerate() {
        let center = frame.left() + band * (i as f64 + 0.5);
        let top = frame.y(weight.clamp(0.0, 100.0));
        svg.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{color}" />"#,
            x = center - bar_width / 2.0,
            y = top,
            w = bar_width,
            h = frame.bottom() - top,
            color = BAR_COLOR
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{weight:.1}%</text>"#,
            x = center,
            y = frame.y(weight + 1.0) - 2.0,
            weight = weight
        ));
        frame.x_tick(&mut svg, center, symbol, false);
    }

    svg.push_str(frame.close());
    svg
}

/// Cumulative return and rolling risk for every instrument on one shared date axis. Rolling risk
/// is not drawn where the window is not yet full.
pub fn render_return_risk_over_time(
    history: &PriceHistory,
    window: usize,
) -> Result<String, PerfError> {
    let mut paths = Vec::new();
    for (symbol, series) in history.iter() {
        paths.push((symbol, return_risk_over_time(symbol, series, window)?));
    }

    let dates: BTreeSet<DateTime> = paths
        .iter()
        .flat_map(|(_, path)| path.dates.iter().copied())
        .collect();
    let dates: Vec<DateTime> = dates.into_iter().collect();
    let position: BTreeMap<DateTime, usize> =
        dates.iter().enumerate().map(|(i, date)| (*date, i)).collect();

    let values = paths.iter().flat_map(|(_, path)| {
        path.cumulative
            .iter()
            .copied()
            .chain(path.rolling_risk.iter().flatten().copied())
    });
    let y_range = extent(values, true);

    let x_max = dates.len().saturating_sub(1).max(1) as f64;
    let frame = Frame::new((0.0, x_max), y_range.unwrap_or((-1.0, 1.0)));
    let mut svg = frame.open("Returns and Risk Over Time", "Date", "Value");

    if dates.is_empty() || y_range.is_none() {
        no_data(&mut svg, &frame);
        svg.push_str(frame.close());
        return Ok(svg);
    }

    frame.y_grid(&mut svg, 6);
    let step = dates.len().div_ceil(MAX_DATE_LABELS).max(1);
    for (i, date) in dates.iter().enumerate().step_by(step) {
        frame.x_tick(&mut svg, frame.x(i as f64), &date.axis_label(), true);
    }
    frame.border(&mut svg);

    let zero = frame.y(0.0);
    svg.push_str(&format!(
        r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="0.5" />"#,
        x1 = frame.left(),
        x2 = frame.right(),
        y = zero,
        color = AXIS_COLOR
    ));

    let mut legend = Vec::new();
    for (i, (symbol, path)) in paths.iter().enumerate() {
        let cumulative_color = PALETTE[(2 * i) % PALETTE.len()];
        let risk_color = PALETTE[(2 * i + 1) % PALETTE.len()];

        let cumulative: Vec<(f64, f64)> = path
            .dates
            .iter()
            .zip(path.cumulative.iter())
            .filter_map(|(date, value)| {
                position
                    .get(date)
                    .map(|pos| (frame.x(*pos as f64), frame.y(*value)))
            })
            .collect();
        let risk: Vec<(f64, f64)> = path
            .dates
            .iter()
            .zip(path.rolling_risk.iter())
            .filter_map(|(date, value)| {
                let value = (*value)?;
                position
                    .get(date)
                    .map(|pos| (frame.x(*pos as f64), frame.y(value)))
            })
            .collect();

        svg.push_str(&polyline(&cumulative, cumulative_color, false));
        svg.push_str(&polyline(&risk, risk_color, true));

        legend.push(LegendEntry {
            label: format!("Cumulative return {symbol}"),
            color: cumulative_color,
            dash: false,
        });
        legend.push(LegendEntry {
            label: format!("Risk {symbol}"),
            color: risk_color,
            dash: true,
        });
    }
    draw_legend(&mut svg, &frame, &legend);

    svg.push_str(frame.close());
    Ok(svg)
}
