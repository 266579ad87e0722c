//! Low level pieces shared by every chart: the plot frame, value scaling, axes and text.

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 480.0;

const LEFT: f64 = 80.0;
const RIGHT: f64 = 30.0;
const TOP: f64 = 50.0;
const BOTTOM: f64 = 60.0;

pub const GRID_COLOR: &str = "#dddddd";
pub const AXIS_COLOR: &str = "#333333";

// Matplotlib's default cycle, charts that overlay several instruments pick colours in order.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Smallest and largest finite value, widened when flat so that the frame never divides by zero.
pub fn extent(values: impl IntoIterator<Item = f64>, include_zero: bool) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for value in values.into_iter().filter(|v| v.is_finite()) {
        min_v = min_v.min(value);
        max_v = max_v.max(value);
    }

    if include_zero {
        min_v = min_v.min(0.0);
        max_v = max_v.max(0.0);
    }

    if !min_v.is_finite() || !max_v.is_finite() {
        return None;
    }

    if min_v == max_v {
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
        return Some((min_v - adjust, max_v + adjust));
    }

    let margin = (max_v - min_v) * 0.05;
    Some((min_v - margin, max_v + margin))
}

/// Evenly spaced values from min to max inclusive.
pub fn ticks(min_v: f64, max_v: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![min_v];
    }
    let step = (max_v - min_v) / (count - 1) as f64;
    (0..count).map(|i| min_v + step * i as f64).collect()
}

pub fn format_tick(value: f64, span: f64) -> String {
    if span < 0.1 {
        format!("{value:.4}")
    } else if span < 10.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.0}")
    }
}

/// Maps data coordinates onto the plot area of a fixed size document.
pub struct Frame {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl Frame {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self { x_range, y_range }
    }

    pub fn left(&self) -> f64 {
        LEFT
    }

    pub fn right(&self) -> f64 {
        WIDTH - RIGHT
    }

    pub fn top(&self) -> f64 {
        TOP
    }

    pub fn bottom(&self) -> f64 {
        HEIGHT - BOTTOM
    }

    pub fn x(&self, value: f64) -> f64 {
        let (min_v, max_v) = self.x_range;
        if (max_v - min_v).abs() < f64::EPSILON {
            return (self.left() + self.right()) / 2.0;
        }
        self.left() + (value - min_v) / (max_v - min_v) * (self.right() - self.left())
    }

    pub fn y(&self, value: f64) -> f64 {
        let (min_v, max_v) = self.y_range;
        if (max_v - min_v).abs() < f64::EPSILON {
            return (self.top() + self.bottom()) / 2.0;
        }
        self.bottom() - (value - min_v) / (max_v - min_v) * (self.bottom() - self.top())
    }

    /// Opening tag, background, title and axis labels.
    pub fn open(&self, title: &str, x_label: &str, y_label: &str) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:11px;fill:#333}}</style><rect width="100%" height="100%" fill="white" />"#,
            w = WIDTH,
            h = HEIGHT
        );
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="15">{title}</text>"#,
            x = WIDTH / 2.0,
            y = TOP / 2.0 + 5.0,
            title = escape(title)
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = (self.left() + self.right()) / 2.0,
            y = HEIGHT - 15.0,
            label = escape(x_label)
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" transform="rotate(-90 {x:.2} {y:.2})">{label}</text>"#,
            x = 18.0,
            y = (self.top() + self.bottom()) / 2.0,
            label = escape(y_label)
        ));
        svg
    }

    pub fn close(&self) -> &'static str {
        "</svg>"
    }

    /// Box around the plot area.
    pub fn border(&self, svg: &mut String) {
        svg.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="none" stroke="{color}" stroke-width="1" />"#,
            x = self.left(),
            y = self.top(),
            w = self.right() - self.left(),
            h = self.bottom() - self.top(),
            color = AXIS_COLOR
        ));
    }

    /// Horizontal grid lines with labelled ticks on the y axis.
    pub fn y_grid(&self, svg: &mut String, count: usize) {
        let (min_v, max_v) = self.y_range;
        for value in ticks(min_v, max_v, count) {
            let y = self.y(value);
            svg.push_str(&format!(
                r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="0.8" />"#,
                x1 = self.left(),
                x2 = self.right(),
                y = y,
                color = GRID_COLOR
            ));
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"#,
                x = self.left() - 6.0,
                y = y + 4.0,
                label = format_tick(value, max_v - min_v)
            ));
        }
    }

    /// Vertical grid lines with labelled ticks on a numeric x axis.
    pub fn x_grid(&self, svg: &mut String, count: usize) {
        let (min_v, max_v) = self.x_range;
        for value in ticks(min_v, max_v, count) {
            self.x_tick(svg, self.x(value), &format_tick(value, max_v - min_v), true);
        }
    }

    /// Single labelled tick below the plot area, optionally with a grid line.
    pub fn x_tick(&self, svg: &mut String, x: f64, label: &str, grid: bool) {
        if grid {
            svg.push_str(&format!(
                r#"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="{color}" stroke-width="0.8" />"#,
                x = x,
                y1 = self.top(),
                y2 = self.bottom(),
                color = GRID_COLOR
            ));
        }
        svg.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="{color}" stroke-width="1" />"#,
            x = x,
            y1 = self.bottom(),
            y2 = self.bottom() + 4.0,
            color = AXIS_COLOR
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = x,
            y = self.bottom() + 18.0,
            label = escape(label)
        ));
    }
}

pub fn polyline(points: &[(f64, f64)], color: &str, dash: bool) -> String {
    if points.is_empty() {
        return String::new();
    }

    let coords = points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" stroke-dasharray="{dash}" points="{coords}" />"#,
        color = color,
        dash = if dash { "6 4" } else { "0" },
        coords = coords
    )
}

pub fn no_data(svg: &mut String, frame: &Frame) {
    svg.push_str(&format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">No data</text>"#,
        x = (frame.left() + frame.right()) / 2.0,
        y = (frame.top() + frame.bottom()) / 2.0
    ));
}
