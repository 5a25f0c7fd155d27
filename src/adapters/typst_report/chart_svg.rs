//! SVG line charts for the portfolio value and drawdown series.

use crate::domain::metrics::DrawdownSeries;
use crate::domain::portfolio::PortfolioValueSeries;
use chrono::NaiveDate;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 200.0;
const PADDING: f64 = 40.0;

struct ChartStyle {
    stroke: &'static str,
    fill: Option<&'static str>,
}

pub fn generate_value_svg(series: &PortfolioValueSeries) -> String {
    let points: Vec<(NaiveDate, f64)> = series.points().iter().map(|p| (p.date, p.value)).collect();
    render_line_chart(
        &points,
        |v| format!("{:.2}", v),
        ChartStyle {
            stroke: "#1f4e79",
            fill: None,
        },
    )
}

pub fn generate_drawdown_svg(drawdowns: &DrawdownSeries) -> String {
    let points: Vec<(NaiveDate, f64)> = drawdowns
        .points()
        .iter()
        .map(|p| (p.date, p.drawdown))
        .collect();
    render_line_chart(
        &points,
        |v| format!("{:.1}%", v * 100.0),
        ChartStyle {
            stroke: "#b22222",
            fill: Some("#f4cccc"),
        },
    )
}

/// Empty string when there is nothing to draw.
fn render_line_chart(
    points: &[(NaiveDate, f64)],
    label: impl Fn(f64) -> String,
    style: ChartStyle,
) -> String {
    if points.is_empty() {
        return String::new();
    }

    let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;

    let range = max_y - min_y;
    let scale_y = if range > 0.0 {
        plot_height / range
    } else {
        1.0
    };
    let scale_x = if points.len() > 1 {
        plot_width / (points.len() - 1) as f64
    } else {
        0.0
    };

    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, &(_, v))| {
            let x = PADDING + i as f64 * scale_x;
            let y = HEIGHT - PADDING - (v - min_y) * scale_y;
            (x, y)
        })
        .collect();

    let polyline = coords
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ");

    let area = style.fill.map(|fill| {
        // Close the shape along the zero line, which sits at the top for drawdowns.
        let baseline = HEIGHT - PADDING - (max_y - min_y) * scale_y;
        let first_x = coords[0].0;
        let last_x = coords[coords.len() - 1].0;
        format!(
            r#"<polygon points="{:.1},{:.1} {} {:.1},{:.1}" fill="{}" stroke="none"/>"#,
            first_x, baseline, polyline, last_x, baseline, fill
        )
    });

    let first_date = points[0].0;
    let last_date = points[points.len() - 1].0;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        r#"<rect width="{}" height="{}" fill="white"/>"#,
        WIDTH, HEIGHT
    ));
    svg.push_str(&format!(
        r#"<line x1="{p}" y1="{p}" x2="{p}" y2="{b}" stroke="black" stroke-width="1"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING
    ));
    svg.push_str(&format!(
        r#"<line x1="{p}" y1="{b}" x2="{r}" y2="{b}" stroke="black" stroke-width="1"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    ));
    if let Some(area) = area {
        svg.push_str(&area);
    }
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
        polyline, style.stroke
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="9" text-anchor="end">{}</text>"#,
        PADDING - 4.0,
        PADDING + 3.0,
        label(max_y)
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="9" text-anchor="end">{}</text>"#,
        PADDING - 4.0,
        HEIGHT - PADDING + 3.0,
        label(min_y)
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="9">{}</text>"#,
        PADDING,
        HEIGHT - PADDING + 14.0,
        first_date.format("%Y-%m")
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="9" text-anchor="end">{}</text>"#,
        WIDTH - PADDING,
        HEIGHT - PADDING + 14.0,
        last_date.format("%Y-%m")
    ));
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::drawdown_series;
    use crate::domain::portfolio::ValuePoint;

    fn series(values: &[f64]) -> PortfolioValueSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        PortfolioValueSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| ValuePoint {
                    date: start + chrono::Duration::days(30 * i as i64),
                    value,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn single_point_still_renders() {
        let svg = generate_value_svg(&series(&[1.0]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("40.0,160.0"));
    }

    #[test]
    fn value_chart_spans_plot_area() {
        let svg = generate_value_svg(&series(&[1.0, 1.5, 2.0]));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("40.0,160.0"));
        assert!(svg.contains("460.0,40.0"));
        assert!(svg.contains(">2.00<"));
        assert!(svg.contains(">2024-01<"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn drawdown_chart_is_filled() {
        let values = series(&[1.0, 1.1, 0.99, 0.99]);
        let svg = generate_drawdown_svg(&drawdown_series(&values));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains(">-10.0%<"));
        assert!(svg.contains(">0.0%<"));
    }

    #[test]
    fn chart_has_dimensions() {
        let svg = generate_value_svg(&series(&[1.0, 1.0]));
        assert!(svg.contains(r#"width="500""#));
        assert!(svg.contains(r#"height="200""#));
    }
}
