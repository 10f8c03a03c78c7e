//! Chart drawing for raster backends and table degradation for PPTX.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::Write;

use deck_core::{ChartContent, ChartType, Stroke, TableCell, TableContent, TextAlign};

use crate::svg::escape_xml;

/// Series colors, cycled by point index.
pub const PALETTE: [&str; 6] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948",
];

const BACKGROUND: &str = "#fafafa";

fn point_color(chart: &ChartContent, idx: usize) -> String {
    chart.series[idx]
        .color
        .as_deref()
        .map_or_else(|| PALETTE[idx % PALETTE.len()].to_string(), escape_xml)
}

/// Chart markup in local coordinates of a `width`×`height` box.
///
/// `scale` converts logical lengths (padding, label size) to output units.
#[must_use]
pub fn chart_markup(chart: &ChartContent, width: f64, height: f64, scale: f64) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<rect width=\"{width}\" height=\"{height}\" fill=\"{BACKGROUND}\" stroke=\"#ddd\" stroke-width=\"{scale}\"/>",
    );

    let mut top = 0.0;
    if let Some(title) = chart.title.as_deref().filter(|t| !t.is_empty()) {
        let size = 14.0 * scale;
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"{size}\" font-weight=\"700\" fill=\"#333\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>",
            width / 2.0,
            size * 1.3,
            escape_xml(title),
        );
        top = size * 1.8;
    }

    let area = PlotArea {
        x: 0.0,
        y: top,
        width,
        height: height - top,
        scale,
    };
    match chart.chart_type {
        ChartType::Bar => bars(&mut svg, chart, &area),
        ChartType::Line => line(&mut svg, chart, &area, false),
        ChartType::Area => line(&mut svg, chart, &area, true),
        ChartType::Pie => sectors(&mut svg, chart, &area, false),
        ChartType::Donut => sectors(&mut svg, chart, &area, true),
    }
    svg
}

struct PlotArea {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    scale: f64,
}

impl PlotArea {
    fn padded(&self) -> (f64, f64, f64, f64) {
        let padding = 20.0 * self.scale;
        (
            self.x + padding,
            self.y + padding,
            (self.width - padding * 2.0).max(0.0),
            (self.height - padding * 2.0).max(0.0),
        )
    }
}

fn max_value(chart: &ChartContent) -> Option<f64> {
    let max = chart
        .series
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);
    (max > 0.0).then_some(max)
}

#[allow(clippy::cast_precision_loss)]
fn bars(svg: &mut String, chart: &ChartContent, area: &PlotArea) {
    let Some(max_val) = max_value(chart) else {
        return;
    };
    let (chart_x, chart_y, chart_w, chart_h) = area.padded();

    let bar_count = chart.series.len() as f64;
    let bar_gap = 4.0 * area.scale;
    let bar_width = ((chart_w - bar_gap * (bar_count - 1.0)) / bar_count).max(0.0);
    let label_size = 10.0 * area.scale;

    for (idx, point) in chart.series.iter().enumerate() {
        let bar_h = (point.value.max(0.0) / max_val) * chart_h;
        let bx = chart_x + (idx as f64) * (bar_width + bar_gap);
        let by = chart_y + chart_h - bar_h;
        let _ = write!(
            svg,
            "<rect x=\"{bx}\" y=\"{by}\" width=\"{bar_width}\" height=\"{bar_h}\" fill=\"{}\" rx=\"{}\"/>",
            point_color(chart, idx),
            2.0 * area.scale,
        );
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"{label_size}\" fill=\"#666\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>",
            bx + bar_width / 2.0,
            chart_y + chart_h + label_size * 1.2,
            escape_xml(&point.label),
        );
    }
}

#[allow(clippy::cast_precision_loss)]
fn line(svg: &mut String, chart: &ChartContent, area: &PlotArea, filled: bool) {
    let Some(max_val) = max_value(chart) else {
        return;
    };
    let (chart_x, chart_y, chart_w, chart_h) = area.padded();
    let step = if chart.series.len() > 1 {
        chart_w / (chart.series.len() - 1) as f64
    } else {
        0.0
    };

    let points: Vec<(f64, f64)> = chart
        .series
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let x = chart_x + step * idx as f64;
            let y = chart_y + chart_h - (p.value.max(0.0) / max_val) * chart_h;
            (x, y)
        })
        .collect();
    let coords = points
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ");
    let color = point_color(chart, 0);

    if filled {
        let baseline = chart_y + chart_h;
        let first_x = points.first().map_or(chart_x, |p| p.0);
        let last_x = points.last().map_or(chart_x, |p| p.0);
        let _ = write!(
            svg,
            "<polygon points=\"{first_x},{baseline} {coords} {last_x},{baseline}\" fill=\"{color}\" fill-opacity=\"0.35\"/>",
        );
    }
    let _ = write!(
        svg,
        "<polyline points=\"{coords}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{}\" stroke-linejoin=\"round\"/>",
        2.0 * area.scale,
    );
    for (idx, (x, y)) in points.iter().enumerate() {
        let _ = write!(
            svg,
            "<circle cx=\"{x}\" cy=\"{y}\" r=\"{}\" fill=\"{}\"/>",
            3.0 * area.scale,
            point_color(chart, idx),
        );
    }
}

fn sectors(svg: &mut String, chart: &ChartContent, area: &PlotArea, donut: bool) {
    let total: f64 = chart.series.iter().map(|p| p.value.max(0.0)).sum();
    if total <= 0.0 {
        return;
    }

    let cx = area.x + area.width / 2.0;
    let cy = area.y + area.height / 2.0;
    let radius = (area.width.min(area.height) / 2.0 - 10.0 * area.scale).max(0.0);

    let mut start_angle = -FRAC_PI_2;
    for (idx, point) in chart.series.iter().enumerate() {
        let sweep = (point.value.max(0.0) / total) * TAU;
        if sweep <= 0.0 {
            continue;
        }
        let color = point_color(chart, idx);
        if sweep >= TAU - 1e-9 {
            let _ = write!(
                svg,
                "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"{color}\"/>",
            );
            break;
        }
        let end_angle = start_angle + sweep;
        let x1 = cx + radius * start_angle.cos();
        let y1 = cy + radius * start_angle.sin();
        let x2 = cx + radius * end_angle.cos();
        let y2 = cy + radius * end_angle.sin();
        let large_arc = i32::from(sweep > PI);
        let _ = write!(
            svg,
            "<path d=\"M{cx},{cy} L{x1},{y1} A{radius},{radius} 0 {large_arc},1 {x2},{y2} Z\" fill=\"{color}\"/>",
        );
        start_angle = end_angle;
    }

    if donut {
        let _ = write!(
            svg,
            "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{}\" fill=\"{BACKGROUND}\"/>",
            radius * 0.55,
        );
    }
}

/// Format a value without a trailing `.0` for whole numbers.
#[must_use]
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Degrade a chart to a two-column label/value table.
#[must_use]
pub fn chart_table(chart: &ChartContent) -> TableContent {
    let header = |text: &str| TableCell {
        text: text.to_string(),
        bold: true,
        background: Some("#f3f4f6".to_string()),
        ..TableCell::default()
    };
    let mut rows = vec![vec![
        header(chart.title.as_deref().unwrap_or("Label")),
        TableCell {
            align: TextAlign::Right,
            ..header("Value")
        },
    ]];
    rows.extend(chart.series.iter().map(|p| {
        vec![
            TableCell::text(p.label.clone()),
            TableCell {
                align: TextAlign::Right,
                ..TableCell::text(format_value(p.value))
            },
        ]
    }));

    TableContent {
        rows,
        header_row: true,
        border: Stroke {
            color: "#d1d5db".to_string(),
            width: 1.0,
        },
        font_size: 14.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::ChartPoint;

    fn chart(chart_type: ChartType, values: &[f64]) -> ChartContent {
        ChartContent {
            chart_type,
            series: values
                .iter()
                .enumerate()
                .map(|(i, v)| ChartPoint {
                    label: format!("Q{}", i + 1),
                    value: *v,
                    color: None,
                })
                .collect(),
            title: Some("Revenue".to_string()),
        }
    }

    #[test]
    fn test_bar_chart_uses_palette() {
        let svg = chart_markup(&chart(ChartType::Bar, &[10.0, 20.0, 30.0]), 400.0, 300.0, 1.0);
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains("#4e79a7"));
        assert!(svg.contains("#e15759"));
        assert!(svg.contains(">Revenue</text>"));
    }

    #[test]
    fn test_pie_and_donut() {
        let pie = chart_markup(&chart(ChartType::Pie, &[30.0, 50.0, 20.0]), 300.0, 300.0, 1.0);
        assert_eq!(pie.matches("<path").count(), 3);

        let donut = chart_markup(&chart(ChartType::Donut, &[1.0, 1.0]), 300.0, 300.0, 1.0);
        assert!(donut.contains(&format!("fill=\"{BACKGROUND}\"/>")));

        let single = chart_markup(&chart(ChartType::Pie, &[5.0]), 300.0, 300.0, 1.0);
        assert!(single.contains("<circle"));
    }

    #[test]
    fn test_line_and_area() {
        let line = chart_markup(&chart(ChartType::Line, &[1.0, 3.0, 2.0]), 300.0, 200.0, 1.0);
        assert!(line.contains("<polyline"));
        assert!(!line.contains("<polygon"));

        let area = chart_markup(&chart(ChartType::Area, &[1.0, 3.0, 2.0]), 300.0, 200.0, 1.0);
        assert!(area.contains("<polygon"));
    }

    #[test]
    fn test_empty_and_non_positive_series_draw_frame_only() {
        let svg = chart_markup(&chart(ChartType::Bar, &[]), 100.0, 100.0, 1.0);
        assert_eq!(svg.matches("<rect").count(), 1);
        let svg = chart_markup(&chart(ChartType::Pie, &[0.0, -2.0]), 100.0, 100.0, 1.0);
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_chart_table() {
        let table = chart_table(&chart(ChartType::Pie, &[30.0, 12.5]));
        assert!(table.header_row);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0].text, "Revenue");
        assert_eq!(table.rows[1][1].text, "30");
        assert_eq!(table.rows[2][1].text, "12.5");
    }
}
