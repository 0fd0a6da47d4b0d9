use maud::{Markup, html};

use super::{ChartPoint, ChartSeries};

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 240.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 30.0;
const LEGEND_ROW: f64 = 14.0;

const TEXT_STYLE: &str = "fill: var(--foreground); font-family: inherit";
const SVG_CONTAINER_STYLE: &str = "width:100%;height:auto";

/// Every n-th x label is drawn on dense axes so 24 hourly labels don't collide.
const HOURLY_LABEL_STRIDE: usize = 3;

fn format_value(v: f64) -> String {
    if v == v.floor() && v.abs() < 1_000_000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

fn series_color(index: usize) -> String {
    format!("fill: var(--series-{}); stroke: var(--series-{})", index % 4, index % 4)
}

fn max_value<'a>(points: impl Iterator<Item = &'a ChartPoint>) -> f64 {
    let max_val = points.map(|p| p.value).fold(0.0_f64, f64::max);
    if max_val == 0.0 { 1.0 } else { max_val }
}

pub fn render_bar_chart(points: &[ChartPoint], label: &str) -> Markup {
    if points.is_empty() {
        return empty_chart(label);
    }

    let max_val = max_value(points.iter());
    let chart_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bar_w = chart_w / points.len() as f64;

    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            text x=(MARGIN_LEFT) y="16" font-size="12" style=(TEXT_STYLE) { (label) }
            (write_y_axis(max_val, 0.0, chart_h))
            @for (i, point) in points.iter().enumerate() {
                @let bar_h = (point.value / max_val) * chart_h;
                @let x = MARGIN_LEFT + i as f64 * bar_w;
                @let y = MARGIN_TOP + chart_h - bar_h;
                rect x=(x + 2.0) y=(y) width=((bar_w - 4.0).max(0.5)) height=(bar_h) opacity="0.8" style=(series_color(i)) {
                    title { (point.label) ": " (format_value(point.value)) }
                }
            }
            (write_x_axis(points, |i| MARGIN_LEFT + (i as f64 + 0.5) * bar_w, 1))
        }
    }
}

/// Plots one or more series sharing the same x labels, with a legend when
/// there is more than one.
pub fn render_line_chart(series: &[ChartSeries], label: &str) -> Markup {
    let Some(axis) = series.iter().map(|s| &s.points).find(|p| !p.is_empty()) else {
        return empty_chart(label);
    };

    let max_val = max_value(series.iter().flat_map(|s| s.points.iter()));
    let chart_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let x_at = |i: usize, len: usize| MARGIN_LEFT + (i as f64 / (len - 1).max(1) as f64) * chart_w;
    let y_at = |v: f64| MARGIN_TOP + chart_h - (v / max_val) * chart_h;

    let polylines: Vec<String> = series
        .iter()
        .map(|s| {
            use std::fmt::Write;
            let mut points = String::new();
            for (i, p) in s.points.iter().enumerate() {
                if !points.is_empty() {
                    points.push(' ');
                }
                let _ = write!(points, "{},{}", x_at(i, s.points.len()), y_at(p.value));
            }
            points
        })
        .collect();

    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            text x=(MARGIN_LEFT) y="16" font-size="12" style=(TEXT_STYLE) { (label) }
            (write_y_axis(max_val, 0.0, chart_h))
            @for (idx, (s, points)) in series.iter().zip(&polylines).enumerate() {
                polyline points=(points) fill="none" stroke-width="2" style=(format!("stroke: var(--series-{})", idx % 4)) {}
                @for (i, p) in s.points.iter().enumerate() {
                    circle cx=(x_at(i, s.points.len())) cy=(y_at(p.value)) r="3" style=(series_color(idx)) {
                        title { (s.name) " " (p.label) ": " (format_value(p.value)) }
                    }
                }
            }
            @if series.len() > 1 {
                @for (idx, s) in series.iter().enumerate() {
                    @let y = MARGIN_TOP + idx as f64 * LEGEND_ROW;
                    rect x=(WIDTH - MARGIN_RIGHT - 130.0) y=(y - 8.0) width="10" height="10" style=(series_color(idx)) {}
                    text x=(WIDTH - MARGIN_RIGHT - 115.0) y=(y + 1.0) font-size="10" style=(TEXT_STYLE) { (s.name) }
                }
            }
            (write_x_axis(axis, |i| x_at(i, axis.len()), HOURLY_LABEL_STRIDE))
        }
    }
}

fn write_y_axis(max_val: f64, min_val: f64, chart_h: f64) -> Markup {
    html! {
        text x=(MARGIN_LEFT - 5.0) y=(MARGIN_TOP + 10.0) font-size="10" text-anchor="end" style=(TEXT_STYLE) {
            (format_value(max_val))
        }
        text x=(MARGIN_LEFT - 5.0) y=(MARGIN_TOP + chart_h) font-size="10" text-anchor="end" style=(TEXT_STYLE) {
            (format_value(min_val))
        }
    }
}

fn write_x_axis(points: &[ChartPoint], x_for: impl Fn(usize) -> f64, stride: usize) -> Markup {
    let label_y = HEIGHT - 8.0;
    html! {
        @for (i, point) in points.iter().enumerate().step_by(stride.max(1)) {
            text x=(x_for(i)) y=(label_y) font-size="10" text-anchor="middle" style=(TEXT_STYLE) {
                (point.label)
            }
        }
    }
}

pub fn empty_chart(label: &str) -> Markup {
    placeholder_chart(label, "no data")
}

/// Shown when the data behind a chart could not be read at all.
pub fn unavailable_chart(label: &str) -> Markup {
    placeholder_chart(label, "chart unavailable")
}

fn placeholder_chart(label: &str, message: &str) -> Markup {
    html! {
        svg viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) xmlns="http://www.w3.org/2000/svg" style=(SVG_CONTAINER_STYLE) {
            rect width=(WIDTH) height=(HEIGHT) style="fill: var(--background)" {}
            text x=(WIDTH / 2.0) y=(HEIGHT / 2.0) font-size="14" text-anchor="middle" style=(TEXT_STYLE) {
                (label) " - " (message)
            }
        }
    }
}
