use std::fmt::Display;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use plotters::prelude::*;

use crate::error::AppError;
use crate::model::CategoryCount;

pub const CHART_TITLE: &str = "カテゴリ別の目標数";
pub const X_AXIS_LABEL: &str = "カテゴリ";
pub const Y_AXIS_LABEL: &str = "目標数";

const CHART_SIZE: (u32, u32) = (640, 480);
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const BAR_HALF_WIDTH: f64 = 0.4;
const FONT: &str = "sans-serif";

/// Renders one bar per category as a standalone SVG document.
///
/// Bars sit on integer x positions so the axis key points land on bar centers
/// and can be relabelled with the category names.
pub fn render_category_chart(counts: &[CategoryCount]) -> Result<String, AppError> {
    let slots = counts.len();
    let y_top = counts.iter().map(|entry| entry.count).max().unwrap_or(0) + 1;
    let label_at = |x: &f64| -> String {
        let idx = x.round();
        if (x - idx).abs() > f64::EPSILON || idx < 0.0 {
            return String::new();
        }
        counts
            .get(idx as usize)
            .map(|entry| entry.category.label().to_string())
            .unwrap_or_default()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(CHART_TITLE, (FONT, 22))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(56)
            .build_cartesian_2d(-0.5f64..(slots as f64 - 0.5).max(0.5), 0u64..y_top)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots.max(1))
            .x_label_formatter(&label_at)
            .x_desc(X_AXIS_LABEL)
            .y_desc(Y_AXIS_LABEL)
            .label_style((FONT, 14))
            .axis_desc_style((FONT, 16))
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(counts.iter().enumerate().map(|(idx, entry)| {
                let center = idx as f64;
                Rectangle::new(
                    [
                        (center - BAR_HALF_WIDTH, 0),
                        (center + BAR_HALF_WIDTH, entry.count),
                    ],
                    BAR_COLOR.filled(),
                )
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }
    tracing::debug!(categories = slots, bytes = svg.len(), "rendered category chart");
    Ok(svg)
}

/// Wraps an SVG document in a `data:` URI suitable for an `<img src>`.
pub fn svg_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}

fn chart_error<E: Display>(err: E) -> AppError {
    AppError::Chart(err.to_string())
}
