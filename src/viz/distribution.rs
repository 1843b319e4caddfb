use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

use super::geometry::{histogram, kde_curve, min_max, BoxStats};
use super::{axis_range, canvas, Panel};

const PURPLE: RGBColor = RGBColor(128, 0, 128);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);

/// Histogram of `price` with a density curve scaled to bin counts.
pub fn draw_price_distribution(
    path: &Path,
    prices: &[f64],
    bins: usize,
    kde_points: usize,
) -> Result<()> {
    let root = canvas(path, (1000, 600))?;
    draw_histogram(&root, prices, bins, "Price Distribution", PURPLE.mix(0.5), Some(kde_points))?;
    root.present()?;
    Ok(())
}

pub fn draw_price_boxplot(path: &Path, prices: &[f64]) -> Result<()> {
    let root = canvas(path, (1000, 600))?;
    draw_boxplot(&root, prices, "Box Plot of Price Distribution", SKY_BLUE)?;
    root.present()?;
    Ok(())
}

/// 2×2 grid: histogram, price-vs-review-score scatter, box plot.
pub fn draw_price_overview(
    path: &Path,
    prices: &[f64],
    price_vs_score: &[(f64, f64)],
    bins: usize,
) -> Result<()> {
    let root = canvas(path, (1500, 1000))?;
    let panels = root.split_evenly((2, 2));

    draw_histogram(
        &panels[0],
        prices,
        bins,
        "Price Distribution Histogram",
        SKY_BLUE.to_rgba(),
        None,
    )?;
    draw_scatter(&panels[1], price_vs_score)?;
    draw_boxplot(&panels[2], prices, "Box Plot of Price", LIGHT_GREEN)?;

    root.present()?;
    Ok(())
}

fn draw_histogram(
    panel: &Panel<'_>,
    values: &[f64],
    bins: usize,
    caption: &str,
    fill: RGBAColor,
    kde_points: Option<usize>,
) -> Result<()> {
    let counts = histogram(values, bins);
    let (lo, hi) = match (counts.first(), counts.last()) {
        (Some(first), Some(last)) => (first.lo, last.hi),
        _ => (0.0, 1.0),
    };
    let peak = counts.iter().map(|b| b.count).max().unwrap_or(0) as f64;

    let mut chart = ChartBuilder::on(panel)
        .caption(caption, ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(axis_range(lo, hi, 0.02), 0f64..(peak * 1.1).max(1.0))?;
    chart
        .configure_mesh()
        .x_desc("Price")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(
        counts
            .iter()
            .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], fill.filled())),
    )?;
    chart.draw_series(
        counts
            .iter()
            .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLACK.stroke_width(1))),
    )?;

    if let (Some(points), Some(first)) = (kde_points, counts.first()) {
        // density × n × bin width puts the curve on the count scale
        let scale = values.len() as f64 * (first.hi - first.lo);
        let curve = kde_curve(values, points);
        chart.draw_series(LineSeries::new(
            curve.into_iter().map(|(x, d)| (x, d * scale)),
            PURPLE.stroke_width(2),
        ))?;
    }
    Ok(())
}

fn draw_boxplot(panel: &Panel<'_>, values: &[f64], caption: &str, fill: RGBColor) -> Result<()> {
    let stats = BoxStats::from_values(values);
    let (lo, hi) = stats.as_ref().map(BoxStats::span).unwrap_or((0.0, 1.0));

    let mut chart = ChartBuilder::on(panel)
        .caption(caption, ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(20)
        .build_cartesian_2d(axis_range(lo, hi, 0.05), 0f64..1f64)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_desc("Price")
        .draw()?;

    let Some(s) = stats else {
        return Ok(());
    };
    let (bottom, mid, top) = (0.3, 0.5, 0.7);

    chart.draw_series(std::iter::once(Rectangle::new(
        [(s.q1, bottom), (s.q3, top)],
        fill.filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(s.q1, bottom), (s.q3, top)],
        BLACK.stroke_width(1),
    )))?;

    let segments = [
        vec![(s.median, bottom), (s.median, top)],
        vec![(s.whisker_lo, mid), (s.q1, mid)],
        vec![(s.q3, mid), (s.whisker_hi, mid)],
        vec![(s.whisker_lo, 0.4), (s.whisker_lo, 0.6)],
        vec![(s.whisker_hi, 0.4), (s.whisker_hi, 0.6)],
    ];
    chart.draw_series(
        segments
            .into_iter()
            .map(|seg| PathElement::new(seg, BLACK.stroke_width(2))),
    )?;
    chart.draw_series(
        s.fliers
            .iter()
            .map(|&x| Circle::new((x, mid), 4, BLACK.stroke_width(1))),
    )?;
    Ok(())
}

fn draw_scatter(panel: &Panel<'_>, points: &[(f64, f64)]) -> Result<()> {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (x_range, y_range) = if points.is_empty() {
        (0.0..1.0, 0.0..1.0)
    } else {
        let (x_lo, x_hi) = min_max(&xs);
        let (y_lo, y_hi) = min_max(&ys);
        (axis_range(x_lo, x_hi, 0.05), axis_range(y_lo, y_hi, 0.05))
    };

    let mut chart = ChartBuilder::on(panel)
        .caption("Price vs. Review Score", ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;
    chart
        .configure_mesh()
        .x_desc("Price")
        .y_desc("Review Score")
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, 4, ORANGE.mix(0.5).filled())),
    )?;
    Ok(())
}
